//! Windows 플랫폼 — 유휴 시간 조회.
//!
//! Win32 API `GetLastInputInfo` 기반. 마우스/키보드를 가리지 않고 세션의
//! 마지막 입력 틱을 반환하므로 시스템 전역 감지가 된다.

#![cfg(target_os = "windows")]

use std::time::Duration;
use windows_sys::Win32::System::SystemInformation::GetTickCount;
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{GetLastInputInfo, LASTINPUTINFO};

/// Windows 유휴 시간 조회 (밀리초 해상도)
///
/// `GetLastInputInfo`를 사용하여 마지막 입력 이후 경과 시간을 반환.
/// 실패 시 None 반환.
pub fn get_idle_time_windows() -> Option<Duration> {
    unsafe {
        let mut last_input: LASTINPUTINFO = std::mem::zeroed();
        last_input.cbSize = std::mem::size_of::<LASTINPUTINFO>() as u32;

        if GetLastInputInfo(&mut last_input) != 0 {
            // LASTINPUTINFO는 32비트 dwTime을 사용하므로 같은 32비트
            // 틱 카운트와의 wrapping 차이로 계산
            let current_tick = GetTickCount();
            let idle_ms = current_tick.wrapping_sub(last_input.dwTime);
            Some(Duration::from_millis(idle_ms as u64))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    // Windows 전용 테스트는 CI에서 실행하기 어려움
    // 로컬에서 수동 테스트 권장
}
