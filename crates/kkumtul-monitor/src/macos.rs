//! macOS 플랫폼 — 유휴 시간 조회.
//!
//! IOKit의 HIDIdleTime 기반. 나노초 단위 값을 ioreg로 읽어온다.

#![cfg(target_os = "macos")]

use std::time::Duration;

/// macOS 유휴 시간 조회 (밀리초 해상도)
///
/// IOKit의 HIDIdleTime을 사용하여 마지막 입력 이후 경과 시간을 반환.
/// 실패 시 None 반환.
pub fn get_idle_time_macos() -> Option<Duration> {
    use std::process::Command;

    // ioreg를 사용하여 HIDIdleTime 조회 (나노초 단위)
    let output = Command::new("ioreg")
        .args(["-c", "IOHIDSystem", "-d", "4"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);

    // "HIDIdleTime" = 1234567890 형식 파싱
    for line in stdout.lines() {
        if line.contains("HIDIdleTime") {
            if let Some(value_str) = line.split('=').nth(1) {
                if let Ok(nanos) = value_str.trim().parse::<u64>() {
                    return Some(Duration::from_nanos(nanos));
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_idle_time_returns_result() {
        // CI 환경에서는 None일 수 있음
        if let Some(idle) = get_idle_time_macos() {
            assert!(idle < Duration::from_secs(86400 * 365)); // 1년 미만
        }
    }
}
