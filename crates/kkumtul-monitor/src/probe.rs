//! 유휴 시간 프로브.
//!
//! "마지막 시스템 입력 이후 경과 시간"을 OS에서 읽어오는 인터페이스와
//! 플랫폼별 디스패치 구현.

use std::time::Duration;

use kkumtul_core::error::CoreError;
use tracing::info;

/// 유휴 시간 프로브 — 플랫폼 유휴 API 추상화
///
/// 구현체: `SystemIdleProbe` (플랫폼 디스패치), 테스트용 목 구현
pub trait IdleProbe: Send + Sync {
    /// 프로브 등록 및 가용성 확인.
    ///
    /// 유휴 시간 조회가 불가능하면 `CoreError::MonitorRegistration`(치명).
    fn register(&self) -> Result<(), CoreError>;

    /// 마지막 시스템 입력(실제 + 합성) 이후 경과 시간
    fn idle_time(&self) -> Result<Duration, CoreError>;

    /// 프로브 이름 (예: "GetLastInputInfo", "HIDIdleTime", "xprintidle")
    fn name(&self) -> &str;
}

/// 플랫폼별 유휴 시간 조회 (밀리초 해상도)
///
/// 지원하지 않는 플랫폼이거나 조회 실패 시 None을 반환한다.
pub fn system_idle_time() -> Option<Duration> {
    #[cfg(target_os = "windows")]
    {
        crate::windows::get_idle_time_windows()
    }

    #[cfg(target_os = "macos")]
    {
        crate::macos::get_idle_time_macos()
    }

    #[cfg(target_os = "linux")]
    {
        crate::linux::get_idle_time_linux()
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        // 기타 플랫폼: 미구현
        None
    }
}

/// 플랫폼별 프로브 이름
fn probe_name() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "GetLastInputInfo"
    }

    #[cfg(target_os = "macos")]
    {
        "HIDIdleTime"
    }

    #[cfg(target_os = "linux")]
    {
        "xprintidle"
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        "unsupported"
    }
}

/// 시스템 유휴 프로브 — 현재 플랫폼의 유휴 API로 디스패치
#[derive(Debug, Default)]
pub struct SystemIdleProbe;

impl SystemIdleProbe {
    /// 새 시스템 프로브 생성
    pub fn new() -> Self {
        Self
    }
}

impl IdleProbe for SystemIdleProbe {
    fn register(&self) -> Result<(), CoreError> {
        // 한 번 조회해서 플랫폼 API 가용성 확인
        match system_idle_time() {
            Some(idle) => {
                info!(
                    probe = self.name(),
                    idle_ms = idle.as_millis() as u64,
                    "유휴 프로브 등록 완료"
                );
                Ok(())
            }
            None => Err(CoreError::MonitorRegistration(format!(
                "유휴 시간 조회 불가 ({})",
                self.name()
            ))),
        }
    }

    fn idle_time(&self) -> Result<Duration, CoreError> {
        system_idle_time().ok_or_else(|| {
            CoreError::MonitorRegistration(format!("유휴 시간 조회 실패 ({})", self.name()))
        })
    }

    fn name(&self) -> &str {
        probe_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_name_is_platform_specific() {
        let probe = SystemIdleProbe::new();
        assert!(!probe.name().is_empty());
    }

    #[test]
    fn idle_time_is_reasonable_when_available() {
        // CI 환경에서는 프로브가 없을 수 있음
        if let Some(idle) = system_idle_time() {
            assert!(idle < Duration::from_secs(86400 * 365));
        }
    }
}
