//! KKUMTUL 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 경계에서 `CoreError`로 변환해 반환한다.
//! 치명(Fatal) / 복구 가능(Recoverable) / 설정 오류의 세 계층을 구분한다:
//! `MonitorRegistration`만이 치명 에러로 실행 시작 자체를 막고,
//! 창 전환·입력 주입 거부는 디스패치 경계에서 로깅 후 흡수된다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 활동 감시 등록 실패 — 치명 에러, 실행이 시작되지 않는다.
    /// 활동 감시 없이 자동화를 돌리는 것은 안전하지 않으므로 축소 모드는 없다.
    #[error("활동 감시 등록 실패: {0}")]
    MonitorRegistration(String),

    /// 창 제어 실패 (전환 거부, 열거 실패 등) — 복구 가능
    #[error("창 제어 에러: {0}")]
    WindowControl(String),

    /// 입력 주입 실패 (권한 있는 전면 프로세스의 거부 등) — 복구 가능
    #[error("입력 주입 에러: {0}")]
    Injection(String),

    /// 동의가 필요함 — 동의 전에는 실행이 거부된다
    #[error("동의 필요: {0}")]
    ConsentRequired(String),

    /// 동의 만료 — 재동의 필요
    #[error("동의 만료 — 재동의 필요")]
    ConsentExpired,

    /// 스케줄러가 이미 실행 중
    #[error("스케줄러가 이미 실행 중입니다")]
    AlreadyRunning,

    /// 미지원 플랫폼
    #[error("미지원 플랫폼: {0}")]
    UnsupportedPlatform(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 치명 에러 여부 — true이면 실행을 시작해서는 안 된다.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CoreError::MonitorRegistration(_)
                | CoreError::Validation { .. }
                | CoreError::Config(_)
                | CoreError::ConsentRequired(_)
                | CoreError::ConsentExpired
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monitor_registration_is_fatal() {
        let err = CoreError::MonitorRegistration("훅 설치 거부".to_string());
        assert!(err.is_fatal());
    }

    #[test]
    fn dispatch_errors_are_recoverable() {
        assert!(!CoreError::WindowControl("전환 거부".to_string()).is_fatal());
        assert!(!CoreError::Injection("주입 거부".to_string()).is_fatal());
    }

    #[test]
    fn validation_error_message() {
        let err = CoreError::Validation {
            field: "idle_max_secs".to_string(),
            message: "min보다 작을 수 없음".to_string(),
        };
        assert!(err.to_string().contains("idle_max_secs"));
    }
}
