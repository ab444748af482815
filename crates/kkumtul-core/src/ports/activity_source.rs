//! 활동 감시 포트.
//!
//! 포커스와 무관하게 시스템 전역의 실제 포인터/키보드 입력을 관찰하고
//! "마지막 실제 활동 이후 경과 시간"을 노출하는 인터페이스.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::CoreError;

/// 활동 감시자 — 시스템 전역 실제 입력 관찰 인터페이스
///
/// 구현체: `ActivityWatcher` (유휴 시간 폴링 기반), 테스트용 목 구현.
///
/// 프로세스당 하나의 소유 컨텍스트가 `start()`/`stop()` 수명을 관리한다.
/// 타임스탬프 쓰기는 감시자 컨텍스트 단독, 읽기는 비블로킹이어야 한다.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// 시스템 전역 입력 관찰 등록.
    ///
    /// OS가 등록을 거부하면 `CoreError::MonitorRegistration`(치명)을 반환한다.
    /// 활동 감시 없는 자동화는 안전하지 않으므로 축소 모드는 없다.
    async fn start(&self) -> Result<(), CoreError>;

    /// 관찰 해제. 멱등 — 이미 중지된 상태에서 호출해도 에러 없음.
    async fn stop(&self);

    /// 마지막 실제 활동 이후 경과 시간.
    ///
    /// 비블로킹, 스레드 안전. 아직 관찰된 활동이 없으면 `Duration::MAX`.
    fn time_since_last_activity(&self) -> Duration;

    /// 합성 입력 주입 구간 동안 관찰 억제 토글.
    ///
    /// 억제 중 관찰된 입력은 실제 활동으로 기록되지 않는다. 디스패처가
    /// 주입 전후로 감싸서 도구 자신의 입력을 활동으로 오인하지 않게 한다.
    fn set_suppressed(&self, suppressed: bool);
}
