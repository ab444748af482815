//! 자동화 사이클 모델.
//!
//! 위상(Phase) 열거형과 표시 계층에 전달되는 읽기 전용 스냅샷을 정의한다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 자동화 사이클의 현재 위상.
///
/// 항상 정확히 하나의 위상만 유효하다. 전이는 스케줄러의 전이 표를 통해서만
/// 일어나며, 총 실행 시간이 만료되면 `Stopped`로 비가역 전이한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// 실행 중 아님 (초기/종료 상태)
    Stopped,
    /// 활성 위상 — 합성 액션이 디스패치된다
    Active,
    /// 휴지 위상 — 계획된 무활동 구간 (Paused와 구별됨)
    Idle,
    /// 안전 일시정지 — 실제 사용자 입력 감지 시 진입
    Paused,
}

impl Phase {
    /// 저널/로그용 고정 폭 레이블
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Stopped => "STOPPED",
            Phase::Active => "ACTIVE",
            Phase::Idle => "IDLE",
            Phase::Paused => "PAUSED",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 스케줄러 상태의 읽기 전용 스냅샷.
///
/// 표시 계층이 자체 주기로 읽는 복사본이며, 스케줄러 틱 루프를 절대
/// 블로킹하지 않는다 (참조 공유가 아닌 copy-out).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleSnapshot {
    /// 현재 위상
    pub phase: Phase,
    /// 현재 위상의 남은 시간 (Paused 중에는 복귀 유예의 남은 시간)
    pub countdown_remaining: Duration,
    /// 실행 시작 이후 경과 시간 (단조 증가)
    pub run_elapsed: Duration,
    /// 완료된 사이클 수 (Active→Idle 전이마다 1 증가)
    pub cycle_count: u32,
    /// 현재 전면 앱 이름 (마지막으로 관찰된 값)
    pub active_app_name: String,
    /// 마지막으로 수행한 액션 설명
    pub last_action: String,
    /// 다음 액션까지 남은 시간 (Active 위상에서만 Some)
    pub next_action_in: Option<Duration>,
}

impl Default for CycleSnapshot {
    fn default() -> Self {
        Self {
            phase: Phase::Stopped,
            countdown_remaining: Duration::ZERO,
            run_elapsed: Duration::ZERO,
            cycle_count: 0,
            active_app_name: String::new(),
            last_action: String::new(),
            next_action_in: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_labels() {
        assert_eq!(Phase::Stopped.label(), "STOPPED");
        assert_eq!(Phase::Active.label(), "ACTIVE");
        assert_eq!(Phase::Idle.label(), "IDLE");
        assert_eq!(Phase::Paused.label(), "PAUSED");
    }

    #[test]
    fn default_snapshot_is_stopped() {
        let snapshot = CycleSnapshot::default();
        assert_eq!(snapshot.phase, Phase::Stopped);
        assert_eq!(snapshot.cycle_count, 0);
        assert!(snapshot.next_action_in.is_none());
    }

    #[test]
    fn phase_serde_roundtrip() {
        let json = serde_json::to_string(&Phase::Paused).unwrap();
        let deser: Phase = serde_json::from_str(&json).unwrap();
        assert_eq!(deser, Phase::Paused);
    }
}
