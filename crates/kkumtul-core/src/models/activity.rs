//! 실제 사용자 활동 모델.
//!
//! 활동 감시자가 생성하고 스케줄러가 소비하는 일시적 이벤트.
//! `last_activity` 타임스탬프 갱신 이후에는 보존되지 않는다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 감지된 실제 입력의 종류.
///
/// 유휴 시간 폴링 기반 감시자는 이벤트 종류를 구별할 수 없으므로
/// `PointerMove`를 일반 활동으로 보고한다. 종류와 무관하게 모든 이벤트가
/// 동일하게 last-activity 타임스탬프를 리셋한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    /// 포인터 이동
    PointerMove,
    /// 포인터 클릭
    PointerClick,
    /// 키 입력
    KeyPress,
}

/// 실제 사용자 입력 이벤트.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// 입력 종류
    pub kind: ActivityKind,
    /// 관찰 시각
    pub timestamp: DateTime<Utc>,
}

impl ActivityEvent {
    /// 현재 시각으로 이벤트 생성
    pub fn now(kind: ActivityKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
        }
    }
}
