//! 애플리케이션 설정 구조체.
//!
//! 사이클 타이밍, 액션 가중치, 감시 폴링, 저널 경로 등 런타임 설정을
//! 정의한다. JSON 파일로 저장/로드되며 실행 시작 시점에 검증된다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 자동화 사이클 설정
    pub cycle: CycleConfig,
    /// 활동 감시 설정
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// 활동 저널 설정
    #[serde(default)]
    pub journal: JournalConfig,
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            cycle: CycleConfig::default(),
            monitor: MonitorConfig::default(),
            journal: JournalConfig::default(),
        }
    }
}

// ============================================================
// 사이클 설정
// ============================================================

/// 액션 선택 가중치.
///
/// 원 구현의 분포를 따른다: 포인터 이동이 가장 흔하고, 클릭은 드물며
/// (콘텐츠 영향 최소화), 앱/탭 전환이 중간 빈도.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActionWeights {
    /// 포인터 이동 가중치
    pub pointer_move: f64,
    /// 클릭 가중치
    pub click: f64,
    /// 창 전환 가중치
    pub window_switch: f64,
    /// 탭 순환 가중치
    pub tab_cycle: f64,
}

impl Default for ActionWeights {
    fn default() -> Self {
        Self {
            pointer_move: 0.40,
            click: 0.10,
            window_switch: 0.35,
            tab_cycle: 0.15,
        }
    }
}

impl ActionWeights {
    /// 가중치 합
    pub fn total(&self) -> f64 {
        self.pointer_move + self.click + self.window_switch + self.tab_cycle
    }
}

/// 자동화 사이클 설정 — 실행 시작 후 불변
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    /// 총 실행 시간 (초) — 경과 시 자동 종료
    pub total_runtime_secs: u64,
    /// Active 위상 길이 (초, 고정)
    pub active_duration_secs: u64,
    /// Idle 위상 최소 길이 (초) — [min, max) 구간에서 샘플링
    pub idle_min_secs: u64,
    /// Idle 위상 최대 길이 (초, 배타적)
    pub idle_max_secs: u64,
    /// 액션 간격 최소 (밀리초) — [min, max) 구간에서 샘플링
    pub action_interval_min_ms: u64,
    /// 액션 간격 최대 (밀리초, 배타적)
    pub action_interval_max_ms: u64,
    /// Paused에서 복귀하는 데 필요한 연속 무활동 시간 (초)
    pub resume_grace_secs: u64,
    /// 스케줄러 틱 주기 (밀리초)
    pub tick_interval_ms: u64,
    /// 액션 선택 가중치
    #[serde(default)]
    pub weights: ActionWeights,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            total_runtime_secs: 4 * 3600, // 4시간
            active_duration_secs: 300,    // 5분
            idle_min_secs: 120,           // 2분
            idle_max_secs: 240,           // 4분
            action_interval_min_ms: 3_000,
            action_interval_max_ms: 10_000,
            resume_grace_secs: 120, // 2분
            tick_interval_ms: 250,
            weights: ActionWeights::default(),
        }
    }
}

impl CycleConfig {
    /// 설정 유효성 검증.
    ///
    /// 모든 시간 값은 양수, 구간은 min <= max, 가중치 합은 양수여야 한다.
    /// 위반 시 `CoreError::Validation` — 실행은 시작되지 않는다.
    pub fn validate(&self) -> Result<(), CoreError> {
        fn positive(field: &str, value: u64) -> Result<(), CoreError> {
            if value == 0 {
                return Err(CoreError::Validation {
                    field: field.to_string(),
                    message: "0보다 커야 합니다".to_string(),
                });
            }
            Ok(())
        }

        positive("total_runtime_secs", self.total_runtime_secs)?;
        positive("active_duration_secs", self.active_duration_secs)?;
        positive("idle_min_secs", self.idle_min_secs)?;
        positive("idle_max_secs", self.idle_max_secs)?;
        positive("action_interval_min_ms", self.action_interval_min_ms)?;
        positive("action_interval_max_ms", self.action_interval_max_ms)?;
        positive("resume_grace_secs", self.resume_grace_secs)?;
        positive("tick_interval_ms", self.tick_interval_ms)?;

        if self.idle_min_secs > self.idle_max_secs {
            return Err(CoreError::Validation {
                field: "idle_max_secs".to_string(),
                message: format!(
                    "min({}) <= max({}) 이어야 합니다",
                    self.idle_min_secs, self.idle_max_secs
                ),
            });
        }
        if self.action_interval_min_ms > self.action_interval_max_ms {
            return Err(CoreError::Validation {
                field: "action_interval_max_ms".to_string(),
                message: format!(
                    "min({}) <= max({}) 이어야 합니다",
                    self.action_interval_min_ms, self.action_interval_max_ms
                ),
            });
        }
        if self.weights.total() <= 0.0 {
            return Err(CoreError::Validation {
                field: "weights".to_string(),
                message: "가중치 합이 0보다 커야 합니다".to_string(),
            });
        }
        Ok(())
    }

    /// 총 실행 시간
    pub fn total_runtime(&self) -> Duration {
        Duration::from_secs(self.total_runtime_secs)
    }

    /// Active 위상 길이
    pub fn active_duration(&self) -> Duration {
        Duration::from_secs(self.active_duration_secs)
    }

    /// Idle 위상 길이 샘플링 구간 [min, max)
    pub fn idle_range(&self) -> (Duration, Duration) {
        (
            Duration::from_secs(self.idle_min_secs),
            Duration::from_secs(self.idle_max_secs),
        )
    }

    /// 액션 간격 샘플링 구간 [min, max)
    pub fn action_interval_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.action_interval_min_ms),
            Duration::from_millis(self.action_interval_max_ms),
        )
    }

    /// 복귀 유예 시간
    pub fn resume_grace(&self) -> Duration {
        Duration::from_secs(self.resume_grace_secs)
    }

    /// 틱 주기
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

// ============================================================
// 감시 설정
// ============================================================

/// 활동 감시 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// 유휴 프로브 폴링 주기 (밀리초)
    pub poll_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
        }
    }
}

impl MonitorConfig {
    /// 폴링 주기
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// ============================================================
// 저널 설정
// ============================================================

/// 활동 저널 설정 — 디스패치/전이 기록용 append-only 텍스트 로그
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// 저널 활성화 여부
    pub enabled: bool,
    /// 저널 파일 경로 (None이면 기본 데이터 디렉토리)
    pub path: Option<PathBuf>,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}
