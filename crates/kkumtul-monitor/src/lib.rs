//! # kkumtul-monitor
//!
//! 활동 감시 어댑터 — 포커스와 무관하게 시스템 전역의 실제 포인터/키보드
//! 입력을 감지한다.
//!
//! OS별 유휴 시간 프로브(`GetLastInputInfo`, `HIDIdleTime`, `xprintidle`)를
//! 짧은 주기로 폴링하여 유휴 시간이 리셋되는 순간을 입력 이벤트로 기록한다.
//! 합성 입력 주입 구간에서는 억제 래치가 걸려 도구 자신의 입력이 실제
//! 활동으로 집계되지 않는다.

pub mod probe;
pub mod watcher;

#[cfg(target_os = "linux")]
pub mod linux;
#[cfg(target_os = "macos")]
pub mod macos;
#[cfg(target_os = "windows")]
pub mod windows;

pub use probe::{IdleProbe, SystemIdleProbe};
pub use watcher::ActivityWatcher;
