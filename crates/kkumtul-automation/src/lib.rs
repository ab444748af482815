//! # kkumtul-automation
//!
//! 자동화 사이클 어댑터 — 위상 상태 기계(`CycleMachine`), 비동기 스케줄러
//! (`CycleScheduler`), 가중치 기반 합성 액션 디스패처, 입력/창 제어 구현체,
//! 활동 저널을 제공한다.
//!
//! 상태 기계는 순수 동기 코드로 시드 가능한 난수만 사용하므로 단위
//! 테스트에서 완전히 결정적으로 검증된다. 시간 진행과 OS 연동은 스케줄러
//! 계층이 담당한다.

pub mod dispatcher;
pub mod injector;
pub mod journal;
pub mod machine;
pub mod scheduler;
pub mod window_control;

pub use dispatcher::ActionDispatcher;
pub use injector::{create_platform_injector, NoOpInjector};
pub use journal::ActivityLog;
pub use machine::{CycleMachine, TickOutcome};
pub use scheduler::{CycleScheduler, SchedulerHandle};
pub use window_control::{create_platform_window_controller, NoOpWindowController};
