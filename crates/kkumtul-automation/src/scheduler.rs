//! 사이클 스케줄러.
//!
//! 상태 기계를 틱 루프로 구동하고, 판정 결과를 디스패처/저널/스냅샷
//! 채널로 옮기는 비동기 계층. 시작 시 활동 감시 등록 실패는 치명 에러로
//! 전파되어 실행이 시작되지 않는다.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use kkumtul_core::config::AppConfig;
use kkumtul_core::error::CoreError;
use kkumtul_core::models::cycle::{CycleSnapshot, Phase};
use kkumtul_core::ports::activity_source::ActivitySource;
use kkumtul_core::ports::input_injector::InputInjector;
use kkumtul_core::ports::window_controller::WindowController;

use crate::dispatcher::ActionDispatcher;
use crate::journal::ActivityLog;
use crate::machine::{CycleMachine, TickOutcome};

/// 실행 중 스케줄러에 보내는 명령
#[derive(Debug, Clone, Copy)]
enum SchedulerCommand {
    /// 수동 일시정지
    Pause,
    /// 수동 복귀
    Resume,
}

/// 사이클 스케줄러 — 상태 기계 + 어댑터 오케스트레이션
pub struct CycleScheduler {
    config: AppConfig,
    activity: Arc<dyn ActivitySource>,
    injector: Arc<dyn InputInjector>,
    windows: Arc<dyn WindowController>,
    journal: Option<ActivityLog>,
    seed: Option<u64>,
}

impl CycleScheduler {
    /// 새 스케줄러 생성
    pub fn new(
        config: AppConfig,
        activity: Arc<dyn ActivitySource>,
        injector: Arc<dyn InputInjector>,
        windows: Arc<dyn WindowController>,
    ) -> Self {
        Self {
            config,
            activity,
            injector,
            windows,
            journal: None,
            seed: None,
        }
    }

    /// 활동 저널 설정
    pub fn with_journal(mut self, journal: ActivityLog) -> Self {
        self.journal = Some(journal);
        self
    }

    /// 난수 시드 고정 (재현 가능한 실행)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 실행 시작.
    ///
    /// 설정 검증 → 활동 감시 등록 → 틱 루프 기동. 감시 등록 실패는
    /// 치명 에러로 전파된다.
    pub async fn start(self) -> Result<SchedulerHandle, CoreError> {
        let seed = self.seed.unwrap_or_else(rand::random);
        let mut machine = CycleMachine::with_seed(self.config.cycle.clone(), seed)?;

        // 감시 없는 자동화는 시작하지 않는다
        self.activity.start().await?;

        machine.start()?;
        if let Some(ref journal) = self.journal {
            journal.record(Phase::Active, "run_start", &format!("seed={seed}"));
        }

        let dispatcher = ActionDispatcher::with_seed(
            Arc::clone(&self.injector),
            Arc::clone(&self.windows),
            Arc::clone(&self.activity),
            seed.wrapping_add(1),
        );

        let (snapshot_tx, snapshot_rx) = watch::channel(machine.snapshot());
        let (command_tx, command_rx) = mpsc::channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let tick_interval = self.config.cycle.tick_interval();
        info!(
            tick_ms = tick_interval.as_millis() as u64,
            total_secs = self.config.cycle.total_runtime_secs,
            seed,
            "사이클 스케줄러 시작"
        );

        let activity = Arc::clone(&self.activity);
        let journal = self.journal.clone();
        let handle = tokio::spawn(Self::run_loop(
            machine,
            dispatcher,
            Arc::clone(&activity),
            journal,
            tick_interval,
            snapshot_tx,
            command_rx,
            shutdown_rx,
        ));

        Ok(SchedulerHandle {
            snapshot_rx,
            command_tx,
            shutdown_tx,
            handle: tokio::sync::Mutex::new(Some(handle)),
        })
    }

    /// 틱 루프
    #[allow(clippy::too_many_arguments)]
    async fn run_loop(
        mut machine: CycleMachine,
        mut dispatcher: ActionDispatcher,
        activity: Arc<dyn ActivitySource>,
        journal: Option<ActivityLog>,
        tick_interval: Duration,
        snapshot_tx: watch::Sender<CycleSnapshot>,
        mut command_rx: mpsc::Receiver<SchedulerCommand>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let mut interval = tokio::time::interval(tick_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut last_tick = tokio::time::Instant::now();
        let mut last_action = String::new();
        let mut active_app = String::new();

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    machine.stop();
                    if let Some(ref journal) = journal {
                        journal.record(Phase::Stopped, "run_stop", "요청에 의한 중지");
                    }
                    let _ = snapshot_tx.send(machine.snapshot());
                    info!("사이클 스케줄러 중지");
                    break;
                }
                Some(command) = command_rx.recv() => {
                    let outcome = match command {
                        SchedulerCommand::Pause => machine.request_pause(),
                        SchedulerCommand::Resume => machine.request_resume(),
                    };
                    if let Some(TickOutcome::PhaseChanged { from, to }) = outcome {
                        info!(%from, %to, "수동 위상 전이");
                        if let Some(ref journal) = journal {
                            journal.record(to, "phase_change", &format!("{from} -> {to} (manual)"));
                        }
                    }
                }
                _ = interval.tick() => {
                    let now = tokio::time::Instant::now();
                    let dt = now - last_tick;
                    last_tick = now;

                    let idle_for = activity.time_since_last_activity();
                    match machine.tick(dt, idle_for) {
                        TickOutcome::Running => {}
                        TickOutcome::ActionDue(action) => {
                            match dispatcher.execute(action).await {
                                Ok(report) => {
                                    last_action = format!("{} {}", action.name(), report.detail);
                                    if let Some(app) = report.app_name {
                                        active_app = app;
                                    }
                                    if let Some(ref journal) = journal {
                                        journal.record(machine.phase(), action.name(), &report.detail);
                                    }
                                }
                                Err(e) => {
                                    warn!(action = action.name(), "액션 수행 실패: {e}");
                                }
                            }
                        }
                        TickOutcome::PhaseChanged { from, to } => {
                            info!(%from, %to, "위상 전이");
                            if let Some(ref journal) = journal {
                                journal.record(to, "phase_change", &format!("{from} -> {to}"));
                            }
                        }
                        TickOutcome::Expired => {
                            info!("총 실행 시간 만료, 실행 종료");
                            if let Some(ref journal) = journal {
                                journal.record(Phase::Stopped, "run_expired", "");
                            }
                            let _ = snapshot_tx.send(machine.snapshot());
                            break;
                        }
                    }

                    let mut snapshot = machine.snapshot();
                    snapshot.last_action = last_action.clone();
                    snapshot.active_app_name = active_app.clone();
                    let _ = snapshot_tx.send(snapshot);
                }
            }
        }

        activity.stop().await;
    }
}

/// 실행 중인 스케줄러 핸들
///
/// 스냅샷 조회는 비블로킹 copy-out이며 틱 루프를 블로킹하지 않는다.
#[derive(Debug)]
pub struct SchedulerHandle {
    snapshot_rx: watch::Receiver<CycleSnapshot>,
    command_tx: mpsc::Sender<SchedulerCommand>,
    shutdown_tx: watch::Sender<bool>,
    handle: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl SchedulerHandle {
    /// 현재 상태 스냅샷 (복사본)
    pub fn snapshot(&self) -> CycleSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// 수동 일시정지 요청
    pub async fn request_pause(&self) {
        let _ = self.command_tx.send(SchedulerCommand::Pause).await;
    }

    /// 수동 복귀 요청
    pub async fn request_resume(&self) {
        let _ = self.command_tx.send(SchedulerCommand::Resume).await;
    }

    /// 실행 종료까지 대기 (만료 또는 중지)
    pub async fn wait(&self) {
        let handle = self.handle.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// 실행 중지. 멱등 — 이미 종료된 뒤 호출해도 에러 없음
    pub async fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
        self.wait().await;
    }
}

// ============================================================
// 테스트
// ============================================================
