//! 활동 감시자.
//!
//! 유휴 시간 프로브를 짧은 주기로 폴링하여 유휴 시간이 경과분만큼
//! 증가하지 않은 순간을 실제 입력 이벤트로 기록한다. OS 유휴 시간은
//! 합성 입력에도 리셋되므로, 주입 구간 동안에는 억제 래치를 걸어
//! 기준값만 갱신하고 이벤트는 기록하지 않는다.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kkumtul_core::error::CoreError;
use kkumtul_core::models::activity::{ActivityEvent, ActivityKind};
use kkumtul_core::ports::activity_source::ActivitySource;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::probe::IdleProbe;

/// 이벤트 판정 여유값.
///
/// 프로브 해상도와 폴링 지터를 흡수한다. 폴링 주기보다 작아야
/// 무입력 구간에서 오탐이 없다.
const EVENT_MARGIN: Duration = Duration::from_millis(50);

/// 폴링 태스크 핸들
struct WatchTask {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// 활동 감시자 — 유휴 프로브 폴링 기반 `ActivitySource` 구현
///
/// 타임스탬프 쓰기는 폴링 태스크 단독이며, 읽기는 원자적 로드만 수행한다.
pub struct ActivityWatcher {
    /// 유휴 시간 프로브
    probe: Arc<dyn IdleProbe>,
    /// 폴링 주기
    poll_interval: Duration,
    /// 단조 시계 기준점 — 벽시계 보정(NTP 점프)에 영향받지 않는다
    epoch: tokio::time::Instant,
    /// 마지막 실제 활동 시각 (기준점 이후 밀리초, 0 = 아직 관찰된 활동 없음)
    last_activity_ms: Arc<AtomicU64>,
    /// 합성 입력 억제 래치
    suppressed: Arc<AtomicBool>,
    /// 실행 중인 폴링 태스크
    task: tokio::sync::Mutex<Option<WatchTask>>,
}

impl ActivityWatcher {
    /// 새 활동 감시자 생성
    pub fn new(probe: Arc<dyn IdleProbe>, poll_interval: Duration) -> Self {
        Self {
            probe,
            poll_interval,
            epoch: tokio::time::Instant::now(),
            last_activity_ms: Arc::new(AtomicU64::new(0)),
            suppressed: Arc::new(AtomicBool::new(false)),
            task: tokio::sync::Mutex::new(None),
        }
    }

    /// 폴링 루프.
    ///
    /// 매 틱마다 유휴 시간을 읽고, 직전 값 + 경과 시간과 비교한다.
    /// 유휴 시간이 그만큼 증가하지 않았으면 그 사이 입력이 있었던 것이다.
    async fn poll_loop(
        probe: Arc<dyn IdleProbe>,
        poll_interval: Duration,
        epoch: tokio::time::Instant,
        last_activity_ms: Arc<AtomicU64>,
        suppressed: Arc<AtomicBool>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let mut prev_idle = probe.idle_time().unwrap_or_default();
        let mut prev_instant = tokio::time::Instant::now();
        let mut was_suppressed = suppressed.load(Ordering::Relaxed);

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    debug!("활동 감시 폴링 종료");
                    break;
                }
                _ = interval.tick() => {
                    let curr_idle = match probe.idle_time() {
                        Ok(idle) => idle,
                        Err(e) => {
                            warn!("유휴 시간 조회 실패: {e}");
                            continue;
                        }
                    };
                    let now = tokio::time::Instant::now();
                    let elapsed = now - prev_instant;
                    let is_suppressed = suppressed.load(Ordering::Relaxed);

                    // 억제 구간(및 해제 직후 첫 틱)에서는 기준값만 갱신 —
                    // 합성 입력에 의한 유휴 리셋을 실제 활동으로 오인하지 않는다
                    if !is_suppressed && !was_suppressed
                        && curr_idle + EVENT_MARGIN < prev_idle + elapsed
                    {
                        // 유휴 프로브는 입력 종류를 구별하지 못한다 —
                        // 일반 활동(PointerMove)으로 기록
                        let event = ActivityEvent::now(ActivityKind::PointerMove);
                        let now_ms = (now - epoch).as_millis() as u64;
                        // 이벤트 시각 = 현재 - 유휴 시간 (0은 센티널이므로 피함)
                        let event_ms = now_ms.saturating_sub(curr_idle.as_millis() as u64).max(1);
                        last_activity_ms.store(event_ms, Ordering::Relaxed);
                        trace!(
                            kind = ?event.kind,
                            idle_ms = curr_idle.as_millis() as u64,
                            "실제 입력 감지"
                        );
                    }

                    prev_idle = curr_idle;
                    prev_instant = now;
                    was_suppressed = is_suppressed;
                }
            }
        }
    }
}

#[async_trait]
impl ActivitySource for ActivityWatcher {
    async fn start(&self) -> Result<(), CoreError> {
        let mut task = self.task.lock().await;
        if task.is_some() {
            return Err(CoreError::AlreadyRunning);
        }

        // 프로브 등록 실패는 치명 — 감시 없는 자동화는 시작하지 않는다
        self.probe.register()?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(Self::poll_loop(
            Arc::clone(&self.probe),
            self.poll_interval,
            self.epoch,
            Arc::clone(&self.last_activity_ms),
            Arc::clone(&self.suppressed),
            shutdown_rx,
        ));

        *task = Some(WatchTask {
            shutdown_tx,
            handle,
        });
        info!(
            probe = self.probe.name(),
            poll_ms = self.poll_interval.as_millis() as u64,
            "활동 감시 시작"
        );
        Ok(())
    }

    async fn stop(&self) {
        let task = self.task.lock().await.take();
        if let Some(task) = task {
            let _ = task.shutdown_tx.send(true);
            let _ = task.handle.await;
            info!("활동 감시 중지");
        }
    }

    fn time_since_last_activity(&self) -> Duration {
        let event_ms = self.last_activity_ms.load(Ordering::Relaxed);
        if event_ms == 0 {
            // 아직 관찰된 실제 활동 없음
            return Duration::MAX;
        }
        let now_ms = (tokio::time::Instant::now() - self.epoch).as_millis() as u64;
        Duration::from_millis(now_ms.saturating_sub(event_ms))
    }

    fn set_suppressed(&self, suppressed: bool) {
        self.suppressed.store(suppressed, Ordering::Relaxed);
        trace!(suppressed, "활동 감시 억제 상태 변경");
    }
}
