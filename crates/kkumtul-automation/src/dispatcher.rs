//! 합성 액션 디스패처.
//!
//! 상태 기계가 결정한 액션을 실제 입력/창 제어 호출로 옮긴다. 모든 주입은
//! 활동 감시 억제 래치로 감싸서 도구 자신의 입력이 실제 활동으로 집계되는
//! 것을 막는다.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use kkumtul_core::error::CoreError;
use kkumtul_core::models::action::{PointerButton, ShortcutCombo, SyntheticAction};
use kkumtul_core::ports::activity_source::ActivitySource;
use kkumtul_core::ports::input_injector::InputInjector;
use kkumtul_core::ports::window_controller::WindowController;

/// 포인터 목표 좌표의 화면 가장자리 여백 비율 (10%)
const POINTER_MARGIN_RATIO: i32 = 10;

/// 디스패치 결과 — 저널과 스냅샷 표시용
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// 수행 내용 설명 (좌표, 대상 창 제목 등)
    pub detail: String,
    /// 전환된 앱 이름 (창 전환 시에만 Some)
    pub app_name: Option<String>,
}

/// 합성 액션 디스패처
pub struct ActionDispatcher {
    injector: Arc<dyn InputInjector>,
    windows: Arc<dyn WindowController>,
    activity: Arc<dyn ActivitySource>,
    rng: StdRng,
}

impl ActionDispatcher {
    /// OS 엔트로피 시드로 디스패처 생성
    pub fn new(
        injector: Arc<dyn InputInjector>,
        windows: Arc<dyn WindowController>,
        activity: Arc<dyn ActivitySource>,
    ) -> Self {
        Self::with_seed(injector, windows, activity, rand::random())
    }

    /// 지정 시드로 디스패처 생성 (재현 가능한 좌표/대상 선택)
    pub fn with_seed(
        injector: Arc<dyn InputInjector>,
        windows: Arc<dyn WindowController>,
        activity: Arc<dyn ActivitySource>,
        seed: u64,
    ) -> Self {
        Self {
            injector,
            windows,
            activity,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// 액션 실행.
    ///
    /// 주입 구간 전체를 억제 래치로 감싼다. 에러가 나도 래치는 반드시
    /// 해제된다.
    pub async fn execute(&mut self, action: SyntheticAction) -> Result<DispatchReport, CoreError> {
        self.activity.set_suppressed(true);
        let result = self.execute_inner(action).await;
        self.activity.set_suppressed(false);

        match &result {
            Ok(report) => debug!(action = action.name(), detail = %report.detail, "액션 수행"),
            Err(e) => debug!(action = action.name(), "액션 실패: {e}"),
        }
        result
    }

    async fn execute_inner(&mut self, action: SyntheticAction) -> Result<DispatchReport, CoreError> {
        match action {
            SyntheticAction::MovePointer => self.move_pointer().await,
            SyntheticAction::Click => self.click().await,
            SyntheticAction::SwitchWindow => self.switch_window().await,
            SyntheticAction::CycleTabs => self.cycle_tabs().await,
        }
    }

    /// 화면 가장자리 여백을 둔 무작위 좌표로 애니메이션 이동
    async fn move_pointer(&mut self) -> Result<DispatchReport, CoreError> {
        let (width, height) = self.injector.screen_size();
        let margin_x = (width / POINTER_MARGIN_RATIO).max(1);
        let margin_y = (height / POINTER_MARGIN_RATIO).max(1);

        let x = self.rng.random_range(margin_x..(width - margin_x).max(margin_x + 1));
        let y = self.rng.random_range(margin_y..(height - margin_y).max(margin_y + 1));

        self.injector.move_pointer_smooth(x, y).await?;
        Ok(DispatchReport {
            detail: format!("({x}, {y})"),
            app_name: None,
        })
    }

    /// 현재 위치에서 좌클릭 (콘텐츠 영향 최소화를 위해 좌클릭만)
    async fn click(&mut self) -> Result<DispatchReport, CoreError> {
        self.injector.click(PointerButton::Left).await?;
        Ok(DispatchReport {
            detail: "left".to_string(),
            app_name: None,
        })
    }

    /// 다른 보이는 창으로 전환.
    ///
    /// 창 목록이 비거나 전환이 거부되면 앱 전환 단축키로 폴백한다.
    async fn switch_window(&mut self) -> Result<DispatchReport, CoreError> {
        let windows = self.windows.list_visible_windows().await.unwrap_or_default();
        let foreground = self.windows.foreground_window().await.unwrap_or(None);

        // 현재 전면 창은 후보에서 제외
        let candidates: Vec<_> = windows
            .into_iter()
            .filter(|w| foreground.as_ref().map(|f| f.handle) != Some(w.handle))
            .collect();

        if !candidates.is_empty() {
            let target = &candidates[self.rng.random_range(0..candidates.len())];
            match self.windows.switch_to(target.handle).await {
                Ok(()) => {
                    return Ok(DispatchReport {
                        detail: target.title.clone(),
                        app_name: Some(target.title.clone()),
                    });
                }
                Err(e) => {
                    debug!("창 전환 거부, 앱 전환 단축키 폴백: {e}");
                }
            }
        }

        self.injector.shortcut(ShortcutCombo::AppSwitch).await?;
        Ok(DispatchReport {
            detail: "app_switch_shortcut".to_string(),
            app_name: None,
        })
    }

    /// 전면 앱 탭 순환
    async fn cycle_tabs(&mut self) -> Result<DispatchReport, CoreError> {
        self.windows.cycle_tabs().await?;
        Ok(DispatchReport {
            detail: "ctrl_tab".to_string(),
            app_name: None,
        })
    }
}

// ============================================================
// 테스트
// ============================================================
