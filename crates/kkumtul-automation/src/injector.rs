//! 입력 주입기 구현.
//!
//! `NoOpInjector` (테스트용)와 `EnigoInjector` (실제 입력, `enigo` feature)를
//! 제공한다. 모든 포인터 좌표는 화면 경계 안으로 클램프된다.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use kkumtul_core::error::CoreError;
use kkumtul_core::models::action::{PointerButton, ShortcutCombo};
use kkumtul_core::ports::input_injector::InputInjector;

/// 애니메이션 이동 단계 수
const SMOOTH_MOVE_STEPS: i32 = 20;

/// 애니메이션 단계 간 지연
const SMOOTH_MOVE_STEP_DELAY: Duration = Duration::from_millis(8);

/// 좌표를 화면 경계 안으로 클램프
pub fn clamp_to_screen(x: i32, y: i32, width: i32, height: i32) -> (i32, i32) {
    (
        x.clamp(0, width.saturating_sub(1).max(0)),
        y.clamp(0, height.saturating_sub(1).max(0)),
    )
}

/// 단축키 조합 → 키 이름 목록
///
/// 앱 전환은 플랫폼 관례를 따른다 (macOS: Cmd+Tab, 그 외: Alt+Tab).
/// 탭 순환은 공통적으로 Ctrl+Tab.
pub fn combo_keys(combo: ShortcutCombo) -> &'static [&'static str] {
    match combo {
        ShortcutCombo::AppSwitch => {
            #[cfg(target_os = "macos")]
            {
                &["meta", "tab"]
            }
            #[cfg(not(target_os = "macos"))]
            {
                &["alt", "tab"]
            }
        }
        ShortcutCombo::TabCycle => &["ctrl", "tab"],
    }
}

// ============================================================
// NoOpInjector — 테스트/디버깅용
// ============================================================

/// No-Op 입력 주입기 — 모든 입력을 로깅만 하고 실행하지 않음
///
/// 테스트와 dry-run 모드에서 사용.
pub struct NoOpInjector {
    /// 가상 화면 크기
    screen: (i32, i32),
}

impl NoOpInjector {
    /// 기본 가상 화면 (1920x1080) 주입기 생성
    pub fn new() -> Self {
        Self {
            screen: (1920, 1080),
        }
    }

    /// 지정 화면 크기로 생성
    pub fn with_screen(width: i32, height: i32) -> Self {
        Self {
            screen: (width, height),
        }
    }
}

impl Default for NoOpInjector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputInjector for NoOpInjector {
    async fn move_pointer(&self, x: i32, y: i32) -> Result<(), CoreError> {
        let (x, y) = clamp_to_screen(x, y, self.screen.0, self.screen.1);
        debug!(x, y, "[NoOp] 포인터 이동");
        Ok(())
    }

    async fn move_pointer_smooth(&self, x: i32, y: i32) -> Result<(), CoreError> {
        let (x, y) = clamp_to_screen(x, y, self.screen.0, self.screen.1);
        debug!(x, y, "[NoOp] 포인터 애니메이션 이동");
        Ok(())
    }

    async fn click(&self, button: PointerButton) -> Result<(), CoreError> {
        debug!(?button, "[NoOp] 클릭");
        Ok(())
    }

    async fn key_press(&self, key: &str) -> Result<(), CoreError> {
        debug!(key, "[NoOp] 키 입력");
        Ok(())
    }

    async fn shortcut(&self, combo: ShortcutCombo) -> Result<(), CoreError> {
        debug!(?combo, keys = ?combo_keys(combo), "[NoOp] 단축키 실행");
        Ok(())
    }

    fn screen_size(&self) -> (i32, i32) {
        self.screen
    }

    fn platform(&self) -> &str {
        "noop"
    }
}

// ============================================================
// EnigoInjector — 실제 마우스/키보드 입력
// ============================================================

/// 실제 마우스/키보드 입력 주입기 (enigo 기반)
///
/// macOS: Accessibility 권한 필요
/// Windows: 표준 사용자 권한으로 동작
/// Linux: X11 또는 Wayland + uinput 권한 필요
#[cfg(feature = "enigo")]
pub struct EnigoInjector {
    /// enigo 인스턴스 (Send지만 !Sync → tokio::sync::Mutex 사용)
    enigo: tokio::sync::Mutex<enigo::Enigo>,
    /// 초기화 시점에 조회한 주 화면 크기
    screen: (i32, i32),
}

#[cfg(feature = "enigo")]
impl EnigoInjector {
    /// 새 EnigoInjector 생성
    pub fn new() -> Result<Self, CoreError> {
        use enigo::Mouse;

        let settings = enigo::Settings::default();
        let enigo = enigo::Enigo::new(&settings)
            .map_err(|e| CoreError::Injection(format!("입력 주입기 초기화 실패: {e}")))?;
        let screen = enigo
            .main_display()
            .map_err(|e| CoreError::Injection(format!("화면 크기 조회 실패: {e}")))?;

        Ok(Self {
            enigo: tokio::sync::Mutex::new(enigo),
            screen,
        })
    }

    /// 문자열 → enigo 키 매핑
    fn parse_key(key: &str) -> enigo::Key {
        match key.to_lowercase().as_str() {
            "enter" | "return" => enigo::Key::Return,
            "tab" => enigo::Key::Tab,
            "escape" | "esc" => enigo::Key::Escape,
            "space" => enigo::Key::Space,
            "up" | "uparrow" => enigo::Key::UpArrow,
            "down" | "downarrow" => enigo::Key::DownArrow,
            "left" | "leftarrow" => enigo::Key::LeftArrow,
            "right" | "rightarrow" => enigo::Key::RightArrow,
            "ctrl" | "control" => enigo::Key::Control,
            "shift" => enigo::Key::Shift,
            "alt" | "option" => enigo::Key::Alt,
            "meta" | "command" | "cmd" | "super" | "win" => enigo::Key::Meta,
            other => {
                // 단일 문자 → Unicode 키
                if let Some(ch) = other.chars().next() {
                    if other.chars().count() == 1 {
                        return enigo::Key::Unicode(ch);
                    }
                }
                debug!("알 수 없는 키: {other}, Unicode 'a' 폴백");
                enigo::Key::Unicode('a')
            }
        }
    }
}

#[cfg(feature = "enigo")]
#[async_trait]
impl InputInjector for EnigoInjector {
    async fn move_pointer(&self, x: i32, y: i32) -> Result<(), CoreError> {
        use enigo::Mouse;
        let (x, y) = clamp_to_screen(x, y, self.screen.0, self.screen.1);
        debug!(x, y, "[Enigo] 포인터 이동");
        let mut enigo = self.enigo.lock().await;
        enigo
            .move_mouse(x, y, enigo::Coordinate::Abs)
            .map_err(|e| CoreError::Injection(format!("포인터 이동 실패: {e}")))?;
        Ok(())
    }

    async fn move_pointer_smooth(&self, x: i32, y: i32) -> Result<(), CoreError> {
        use enigo::Mouse;
        let (tx, ty) = clamp_to_screen(x, y, self.screen.0, self.screen.1);
        debug!(x = tx, y = ty, "[Enigo] 포인터 애니메이션 이동");

        let (sx, sy) = {
            let enigo = self.enigo.lock().await;
            enigo
                .location()
                .map_err(|e| CoreError::Injection(format!("포인터 위치 조회 실패: {e}")))?
        };

        // 시작점에서 목표점까지 선형 보간
        for step in 1..=SMOOTH_MOVE_STEPS {
            let ix = sx + (tx - sx) * step / SMOOTH_MOVE_STEPS;
            let iy = sy + (ty - sy) * step / SMOOTH_MOVE_STEPS;
            {
                let mut enigo = self.enigo.lock().await;
                enigo
                    .move_mouse(ix, iy, enigo::Coordinate::Abs)
                    .map_err(|e| CoreError::Injection(format!("포인터 이동 실패: {e}")))?;
            }
            tokio::time::sleep(SMOOTH_MOVE_STEP_DELAY).await;
        }
        Ok(())
    }

    async fn click(&self, button: PointerButton) -> Result<(), CoreError> {
        use enigo::Mouse;
        debug!(?button, "[Enigo] 클릭");
        let btn = match button {
            PointerButton::Left => enigo::Button::Left,
            PointerButton::Right => enigo::Button::Right,
            PointerButton::Middle => enigo::Button::Middle,
        };
        let mut enigo = self.enigo.lock().await;
        enigo
            .button(btn, enigo::Direction::Click)
            .map_err(|e| CoreError::Injection(format!("클릭 실패: {e}")))?;
        Ok(())
    }

    async fn key_press(&self, key: &str) -> Result<(), CoreError> {
        use enigo::Keyboard;
        debug!(key, "[Enigo] 키 입력");
        let mut enigo = self.enigo.lock().await;
        enigo
            .key(Self::parse_key(key), enigo::Direction::Click)
            .map_err(|e| CoreError::Injection(format!("키 입력 실패: {e}")))?;
        Ok(())
    }

    async fn shortcut(&self, combo: ShortcutCombo) -> Result<(), CoreError> {
        use enigo::Keyboard;
        let keys = combo_keys(combo);
        debug!(?combo, ?keys, "[Enigo] 단축키 실행");
        let mut enigo = self.enigo.lock().await;
        // 모든 키 순서대로 Press → 역순 Release
        for key_str in keys {
            enigo
                .key(Self::parse_key(key_str), enigo::Direction::Press)
                .map_err(|e| CoreError::Injection(format!("단축키 Press 실패: {e}")))?;
        }
        for key_str in keys.iter().rev() {
            enigo
                .key(Self::parse_key(key_str), enigo::Direction::Release)
                .map_err(|e| CoreError::Injection(format!("단축키 Release 실패: {e}")))?;
        }
        Ok(())
    }

    fn screen_size(&self) -> (i32, i32) {
        self.screen
    }

    fn platform(&self) -> &str {
        #[cfg(target_os = "macos")]
        {
            "macos"
        }
        #[cfg(target_os = "windows")]
        {
            "windows"
        }
        #[cfg(target_os = "linux")]
        {
            "linux"
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            "unknown"
        }
    }
}

/// 플랫폼별 입력 주입기 생성 팩토리
///
/// `enigo` feature 활성화 시 실제 입력 주입기 반환,
/// 초기화 실패 또는 feature 비활성화 시 NoOp 주입기 반환.
pub fn create_platform_injector() -> std::sync::Arc<dyn InputInjector> {
    #[cfg(feature = "enigo")]
    {
        match EnigoInjector::new() {
            Ok(injector) => {
                tracing::info!("실제 입력 주입기 (enigo) 초기화 완료");
                return std::sync::Arc::new(injector);
            }
            Err(e) => {
                tracing::warn!("enigo 초기화 실패, NoOp 폴백: {e}");
            }
        }
    }
    std::sync::Arc::new(NoOpInjector::new())
}

// ============================================================
// 테스트
// ============================================================
