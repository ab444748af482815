//! 창 제어 구현.
//!
//! Windows에서는 Win32 API로 창을 열거/전환한다. 그 외 플랫폼과 dry-run
//! 모드에서는 `NoOpWindowController`가 사용되며, 창 전환이 불가능한 환경은
//! 디스패처가 앱 전환 단축키로 폴백한다.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use kkumtul_core::error::CoreError;
use kkumtul_core::models::action::ShortcutCombo;
use kkumtul_core::models::window::{WindowHandle, WindowInfo};
use kkumtul_core::ports::input_injector::InputInjector;
use kkumtul_core::ports::window_controller::WindowController;

/// 전환 대상에서 제외할 시스템 창 제목
const EXCLUDED_TITLES: &[&str] = &["Program Manager", "Windows Input Experience"];

// ============================================================
// NoOpWindowController — 테스트/미지원 플랫폼용
// ============================================================

/// No-Op 창 제어기 — 창 목록은 항상 비어 있고 전환은 거부
///
/// 창 열거 API가 없는 플랫폼과 dry-run 모드에서 사용. 탭 순환만
/// 단축키 주입으로 수행한다.
pub struct NoOpWindowController {
    /// 탭 순환 단축키용 주입기
    injector: Arc<dyn InputInjector>,
}

impl NoOpWindowController {
    /// 새 No-Op 창 제어기 생성
    pub fn new(injector: Arc<dyn InputInjector>) -> Self {
        Self { injector }
    }
}

#[async_trait]
impl WindowController for NoOpWindowController {
    async fn list_visible_windows(&self) -> Result<Vec<WindowInfo>, CoreError> {
        debug!("[NoOp] 창 목록 (항상 빈 결과)");
        Ok(vec![])
    }

    async fn foreground_window(&self) -> Result<Option<WindowInfo>, CoreError> {
        Ok(None)
    }

    async fn switch_to(&self, handle: WindowHandle) -> Result<(), CoreError> {
        debug!(handle = handle.0, "[NoOp] 창 전환 거부");
        Err(CoreError::WindowControl(
            "창 전환을 지원하지 않는 플랫폼".to_string(),
        ))
    }

    async fn cycle_tabs(&self) -> Result<(), CoreError> {
        self.injector.shortcut(ShortcutCombo::TabCycle).await
    }

    fn platform(&self) -> &str {
        "noop"
    }
}

// ============================================================
// WinApiWindowController — Windows 창 열거/전환
// ============================================================

/// Win32 API 기반 창 제어기
///
/// `EnumWindows`로 보이는 최상위 창을 수집하고 `SetForegroundWindow`로
/// 전환한다. 포커스 전환이 거부되면 `AttachThreadInput`으로 입력 큐를
/// 붙인 뒤 재시도한다.
#[cfg(target_os = "windows")]
pub struct WinApiWindowController {
    /// 탭 순환 단축키용 주입기
    injector: Arc<dyn InputInjector>,
}

#[cfg(target_os = "windows")]
impl WinApiWindowController {
    /// 새 Win32 창 제어기 생성
    pub fn new(injector: Arc<dyn InputInjector>) -> Self {
        Self { injector }
    }

    /// 전환 후보로 적합한 창인지 확인
    fn is_candidate(title: &str) -> bool {
        !title.is_empty() && !EXCLUDED_TITLES.contains(&title)
    }
}

#[cfg(target_os = "windows")]
mod winapi {
    use super::*;
    use windows_sys::Win32::Foundation::{HWND, LPARAM};
    use windows_sys::Win32::System::Threading::GetCurrentThreadId;
    use windows_sys::Win32::UI::Input::KeyboardAndMouse::AttachThreadInput;
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        EnumWindows, GetForegroundWindow, GetWindowLongW, GetWindowTextW,
        GetWindowThreadProcessId, IsIconic, IsWindowVisible, SetForegroundWindow, ShowWindow,
        GWL_EXSTYLE, SW_RESTORE, WS_EX_TOOLWINDOW,
    };

    /// 창 제목 읽기
    unsafe fn window_title(hwnd: HWND) -> String {
        let mut buf = [0u16; 512];
        let len = GetWindowTextW(hwnd, buf.as_mut_ptr(), buf.len() as i32);
        if len > 0 {
            String::from_utf16_lossy(&buf[..len as usize])
        } else {
            String::new()
        }
    }

    /// EnumWindows 콜백 — 보이는 일반 창만 수집
    unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> i32 {
        let windows = &mut *(lparam as *mut Vec<WindowInfo>);

        if IsWindowVisible(hwnd) == 0 || IsIconic(hwnd) != 0 {
            return 1; // 계속 열거
        }
        // 도구 창 (작업 표시줄에 없는 팝업류) 제외
        let ex_style = GetWindowLongW(hwnd, GWL_EXSTYLE) as u32;
        if ex_style & WS_EX_TOOLWINDOW != 0 {
            return 1;
        }

        let title = window_title(hwnd);
        if WinApiWindowController::is_candidate(&title) {
            windows.push(WindowInfo::new(hwnd as usize as u64, title));
        }
        1
    }

    /// 보이는 최상위 창 목록 수집
    pub fn list_windows() -> Result<Vec<WindowInfo>, CoreError> {
        let mut windows: Vec<WindowInfo> = Vec::new();
        unsafe {
            if EnumWindows(
                Some(enum_callback),
                &mut windows as *mut Vec<WindowInfo> as LPARAM,
            ) == 0
            {
                return Err(CoreError::WindowControl("EnumWindows 실패".to_string()));
            }
        }
        Ok(windows)
    }

    /// 현재 전면 창 조회
    pub fn foreground() -> Option<WindowInfo> {
        unsafe {
            let hwnd = GetForegroundWindow();
            if hwnd.is_null() {
                return None;
            }
            let title = window_title(hwnd);
            Some(WindowInfo::new(hwnd as usize as u64, title))
        }
    }

    /// 지정 창으로 포커스 전환
    ///
    /// `SetForegroundWindow`는 백그라운드 프로세스의 호출을 거부할 수
    /// 있으므로, 실패 시 전면 창 스레드에 입력 큐를 붙이고 재시도한다.
    pub fn switch_to(handle: WindowHandle) -> Result<(), CoreError> {
        let hwnd = handle.0 as usize as HWND;
        unsafe {
            if IsIconic(hwnd) != 0 {
                ShowWindow(hwnd, SW_RESTORE);
            }

            if SetForegroundWindow(hwnd) != 0 {
                return Ok(());
            }

            // AttachThreadInput 폴백
            let foreground = GetForegroundWindow();
            if foreground.is_null() {
                return Err(CoreError::WindowControl(
                    "SetForegroundWindow 거부됨".to_string(),
                ));
            }
            let current_thread = GetCurrentThreadId();
            let foreground_thread = GetWindowThreadProcessId(foreground, std::ptr::null_mut());

            AttachThreadInput(current_thread, foreground_thread, 1);
            let result = SetForegroundWindow(hwnd);
            AttachThreadInput(current_thread, foreground_thread, 0);

            if result != 0 {
                Ok(())
            } else {
                Err(CoreError::WindowControl(
                    "SetForegroundWindow 거부됨 (AttachThreadInput 폴백 포함)".to_string(),
                ))
            }
        }
    }
}

#[cfg(target_os = "windows")]
#[async_trait]
impl WindowController for WinApiWindowController {
    async fn list_visible_windows(&self) -> Result<Vec<WindowInfo>, CoreError> {
        let windows = winapi::list_windows()?;
        debug!(count = windows.len(), "창 목록 수집");
        Ok(windows)
    }

    async fn foreground_window(&self) -> Result<Option<WindowInfo>, CoreError> {
        Ok(winapi::foreground())
    }

    async fn switch_to(&self, handle: WindowHandle) -> Result<(), CoreError> {
        winapi::switch_to(handle)
    }

    async fn cycle_tabs(&self) -> Result<(), CoreError> {
        self.injector.shortcut(ShortcutCombo::TabCycle).await
    }

    fn platform(&self) -> &str {
        "windows"
    }
}

/// 플랫폼별 창 제어기 생성 팩토리
///
/// Windows에서는 Win32 제어기, 그 외 플랫폼에서는 NoOp 제어기를 반환한다.
/// NoOp 환경에서의 창 전환은 디스패처가 앱 전환 단축키로 폴백한다.
pub fn create_platform_window_controller(
    injector: Arc<dyn InputInjector>,
) -> Arc<dyn WindowController> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(WinApiWindowController::new(injector))
    }

    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(NoOpWindowController::new(injector))
    }
}

// ============================================================
// 테스트
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::injector::NoOpInjector;

    #[tokio::test]
    async fn noop_controller_lists_nothing() {
        let controller = NoOpWindowController::new(Arc::new(NoOpInjector::new()));
        assert!(controller.list_visible_windows().await.unwrap().is_empty());
        assert!(controller.foreground_window().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn noop_controller_rejects_switch() {
        let controller = NoOpWindowController::new(Arc::new(NoOpInjector::new()));
        let err = controller.switch_to(WindowHandle(42)).await.unwrap_err();
        assert!(matches!(err, CoreError::WindowControl(_)));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn noop_controller_cycle_tabs_ok() {
        let controller = NoOpWindowController::new(Arc::new(NoOpInjector::new()));
        assert!(controller.cycle_tabs().await.is_ok());
    }

    #[test]
    fn factory_creates_controller() {
        let controller = create_platform_window_controller(Arc::new(NoOpInjector::new()));
        assert!(!controller.platform().is_empty());
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn excluded_titles_are_rejected() {
        assert!(!WinApiWindowController::is_candidate(""));
        assert!(!WinApiWindowController::is_candidate("Program Manager"));
        assert!(WinApiWindowController::is_candidate("메모장"));
    }
}
