//! 창 제어 포트.
//!
//! OS 창 열거/전환과 탭 순환을 위한 크로스 플랫폼 인터페이스.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::window::{WindowHandle, WindowInfo};

/// 창 제어기 — 창 열거/전환 인터페이스
///
/// 구현체: `WinApiWindowController` (Windows), `NoOpWindowController` (테스트/미지원 플랫폼)
#[async_trait]
pub trait WindowController: Send + Sync {
    /// 보이는 최상위 창 목록 (최소화된 창과 도구 창 제외)
    async fn list_visible_windows(&self) -> Result<Vec<WindowInfo>, CoreError>;

    /// 현재 전면 창
    async fn foreground_window(&self) -> Result<Option<WindowInfo>, CoreError>;

    /// 지정 창으로 포커스 전환.
    ///
    /// 백그라운드 프로세스에 대해 OS가 거부할 수 있다 —
    /// `CoreError::WindowControl`은 복구 가능하며 호출자가 대체 수단으로 폴백한다.
    async fn switch_to(&self, handle: WindowHandle) -> Result<(), CoreError>;

    /// 전면 앱에 탭 순환 단축키 전송.
    ///
    /// 탭 개념이 없는 앱에서는 no-op이 될 수 있다 (복구 가능).
    async fn cycle_tabs(&self) -> Result<(), CoreError>;

    /// 플랫폼 이름 (예: "windows", "noop")
    fn platform(&self) -> &str;
}
