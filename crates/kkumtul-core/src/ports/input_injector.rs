//! 입력 주입 포트.
//!
//! 합성 포인터/키보드 이벤트 생성을 위한 크로스 플랫폼 인터페이스.
//! 모든 좌표는 구현체가 화면 경계로 클램프해야 한다.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::action::{PointerButton, ShortcutCombo};

/// 입력 주입기 — 합성 마우스/키보드 이벤트 인터페이스
///
/// 구현체: `EnigoInjector` (실제 입력), `NoOpInjector` (테스트용)
#[async_trait]
pub trait InputInjector: Send + Sync {
    /// 포인터 즉시 이동 (화면 경계로 클램프)
    async fn move_pointer(&self, x: i32, y: i32) -> Result<(), CoreError>;

    /// 포인터 애니메이션 이동 (작은 단계로 보간, 화면 경계로 클램프)
    async fn move_pointer_smooth(&self, x: i32, y: i32) -> Result<(), CoreError>;

    /// 현재 위치에서 클릭
    async fn click(&self, button: PointerButton) -> Result<(), CoreError>;

    /// 단일 키 입력
    async fn key_press(&self, key: &str) -> Result<(), CoreError>;

    /// 미리 정의된 단축키 조합 실행
    async fn shortcut(&self, combo: ShortcutCombo) -> Result<(), CoreError>;

    /// 주 화면 크기 (width, height) — 좌표 클램프 기준
    fn screen_size(&self) -> (i32, i32);

    /// 플랫폼 이름 (예: "macos", "windows", "linux", "noop")
    fn platform(&self) -> &str;
}
