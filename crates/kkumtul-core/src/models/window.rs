//! 창 모델.

use serde::{Deserialize, Serialize};

/// 플랫폼 불투명 창 핸들.
///
/// Windows에서는 HWND 값, 다른 플랫폼에서는 구현 정의 식별자.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowHandle(pub u64);

/// 보이는 창 정보.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowInfo {
    /// 창 핸들
    pub handle: WindowHandle,
    /// 제목 표시줄 텍스트
    pub title: String,
}

impl WindowInfo {
    /// 새 창 정보 생성
    pub fn new(handle: u64, title: impl Into<String>) -> Self {
        Self {
            handle: WindowHandle(handle),
            title: title.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_info_new() {
        let info = WindowInfo::new(42, "편집기");
        assert_eq!(info.handle, WindowHandle(42));
        assert_eq!(info.title, "편집기");
    }
}
