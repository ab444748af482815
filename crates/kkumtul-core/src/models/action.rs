//! 합성 액션 모델.
//!
//! Active 위상에서 디스패치되는 액션의 종류와 포인터 버튼을 정의한다.

use serde::{Deserialize, Serialize};

/// Active 위상에서 수행 가능한 합성 액션.
///
/// 구체적인 좌표/대상 선택은 디스패처가 수행한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyntheticAction {
    /// 화면 경계 내 무작위 위치로 포인터 이동
    MovePointer,
    /// 현재 위치에서 클릭
    Click,
    /// 다른 보이는 창으로 전환
    SwitchWindow,
    /// 전면 앱에 탭 순환 단축키 전송
    CycleTabs,
}

impl SyntheticAction {
    /// 저널용 짧은 이름
    pub fn name(&self) -> &'static str {
        match self {
            SyntheticAction::MovePointer => "move_pointer",
            SyntheticAction::Click => "click",
            SyntheticAction::SwitchWindow => "switch_window",
            SyntheticAction::CycleTabs => "cycle_tabs",
        }
    }
}

/// 포인터 버튼.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// 미리 정의된 단축키 조합.
///
/// 구체적인 키 시퀀스는 주입기 구현이 플랫폼에 맞게 결정한다
/// (예: AppSwitch = Windows/Linux Alt+Tab, macOS Cmd+Tab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShortcutCombo {
    /// 앱 전환 조합
    AppSwitch,
    /// 탭 순환 조합
    TabCycle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names() {
        assert_eq!(SyntheticAction::MovePointer.name(), "move_pointer");
        assert_eq!(SyntheticAction::CycleTabs.name(), "cycle_tabs");
    }

    #[test]
    fn action_serde_roundtrip() {
        let json = serde_json::to_string(&SyntheticAction::SwitchWindow).unwrap();
        let deser: SyntheticAction = serde_json::from_str(&json).unwrap();
        assert_eq!(deser, SyntheticAction::SwitchWindow);
    }
}
