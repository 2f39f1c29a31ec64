use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::mode::Mode;

/// Global bindings, checked before the focused window sees a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleHelp,
    Refresh,
    CycleMode,
    SelectMode(Mode),
    FocusNext,
    FocusPrev,
    CopyLocation,
    OpenEditor,
    Escape,
}

pub fn global_action(key: &KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        // Ctrl-d / Ctrl-u belong to the windows
        _ if key.modifiers.contains(KeyModifiers::CONTROL) => return None,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('m') => Action::CycleMode,
        KeyCode::Char('1') => Action::SelectMode(Mode::WorkingChanges),
        KeyCode::Char('2') => Action::SelectMode(Mode::BranchChanges),
        KeyCode::Char('3') => Action::SelectMode(Mode::BrowseAll),
        KeyCode::Char('4') => Action::SelectMode(Mode::BrowseDocs),
        KeyCode::Tab => Action::FocusNext,
        KeyCode::BackTab => Action::FocusPrev,
        KeyCode::Char('y') => Action::CopyLocation,
        KeyCode::Char('o') => Action::OpenEditor,
        KeyCode::Esc => Action::Escape,
        _ => return None,
    };
    Some(action)
}

/// (keys, description) rows for the help overlay
pub const HELP: &[(&str, &str)] = &[
    ("Global", ""),
    ("q  Ctrl-c", "quit"),
    ("?", "toggle this help"),
    ("Tab / Shift-Tab", "focus next / previous window"),
    ("m", "cycle mode"),
    ("1 2 3 4", "working / branch / browse / docs"),
    ("r", "refresh files, content and stats"),
    ("y", "copy path:line of the selection"),
    ("o", "open selection in $EDITOR"),
    ("Esc", "clear error, focus file list"),
    ("", ""),
    ("Lists and views", ""),
    ("j / k", "down / up"),
    ("J / K", "down / up 5 rows"),
    ("g / G", "top / bottom"),
    ("Ctrl-d / Ctrl-u", "half page down / up"),
    ("Enter", "select row"),
    ("h / l", "collapse / expand folder"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn digits_select_modes() {
        assert_eq!(
            global_action(&key(KeyCode::Char('1'))),
            Some(Action::SelectMode(Mode::WorkingChanges))
        );
        assert_eq!(
            global_action(&key(KeyCode::Char('4'))),
            Some(Action::SelectMode(Mode::BrowseDocs))
        );
    }

    #[test]
    fn navigation_keys_fall_through() {
        assert_eq!(global_action(&key(KeyCode::Char('j'))), None);
        assert_eq!(global_action(&key(KeyCode::Enter)), None);
        let half_page = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(global_action(&half_page), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let k = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(global_action(&k), Some(Action::Quit));
    }
}
