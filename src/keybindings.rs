use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Quit,
    Back,
    OpenLevel,
    OpenLevelDetail,
    OpenRank,
    OpenRankDetail,
    OpenMatching,
    ShowMessage,
    CloseMessage,
    ToggleWaitForHide,
    ResetWindows,
    ClearBackSequence,
    HideAll,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::Back => "Back",
            Action::OpenLevel => "Open level select",
            Action::OpenLevelDetail => "Open level detail",
            Action::OpenRank => "Open rank",
            Action::OpenRankDetail => "Open own rank detail",
            Action::OpenMatching => "Open matching",
            Action::ShowMessage => "Show message (delayed)",
            Action::CloseMessage => "Close message",
            Action::ToggleWaitForHide => "Toggle wait for hide",
            Action::ResetWindows => "Reset windows",
            Action::ClearBackSequence => "Clear back sequence",
            Action::HideAll => "Hide all but fixed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(Quit, KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        kb.add(Quit, KeyCombo::plain('q'));
        kb.add(Back, KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE));
        kb.add(Back, KeyCombo::new(KeyCode::Backspace, KeyModifiers::NONE));
        kb.add(OpenLevel, KeyCombo::plain('l'));
        kb.add(OpenLevelDetail, KeyCombo::plain('d'));
        kb.add(OpenRank, KeyCombo::plain('r'));
        kb.add(OpenRankDetail, KeyCombo::plain('o'));
        kb.add(OpenMatching, KeyCombo::plain('m'));
        kb.add(ShowMessage, KeyCombo::plain('b'));
        kb.add(CloseMessage, KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE));
        kb.add(ToggleWaitForHide, KeyCombo::plain('w'));
        kb.add(ResetWindows, KeyCombo::plain('z'));
        kb.add(ClearBackSequence, KeyCombo::plain('c'));
        kb.add(HideAll, KeyCombo::plain('h'));
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        self.map
            .iter()
            .find(|(_, list)| list.iter().any(|c| c.matches(key)))
            .map(|(action, _)| *action)
    }

    /// Actions with their key labels, in a stable order for display.
    pub fn help_entries(&self) -> Vec<(Action, Vec<String>)> {
        let mut v: Vec<_> = self
            .map
            .iter()
            .map(|(act, list)| (*act, list.iter().map(|c| c.display()).collect()))
            .collect();
        v.sort_by_key(|(act, _)| *act);
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_quit_and_back() {
        let kb = KeyBindings::default();
        let ev = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(kb.matches(Action::Quit, &ev));
        let ev = KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(kb.action_for_key(&ev), Some(Action::Back));
    }

    #[test]
    fn unbound_key_has_no_action() {
        let kb = KeyBindings::default();
        let ev = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(kb.action_for_key(&ev), None);
    }

    #[test]
    fn help_entries_are_sorted_and_labelled() {
        let kb = KeyBindings::default();
        let entries = kb.help_entries();
        assert_eq!(entries.first().map(|(a, _)| *a), Some(Action::Quit));
        let back = entries.iter().find(|(a, _)| *a == Action::Back);
        assert_eq!(
            back.map(|(_, keys)| keys.clone()),
            Some(vec!["Esc".to_string(), "Backspace".to_string()])
        );
    }
}
