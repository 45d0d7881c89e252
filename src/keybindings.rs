use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    ToggleLauncher,
    EscapeBack,
    CloseAllWindows,
    RaiseLimit,
    LowerLimit,
    // Confirm dialog navigation/actions
    ConfirmToggle,
    ConfirmLeft,
    ConfirmRight,
    ConfirmAccept,
    ConfirmCancel,
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
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
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
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    /// Return the first `KeyCombo` mapped to `action`, if any.
    pub fn first_combo(&self, action: Action) -> Option<KeyCombo> {
        self.map.get(&action).and_then(|list| list.first().cloned())
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(
            Quit,
            KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        kb.add(ToggleLauncher, KeyCombo::new(KeyCode::F(2), KeyModifiers::NONE));
        kb.add(EscapeBack, KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE));
        kb.add(
            CloseAllWindows,
            KeyCombo::new(KeyCode::Char('l'), KeyModifiers::CONTROL),
        );
        kb.add(
            RaiseLimit,
            KeyCombo::new(KeyCode::Char(']'), KeyModifiers::NONE),
        );
        kb.add(
            LowerLimit,
            KeyCombo::new(KeyCode::Char('['), KeyModifiers::NONE),
        );
        // Confirm overlay
        kb.add(
            ConfirmToggle,
            KeyCombo::new(KeyCode::Tab, KeyModifiers::NONE),
        );
        kb.add(
            ConfirmToggle,
            KeyCombo::new(KeyCode::BackTab, KeyModifiers::NONE),
        );
        kb.add(
            ConfirmLeft,
            KeyCombo::new(KeyCode::Left, KeyModifiers::NONE),
        );
        kb.add(
            ConfirmRight,
            KeyCombo::new(KeyCode::Right, KeyModifiers::NONE),
        );
        kb.add(
            ConfirmAccept,
            KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE),
        );
        kb.add(
            ConfirmAccept,
            KeyCombo::new(KeyCode::Char('y'), KeyModifiers::NONE),
        );
        kb.add(
            ConfirmCancel,
            KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE),
        );
        kb.add(
            ConfirmCancel,
            KeyCombo::new(KeyCode::Char('n'), KeyModifiers::NONE),
        );
        kb
    }
}
