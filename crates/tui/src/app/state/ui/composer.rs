use crate::app::state::InputState;

use super::attachments::Attachments;
use super::commands::{match_commands, CommandSpec};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposerMode {
    Idle,
    CommandMenuOpen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuKey {
    Down,
    Up,
    Select,
    Dismiss,
}

/// Slash-command suggestions. `visible` implies a non-empty candidate list
/// and an in-range highlight.
#[derive(Default)]
pub struct CommandMenu {
    visible: bool,
    candidates: Vec<&'static CommandSpec>,
    highlight: usize,
}

impl CommandMenu {
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn candidates(&self) -> &[&'static CommandSpec] {
        &self.candidates
    }

    pub fn highlight(&self) -> usize {
        self.highlight
    }

    fn open(&mut self, candidates: Vec<&'static CommandSpec>) {
        self.visible = !candidates.is_empty();
        self.candidates = candidates;
        self.highlight = 0;
    }

    fn hide(&mut self) {
        self.visible = false;
        self.candidates.clear();
        self.highlight = 0;
    }
}

#[derive(Default)]
pub struct ComposerState {
    pub input: InputState,
    pub attachments: Attachments,
    pub submitting: bool,
    menu: CommandMenu,
}

impl ComposerState {
    pub fn text(&self) -> String {
        self.input.current()
    }

    pub fn menu(&self) -> &CommandMenu {
        &self.menu
    }

    pub fn mode(&self) -> ComposerMode {
        if self.menu.visible {
            ComposerMode::CommandMenuOpen
        } else {
            ComposerMode::Idle
        }
    }

    /// Re-evaluates the menu after any edit of the composer text.
    pub fn on_text_changed(&mut self) {
        let text = self.input.current();
        if !text.starts_with('/') {
            self.menu.hide();
            return;
        }
        let candidates = match_commands(&text);
        tracing::debug!(input = %text, matches = candidates.len(), "command menu evaluated");
        self.menu.open(candidates);
    }

    pub fn hide_menu(&mut self) {
        self.menu.hide();
    }

    /// Returns false when the menu is closed so the caller handles the key itself.
    pub fn handle_menu_key(&mut self, key: MenuKey) -> bool {
        if !self.menu.visible {
            return false;
        }
        let count = self.menu.candidates.len();
        match key {
            MenuKey::Down => {
                self.menu.highlight = (self.menu.highlight + 1) % count;
            }
            MenuKey::Up => {
                self.menu.highlight = (self.menu.highlight + count - 1) % count;
            }
            MenuKey::Select => {
                self.select(self.menu.highlight);
            }
            MenuKey::Dismiss => {
                self.menu.hide();
            }
        }
        true
    }

    pub fn select(&mut self, index: usize) {
        let Some(command) = self.menu.candidates.get(index).copied() else {
            return;
        };
        self.input.set_from(&format!("{} ", command.token));
        self.menu.hide();
    }

    pub fn append_transcript(&mut self, transcript: &str) {
        self.input.append_str(&format!("{transcript} "));
        self.on_text_changed();
    }
}
