use crate::app::state::InputState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    AttachFiles,
}

/// Single-line prompt drawn over the composer.
pub struct PromptDialogState {
    pub title: String,
    pub message: String,
    pub purpose: PromptPurpose,
    pub input: InputState,
}

impl PromptDialogState {
    pub fn attach_files() -> Self {
        Self {
            title: "Attach files".to_string(),
            message: "Paths separated by spaces; quote paths containing spaces.".to_string(),
            purpose: PromptPurpose::AttachFiles,
            input: InputState::default(),
        }
    }
}
