pub(crate) mod conversation;
pub(crate) mod input;
pub(crate) mod log;
pub(crate) mod ui;

pub(crate) use conversation::{Conversation, Message, Role};
pub(crate) use input::InputState;
pub(crate) use log::{LogColor, LogKind, LogLine, LogSpan, LogTone};
pub(crate) use ui::{
    command_row, Attachment, ComposerMode, ComposerState, MenuKey, PromptDialogState,
    PromptPurpose, RawFile, COMMANDS,
};
