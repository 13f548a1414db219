mod attachments;
mod commands;
mod composer;
mod dialogs;

pub use attachments::{Attachment, RawFile};
pub use commands::{command_row, COMMANDS};
pub use composer::{ComposerMode, ComposerState, MenuKey};
pub use dialogs::{PromptDialogState, PromptPurpose};
