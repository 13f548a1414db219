use crate::app::state::{LogKind, PromptDialogState, PromptPurpose, RawFile};
use crate::app::util::{
    load_file, parse_dropped_paths, read_clipboard_image, split_paths, ClipboardImageError,
    MAX_CLIPBOARD_IMAGE_BYTES,
};
use crate::app::AppState;
use std::path::PathBuf;

pub fn open_file_prompt(app: &mut AppState) {
    if app.prompt_dialog.is_none() {
        app.prompt_dialog = Some(PromptDialogState::attach_files());
    }
}

pub fn submit_prompt(app: &mut AppState) {
    let Some(dialog) = app.prompt_dialog.take() else {
        return;
    };
    match dialog.purpose {
        PromptPurpose::AttachFiles => {
            let value = dialog.input.current();
            if value.trim().is_empty() {
                return;
            }
            match split_paths(&value) {
                Ok(paths) => attach_paths(app, paths),
                Err(error) => {
                    app.set_status(LogKind::Error, format!("Could not parse paths: {error}"));
                }
            }
        }
    }
}

fn add_files(app: &mut AppState, files: Vec<RawFile>) {
    if files.is_empty() {
        return;
    }
    tracing::debug!(count = files.len(), "attaching files");
    app.composer.attachments.add(files);
}

/// Loads each path and attaches the readable ones in order. Unreadable paths
/// are reported without blocking the rest.
pub fn attach_paths(app: &mut AppState, paths: Vec<PathBuf>) {
    let mut files = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();
    for path in paths {
        match load_file(&path) {
            Ok(file) => files.push(file),
            Err(error) => {
                tracing::warn!(%error, "attach failed");
                failures.push(error.to_string());
            }
        }
    }
    let attached = files.len();
    add_files(app, files);
    if !failures.is_empty() {
        app.set_status(LogKind::Error, failures.join("; "));
    } else if attached > 0 {
        app.set_status(LogKind::Status, format!("Attached {attached} file(s)"));
    }
}

/// Treats a paste made only of existing file paths as a drop. Returns false
/// when the paste should be inserted as text instead.
pub fn handle_drop_paste(app: &mut AppState, text: &str) -> bool {
    let Some(paths) = parse_dropped_paths(text) else {
        return false;
    };
    attach_paths(app, paths);
    true
}

pub fn paste_clipboard_image(app: &mut AppState) {
    let sequence = app.clipboard_image_count + 1;
    match read_clipboard_image(sequence, MAX_CLIPBOARD_IMAGE_BYTES) {
        Ok(file) => {
            app.clipboard_image_count = sequence;
            let name = file.name.clone();
            add_files(app, vec![file]);
            app.set_status(LogKind::Status, format!("Attached {name}"));
        }
        Err(ClipboardImageError::NotAvailable) => {
            app.set_status(LogKind::Status, "No image on the clipboard");
        }
        Err(error) => {
            tracing::warn!(%error, "clipboard image paste failed");
            app.set_status(LogKind::Error, error.to_string());
        }
    }
}

pub fn remove_attachment(app: &mut AppState, index: usize) {
    match app.composer.attachments.remove(index) {
        Ok(name) => app.set_status(LogKind::Status, format!("Removed {name}")),
        Err(error) => app.set_status(LogKind::Error, error.to_string()),
    }
}
