pub(crate) mod clipboard;
pub(crate) mod files;
pub(crate) mod text;

pub(crate) use clipboard::{read_clipboard_image, ClipboardImageError, MAX_CLIPBOARD_IMAGE_BYTES};
pub(crate) use files::{load_file, parse_dropped_paths, split_paths};
pub(crate) use text::{format_file_size, sanitize_paste, text_width};
