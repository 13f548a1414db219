use crate::app::state::RawFile;
use arboard::{Clipboard, Error as ClipboardError};
use base64::Engine;
use serde_json::Value;
use std::env;
use std::fs;
use std::process::Command;

pub const MAX_CLIPBOARD_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ClipboardImageError {
    #[error("no image on the clipboard")]
    NotAvailable,
    #[error("clipboard image is too large ({bytes} bytes, limit {max_bytes})")]
    TooLarge { bytes: usize, max_bytes: usize },
    #[error("clipboard error: {0}")]
    Clipboard(String),
    #[error("failed to encode clipboard image: {0}")]
    Encode(String),
}

const WINDOWS_CLIPBOARD_IMAGE_SCRIPT: &str = r#"
$img = Get-Clipboard -Format Image
if ($null -eq $img) { exit 3 }
$ms = New-Object System.IO.MemoryStream
$img.Save($ms, [System.Drawing.Imaging.ImageFormat]::Png)
$obj = @{ base64 = [Convert]::ToBase64String($ms.ToArray()) }
$obj | ConvertTo-Json -Compress
"#;

fn encode_png_rgba(width: usize, height: usize, rgba: &[u8]) -> Result<Vec<u8>, ClipboardImageError> {
    let width = u32::try_from(width)
        .map_err(|_| ClipboardImageError::Encode("image width is too large".to_string()))?;
    let height = u32::try_from(height)
        .map_err(|_| ClipboardImageError::Encode("image height is too large".to_string()))?;
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|error| ClipboardImageError::Encode(error.to_string()))?;
        writer
            .write_image_data(rgba)
            .map_err(|error| ClipboardImageError::Encode(error.to_string()))?;
    }
    Ok(bytes)
}

fn is_wsl_environment() -> bool {
    if env::var_os("WSL_DISTRO_NAME").is_some() || env::var_os("WSL_INTEROP").is_some() {
        return true;
    }
    fs::read_to_string("/proc/sys/kernel/osrelease")
        .map(|value| value.to_ascii_lowercase().contains("microsoft"))
        .unwrap_or(false)
}

fn check_size(bytes: Vec<u8>, max_bytes: usize) -> Result<Vec<u8>, ClipboardImageError> {
    if bytes.len() > max_bytes {
        return Err(ClipboardImageError::TooLarge {
            bytes: bytes.len(),
            max_bytes,
        });
    }
    Ok(bytes)
}

fn parse_windows_payload(output: &str, max_bytes: usize) -> Result<Vec<u8>, ClipboardImageError> {
    let value: Value = serde_json::from_str(output.trim()).map_err(|error| {
        ClipboardImageError::Clipboard(format!("failed to parse PowerShell payload: {error}"))
    })?;
    let encoded = value.get("base64").and_then(Value::as_str).ok_or_else(|| {
        ClipboardImageError::Clipboard("missing base64 in PowerShell payload".to_string())
    })?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|error| {
            ClipboardImageError::Clipboard(format!("failed to decode PowerShell payload: {error}"))
        })?;
    check_size(bytes, max_bytes)
}

fn read_windows_clipboard_png(max_bytes: usize) -> Result<Vec<u8>, ClipboardImageError> {
    let output = Command::new("powershell.exe")
        .args([
            "-NoProfile",
            "-NonInteractive",
            "-ExecutionPolicy",
            "Bypass",
            "-Command",
            WINDOWS_CLIPBOARD_IMAGE_SCRIPT,
        ])
        .output()
        .map_err(|error| {
            ClipboardImageError::Clipboard(format!("failed to launch powershell.exe: {error}"))
        })?;
    if output.status.code() == Some(3) {
        return Err(ClipboardImageError::NotAvailable);
    }
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ClipboardImageError::Clipboard(format!(
            "powershell.exe failed: {}",
            stderr.trim()
        )));
    }
    parse_windows_payload(&String::from_utf8_lossy(&output.stdout), max_bytes)
}

fn read_native_clipboard_png(max_bytes: usize) -> Result<Vec<u8>, ClipboardImageError> {
    let mut clipboard =
        Clipboard::new().map_err(|error| ClipboardImageError::Clipboard(error.to_string()))?;
    let image = match clipboard.get_image() {
        Ok(image) => image,
        Err(ClipboardError::ContentNotAvailable) => return Err(ClipboardImageError::NotAvailable),
        Err(error) => return Err(ClipboardImageError::Clipboard(error.to_string())),
    };
    let encoded = encode_png_rgba(image.width, image.height, image.bytes.as_ref())?;
    check_size(encoded, max_bytes)
}

/// Reads the clipboard image as a PNG attachment named `clipboard-<sequence>.png`.
pub fn read_clipboard_image(sequence: u64, max_bytes: usize) -> Result<RawFile, ClipboardImageError> {
    let bytes = match read_native_clipboard_png(max_bytes) {
        Ok(bytes) => bytes,
        Err(native_error) if is_wsl_environment() => match read_windows_clipboard_png(max_bytes) {
            Ok(bytes) => bytes,
            Err(ClipboardImageError::NotAvailable) => return Err(ClipboardImageError::NotAvailable),
            Err(windows_error) => match native_error {
                ClipboardImageError::NotAvailable => return Err(windows_error),
                other => return Err(other),
            },
        },
        Err(native_error) => return Err(native_error),
    };
    Ok(RawFile::new(
        format!("clipboard-{sequence}.png"),
        "image/png",
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::{encode_png_rgba, parse_windows_payload, ClipboardImageError};

    #[test]
    fn windows_payload_is_decoded() {
        let bytes = parse_windows_payload(r#"{"base64":"iVBORw0KGgo="}"#, 1024).expect("bytes");
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn windows_payload_checks_limit() {
        let error = parse_windows_payload(r#"{"base64":"iVBORw0KGgo="}"#, 1).expect_err("too large");
        match error {
            ClipboardImageError::TooLarge { bytes, max_bytes } => {
                assert_eq!(bytes, 8);
                assert_eq!(max_bytes, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rgba_pixels_encode_to_png() {
        let bytes = encode_png_rgba(2, 1, &[255, 0, 0, 255, 0, 255, 0, 255]).expect("png");
        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let reader = decoder.read_info().expect("header");
        assert_eq!((reader.info().width, reader.info().height), (2, 1));
    }
}
