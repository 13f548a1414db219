use base64::Engine;
use std::collections::BTreeSet;
use std::io::Cursor;
use std::sync::Arc;
use thiserror::Error;

/// A file as acquired from the picker, a drop, or the clipboard.
#[derive(Clone, Debug)]
pub struct RawFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub content: Arc<[u8]>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        let content: Arc<[u8]> = content.into();
        Self {
            name: name.into(),
            size: content.len() as u64,
            mime_type: mime_type.into(),
            content,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PreviewId(u64);

/// Image preview resource. Move-only: releasing consumes it.
#[derive(Debug)]
pub struct PreviewHandle {
    id: PreviewId,
    data_url: String,
    dimensions: Option<(u32, u32)>,
}

impl PreviewHandle {
    #[cfg(test)]
    pub fn id(&self) -> PreviewId {
        self.id
    }

    #[cfg(test)]
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }
}

#[derive(Default)]
pub struct PreviewRegistry {
    next_id: u64,
    outstanding: BTreeSet<PreviewId>,
    released: u64,
}

impl PreviewRegistry {
    pub fn allocate(&mut self, mime_type: &str, content: &[u8]) -> PreviewHandle {
        self.next_id += 1;
        let id = PreviewId(self.next_id);
        self.outstanding.insert(id);
        let data_url = format!(
            "data:{mime_type};base64,{}",
            base64::engine::general_purpose::STANDARD.encode(content)
        );
        let dimensions = if mime_type == "image/png" {
            png_dimensions(content)
        } else {
            None
        };
        tracing::debug!(preview = id.0, mime_type, "preview allocated");
        PreviewHandle {
            id,
            data_url,
            dimensions,
        }
    }

    pub fn release(&mut self, handle: PreviewHandle) {
        let was_outstanding = self.outstanding.remove(&handle.id);
        debug_assert!(was_outstanding, "preview {:?} released twice", handle.id);
        self.released += 1;
        tracing::debug!(
            preview = handle.id.0,
            bytes = handle.data_url.len(),
            released = self.released,
            "preview released"
        );
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    #[cfg(test)]
    pub fn is_outstanding(&self, id: PreviewId) -> bool {
        self.outstanding.contains(&id)
    }

    #[cfg(test)]
    pub fn released(&self) -> u64 {
        self.released
    }
}

fn png_dimensions(content: &[u8]) -> Option<(u32, u32)> {
    let reader = png::Decoder::new(Cursor::new(content)).read_info().ok()?;
    let info = reader.info();
    Some((info.width, info.height))
}

#[derive(Debug)]
pub struct Attachment {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub content: Arc<[u8]>,
    pub preview: Option<PreviewHandle>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("no attachment at position {} (have {len})", .index + 1)]
    IndexOutOfRange { index: usize, len: usize },
}

/// Pending attachments of the composer plus the previews they hold.
#[derive(Default)]
pub struct Attachments {
    items: Vec<Attachment>,
    previews: PreviewRegistry,
}

impl Attachments {
    pub fn items(&self) -> &[Attachment] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    pub fn add(&mut self, files: Vec<RawFile>) {
        for file in files {
            let preview = file
                .mime_type
                .starts_with("image/")
                .then(|| self.previews.allocate(&file.mime_type, &file.content));
            tracing::debug!(name = %file.name, size = file.size, "attachment added");
            self.items.push(Attachment {
                name: file.name,
                size: file.size,
                mime_type: file.mime_type,
                content: file.content,
                preview,
            });
        }
    }

    pub fn remove(&mut self, index: usize) -> Result<String, AttachmentError> {
        if index >= self.items.len() {
            return Err(AttachmentError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let attachment = self.items.remove(index);
        if let Some(preview) = attachment.preview {
            self.previews.release(preview);
        }
        Ok(attachment.name)
    }

    /// Empties the live list without releasing previews; the caller owns the result.
    pub fn take_all(&mut self) -> Vec<Attachment> {
        std::mem::take(&mut self.items)
    }

    pub fn release_all(&mut self, attachments: Vec<Attachment>) {
        for preview in attachments.into_iter().filter_map(|item| item.preview) {
            self.previews.release(preview);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AttachmentError, Attachments, RawFile};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, width, height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().expect("png header");
            let data = vec![0u8; (width * height * 4) as usize];
            writer.write_image_data(&data).expect("png data");
        }
        bytes
    }

    fn image(name: &str) -> RawFile {
        RawFile::new(name, "image/png", png_bytes(3, 2))
    }

    fn pdf(name: &str) -> RawFile {
        RawFile::new(name, "application/pdf", b"%PDF-1.4".to_vec())
    }

    #[test]
    fn add_allocates_previews_only_for_images() {
        let mut attachments = Attachments::default();
        attachments.add(vec![image("a.png"), pdf("b.pdf")]);

        assert_eq!(attachments.len(), 2);
        let first = attachments.items()[0].preview.as_ref().expect("image preview");
        assert!(first.data_url().starts_with("data:image/png;base64,"));
        assert_eq!(first.dimensions(), Some((3, 2)));
        assert!(attachments.items()[1].preview.is_none());
        assert_eq!(attachments.previews().outstanding(), 1);
    }

    #[test]
    fn add_appends_after_existing_entries() {
        let mut attachments = Attachments::default();
        attachments.add(vec![pdf("one.pdf")]);
        attachments.add(vec![pdf("two.pdf"), pdf("three.pdf")]);
        let names: Vec<_> = attachments.items().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["one.pdf", "two.pdf", "three.pdf"]);
    }

    #[test]
    fn remove_image_releases_its_preview_once() {
        let mut attachments = Attachments::default();
        attachments.add(vec![image("fileA.png"), pdf("fileB.pdf")]);
        let preview_id = attachments.items()[0].preview.as_ref().map(|p| p.id());

        assert_eq!(attachments.remove(0), Ok("fileA.png".to_string()));

        let names: Vec<_> = attachments.items().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["fileB.pdf"]);
        assert!(!attachments.previews().is_outstanding(preview_id.expect("id")));
        assert_eq!(attachments.previews().released(), 1);
        assert_eq!(attachments.previews().outstanding(), 0);
    }

    #[test]
    fn remove_out_of_range_leaves_list_untouched() {
        let mut attachments = Attachments::default();
        attachments.add(vec![pdf("only.pdf")]);
        assert_eq!(
            attachments.remove(1),
            Err(AttachmentError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(attachments.len(), 1);
    }

    #[test]
    fn take_all_hands_over_previews_without_releasing() {
        let mut attachments = Attachments::default();
        attachments.add(vec![image("a.png"), image("b.png")]);
        let snapshot = attachments.take_all();

        assert!(attachments.is_empty());
        assert_eq!(attachments.previews().outstanding(), 2);

        attachments.release_all(snapshot);
        assert_eq!(attachments.previews().outstanding(), 0);
        assert_eq!(attachments.previews().released(), 2);
    }

    #[test]
    fn non_png_image_has_preview_without_dimensions() {
        let mut attachments = Attachments::default();
        attachments.add(vec![RawFile::new("photo.jpg", "image/jpeg", vec![0xff, 0xd8])]);
        let preview = attachments.items()[0].preview.as_ref().expect("preview");
        assert_eq!(preview.dimensions(), None);
        assert_eq!(preview.data_url(), "data:image/jpeg;base64,/9g=");
    }
}
