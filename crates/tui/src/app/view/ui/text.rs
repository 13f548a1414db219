use crate::app::util::text_width;

pub(super) fn pad_to_width(mut text: String, width: usize) -> String {
    let current = text_width(&text);
    if current >= width {
        return text;
    }
    text.push_str(&" ".repeat(width - current));
    text
}
