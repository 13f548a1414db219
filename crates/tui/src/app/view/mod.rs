pub(crate) mod markdown;
pub(crate) mod render;
pub(crate) mod ui;

pub(crate) use ui::draw_ui;
