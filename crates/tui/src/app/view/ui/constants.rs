use ratatui::style::Color;

pub(super) const MAX_INPUT_HEIGHT: u16 = 6;
pub(super) const INPUT_PADDING_X: u16 = 2;
pub(super) const INPUT_PADDING_Y: u16 = 1;
pub(super) const INPUT_BG: Color = Color::Rgb(40, 40, 40);
pub(super) const PANEL_GAP: u16 = 1;
pub(super) const PANEL_MAX_LINES: u16 = 8;
