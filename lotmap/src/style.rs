use crate::model::{Color, LotStatus, ShapeStyle};

pub const AVAILABLE: Color = Color::rgb(0x2e, 0xcc, 0x71);
pub const RESERVED: Color = Color::rgb(0xf1, 0xc4, 0x0f);
pub const SOLD: Color = Color::rgb(0xe7, 0x4c, 0x3c);
pub const ACCENT: Color = Color::rgb(0x2e, 0x7d, 0xff);
pub const COPY_FLASH: Color = Color::rgb(0x00, 0xff, 0x00);
pub const PASTE_FLASH: Color = Color::rgb(0xff, 0x99, 0x00);

pub fn for_status(status: LotStatus) -> ShapeStyle {
    let c = match status {
        LotStatus::Available => AVAILABLE,
        LotStatus::Reserved => RESERVED,
        LotStatus::Sold => SOLD,
    };
    ShapeStyle { color: c, weight: 2.0, fill_opacity: 0.25, fill_color: Some(c) }
}

/// Stroke applied to the selected lot; fill stays that of its status.
pub fn selected(status: LotStatus) -> ShapeStyle {
    ShapeStyle { color: ACCENT, weight: 4.0, ..for_status(status) }
}

pub fn draft() -> ShapeStyle {
    ShapeStyle { color: ACCENT, weight: 2.0, fill_opacity: 0.15, fill_color: None }
}

pub fn copy_flash(base: ShapeStyle) -> ShapeStyle {
    ShapeStyle { color: COPY_FLASH, weight: 6.0, ..base }
}

pub fn paste_flash() -> ShapeStyle {
    ShapeStyle { color: PASTE_FLASH, weight: 4.0, ..draft() }
}

pub fn plot() -> ShapeStyle {
    ShapeStyle { color: ACCENT, weight: 2.0, fill_opacity: 0.06, fill_color: None }
}

pub fn plot_draft() -> ShapeStyle {
    ShapeStyle { color: ACCENT, weight: 2.0, fill_opacity: 0.08, fill_color: None }
}
