use crate::interface::InterfaceKind;

use super::{InitStep, Model, PanelOffset, DCS_ADDRESS_MODE_BITS};

/// ST7735 display in Rgb565 color mode.
///
/// The controller addresses 132x162 cells. Common 128x160 panels sit at the
/// framebuffer origin, so mirrored orientations shift them by the unused
/// columns or rows.
pub const ST7735: Model = Model {
    name: "ST7735",
    framebuffer_size: (132, 162),
    reset_duration: 10,
    reset_settle: 150_000,
    interfaces: &[
        InterfaceKind::Serial4Line,
        InterfaceKind::Parallel8Bit,
        InterfaceKind::Parallel16Bit,
    ],
    address_mode: DCS_ADDRESS_MODE_BITS,
    init_sequence: &[
        InitStep::ExitSleep,
        // SLPOUT needs 120ms before the next command
        InitStep::DelayUs(120_000),
        InitStep::PixelFormat,
        InitStep::DelayUs(50_000),
        InitStep::AddressMode,
        InitStep::InvertMode,
        InitStep::DelayUs(10_000),
        InitStep::NormalMode,
        InitStep::DelayUs(10_000),
        InitStep::Blank,
        InitStep::DisplayOn,
        InitStep::DelayUs(120_000),
    ],
    panel_offsets: &[PanelOffset {
        size: (128, 160),
        offset: (0, 0),
    }],
};
