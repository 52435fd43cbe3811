use crate::interface::InterfaceKind;

use super::{InitStep, Model, PanelOffset, DCS_ADDRESS_MODE_BITS};

/// ST7789 display in Rgb565 color mode.
pub const ST7789: Model = Model {
    name: "ST7789",
    framebuffer_size: (240, 320),
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
        InitStep::DelayUs(10_000),
        InitStep::PixelFormat,
        InitStep::DelayUs(50_000),
        InitStep::AddressMode,
        InitStep::InvertMode,
        InitStep::DelayUs(10_000),
        InitStep::NormalMode,
        InitStep::DelayUs(10_000),
        InitStep::Blank,
        InitStep::DisplayOn,
        // DISPON requires some time otherwise we risk SPI data issues
        InitStep::DelayUs(120_000),
    ],
    panel_offsets: &[PanelOffset {
        size: (135, 240),
        offset: (52, 40),
    }],
};
