use crate::interface::InterfaceKind;

use super::{InitStep, Model, DCS_ADDRESS_MODE_BITS};

/// ILI9341 display in Rgb565 color mode.
///
/// Most ILI9341 modules are wired BGR, so they usually want
/// [`ColorOrder::Bgr`](crate::options::ColorOrder::Bgr).
pub const ILI9341: Model = Model {
    name: "ILI9341",
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
        InitStep::Raw(0xEF, &[0x03, 0x80, 0x02]),
        InitStep::Raw(0xCF, &[0x00, 0xC1, 0x30]), // power control B
        InitStep::Raw(0xED, &[0x64, 0x03, 0x12, 0x81]), // power on sequence
        InitStep::Raw(0xE8, &[0x85, 0x00, 0x78]), // driver timing A
        InitStep::Raw(0xCB, &[0x39, 0x2C, 0x00, 0x34, 0x02]), // power control A
        InitStep::Raw(0xF7, &[0x20]), // pump ratio
        InitStep::Raw(0xEA, &[0x00, 0x00]), // driver timing B
        InitStep::Raw(0xC0, &[0x23]), // power control 1
        InitStep::Raw(0xC1, &[0x10]), // power control 2
        InitStep::Raw(0xC5, &[0x3E, 0x28]), // VCOM control 1
        InitStep::Raw(0xC7, &[0x86]), // VCOM control 2
        InitStep::AddressMode,
        InitStep::PixelFormat,
        InitStep::Raw(0xB1, &[0x00, 0x18]), // frame rate 79Hz
        InitStep::Raw(0xB6, &[0x08, 0x82, 0x27]), // display function control
        InitStep::Raw(0xF2, &[0x00]), // 3 gamma off
        InitStep::Raw(0x26, &[0x01]), // gamma curve 1
        InitStep::Raw(
            0xE0,
            &[
                0x0F, 0x31, 0x2B, 0x0C, 0x0E, 0x08, 0x4E, 0xF1, 0x37, 0x07, 0x10, 0x03, 0x0E, 0x09,
                0x00,
            ],
        ),
        InitStep::Raw(
            0xE1,
            &[
                0x00, 0x0E, 0x14, 0x03, 0x11, 0x07, 0x31, 0xC1, 0x48, 0x08, 0x0F, 0x0C, 0x31, 0x36,
                0x0F,
            ],
        ),
        InitStep::InvertMode,
        InitStep::ExitSleep,
        InitStep::DelayUs(120_000),
        InitStep::NormalMode,
        InitStep::Blank,
        InitStep::DisplayOn,
        InitStep::DelayUs(120_000),
    ],
    panel_offsets: &[],
};
