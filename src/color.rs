//! Packed RGB565 colors.

use embedded_graphics_core::pixelcolor::{
    raw::{RawData, RawU16},
    Rgb565,
};

/// A color in the controller's native wire format: RGB565, high byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PackedColor([u8; 2]);

impl PackedColor {
    pub const BLACK: Self = color(0, 0, 0);
    pub const WHITE: Self = color(0xFF, 0xFF, 0xFF);

    /// Builds a packed color from its 16 bit value.
    pub const fn from_u16(value: u16) -> Self {
        Self(value.to_be_bytes())
    }

    /// The 16 bit value, `RRRRRGGG GGGBBBBB`.
    pub const fn to_u16(self) -> u16 {
        u16::from_be_bytes(self.0)
    }

    /// The two bytes as they go on the wire.
    pub const fn to_bytes(self) -> [u8; 2] {
        self.0
    }
}

/// Packs 8 bit channels into RGB565.
///
/// The low 3 bits of red and blue and the low 2 bits of green are dropped,
/// no rounding.
pub const fn color(r: u8, g: u8, b: u8) -> PackedColor {
    let value = ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3);
    PackedColor::from_u16(value)
}

impl From<Rgb565> for PackedColor {
    fn from(color: Rgb565) -> Self {
        Self::from_u16(RawU16::from(color).into_inner())
    }
}

impl From<PackedColor> for Rgb565 {
    fn from(color: PackedColor) -> Self {
        RawU16::new(color.to_u16()).into()
    }
}
