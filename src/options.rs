//! [ModelOptions] and other helper types.

use crate::models::Model;

/// [ModelOptions] are passed to the [`init`](Model::init) method of the
/// display model and to every address window update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub struct ModelOptions {
    /// Specify BGR or RGB subpixel order.
    pub color_order: ColorOrder,
    /// Invert display colors.
    pub invert_colors: ColorInversion,
    /// Display orientation.
    pub orientation: Orientation,
    /// Logical display size as seen in the configured orientation.
    pub display_size: (u16, u16),
    /// Panel offset inside the controller framebuffer, in the default
    /// (portrait) orientation. `None` picks the model's default for the size.
    pub display_offset: Option<(u16, u16)>,
}

impl ModelOptions {
    /// Creates model options for the entire framebuffer.
    pub fn full_size(model: &Model) -> Self {
        Self {
            color_order: ColorOrder::default(),
            invert_colors: ColorInversion::default(),
            orientation: Orientation::default(),
            display_size: model.framebuffer_size,
            display_offset: None,
        }
    }

    /// Panel size in the default (portrait) orientation.
    pub fn native_size(&self) -> (u16, u16) {
        let (w, h) = self.display_size;
        if self.orientation.landscape {
            (h, w)
        } else {
            (w, h)
        }
    }
}

/// Color inversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorInversion {
    /// Normal colors.
    #[default]
    Normal,
    /// Inverted colors.
    Inverted,
}

/// Subpixel order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorOrder {
    /// RGB subpixel order.
    #[default]
    Rgb,
    /// BGR subpixel order.
    Bgr,
}

/// Display orientation.
///
/// `landscape` exchanges row and column addressing, which turns a portrait
/// panel on its side. The mirror flags reverse the controller's column and
/// row address order. Which combination looks upright depends on how the
/// panel is mounted; a mirrored or upside-down picture is fixed by changing
/// these flags, the driver can't detect it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Orientation {
    /// Exchange row and column addressing.
    pub landscape: bool,
    /// Reverse column address order.
    pub mirror_x: bool,
    /// Reverse row address order.
    pub mirror_y: bool,
}

impl Orientation {
    /// Creates a default portrait orientation.
    pub const fn new() -> Self {
        Self {
            landscape: false,
            mirror_x: false,
            mirror_y: false,
        }
    }

    /// Exchanges rows and columns.
    #[must_use]
    pub const fn landscape(self) -> Self {
        Self {
            landscape: true,
            ..self
        }
    }

    /// Reverses column addressing.
    #[must_use]
    pub const fn mirror_x(self) -> Self {
        Self {
            mirror_x: true,
            ..self
        }
    }

    /// Reverses row addressing.
    #[must_use]
    pub const fn mirror_y(self) -> Self {
        Self {
            mirror_y: true,
            ..self
        }
    }
}

/// How the logical coordinate space maps onto controller memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryMapping {
    /// Rows and columns are swapped.
    pub swap_rows_and_columns: bool,
    /// Rows are reversed.
    pub reverse_rows: bool,
    /// Columns are reversed.
    pub reverse_columns: bool,
}

impl From<Orientation> for MemoryMapping {
    fn from(orientation: Orientation) -> Self {
        Self {
            swap_rows_and_columns: orientation.landscape,
            reverse_rows: orientation.mirror_y,
            reverse_columns: orientation.mirror_x,
        }
    }
}
