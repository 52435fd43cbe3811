#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

//! This crate provides a buffer-free asynchronous driver for small SPI TFT
//! controllers: ST7735, ST7789 and ILI9341.
//!
//! The host never holds a framebuffer. Every drawing call sets an address
//! window in the controller's own memory and streams pixel data into it
//! through small fixed-size buffers, so drawing a full screen rectangle uses
//! the same few hundred bytes of stack as drawing a single pixel.
//!
//! ## Example
//! ```rust,ignore
//! use st77xx::{color, interface::SpiInterface, models::ST7735, options::Orientation, Builder};
//!
//! let di = SpiInterface::new(spi_bus, dc, cs);
//! let mut display = Builder::new(ST7735, di)
//!     .display_size(160, 128)
//!     .orientation(Orientation::new().landscape().mirror_y())
//!     .reset_pin(rst)
//!     .init(&mut delay)
//!     .await?;
//!
//! display.rect(10, 10, 50, 30, color(255, 0, 0), true).await?;
//! display.text(0, 0, "Hello!", color(255, 255, 255), color(0, 0, 0)).await?;
//! ```
//!
//! ## Fast and slow paths
//!
//! Fills, horizontal and vertical lines, filled circles and triangles, text
//! with a background and images all stream bounded bursts into one window
//! per span. Bresenham lines, outlined circles and background-preserving
//! upscaled text address pixels individually and cost one window per pixel
//! or span. Neither path clips: coordinates outside the panel are sent to
//! the controller as they are.

#[macro_use]
mod fmt;

pub mod interface;

use embedded_hal::digital::OutputPin as BlockingOutputPin;
use embedded_hal_async::delay::DelayNs as AsyncDelayNs;

pub mod options;
use crate::options::{ColorInversion, MemoryMapping};

mod builder;
pub use builder::*;

mod burst;
pub use burst::{CHUNK_SIZE, GLYPH_BUF_SIZE};

pub mod color;
pub use color::{color, PackedColor};

pub mod dcs;
use crate::dcs::{InterfaceExt, SetAddressMode};

mod draw;
pub mod font;
mod image;
pub use image::ImageError;
pub mod models;
use models::Model;
mod text;

#[cfg(test)]
mod _mock;

/// An address window in logical display coordinates, both corners inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    /// Left column.
    pub x0: u16,
    /// Top row.
    pub y0: u16,
    /// Right column, inclusive.
    pub x1: u16,
    /// Bottom row, inclusive.
    pub y1: u16,
}

/// Display driver structure.
pub struct Display<DI, RST>
where
    DI: interface::Interface,
    RST: BlockingOutputPin,
{
    /// The display interface.
    di: DI,
    /// The display model.
    model: Model,
    /// The reset pin.
    rst: Option<RST>,
    /// Display options.
    options: options::ModelOptions,
    /// Panel offset in controller coordinates for the current orientation.
    window_offset: (u16, u16),
    /// Current MADCTL value.
    madctl: SetAddressMode,
    /// Last address window set.
    window: Window,
    /// Chip-select is asserted.
    selected: bool,
    /// Sleep state.
    sleeping: bool,
}

impl<DI, RST> Display<DI, RST>
where
    DI: interface::Interface,
    RST: BlockingOutputPin,
{
    /// Returns the logical display size as `(width, height)`.
    pub fn size(&self) -> (u16, u16) {
        self.options.display_size
    }

    /// Returns the options the display was initialized with.
    pub fn options(&self) -> &options::ModelOptions {
        &self.options
    }

    /// Returns the model record the display was initialized with.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Returns the current display orientation.
    pub fn orientation(&self) -> options::Orientation {
        self.options.orientation
    }

    /// Returns the current value of the address mode register.
    pub fn address_mode(&self) -> SetAddressMode {
        self.madctl
    }

    /// Returns the last address window set, in logical coordinates.
    pub fn address_window(&self) -> Window {
        self.window
    }

    /// Sets the display orientation.
    ///
    /// The logical display size follows the orientation: switching between
    /// portrait and landscape swaps width and height.
    pub async fn set_orientation(
        &mut self,
        orientation: options::Orientation,
    ) -> Result<(), InitError<DI::Error, RST::Error>> {
        let mut options = self.options;
        if options.orientation.landscape != orientation.landscape {
            let (w, h) = options.display_size;
            options.display_size = (h, w);
        }
        options.orientation = orientation;

        let madctl = self
            .model
            .address_mode(&options)
            .map_err(InitError::InvalidConfiguration)?;

        self.ensure_selected().await.map_err(InitError::Interface)?;
        self.di
            .write_command(madctl)
            .await
            .map_err(InitError::Interface)?;

        self.options = options;
        self.madctl = madctl;
        self.window_offset = window_offset(&self.model, &self.options, self.panel_offset());
        Ok(())
    }

    /// Switches color inversion on or off.
    pub async fn set_inversion(&mut self, inversion: ColorInversion) -> Result<(), DI::Error> {
        self.ensure_selected().await?;
        self.di
            .write_command(dcs::SetInvertMode::new(inversion))
            .await?;
        self.options.invert_colors = inversion;
        Ok(())
    }

    /// Sets the address window for display RAM access and starts a memory
    /// write.
    ///
    /// Any pixel data sent afterwards fills the window row by row. The window
    /// is not checked against the display bounds: coordinates are passed to
    /// the controller unchanged apart from the panel offset.
    pub async fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), DI::Error> {
        self.ensure_selected().await?;

        let (ox, oy) = self.window_offset;
        Model::update_address_window(
            &mut self.di,
            x0.wrapping_add(ox),
            y0.wrapping_add(oy),
            x1.wrapping_add(ox),
            y1.wrapping_add(oy),
        )
        .await?;
        self.di.write_command(dcs::WriteMemoryStart).await?;

        self.window = Window { x0, y0, x1, y1 };
        Ok(())
    }

    /// Sends a raw pixel data slice to the specified rectangular region of the display.
    pub async fn show_raw_data(
        &mut self,
        sx: u16,
        sy: u16,
        ex: u16,
        ey: u16,
        pixel_data: &[u8],
    ) -> Result<(), DI::Error> {
        self.set_window(sx, sy, ex, ey).await?;
        self.di.send_data_slice(pixel_data).await
    }

    /// Fills the whole display with one color.
    pub async fn fill(&mut self, color: PackedColor) -> Result<(), DI::Error> {
        let (w, h) = self.options.display_size;
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.set_window(0, 0, w - 1, h - 1).await?;
        burst::repeat_color(&mut self.di, color, usize::from(w) * usize::from(h)).await
    }

    /// Releases the chip-select line so other devices can use the bus.
    ///
    /// The next drawing call asserts it again, or call
    /// [`acquire_select`](Self::acquire_select) explicitly.
    pub async fn release_select(&mut self) -> Result<(), DI::Error> {
        if self.selected {
            self.di.deselect().await?;
            self.selected = false;
            debug!("chip-select released");
        }
        Ok(())
    }

    /// Asserts the chip-select line.
    pub async fn acquire_select(&mut self) -> Result<(), DI::Error> {
        self.ensure_selected().await
    }

    /// Returns `true` while the driver holds the chip-select line.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Returns `true` if the display is currently in sleep mode.
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Puts the display into sleep mode.
    pub async fn sleep<DLY: AsyncDelayNs>(&mut self, delay: &mut DLY) -> Result<(), DI::Error> {
        self.ensure_selected().await?;
        Model::sleep(&mut self.di, delay).await?;
        self.sleeping = true;
        Ok(())
    }

    /// Wakes the display from sleep mode.
    pub async fn wake<DLY: AsyncDelayNs>(&mut self, delay: &mut DLY) -> Result<(), DI::Error> {
        self.ensure_selected().await?;
        Model::wake(&mut self.di, delay).await?;
        self.sleeping = false;
        Ok(())
    }

    /// Releases the display interface and reset pin.
    ///
    /// Chip-select is left as it is; call
    /// [`release_select`](Self::release_select) first when the bus is shared.
    pub fn release(self) -> (DI, Option<RST>) {
        (self.di, self.rst)
    }

    /// Returns a mutable reference to the underlying display interface for sending raw commands.
    /// # Safety
    /// Commands sent this way can desynchronize the driver's view of the
    /// address mode and window from the controller's.
    pub unsafe fn raw_interface_mut(&mut self) -> &mut DI {
        &mut self.di
    }

    /// Asserts chip-select if a previous [`release_select`](Self::release_select) dropped it.
    async fn ensure_selected(&mut self) -> Result<(), DI::Error> {
        if !self.selected {
            self.di.select().await?;
            self.selected = true;
            debug!("chip-select acquired");
        }
        Ok(())
    }

    fn panel_offset(&self) -> (u16, u16) {
        self.options
            .display_offset
            .unwrap_or_else(|| self.model.default_offset(self.options.native_size()))
    }
}

/// Maps the panel offset into controller coordinates for the configured
/// orientation.
fn window_offset(model: &Model, options: &options::ModelOptions, panel: (u16, u16)) -> (u16, u16) {
    let mut offset = panel;
    let (native_w, native_h) = options.native_size();
    let mapping = MemoryMapping::from(options.orientation);
    if mapping.reverse_columns {
        offset.0 = model
            .framebuffer_size
            .0
            .saturating_sub(native_w.saturating_add(offset.0));
    }
    if mapping.reverse_rows {
        offset.1 = model
            .framebuffer_size
            .1
            .saturating_sub(native_h.saturating_add(offset.1));
    }
    if mapping.swap_rows_and_columns {
        offset = (offset.1, offset.0);
    }
    offset
}
