//! Display models.
//!
//! Each supported controller family is described by a [`Model`] record: its
//! framebuffer geometry, reset timing, vendor init sequence and the register
//! bits it uses for orientation and color order. The drawing code is shared
//! by all of them; only this data differs.

use crate::{
    burst,
    color::PackedColor,
    dcs::{
        self, BitsPerPixel, EnterNormalMode, ExitSleepMode, InterfaceExt, PixelFormat,
        SetAddressMode, SetDisplayOn, SetInvertMode, SetPixelFormat, WriteMemoryStart,
    },
    interface::{Interface, InterfaceKind},
    options::{ColorOrder, ModelOptions},
    ConfigurationError,
};
use embedded_graphics_core::pixelcolor::Rgb565;
use embedded_hal_async::delay::DelayNs;

mod ili9341;
mod st7735;
mod st7789;

pub use ili9341::*;
pub use st7735::*;
pub use st7789::*;

/// One step of a model's initialization sequence.
///
/// Steps that depend on [`ModelOptions`] are placeholders resolved at init
/// time; everything else is sent verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStep {
    /// Vendor command with fixed parameters.
    Raw(u8, &'static [u8]),
    /// Wait the given number of microseconds.
    DelayUs(u32),
    /// DCS exit sleep mode.
    ExitSleep,
    /// DCS pixel format, always RGB565.
    PixelFormat,
    /// DCS address mode computed from orientation and color order.
    AddressMode,
    /// DCS invert mode on or off.
    InvertMode,
    /// DCS normal display mode.
    NormalMode,
    /// Fill the whole framebuffer with black.
    Blank,
    /// DCS display on.
    DisplayOn,
}

/// Address mode (MADCTL) register bits of a model.
///
/// `None` marks an option the controller can't express; asking for it fails
/// init with [`ConfigurationError::UnsupportedOption`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressModeBits {
    /// Row address order (MY).
    pub row_order: Option<u8>,
    /// Column address order (MX).
    pub column_order: Option<u8>,
    /// Row/column exchange (MV).
    pub row_column_exchange: Option<u8>,
    /// BGR subpixel order.
    pub bgr: Option<u8>,
}

/// The usual MIPI DCS address mode layout.
pub const DCS_ADDRESS_MODE_BITS: AddressModeBits = AddressModeBits {
    row_order: Some(0x80),
    column_order: Some(0x40),
    row_column_exchange: Some(0x20),
    bgr: Some(0x08),
};

/// Known panel sizes and where they sit inside the controller framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelOffset {
    /// Panel size in the default orientation.
    pub size: (u16, u16),
    /// Offset of the panel's top left corner.
    pub offset: (u16, u16),
}

/// Display model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Model {
    /// Human readable controller name.
    pub name: &'static str,
    /// The framebuffer size in pixels.
    pub framebuffer_size: (u16, u16),
    /// Duration of the active low reset pulse in µs.
    pub reset_duration: u32,
    /// Time to wait after a hardware or software reset in µs.
    pub reset_settle: u32,
    /// Interfaces the controller can be driven over.
    pub interfaces: &'static [InterfaceKind],
    /// Orientation and color order register layout.
    pub address_mode: AddressModeBits,
    /// Initialization sequence, run after reset.
    pub init_sequence: &'static [InitStep],
    /// Offsets for panels smaller than the framebuffer.
    pub panel_offsets: &'static [PanelOffset],
}

impl Model {
    /// Computes the address mode register for the given options.
    pub fn address_mode(&self, options: &ModelOptions) -> Result<SetAddressMode, ConfigurationError> {
        let bits = &self.address_mode;
        let pick = |wanted: bool, bit: Option<u8>| match (wanted, bit) {
            (false, _) => Ok(0),
            (true, Some(bit)) => Ok(bit),
            (true, None) => Err(ConfigurationError::UnsupportedOption),
        };

        let orientation = options.orientation;
        let value = pick(orientation.mirror_y, bits.row_order)?
            | pick(orientation.mirror_x, bits.column_order)?
            | pick(orientation.landscape, bits.row_column_exchange)?
            | pick(options.color_order == ColorOrder::Bgr, bits.bgr)?;

        Ok(SetAddressMode::new(value))
    }

    /// Looks up the offset of a known panel size.
    pub fn known_offset(&self, native_size: (u16, u16)) -> Option<(u16, u16)> {
        self.panel_offsets
            .iter()
            .find(|p| p.size == native_size)
            .map(|p| p.offset)
    }

    /// Returns the panel offset to use for a panel of the given native size.
    pub fn default_offset(&self, native_size: (u16, u16)) -> (u16, u16) {
        self.known_offset(native_size).unwrap_or((0, 0))
    }

    /// Runs the initialization sequence and returns the address mode it set.
    pub async fn init<DELAY, DI>(
        &self,
        di: &mut DI,
        delay: &mut DELAY,
        options: &ModelOptions,
    ) -> Result<SetAddressMode, ModelInitError<DI::Error>>
    where
        DELAY: DelayNs,
        DI: Interface,
    {
        if !self.interfaces.contains(&DI::KIND) {
            return Err(ModelInitError::InvalidConfiguration(
                ConfigurationError::UnsupportedInterface,
            ));
        }

        let madctl = self
            .address_mode(options)
            .map_err(ModelInitError::InvalidConfiguration)?;

        for step in self.init_sequence {
            match *step {
                InitStep::Raw(instruction, params) => di.write_raw(instruction, params).await?,
                InitStep::DelayUs(us) => delay.delay_us(us).await,
                InitStep::ExitSleep => di.write_command(ExitSleepMode).await?,
                InitStep::PixelFormat => {
                    let pf = PixelFormat::with_all(BitsPerPixel::from_rgb_color::<Rgb565>());
                    di.write_command(SetPixelFormat::new(pf)).await?
                }
                InitStep::AddressMode => di.write_command(madctl).await?,
                InitStep::InvertMode => {
                    di.write_command(SetInvertMode::new(options.invert_colors))
                        .await?
                }
                InitStep::NormalMode => di.write_command(EnterNormalMode).await?,
                InitStep::Blank => self.blank(di, options).await?,
                InitStep::DisplayOn => di.write_command(SetDisplayOn).await?,
            }
        }

        Ok(madctl)
    }

    /// Writes black to every framebuffer cell, panel or not.
    ///
    /// The window is given in controller coordinates, so it follows the row
    /// and column exchange already programmed by the address mode.
    async fn blank<DI>(&self, di: &mut DI, options: &ModelOptions) -> Result<(), DI::Error>
    where
        DI: Interface,
    {
        let (w, h) = self.framebuffer_size;
        let (columns, rows) = if options.orientation.landscape {
            (h, w)
        } else {
            (w, h)
        };
        Self::update_address_window(di, 0, 0, columns.saturating_sub(1), rows.saturating_sub(1)).await?;
        di.write_command(WriteMemoryStart).await?;
        burst::repeat_color(di, PackedColor::BLACK, usize::from(w) * usize::from(h)).await
    }

    /// Updates the address window of the display.
    pub(crate) async fn update_address_window<DI>(
        di: &mut DI,
        sx: u16,
        sy: u16,
        ex: u16,
        ey: u16,
    ) -> Result<(), DI::Error>
    where
        DI: Interface,
    {
        di.write_command(dcs::SetColumnAddress::new(sx, ex)).await?;
        di.write_command(dcs::SetPageAddress::new(sy, ey)).await
    }

    ///
    /// Need to call [Self::wake] before issuing other commands
    ///
    pub(crate) async fn sleep<DI, DELAY>(di: &mut DI, delay: &mut DELAY) -> Result<(), DI::Error>
    where
        DI: Interface,
        DELAY: DelayNs,
    {
        di.write_command(dcs::EnterSleepMode).await?;
        // Both supported families need 120ms before the next command
        delay.delay_us(120_000).await;
        Ok(())
    }

    ///
    /// Wakes the display after it's been set to sleep via [Self::sleep]
    ///
    pub(crate) async fn wake<DI, DELAY>(di: &mut DI, delay: &mut DELAY) -> Result<(), DI::Error>
    where
        DI: Interface,
        DELAY: DelayNs,
    {
        di.write_command(dcs::ExitSleepMode).await?;
        delay.delay_us(120_000).await;
        Ok(())
    }
}

/// Error returned by [`Model::init`].
#[derive(Debug)]
pub enum ModelInitError<DiError> {
    /// Error caused by the display interface.
    Interface(DiError),

    /// Invalid configuration error.
    ///
    /// This error is returned when the configuration passed to the builder is
    /// invalid. For example, when the interface kind or an orientation flag
    /// isn't supported by the selected model.
    InvalidConfiguration(ConfigurationError),
}

impl<DiError> From<DiError> for ModelInitError<DiError> {
    fn from(value: DiError) -> Self {
        Self::Interface(value)
    }
}
