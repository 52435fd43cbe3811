//! [super::Display] builder module

use embedded_hal::digital::{self, OutputPin as BlockingOutputPin};
use embedded_hal_async::delay::DelayNs as AsyncDelayNs;

use crate::{
    interface::Interface,
    models::{Model, ModelInitError},
    options::{ColorInversion, ColorOrder, ModelOptions, Orientation},
    window_offset, Display, Window,
};

/// Builder for [Display] instances.
///
/// Exposes all possible display options.
///
/// # Examples
///
/// ```rust,ignore
/// use st77xx::{Builder, models::ILI9341, options::{ColorOrder, Orientation}};
///
/// let mut display = Builder::new(ILI9341, di)
///     .color_order(ColorOrder::Bgr)
///     .orientation(Orientation::new().landscape().mirror_x())
///     .display_size(320, 240)
///     .init(&mut delay)
///     .await
///     .unwrap();
/// ```
pub struct Builder<DI, RST>
where
    DI: Interface,
{
    di: DI,
    model: Model,
    rst: Option<RST>,
    options: ModelOptions,
}

impl<DI> Builder<DI, NoResetPin>
where
    DI: Interface,
{
    /// Constructs a new builder for the given model.
    #[must_use]
    pub fn new(model: Model, di: DI) -> Self {
        Self {
            di,
            options: ModelOptions::full_size(&model),
            model,
            rst: None,
        }
    }
}

impl<DI, RST> Builder<DI, RST>
where
    DI: Interface,
    RST: BlockingOutputPin,
{
    /// Sets the invert color flag
    #[must_use]
    pub fn invert_colors(mut self, color_inversion: ColorInversion) -> Self {
        self.options.invert_colors = color_inversion;
        self
    }

    /// Sets the [ColorOrder]
    #[must_use]
    pub fn color_order(mut self, color_order: ColorOrder) -> Self {
        self.options.color_order = color_order;
        self
    }

    /// Sets the [Orientation]
    #[must_use]
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.options.orientation = orientation;
        self
    }

    /// Sets the display size as seen in the configured orientation.
    ///
    /// Defaults to the model's framebuffer size.
    #[must_use]
    pub fn display_size(mut self, width: u16, height: u16) -> Self {
        self.options.display_size = (width, height);
        self
    }

    /// Sets the panel offset inside the framebuffer, in the default
    /// orientation.
    ///
    /// Without it the model's table of known panels is consulted and
    /// `(0, 0)` is used for unknown sizes.
    #[must_use]
    pub fn display_offset(mut self, x: u16, y: u16) -> Self {
        self.options.display_offset = Some((x, y));
        self
    }

    /// Sets the reset pin.
    ///
    /// Without one the display is reset with a DCS software reset.
    #[must_use]
    pub fn reset_pin<RST2: BlockingOutputPin>(self, rst: RST2) -> Builder<DI, RST2> {
        Builder {
            di: self.di,
            model: self.model,
            rst: Some(rst),
            options: self.options,
        }
    }

    /// Consumes the builder to create a new [Display].
    ///
    /// Validates the configuration, takes the chip-select line (it stays
    /// asserted for the lifetime of the display), resets the controller and
    /// runs the model's init sequence, which blanks display memory to black
    /// before turning the display on.
    pub async fn init(
        mut self,
        delay_source: &mut impl AsyncDelayNs,
    ) -> Result<Display<DI, RST>, InitError<DI::Error, RST::Error>> {
        let to_u32 = |(a, b)| (u32::from(a), u32::from(b));
        let native = self.options.native_size();
        let (width, height) = to_u32(native);
        let (max_width, max_height) = to_u32(self.model.framebuffer_size);

        if width == 0 || height == 0 || width > max_width || height > max_height {
            return Err(InitError::InvalidConfiguration(
                ConfigurationError::InvalidDisplaySize,
            ));
        }

        let panel_offset = match self.options.display_offset {
            Some(offset) => offset,
            None => {
                let known = self.model.known_offset(native);
                if known.is_none() && native != self.model.framebuffer_size {
                    warn!(
                        "no known offset for a {}x{} panel, using (0, 0)",
                        native.0,
                        native.1
                    );
                }
                known.unwrap_or((0, 0))
            }
        };
        let (offset_x, offset_y) = to_u32(panel_offset);
        if width + offset_x > max_width || height + offset_y > max_height {
            return Err(InitError::InvalidConfiguration(
                ConfigurationError::InvalidDisplayOffset,
            ));
        }

        // Fail before touching the bus if the model can't express the options.
        self.model
            .address_mode(&self.options)
            .map_err(InitError::InvalidConfiguration)?;

        debug!(
            "init {=str} {}x{} offset {}",
            self.model.name,
            self.options.display_size.0,
            self.options.display_size.1,
            panel_offset
        );

        self.di.select().await.map_err(InitError::Interface)?;

        if let Some(ref mut rst_pin) = self.rst {
            rst_pin.set_low().map_err(InitError::ResetPin)?;
            delay_source.delay_us(self.model.reset_duration).await;
            rst_pin.set_high().map_err(InitError::ResetPin)?;
        } else {
            use crate::dcs::InterfaceExt;
            self.di
                .write_command(crate::dcs::SoftReset)
                .await
                .map_err(InitError::Interface)?;
        }
        delay_source.delay_us(self.model.reset_settle).await;

        let madctl = self.model.init(&mut self.di, delay_source, &self.options).await?;

        let display = Display {
            di: self.di,
            window_offset: window_offset(&self.model, &self.options, panel_offset),
            model: self.model,
            rst: self.rst,
            options: self.options,
            madctl,
            window: Window::default(),
            selected: true,
            sleeping: false,
        };

        Ok(display)
    }
}

/// Error returned by [`Builder::init`].
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError<DIError, PinError> {
    /// Error caused by the display interface.
    Interface(DIError),

    /// Error caused by the reset pin's [`OutputPin`](embedded_hal::digital::OutputPin) implementation.
    ResetPin(PinError),

    /// Invalid configuration error.
    ///
    /// This error is returned when the configuration passed to the builder is
    /// invalid. For example, when the display size doesn't fit the model's
    /// framebuffer or the model can't express an orientation flag.
    InvalidConfiguration(ConfigurationError),
}

/// Specifics of [InitError::InvalidConfiguration] if configuration was found invalid
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigurationError {
    /// Unsupported interface kind.
    ///
    /// The chosen interface isn't supported by the selected model.
    UnsupportedInterface,
    /// Invalid display size
    ///
    /// Display dimensions are zero or larger than the model's framebuffer.
    InvalidDisplaySize,
    /// Invalid display offset.
    ///
    /// The active display area, defined by [`display_size`](Builder::display_size) and
    /// [`display_offset`](Builder::display_offset), extends beyond the boundaries of
    /// the model's framebuffer.
    InvalidDisplayOffset,
    /// Unsupported option.
    ///
    /// The model has no register bit for a requested orientation or color
    /// order flag.
    UnsupportedOption,
}

impl<DIError, PinError> From<ModelInitError<DIError>> for InitError<DIError, PinError> {
    fn from(value: ModelInitError<DIError>) -> Self {
        match value {
            ModelInitError::Interface(e) => InitError::Interface(e),
            ModelInitError::InvalidConfiguration(ce) => InitError::InvalidConfiguration(ce),
        }
    }
}

/// Marker type for no reset pin.
pub enum NoResetPin {}

impl digital::OutputPin for NoResetPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl digital::ErrorType for NoResetPin {
    type Error = core::convert::Infallible;
}
