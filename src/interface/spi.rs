use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

use super::{Interface, InterfaceKind};

/// Spi interface error
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError<SPI, DC, CS> {
    Spi(SPI),
    Dc(DC),
    Cs(CS),
}

/// 4-wire SPI transport with a driver-managed chip-select line.
///
/// The bus is taken as a raw [`SpiBus`] rather than a `SpiDevice` so that
/// chip-select can stay asserted across every transaction of the session.
pub struct SpiInterface<SPI, DC, CS> {
    spi: SPI,
    dc: DC,
    cs: CS,
}

impl<SPI, DC, CS> SpiInterface<SPI, DC, CS>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
{
    /// Create new interface
    pub fn new(spi: SPI, dc: DC, cs: CS) -> Self {
        Self { spi, dc, cs }
    }

    /// Release the SPI bus and the DC/CS pins, deconstructing the interface
    pub fn release(self) -> (SPI, DC, CS) {
        (self.spi, self.dc, self.cs)
    }
}

impl<SPI, DC, CS> Interface for SpiInterface<SPI, DC, CS>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
{
    type Error = SpiError<SPI::Error, DC::Error, CS::Error>;

    const KIND: InterfaceKind = InterfaceKind::Serial4Line;

    async fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error> {
        // D/C must not change while earlier data bytes are still shifting out.
        self.spi.flush().await.map_err(SpiError::Spi)?;
        self.dc.set_low().map_err(SpiError::Dc)?;
        self.spi.write(&[command]).await.map_err(SpiError::Spi)?;
        self.spi.flush().await.map_err(SpiError::Spi)?;
        self.dc.set_high().map_err(SpiError::Dc)?;
        if !args.is_empty() {
            self.spi.write(args).await.map_err(SpiError::Spi)?;
        }
        Ok(())
    }

    async fn send_data_slice(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.dc.set_high().map_err(SpiError::Dc)?;
        self.spi.write(data).await.map_err(SpiError::Spi)
    }

    async fn select(&mut self) -> Result<(), Self::Error> {
        self.cs.set_low().map_err(SpiError::Cs)
    }

    async fn deselect(&mut self) -> Result<(), Self::Error> {
        self.spi.flush().await.map_err(SpiError::Spi)?;
        self.cs.set_high().map_err(SpiError::Cs)
    }
}
