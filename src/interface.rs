//! Transport between the driver and the display controller.

mod spi;
pub use spi::*;

/// Command and pixel transport.
///
/// The driver only ever talks to the controller through these four calls. How
/// D/C, chip-select and the bus are wired is the implementation's concern.
pub trait Interface {
    /// Error type
    type Error: core::fmt::Debug;

    /// Kind of interface
    const KIND: InterfaceKind;

    /// Send a command byte (D/C low) followed by its parameter bytes (D/C high).
    async fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error>;

    /// Send a raw slice of pixel data (D/C high).
    ///
    /// `WriteMemoryStart` must be sent before calling this function. The data
    /// is assumed to already be in the controller's packed pixel format.
    async fn send_data_slice(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Assert the chip-select line.
    async fn select(&mut self) -> Result<(), Self::Error>;

    /// Release the chip-select line once all pending bytes are on the wire.
    async fn deselect(&mut self) -> Result<(), Self::Error>;
}

impl<T: Interface + ?Sized> Interface for &mut T {
    type Error = T::Error;
    const KIND: InterfaceKind = T::KIND;

    async fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error> {
        T::send_command(self, command, args).await
    }

    async fn send_data_slice(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::send_data_slice(self, data).await
    }

    async fn select(&mut self) -> Result<(), Self::Error> {
        T::select(self).await
    }

    async fn deselect(&mut self) -> Result<(), Self::Error> {
        T::deselect(self).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum InterfaceKind {
    Serial4Line,
    Parallel8Bit,
    Parallel16Bit,
}
