//! Streaming pre-converted pixel data from a byte source.

use embedded_hal::digital::OutputPin;
use embedded_io_async::{Read, ReadExactError};

use crate::{burst::CHUNK_SIZE, interface::Interface, Display};

/// Error returned by [`Display::image`] and [`Display::image_with_header`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImageError<DiError, ReadError> {
    /// Error caused by the display interface.
    Interface(DiError),
    /// Error reported by the pixel source.
    Read(ReadError),
    /// The source ended before a complete size header was read.
    Header,
}

impl<DI, RST> Display<DI, RST>
where
    DI: Interface,
    RST: OutputPin,
{
    /// Copies raw RGB565 pixel data from `source` into a `width` by `height`
    /// window at `(x, y)`.
    ///
    /// The source is read in chunks of at most [`CHUNK_SIZE`] bytes and each
    /// chunk is forwarded as it arrives, until the source reports end of
    /// stream. Returns the number of bytes streamed.
    ///
    /// The data is not checked against the window: a short source leaves the
    /// rest of the window untouched, a long one wraps around inside it.
    pub async fn image<R: Read>(
        &mut self,
        x: i32,
        y: i32,
        width: u16,
        height: u16,
        source: &mut R,
    ) -> Result<usize, ImageError<DI::Error, R::Error>> {
        if width == 0 || height == 0 {
            return Ok(0);
        }
        let x1 = x.wrapping_add(i32::from(width) - 1);
        let y1 = y.wrapping_add(i32::from(height) - 1);
        self.window(x, y, x1, y1)
            .await
            .map_err(ImageError::Interface)?;

        let mut chunk = [0u8; CHUNK_SIZE];
        let mut total = 0;
        loop {
            let n = source.read(&mut chunk).await.map_err(ImageError::Read)?;
            if n == 0 {
                break;
            }
            self.di
                .send_data_slice(&chunk[..n])
                .await
                .map_err(ImageError::Interface)?;
            total += n;
        }
        trace!("image: {} bytes streamed", total);
        Ok(total)
    }

    /// Like [`image`](Self::image), but reads the size from the source first.
    ///
    /// The header is width then height, each a big endian `u16`.
    pub async fn image_with_header<R: Read>(
        &mut self,
        x: i32,
        y: i32,
        source: &mut R,
    ) -> Result<usize, ImageError<DI::Error, R::Error>> {
        let mut header = [0u8; 4];
        source.read_exact(&mut header).await.map_err(|e| match e {
            ReadExactError::UnexpectedEof => ImageError::Header,
            ReadExactError::Other(e) => ImageError::Read(e),
        })?;
        let width = u16::from_be_bytes([header[0], header[1]]);
        let height = u16::from_be_bytes([header[2], header[3]]);
        debug!("image header: {}x{}", width, height);

        self.image(x, y, width, height, source).await
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use crate::{_mock, color::color, PackedColor};

    use super::*;

    fn pixels(n: usize, c: PackedColor) -> std::vec::Vec<u8> {
        c.to_bytes().repeat(n)
    }

    #[test]
    fn streams_whole_source_in_bounded_chunks() {
        let mut display = _mock::display(64, 64);
        let data = pixels(40 * 10, color(0, 255, 0));
        let mut source: &[u8] = &data;

        let n = block_on(display.image(5, 6, 40, 10, &mut source)).unwrap();
        assert_eq!(n, 800);

        let di = display.release().0;
        assert_eq!(di.windows(), std::vec![(5, 6, 44, 15)]);
        let bursts = di.data_bursts();
        assert_eq!(bursts.len(), 4);
        assert!(bursts.iter().all(|b| b.len() <= CHUNK_SIZE));
        assert_eq!(bursts.concat(), data);
        assert_eq!(di.pixel_at(44, 15), Some(color(0, 255, 0)));
    }

    #[test]
    fn short_source_is_not_an_error() {
        let mut display = _mock::display(64, 64);
        let data = pixels(3, PackedColor::WHITE);
        let mut source: &[u8] = &data;

        let n = block_on(display.image(0, 0, 8, 8, &mut source)).unwrap();
        assert_eq!(n, 6);
        assert_eq!(display.release().0.pixel_writes().len(), 3);
    }

    #[test]
    fn empty_image_sends_nothing() {
        let mut display = _mock::display(64, 64);
        let mut source: &[u8] = &[0xFF, 0xFF];

        let n = block_on(display.image(0, 0, 0, 4, &mut source)).unwrap();
        assert_eq!(n, 0);
        assert!(display.release().0.events().is_empty());
    }

    #[test]
    fn header_sets_window_size() {
        let mut display = _mock::display(64, 64);
        let mut data = std::vec![0x00, 0x03, 0x00, 0x02];
        data.extend(pixels(6, PackedColor::WHITE));
        let mut source: &[u8] = &data;

        let n = block_on(display.image_with_header(10, 20, &mut source)).unwrap();
        assert_eq!(n, 12);
        assert_eq!(display.release().0.windows(), std::vec![(10, 20, 12, 21)]);
    }

    #[test]
    fn truncated_header_is_rejected() {
        let mut display = _mock::display(64, 64);
        let mut source: &[u8] = &[0x00, 0x03, 0x00];

        let result = block_on(display.image_with_header(0, 0, &mut source));
        assert_eq!(result, Err(ImageError::Header));
        assert!(display.release().0.events().is_empty());
    }

    #[test]
    fn interface_errors_are_wrapped() {
        let mut display = _mock::display(64, 64);
        unsafe { display.raw_interface_mut() }.fail_after(0);
        let mut source: &[u8] = &[0xFF, 0xFF];

        let result = block_on(display.image(0, 0, 1, 1, &mut source));
        assert_eq!(result, Err(ImageError::Interface(_mock::MockError)));
    }
}
