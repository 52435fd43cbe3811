//! Bounded transfer buffers.
//!
//! Nothing in the driver allocates memory proportional to the area being
//! drawn. Large regions are covered by flushing one of these small buffers
//! over and over into an address window that was set up beforehand.

use heapless::Vec;

use crate::{color::PackedColor, interface::Interface};

/// Size of the general purpose chunk buffer in bytes.
pub const CHUNK_SIZE: usize = 256;

/// Size of one 8x8 glyph cell in bytes.
pub const GLYPH_BUF_SIZE: usize = 8 * 8 * 2;

/// Streams `count` pixels of one color into the current window.
///
/// The color pair is replicated into a chunk once and that chunk is sent
/// repeatedly, so the cost is `ceil(count * 2 / CHUNK_SIZE)` bursts with
/// constant memory.
pub(crate) async fn repeat_color<DI>(
    di: &mut DI,
    color: PackedColor,
    count: usize,
) -> Result<(), DI::Error>
where
    DI: Interface,
{
    let bytes = color.to_bytes();
    let mut chunk = [0u8; CHUNK_SIZE];
    for pair in chunk.chunks_exact_mut(2) {
        pair.copy_from_slice(&bytes);
    }

    let mut remaining = count * 2;
    while remaining > 0 {
        let n = remaining.min(CHUNK_SIZE);
        di.send_data_slice(&chunk[..n]).await?;
        remaining -= n;
    }
    Ok(())
}

/// Fixed capacity accumulator for pixel data that differs pixel to pixel.
///
/// Pixels are pushed one at a time and sent in a single burst whenever the
/// buffer fills up. Callers must [`flush`](Self::flush) at the end.
pub(crate) struct Burst<const N: usize> {
    buf: Vec<u8, N>,
}

impl<const N: usize> Burst<N> {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Appends one pixel, flushing first if it wouldn't fit.
    pub async fn push<DI>(&mut self, di: &mut DI, color: PackedColor) -> Result<(), DI::Error>
    where
        DI: Interface,
    {
        if self.buf.len() + 2 > N {
            self.flush(di).await?;
        }
        // Room for two bytes was made above.
        let _ = self.buf.extend_from_slice(&color.to_bytes());
        Ok(())
    }

    /// Appends `count` copies of one pixel.
    pub async fn push_repeated<DI>(
        &mut self,
        di: &mut DI,
        color: PackedColor,
        count: usize,
    ) -> Result<(), DI::Error>
    where
        DI: Interface,
    {
        for _ in 0..count {
            self.push(di, color).await?;
        }
        Ok(())
    }

    /// Sends whatever is buffered.
    pub async fn flush<DI>(&mut self, di: &mut DI) -> Result<(), DI::Error>
    where
        DI: Interface,
    {
        if !self.buf.is_empty() {
            di.send_data_slice(&self.buf).await?;
            self.buf.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use crate::{_mock::MockDisplayInterface, color::color};

    use super::*;

    #[test]
    fn repeat_color_uses_bounded_bursts() {
        let mut di = MockDisplayInterface::new();
        let c = color(0x12, 0x34, 0x56);

        block_on(repeat_color(&mut di, c, 1000)).unwrap();

        let bursts = di.data_bursts();
        assert_eq!(bursts.len(), 8);
        assert!(bursts.iter().all(|b| b.len() <= CHUNK_SIZE));
        assert_eq!(bursts.iter().map(|b| b.len()).sum::<usize>(), 2000);
        assert!(bursts
            .iter()
            .flat_map(|b| b.chunks_exact(2))
            .all(|pair| pair == c.to_bytes()));
    }

    #[test]
    fn repeat_color_zero_sends_nothing() {
        let mut di = MockDisplayInterface::new();
        block_on(repeat_color(&mut di, PackedColor::WHITE, 0)).unwrap();
        assert!(di.events().is_empty());
    }

    #[test]
    fn burst_flushes_when_full() {
        let mut di = MockDisplayInterface::new();
        let mut burst = Burst::<8>::new();

        block_on(async {
            burst
                .push_repeated(&mut di, PackedColor::WHITE, 5)
                .await
                .unwrap();
            burst.push(&mut di, PackedColor::BLACK).await.unwrap();
            burst.flush(&mut di).await.unwrap();
        });

        let bursts = di.data_bursts();
        assert_eq!(
            bursts,
            std::vec![
                std::vec![0xFF; 8],
                std::vec![0xFF, 0xFF, 0x00, 0x00],
            ]
        );
    }
}
