//! Text rendering with the built-in 8x8 font.

use embedded_hal::digital::OutputPin;

use crate::{
    burst::{Burst, CHUNK_SIZE, GLYPH_BUF_SIZE},
    color::PackedColor,
    font,
    interface::Interface,
    Display,
};

impl<DI, RST> Display<DI, RST>
where
    DI: Interface,
    RST: OutputPin,
{
    /// Draws a string of 8x8 characters with its top left corner at `(x, y)`.
    ///
    /// Each character is expanded into a 128 byte cell, foreground where the
    /// glyph bit is set and background everywhere else, then sent as a single
    /// burst into its own 8x8 window. Characters advance 8 pixels; there is no
    /// wrapping or line breaking.
    pub async fn text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fg: PackedColor,
        bg: PackedColor,
    ) -> Result<(), DI::Error> {
        let (fg, bg) = (fg.to_bytes(), bg.to_bytes());
        let mut cell = [0u8; GLYPH_BUF_SIZE];
        let mut cx = x;

        for c in text.chars() {
            let glyph = font::glyph(c);
            for (i, pair) in cell.chunks_exact_mut(2).enumerate() {
                let set = font::is_set(glyph, i % 8, i / 8);
                pair.copy_from_slice(if set { &fg } else { &bg });
            }

            self.window(cx, y, cx.wrapping_add(7), y.wrapping_add(7))
                .await?;
            self.di.send_data_slice(&cell).await?;
            cx = cx.wrapping_add(8);
        }
        Ok(())
    }

    /// Draws a string with every glyph pixel scaled to an
    /// `upscaling` x `upscaling` block.
    ///
    /// With a background color each character is one window streamed through
    /// the chunk buffer. Without one, only foreground pixels are touched: each
    /// horizontal run of set bits becomes one filled rectangle, which leaves
    /// whatever was on the screen behind the glyph alone at the cost of many
    /// small transactions.
    ///
    /// An `upscaling` of zero draws nothing.
    pub async fn upscaled_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fg: PackedColor,
        bg: Option<PackedColor>,
        upscaling: u16,
    ) -> Result<(), DI::Error> {
        if upscaling == 0 {
            return Ok(());
        }
        let k = i32::from(upscaling);
        let mut cx = x;

        for c in text.chars() {
            let glyph = font::glyph(c);
            match bg {
                Some(bg) => self.scaled_glyph(cx, y, glyph, fg, bg, upscaling).await?,
                None => self.scaled_glyph_runs(cx, y, glyph, fg, upscaling).await?,
            }
            cx = cx.wrapping_add(8 * k);
        }
        Ok(())
    }

    async fn scaled_glyph(
        &mut self,
        x: i32,
        y: i32,
        glyph: &[u8; 8],
        fg: PackedColor,
        bg: PackedColor,
        upscaling: u16,
    ) -> Result<(), DI::Error> {
        let k = usize::from(upscaling);
        let side = 8 * i32::from(upscaling) - 1;
        self.window(x, y, x.wrapping_add(side), y.wrapping_add(side))
            .await?;

        let mut burst = Burst::<CHUNK_SIZE>::new();
        for row in 0..8 {
            for _ in 0..k {
                for col in 0..8 {
                    let color = if font::is_set(glyph, col, row) { fg } else { bg };
                    burst.push_repeated(&mut self.di, color, k).await?;
                }
            }
        }
        burst.flush(&mut self.di).await
    }

    async fn scaled_glyph_runs(
        &mut self,
        x: i32,
        y: i32,
        glyph: &[u8; 8],
        fg: PackedColor,
        upscaling: u16,
    ) -> Result<(), DI::Error> {
        let k = i32::from(upscaling);
        for row in 0..8 {
            let mut col = 0;
            while col < 8 {
                if !font::is_set(glyph, col, row) {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < 8 && font::is_set(glyph, col, row) {
                    col += 1;
                }
                let run = (col - start) as u16;
                self.rect(
                    x.wrapping_add(start as i32 * k),
                    y.wrapping_add(row as i32 * k),
                    run.saturating_mul(upscaling),
                    upscaling,
                    fg,
                    true,
                )
                .await?;
            }
        }
        Ok(())
    }
}
