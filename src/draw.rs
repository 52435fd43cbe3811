//! Geometric primitives.
//!
//! Coordinates are signed so shapes may hang off the top or left edge, but
//! nothing is clipped: each window is truncated to the controller's 16 bit
//! address space and sent as is. Keeping shapes on the panel is up to the
//! caller.

use embedded_hal::digital::OutputPin;

use crate::{burst, color::PackedColor, interface::Interface, Display};

impl<DI, RST> Display<DI, RST>
where
    DI: Interface,
    RST: OutputPin,
{
    /// Sets a window from signed logical coordinates.
    pub(crate) async fn window(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), DI::Error> {
        self.set_window(x0 as u16, y0 as u16, x1 as u16, y1 as u16)
            .await
    }

    /// Streams `count` pixels of one color into a freshly set window.
    async fn fill_window(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        count: usize,
        color: PackedColor,
    ) -> Result<(), DI::Error> {
        self.window(x0, y0, x1, y1).await?;
        burst::repeat_color(&mut self.di, color, count).await
    }

    /// Horizontal run of `len` pixels starting at `x`.
    async fn span(&mut self, x: i32, y: i32, len: u32, color: PackedColor) -> Result<(), DI::Error> {
        let x1 = x.wrapping_add(len as i32).wrapping_sub(1);
        self.fill_window(x, y, x1, y, len as usize, color).await
    }

    /// Draws a single pixel: one window and one 2 byte write.
    pub async fn pixel(&mut self, x: i32, y: i32, color: PackedColor) -> Result<(), DI::Error> {
        self.window(x, y, x, y).await?;
        self.di.send_data_slice(&color.to_bytes()).await
    }

    /// Draws a horizontal line from `x0` to `x1` inclusive.
    ///
    /// One window, then the color streamed in bounded bursts.
    pub async fn hline(&mut self, x0: i32, x1: i32, y: i32, color: PackedColor) -> Result<(), DI::Error> {
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let count = (x1.abs_diff(x0) as usize).saturating_add(1);
        self.fill_window(x0, y, x1, y, count, color).await
    }

    /// Draws a vertical line from `y0` to `y1` inclusive.
    pub async fn vline(&mut self, y0: i32, y1: i32, x: i32, color: PackedColor) -> Result<(), DI::Error> {
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        let count = (y1.abs_diff(y0) as usize).saturating_add(1);
        self.fill_window(x, y0, x, y1, count, color).await
    }

    /// Draws a `w` by `h` rectangle with its top left corner at `(x, y)`.
    ///
    /// Filled rectangles are a single window streamed in bounded bursts,
    /// outlines are four single line windows. Zero width or height draws
    /// nothing. The far edges wrap like the controller's address counters
    /// when the rectangle crosses the end of the coordinate range.
    pub async fn rect(
        &mut self,
        x: i32,
        y: i32,
        w: u16,
        h: u16,
        color: PackedColor,
        fill: bool,
    ) -> Result<(), DI::Error> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        let x1 = x.wrapping_add(i32::from(w) - 1);
        let y1 = y.wrapping_add(i32::from(h) - 1);
        let (w, h) = (usize::from(w), usize::from(h));

        if fill {
            return self.fill_window(x, y, x1, y1, w * h, color).await;
        }

        self.fill_window(x, y, x1, y, w, color).await?;
        self.fill_window(x, y1, x1, y1, w, color).await?;
        self.fill_window(x, y, x, y1, h, color).await?;
        self.fill_window(x1, y, x1, y1, h, color).await
    }

    /// Draws a line with Bresenham's algorithm.
    ///
    /// This is the slow path: every pixel is its own window and write, so a
    /// line costs `max(|dx|, |dy|) + 1` transactions. Use [`hline`](Self::hline)
    /// or [`vline`](Self::vline) for axis aligned lines.
    pub async fn line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: PackedColor,
    ) -> Result<(), DI::Error> {
        // Error terms need more range than the endpoints.
        let (x0, y0, x1, y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.pixel(x as i32, y as i32, color).await?;
            if x == x1 && y == y1 {
                return Ok(());
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draws a circle of radius `r` centered on `(x, y)` with the midpoint
    /// algorithm.
    ///
    /// Outlines plot the eight symmetric points of each step as single
    /// pixels. Filled circles draw one horizontal span per symmetric pair
    /// instead, which needs far fewer transactions than filling per pixel.
    pub async fn circle(
        &mut self,
        x: i32,
        y: i32,
        r: u16,
        color: PackedColor,
        fill: bool,
    ) -> Result<(), DI::Error> {
        let r = i32::from(r);
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut dx = 0;
        let mut dy = r;

        if fill {
            self.span(x.wrapping_sub(r), y, (2 * r + 1) as u32, color)
                .await?;
        } else {
            for (px, py) in [(0, r), (0, -r), (r, 0), (-r, 0)] {
                self.pixel(x.wrapping_add(px), y.wrapping_add(py), color)
                    .await?;
            }
        }

        while dx < dy {
            if f >= 0 {
                dy -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            dx += 1;
            ddf_x += 2;
            f += ddf_x;

            if fill {
                for (half, row) in [(dx, dy), (dx, -dy), (dy, dx), (dy, -dx)] {
                    self.span(x.wrapping_sub(half), y.wrapping_add(row), (2 * half + 1) as u32, color)
                        .await?;
                }
            } else {
                for (px, py) in octants(dx, dy) {
                    self.pixel(x.wrapping_add(px), y.wrapping_add(py), color)
                        .await?;
                }
            }
        }
        Ok(())
    }

    /// Draws a triangle.
    ///
    /// Outlines are three [`line`](Self::line) calls. Filled triangles are
    /// scan converted: vertices are sorted by y and each row between the two
    /// active edges becomes one [`hline`](Self::hline).
    #[allow(clippy::too_many_arguments)]
    pub async fn triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: PackedColor,
        fill: bool,
    ) -> Result<(), DI::Error> {
        if !fill {
            self.line(x0, y0, x1, y1, color).await?;
            self.line(x1, y1, x2, y2, color).await?;
            return self.line(x2, y2, x0, y0, color).await;
        }

        let mut v = [(x0, y0), (x1, y1), (x2, y2)];
        v.sort_unstable_by_key(|&(_, y)| y);
        let [(x0, y0), (x1, y1), (x2, y2)] = v;

        if y0 == y2 {
            // Degenerate: every vertex on one row.
            let left = x0.min(x1).min(x2);
            let right = x0.max(x1).max(x2);
            return self.hline(left, right, y0, color).await;
        }

        // Rows are walked in i64 so the loop bounds can't overflow at the
        // ends of the i32 range. Edge x positions always lie between two
        // vertex x coordinates and fit back into i32.
        let (y0, y1, y2) = (i64::from(y0), i64::from(y1), i64::from(y2));

        // The long edge 0->2 spans every row; the short side switches from
        // edge 0->1 to edge 1->2 at y1. A flat bottom keeps y1 in the upper
        // half, a flat top moves it to the lower one.
        let mut long = Edge::new(x0, y0, x2, y2);
        let last_upper = if y1 == y2 { y1 } else { y1 - 1 };
        let mut short = Edge::new(x0, y0, x1, y1);

        let mut y = y0;
        while y <= last_upper {
            self.hline(long.x(), short.x(), y as i32, color).await?;
            long.step();
            short.step();
            y += 1;
        }

        let mut short = Edge::new(x1, y1, x2, y2);
        short.skip_to(y - y1);
        while y <= y2 {
            self.hline(long.x(), short.x(), y as i32, color).await?;
            long.step();
            short.step();
            y += 1;
        }
        Ok(())
    }
}

/// The eight reflections of a midpoint circle offset.
fn octants(dx: i32, dy: i32) -> [(i32, i32); 8] {
    [
        (dx, dy),
        (-dx, dy),
        (dx, -dy),
        (-dx, -dy),
        (dy, dx),
        (-dy, dx),
        (dy, -dx),
        (-dy, -dx),
    ]
}

/// Incremental x position along a triangle edge, one row at a time.
///
/// The rounding is exact integer division of the accumulated slope, so the
/// result doesn't depend on which vertex the walk started from.
struct Edge {
    x0: i64,
    dx: i64,
    dy: i64,
    /// `dx * row` accumulated so far.
    acc: i64,
}

impl Edge {
    fn new(x0: i32, y0: i64, x1: i32, y1: i64) -> Self {
        let x0 = i64::from(x0);
        Self {
            x0,
            dx: i64::from(x1) - x0,
            dy: y1 - y0,
            acc: 0,
        }
    }

    fn x(&self) -> i32 {
        let x = if self.dy == 0 {
            self.x0 + self.dx
        } else {
            self.x0 + self.acc / self.dy
        };
        x as i32
    }

    fn step(&mut self) {
        self.acc += self.dx;
    }

    fn skip_to(&mut self, rows: i64) {
        self.acc = self.dx * rows;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use embassy_futures::block_on;
    use proptest::prelude::*;

    use crate::{_mock, color::color};

    use super::*;

    const RED: PackedColor = color(255, 0, 0);
    const BLUE: PackedColor = color(0, 0, 255);

    fn cells(display: crate::Display<_mock::MockDisplayInterface, crate::NoResetPin>) -> Vec<(u16, u16)> {
        display
            .release()
            .0
            .pixel_writes()
            .into_iter()
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn pixel_is_one_window_and_two_bytes() {
        let mut display = _mock::display(64, 64);
        block_on(display.pixel(3, 4, RED)).unwrap();

        let di = display.release().0;
        assert_eq!(di.windows(), std::vec![(3, 4, 3, 4)]);
        assert_eq!(di.data_bursts(), std::vec![std::vec![0xF8, 0x00]]);
    }

    #[test]
    fn hline_normalizes_reversed_endpoints() {
        let mut display = _mock::display(64, 64);
        block_on(display.hline(10, 2, 5, RED)).unwrap();

        let di = display.release().0;
        assert_eq!(di.windows(), std::vec![(2, 5, 10, 5)]);
        assert_eq!(di.pixel_writes().len(), 9);
    }

    #[test]
    fn long_vline_is_streamed_in_bounded_bursts() {
        let mut display = _mock::display(240, 320);
        block_on(display.vline(0, 319, 7, BLUE)).unwrap();

        let di = display.release().0;
        assert_eq!(di.windows().len(), 1);
        let bursts = di.data_bursts();
        assert_eq!(bursts.len(), 3);
        assert!(bursts.iter().all(|b| b.len() <= crate::CHUNK_SIZE));
        assert_eq!(di.pixel_writes().len(), 320);
        assert_eq!(di.pixel_at(7, 319), Some(BLUE));
    }

    #[test]
    fn rect_outline_uses_four_lines() {
        let mut display = _mock::display(64, 64);
        block_on(display.rect(2, 3, 5, 4, RED, false)).unwrap();

        let di = display.release().0;
        assert_eq!(
            di.windows(),
            std::vec![(2, 3, 6, 3), (2, 6, 6, 6), (2, 3, 2, 6), (6, 3, 6, 6)]
        );
        let drawn: HashSet<_> = di.pixel_writes().into_iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(drawn.len(), 2 * 5 + 2 * 2);
        assert!(!drawn.contains(&(4, 4)));
    }

    #[test]
    fn zero_sized_rect_draws_nothing() {
        let mut display = _mock::display(64, 64);
        block_on(async {
            display.rect(2, 3, 0, 4, RED, true).await.unwrap();
            display.rect(2, 3, 4, 0, RED, false).await.unwrap();
        });
        assert!(display.release().0.events().is_empty());
    }

    #[test]
    fn line_plots_one_pixel_per_step() {
        let mut display = _mock::display(64, 64);
        block_on(display.line(0, 0, 6, 2, RED)).unwrap();

        let di = display.release().0;
        assert_eq!(di.windows().len(), 7);
        let drawn = di.pixel_writes();
        assert_eq!(drawn.first().map(|p| (p.0, p.1)), Some((0, 0)));
        assert_eq!(drawn.last().map(|p| (p.0, p.1)), Some((6, 2)));
    }

    #[test]
    fn single_point_line_and_zero_circle() {
        let mut display = _mock::display(64, 64);
        block_on(display.line(5, 5, 5, 5, RED)).unwrap();
        assert_eq!(cells(display), std::vec![(5, 5)]);

        let mut display = _mock::display(64, 64);
        block_on(display.circle(9, 9, 0, RED, false)).unwrap();
        let drawn: HashSet<_> = cells(display).into_iter().collect();
        assert_eq!(drawn, HashSet::from([(9, 9)]));
    }

    #[test]
    fn filled_circle_uses_spans() {
        let mut display = _mock::display(64, 64);
        block_on(display.circle(20, 20, 10, RED, true)).unwrap();

        let di = display.release().0;
        assert!(di.windows().iter().all(|&(_, y0, _, y1)| y0 == y1));
        let drawn: HashSet<_> = di.pixel_writes().into_iter().map(|(x, y, _)| (x, y)).collect();
        assert!(drawn.contains(&(20, 20)));
        assert!(drawn.contains(&(10, 20)));
        assert!(drawn.contains(&(20, 30)));
        assert!(!drawn.contains(&(11, 11)));
    }

    #[test]
    fn flat_bottom_triangle_fills_rows() {
        let mut display = _mock::display(64, 64);
        block_on(display.triangle(4, 0, 0, 4, 8, 4, RED, true)).unwrap();

        let di = display.release().0;
        let windows = di.windows();
        assert_eq!(windows.len(), 5);
        assert_eq!(windows[0], (4, 0, 4, 0));
        assert_eq!(windows[4], (0, 4, 8, 4));
    }

    #[test]
    fn flat_top_triangle_fills_rows() {
        let mut display = _mock::display(64, 64);
        block_on(display.triangle(0, 0, 8, 0, 4, 4, RED, true)).unwrap();

        let windows = display.release().0.windows();
        assert_eq!(windows.len(), 5);
        assert_eq!(windows[0], (0, 0, 8, 0));
        assert_eq!(windows[4], (4, 4, 4, 4));
    }

    #[test]
    fn degenerate_triangle_is_one_span() {
        let mut display = _mock::display(64, 64);
        block_on(display.triangle(5, 3, 1, 3, 9, 3, RED, true)).unwrap();
        assert_eq!(display.release().0.windows(), std::vec![(1, 3, 9, 3)]);
    }

    #[test]
    fn outlined_triangle_touches_vertices() {
        let mut display = _mock::display(64, 64);
        block_on(display.triangle(1, 1, 20, 5, 7, 17, RED, false)).unwrap();

        let drawn: HashSet<_> = cells(display).into_iter().collect();
        for v in [(1, 1), (20, 5), (7, 17)] {
            assert!(drawn.contains(&v));
        }
    }

    #[test]
    fn rect_past_coordinate_limit_wraps() {
        let mut display = _mock::display(64, 64);
        block_on(display.rect(i32::MAX - 1, 0, 4, 2, RED, true)).unwrap();

        let di = display.release().0;
        assert_eq!(di.windows(), std::vec![(0xFFFE, 0, 1, 1)]);
        let drawn: HashSet<_> = di.pixel_writes().into_iter().map(|(x, y, _)| (x, y)).collect();
        let expected: HashSet<_> = [0xFFFE, 0xFFFF, 0, 1]
            .into_iter()
            .flat_map(|x| [(x, 0), (x, 1)])
            .collect();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn filled_circle_at_coordinate_limit_wraps() {
        let mut display = _mock::display(64, 64);
        block_on(display.circle(i32::MAX, 10, 1, RED, true)).unwrap();

        let drawn: HashSet<_> = cells(display).into_iter().collect();
        assert_eq!(
            drawn,
            HashSet::from([(0xFFFE, 10), (0xFFFF, 10), (0, 10), (0xFFFF, 9), (0xFFFF, 11)])
        );
    }

    #[test]
    fn filled_triangle_ending_on_last_row() {
        let mut display = _mock::display(64, 64);
        block_on(display.triangle(0, i32::MAX - 2, 4, i32::MAX, -4, i32::MAX, RED, true)).unwrap();

        assert_eq!(
            display.release().0.windows(),
            std::vec![
                (0, 0xFFFD, 0, 0xFFFD),
                (0xFFFE, 0xFFFE, 2, 0xFFFE),
                (0xFFFC, 0xFFFF, 4, 0xFFFF),
            ]
        );
    }

    proptest! {
        #[test]
        fn hline_matches_per_pixel_writes(x0 in 0i32..200, x1 in 0i32..200, y in 0i32..300) {
            let mut fast = _mock::display(8, 8);
            block_on(fast.hline(x0, x1, y, RED)).unwrap();

            let mut slow = _mock::display(8, 8);
            block_on(async {
                for x in x0.min(x1)..=x0.max(x1) {
                    slow.pixel(x, y, RED).await.unwrap();
                }
            });

            prop_assert_eq!(fast.release().0.gram(), slow.release().0.gram());
        }

        #[test]
        fn filled_rect_writes_each_cell_once(
            x in 0i32..100,
            y in 0i32..100,
            w in 0u16..60,
            h in 0u16..60,
        ) {
            let mut display = _mock::display(8, 8);
            block_on(display.rect(x, y, w, h, BLUE, true)).unwrap();

            let di = display.release().0;
            let writes = di.pixel_writes();
            prop_assert_eq!(writes.len(), usize::from(w) * usize::from(h));
            let unique: HashSet<_> = writes.iter().map(|&(x, y, _)| (x, y)).collect();
            prop_assert_eq!(unique.len(), writes.len());
            for (px, py) in unique {
                prop_assert!(i32::from(px) >= x && i32::from(px) < x + i32::from(w));
                prop_assert!(i32::from(py) >= y && i32::from(py) < y + i32::from(h));
            }
            prop_assert!(di.data_bursts().iter().all(|b| b.len() <= crate::CHUNK_SIZE));
        }

        #[test]
        fn circle_outline_is_eightfold_symmetric(r in 0u16..50) {
            let (cx, cy) = (100i32, 100i32);
            let mut display = _mock::display(8, 8);
            block_on(display.circle(cx, cy, r, RED, false)).unwrap();

            let points: HashSet<(i32, i32)> = cells(display)
                .into_iter()
                .map(|(x, y)| (i32::from(x) - cx, i32::from(y) - cy))
                .collect();
            for &(dx, dy) in &points {
                for p in octants(dx, dy) {
                    prop_assert!(points.contains(&p));
                }
            }
        }

        #[test]
        fn filled_triangle_covers_its_vertices(
            x0 in 0i32..60, y0 in 0i32..60,
            x1 in 0i32..60, y1 in 0i32..60,
            x2 in 0i32..60, y2 in 0i32..60,
        ) {
            let mut display = _mock::display(8, 8);
            block_on(display.triangle(x0, y0, x1, y1, x2, y2, RED, true)).unwrap();

            let di = display.release().0;
            let windows = di.windows();
            prop_assert!(windows.iter().all(|&(_, ya, _, yb)| ya == yb));
            let rows: Vec<_> = windows.iter().map(|w| w.1).collect();
            let (lo, hi) = (y0.min(y1).min(y2), y0.max(y1).max(y2));
            prop_assert_eq!(rows, (lo..=hi).map(|y| y as u16).collect::<Vec<_>>());

            let drawn: HashSet<_> = di.pixel_writes().into_iter().map(|(x, y, _)| (x, y)).collect();
            for (vx, vy) in [(x0, y0), (x1, y1), (x2, y2)] {
                prop_assert!(drawn.contains(&(vx as u16, vy as u16)));
            }
        }
    }
}
