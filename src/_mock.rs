//! Test doubles: a recording display interface that also simulates the
//! controller's memory write pointer, and a no-op delay.

use std::collections::HashMap;

use embassy_futures::block_on;
use embedded_hal_async::delay::DelayNs;

use crate::{
    color::PackedColor,
    interface::{Interface, InterfaceKind},
    models::ST7789,
    Builder, Display, NoResetPin,
};

/// Builds an initialized ST7789 display with a clean event log.
pub fn display(width: u16, height: u16) -> Display<MockDisplayInterface, NoResetPin> {
    let mut display = block_on(
        Builder::new(ST7789, MockDisplayInterface::new())
            .display_size(width, height)
            .init(&mut MockDelay),
    )
    .unwrap();
    unsafe { display.raw_interface_mut() }.clear();
    display
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(u8, Vec<u8>),
    Data(Vec<u8>),
    Select,
    Deselect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

pub struct MockDelay;

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

#[derive(Default)]
pub struct MockDisplayInterface {
    events: Vec<Event>,
    writes: Vec<(u16, u16, PackedColor)>,
    budget: Option<usize>,
    columns: (u16, u16),
    rows: (u16, u16),
    writing: bool,
    cursor: (u16, u16),
    pending: Option<u8>,
}

impl MockDisplayInterface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets `ops` more calls succeed, then fails every call after that.
    pub fn fail_after(&mut self, ops: usize) {
        self.budget = Some(ops);
    }

    /// Forgets everything recorded so far. The write pointer is kept.
    pub fn clear(&mut self) {
        self.events.clear();
        self.writes.clear();
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.clone()
    }

    pub fn commands(&self) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Command(..)))
            .cloned()
            .collect()
    }

    pub fn data_bursts(&self) -> Vec<Vec<u8>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Data(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    /// Address windows as `(x0, y0, x1, y1)`, one per CASET/RASET pair.
    pub fn windows(&self) -> Vec<(u16, u16, u16, u16)> {
        let mut columns = None;
        let mut windows = Vec::new();
        for event in &self.events {
            match event {
                Event::Command(0x2A, args) => columns = Some(range(args)),
                Event::Command(0x2B, args) => {
                    if let Some((x0, x1)) = columns.take() {
                        let (y0, y1) = range(args);
                        windows.push((x0, y0, x1, y1));
                    }
                }
                _ => {}
            }
        }
        windows
    }

    /// Every pixel written to display memory, in order.
    pub fn pixel_writes(&self) -> Vec<(u16, u16, PackedColor)> {
        self.writes.clone()
    }

    /// The last color written to a cell.
    pub fn pixel_at(&self, x: u16, y: u16) -> Option<PackedColor> {
        self.writes
            .iter()
            .rev()
            .find(|&&(px, py, _)| (px, py) == (x, y))
            .map(|&(_, _, c)| c)
    }

    /// Final contents of every cell that was written.
    pub fn gram(&self) -> HashMap<(u16, u16), PackedColor> {
        self.writes
            .iter()
            .map(|&(x, y, c)| ((x, y), c))
            .collect()
    }

    fn tick(&mut self) -> Result<(), MockError> {
        match self.budget {
            Some(0) => Err(MockError),
            Some(n) => {
                self.budget = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn command(&mut self, command: u8, args: &[u8]) {
        self.writing = false;
        match command {
            0x2A => self.columns = range(args),
            0x2B => self.rows = range(args),
            0x2C => {
                self.writing = true;
                self.cursor = (self.columns.0, self.rows.0);
                self.pending = None;
            }
            _ => {}
        }
    }

    fn data(&mut self, data: &[u8]) {
        if !self.writing {
            return;
        }
        for &byte in data {
            let Some(high) = self.pending.take() else {
                self.pending = Some(byte);
                continue;
            };
            let (x, y) = self.cursor;
            self.writes
                .push((x, y, PackedColor::from_u16(u16::from_be_bytes([high, byte]))));

            self.cursor = if x == self.columns.1 {
                let y = if y == self.rows.1 {
                    self.rows.0
                } else {
                    y.wrapping_add(1)
                };
                (self.columns.0, y)
            } else {
                (x.wrapping_add(1), y)
            };
        }
    }
}

fn range(args: &[u8]) -> (u16, u16) {
    match args {
        [s0, s1, e0, e1] => (u16::from_be_bytes([*s0, *s1]), u16::from_be_bytes([*e0, *e1])),
        _ => (0, 0),
    }
}

impl Interface for MockDisplayInterface {
    type Error = MockError;

    const KIND: InterfaceKind = InterfaceKind::Serial4Line;

    async fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), MockError> {
        self.tick()?;
        self.events.push(Event::Command(command, args.to_vec()));
        self.command(command, args);
        Ok(())
    }

    async fn send_data_slice(&mut self, data: &[u8]) -> Result<(), MockError> {
        self.tick()?;
        self.events.push(Event::Data(data.to_vec()));
        self.data(data);
        Ok(())
    }

    async fn select(&mut self) -> Result<(), MockError> {
        self.tick()?;
        self.events.push(Event::Select);
        Ok(())
    }

    async fn deselect(&mut self) -> Result<(), MockError> {
        self.tick()?;
        self.events.push(Event::Deselect);
        Ok(())
    }
}
