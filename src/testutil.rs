//! Recording pin double for link and mode-controller tests.

use crate::wires::Wires;
use std::collections::VecDeque;
use std::time::Duration;

/// One output-line transition, in the order it was driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Dsi(bool),
    ClockLow,
    ClockHigh,
    Reset(bool),
}

/// Scripted wires: logs every output edge, accumulates delays and shifts
/// queued response words out on DSO. Input samples are not logged, so a
/// read-only operation leaves `events` empty.
#[derive(Debug, Default)]
pub struct RecordedWires {
    pub events: Vec<Event>,
    pub freeze_high: bool,
    pub total_delay: Duration,
    dso_bits: VecDeque<bool>,
}

impl RecordedWires {
    /// Queue one 17-bit response word to be shifted out MSB first.
    pub fn queue_response(&mut self, word: u32) {
        for bit in (0..17).rev() {
            self.dso_bits.push_back((word >> bit) & 1 == 1);
        }
    }

    pub fn falling_edges(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::ClockLow).count()
    }

    pub fn rising_edges(&self) -> usize {
        self.events
            .iter()
            .filter(|e| **e == Event::ClockHigh)
            .count()
    }

    pub fn last_clock_level(&self) -> Option<bool> {
        self.events.iter().rev().find_map(|e| match e {
            Event::ClockLow => Some(false),
            Event::ClockHigh => Some(true),
            _ => None,
        })
    }

    /// The DSI levels in drive order.
    pub fn driven_bits(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Dsi(level) => Some(*level),
                _ => None,
            })
            .collect()
    }
}

impl Wires for RecordedWires {
    fn set_dsi(&mut self, high: bool) {
        self.events.push(Event::Dsi(high));
    }

    fn dso(&mut self) -> bool {
        self.dso_bits.pop_front().unwrap_or(false)
    }

    fn set_dsclk(&mut self, high: bool) {
        self.events.push(if high {
            Event::ClockHigh
        } else {
            Event::ClockLow
        });
    }

    fn set_reset(&mut self, high: bool) {
        self.events.push(Event::Reset(high));
    }

    fn freeze(&mut self) -> bool {
        self.freeze_high
    }

    fn delay(&mut self, wait: Duration) {
        self.total_delay += wait;
    }
}
