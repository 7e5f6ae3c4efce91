//! Blitz turn countdown.

use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlitzTimer {
    initial: u32,
    remaining: u32,
}

impl BlitzTimer {
    pub fn new(seconds: u32) -> Self {
        Self { initial: seconds, remaining: seconds }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Count one second down. Returns `true` when the countdown has just hit zero.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    pub fn reset(&mut self) {
        self.remaining = self.initial;
    }
}
