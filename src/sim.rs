//! A DHT11 simulated at the waveform level, clocked by a [`FakeCounter`].
//!
//! Once the driver releases the line the simulator plays back a scripted
//! list of `(level, duration_us)` phases measured from the release instant.
//! Before release the line reads whatever the driver drives; after the
//! script runs out the pull-up keeps it high.

use core::convert::Infallible;
use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::line::DataLine;
use crate::timer::fake::FakeCounter;

pub const CLOCK_HZ: u32 = 8_000_000;
const CYCLES_PER_US: u32 = CLOCK_HZ / 1_000_000;

pub const ZERO_HIGH_US: u32 = 26;
pub const ONE_HIGH_US: u32 = 70;

/// Response latency, ack low, ack high.
const ACK: [(bool, u32); 3] = [(true, 25), (false, 80), (true, 80)];

#[derive(Default)]
struct Wire {
    script: Vec<(bool, u32)>,
    driving: bool,
    level: bool,
    released_at: Option<u32>,
    starts: Vec<u32>,
}

#[derive(Clone)]
pub struct SimLine {
    clock: FakeCounter,
    wire: Rc<RefCell<Wire>>,
}

impl SimLine {
    /// A sensor that never answers.
    pub fn silent(clock: FakeCounter) -> Self {
        Self::scripted(clock, Vec::new())
    }

    /// A well-behaved sensor sending `bytes`.
    pub fn sending(clock: FakeCounter, bytes: [u8; 5]) -> Self {
        let highs: Vec<u32> = bytes
            .iter()
            .flat_map(|&byte| (0..8u8).map(move |i| (byte >> (7 - i)) & 1))
            .map(|bit| if bit == 1 { ONE_HIGH_US } else { ZERO_HIGH_US })
            .collect();
        Self::with_bit_highs(clock, &highs)
    }

    /// A sensor that acknowledges and then sends one bit per entry of
    /// `highs`, each a 50 µs low followed by a high of the given length.
    pub fn with_bit_highs(clock: FakeCounter, highs: &[u32]) -> Self {
        let mut script = ACK.to_vec();
        for &high in highs {
            script.push((false, 50));
            script.push((true, high));
        }
        script.push((false, 50));
        Self::scripted(clock, script)
    }

    pub fn scripted(clock: FakeCounter, script: Vec<(bool, u32)>) -> Self {
        SimLine {
            clock,
            wire: Rc::new(RefCell::new(Wire {
                script,
                level: true,
                ..Wire::default()
            })),
        }
    }

    /// Cycle counts at which each start signal began.
    pub fn starts(&self) -> Vec<u32> {
        self.wire.borrow().starts.clone()
    }

    /// Cycle count of the most recent release.
    pub fn released_at(&self) -> Option<u32> {
        self.wire.borrow().released_at
    }

    fn level(&self) -> bool {
        let wire = self.wire.borrow();
        if wire.driving {
            return wire.level;
        }
        let Some(released_at) = wire.released_at else {
            return true;
        };

        let elapsed_us = self.clock.peek().wrapping_sub(released_at) / CYCLES_PER_US;
        let mut end = 0;
        for &(level, duration) in &wire.script {
            end += duration;
            if elapsed_us < end {
                return level;
            }
        }
        true
    }
}

impl ErrorType for SimLine {
    type Error = Infallible;
}

impl InputPin for SimLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level())
    }
}

impl OutputPin for SimLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.wire.borrow_mut().level = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.wire.borrow_mut().level = true;
        Ok(())
    }
}

impl DataLine for SimLine {
    fn set_output(&mut self) -> Result<(), Self::Error> {
        let now = self.clock.peek();
        let mut wire = self.wire.borrow_mut();
        wire.driving = true;
        wire.released_at = None;
        wire.starts.push(now);
        Ok(())
    }

    fn set_input(&mut self) -> Result<(), Self::Error> {
        let now = self.clock.peek();
        let mut wire = self.wire.borrow_mut();
        wire.driving = false;
        wire.released_at = Some(now);
        Ok(())
    }
}
