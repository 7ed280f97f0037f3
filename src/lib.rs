//! DHT11 Sensor Driver for Embedded Rust
//!
//! This crate bit-bangs the DHT11 single-wire protocol over one GPIO pin,
//! validates the 5-byte frame and reports readings over a serial sink.
//! It is built on top of the [`embedded-hal`] traits.
//!
//! # Features
//! - Blocking synchronous API, designed for `no_std` environments
//! - Every wait on the data line is bounded: a disconnected sensor yields
//!   an error, never a hang
//! - Busy-wait microsecond timer over any free-running cycle counter
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for the data line, plus [`DataLine`] to
//!   switch its direction
//! - [`StatefulOutputPin`] for the good-read indicator
//! - [`DelayNs`] for accurate timing
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and emits log messages through `defmt`
//! - `cortex-m`: Provides [`DwtCounter`](timer::DwtCounter), a cycle counter
//!   backed by the Cortex-M DWT unit
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`StatefulOutputPin`]: embedded_hal::digital::StatefulOutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod dht11;
pub mod error;
pub mod frame;
pub mod line;
pub mod reporter;
pub mod timer;

#[cfg(test)]
mod sim;

pub use config::Config;
pub use dht11::Dht11;
pub use error::DhtError;
pub use frame::{ChecksumError, RawFrame, SensorReading};
pub use line::{DataLine, OpenDrainLine};
pub use reporter::Reporter;
pub use timer::{CycleCounter, MicrosecondTimer};
