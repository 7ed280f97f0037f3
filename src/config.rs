//! Timing parameters of the DHT11 transaction.

/// Shortest start signal the DHT11 datasheet allows, in milliseconds.
pub const MIN_START_LOW_MS: u32 = 18;

/// Timing configuration for one read cycle.
///
/// The defaults are tuned for the DHT11. All `*_timeout_us` values are poll
/// budgets counted in 1 µs steps, so the real ceiling is slightly longer
/// once the cost of reading the pin is added.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// How long the start signal holds the line low. Never below [`MIN_START_LOW_MS`].
    pub start_low_ms: u32,
    /// High pulse after the start signal before the line is released (20-40 µs).
    pub release_us: u32,
    /// Budget for the sensor to pull the line low after release.
    pub ack_timeout_us: u32,
    /// Wait after the ack low edge before checking that the sensor drives high.
    pub ack_high_check_us: u32,
    /// Budget for the ack high phase to end.
    pub ack_end_timeout_us: u32,
    /// Offset into a bit's high phase at which the line is sampled.
    pub bit_sample_us: u32,
    /// Budget for each edge while reading a bit.
    pub bit_edge_timeout_us: u32,
    /// Pause before the start signal.
    pub settle_ms: u32,
    /// Recovery time the sensor needs between two transactions.
    pub cooldown_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::dht11()
    }
}

impl Config {
    /// Timings for the DHT11.
    pub const fn dht11() -> Self {
        Self {
            start_low_ms: MIN_START_LOW_MS,
            release_us: 30,
            ack_timeout_us: 100,
            ack_high_check_us: 80,
            ack_end_timeout_us: 100,
            bit_sample_us: 40,
            bit_edge_timeout_us: 100,
            settle_ms: 1,
            cooldown_ms: 2_000,
        }
    }

    /// Same config with the start signal raised to the datasheet minimum if needed.
    pub const fn sanitized(self) -> Self {
        let start_low_ms = if self.start_low_ms < MIN_START_LOW_MS {
            MIN_START_LOW_MS
        } else {
            self.start_low_ms
        };
        Self {
            start_low_ms,
            ..self
        }
    }
}
