use embedded_hal::delay::DelayNs;

use crate::config::Config;
use crate::error::DhtError;
use crate::frame::{FRAME_LEN, RawFrame, SensorReading};
use crate::line::DataLine;

/// Driver for the DHT11 temperature and humidity sensor.
///
/// One transaction goes through start signal, acknowledgment and 40 data
/// bits. Every wait on the line is bounded by a budget from [`Config`], so a
/// missing or stuck sensor ends in an error instead of a hang.
pub struct Dht11<LINE, D> {
    line: LINE,
    delay: D,
    config: Config,
}

impl<LINE, D, E> Dht11<LINE, D>
where
    LINE: DataLine<Error = E>,
    D: DelayNs,
{
    /// Creates a new instance of the DHT11 driver with the default timings.
    ///
    /// # Arguments
    ///
    /// * `line` - The data line, able to switch between output and input.
    /// * `delay` - A delay provider implementing the `DelayNs` trait. It must
    ///   be accurate to the microsecond.
    pub fn new(line: LINE, delay: D) -> Self {
        Self::with_config(line, delay, Config::dht11())
    }

    /// Creates a driver with custom timings.
    ///
    /// The start signal is raised to the datasheet minimum if `config` asks
    /// for less.
    pub fn with_config(line: LINE, delay: D, config: Config) -> Self {
        Dht11 {
            line,
            delay,
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads a temperature and humidity measurement from the DHT11.
    ///
    /// Runs one full transaction and validates the checksum.
    ///
    /// # Returns
    ///
    /// * `Ok(SensorReading)` if the read is successful and the checksum is valid.
    /// * `Err(DhtError)` if a communication or checksum error occurs.
    pub fn read(&mut self) -> Result<SensorReading, DhtError<E>> {
        let frame = self.read_frame()?;
        frame.validate().map_err(|e| {
            warn!(
                "DHT11 checksum mismatch: expected {=u8:#x}, got {=u8:#x}",
                e.expected,
                e.actual
            );
            DhtError::checksum(e)
        })
    }

    /// Runs one transaction and returns the five raw bytes, unchecked.
    pub fn read_frame(&mut self) -> Result<RawFrame, DhtError<E>> {
        if self.config.settle_ms > 0 {
            self.delay.delay_ms(self.config.settle_ms);
        }

        self.start()?;
        self.await_ack()?;

        let mut bytes = [0; FRAME_LEN];
        for (index, byte) in bytes.iter_mut().enumerate() {
            *byte = self.read_byte(index as u8 * 8)?;
        }

        debug!("DHT11 frame: {:x}", bytes);
        Ok(RawFrame::new(bytes))
    }

    /// Waits out the recovery time the sensor needs before the next transaction.
    pub fn recover(&mut self) {
        self.delay.delay_ms(self.config.cooldown_ms);
    }

    /// Gives back the data line and the delay provider.
    pub fn release(self) -> (LINE, D) {
        (self.line, self.delay)
    }

    /// Sends the start signal and hands the line over to the sensor.
    ///
    /// The line is held low for at least 18 ms, pulsed high for
    /// `release_us`, then switched to input.
    fn start(&mut self) -> Result<(), DhtError<E>> {
        self.line.set_output()?;
        self.line.set_low()?;
        self.delay.delay_ms(self.config.start_low_ms);
        self.line.set_high()?;
        self.delay.delay_us(self.config.release_us);
        self.line.set_input()?;
        Ok(())
    }

    /// Waits for the sensor's response: ~80us low, ~80us high.
    fn await_ack(&mut self) -> Result<(), DhtError<E>> {
        if !self.wait_for_low(self.config.ack_timeout_us)? {
            warn!("DHT11 did not acknowledge start signal");
            return Err(DhtError::AckTimeout);
        }

        self.delay.delay_us(self.config.ack_high_check_us);
        if !self.line.is_high()? {
            warn!("DHT11 acknowledgment is missing its high phase");
            return Err(DhtError::AckHighMissing);
        }

        if !self.wait_for_low(self.config.ack_end_timeout_us)? {
            warn!("DHT11 acknowledgment did not end");
            return Err(DhtError::AckLowTimeout);
        }
        Ok(())
    }

    /// Reads one byte, most significant bit first.
    ///
    /// `first_bit` is the index of the byte's first bit within the frame and
    /// is only used for error reporting.
    fn read_byte(&mut self, first_bit: u8) -> Result<u8, DhtError<E>> {
        let mut byte: u8 = 0;

        for i in 0..8 {
            if self.read_bit(first_bit + i)? {
                byte |= 1 << (7 - i);
            }
        }

        Ok(byte)
    }

    /// Reads a single bit from the sensor.
    ///
    /// Each bit is a ~50us low followed by a high of ~26-28us for `0` or
    /// ~70us for `1`. The line is sampled once at `bit_sample_us` into the
    /// high phase: still high means `1`.
    fn read_bit(&mut self, bit: u8) -> Result<bool, DhtError<E>> {
        let timeout = self.config.bit_edge_timeout_us;

        if !self.wait_for_high(timeout)? {
            return Err(DhtError::BitTimeout { bit });
        }

        self.delay.delay_us(self.config.bit_sample_us);
        let bit_is_one = self.line.is_high()?;

        if !self.wait_for_low(timeout)? {
            return Err(DhtError::BitTimeout { bit });
        }

        Ok(bit_is_one)
    }

    /// Waits until the data line goes high. `Ok(false)` on timeout.
    fn wait_for_high(&mut self, timeout_us: u32) -> Result<bool, E> {
        Self::wait_for_state(&mut self.delay, timeout_us, || self.line.is_high())
    }

    /// Waits until the data line goes low. `Ok(false)` on timeout.
    fn wait_for_low(&mut self, timeout_us: u32) -> Result<bool, E> {
        Self::wait_for_state(&mut self.delay, timeout_us, || self.line.is_low())
    }

    /// Polls `condition` in 1us steps, at most `timeout_us` times.
    fn wait_for_state<F>(delay: &mut D, timeout_us: u32, mut condition: F) -> Result<bool, E>
    where
        F: FnMut() -> Result<bool, E>,
    {
        for _ in 0..timeout_us {
            if condition()? {
                return Ok(true);
            }
            delay.delay_us(1);
        }
        Ok(false)
    }
}
