//! One read-report cycle: read the sensor, print the outcome, wait out the
//! sensor's recovery time.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::StatefulOutputPin;

use crate::dht11::Dht11;
use crate::error::DhtError;
use crate::frame::SensorReading;
use crate::line::DataLine;

/// Printed when the frame arrived but its checksum was wrong.
pub const CHECKSUM_ERROR_LINE: &str = "DHT11 checksum error";
/// Printed when the sensor did not complete the acknowledgment.
pub const NO_RESPONSE_LINE: &str = "DHT11 no response";
/// Printed when the transaction broke off while reading data bits or the pin failed.
pub const READ_ERROR_LINE: &str = "DHT11 read error";

/// Drives a [`Dht11`] and reports every outcome on a serial sink.
///
/// A good read toggles `indicator`, so a blinking LED shows the sensor is
/// alive.
pub struct Reporter<LINE, D, W, LED> {
    sensor: Dht11<LINE, D>,
    serial: W,
    indicator: LED,
}

impl<LINE, D, W, LED, E> Reporter<LINE, D, W, LED>
where
    LINE: DataLine<Error = E>,
    D: DelayNs,
    W: Write,
    LED: StatefulOutputPin,
{
    pub fn new(sensor: Dht11<LINE, D>, serial: W, indicator: LED) -> Self {
        Reporter {
            sensor,
            serial,
            indicator,
        }
    }

    /// Performs one full read-report cycle.
    ///
    /// Blocks for the sensor's cool-down before returning, whatever the
    /// outcome, so calling this in a loop never reads the sensor too early.
    /// Failures writing to `serial` or toggling `indicator` are logged and
    /// do not change the returned result.
    pub fn cycle(&mut self) -> Result<SensorReading, DhtError<E>> {
        let result = self.sensor.read();

        match &result {
            Ok(reading) => {
                if self.indicator.toggle().is_err() {
                    warn!("failed to toggle read indicator");
                }
                info!(
                    "humidity {=u8}.{=u8} %, temperature {=u8}.{=u8} C",
                    reading.humidity_integer,
                    reading.humidity_fraction,
                    reading.temperature_integer,
                    reading.temperature_fraction
                );
                self.emit(format_args!("{reading}"));
            }
            Err(DhtError::ChecksumMismatch { .. }) => {
                self.emit(format_args!("{CHECKSUM_ERROR_LINE}"));
            }
            Err(e) if e.is_no_response() => {
                self.emit(format_args!("{NO_RESPONSE_LINE}"));
            }
            Err(_) => {
                error!("DHT11 transaction aborted");
                self.emit(format_args!("{READ_ERROR_LINE}"));
            }
        }

        self.sensor.recover();
        result
    }

    /// Gives back the driver, the serial sink and the indicator.
    pub fn release(self) -> (Dht11<LINE, D>, W, LED) {
        (self.sensor, self.serial, self.indicator)
    }

    fn emit(&mut self, line: core::fmt::Arguments<'_>) {
        if write!(self.serial, "{line}\r\n").is_err() {
            warn!("serial write failed");
        }
    }
}
