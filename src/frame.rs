use core::fmt;

/// Number of bytes in one DHT11 transmission.
pub const FRAME_LEN: usize = 5;

/// The five bytes captured during one transaction, in wire order:
/// humidity integer, humidity fraction, temperature integer,
/// temperature fraction, checksum.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFrame([u8; FRAME_LEN]);

/// Checksum byte did not match the sum of the data bytes.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChecksumError {
    /// Truncated sum of the four data bytes.
    pub expected: u8,
    /// Checksum byte sent by the sensor.
    pub actual: u8,
}

impl RawFrame {
    pub const fn new(bytes: [u8; FRAME_LEN]) -> Self {
        RawFrame(bytes)
    }

    pub const fn bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Checksum byte as transmitted by the sensor.
    pub const fn checksum(&self) -> u8 {
        self.0[4]
    }

    /// 8-bit wrapping sum of the four data bytes.
    pub fn computed_checksum(&self) -> u8 {
        self.0[..4].iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
    }

    /// Checks the frame and converts it into a [`SensorReading`].
    ///
    /// Consumes the frame: it is discarded whatever the outcome.
    pub fn validate(self) -> Result<SensorReading, ChecksumError> {
        let expected = self.computed_checksum();
        let actual = self.checksum();
        if expected != actual {
            return Err(ChecksumError { expected, actual });
        }

        let [humidity_integer, humidity_fraction, temperature_integer, temperature_fraction, _] =
            self.0;
        Ok(SensorReading {
            humidity_integer,
            humidity_fraction,
            temperature_integer,
            temperature_fraction,
        })
    }
}

impl From<[u8; FRAME_LEN]> for RawFrame {
    fn from(bytes: [u8; FRAME_LEN]) -> Self {
        RawFrame(bytes)
    }
}

/// A checksum-validated reading from the DHT11.
///
/// The DHT11 reports each quantity as an integer part and a one-digit
/// fractional part. No range checks are applied.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SensorReading {
    pub humidity_integer: u8,
    pub humidity_fraction: u8,
    pub temperature_integer: u8,
    pub temperature_fraction: u8,
}

impl SensorReading {
    /// Relative humidity in percent.
    pub fn humidity(&self) -> f32 {
        self.humidity_integer as f32 + self.humidity_fraction as f32 / 10.0
    }

    /// Temperature in degrees Celsius.
    pub fn temperature(&self) -> f32 {
        self.temperature_integer as f32 + self.temperature_fraction as f32 / 10.0
    }
}

impl fmt::Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Humidity: {}.{} % RH \t Temperature: {}.{} deg C",
            self.humidity_integer,
            self.humidity_fraction,
            self.temperature_integer,
            self.temperature_fraction
        )
    }
}
