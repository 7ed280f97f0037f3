//! Direction control for the single-wire data line.

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// A GPIO that can be switched between driving the data line and listening to it.
///
/// The line is expected to carry an external pull-up, so neither mode enables
/// an internal pull resistor.
pub trait DataLine: InputPin + OutputPin {
    /// Configures the pin as an open-drain output without pull.
    fn set_output(&mut self) -> Result<(), Self::Error>;

    /// Configures the pin as a floating input, handing the line to the sensor.
    fn set_input(&mut self) -> Result<(), Self::Error>;
}

impl<T: DataLine + ?Sized> DataLine for &mut T {
    fn set_output(&mut self) -> Result<(), Self::Error> {
        T::set_output(self)
    }

    fn set_input(&mut self) -> Result<(), Self::Error> {
        T::set_input(self)
    }
}

/// Wraps a pin that is permanently configured as open-drain output with
/// readable input.
///
/// With open-drain, driving high is the same as releasing the line, so no
/// reconfiguration is needed: [`DataLine::set_input`] just lets go.
pub struct OpenDrainLine<P> {
    pin: P,
}

impl<P> OpenDrainLine<P> {
    pub fn new(pin: P) -> Self {
        OpenDrainLine { pin }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: ErrorType> ErrorType for OpenDrainLine<P> {
    type Error = P::Error;
}

impl<P: InputPin> InputPin for OpenDrainLine<P> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low()
    }
}

impl<P: OutputPin> OutputPin for OpenDrainLine<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }
}

impl<P: InputPin + OutputPin> DataLine for OpenDrainLine<P> {
    fn set_output(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_input(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }
}
