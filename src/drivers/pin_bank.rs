use embedded_hal::digital::v2::OutputPin;

use super::LedBank;
use crate::config::LED_COUNT;
use crate::hal::gpio::LedIndex;

/// The LED array over individual `embedded-hal` output pins, active high.
/// Lets the animation run on any board with a HAL instead of raw ports.
pub struct PinBank<P> {
    pins: [P; LED_COUNT],
}

impl<P: OutputPin> PinBank<P> {
    pub fn new(pins: [P; LED_COUNT]) -> Self {
        Self { pins }
    }

    pub fn release(self) -> [P; LED_COUNT] {
        self.pins
    }
}

impl<P: OutputPin> LedBank for PinBank<P> {
    type Error = P::Error;

    fn set_all(&mut self) -> Result<(), Self::Error> {
        for pin in self.pins.iter_mut() {
            pin.set_high()?;
        }
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), Self::Error> {
        for pin in self.pins.iter_mut() {
            pin.set_low()?;
        }
        Ok(())
    }

    fn set_one(&mut self, index: LedIndex) -> Result<(), Self::Error> {
        self.pins[index.as_usize()].set_high()
    }

    fn clear_one(&mut self, index: LedIndex) -> Result<(), Self::Error> {
        self.pins[index.as_usize()].set_low()
    }
}
