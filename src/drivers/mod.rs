pub mod led_array;
pub mod pin_bank;

pub use led_array::LedArray;
pub use pin_bank::PinBank;

use crate::animation::Transition;
use crate::hal::gpio::LedIndex;

/// Bulk and single LED control over the scan-ordered array.
pub trait LedBank {
    type Error;

    fn set_all(&mut self) -> Result<(), Self::Error>;
    fn clear_all(&mut self) -> Result<(), Self::Error>;

    /// Light one LED, leaving every other output untouched
    fn set_one(&mut self, index: LedIndex) -> Result<(), Self::Error>;
    fn clear_one(&mut self, index: LedIndex) -> Result<(), Self::Error>;

    /// Old LED off, then new LED on
    fn apply(&mut self, transition: Transition) -> Result<(), Self::Error> {
        if let Some(off) = transition.off {
            self.clear_one(off)?;
        }
        self.set_one(transition.on)
    }
}
