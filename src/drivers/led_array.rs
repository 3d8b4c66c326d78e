use core::convert::Infallible;

use super::LedBank;
use crate::config::LED_COUNT;
use crate::hal::gpio::{direction_masks, LedIndex, LedSlot, Port, PortRegisters, LED_MAP};

/// LEDs driven through the OUTSET/OUTCLR registers of their ports.
///
/// Single-bit writes only, so LEDs sharing a port never disturb each other
/// and no read-modify-write can race the overflow interrupt.
pub struct LedArray<P> {
    ports: P,
    map: &'static [LedSlot; LED_COUNT],
}

impl<P: PortRegisters> LedArray<P> {
    pub fn new(ports: P) -> Self {
        Self::with_map(ports, &LED_MAP)
    }

    pub fn with_map(ports: P, map: &'static [LedSlot; LED_COUNT]) -> Self {
        Self { ports, map }
    }

    /// Set DIR for every mapped pin
    pub fn init_outputs(&mut self) {
        let masks = direction_masks(self.map);
        for port in Port::ALL {
            let mask = masks[port.index()];
            if mask != 0 {
                self.ports.make_outputs(port, mask);
            }
        }
    }

    pub fn slot(&self, index: LedIndex) -> LedSlot {
        self.map[index.as_usize()]
    }

    pub fn ports(&self) -> &P {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut P {
        &mut self.ports
    }

    pub fn release(self) -> P {
        self.ports
    }
}

impl<P: PortRegisters> LedBank for LedArray<P> {
    type Error = Infallible;

    fn set_all(&mut self) -> Result<(), Self::Error> {
        for slot in self.map.iter() {
            self.ports.set_bits(slot.port, slot.mask);
        }
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), Self::Error> {
        for slot in self.map.iter() {
            self.ports.clear_bits(slot.port, slot.mask);
        }
        Ok(())
    }

    #[inline]
    fn set_one(&mut self, index: LedIndex) -> Result<(), Self::Error> {
        let slot = self.slot(index);
        self.ports.set_bits(slot.port, slot.mask);
        Ok(())
    }

    #[inline]
    fn clear_one(&mut self, index: LedIndex) -> Result<(), Self::Error> {
        let slot = self.slot(index);
        self.ports.clear_bits(slot.port, slot.mask);
        Ok(())
    }
}
