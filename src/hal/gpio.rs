use crate::config::LED_COUNT;

/// ATmega4809 I/O ports
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
}

pub const PORT_COUNT: usize = 6;

impl Port {
    pub const ALL: [Port; PORT_COUNT] = [Port::A, Port::B, Port::C, Port::D, Port::E, Port::F];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

pub const PIN0_BM: u8 = 1 << 0;
pub const PIN1_BM: u8 = 1 << 1;
pub const PIN2_BM: u8 = 1 << 2;
pub const PIN3_BM: u8 = 1 << 3;
pub const PIN4_BM: u8 = 1 << 4;
pub const PIN5_BM: u8 = 1 << 5;
pub const PIN6_BM: u8 = 1 << 6;

/// Position in the LED array. Always below `LED_COUNT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LedIndex(u8);

impl LedIndex {
    pub const FIRST: LedIndex = LedIndex(0);
    pub const LAST: LedIndex = LedIndex(LED_COUNT as u8 - 1);

    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < LED_COUNT {
            Some(LedIndex(index))
        } else {
            None
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Next index towards `LAST`, or `None` at the end
    pub const fn next(self) -> Option<Self> {
        LedIndex::new(self.0 + 1)
    }

    /// Next index towards `FIRST`, or `None` at the start
    pub const fn prev(self) -> Option<Self> {
        match self.0.checked_sub(1) {
            Some(i) => Some(LedIndex(i)),
            None => None,
        }
    }

    pub fn all() -> impl Iterator<Item = LedIndex> {
        (0..LED_COUNT as u8).map(LedIndex)
    }
}

/// One physical LED: a port and the single bit driving it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedSlot {
    pub port: Port,
    pub mask: u8,
}

impl LedSlot {
    pub const fn new(port: Port, mask: u8) -> Self {
        Self { port, mask }
    }
}

/// Arduino Nano Every wiring, in scan order.
/// LED0-7 are UNO D0-D7, LED8 and LED9 are PA2 and PA3.
pub const LED_MAP: [LedSlot; LED_COUNT] = [
    LedSlot::new(Port::C, PIN5_BM), // D0 (RXD1)
    LedSlot::new(Port::C, PIN4_BM), // D1 (TXD1)
    LedSlot::new(Port::A, PIN0_BM), // D2
    LedSlot::new(Port::F, PIN5_BM), // D3
    LedSlot::new(Port::C, PIN6_BM), // D4
    LedSlot::new(Port::B, PIN2_BM), // D5
    LedSlot::new(Port::F, PIN4_BM), // D6
    LedSlot::new(Port::A, PIN1_BM), // D7
    LedSlot::new(Port::A, PIN2_BM),
    LedSlot::new(Port::A, PIN3_BM),
];

/// Per-port DIR masks covering every slot of `map`
pub const fn direction_masks(map: &[LedSlot; LED_COUNT]) -> [u8; PORT_COUNT] {
    let mut masks = [0u8; PORT_COUNT];
    let mut i = 0;
    while i < LED_COUNT {
        let slot = map[i];
        masks[slot.port.index()] |= slot.mask;
        i += 1;
    }
    masks
}

/// Memory-mapped port access: direction and the atomic OUTSET/OUTCLR
/// registers. Every method is a single register write, never a
/// read-modify-write of OUT.
pub trait PortRegisters {
    /// DIRSET
    fn make_outputs(&mut self, port: Port, mask: u8);
    /// OUTSET
    fn set_bits(&mut self, port: Port, mask: u8);
    /// OUTCLR
    fn clear_bits(&mut self, port: Port, mask: u8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_masks_match_board_wiring() {
        let masks = direction_masks(&LED_MAP);
        assert_eq!(masks[Port::A.index()], 0x0F);
        assert_eq!(masks[Port::B.index()], 0x04);
        assert_eq!(masks[Port::C.index()], 0x70);
        assert_eq!(masks[Port::D.index()], 0x00);
        assert_eq!(masks[Port::E.index()], 0x00);
        assert_eq!(masks[Port::F.index()], 0x30);
    }

    #[test]
    fn every_slot_is_a_distinct_single_bit() {
        for (i, a) in LED_MAP.iter().enumerate() {
            assert_eq!(a.mask.count_ones(), 1);
            for b in LED_MAP.iter().skip(i + 1) {
                assert!(a != b);
            }
        }
    }

    #[test]
    fn led_index_bounds() {
        assert_eq!(LedIndex::new(9), Some(LedIndex::LAST));
        assert_eq!(LedIndex::new(10), None);
        assert_eq!(LedIndex::LAST.next(), None);
        assert_eq!(LedIndex::FIRST.prev(), None);
        assert_eq!(LedIndex::FIRST.next().map(LedIndex::get), Some(1));
        assert_eq!(LedIndex::all().count(), LED_COUNT);
    }
}
