//! Transmit-only USART3, the USB serial bridge on the Nano Every

use core::convert::Infallible;

use avr_device::atmega4809::USART3;

use super::gpio::{Port, PortRegisters, PIN4_BM};
use crate::config::{CONSOLE_BAUD, CPU_FREQ_HZ};

const STATUS_DREIF: u8 = 1 << 5;
const CTRLB_TXEN: u8 = 1 << 6;

/// Normal speed mode: BAUD = 64 * f / (16 * baud)
const BAUD_VALUE: u16 = ((4 * CPU_FREQ_HZ as u64 + CONSOLE_BAUD as u64 / 2) / CONSOLE_BAUD as u64) as u16;

pub struct Uart {
    usart: USART3,
}

impl Uart {
    /// TX pin is PB4. CLK_PER must already run undivided.
    /// CTRLC keeps its reset value, asynchronous 8N1.
    pub fn new<P: PortRegisters>(usart: USART3, ports: &mut P) -> Self {
        ports.set_bits(Port::B, PIN4_BM);
        ports.make_outputs(Port::B, PIN4_BM);
        // SAFETY: BAUD takes any value, CTRLB only gets TXEN
        unsafe {
            usart.baud.write(|w| w.bits(BAUD_VALUE));
            usart.ctrlb.write(|w| w.bits(CTRLB_TXEN));
        }
        Self { usart }
    }

    pub fn write_byte(&mut self, byte: u8) {
        while self.usart.status.read().bits() & STATUS_DREIF == 0 {}
        // SAFETY: any byte is valid data
        self.usart.txdatal.write(|w| unsafe { w.bits(byte) });
    }
}

impl ufmt::uWrite for Uart {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}
