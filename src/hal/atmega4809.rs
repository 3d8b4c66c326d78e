//! Register backend for the ATmega4809.
//!
//! Each wrapper owns the `avr_device` peripheral singletons it drives, so
//! holding one proves exclusive use of those registers. TCA0 has no
//! peripheral in the PAC; `Tca0` writes its registers by address and is
//! only constructible through an `unsafe` claim.

use avr_device::atmega4809::{CLKCTRL, CPU, PORTA, PORTB, PORTC, PORTD, PORTE, PORTF};

use super::clock::{ClockControl, MCLKCTRLB_NO_PRESCALE};
use super::gpio::{Port, PortRegisters};
use super::timer::{OverflowTimer, TimerConfig, OVF_BIT};

const TCA0_BASE: u16 = 0x0A00;
const TCA0_CTRLA: u16 = TCA0_BASE;
const TCA0_CTRLB: u16 = TCA0_BASE + 0x01;
const TCA0_EVCTRL: u16 = TCA0_BASE + 0x09;
const TCA0_INTCTRL: u16 = TCA0_BASE + 0x0A;
const TCA0_INTFLAGS: u16 = TCA0_BASE + 0x0B;
const TCA0_PER: u16 = TCA0_BASE + 0x26;

/// CCP signature unlocking IO registers for four instructions
const CCP_IOREG: u8 = 0xD8;

#[inline(always)]
fn tca0_write(addr: u16, value: u8) {
    // SAFETY: only TCA0 register addresses, and only through `Tca0`,
    // of which a single instance exists.
    unsafe { core::ptr::write_volatile(addr as *mut u8, value) }
}

#[inline(always)]
fn tca0_read(addr: u16) -> u8 {
    // SAFETY: as for tca0_write
    unsafe { core::ptr::read_volatile(addr as *const u8) }
}

/// All six I/O ports
pub struct Ports {
    a: PORTA,
    b: PORTB,
    c: PORTC,
    d: PORTD,
    e: PORTE,
    f: PORTF,
}

impl Ports {
    pub fn new(a: PORTA, b: PORTB, c: PORTC, d: PORTD, e: PORTE, f: PORTF) -> Self {
        Self { a, b, c, d, e, f }
    }
}

// Single register write on the selected port
macro_rules! port_write {
    ($self:ident, $port:expr, $reg:ident, $mask:expr) => {
        // SAFETY: any bit pattern is valid for DIRSET/OUTSET/OUTCLR
        unsafe {
            match $port {
                Port::A => $self.a.$reg.write(|w| w.bits($mask)),
                Port::B => $self.b.$reg.write(|w| w.bits($mask)),
                Port::C => $self.c.$reg.write(|w| w.bits($mask)),
                Port::D => $self.d.$reg.write(|w| w.bits($mask)),
                Port::E => $self.e.$reg.write(|w| w.bits($mask)),
                Port::F => $self.f.$reg.write(|w| w.bits($mask)),
            }
        }
    };
}

impl PortRegisters for Ports {
    #[inline]
    fn make_outputs(&mut self, port: Port, mask: u8) {
        port_write!(self, port, dirset, mask);
    }

    #[inline]
    fn set_bits(&mut self, port: Port, mask: u8) {
        port_write!(self, port, outset, mask);
    }

    #[inline]
    fn clear_bits(&mut self, port: Port, mask: u8) {
        port_write!(self, port, outclr, mask);
    }
}

/// TCA0 in single (16-bit) mode
pub struct Tca0 {
    _private: (),
}

impl Tca0 {
    /// # Safety
    ///
    /// Call at most once. The returned value must be the only code
    /// writing TCA0 registers, apart from `acknowledge_stray`.
    pub unsafe fn new() -> Self {
        Self { _private: () }
    }

    /// Clear the overflow flag without owning the timer. Used by the ISR
    /// when no application is installed, so a stray overflow cannot storm.
    #[inline(always)]
    pub fn acknowledge_stray() {
        tca0_write(TCA0_INTFLAGS, OVF_BIT);
    }
}

impl OverflowTimer for Tca0 {
    fn configure(&mut self, config: &TimerConfig) {
        tca0_write(TCA0_INTCTRL, OVF_BIT);
        tca0_write(TCA0_CTRLB, config.mode.ctrlb_bits());
        // No event counting
        tca0_write(TCA0_EVCTRL, 0);
        // 16-bit registers latch through TEMP: low byte first
        let [lo, hi] = config.period.to_le_bytes();
        tca0_write(TCA0_PER, lo);
        tca0_write(TCA0_PER + 1, hi);
        // Prescaler and ENABLE last, this starts the count
        tca0_write(TCA0_CTRLA, config.prescaler.ctrla_bits());
    }

    #[inline(always)]
    fn acknowledge_overflow(&mut self) {
        // Flags are cleared by writing one
        tca0_write(TCA0_INTFLAGS, OVF_BIT);
    }

    #[inline]
    fn overflow_pending(&self) -> bool {
        tca0_read(TCA0_INTFLAGS) & OVF_BIT != 0
    }
}

/// Clock controller, together with the CPU block for CCP
pub struct Clock {
    _clkctrl: CLKCTRL,
    _cpu: CPU,
}

impl Clock {
    pub fn new(clkctrl: CLKCTRL, cpu: CPU) -> Self {
        Self {
            _clkctrl: clkctrl,
            _cpu: cpu,
        }
    }
}

impl ClockControl for Clock {
    fn disable_prescaler(&mut self) {
        // MCLKCTRLB is CCP protected: the write has to follow the
        // signature within four instructions, so both stores go in one
        // asm block.
        // SAFETY: we own CLKCTRL and CPU; only CCP and MCLKCTRLB are written.
        unsafe {
            let ccp = core::ptr::addr_of!((*CPU::ptr()).ccp) as u16;
            let mclkctrlb = core::ptr::addr_of!((*CLKCTRL::ptr()).mclkctrlb) as u16;
            core::arch::asm!(
                "st X, {sig}",
                "st Z, {val}",
                sig = in(reg) CCP_IOREG,
                val = in(reg) MCLKCTRLB_NO_PRESCALE,
                in("X") ccp,
                in("Z") mclkctrlb,
                options(nostack, preserves_flags),
            );
        }
    }
}
