//! Periodic overflow timer (TCA0 in single mode)

use core::convert::Infallible;

/// TCA clock divider, CTRLA.CLKSEL
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Prescaler {
    Div1 = 0,
    Div2 = 1,
    Div4 = 2,
    Div8 = 3,
    Div16 = 4,
    Div64 = 5,
    Div256 = 6,
    Div1024 = 7,
}

impl Prescaler {
    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::Div1 => 1,
            Prescaler::Div2 => 2,
            Prescaler::Div4 => 4,
            Prescaler::Div8 => 8,
            Prescaler::Div16 => 16,
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
            Prescaler::Div1024 => 1024,
        }
    }

    /// CTRLA value: CLKSEL in bits 3:1, ENABLE in bit 0
    pub const fn ctrla_bits(self) -> u8 {
        ((self as u8) << 1) | CTRLA_ENABLE
    }
}

/// Waveform generation mode, CTRLB.WGMODE
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TimerMode {
    /// Count up to PER, overflow, restart from zero
    Normal = 0,
}

impl TimerMode {
    pub const fn ctrlb_bits(self) -> u8 {
        self as u8
    }
}

pub const CTRLA_ENABLE: u8 = 1 << 0;
/// INTCTRL / INTFLAGS overflow bit
pub const OVF_BIT: u8 = 1 << 0;

/// Write-once counter configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerConfig {
    pub period: u16,
    pub prescaler: Prescaler,
    pub mode: TimerMode,
}

impl TimerConfig {
    pub const fn new(period: u16, prescaler: Prescaler, mode: TimerMode) -> Self {
        Self {
            period,
            prescaler,
            mode,
        }
    }

    /// Length of one timer tick in nanoseconds
    pub const fn tick_period_ns(&self, clock_hz: u32) -> u64 {
        self.prescaler.divisor() as u64 * 1_000_000_000 / clock_hz as u64
    }

    /// Time between two overflows in nanoseconds.
    ///
    /// Computed as `period * prescaler / clock`, so PER 9766 at 20MHz/1024
    /// gives 500_019_200ns. The 19.2us excess over half a second is
    /// expected and is not corrected.
    pub const fn overflow_interval_ns(&self, clock_hz: u32) -> u64 {
        self.period as u64 * self.prescaler.divisor() as u64 * 1_000_000_000 / clock_hz as u64
    }

    /// Signed deviation from `nominal_ns` in parts per million
    pub const fn error_ppm(&self, clock_hz: u32, nominal_ns: u64) -> i64 {
        let actual = self.overflow_interval_ns(clock_hz) as i64;
        let nominal = nominal_ns as i64;
        (actual - nominal) * 1_000_000 / nominal
    }
}

/// A hardware counter raising one interrupt per overflow.
pub trait OverflowTimer {
    /// Program mode, period and overflow interrupt, then start counting.
    fn configure(&mut self, config: &TimerConfig);

    /// Clear the overflow flag. Must run first in the overflow handler,
    /// otherwise the interrupt fires again as soon as the handler returns.
    fn acknowledge_overflow(&mut self);

    fn overflow_pending(&self) -> bool;

    /// Poll for a pending overflow. Does not acknowledge it.
    fn wait(&mut self) -> nb::Result<(), Infallible> {
        if self.overflow_pending() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CPU_FREQ_HZ, STEP_INTERVAL_NS, STEP_TIMER};

    #[test]
    fn tick_is_51_2_us() {
        assert_eq!(STEP_TIMER.tick_period_ns(CPU_FREQ_HZ), 51_200);
    }

    #[test]
    fn half_second_overflow_interval() {
        // 500.0192 ms
        assert_eq!(STEP_TIMER.overflow_interval_ns(CPU_FREQ_HZ), 500_019_200);
        assert_eq!(STEP_TIMER.error_ppm(CPU_FREQ_HZ, STEP_INTERVAL_NS), 38);
    }

    #[test]
    fn ctrla_matches_div1024_enable() {
        assert_eq!(Prescaler::Div1024.ctrla_bits(), 0b0000_1111);
        assert_eq!(Prescaler::Div1.ctrla_bits(), 0b0000_0001);
        assert_eq!(TimerMode::Normal.ctrlb_bits(), 0);
    }

    #[test]
    fn divisors() {
        assert_eq!(Prescaler::Div64.divisor(), 64);
        assert_eq!(Prescaler::Div256.divisor(), 256);
    }
}
