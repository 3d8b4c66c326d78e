//! Configuration constants for the Cylon Eyes firmware

use crate::animation::TurnaroundStyle;
use crate::hal::timer::{Prescaler, TimerConfig, TimerMode};

/// CPU frequency in Hz, with the CLK_PER prescaler disabled and the
/// fuses selecting the 20MHz oscillator
pub const CPU_FREQ_HZ: u32 = 20_000_000;

/// Number of LEDs in the scanner
pub const LED_COUNT: usize = 10;

/// TCA0 TOP value for a half second overflow.
/// 20MHz/1024 gives a 51.2us timer tick, and 51.2us * 9766 = 0.5000192s
pub const HALF_SEC_COUNT: u16 = 9766;

/// TCA0 clock divider
pub const TIMER_PRESCALER: Prescaler = Prescaler::Div1024;

/// Nominal animation step interval in nanoseconds
pub const STEP_INTERVAL_NS: u64 = 500_000_000;

/// Startup timer configuration, written once before interrupts are enabled
pub const STEP_TIMER: TimerConfig =
    TimerConfig::new(HALF_SEC_COUNT, TIMER_PRESCALER, TimerMode::Normal);

/// How the scanning light turns around at either end
pub const TURNAROUND: TurnaroundStyle = TurnaroundStyle::Bounce;

/// USART3 baud rate for the debug console
pub const CONSOLE_BAUD: u32 = 115_200;
