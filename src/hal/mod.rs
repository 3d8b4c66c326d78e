pub mod clock;
pub mod gpio;
pub mod timer;

#[cfg(target_arch = "avr")]
pub mod atmega4809;
#[cfg(target_arch = "avr")]
pub mod power;
#[cfg(target_arch = "avr")]
pub mod uart;

// Re-export commonly used types
pub use clock::ClockControl;
pub use gpio::{LedIndex, LedSlot, Port, PortRegisters, LED_MAP};
pub use timer::{OverflowTimer, Prescaler, TimerConfig, TimerMode};

#[cfg(target_arch = "avr")]
pub use atmega4809::{Clock, Ports, Tca0};
#[cfg(target_arch = "avr")]
pub use power::Power;
#[cfg(target_arch = "avr")]
pub use uart::Uart;
