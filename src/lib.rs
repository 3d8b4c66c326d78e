//! Cylon Eyes: a ten-LED scanner on the ATmega4809, clocked entirely by
//! the TCA0 overflow interrupt.
//!
//! Everything except the register backend is target independent. On a
//! host the `sim` module stands in for the hardware.
#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", feature(asm_experimental_arch))]

pub mod animation;
pub mod application;
pub mod config;
pub mod drivers;
pub mod hal;
pub mod logger;

#[cfg(not(target_arch = "avr"))]
pub mod sim;

pub use animation::{step, AnimationState, Direction, Transition, TurnaroundStyle};
pub use application::CylonEyes;
pub use drivers::{LedArray, LedBank, PinBank};
