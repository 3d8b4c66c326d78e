//! Hosted stand-ins for the ATmega4809 registers.
//!
//! The overflow handler runs exactly as on the device, against register
//! state kept in plain memory. `Simulation` plays the role of the
//! interrupt controller: each `overflow()` raises the flag and calls the
//! handler once.

use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::{AnimationState, TurnaroundStyle};
use crate::application::{log_startup, startup, CylonEyes};
use crate::config::{CPU_FREQ_HZ, STEP_TIMER, TURNAROUND};
use crate::drivers::LedArray;
use crate::hal::clock::ClockControl;
use crate::hal::gpio::{LedIndex, Port, PortRegisters, LED_MAP, PORT_COUNT};
use crate::hal::timer::{OverflowTimer, TimerConfig};
use crate::logger::Logger;

/// Register writes and acknowledgements, in the order they happened
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusEvent {
    Ack,
    Set(Port, u8),
    Clear(Port, u8),
}

/// Event log shared by the simulated peripherals
pub type Bus = Rc<RefCell<Vec<BusEvent>>>;

/// DIR and OUT of every port
#[derive(Default, Debug, Clone)]
pub struct SimPorts {
    dir: [u8; PORT_COUNT],
    out: [u8; PORT_COUNT],
    writes: u32,
    bus: Bus,
}

impl SimPorts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_bus(bus: Bus) -> Self {
        Self {
            bus,
            ..Self::default()
        }
    }

    pub fn dir(&self, port: Port) -> u8 {
        self.dir[port.index()]
    }

    pub fn out(&self, port: Port) -> u8 {
        self.out[port.index()]
    }

    /// OUT of all ports, indexed by `Port::index`
    pub fn snapshot(&self) -> [u8; PORT_COUNT] {
        self.out
    }

    /// Number of OUTSET/OUTCLR writes so far
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// Force OUT bits as some other owner of the port would
    pub fn preload(&mut self, port: Port, bits: u8) {
        self.out[port.index()] |= bits;
    }

    /// Indices of the mapped LEDs currently driven high
    pub fn lit(&self) -> Vec<LedIndex> {
        LedIndex::all()
            .filter(|i| {
                let slot = LED_MAP[i.as_usize()];
                self.out(slot.port) & slot.mask != 0
            })
            .collect()
    }
}

impl PortRegisters for SimPorts {
    fn make_outputs(&mut self, port: Port, mask: u8) {
        self.dir[port.index()] |= mask;
    }

    fn set_bits(&mut self, port: Port, mask: u8) {
        self.out[port.index()] |= mask;
        self.writes += 1;
        self.bus.borrow_mut().push(BusEvent::Set(port, mask));
    }

    fn clear_bits(&mut self, port: Port, mask: u8) {
        self.out[port.index()] &= !mask;
        self.writes += 1;
        self.bus.borrow_mut().push(BusEvent::Clear(port, mask));
    }
}

/// TCA0 model: configuration, overflow flag and a tick counter
#[derive(Default, Debug, Clone)]
pub struct SimTimer {
    config: Option<TimerConfig>,
    count: u32,
    flag: bool,
    overflows: u32,
    acks: u32,
    bus: Bus,
}

impl SimTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_bus(bus: Bus) -> Self {
        Self {
            bus,
            ..Self::default()
        }
    }

    pub fn config(&self) -> Option<TimerConfig> {
        self.config
    }

    pub fn running(&self) -> bool {
        self.config.is_some()
    }

    pub fn acks(&self) -> u32 {
        self.acks
    }

    pub fn overflows(&self) -> u32 {
        self.overflows
    }

    /// Raise the overflow flag as the hardware does at TOP
    pub fn raise(&mut self) {
        self.flag = true;
        self.overflows += 1;
    }

    /// Count `ticks` timer clocks, raising the flag each time the count
    /// reaches the period. Returns the number of overflows.
    pub fn elapse(&mut self, ticks: u32) -> u32 {
        let Some(config) = self.config else {
            return 0;
        };
        let period = u32::from(config.period).max(1);
        let mut raised = 0;
        for _ in 0..ticks {
            self.count += 1;
            if self.count >= period {
                self.count = 0;
                self.raise();
                raised += 1;
            }
        }
        raised
    }
}

impl OverflowTimer for SimTimer {
    fn configure(&mut self, config: &TimerConfig) {
        self.config = Some(*config);
        self.count = 0;
    }

    fn acknowledge_overflow(&mut self) {
        self.flag = false;
        self.acks += 1;
        self.bus.borrow_mut().push(BusEvent::Ack);
    }

    fn overflow_pending(&self) -> bool {
        self.flag
    }
}

#[derive(Default, Debug)]
pub struct SimClock {
    pub prescaler_disabled: bool,
}

impl ClockControl for SimClock {
    fn disable_prescaler(&mut self) {
        self.prescaler_disabled = true;
    }
}

/// Log sink collecting into a string
#[derive(Default, Debug)]
pub struct TraceSink {
    pub text: String,
}

impl ufmt::uWrite for TraceSink {
    type Error = core::convert::Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.text.push_str(s);
        Ok(())
    }
}

/// A started Cylon Eyes on simulated hardware
pub struct Simulation {
    pub clock: SimClock,
    pub app: CylonEyes<LedArray<SimPorts>, SimTimer>,
    pub log: Logger<TraceSink>,
    pub bus: Bus,
}

impl Simulation {
    pub fn new() -> Self {
        Self::with_style(TURNAROUND)
    }

    /// Runs the full startup sequence against fresh simulated registers
    pub fn with_style(style: TurnaroundStyle) -> Self {
        let bus = Bus::default();
        let mut clock = SimClock::default();
        let app = startup(
            &mut clock,
            SimPorts::on_bus(bus.clone()),
            SimTimer::on_bus(bus.clone()),
            &STEP_TIMER,
            style,
        );
        let mut log = Logger::new(TraceSink::default());
        log_startup(&mut log, &app, CPU_FREQ_HZ);
        Self {
            clock,
            app,
            log,
            bus,
        }
    }

    pub fn ports(&self) -> &SimPorts {
        self.app.leds().ports()
    }

    pub fn timer(&self) -> &SimTimer {
        self.app.timer()
    }

    pub fn state(&self) -> AnimationState {
        self.app.state()
    }

    pub fn lit(&self) -> Vec<LedIndex> {
        self.ports().lit()
    }

    /// Drain the bus log
    pub fn take_bus(&mut self) -> Vec<BusEvent> {
        self.bus.take()
    }

    /// Deliver one overflow interrupt
    pub fn overflow(&mut self) {
        self.app.timer_mut().raise();
        self.dispatch();
    }

    /// Run the handler if an overflow is pending. Returns whether it ran.
    pub fn dispatch(&mut self) -> bool {
        match self.app.timer_mut().wait() {
            Ok(()) => match self.app.on_overflow() {
                Ok(()) => true,
                Err(never) => match never {},
            },
            Err(nb::Error::WouldBlock) => false,
            Err(nb::Error::Other(never)) => match never {},
        }
    }

    /// Let `ticks` timer clocks pass, servicing every overflow
    pub fn elapse(&mut self, ticks: u32) -> u32 {
        let mut steps = 0;
        for _ in 0..ticks {
            if self.app.timer_mut().elapse(1) > 0 && self.dispatch() {
                steps += 1;
            }
        }
        steps
    }

    pub fn run(&mut self, steps: usize) {
        for _ in 0..steps {
            self.overflow();
        }
    }

    /// Start position followed by the position after each of `steps` overflows
    pub fn positions(&mut self, steps: usize) -> Vec<u8> {
        let mut seen = Vec::with_capacity(steps + 1);
        seen.push(self.state().position.get());
        for _ in 0..steps {
            self.overflow();
            seen.push(self.state().position.get());
        }
        seen
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
