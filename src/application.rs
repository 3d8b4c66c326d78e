//! Application layer: startup sequence and the timer overflow handler

use crate::animation::{self, AnimationState, TurnaroundStyle};
use crate::drivers::{LedArray, LedBank};
use crate::hal::clock::ClockControl;
use crate::hal::gpio::PortRegisters;
use crate::hal::timer::{OverflowTimer, TimerConfig};
use crate::logger::Logger;

/// The scanner: LEDs, the timer that clocks it, and the scan state.
///
/// After `start` only the overflow handler may touch this. Any access
/// from the main loop needs a critical section around it.
pub struct CylonEyes<B, T> {
    leds: B,
    timer: T,
    state: AnimationState,
    style: TurnaroundStyle,
    config: TimerConfig,
    steps: u32,
}

impl<B: LedBank, T: OverflowTimer> CylonEyes<B, T> {
    /// All LEDs off, the first one on, then start the timer.
    /// Call with interrupts still disabled.
    pub fn start(
        mut leds: B,
        mut timer: T,
        config: &TimerConfig,
        style: TurnaroundStyle,
    ) -> Result<Self, B::Error> {
        let state = AnimationState::INITIAL;
        leds.clear_all()?;
        leds.set_one(state.position)?;
        timer.configure(config);
        Ok(Self {
            leds,
            timer,
            state,
            style,
            config: *config,
            steps: 0,
        })
    }

    /// Overflow interrupt body. Acknowledges before anything else, then
    /// moves the light one step. No blocking, no loops over the array.
    #[inline]
    pub fn on_overflow(&mut self) -> Result<(), B::Error> {
        self.timer.acknowledge_overflow();
        let (next, transition) = animation::step(self.state, self.style);
        self.state = next;
        self.steps = self.steps.wrapping_add(1);
        self.leds.apply(transition)
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn style(&self) -> TurnaroundStyle {
        self.style
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Overflows handled since start, wrapping
    pub fn overflow_count(&self) -> u32 {
        self.steps
    }

    pub fn leds(&self) -> &B {
        &self.leds
    }

    pub fn leds_mut(&mut self) -> &mut B {
        &mut self.leds
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn into_parts(self) -> (B, T) {
        (self.leds, self.timer)
    }
}

/// Startup up to, but not including, enabling interrupts:
/// clock prescaler off, LED pins to outputs, LEDs off (first one lit),
/// timer configured and counting.
pub fn startup<C, P, T>(
    clock: &mut C,
    ports: P,
    timer: T,
    config: &TimerConfig,
    style: TurnaroundStyle,
) -> CylonEyes<LedArray<P>, T>
where
    C: ClockControl,
    P: PortRegisters,
    T: OverflowTimer,
{
    clock.disable_prescaler();

    let mut leds = LedArray::new(ports);
    leds.init_outputs();

    match CylonEyes::start(leds, timer, config, style) {
        Ok(app) => app,
        Err(never) => match never {},
    }
}

pub fn log_startup<W, B, T>(log: &mut Logger<W>, app: &CylonEyes<B, T>, clock_hz: u32)
where
    W: ufmt::uWrite,
    B: LedBank,
    T: OverflowTimer,
{
    let config = app.config();
    log.info(concat!("Cylon Eyes v", env!("CARGO_PKG_VERSION")));
    log.debug("TCA0 PER", config.period);
    log.debug("TCA0 prescale", config.prescaler.divisor());
    log.debug(
        "Step interval us",
        (config.overflow_interval_ns(clock_hz) / 1_000) as u32,
    );
    log.debug("Start position", app.state().position.get());
    log.debug("Direction", app.state().direction);
    log.info("Ready...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Direction;
    use crate::config::{LED_COUNT, STEP_TIMER};
    use crate::hal::gpio::{LedIndex, LED_MAP};
    use crate::sim::{BusEvent, SimClock, SimPorts, SimTimer, Simulation};

    #[test]
    fn startup_order_and_initial_state() {
        let mut clock = SimClock::default();
        let app = startup(
            &mut clock,
            SimPorts::new(),
            SimTimer::new(),
            &STEP_TIMER,
            TurnaroundStyle::Bounce,
        );
        assert!(clock.prescaler_disabled);
        assert_eq!(app.timer().config(), Some(STEP_TIMER));
        assert_eq!(app.state(), AnimationState::INITIAL);
        assert_eq!(app.leds().ports().lit(), vec![LedIndex::FIRST]);
        assert_eq!(app.overflow_count(), 0);
    }

    #[test]
    fn overflow_is_acknowledged_before_return() {
        let mut sim = Simulation::new();
        sim.overflow();
        assert!(!sim.timer().overflow_pending());
        assert_eq!(sim.timer().acks(), 1);
        assert_eq!(sim.app.overflow_count(), 1);
        // Nothing pending, nothing runs
        assert!(!sim.dispatch());
        assert_eq!(sim.timer().acks(), 1);
    }

    #[test]
    fn acknowledge_precedes_port_writes() {
        let mut sim = Simulation::new();
        // Startup writes
        sim.take_bus();
        for _ in 0..25 {
            let before = sim.state().position;
            sim.overflow();
            let after = sim.state().position;
            let events = sim.take_bus();
            let old = LED_MAP[before.as_usize()];
            let new = LED_MAP[after.as_usize()];
            assert_eq!(
                events,
                [
                    BusEvent::Ack,
                    BusEvent::Clear(old.port, old.mask),
                    BusEvent::Set(new.port, new.mask),
                ]
            );
        }
    }

    #[test]
    fn dwell_step_still_acknowledges_first() {
        let mut sim = Simulation::with_style(TurnaroundStyle::Dwell);
        sim.run(LED_COUNT - 1);
        sim.take_bus();
        sim.overflow();
        let last = LED_MAP[LedIndex::LAST.as_usize()];
        assert_eq!(sim.take_bus(), [BusEvent::Ack, BusEvent::Set(last.port, last.mask)]);
    }

    #[test]
    fn one_step_per_overflow() {
        let mut sim = Simulation::new();
        sim.run(3);
        assert_eq!(sim.state().position.get(), 3);
        assert_eq!(sim.state().direction, Direction::Forward);
        assert_eq!(sim.timer().acks(), 3);
    }

    #[test]
    fn startup_log() {
        let sim = Simulation::new();
        let text = &sim.log.sink().text;
        assert!(text.starts_with("[INF] Cylon Eyes v0.1.0\r\n"));
        assert!(text.contains("[DBG] TCA0 PER: 9766\r\n"));
        assert!(text.contains("[DBG] TCA0 prescale: 1024\r\n"));
        assert!(text.contains("[DBG] Step interval us: 500019\r\n"));
        assert!(text.contains("[DBG] Direction: fwd\r\n"));
        assert!(text.ends_with("[INF] Ready...\r\n"));
    }
}
