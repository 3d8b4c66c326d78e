#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
use {
    avr_device::atmega4809::Peripherals,
    avr_device::interrupt::{self, Mutex},
    core::cell::RefCell,
    cylon_eyes::application::{self, CylonEyes},
    cylon_eyes::config::{CPU_FREQ_HZ, STEP_TIMER, TURNAROUND},
    cylon_eyes::drivers::LedArray,
    cylon_eyes::hal::{Clock, Ports, Power, Tca0},
    cylon_eyes::logger::Logger,
};

#[cfg(all(target_arch = "avr", feature = "debug"))]
use cylon_eyes::hal::Uart;
#[cfg(all(target_arch = "avr", not(feature = "debug")))]
use cylon_eyes::logger::NullSink;

#[cfg(target_arch = "avr")]
type Scanner = CylonEyes<LedArray<Ports>, Tca0>;

// Installed before interrupts are enabled, then owned by TCA0_LUNF_OVF.
// Main-loop access must go through interrupt::free.
#[cfg(target_arch = "avr")]
static CYLON: Mutex<RefCell<Option<Scanner>>> = Mutex::new(RefCell::new(None));

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    let dp = match Peripherals::take() {
        Some(dp) => dp,
        None => loop {},
    };

    let mut clock = Clock::new(dp.CLKCTRL, dp.CPU);
    let ports = Ports::new(dp.PORTA, dp.PORTB, dp.PORTC, dp.PORTD, dp.PORTE, dp.PORTF);
    // SAFETY: the only TCA0 owner; the ISR touches it through `CYLON`
    let tca0 = unsafe { Tca0::new() };
    #[allow(unused_mut)]
    let mut app = application::startup(&mut clock, ports, tca0, &STEP_TIMER, TURNAROUND);

    #[cfg(feature = "debug")]
    let mut log = Logger::new(Uart::new(dp.USART3, app.leds_mut().ports_mut()));
    #[cfg(not(feature = "debug"))]
    let mut log = Logger::new(NullSink);
    application::log_startup(&mut log, &app, CPU_FREQ_HZ);

    interrupt::free(|cs| {
        CYLON.borrow(cs).replace(Some(app));
    });

    let mut power = Power::new(dp.SLPCTRL);

    // SAFETY: all state the handler uses is installed above
    unsafe { interrupt::enable() };

    loop {
        power.enter_idle_mode();
    }
}

#[cfg(target_arch = "avr")]
#[avr_device::interrupt(atmega4809)]
fn TCA0_LUNF_OVF() {
    interrupt::free(|cs| match CYLON.borrow(cs).borrow_mut().as_mut() {
        Some(app) => match app.on_overflow() {
            Ok(()) => {}
            Err(never) => match never {},
        },
        None => Tca0::acknowledge_stray(),
    });
}

/// Host build: run the scanner on simulated registers and print one frame
/// per overflow.
#[cfg(not(target_arch = "avr"))]
fn main() {
    use cylon_eyes::config::{CPU_FREQ_HZ, LED_COUNT};
    use cylon_eyes::sim::Simulation;

    let steps = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(2 * (LED_COUNT - 1));

    let mut sim = Simulation::new();
    print!("{}", sim.log.sink().text.replace("\r\n", "\n"));

    let interval_ns = sim.app.config().overflow_interval_ns(CPU_FREQ_HZ);
    for step in 0..=steps {
        let lit = sim.lit();
        let frame: String = (0..LED_COUNT)
            .map(|i| if lit.iter().any(|l| l.as_usize() == i) { '*' } else { '.' })
            .collect();
        let ms = step as u64 * interval_ns / 1_000_000;
        println!("{ms:>7} ms  {frame}  {:?}", sim.state().direction);
        sim.overflow();
    }
}
