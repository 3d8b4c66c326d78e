use avr_device::atmega4809::SLPCTRL;

/// SMODE (bits 2:1) = IDLE
const SMODE_IDLE: u8 = 0 << 1;
const SEN: u8 = 1 << 0;

pub struct Power {
    slpctrl: SLPCTRL,
}

impl Power {
    pub fn new(slpctrl: SLPCTRL) -> Self {
        Self { slpctrl }
    }

    #[inline]
    fn enable_sleep(&mut self) {
        // SAFETY: valid SMODE with SEN set
        self.slpctrl.ctrla.write(|w| unsafe { w.bits(SMODE_IDLE | SEN) });
    }

    #[inline]
    fn disable_sleep(&mut self) {
        // SAFETY: valid SMODE with SEN clear
        self.slpctrl.ctrla.write(|w| unsafe { w.bits(SMODE_IDLE) });
    }

    /// Sleep until the next interrupt. TCA0 keeps running in idle.
    pub fn enter_idle_mode(&mut self) {
        self.enable_sleep();
        avr_device::asm::sleep();
        self.disable_sleep();
    }
}
