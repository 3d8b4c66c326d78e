/// Main clock control
pub trait ClockControl {
    /// Clear MCLKCTRLB.PEN so CLK_PER runs at the oscillator frequency
    /// instead of the reset default of /6
    fn disable_prescaler(&mut self);
}

/// MCLKCTRLB with PEN (bit 0) cleared
pub const MCLKCTRLB_NO_PRESCALE: u8 = 0;
