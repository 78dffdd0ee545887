//! Servo PWM slice configuration
//!
//! The slice is clocked at 1 MHz so one counter tick is one microsecond and
//! `top` is simply the frame period minus one.

use embassy_rp::pwm::{Config, Pwm, PwmOutput};

/// PWM output driving the servo signal line
pub type ServoPwm = PwmOutput<'static>;

/// Counter clock for servo slices
const TICK_HZ: u32 = 1_000_000;

/// Integer clock divider giving a 1 MHz counter from `clk_sys_hz`
pub fn servo_divider(clk_sys_hz: u32) -> u8 {
    (clk_sys_hz / TICK_HZ).clamp(1, u8::MAX as u32) as u8
}

/// Slice configuration for a servo frame of `period_us`
pub fn servo_pwm_config(clk_sys_hz: u32, period_us: u16) -> Config {
    let mut config = Config::default();
    config.divider = servo_divider(clk_sys_hz).into();
    config.top = period_us.saturating_sub(1);
    config.compare_a = 0;
    config.compare_b = 0;
    config
}

/// Take the channel B output of a configured slice
///
/// Returns `None` if the slice was not created with a B pin.
pub fn channel_b(pwm: Pwm<'static>) -> Option<ServoPwm> {
    let (_, b) = pwm.split();
    b
}
