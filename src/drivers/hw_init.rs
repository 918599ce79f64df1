//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions and the servo LEDC timer/channel using raw
//! ESP-IDF sys calls. Called once from `main()` before the control loop
//! starts. Also hosts the small GPIO/timing helpers the sensor and servo
//! drivers build on.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio() -> Result<(), HwInitError> {
    // Trigger: push-pull output, idles low.
    let trig_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::ULTRASONIC_TRIG_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&trig_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    unsafe { gpio_set_level(pins::ULTRASONIC_TRIG_GPIO, 0) };

    // Echo: plain input. The HC-SR04 drives it actively, no pull needed;
    // pull-down keeps the line defined when the sensor is unplugged.
    let echo_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::ULTRASONIC_ECHO_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&echo_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }

    info!("hw_init: GPIO configured (trig + echo)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    false
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio(). Main-loop only.
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── Timing ────────────────────────────────────────────────────

/// Monotonic microseconds since boot.
#[cfg(target_os = "espidf")]
pub fn now_us() -> u64 {
    // SAFETY: esp_timer_get_time has no preconditions after scheduler start.
    (unsafe { esp_timer_get_time() }) as u64
}

#[cfg(not(target_os = "espidf"))]
pub fn now_us() -> u64 {
    0
}

/// Busy-wait for short (µs-scale) protocol delays.
#[cfg(target_os = "espidf")]
pub fn delay_us(us: u32) {
    // SAFETY: esp_rom_delay_us is a plain calibrated spin loop.
    unsafe { esp_rom_delay_us(us) };
}

#[cfg(not(target_os = "espidf"))]
pub fn delay_us(_us: u32) {}

/// Measure the duration of the next pulse at `level` on `pin`.
///
/// Waits up to `timeout_us` for the pulse to start, then up to another
/// `timeout_us` for it to end. Returns `None` if either bound is hit —
/// the caller decides what a missing pulse means (for the ranger: "far").
#[cfg(target_os = "espidf")]
pub fn pulse_in_us(pin: i32, level: bool, timeout_us: u32) -> Option<u32> {
    let timeout = u64::from(timeout_us);

    // Wait for the pulse to start.
    let wait_start = now_us();
    while gpio_read(pin) != level {
        if now_us().wrapping_sub(wait_start) > timeout {
            return None;
        }
    }

    // Time the pulse itself.
    let pulse_start = now_us();
    while gpio_read(pin) == level {
        if now_us().wrapping_sub(pulse_start) > timeout {
            return None;
        }
    }
    Some(now_us().wrapping_sub(pulse_start) as u32)
}

#[cfg(not(target_os = "espidf"))]
pub fn pulse_in_us(_pin: i32, _level: bool, _timeout_us: u32) -> Option<u32> {
    None
}

// ── LEDC PWM (servo) ─────────────────────────────────────────

pub const LEDC_CH_SERVO: u32 = 0;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Timer 0: servo frame (50 Hz, 16-bit duty).
    // SAFETY: Called from the single main-task context via init_peripherals().
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_16_BIT,
        freq_hz: pins::SERVO_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    // Channel 0: servo signal line.
    let ret = unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: ledc_channel_t_LEDC_CHANNEL_0,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::SERVO_PWM_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        })
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    info!("hw_init: LEDC configured (servo=CH0, 50 Hz, 16-bit)");
    Ok(())
}

/// Write a 16-bit duty to a LEDC channel. Returns the raw ESP-IDF error
/// code; non-zero means the write did not take effect.
#[cfg(target_os = "espidf")]
pub fn ledc_set_u16(channel: u32, duty: u16) -> i32 {
    // SAFETY: LEDC channel was configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        let ret = ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        if ret != ESP_OK as i32 {
            return ret;
        }
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel)
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set_u16(_channel: u32, _duty: u16) -> i32 {
    0
}
