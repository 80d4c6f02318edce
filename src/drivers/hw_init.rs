//! One-shot hardware peripheral initialization.
//!
//! Configures the bilge sense GPIO and installs its any-edge ISR using raw
//! ESP-IDF sys calls.  Called once from `main()` before the event loop
//! starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    IsrRegisterFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrRegisterFailed(rc) => write!(f, "GPIO ISR handler add failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

/// GPIO 34–39 are input-only and have no internal pull resistors.
pub const fn has_internal_pullup(gpio: i32) -> bool {
    !matches!(gpio, 34..=39)
}

// ── GPIO Input ────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_bilge_input(gpio: i32) -> Result<(), HwInitError> {
    let pull_up_en = if has_internal_pullup(gpio) {
        gpio_pullup_t_GPIO_PULLUP_ENABLE
    } else {
        gpio_pullup_t_GPIO_PULLUP_DISABLE
    };
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << gpio,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_ANYEDGE,
    };
    // SAFETY: Called once from main() before the event loop; single-threaded.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    info!(
        "hw_init: bilge input GPIO{} configured (internal pull-up: {})",
        gpio,
        has_internal_pullup(gpio)
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_bilge_input(gpio: i32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): bilge input GPIO{} init skipped", gpio);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    false
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn bilge_gpio_isr(arg: *mut core::ffi::c_void) {
    let gpio = arg as usize as i32;
    // SAFETY: register read and RTC counter read; both ISR-safe.
    let pin_high = unsafe { gpio_get_level(gpio) } != 0;
    let now_ms = (unsafe { esp_timer_get_time() } / 1_000) as u64;
    crate::sensors::bilge_switch::bilge_isr_handler(pin_high, now_ms);
}

/// Install the GPIO ISR service and register the bilge edge handler.
/// Call after [`init_bilge_input`] and before the event loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service(gpio: i32) -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed.  The handler only pushes to the
    // lock-free event queue.  The pin number travels as the handler arg.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        let ret = gpio_isr_handler_add(gpio, Some(bilge_gpio_isr), gpio as usize as *mut _);
        if ret != ESP_OK {
            return Err(HwInitError::IsrRegisterFailed(ret));
        }
        gpio_intr_enable(gpio);
    }
    info!("hw_init: ISR service installed (bilge GPIO{}, any edge)", gpio);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service(_gpio: i32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}

// ── Bring-up ──────────────────────────────────────────────────

/// Configure the sense input, then its edge interrupt.
///
/// A failed input is fatal.  A failed ISR is not: returns `Ok(false)` and
/// the caller polls the pin every loop pass instead.
pub fn init_bilge_hw(gpio: i32) -> crate::error::Result<bool> {
    init_bilge_input(gpio)?;
    match init_isr_service(gpio) {
        Ok(()) => Ok(true),
        Err(e) => {
            log::warn!("hw_init: {}, polling GPIO{} instead", e, gpio);
            Ok(false)
        }
    }
}
