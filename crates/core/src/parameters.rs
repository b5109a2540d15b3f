//! Parameters shared by every step of a program

use tracing::info;

use crate::{
    prompt::{PromptError, Prompter},
    validate::validate,
};

pub const MOTOR_SPEED_RANGE: (i32, i32) = (1, 255);
pub const LED_BRIGHTNESS_RANGE: (i32, i32) = (1, 255);
pub const WAIT_SECONDS_RANGE: (f64, f64) = (0.0, 10.0);

/// Speed, brightness and duration applied uniformly to a whole program
///
/// Commands never carry their own values, so changing the parameters changes
/// playback of every step at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandParameters {
    /// Wheel speed for forward/backward moves, `1..=255`
    pub motor_speed: i32,
    /// LED intensity for every channel, `1..=255`
    pub led_brightness: i32,
    /// Duration of a `Wait` step, `0..=10` seconds
    pub wait_seconds: f64,
}

impl CommandParameters {
    pub fn wait_millis(&self) -> u32 {
        (self.wait_seconds * 1000.0).round().max(0.0) as u32
    }
}

/// Read a complete parameter set
///
/// The result replaces any previous set as a whole; there is no partial
/// update.
pub fn get_parameters<P>(prompter: &mut P) -> Result<CommandParameters, PromptError>
where
    P: Prompter + ?Sized,
{
    let motor_speed = validate(
        prompter,
        "Enter Motor Speed [1 - 255]:",
        MOTOR_SPEED_RANGE.0,
        MOTOR_SPEED_RANGE.1,
    )?;

    let led_brightness = validate(
        prompter,
        "Enter LED Brightness [1 - 255]:",
        LED_BRIGHTNESS_RANGE.0,
        LED_BRIGHTNESS_RANGE.1,
    )?;

    let wait_seconds = validate(
        prompter,
        "Enter Wait Duration in seconds [0 - 10]:",
        WAIT_SECONDS_RANGE.0,
        WAIT_SECONDS_RANGE.1,
    )?;

    let parameters = CommandParameters {
        motor_speed,
        led_brightness,
        wait_seconds,
    };

    info!(?parameters, "command parameters set");

    Ok(parameters)
}
