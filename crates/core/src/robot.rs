//! Robot capability trait
//!
//! The minimal set of actuator and sensor operations the control logic
//! depends on. Connection lifecycle belongs to the implementation; callers
//! only ever see an already-connected handle.

use std::{
    fmt::{self, Display},
    io,
};

/// Errors surfaced by a robot implementation
#[derive(Debug)]
pub enum RobotError {
    /// The link to the robot went away
    Disconnected,
    /// The robot did not answer in time
    TimedOut,
    /// The robot answered with something that could not be understood
    Protocol(String),
    /// Any other I/O failure on the link
    Io(io::Error),
}

impl Display for RobotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RobotError::Disconnected => write!(f, "robot disconnected"),
            RobotError::TimedOut => write!(f, "robot did not respond in time"),
            RobotError::Protocol(detail) => write!(f, "unexpected reply from robot: {detail}"),
            RobotError::Io(error) => write!(f, "robot link error: {error}"),
        }
    }
}

impl std::error::Error for RobotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RobotError::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for RobotError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::TimedOut => RobotError::TimedOut,
            io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected
            | io::ErrorKind::PermissionDenied => RobotError::Disconnected,
            _ => RobotError::Io(error),
        }
    }
}

/// Actuator and sensor surface of the robot
///
/// Actuator values outside the device range are clamped by the
/// implementation: motors to `-255..=255`, LED channels to `0..=255`.
pub trait Robot {
    /// Drive the left and right wheels
    fn set_motors(&mut self, left: i32, right: i32) -> Result<(), RobotError>;

    /// Set the beak LED colour
    fn set_led(&mut self, red: i32, green: i32, blue: i32) -> Result<(), RobotError>;

    /// Start the buzzer at `frequency` Hz
    fn tone_on(&mut self, frequency: i32) -> Result<(), RobotError>;

    /// Silence the buzzer
    fn tone_off(&mut self) -> Result<(), RobotError>;

    /// Block the caller for `ms` milliseconds
    fn wait(&mut self, ms: u32) -> Result<(), RobotError>;

    fn read_left_light(&mut self) -> Result<i32, RobotError>;

    fn read_right_light(&mut self) -> Result<i32, RobotError>;

    /// Temperature in degrees Celsius
    fn read_temperature(&mut self) -> Result<f64, RobotError>;
}

impl<R: Robot + ?Sized> Robot for &mut R {
    fn set_motors(&mut self, left: i32, right: i32) -> Result<(), RobotError> {
        (**self).set_motors(left, right)
    }

    fn set_led(&mut self, red: i32, green: i32, blue: i32) -> Result<(), RobotError> {
        (**self).set_led(red, green, blue)
    }

    fn tone_on(&mut self, frequency: i32) -> Result<(), RobotError> {
        (**self).tone_on(frequency)
    }

    fn tone_off(&mut self) -> Result<(), RobotError> {
        (**self).tone_off()
    }

    fn wait(&mut self, ms: u32) -> Result<(), RobotError> {
        (**self).wait(ms)
    }

    fn read_left_light(&mut self) -> Result<i32, RobotError> {
        (**self).read_left_light()
    }

    fn read_right_light(&mut self) -> Result<i32, RobotError> {
        (**self).read_right_light()
    }

    fn read_temperature(&mut self) -> Result<f64, RobotError> {
        (**self).read_temperature()
    }
}

impl<R: Robot + ?Sized> Robot for Box<R> {
    fn set_motors(&mut self, left: i32, right: i32) -> Result<(), RobotError> {
        (**self).set_motors(left, right)
    }

    fn set_led(&mut self, red: i32, green: i32, blue: i32) -> Result<(), RobotError> {
        (**self).set_led(red, green, blue)
    }

    fn tone_on(&mut self, frequency: i32) -> Result<(), RobotError> {
        (**self).tone_on(frequency)
    }

    fn tone_off(&mut self) -> Result<(), RobotError> {
        (**self).tone_off()
    }

    fn wait(&mut self, ms: u32) -> Result<(), RobotError> {
        (**self).wait(ms)
    }

    fn read_left_light(&mut self) -> Result<i32, RobotError> {
        (**self).read_left_light()
    }

    fn read_right_light(&mut self) -> Result<i32, RobotError> {
        (**self).read_right_light()
    }

    fn read_temperature(&mut self) -> Result<f64, RobotError> {
        (**self).read_temperature()
    }
}
