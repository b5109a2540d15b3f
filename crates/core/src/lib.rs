//! Robot-agnostic control logic for Finch Control
//!
//! - Robot capability trait consumed by everything else
//! - Command program model (authoring, parameters, execution)
//! - Numeric input validation behind a prompt seam
//! - Threshold monitor state machine

#![deny(unsafe_code)]

pub mod command;
pub mod monitor;
pub mod parameters;
pub mod program;
pub mod prompt;
pub mod robot;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{Command, Entry, UnknownCommand, TURN_SPEED};
pub use monitor::{
    Crossing, Mode, MonitorConfig, MonitorConfigBuilder, MonitorError, MonitorState, Outcome,
    Sensor, ThresholdMonitor, UnknownOption, POLL_INTERVAL_MS,
};
pub use parameters::{get_parameters, CommandParameters};
pub use program::{append_until_done, execute, ExecutionError, Feedback, Program};
pub use prompt::{PromptError, Prompter};
pub use robot::{Robot, RobotError};
pub use validate::{check, validate, ValidationError};
