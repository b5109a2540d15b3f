//! User-authored command programs
//!
//! A [`Program`] is built one validated command at a time by
//! [`append_until_done`] and replayed against a robot by [`execute`], using a
//! single [`CommandParameters`] set for every step.

use std::fmt::{self, Display};

use tracing::{debug, error, info, warn};

use crate::{
    command::{Command, Entry, TURN_SPEED},
    parameters::CommandParameters,
    prompt::{PromptError, Prompter},
    robot::{Robot, RobotError},
};

/// Ordered list of commands; insertion order is execution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    commands: Vec<Command>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Drop every command. Authoring never does this on its own.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl FromIterator<Command> for Program {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

impl Extend<Command> for Program {
    fn extend<I: IntoIterator<Item = Command>>(&mut self, iter: I) {
        self.commands.extend(iter);
    }
}

/// Append commands read from `prompter` until the user enters `done`
///
/// Unrecognized names are reported and asked for again; they are never
/// appended. There is no attempt limit.
pub fn append_until_done<P>(mut program: Program, prompter: &mut P) -> Result<Program, PromptError>
where
    P: Prompter + ?Sized,
{
    loop {
        let prompt = format!("Command {}:", program.len() + 1);
        let line = prompter.ask(&prompt)?;

        match line.parse::<Entry>() {
            Ok(Entry::Step(command)) => {
                debug!(%command, position = program.len(), "command appended");
                program.push(command);
            }
            Ok(Entry::Done) => {
                info!(commands = program.len(), "program authoring finished");
                return Ok(program);
            }
            Err(unknown) => {
                warn!(input = %unknown.0, "rejected command name");
                prompter.tell(&unknown.to_string());
            }
        }
    }
}

/// Result of one executed step
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub command: Command,
    pub message: String,
}

impl Feedback {
    fn named(command: Command) -> Self {
        Self {
            command,
            message: command.name().to_owned(),
        }
    }
}

impl Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A robot call failed part way through a program
///
/// The remaining steps were not run. Feedback for the steps that did complete
/// is kept in `completed`.
#[derive(Debug)]
pub struct ExecutionError {
    pub completed: Vec<Feedback>,
    /// Position of the failing command within the program
    pub index: usize,
    pub command: Command,
    pub source: RobotError,
}

impl Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {} ({}) failed: {}",
            self.index + 1,
            self.command,
            self.source
        )
    }
}

impl std::error::Error for ExecutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Run every command of `program` in order against `robot`
pub fn execute<R>(
    program: &Program,
    parameters: &CommandParameters,
    robot: &mut R,
) -> Result<Vec<Feedback>, ExecutionError>
where
    R: Robot + ?Sized,
{
    info!(commands = program.len(), ?parameters, "executing program");

    let mut feedback = Vec::with_capacity(program.len());

    for (index, &command) in program.commands().iter().enumerate() {
        match step(command, parameters, robot) {
            Ok(Some(result)) => {
                debug!(%command, index, message = %result.message, "step complete");
                feedback.push(result);
            }
            Ok(None) => debug!(%command, index, "step skipped"),
            Err(source) => {
                error!(%command, index, %source, "program aborted");

                return Err(ExecutionError {
                    completed: feedback,
                    index,
                    command,
                    source,
                });
            }
        }
    }

    Ok(feedback)
}

fn step<R>(
    command: Command,
    parameters: &CommandParameters,
    robot: &mut R,
) -> Result<Option<Feedback>, RobotError>
where
    R: Robot + ?Sized,
{
    let speed = parameters.motor_speed;
    let brightness = parameters.led_brightness;

    match command {
        Command::None => return Ok(None),
        Command::MoveForward => robot.set_motors(speed, speed)?,
        Command::MoveBackward => robot.set_motors(-speed, -speed)?,
        Command::StopMotors => robot.set_motors(0, 0)?,
        Command::Wait => robot.wait(parameters.wait_millis())?,
        Command::TurnRight => robot.set_motors(TURN_SPEED, -TURN_SPEED)?,
        Command::TurnLeft => robot.set_motors(-TURN_SPEED, TURN_SPEED)?,
        Command::LedOn => robot.set_led(brightness, brightness, brightness)?,
        Command::LedOff => robot.set_led(0, 0, 0)?,
        Command::ReadTemperature => {
            let temperature = robot.read_temperature()?;

            return Ok(Some(Feedback {
                command,
                message: format!("Temperature: {temperature:.2}"),
            }));
        }
    }

    Ok(Some(Feedback::named(command)))
}
