//! Symbolic robot commands

use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// Wheel speed used for turns, independent of the configured motor speed
pub const TURN_SPEED: i32 = 100;

/// One step of a user program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Placeholder that does nothing when executed
    None,
    MoveForward,
    MoveBackward,
    StopMotors,
    Wait,
    TurnRight,
    TurnLeft,
    LedOn,
    LedOff,
    ReadTemperature,
}

impl Command {
    pub const ALL: [Command; 10] = [
        Command::None,
        Command::MoveForward,
        Command::MoveBackward,
        Command::StopMotors,
        Command::Wait,
        Command::TurnRight,
        Command::TurnLeft,
        Command::LedOn,
        Command::LedOff,
        Command::ReadTemperature,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Command::None => "None",
            Command::MoveForward => "MoveForward",
            Command::MoveBackward => "MoveBackward",
            Command::StopMotors => "StopMotors",
            Command::Wait => "Wait",
            Command::TurnRight => "TurnRight",
            Command::TurnLeft => "TurnLeft",
            Command::LedOn => "LedOn",
            Command::LedOff => "LedOff",
            Command::ReadTemperature => "ReadTemperature",
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a single line of authoring input means
///
/// `Done` terminates authoring. It is not a [`Command`], so it can never end
/// up inside a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Step(Command),
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command not recognized: '{}'", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        Command::ALL
            .into_iter()
            .find(|command| command.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCommand(s.to_owned()))
    }
}

impl FromStr for Entry {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("done") {
            return Ok(Entry::Done);
        }

        s.parse().map(Entry::Step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!("moveforward".parse(), Ok(Command::MoveForward));
        assert_eq!("LEDON".parse(), Ok(Command::LedOn));
        assert_eq!("  ReadTemperature \n".parse(), Ok(Command::ReadTemperature));
        assert_eq!("none".parse(), Ok(Command::None));
    }

    #[test]
    fn test_done_is_an_entry_not_a_command() {
        assert_eq!("Done".parse::<Entry>(), Ok(Entry::Done));
        assert!("done".parse::<Command>().is_err());
    }

    #[test]
    fn test_unknown_name() {
        let err = "fly".parse::<Entry>().unwrap_err();
        assert_eq!(err, UnknownCommand("fly".into()));
        assert_eq!(err.to_string(), "command not recognized: 'fly'");
    }

    #[test]
    fn test_names_round_trip() {
        for command in Command::ALL {
            assert_eq!(command.to_string().parse(), Ok(command));
        }
    }
}
