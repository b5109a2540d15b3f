//! Menu driven front end
//!
//! The shell owns the robot connection and whatever the user has set up in
//! each screen, so leaving a menu and coming back keeps the programmed
//! commands, alarm settings and recorded data.

use std::{fmt::Display, str::FromStr, time::Duration};

use finch_core::{PromptError, Prompter, Robot, RobotError};
use finch_serial::SerialRobot;
use tracing::{error, info, warn};

use crate::{console::Terminal, simulator::SimulatedRobot};

mod alarm_system;
mod data_recorder;
mod routine;
mod talent_show;
mod user_programming;

use self::{
    alarm_system::AlarmSystem, data_recorder::DataRecorder, user_programming::UserProgramming,
};

/// Where a robot comes from when the user connects
#[derive(Debug, Clone)]
pub enum Link {
    Simulated,
    Serial {
        /// Asked for at connect time when absent
        port: Option<String>,
        baud_rate: u32,
        timeout: Duration,
    },
}

/// The robot, once connected
type Connection = Option<Box<dyn Robot>>;

pub struct Shell {
    link: Link,
    version: &'static str,
    robot: Connection,
    user_programming: UserProgramming,
    alarm_system: AlarmSystem,
    data_recorder: DataRecorder,
}

impl Shell {
    pub fn new(link: Link, version: &'static str) -> Self {
        Self {
            link,
            version,
            robot: None,
            user_programming: UserProgramming::default(),
            alarm_system: AlarmSystem::default(),
            data_recorder: DataRecorder::default(),
        }
    }

    /// Run until the user quits or input ends
    pub fn run(&mut self, console: &mut Terminal) -> Result<(), PromptError> {
        let result = self.welcome(console).and_then(|()| self.main_menu(console));

        match result {
            Ok(()) => {}
            Err(PromptError::Closed) => info!("console input closed"),
            Err(error) => {
                self.disconnect(console);
                return Err(error);
            }
        }

        self.disconnect(console);
        self.closing(console);

        Ok(())
    }

    fn welcome(&mut self, console: &mut Terminal) -> Result<(), PromptError> {
        console.header("Finch Control");
        console.line("Put your Finch robot through its paces.");
        console.line(format!("Version {}", self.version));

        console.pause()
    }

    fn closing(&mut self, console: &mut Terminal) {
        console.header("Thank You");
        console.line("Thank you for using Finch Control.");
        console.blank();
    }

    fn main_menu(&mut self, console: &mut Terminal) -> Result<(), PromptError> {
        loop {
            console.header("Main Menu");
            console.line("a) Connect Finch Robot");
            console.line("b) Talent Show");
            console.line("c) Data Recorder");
            console.line("d) Alarm System");
            console.line("e) User Programming");
            console.line("f) Disconnect Finch Robot");
            console.line("q) Quit");

            match console.choice()?.as_str() {
                "a" => self.connect(console)?,
                "b" => talent_show::menu(console, &mut self.robot)?,
                "c" => self.data_recorder.menu(console, &mut self.robot)?,
                "d" => self.alarm_system.menu(console, &mut self.robot)?,
                "e" => self.user_programming.menu(console, &mut self.robot)?,
                "f" => {
                    self.disconnect(console);
                    console.pause_for_menu("Main Menu")?;
                }
                "q" => return Ok(()),
                _ => invalid_choice(console)?,
            }
        }
    }

    fn connect(&mut self, console: &mut Terminal) -> Result<(), PromptError> {
        console.header("Connect Finch Robot");

        if self.robot.is_some() {
            console.line("The Finch robot is already connected.");
            return console.pause_for_menu("Main Menu");
        }

        console.line("Ready to connect the Finch robot. Be sure the cable is attached.");
        console.pause()?;

        let mut robot = match self.open(console)? {
            Ok(robot) => robot,
            Err(error) => {
                error!(%error, "failed to connect");
                console.line(format!("Unable to connect to the Finch robot: {error}"));
                return console.pause_for_menu("Main Menu");
            }
        };

        if let Err(error) = routine::perform(&mut robot, routine::CONNECTED) {
            report_robot_error(console, &error);
            return console.pause_for_menu("Main Menu");
        }

        console.line("The Finch robot is now connected.");
        self.robot = Some(robot);
        console.pause_for_menu("Main Menu")?;

        if let Some(robot) = self.robot.as_deref_mut() {
            if let Err(error) = routine::perform(robot, routine::LED_OFF) {
                warn!(%error, "failed to reset the led");
            }
        }

        Ok(())
    }

    /// Open the configured link, asking for a port name when none was given
    fn open(
        &self,
        console: &mut Terminal,
    ) -> Result<Result<Box<dyn Robot>, RobotError>, PromptError> {
        let (port, baud_rate, timeout) = match &self.link {
            Link::Simulated => {
                let robot: Box<dyn Robot> = Box::new(SimulatedRobot::new());
                return Ok(Ok(robot));
            }
            Link::Serial {
                port,
                baud_rate,
                timeout,
            } => (port.clone(), *baud_rate, *timeout),
        };

        let port = match port {
            Some(port) => port,
            None => {
                match finch_serial::available_ports() {
                    Ok(ports) if !ports.is_empty() => {
                        console.line(format!("Available ports: {}", ports.join(", ")));
                    }
                    Ok(_) => console.line("No serial ports found."),
                    Err(error) => warn!(%error, "failed to list serial ports"),
                }

                console.ask("Serial port:")?.trim().to_owned()
            }
        };

        let robot = SerialRobot::connect(&port, baud_rate, timeout)
            .map(|robot| Box::new(robot) as Box<dyn Robot>);

        Ok(robot)
    }

    /// Chirp and drop the robot, if there is one
    fn disconnect(&mut self, console: &mut Terminal) {
        let Some(mut robot) = self.robot.take() else {
            return;
        };

        console.header("Disconnect Finch Robot");
        console.line("About to disconnect from the Finch robot.");

        if let Err(error) = routine::perform(&mut robot, routine::DISCONNECTING) {
            warn!(%error, "failed to play the disconnect chirp");
        }

        drop(robot);
        info!("robot disconnected");

        console.line("The Finch robot is now disconnected.");
    }
}

fn invalid_choice(console: &mut Terminal) -> Result<(), PromptError> {
    console.blank();
    console.line("Please enter a letter for the menu choice.");
    console.pause()
}

/// The connected robot, or a notice saying there is none
fn connected<'a>(
    console: &mut Terminal,
    robot: &'a mut Connection,
) -> Option<&'a mut Box<dyn Robot>> {
    let robot = robot.as_mut();

    if robot.is_none() {
        console.line("Please connect the robot first.");
    }

    robot
}

fn report_robot_error(console: &mut Terminal, error: &RobotError) {
    error!(%error, "robot call failed");
    console.line(format!("The Finch robot did not respond: {error}"));
}

/// Ask until the answer parses as `T`
fn ask_parsed<T>(console: &mut Terminal, prompt: &str) -> Result<T, PromptError>
where
    T: FromStr,
    T::Err: Display,
{
    loop {
        match console.ask(prompt)?.parse() {
            Ok(value) => return Ok(value),
            Err(error) => {
                warn!(%error, "rejected input");
                console.tell(&error.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(script: &str) -> String {
        let mut output = Vec::new();
        {
            let mut console = Terminal::scripted(script, &mut output);
            Shell::new(Link::Simulated, "test").run(&mut console).unwrap();
        }
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_quit_from_main_menu() {
        let output = run_script("\nq\n");

        assert!(output.contains("Version test"));
        assert!(output.contains("Thank you for using Finch Control."));
    }

    #[test]
    fn test_end_of_input_quits() {
        let output = run_script("\n");

        assert!(output.contains("Main Menu"));
        assert!(output.contains("Thank you for using Finch Control."));
    }

    #[test]
    fn test_bad_choice_is_reported() {
        let output = run_script("\nz\n\nq\n");

        assert!(output.contains("Please enter a letter for the menu choice."));
    }

    #[test]
    fn test_screens_need_a_robot() {
        let output = run_script("\nb\na\n\nq\nq\n");

        assert!(output.contains("Please connect the robot first."));
    }

    #[test]
    fn test_ask_parsed_repeats_until_valid() {
        let mut output = Vec::new();
        let sensor: finch_core::Sensor = {
            let mut console = Terminal::scripted("middle\nboth\n", &mut output);
            ask_parsed(&mut console, "Sensor:").unwrap()
        };

        assert_eq!(sensor, finch_core::Sensor::Both);
        assert!(String::from_utf8(output).unwrap().contains("middle"));
    }
}
