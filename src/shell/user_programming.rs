use finch_core::{
    append_until_done, execute, get_parameters, Command, CommandParameters, PromptError, Program,
};
use tracing::{error, info};

use super::{connected, invalid_choice, Connection};
use crate::console::Terminal;

const MENU: &str = "User Programming Menu";

#[derive(Default)]
pub struct UserProgramming {
    parameters: Option<CommandParameters>,
    program: Program,
}

impl UserProgramming {
    pub fn menu(&mut self, console: &mut Terminal, robot: &mut Connection) -> Result<(), PromptError> {
        loop {
            console.header(MENU);
            console.line("a) Set Command Parameters");
            console.line("b) Add Commands");
            console.line("c) View Commands");
            console.line("d) Execute Commands");
            console.line("e) Clear Commands");
            console.line("q) Main Menu");

            match console.choice()?.as_str() {
                "a" => {
                    console.header("Command Parameters");
                    let parameters = get_parameters(console)?;
                    show_parameters(console, &parameters);
                    self.parameters = Some(parameters);
                }
                "b" => {
                    console.header("Add Commands");
                    self.add_commands(console)?;
                }
                "c" => {
                    console.header("View Commands");
                    self.view_commands(console);
                }
                "d" => {
                    console.header("Execute Commands");
                    self.execute_commands(console, robot);
                }
                "e" => {
                    console.header("Clear Commands");
                    self.program.clear();
                    console.line("All commands have been removed.");
                }
                "q" => return Ok(()),
                _ => {
                    invalid_choice(console)?;
                    continue;
                }
            }

            console.pause_for_menu(MENU)?;
        }
    }

    fn add_commands(&mut self, console: &mut Terminal) -> Result<(), PromptError> {
        let names: Vec<_> = Command::ALL.iter().map(Command::name).collect();

        console.line("Valid commands:");
        for row in names.chunks(4) {
            console.line(format!("  {}", row.join(", ")));
        }
        console.line("Enter 'done' when finished.");
        console.blank();

        self.program = append_until_done(std::mem::take(&mut self.program), console)?;

        console.blank();
        console.line(format!("The program now has {} commands.", self.program.len()));

        Ok(())
    }

    fn view_commands(&self, console: &mut Terminal) {
        if self.program.is_empty() {
            console.line("No commands have been entered.");
            return;
        }

        for (number, command) in self.program.commands().iter().enumerate() {
            console.line(format!("{:>4}. {command}", number + 1));
        }
    }

    fn execute_commands(&self, console: &mut Terminal, robot: &mut Connection) {
        let Some(parameters) = self.parameters else {
            console.line("Please set the command parameters first.");
            return;
        };

        if self.program.is_empty() {
            console.line("No commands have been entered.");
            return;
        }

        let Some(robot) = connected(console, robot) else {
            return;
        };

        match execute(&self.program, &parameters, &mut **robot) {
            Ok(feedback) => {
                for line in &feedback {
                    console.line(line.to_string());
                }

                info!(steps = feedback.len(), "program finished");
            }
            Err(failure) => {
                for line in &failure.completed {
                    console.line(line.to_string());
                }

                error!(%failure, "program stopped");
                console.blank();
                console.line(format!("Execution stopped: {failure}"));
            }
        }
    }
}

fn show_parameters(console: &mut Terminal, parameters: &CommandParameters) {
    console.blank();
    console.line(format!("Motor speed: {}", parameters.motor_speed));
    console.line(format!("LED brightness: {}", parameters.led_brightness));
    console.line(format!("Wait: {} seconds", parameters.wait_seconds));
}
