use finch_core::PromptError;
use tracing::info;

use super::{connected, invalid_choice, report_robot_error, routine, Connection};
use crate::console::Terminal;

const MENU: &str = "Talent Show Menu";

pub fn menu(console: &mut Terminal, robot: &mut Connection) -> Result<(), PromptError> {
    loop {
        console.header(MENU);
        console.line("a) Light and Sound");
        console.line("b) Dance");
        console.line("c) The Boogie");
        console.line("q) Main Menu");

        let act = match console.choice()?.as_str() {
            "a" => Act::LightAndSound,
            "b" => Act::Dance,
            "c" => Act::Boogie,
            "q" => return Ok(()),
            _ => {
                invalid_choice(console)?;
                continue;
            }
        };

        console.header(act.title());

        if let Some(robot) = connected(console, robot) {
            console.line(act.introduction());
            console.pause()?;

            info!(?act, "talent show act started");

            let performed = act
                .routines()
                .iter()
                .try_for_each(|steps| routine::perform(&mut **robot, steps));

            if let Err(error) = performed {
                report_robot_error(console, &error);
            }
        }

        console.pause_for_menu(MENU)?;
    }
}

#[derive(Debug, Clone, Copy)]
enum Act {
    LightAndSound,
    Dance,
    Boogie,
}

impl Act {
    fn title(self) -> &'static str {
        match self {
            Act::LightAndSound => "Light and Sound",
            Act::Dance => "The Dancing Finch",
            Act::Boogie => "The Finch's Wild Boogie",
        }
    }

    fn introduction(self) -> &'static str {
        match self {
            Act::LightAndSound => "The Finch robot will now show off its glowing talent!",
            Act::Dance => "The Finch robot will now show off its spectacular dance moves!",
            Act::Boogie => "The Finch robot will now show you how to boogie!",
        }
    }

    fn routines(self) -> Vec<Vec<routine::Step>> {
        match self {
            Act::LightAndSound => vec![routine::light_and_sound()],
            Act::Dance => vec![
                routine::FULL_CIRCLE.to_vec(),
                routine::BACKING_UP_CIRCLE.to_vec(),
            ],
            Act::Boogie => vec![routine::BOOGIE.to_vec()],
        }
    }
}
