use std::{fmt, str::FromStr};

use finch_core::{
    validate, Mode, MonitorConfigBuilder, MonitorError, MonitorState, Outcome, PromptError,
    Robot, Sensor, ThresholdMonitor,
};
use tracing::{error, warn};

use super::{ask_parsed, connected, invalid_choice, report_robot_error, routine, Connection};
use crate::console::Terminal;

const MENU: &str = "Alarm System Menu";

#[derive(Default)]
pub struct AlarmSystem {
    settings: MonitorConfigBuilder,
}

impl AlarmSystem {
    pub fn menu(&mut self, console: &mut Terminal, robot: &mut Connection) -> Result<(), PromptError> {
        loop {
            console.header(MENU);
            self.show_settings(console);
            console.blank();
            console.line("a) Set Sensors");
            console.line("b) Set Range Type");
            console.line("c) Set Threshold");
            console.line("d) Set Time to Monitor");
            console.line("e) Start Monitoring");
            console.line("q) Main Menu");

            match console.choice()?.as_str() {
                "a" => {
                    console.header("Sensors to Monitor");
                    let sensor: Sensor = ask_parsed(console, "Sensors to monitor [left, right, both]:")?;
                    self.settings.sensor(sensor);
                }
                "b" => {
                    console.header("Range Type");
                    let mode: Mode = ask_parsed(console, "Range type [minimum, maximum]:")?;
                    self.settings.mode(mode);
                }
                "c" => {
                    console.header("Threshold");
                    let threshold = validate(console, "Light level threshold:", 0, 0)?;
                    self.settings.threshold(threshold);
                }
                "d" => {
                    console.header("Time to Monitor");
                    let Seconds(seconds) = ask_parsed(console, "Seconds to monitor:")?;
                    self.settings.budget_seconds(seconds);
                }
                "e" => {
                    console.header("Monitoring");
                    self.start(console, robot);
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

    fn show_settings(&self, console: &mut Terminal) {
        fn or_unset(value: Option<impl ToString>) -> String {
            value.map_or_else(|| "not set".to_owned(), |value| value.to_string())
        }

        let settings = &self.settings;
        console.line(format!("Sensors: {}", or_unset(settings.sensor)));
        console.line(format!("Range type: {}", or_unset(settings.mode)));
        console.line(format!("Threshold: {}", or_unset(settings.threshold)));
        console.line(format!(
            "Time to monitor: {}",
            or_unset(settings.budget_seconds.map(|s| format!("{s} seconds")))
        ));
    }

    fn start(&self, console: &mut Terminal, robot: &mut Connection) {
        let config = match self.settings.build() {
            Ok(config) => config,
            Err(error) => {
                warn!(%error, "monitoring requested before setup");
                console.line(error.to_string());
                return;
            }
        };

        let Some(robot) = connected(console, robot) else {
            return;
        };

        console.line(format!(
            "Watching the {} light level for a reading {} {} over {} seconds.",
            config.sensor,
            match config.mode {
                Mode::Floor => "below",
                Mode::Ceiling => "above",
            },
            config.threshold,
            config.budget_seconds
        ));
        console.blank();

        let mut monitor = ThresholdMonitor::new(config);

        let outcome = watch(&mut monitor, &mut **robot, |elapsed_seconds, sample| {
            console.line(format!("{elapsed_seconds:>5} s   light level {sample}"));
        });

        let signal = match outcome {
            Ok(outcome) => {
                console.blank();
                console.line(capitalised(&outcome.to_string()));

                match outcome {
                    Outcome::Crossed { .. } => routine::ALARM,
                    Outcome::Exhausted { .. } => routine::ALL_CLEAR,
                }
            }
            Err(MonitorError::Robot(error)) => {
                report_robot_error(console, &error);
                return;
            }
            Err(error) => {
                error!(%error, "monitoring failed");
                console.line(error.to_string());
                return;
            }
        };

        if let Err(error) = routine::perform(&mut **robot, signal) {
            report_robot_error(console, &error);
        }
    }
}

/// Monitoring time as typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Seconds(u32);

#[derive(Debug)]
struct NotWholeSeconds(String);

impl fmt::Display for NotWholeSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not a time to monitor, please enter a whole number of seconds (0 or more)",
            self.0
        )
    }
}

impl FromStr for Seconds {
    type Err = NotWholeSeconds;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        s.parse()
            .map(Seconds)
            .map_err(|_| NotWholeSeconds(s.to_owned()))
    }
}

/// Drive `monitor` to the end, reporting each sample as it is taken
fn watch<R>(
    monitor: &mut ThresholdMonitor,
    robot: &mut R,
    mut on_sample: impl FnMut(u32, i32),
) -> Result<Outcome, MonitorError>
where
    R: Robot + ?Sized,
{
    monitor.start();

    let mut reported = 0;

    loop {
        let state = monitor.step(robot)?;

        let elapsed_seconds = match state {
            MonitorState::Idle => 0,
            MonitorState::Running { elapsed_seconds }
            | MonitorState::Exhausted { elapsed_seconds } => elapsed_seconds,
            MonitorState::Crossed(crossing) => crossing.elapsed_seconds,
        };

        if elapsed_seconds > reported {
            if let Some(sample) = monitor.last_sample() {
                on_sample(elapsed_seconds, sample);
            }
            reported = elapsed_seconds;
        }

        if let Some(outcome) = monitor.outcome() {
            return Ok(outcome);
        }
    }
}

fn capitalised(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
