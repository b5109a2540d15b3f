//! Threshold monitor
//!
//! Polls a light sensor once per second and stops as soon as a reading
//! crosses the configured bound, or when the time budget runs out.
//!
//! ```text
//! Idle -> Running { elapsed } -> Crossed | Exhausted
//! ```

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use tracing::{debug, info};

use crate::robot::{Robot, RobotError};

/// Delay between two samples
pub const POLL_INTERVAL_MS: u32 = 1000;

/// Which light sensor to sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    Left,
    Right,
    /// Mean of one left and one right reading
    Both,
}

/// Direction in which the threshold counts as crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Crossed when a reading falls below the threshold
    Floor,
    /// Crossed when a reading rises above the threshold
    Ceiling,
}

impl Mode {
    pub fn crossed(&self, sample: i32, threshold: i32) -> bool {
        match self {
            Mode::Floor => sample < threshold,
            Mode::Ceiling => sample > threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOption {
    pub expected: &'static str,
    pub got: String,
}

impl Display for UnknownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not one of {}", self.got, self.expected)
    }
}

impl std::error::Error for UnknownOption {}

impl FromStr for Sensor {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Sensor::Left),
            "right" => Ok(Sensor::Right),
            "both" => Ok(Sensor::Both),
            _ => Err(UnknownOption {
                expected: "left, right, both",
                got: s.trim().to_owned(),
            }),
        }
    }
}

impl FromStr for Mode {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimum" => Ok(Mode::Floor),
            "maximum" => Ok(Mode::Ceiling),
            _ => Err(UnknownOption {
                expected: "minimum, maximum",
                got: s.trim().to_owned(),
            }),
        }
    }
}

impl Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sensor::Left => f.write_str("left"),
            Sensor::Right => f.write_str("right"),
            Sensor::Both => f.write_str("both"),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Floor => f.write_str("minimum"),
            Mode::Ceiling => f.write_str("maximum"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub sensor: Sensor,
    pub mode: Mode,
    pub threshold: i32,
    pub budget_seconds: u32,
}

/// Collects the four monitor settings independently of each other
///
/// No cross-field checks are made; a floor above the ambient light level is
/// accepted and simply crosses on the first sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorConfigBuilder {
    pub sensor: Option<Sensor>,
    pub mode: Option<Mode>,
    pub threshold: Option<i32>,
    pub budget_seconds: Option<u32>,
}

impl MonitorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sensor(&mut self, sensor: Sensor) -> &mut Self {
        self.sensor = Some(sensor);
        self
    }

    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = Some(mode);
        self
    }

    pub fn threshold(&mut self, threshold: i32) -> &mut Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn budget_seconds(&mut self, budget_seconds: u32) -> &mut Self {
        self.budget_seconds = Some(budget_seconds);
        self
    }

    /// Fails with the first unset field
    pub fn build(&self) -> Result<MonitorConfig, MonitorError> {
        let missing = |field| MonitorError::Incomplete { missing: field };

        Ok(MonitorConfig {
            sensor: self.sensor.ok_or_else(|| missing("sensor"))?,
            mode: self.mode.ok_or_else(|| missing("range type"))?,
            threshold: self.threshold.ok_or_else(|| missing("threshold"))?,
            budget_seconds: self.budget_seconds.ok_or_else(|| missing("time to monitor"))?,
        })
    }
}

#[derive(Debug)]
pub enum MonitorError {
    /// Monitoring was requested before every setting was given
    Incomplete { missing: &'static str },
    Robot(RobotError),
}

impl Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Incomplete { missing } => {
                write!(f, "monitor is not fully configured: {missing} has not been set")
            }
            MonitorError::Robot(error) => write!(f, "monitoring stopped: {error}"),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::Incomplete { .. } => None,
            MonitorError::Robot(error) => Some(error),
        }
    }
}

impl From<RobotError> for MonitorError {
    fn from(error: RobotError) -> Self {
        Self::Robot(error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub sample: i32,
    pub elapsed_seconds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    /// `elapsed_seconds` counts the samples taken so far
    Running { elapsed_seconds: u32 },
    Crossed(Crossing),
    Exhausted { elapsed_seconds: u32 },
}

impl MonitorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MonitorState::Crossed(_) | MonitorState::Exhausted { .. })
    }
}

/// How a monitoring run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Crossed { sample: i32, elapsed_seconds: u32 },
    Exhausted { elapsed_seconds: u32 },
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Crossed {
                sample,
                elapsed_seconds,
            } => write!(
                f,
                "threshold crossed at reading {sample} after {elapsed_seconds} seconds"
            ),
            Outcome::Exhausted { elapsed_seconds } => {
                write!(f, "no crossing within the {elapsed_seconds} second budget")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThresholdMonitor {
    config: MonitorConfig,
    state: MonitorState,
    last_sample: Option<i32>,
}

impl ThresholdMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            state: MonitorState::Idle,
            last_sample: None,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Most recent reading, if any sample has been taken
    pub fn last_sample(&self) -> Option<i32> {
        self.last_sample
    }

    /// Begin a run. Has no effect unless the monitor is idle.
    pub fn start(&mut self) {
        if self.state == MonitorState::Idle {
            info!(config = ?self.config, "threshold monitor started");
            self.state = MonitorState::Running { elapsed_seconds: 0 };
        }
    }

    /// Take one sample and advance the state machine
    ///
    /// Sleeps for [`POLL_INTERVAL_MS`] when the run continues. Outside the
    /// `Running` state this does nothing and returns the current state.
    pub fn step<R>(&mut self, robot: &mut R) -> Result<MonitorState, MonitorError>
    where
        R: Robot + ?Sized,
    {
        let MonitorState::Running { elapsed_seconds } = self.state else {
            return Ok(self.state);
        };

        let budget = self.config.budget_seconds;

        if elapsed_seconds >= budget {
            self.state = MonitorState::Exhausted { elapsed_seconds };
            return Ok(self.state);
        }

        let sample = self.sample(robot)?;
        let elapsed_seconds = elapsed_seconds + 1;
        self.last_sample = Some(sample);

        debug!(sample, elapsed_seconds, "threshold monitor sample");

        self.state = if self.config.mode.crossed(sample, self.config.threshold) {
            MonitorState::Crossed(Crossing {
                sample,
                elapsed_seconds,
            })
        } else if elapsed_seconds >= budget {
            MonitorState::Exhausted { elapsed_seconds }
        } else {
            robot.wait(POLL_INTERVAL_MS)?;
            MonitorState::Running { elapsed_seconds }
        };

        Ok(self.state)
    }

    /// Run from idle until a terminal state is reached
    pub fn run<R>(&mut self, robot: &mut R) -> Result<Outcome, MonitorError>
    where
        R: Robot + ?Sized,
    {
        self.start();

        loop {
            if let Some(outcome) = self.outcome() {
                info!(%outcome, "threshold monitor finished");
                return Ok(outcome);
            }

            self.step(robot)?;
        }
    }

    /// The result, once the run has finished
    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            MonitorState::Crossed(Crossing {
                sample,
                elapsed_seconds,
            }) => Some(Outcome::Crossed {
                sample,
                elapsed_seconds,
            }),
            MonitorState::Exhausted { elapsed_seconds } => {
                Some(Outcome::Exhausted { elapsed_seconds })
            }
            MonitorState::Idle | MonitorState::Running { .. } => None,
        }
    }

    fn sample<R>(&self, robot: &mut R) -> Result<i32, RobotError>
    where
        R: Robot + ?Sized,
    {
        Ok(match self.config.sensor {
            Sensor::Left => robot.read_left_light()?,
            Sensor::Right => robot.read_right_light()?,
            Sensor::Both => {
                let left = robot.read_left_light()?;
                let right = robot.read_right_light()?;

                // Mean of two i32 values always fits back into i32
                ((i64::from(left) + i64::from(right)) / 2) as i32
            }
        })
    }
}
