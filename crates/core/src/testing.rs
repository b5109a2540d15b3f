//! Scripted input and a call-recording robot for unit tests

use std::collections::VecDeque;

use crate::{
    prompt::{PromptError, Prompter},
    robot::{Robot, RobotError},
};

pub struct ScriptedPrompter {
    lines: VecDeque<String>,
    pub asked: usize,
    pub told: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            asked: 0,
            told: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, _prompt: &str) -> Result<String, PromptError> {
        self.asked += 1;
        self.lines.pop_front().ok_or(PromptError::Closed)
    }

    fn tell(&mut self, message: &str) {
        self.told.push(message.to_owned());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Motors(i32, i32),
    Led(i32, i32, i32),
    ToneOn(i32),
    ToneOff,
    Wait(u32),
    LeftLight,
    RightLight,
    Temperature,
}

/// Robot that records every call and replays scripted sensor readings
///
/// Running out of scripted readings, or reaching `fail_after` calls, reports
/// the robot as disconnected.
#[derive(Debug, Default)]
pub struct RecordingRobot {
    pub calls: Vec<Call>,
    pub left: VecDeque<i32>,
    pub right: VecDeque<i32>,
    pub temperatures: VecDeque<f64>,
    pub fail_after: Option<usize>,
}

impl RecordingRobot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_left(mut self, readings: impl IntoIterator<Item = i32>) -> Self {
        self.left.extend(readings);
        self
    }

    pub fn with_right(mut self, readings: impl IntoIterator<Item = i32>) -> Self {
        self.right.extend(readings);
        self
    }

    pub fn with_temperatures(mut self, readings: impl IntoIterator<Item = f64>) -> Self {
        self.temperatures.extend(readings);
        self
    }

    pub fn failing_after(mut self, calls: usize) -> Self {
        self.fail_after = Some(calls);
        self
    }

    pub fn waits(&self) -> impl Iterator<Item = u32> + '_ {
        self.calls.iter().filter_map(|call| match call {
            Call::Wait(ms) => Some(*ms),
            _ => None,
        })
    }

    fn record(&mut self, call: Call) -> Result<(), RobotError> {
        if self.fail_after.is_some_and(|limit| self.calls.len() >= limit) {
            return Err(RobotError::Disconnected);
        }

        self.calls.push(call);
        Ok(())
    }
}

impl Robot for RecordingRobot {
    fn set_motors(&mut self, left: i32, right: i32) -> Result<(), RobotError> {
        self.record(Call::Motors(left, right))
    }

    fn set_led(&mut self, red: i32, green: i32, blue: i32) -> Result<(), RobotError> {
        self.record(Call::Led(red, green, blue))
    }

    fn tone_on(&mut self, frequency: i32) -> Result<(), RobotError> {
        self.record(Call::ToneOn(frequency))
    }

    fn tone_off(&mut self) -> Result<(), RobotError> {
        self.record(Call::ToneOff)
    }

    fn wait(&mut self, ms: u32) -> Result<(), RobotError> {
        self.record(Call::Wait(ms))
    }

    fn read_left_light(&mut self) -> Result<i32, RobotError> {
        self.record(Call::LeftLight)?;
        self.left.pop_front().ok_or(RobotError::Disconnected)
    }

    fn read_right_light(&mut self) -> Result<i32, RobotError> {
        self.record(Call::RightLight)?;
        self.right.pop_front().ok_or(RobotError::Disconnected)
    }

    fn read_temperature(&mut self) -> Result<f64, RobotError> {
        self.record(Call::Temperature)?;
        self.temperatures.pop_front().ok_or(RobotError::Disconnected)
    }
}
