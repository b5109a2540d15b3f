//! Stand-in robot for running the shell without hardware
//!
//! Actuator calls are only logged. Light levels follow a slow triangle wave
//! so the alarm system has something to cross, the temperature drifts
//! around room temperature.

use std::{thread, time::Duration};

use finch_core::{Robot, RobotError};
use tracing::{debug, info};

const LIGHT_LOW: i32 = 20;
const LIGHT_HIGH: i32 = 230;
const LIGHT_STEP: i32 = 15;

#[derive(Debug)]
pub struct SimulatedRobot {
    light: i32,
    rising: bool,
    reads: u32,
    /// Divide every wait by this factor; 1 keeps real time
    time_scale: u32,
}

impl SimulatedRobot {
    pub fn new() -> Self {
        info!("simulated robot connected");

        Self {
            light: 120,
            rising: true,
            reads: 0,
            time_scale: 1,
        }
    }

    #[cfg(test)]
    pub(crate) fn instant() -> Self {
        Self {
            time_scale: u32::MAX,
            ..Self::new()
        }
    }

    fn advance_light(&mut self) -> i32 {
        if self.rising {
            self.light += LIGHT_STEP;
        } else {
            self.light -= LIGHT_STEP;
        }

        if self.light >= LIGHT_HIGH {
            self.light = LIGHT_HIGH;
            self.rising = false;
        } else if self.light <= LIGHT_LOW {
            self.light = LIGHT_LOW;
            self.rising = true;
        }

        self.light
    }
}

impl Robot for SimulatedRobot {
    fn set_motors(&mut self, left: i32, right: i32) -> Result<(), RobotError> {
        debug!(left, right, "simulated motors");
        Ok(())
    }

    fn set_led(&mut self, red: i32, green: i32, blue: i32) -> Result<(), RobotError> {
        debug!(red, green, blue, "simulated led");
        Ok(())
    }

    fn tone_on(&mut self, frequency: i32) -> Result<(), RobotError> {
        debug!(frequency, "simulated tone on");
        Ok(())
    }

    fn tone_off(&mut self) -> Result<(), RobotError> {
        debug!("simulated tone off");
        Ok(())
    }

    fn wait(&mut self, ms: u32) -> Result<(), RobotError> {
        thread::sleep(Duration::from_millis((ms / self.time_scale).into()));
        Ok(())
    }

    fn read_left_light(&mut self) -> Result<i32, RobotError> {
        Ok(self.advance_light())
    }

    fn read_right_light(&mut self) -> Result<i32, RobotError> {
        // Right eye sits slightly in the shade
        Ok(self.advance_light() - 10)
    }

    fn read_temperature(&mut self) -> Result<f64, RobotError> {
        self.reads = self.reads.wrapping_add(1);

        Ok(21.5 + f64::from(self.reads % 7) * 0.25)
    }
}
