use finch_core::{validate, PromptError, Robot, RobotError};
use ringbuffer::{AllocRingBuffer, RingBuffer};
use tracing::{debug, info};

use super::{connected, invalid_choice, report_robot_error, Connection};
use crate::console::Terminal;

const MENU: &str = "Data Recorder Menu";

/// Readings kept for display, oldest dropped first
const HISTORY: usize = 100;

const POINTS_RANGE: (u32, u32) = (1, 50);
const FREQUENCY_RANGE: (f64, f64) = (0.1, 60.0);

/// Temperature sampling, with the readings of every run kept in one history
pub struct DataRecorder {
    points: Option<u32>,
    /// Seconds between readings
    frequency: Option<f64>,
    readings: AllocRingBuffer<f64>,
}

impl Default for DataRecorder {
    fn default() -> Self {
        Self {
            points: None,
            frequency: None,
            readings: AllocRingBuffer::new(HISTORY),
        }
    }
}

impl DataRecorder {
    pub fn menu(&mut self, console: &mut Terminal, robot: &mut Connection) -> Result<(), PromptError> {
        loop {
            console.header(MENU);
            console.line("a) Number of Data Points");
            console.line("b) Frequency of Data Points");
            console.line("c) Get Data");
            console.line("d) Show Data");
            console.line("q) Main Menu");

            match console.choice()?.as_str() {
                "a" => {
                    console.header("Number of Data Points");
                    let (min, max) = POINTS_RANGE;
                    self.points = Some(validate(console, "Number of data points:", min, max)?);
                }
                "b" => {
                    console.header("Frequency of Data Points");
                    let (min, max) = FREQUENCY_RANGE;
                    self.frequency = Some(validate(console, "Seconds between readings:", min, max)?);
                }
                "c" => {
                    console.header("Get Data");
                    self.get_data(console, robot);
                }
                "d" => {
                    console.header("Show Data");
                    self.show_data(console);
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

    fn get_data(&mut self, console: &mut Terminal, robot: &mut Connection) {
        let (Some(points), Some(frequency)) = (self.points, self.frequency) else {
            console.line("Please set the number and frequency of data points first.");
            return;
        };

        let Some(robot) = connected(console, robot) else {
            return;
        };

        let interval_ms = (frequency * 1000.0).round() as u32;

        info!(points, interval_ms, "recording temperature");

        let recorded = self.record(&mut **robot, points, interval_ms, |number, celsius| {
            console.line(format!("Reading {number}: {celsius:.2} C"));
        });

        if let Err(error) = recorded {
            report_robot_error(console, &error);
        }
    }

    /// Take `points` readings `interval_ms` apart, reporting each as it arrives
    fn record<R>(
        &mut self,
        robot: &mut R,
        points: u32,
        interval_ms: u32,
        mut on_reading: impl FnMut(u32, f64),
    ) -> Result<(), RobotError>
    where
        R: Robot + ?Sized,
    {
        for number in 1..=points {
            let celsius = robot.read_temperature()?;
            debug!(number, celsius, "temperature reading");

            self.readings.push(celsius);
            on_reading(number, celsius);

            if number < points {
                robot.wait(interval_ms)?;
            }
        }

        Ok(())
    }

    fn show_data(&self, console: &mut Terminal) {
        let Some(average) = average(&self.readings) else {
            console.line("No data has been recorded yet.");
            return;
        };

        console.line(format!("{:>10}{:>15}", "Reading", "Temperature"));
        console.line(format!("{:>10}{:>15}", "-------", "-----------"));

        for (number, celsius) in self.readings.iter().enumerate() {
            console.line(format!("{:>10}{:>15.2}", number + 1, celsius));
        }

        console.blank();
        console.line(format!("Average temperature: {average:.2} C"));
    }
}

fn average(readings: &AllocRingBuffer<f64>) -> Option<f64> {
    if readings.is_empty() {
        return None;
    }

    Some(readings.iter().sum::<f64>() / readings.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::SimulatedRobot;

    #[test]
    fn test_average() {
        let mut readings = AllocRingBuffer::new(4);
        assert_eq!(average(&readings), None);

        readings.push(20.0);
        readings.push(22.0);
        readings.push(24.0);
        assert_eq!(average(&readings), Some(22.0));
    }

    #[test]
    fn test_history_keeps_most_recent() {
        let mut recorder = DataRecorder::default();
        let mut robot = SimulatedRobot::instant();

        recorder.record(&mut robot, 50, 0, |_, _| {}).unwrap();
        recorder.record(&mut robot, 50, 0, |_, _| {}).unwrap();
        recorder.record(&mut robot, 30, 0, |_, _| {}).unwrap();

        assert_eq!(recorder.readings.len(), HISTORY);
    }

    #[test]
    fn test_record_reports_each_reading() {
        let mut recorder = DataRecorder::default();
        let mut robot = SimulatedRobot::instant();
        let mut seen = Vec::new();

        recorder
            .record(&mut robot, 3, 0, |number, _| seen.push(number))
            .unwrap();

        assert_eq!(seen, [1, 2, 3]);
        assert_eq!(recorder.readings.len(), 3);
    }
}
