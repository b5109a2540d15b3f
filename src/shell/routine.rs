//! Scripted robot performances
//!
//! A routine is a fixed table of [`Step`]s played back in order. The talent
//! show and the connect/disconnect feedback are all written this way.

use finch_core::{Robot, RobotError};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Led(i32, i32, i32),
    Note(i32),
    NoteOff,
    Motors(i32, i32),
    Wait(u32),
}

use Step::*;

/// Play `steps` against `robot`, stopping at the first failure
pub fn perform<R>(robot: &mut R, steps: &[Step]) -> Result<(), RobotError>
where
    R: Robot + ?Sized,
{
    for &step in steps {
        debug!(?step, "routine step");

        match step {
            Led(red, green, blue) => robot.set_led(red, green, blue)?,
            Note(frequency) => robot.tone_on(frequency)?,
            NoteOff => robot.tone_off()?,
            Motors(left, right) => robot.set_motors(left, right)?,
            Wait(ms) => robot.wait(ms)?,
        }
    }

    Ok(())
}

pub const CONNECTED: &[Step] = &[
    Led(255, 0, 0),
    Wait(500),
    Led(0, 255, 0),
    Wait(500),
    Led(0, 0, 255),
    Wait(500),
    Note(250),
    Wait(500),
    NoteOff,
];

pub const LED_OFF: &[Step] = &[Led(0, 0, 0)];

pub const DISCONNECTING: &[Step] = &[Note(700), Wait(250), NoteOff];

pub const ALARM: &[Step] = &[Led(255, 0, 0), Note(1000), Wait(1000), NoteOff];

pub const ALL_CLEAR: &[Step] = &[Led(0, 255, 0)];

pub const FULL_CIRCLE: &[Step] = &[
    Motors(125, 0),
    Wait(1000),
    Motors(0, 125),
    Wait(1000),
    Motors(125, 0),
    Wait(1000),
    Motors(0, 125),
    Wait(1000),
    Motors(0, 125),
    Wait(4000),
    Motors(0, 0),
];

pub const BACKING_UP_CIRCLE: &[Step] = &[
    Motors(-125, 0),
    Wait(1000),
    Motors(0, -125),
    Wait(1000),
    Motors(-125, 0),
    Wait(1000),
    Motors(-125, -125),
    Wait(1000),
    Motors(-255, 0),
    Wait(2000),
    Motors(0, 0),
];

pub const BOOGIE: &[Step] = &[
    Led(255, 0, 0),
    Note(710),
    Motors(150, 0),
    Wait(400),
    Motors(0, 0),
    Note(510),
    Wait(500),
    Note(400),
    Wait(1200),
    Note(510),
    Wait(700),
    Note(610),
    Wait(700),
    Note(810),
    Wait(500),
    NoteOff,
    Motors(150, 150),
    Wait(300),
    Motors(0, 0),
    //
    Led(255, 255, 255),
    Wait(500),
    Note(1000),
    Wait(700),
    Note(910),
    Wait(500),
    Note(800),
    Wait(700),
    Note(500),
    Wait(600),
    Note(550),
    Wait(600),
    Note(610),
    Wait(700),
    NoteOff,
    Wait(500),
    Motors(255, -255),
    Wait(300),
    Motors(0, 0),
    //
    Led(0, 0, 255),
    Note(610),
    Wait(700),
    Note(550),
    Note(1000),
    Wait(900),
    Note(910),
    Wait(500),
    Note(810),
    Wait(500),
    Note(750),
    Wait(700),
    NoteOff,
    Wait(200),
    Motors(0, -255),
    Wait(500),
    Motors(200, -50),
    Wait(500),
    Motors(0, 0),
];

/// LED fades from blue to red while the tone climbs and falls again
pub fn light_and_sound() -> Vec<Step> {
    let rising = (0..255).flat_map(|level| [Led(level, level, 255), Wait(5), Note(level * 10)]);
    let falling = (1..=255)
        .rev()
        .flat_map(|level| [Led(255, level, level), Wait(5), Note(level * 10)]);

    rising.chain(falling).chain([NoteOff]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts what a routine would do to a robot
    #[derive(Default)]
    struct Tally {
        steps: Vec<Step>,
        fail_on_motors: bool,
    }

    impl Robot for Tally {
        fn set_motors(&mut self, left: i32, right: i32) -> Result<(), RobotError> {
            if self.fail_on_motors {
                return Err(RobotError::Disconnected);
            }
            self.steps.push(Motors(left, right));
            Ok(())
        }

        fn set_led(&mut self, red: i32, green: i32, blue: i32) -> Result<(), RobotError> {
            self.steps.push(Led(red, green, blue));
            Ok(())
        }

        fn tone_on(&mut self, frequency: i32) -> Result<(), RobotError> {
            self.steps.push(Note(frequency));
            Ok(())
        }

        fn tone_off(&mut self) -> Result<(), RobotError> {
            self.steps.push(NoteOff);
            Ok(())
        }

        fn wait(&mut self, ms: u32) -> Result<(), RobotError> {
            self.steps.push(Wait(ms));
            Ok(())
        }

        fn read_left_light(&mut self) -> Result<i32, RobotError> {
            Ok(0)
        }

        fn read_right_light(&mut self) -> Result<i32, RobotError> {
            Ok(0)
        }

        fn read_temperature(&mut self) -> Result<f64, RobotError> {
            Ok(0.0)
        }
    }

    fn total_wait(steps: &[Step]) -> u32 {
        steps
            .iter()
            .map(|step| match step {
                Wait(ms) => *ms,
                _ => 0,
            })
            .sum()
    }

    #[test]
    fn test_perform_plays_steps_in_order() {
        let mut robot = Tally::default();

        perform(&mut robot, CONNECTED).unwrap();

        assert_eq!(robot.steps, CONNECTED);
    }

    #[test]
    fn test_perform_stops_at_first_failure() {
        let mut robot = Tally {
            fail_on_motors: true,
            ..Tally::default()
        };

        assert!(perform(&mut robot, &[Led(1, 2, 3), Motors(10, 10), NoteOff]).is_err());
        assert_eq!(robot.steps, [Led(1, 2, 3)]);
    }

    #[test]
    fn test_moving_routines_end_stopped() {
        for routine in [FULL_CIRCLE, BACKING_UP_CIRCLE, BOOGIE] {
            let last_motors = routine.iter().rev().find(|step| matches!(step, Motors(..)));
            assert_eq!(last_motors, Some(&Motors(0, 0)));
        }
    }

    #[test]
    fn test_sounding_routines_end_silent() {
        let light_and_sound = light_and_sound();

        for routine in [CONNECTED, DISCONNECTING, ALARM, BOOGIE, &light_and_sound[..]] {
            let last_tone = routine
                .iter()
                .rev()
                .find(|step| matches!(step, Note(_) | NoteOff));
            assert_eq!(last_tone, Some(&NoteOff));
        }
    }

    #[test]
    fn test_light_and_sound_sweeps_the_led() {
        let steps = light_and_sound();
        let leds = steps.iter().filter(|step| matches!(step, Led(..))).count();

        assert_eq!(leds, 510);
        assert_eq!(steps.first(), Some(&Led(0, 0, 255)));
        assert_eq!(total_wait(&steps), 510 * 5);
    }

    #[test]
    fn test_boogie_third_phrase() {
        let phrase = BOOGIE
            .iter()
            .skip_while(|step| **step != Led(0, 0, 255))
            .take(5)
            .copied()
            .collect::<Vec<_>>();

        assert_eq!(
            phrase,
            [Led(0, 0, 255), Note(610), Wait(700), Note(550), Note(1000)]
        );
    }

    #[test]
    fn test_routine_durations() {
        assert_eq!(total_wait(CONNECTED), 2000);
        assert_eq!(total_wait(FULL_CIRCLE), 8000);
        assert_eq!(total_wait(BACKING_UP_CIRCLE), 6000);
    }
}
