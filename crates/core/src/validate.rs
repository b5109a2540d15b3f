//! Range-checked numeric input
//!
//! [`check`] is the accept/reject rule, [`validate`] the retry loop around it.
//! A zero-width range (`max - min == 0`) accepts any parseable number.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use tracing::warn;

use crate::prompt::{PromptError, Prompter};

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError<T> {
    NotANumber(String),
    BelowMinimum { value: T, min: T },
    AboveMaximum { value: T, max: T },
}

impl<T: Display> Display for ValidationError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotANumber(raw) => write!(f, "'{raw}' is not a number"),
            ValidationError::BelowMinimum { value, min } => {
                write!(f, "{value} is below the minimum of {min}")
            }
            ValidationError::AboveMaximum { value, max } => {
                write!(f, "{value} is above the maximum of {max}")
            }
        }
    }
}

impl<T: Display + fmt::Debug> std::error::Error for ValidationError<T> {}

/// Parse `raw` and check it against the inclusive range `min..=max`
pub fn check<T>(raw: &str, min: T, max: T) -> Result<T, ValidationError<T>>
where
    T: FromStr + PartialOrd + Copy,
{
    let raw = raw.trim();

    let value = raw
        .parse::<T>()
        .map_err(|_| ValidationError::NotANumber(raw.to_owned()))?;

    // NaN parses as a float but has no place in any range
    if value.partial_cmp(&value).is_none() {
        return Err(ValidationError::NotANumber(raw.to_owned()));
    }

    // Zero-width range: no bound check
    if min == max {
        return Ok(value);
    }

    if value < min {
        return Err(ValidationError::BelowMinimum { value, min });
    }

    if value > max {
        return Err(ValidationError::AboveMaximum { value, max });
    }

    Ok(value)
}

/// Ask until the answer passes [`check`]
///
/// There is no attempt limit. The loop only ends on an accepted value or when
/// the prompter runs out of input.
pub fn validate<T, P>(prompter: &mut P, prompt: &str, min: T, max: T) -> Result<T, PromptError>
where
    T: FromStr + PartialOrd + Copy + Display,
    P: Prompter + ?Sized,
{
    loop {
        let raw = prompter.ask(prompt)?;

        match check(&raw, min, max) {
            Ok(value) => return Ok(value),
            Err(error) => {
                warn!(%raw, %error, "rejected numeric input");

                let message = if min == max {
                    format!("{error}, please enter a number")
                } else {
                    format!("{error}, please enter a number between {min} and {max}")
                };

                prompter.tell(&message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedPrompter;

    #[test]
    fn test_byte_range() {
        assert_eq!(check::<i32>("1", 1, 255), Ok(1));
        assert_eq!(check::<i32>("255", 1, 255), Ok(255));
        assert_eq!(
            check::<i32>("0", 1, 255),
            Err(ValidationError::BelowMinimum { value: 0, min: 1 })
        );
        assert_eq!(
            check::<i32>("256", 1, 255),
            Err(ValidationError::AboveMaximum { value: 256, max: 255 })
        );
        assert_eq!(
            check::<i32>("abc", 1, 255),
            Err(ValidationError::NotANumber("abc".into()))
        );
    }

    #[test]
    fn test_zero_width_accepts_anything_parseable() {
        assert_eq!(check::<i32>("-4000", 0, 0), Ok(-4000));
        assert_eq!(check::<i32>("12", 7, 7), Ok(12));
        assert!(check::<i32>("twelve", 0, 0).is_err());
    }

    #[test]
    fn test_fractional_seconds() {
        assert_eq!(check::<f64>(" 2.5 ", 0.0, 10.0), Ok(2.5));
        assert!(check::<f64>("10.5", 0.0, 10.0).is_err());
    }

    #[test]
    fn test_unordered_floats_are_rejected() {
        assert_eq!(
            check::<f64>("NaN", 0.0, 10.0),
            Err(ValidationError::NotANumber("NaN".into()))
        );
        assert!(matches!(
            check::<f64>("nan", 0.0, 0.0),
            Err(ValidationError::NotANumber(_))
        ));
        assert_eq!(
            check::<f64>("inf", 0.0, 10.0),
            Err(ValidationError::AboveMaximum {
                value: f64::INFINITY,
                max: 10.0
            })
        );
        assert_eq!(
            check::<f64>("-inf", 0.0, 10.0),
            Err(ValidationError::BelowMinimum {
                value: f64::NEG_INFINITY,
                min: 0.0
            })
        );
    }

    #[test]
    fn test_retries_until_valid() {
        let mut prompter = ScriptedPrompter::new(["abc", "0", "300", "42"]);

        let value = validate::<i32, _>(&mut prompter, "Speed", 1, 255).unwrap();

        assert_eq!(value, 42);
        assert_eq!(prompter.told.len(), 3);
        assert!(prompter.told[1].contains("minimum of 1"));
        assert!(prompter.told[2].contains("maximum of 255"));
    }

    #[test]
    fn test_closed_input_ends_loop() {
        let mut prompter = ScriptedPrompter::new(["nope"]);

        let result = validate::<i32, _>(&mut prompter, "Speed", 1, 255);

        assert!(matches!(result, Err(PromptError::Closed)));
    }
}
