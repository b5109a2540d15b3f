//! Wire format spoken with the robot
//!
//! Every frame is COBS encoded and terminated by a single `0x00`. A request
//! is one opcode byte followed by its little-endian arguments. Sensor
//! requests are answered with a frame that echoes the opcode followed by the
//! value.

use std::{io::BufRead, mem::size_of};

use crate::error::{ReplyError, TransportError};

pub const MOTORS: u8 = 0x01;
pub const LED: u8 = 0x02;
pub const TONE_ON: u8 = 0x03;
pub const TONE_OFF: u8 = 0x04;
pub const LEFT_LIGHT: u8 = 0x10;
pub const RIGHT_LIGHT: u8 = 0x11;
pub const TEMPERATURE: u8 = 0x12;

pub const MAX_MOTOR_SPEED: i32 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Motors { left: i16, right: i16 },
    Led { red: u8, green: u8, blue: u8 },
    ToneOn { frequency: u16 },
    ToneOff,
    LeftLight,
    RightLight,
    Temperature,
}

impl Request {
    /// Build a motor request, clamping both wheels to the device range
    pub fn motors(left: i32, right: i32) -> Self {
        let clamp = |speed: i32| speed.clamp(-MAX_MOTOR_SPEED, MAX_MOTOR_SPEED) as i16;

        Request::Motors {
            left: clamp(left),
            right: clamp(right),
        }
    }

    /// Build an LED request, clamping each channel to `0..=255`
    pub fn led(red: i32, green: i32, blue: i32) -> Self {
        let clamp = |channel: i32| channel.clamp(0, u8::MAX.into()) as u8;

        Request::Led {
            red: clamp(red),
            green: clamp(green),
            blue: clamp(blue),
        }
    }

    pub fn tone_on(frequency: i32) -> Self {
        Request::ToneOn {
            frequency: frequency.clamp(0, u16::MAX.into()) as u16,
        }
    }

    pub const fn opcode(&self) -> u8 {
        match self {
            Request::Motors { .. } => MOTORS,
            Request::Led { .. } => LED,
            Request::ToneOn { .. } => TONE_ON,
            Request::ToneOff => TONE_OFF,
            Request::LeftLight => LEFT_LIGHT,
            Request::RightLight => RIGHT_LIGHT,
            Request::Temperature => TEMPERATURE,
        }
    }

    /// Whether the robot answers this request
    pub const fn expects_reply(&self) -> bool {
        matches!(
            self,
            Request::LeftLight | Request::RightLight | Request::Temperature
        )
    }

    /// Raw, unencoded request bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![self.opcode()];

        match *self {
            Request::Motors { left, right } => {
                bytes.extend_from_slice(&left.to_le_bytes());
                bytes.extend_from_slice(&right.to_le_bytes());
            }
            Request::Led { red, green, blue } => bytes.extend_from_slice(&[red, green, blue]),
            Request::ToneOn { frequency } => bytes.extend_from_slice(&frequency.to_le_bytes()),
            Request::ToneOff | Request::LeftLight | Request::RightLight | Request::Temperature => {}
        }

        bytes
    }
}

/// COBS encode `data` and append the frame terminator
pub fn encode_frame(data: &[u8]) -> Vec<u8> {
    let mut frame = vec![0; data.len() + data.len() / 254 + 2];

    let len = postcard_cobs::encode(data, &mut frame);
    frame.truncate(len);
    frame.push(0x00);

    frame
}

/// Read one frame and decode it in place inside `buffer`
pub fn read_frame<'buffer>(
    reader: &mut impl BufRead,
    buffer: &'buffer mut Vec<u8>,
) -> Result<&'buffer [u8], TransportError> {
    buffer.clear();

    let len = reader.read_until(0, buffer)?;

    if len == 0 {
        return Err(TransportError::SerialPortDisconnected);
    }

    // Drop the terminator, unless the frame was cut short
    let end = match buffer.last() {
        Some(0x00) => len - 1,
        _ => len,
    };
    let encoded = &mut buffer[..end];

    match postcard_cobs::decode_in_place(encoded) {
        Ok(len) => Ok(&encoded[..len]),
        Err(()) => Err(TransportError::MalformedCOBS(Box::from(&*encoded))),
    }
}

/// Split a reply into its value bytes, checking it answers `opcode`
pub fn reply_value(reply: &[u8], opcode: u8) -> Result<&[u8], ReplyError> {
    let (&got, value) = reply.split_first().ok_or(ReplyError::Empty)?;

    if got != opcode {
        return Err(ReplyError::WrongOpcode {
            expected: opcode,
            got,
        });
    }

    Ok(value)
}

pub fn light_level(value: &[u8]) -> Result<i32, ReplyError> {
    match *value {
        [level] => Ok(i32::from(level)),
        _ => Err(ReplyError::BadValueLength {
            expected: size_of::<u8>(),
            got: value.len(),
        }),
    }
}

/// Temperature is sent in hundredths of a degree Celsius
pub fn temperature(value: &[u8]) -> Result<f64, ReplyError> {
    let raw: [u8; 2] = value.try_into().map_err(|_| ReplyError::BadValueLength {
        expected: size_of::<i16>(),
        got: value.len(),
    })?;

    Ok(f64::from(i16::from_le_bytes(raw)) / 100.0)
}
