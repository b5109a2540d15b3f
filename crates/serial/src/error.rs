use std::io;

use finch_core::RobotError;

#[derive(Debug)]
pub enum TransportError {
    TimedOut,
    SerialPortDisconnected,
    MalformedCOBS(Box<[u8]>),
    Io(io::Error),
}

impl From<io::Error> for TransportError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::TimedOut => TransportError::TimedOut,
            io::ErrorKind::PermissionDenied
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected
            | io::ErrorKind::UnexpectedEof => TransportError::SerialPortDisconnected,
            _ => TransportError::Io(error),
        }
    }
}

#[derive(Debug)]
pub enum ReplyError {
    Empty,
    WrongOpcode { expected: u8, got: u8 },
    BadValueLength { expected: usize, got: usize },
    Transport(TransportError),
}

impl From<TransportError> for ReplyError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<io::Error> for ReplyError {
    fn from(error: io::Error) -> Self {
        Self::Transport(error.into())
    }
}

impl From<TransportError> for RobotError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::TimedOut => RobotError::TimedOut,
            TransportError::SerialPortDisconnected => RobotError::Disconnected,
            TransportError::MalformedCOBS(data) => {
                RobotError::Protocol(format!("malformed COBS frame {data:02x?}"))
            }
            TransportError::Io(error) => RobotError::Io(error),
        }
    }
}

impl From<ReplyError> for RobotError {
    fn from(error: ReplyError) -> Self {
        match error {
            ReplyError::Empty => RobotError::Protocol("empty reply".into()),
            ReplyError::WrongOpcode { expected, got } => RobotError::Protocol(format!(
                "expected reply to {expected:#04x}, got {got:#04x}"
            )),
            ReplyError::BadValueLength { expected, got } => RobotError::Protocol(format!(
                "expected a {expected} byte value, got {got} bytes"
            )),
            ReplyError::Transport(error) => error.into(),
        }
    }
}
