//! Serial link to the robot
//!
//! [`SerialRobot`] implements [`Robot`] over any byte stream, normally a
//! serial port opened with [`SerialRobot::connect`]. Requests and replies use
//! the COBS framed format described in [`protocol`].

use std::{
    io::{self, BufRead, BufReader, Read, Write},
    thread,
    time::Duration,
};

use finch_core::{Robot, RobotError};
use serialport::{ClearBuffer, SerialPort};
use tracing::{debug, info, trace, warn};

mod error;
pub mod protocol;

pub use error::{ReplyError, TransportError};

use self::protocol::{encode_frame, read_frame, reply_value, Request};

/// Names of the serial ports present on this machine
pub fn available_ports() -> Result<Vec<String>, RobotError> {
    let ports = serialport::available_ports().map_err(std::io::Error::from)?;

    Ok(ports.into_iter().map(|port| port.port_name).collect())
}

/// Byte streams that can throw away input that has arrived but not been read
pub trait DiscardInput {
    fn discard_input(&mut self) -> io::Result<()>;
}

impl DiscardInput for Box<dyn SerialPort> {
    fn discard_input(&mut self) -> io::Result<()> {
        Ok(self.clear(ClearBuffer::Input)?)
    }
}

pub struct SerialRobot<P = Box<dyn SerialPort>> {
    port_name: String,
    reader: BufReader<P>,
    packet_buffer: Vec<u8>,
    /// A reply timed out and may still turn up ahead of the next one
    stale_input: bool,
}

impl SerialRobot {
    /// Open `port_name`; reads give up after `timeout`
    pub fn connect(port_name: &str, baud_rate: u32, timeout: Duration) -> Result<Self, RobotError> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|e| {
                warn!(%port_name, error = %e, "failed to open serial port");
                std::io::Error::from(e)
            })?;

        info!(%port_name, baud_rate, "serial port connected");

        Ok(Self::from_port(port_name, port))
    }
}

impl<P: Read + Write + DiscardInput> SerialRobot<P> {
    /// Wrap an already open byte stream
    pub fn from_port(port_name: impl Into<String>, port: P) -> Self {
        Self {
            port_name: port_name.into(),
            reader: BufReader::new(port),
            packet_buffer: Vec::new(),
            stale_input: false,
        }
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Give back the underlying stream
    pub fn into_inner(self) -> P {
        self.reader.into_inner()
    }

    fn send(&mut self, request: Request) -> Result<(), TransportError> {
        trace!(?request, "sending request");

        let frame = encode_frame(&request.to_bytes());

        let port = self.reader.get_mut();
        port.write_all(&frame)?;
        port.flush()?;

        Ok(())
    }

    /// Drop buffered bytes and whatever the port has received since
    fn discard_input(&mut self) -> Result<(), TransportError> {
        let buffered = self.reader.buffer().len();
        self.reader.consume(buffered);
        self.reader.get_mut().discard_input()?;

        debug!(buffered, "discarded stale input");

        Ok(())
    }

    fn query(&mut self, request: Request) -> Result<&[u8], ReplyError> {
        debug_assert!(request.expects_reply());

        if self.stale_input {
            self.discard_input()?;
            self.stale_input = false;
        }

        self.send(request)?;

        let reply = read_frame(&mut self.reader, &mut self.packet_buffer);

        if matches!(reply, Err(TransportError::TimedOut)) {
            warn!(?request, "reply timed out");
            self.stale_input = true;
        }

        reply_value(reply?, request.opcode())
    }
}

impl<P: Read + Write + DiscardInput> Robot for SerialRobot<P> {
    fn set_motors(&mut self, left: i32, right: i32) -> Result<(), RobotError> {
        Ok(self.send(Request::motors(left, right))?)
    }

    fn set_led(&mut self, red: i32, green: i32, blue: i32) -> Result<(), RobotError> {
        Ok(self.send(Request::led(red, green, blue))?)
    }

    fn tone_on(&mut self, frequency: i32) -> Result<(), RobotError> {
        Ok(self.send(Request::tone_on(frequency))?)
    }

    fn tone_off(&mut self) -> Result<(), RobotError> {
        Ok(self.send(Request::ToneOff)?)
    }

    fn wait(&mut self, ms: u32) -> Result<(), RobotError> {
        thread::sleep(Duration::from_millis(ms.into()));
        Ok(())
    }

    fn read_left_light(&mut self) -> Result<i32, RobotError> {
        let value = self.query(Request::LeftLight)?;
        Ok(protocol::light_level(value)?)
    }

    fn read_right_light(&mut self) -> Result<i32, RobotError> {
        let value = self.query(Request::RightLight)?;
        Ok(protocol::light_level(value)?)
    }

    fn read_temperature(&mut self) -> Result<f64, RobotError> {
        let value = self.query(Request::Temperature)?;
        let celsius = protocol::temperature(value)?;

        debug!(celsius, "temperature read");

        Ok(celsius)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        io::{self, Cursor},
    };

    use super::*;
    use crate::protocol::{LEFT_LIGHT, TEMPERATURE};

    /// Replies are served from `input`, requests pile up in `output`
    struct Loopback {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl Loopback {
        fn replying(frames: &[&[u8]]) -> Self {
            Self {
                input: Cursor::new(frames.iter().flat_map(|f| encode_frame(f)).collect()),
                output: Vec::new(),
            }
        }
    }

    impl Read for Loopback {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for Loopback {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl DiscardInput for Loopback {
        fn discard_input(&mut self) -> io::Result<()> {
            self.input.set_position(self.input.get_ref().len() as u64);
            Ok(())
        }
    }

    /// How the robot answers one request
    enum Answer {
        OnTime(&'static [u8]),
        /// Arrives only after the read has already timed out
        Late(&'static [u8]),
    }

    /// Port whose replies are released as requests are flushed
    struct LaggingPort {
        answers: VecDeque<Answer>,
        arrived: VecDeque<u8>,
        late: Option<&'static [u8]>,
    }

    impl LaggingPort {
        fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                arrived: VecDeque::new(),
                late: None,
            }
        }
    }

    impl Read for LaggingPort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.arrived.is_empty() {
                if let Some(frame) = self.late.take() {
                    self.arrived.extend(encode_frame(frame));
                    return Err(io::ErrorKind::TimedOut.into());
                }
            }

            self.arrived.read(buf)
        }
    }

    impl Write for LaggingPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            match self.answers.pop_front() {
                Some(Answer::OnTime(frame)) => self.arrived.extend(encode_frame(frame)),
                Some(Answer::Late(frame)) => self.late = Some(frame),
                None => {}
            }
            Ok(())
        }
    }

    impl DiscardInput for LaggingPort {
        fn discard_input(&mut self) -> io::Result<()> {
            self.arrived.clear();
            Ok(())
        }
    }

    fn decoded_requests(output: &[u8]) -> Vec<Vec<u8>> {
        let mut reader = Cursor::new(output);
        let mut buffer = Vec::new();
        let mut requests = Vec::new();

        while let Ok(frame) = read_frame(&mut reader, &mut buffer) {
            requests.push(frame.to_vec());
        }

        requests
    }

    #[test]
    fn test_actuator_requests_are_framed() {
        let mut robot = SerialRobot::from_port("loopback", Loopback::replying(&[]));

        robot.set_motors(100, -100).unwrap();
        robot.set_led(0, 0, 0).unwrap();
        robot.tone_off().unwrap();

        let requests = decoded_requests(&robot.into_inner().output);
        assert_eq!(
            requests,
            [
                Request::motors(100, -100).to_bytes(),
                Request::led(0, 0, 0).to_bytes(),
                Request::ToneOff.to_bytes(),
            ]
        );
    }

    #[test]
    fn test_sensor_replies() {
        let mut robot = SerialRobot::from_port(
            "loopback",
            Loopback::replying(&[&[LEFT_LIGHT, 42], &[TEMPERATURE, 0xD0, 0x07]]),
        );

        assert_eq!(robot.read_left_light().unwrap(), 42);
        assert_eq!(robot.read_temperature().unwrap(), 20.0);
    }

    #[test]
    fn test_mismatched_reply_is_a_protocol_error() {
        let mut robot =
            SerialRobot::from_port("loopback", Loopback::replying(&[&[TEMPERATURE, 0, 0]]));

        assert!(matches!(
            robot.read_right_light(),
            Err(RobotError::Protocol(_))
        ));
    }

    #[test]
    fn test_late_reply_is_not_taken_for_the_next_one() {
        let mut robot = SerialRobot::from_port(
            "lagging",
            LaggingPort::new([
                Answer::Late(&[LEFT_LIGHT, 11]),
                Answer::OnTime(&[LEFT_LIGHT, 22]),
                Answer::OnTime(&[LEFT_LIGHT, 33]),
            ]),
        );

        assert!(matches!(robot.read_left_light(), Err(RobotError::TimedOut)));
        assert_eq!(robot.read_left_light().unwrap(), 22);
        assert_eq!(robot.read_left_light().unwrap(), 33);
    }

    #[test]
    fn test_silent_robot_is_disconnected() {
        let mut robot = SerialRobot::from_port("loopback", Loopback::replying(&[]));

        assert!(matches!(
            robot.read_left_light(),
            Err(RobotError::Disconnected)
        ));
    }
}
