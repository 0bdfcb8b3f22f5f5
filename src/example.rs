//! Doubles for doc examples
use crate::transport::SerialRouting;
use embedded_io::{ErrorKind, ErrorType, Read, ReadReady, Write};
use fugit::{TimerDurationU32, TimerInstantU32};
use fugit_timer::Timer;
use heapless::Deque;

/// UART double confirming every command with `OK`
#[derive(Default)]
pub struct ExampleSerial {
    /// Pending modem output
    rx: Deque<u8, 64>,

    /// True if data was written since the last flush
    written: bool,
}

impl ErrorType for ExampleSerial {
    type Error = ErrorKind;
}

impl Write for ExampleSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.written = true;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.written {
            self.written = false;
            for byte in b"\r\nOK\r\n" {
                self.rx.push_back(*byte).map_err(|_| ErrorKind::OutOfMemory)?;
            }
        }

        Ok(())
    }
}

impl Read for ExampleSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut length = 0;

        while length < buf.len() {
            match self.rx.pop_front() {
                Some(byte) => buf[length] = byte,
                None => break,
            }
            length += 1;
        }

        Ok(length)
    }
}

impl ReadReady for ExampleSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.rx.is_empty())
    }
}

impl SerialRouting for ExampleSerial {
    type Pin = u8;

    fn redirect(&mut self, _tx: u8, _rx: u8, _baud_rate: u32) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Timer double, every duration elapses immediately
#[derive(Default)]
pub struct ExampleTimer {}

impl Timer<1_000> for ExampleTimer {
    type Error = u32;

    fn now(&mut self) -> TimerInstantU32<1_000> {
        TimerInstantU32::from_ticks(0)
    }

    fn start(&mut self, _duration: TimerDurationU32<1_000>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn wait(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}
