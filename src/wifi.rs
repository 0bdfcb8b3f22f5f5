//! # WIFI access point client
//!
//! Commands are written to the UART and answered by the modem with textual status tokens, which
//! get classified by [ResponseWindow]. Joining a network is supported, the outcome of the last
//! join attempt is kept by the adapter and queried by [is_associated()](WifiAdapter::is_associated).
//!
//! Note: A failed association is not an error. The join status needs to be queried.
//!
//! ## Example
//!
//! ````
//! # use esp_at_telemetry::config::Config;
//! # use esp_at_telemetry::example::{ExampleSerial, ExampleTimer};
//! # use esp_at_telemetry::wifi::{Adapter, WifiAdapter};
//! #
//! let serial = ExampleSerial::default();
//! let mut adapter: Adapter<_, _, 1_000> = Adapter::new(serial, ExampleTimer::default(), Config::default());
//!
//! // Modem transmits on pin 13 and receives on pin 14
//! adapter.join(13, 14, "test_wifi", "secret").unwrap();
//! assert!(adapter.is_associated());
//! ````
use crate::classifier::{Classification, ResponseWindow, WINDOW_SIZE};
use crate::commands::{AccessPointConnectCommand, RestartCommand, WifiModeCommand, COMMAND_BUFFER_SIZE};
use crate::config::Config;
use crate::request::TERMINATOR;
use crate::transport::SerialRouting;
use atat::heapless::String;
use atat::AtatCmd;
use core::fmt::Debug;
use core::str::FromStr;
use embedded_io::{ErrorKind, Read, ReadReady, Write};
use fugit::TimerDurationU32;
use fugit_timer::Timer;

/// Max. bytes read from the UART at once
pub(crate) const READ_CHUNK_SIZE: usize = 32;

/// Max. bytes of stale modem output dropped before a command, bounds the drain on endless output
pub(crate) const MAX_DISCARD_SIZE: usize = 1_024;

/// Max. SSID length in bytes
pub(crate) const MAX_SSID_LENGTH: usize = 32;

/// Max. password length in bytes
pub(crate) const MAX_PASSWORD_LENGTH: usize = 64;

/// Wifi network adapter trait
pub trait WifiAdapter {
    /// Pin identifier used for routing the UART
    type Pin;

    /// Error when joining a WIFI network
    type JoinError: Debug;

    /// Restarts the modem and joins the given access point.
    /// UART gets routed to the given pins first.
    fn join(&mut self, tx: Self::Pin, rx: Self::Pin, ssid: &str, key: &str) -> Result<(), Self::JoinError>;

    /// Returns true if the last join attempt was confirmed by the modem
    fn is_associated(&self) -> bool;
}

/// Central client for network communication
///
/// TIMER_HZ: Frequency of the timer used for settle delays and response timeouts
pub struct Adapter<S, T: Timer<TIMER_HZ>, const TIMER_HZ: u32> {
    /// UART connected to the modem
    pub(crate) serial: S,

    /// Timer used for delays and timeout measurement
    pub(crate) timer: T,

    /// Timing and upload behaviour
    pub(crate) config: Config,

    /// Network state
    pub(crate) session: Session,
}

/// State kept across operations of one adapter
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Session {
    /// True if the last join command was confirmed
    pub(crate) associated: bool,
}

/// Errors of a single command transaction
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Reading from or writing to the UART failed
    Transport(ErrorKind),

    /// Upstream timer error
    TimerError,
}

/// Possible errors when joining an access point
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JoinError {
    /// Given SSD is longer then the max. size of 32 chars
    InvalidSsidLength,

    /// Given password is longer then the max. size of 64 chars
    InvalidPasswordLength,

    /// Reading from, writing to or routing the UART failed
    Transport(ErrorKind),

    /// Upstream timer error
    TimerError,
}

impl From<CommandError> for JoinError {
    fn from(error: CommandError) -> Self {
        match error {
            CommandError::Transport(kind) => Self::Transport(kind),
            CommandError::TimerError => Self::TimerError,
        }
    }
}

/// Maps any UART error to its kind
pub(crate) fn transport_error<E: embedded_io::Error>(error: E) -> CommandError {
    CommandError::Transport(error.kind())
}

/// Builds the join command, checking the credential lengths
pub(crate) fn access_point_command(ssid: &str, key: &str) -> Result<AccessPointConnectCommand, JoinError> {
    if ssid.len() > MAX_SSID_LENGTH {
        return Err(JoinError::InvalidSsidLength);
    }

    if key.len() > MAX_PASSWORD_LENGTH {
        return Err(JoinError::InvalidPasswordLength);
    }

    let ssid = String::from_str(ssid).map_err(|_| JoinError::InvalidSsidLength)?;
    let key = String::from_str(key).map_err(|_| JoinError::InvalidPasswordLength)?;
    Ok(AccessPointConnectCommand::new(ssid, key))
}

impl<S, T, const TIMER_HZ: u32> WifiAdapter for Adapter<S, T, TIMER_HZ>
where
    S: Read + Write + ReadReady + SerialRouting,
    T: Timer<TIMER_HZ>,
{
    type Pin = S::Pin;
    type JoinError = JoinError;

    /// Restarts the modem, switches to station mode and joins the access point.
    ///
    /// The association state is reset first and just set if the join command was confirmed
    /// within the response timeout.
    fn join(&mut self, tx: S::Pin, rx: S::Pin, ssid: &str, key: &str) -> Result<(), JoinError> {
        self.session = Session::default();
        let command = access_point_command(ssid, key)?;

        self.serial
            .redirect(tx, rx, self.config.baud_rate)
            .map_err(|e| JoinError::from(transport_error(e)))?;

        let settle = self.config.command_settle_ms;
        self.send_command(&RestartCommand, settle)?;
        self.send_command(&WifiModeCommand::station_mode(), settle)?;

        // Responses of restart and mode command are not relevant for the join status
        self.discard_pending()?;
        self.send_command(&command, 0)?;
        self.session.associated = self.wait_for_response(self.config.response_timeout_ms)?;
        self.settle(self.config.join_settle_ms)?;

        info!("Join attempt finished, associated: {}", self.session.associated);
        Ok(())
    }

    fn is_associated(&self) -> bool {
        self.session.associated
    }
}

impl<S, T, const TIMER_HZ: u32> Adapter<S, T, TIMER_HZ>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
{
    /// Creates a new network adapter
    pub fn new(serial: S, timer: T, config: Config) -> Self {
        Self {
            serial,
            timer,
            config,
            session: Session::default(),
        }
    }

    /// Writes the given text followed by CR LF and pauses for `settle_ms`
    pub fn dispatch(&mut self, text: &str, settle_ms: u32) -> Result<(), CommandError> {
        trace!("Dispatching {} bytes", text.len() + TERMINATOR.len());
        self.serial.write_all(text.as_bytes()).map_err(transport_error)?;
        self.serial.write_all(TERMINATOR.as_bytes()).map_err(transport_error)?;
        self.serial.flush().map_err(transport_error)?;
        self.settle(settle_ms)
    }

    /// Collects modem output until a terminal token is received or the timeout elapsed.
    ///
    /// Returns true on success tokens, false on failure tokens or timeout.
    pub fn wait_for_response(&mut self, timeout_ms: u32) -> Result<bool, CommandError> {
        let mut window = ResponseWindow::new();
        self.timer
            .start(TimerDurationU32::millis(timeout_ms))
            .map_err(|_| CommandError::TimerError)?;

        loop {
            self.poll_serial(&mut window)?;

            match window.classify() {
                Classification::Success => return Ok(true),
                Classification::Failure => {
                    debug!("Modem responded with failure token");
                    return Ok(false);
                }
                Classification::Pending => {}
            }

            match self.timer.wait() {
                Ok(_) => {
                    warn!("No terminal token received within {} ms", timeout_ms);
                    return Ok(false);
                }
                Err(error) => match error {
                    nb::Error::Other(_) => return Err(CommandError::TimerError),
                    nb::Error::WouldBlock => {}
                },
            }
        }
    }

    /// Returns the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the configuration, effective for the next operation
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Encodes and writes a command and pauses for `settle_ms`
    pub(crate) fn send_command<Cmd: AtatCmd>(&mut self, command: &Cmd, settle_ms: u32) -> Result<(), CommandError> {
        let mut buffer = [0x0; COMMAND_BUFFER_SIZE];
        let length = command.write(&mut buffer);

        trace!("Sending command of {} bytes", length);
        self.serial.write_all(&buffer[..length]).map_err(transport_error)?;
        self.serial.flush().map_err(transport_error)?;
        self.settle(settle_ms)
    }

    /// Drops pending modem output (max. [MAX_DISCARD_SIZE] bytes), so stale tokens are not taken as
    /// response of the next command
    pub(crate) fn discard_pending(&mut self) -> Result<(), CommandError> {
        let mut chunk = [0x0; READ_CHUNK_SIZE];
        let mut discarded = 0;

        while discarded < MAX_DISCARD_SIZE && self.serial.read_ready().map_err(transport_error)? {
            let length = self.serial.read(&mut chunk).map_err(transport_error)?;
            if length == 0 {
                break;
            }
            discarded += length;
        }

        if discarded >= MAX_DISCARD_SIZE {
            warn!("Modem output still pending after discarding {} bytes", discarded);
        } else if discarded > 0 {
            trace!("Discarded {} bytes of stale modem output", discarded);
        }
        Ok(())
    }

    /// Blocks for the given duration. No timer is used for zero durations.
    pub(crate) fn settle(&mut self, duration_ms: u32) -> Result<(), CommandError> {
        if duration_ms == 0 {
            return Ok(());
        }

        self.timer
            .start(TimerDurationU32::millis(duration_ms))
            .map_err(|_| CommandError::TimerError)?;
        nb::block!(self.timer.wait()).map_err(|_| CommandError::TimerError)
    }

    /// Appends the currently available modem output to the window, max. [WINDOW_SIZE] bytes per call
    fn poll_serial(&mut self, window: &mut ResponseWindow) -> Result<(), CommandError> {
        let mut chunk = [0x0; READ_CHUNK_SIZE];
        let mut received = 0;

        while received < WINDOW_SIZE && self.serial.read_ready().map_err(transport_error)? {
            let length = self.serial.read(&mut chunk).map_err(transport_error)?;
            if length == 0 {
                break;
            }

            window.extend(&chunk[..length]);
            received += length;
        }

        Ok(())
    }
}
