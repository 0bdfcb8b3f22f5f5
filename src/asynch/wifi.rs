use core::fmt::Debug;
use core::future::Future;

use atat::AtatCmd;
use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Instant, Timer};
use embedded_io::ReadReady;
use embedded_io_async::{Read, Write};

use crate::classifier::{Classification, ResponseWindow, WINDOW_SIZE};
use crate::commands::{RestartCommand, WifiModeCommand, COMMAND_BUFFER_SIZE};
use crate::config::Config;
use crate::request::TERMINATOR;
use crate::transport::SerialRouting;
use crate::wifi::{
    access_point_command, transport_error, CommandError, JoinError, Session, MAX_DISCARD_SIZE, READ_CHUNK_SIZE,
};

/// Async WIFI network adapter trait
pub trait WifiAdapter {
    /// Pin identifier used for routing the UART
    type Pin;

    /// Error when joining a WIFI network
    type JoinError: Debug;

    /// Restarts the modem and joins the given access point.
    /// UART gets routed to the given pins first.
    fn join(
        &self,
        tx: Self::Pin,
        rx: Self::Pin,
        ssid: &str,
        key: &str,
    ) -> impl Future<Output = Result<(), Self::JoinError>>;

    /// Returns true if the last join attempt was confirmed by the modem
    fn is_associated(&self) -> impl Future<Output = bool>;
}

/// Adapter state guarded by the mutex of [Adapter]
pub(crate) struct InnerAdapter<S> {
    /// UART connected to the modem
    pub(crate) serial: S,

    /// Network state
    pub(crate) session: Session,

    /// Timing and upload behaviour
    pub(crate) config: Config,
}

impl<S: Read + Write + ReadReady> InnerAdapter<S> {
    pub(crate) fn new(serial: S, config: Config) -> Self {
        Self {
            serial,
            session: Session::default(),
            config,
        }
    }

    pub(crate) async fn dispatch(&mut self, text: &str, settle_ms: u32) -> Result<(), CommandError> {
        trace!("Dispatching {} bytes", text.len() + TERMINATOR.len());
        self.serial.write_all(text.as_bytes()).await.map_err(transport_error)?;
        self.serial.write_all(TERMINATOR.as_bytes()).await.map_err(transport_error)?;
        self.serial.flush().await.map_err(transport_error)?;
        settle(settle_ms).await;
        Ok(())
    }

    pub(crate) async fn send_command<Cmd: AtatCmd>(&mut self, command: &Cmd, settle_ms: u32) -> Result<(), CommandError> {
        let mut buffer = [0x0; COMMAND_BUFFER_SIZE];
        let length = command.write(&mut buffer);

        trace!("Sending command of {} bytes", length);
        self.serial.write_all(&buffer[..length]).await.map_err(transport_error)?;
        self.serial.flush().await.map_err(transport_error)?;
        settle(settle_ms).await;
        Ok(())
    }

    pub(crate) async fn wait_for_response(&mut self, timeout_ms: u32) -> Result<bool, CommandError> {
        let mut window = ResponseWindow::new();
        let timeout = Duration::from_millis(u64::from(timeout_ms));
        let start = Instant::now();

        loop {
            self.poll_serial(&mut window).await?;

            match window.classify() {
                Classification::Success => return Ok(true),
                Classification::Failure => {
                    debug!("Modem responded with failure token");
                    return Ok(false);
                }
                Classification::Pending => {}
            }

            if start.elapsed() > timeout {
                warn!("No terminal token received within {} ms", timeout_ms);
                return Ok(false);
            }

            yield_now().await;
        }
    }

    pub(crate) async fn discard_pending(&mut self) -> Result<(), CommandError> {
        let mut chunk = [0x0; READ_CHUNK_SIZE];
        let mut discarded = 0;

        while discarded < MAX_DISCARD_SIZE && self.serial.read_ready().map_err(transport_error)? {
            let length = self.serial.read(&mut chunk).await.map_err(transport_error)?;
            if length == 0 {
                break;
            }
            discarded += length;
        }

        if discarded >= MAX_DISCARD_SIZE {
            warn!("Modem output still pending after discarding {} bytes", discarded);
        }
        Ok(())
    }

    async fn poll_serial(&mut self, window: &mut ResponseWindow) -> Result<(), CommandError> {
        let mut chunk = [0x0; READ_CHUNK_SIZE];
        let mut received = 0;

        while received < WINDOW_SIZE && self.serial.read_ready().map_err(transport_error)? {
            let length = self.serial.read(&mut chunk).await.map_err(transport_error)?;
            if length == 0 {
                break;
            }

            window.extend(&chunk[..length]);
            received += length;
        }

        Ok(())
    }
}

/// Pauses the current task. Zero durations return immediately.
pub(crate) async fn settle(duration_ms: u32) {
    if duration_ms > 0 {
        Timer::after(Duration::from_millis(u64::from(duration_ms))).await;
    }
}

/// Async network adapter. Operations of concurrent tasks are serialized.
pub struct Adapter<S> {
    pub(crate) inner: Mutex<CriticalSectionRawMutex, InnerAdapter<S>>,
}

impl<S: Read + Write + ReadReady> Adapter<S> {
    /// Creates a new network adapter
    pub fn new(serial: S, config: Config) -> Self {
        Self {
            inner: Mutex::new(InnerAdapter::new(serial, config)),
        }
    }

    /// Writes the given text followed by CR LF and pauses for `settle_ms`
    pub async fn dispatch(&self, text: &str, settle_ms: u32) -> Result<(), CommandError> {
        self.inner.lock().await.dispatch(text, settle_ms).await
    }

    /// Collects modem output until a terminal token is received or the timeout elapsed
    pub async fn wait_for_response(&self, timeout_ms: u32) -> Result<bool, CommandError> {
        self.inner.lock().await.wait_for_response(timeout_ms).await
    }

    /// Replaces the configuration, effective for the next operation
    pub async fn set_config(&self, config: Config) {
        self.inner.lock().await.config = config;
    }
}

impl<S> WifiAdapter for Adapter<S>
where
    S: Read + Write + ReadReady + SerialRouting,
{
    type Pin = S::Pin;
    type JoinError = JoinError;

    async fn join(&self, tx: S::Pin, rx: S::Pin, ssid: &str, key: &str) -> Result<(), JoinError> {
        let mut inner = self.inner.lock().await;
        inner.session = Session::default();
        let command = access_point_command(ssid, key)?;

        let baud_rate = inner.config.baud_rate;
        inner
            .serial
            .redirect(tx, rx, baud_rate)
            .map_err(|e| JoinError::from(transport_error(e)))?;

        let settle_ms = inner.config.command_settle_ms;
        inner.send_command(&RestartCommand, settle_ms).await?;
        inner.send_command(&WifiModeCommand::station_mode(), settle_ms).await?;

        // Responses of restart and mode command are not relevant for the join status
        inner.discard_pending().await?;
        inner.send_command(&command, 0).await?;
        let timeout_ms = inner.config.response_timeout_ms;
        inner.session.associated = inner.wait_for_response(timeout_ms).await?;
        settle(inner.config.join_settle_ms).await;

        info!("Join attempt finished, associated: {}", inner.session.associated);
        Ok(())
    }

    async fn is_associated(&self) -> bool {
        self.inner.lock().await.session.associated
    }
}
