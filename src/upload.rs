//! # Cloud uploads
//!
//! Every upload opens a socket in single connection mode, declares the request length, transmits
//! the request text and optionally closes the socket. Responses of the remote service are not
//! read. Each step is classified by the modem response and reported by [UploadReport].
//!
//! Whether a rejected step stops the upload is defined by [SequencePolicy].
//!
//! ## Example
//!
//! ````
//! # use esp_at_telemetry::config::Config;
//! # use esp_at_telemetry::example::{ExampleSerial, ExampleTimer};
//! # use esp_at_telemetry::upload::{CloudUploader, Step};
//! # use esp_at_telemetry::wifi::Adapter;
//! #
//! let serial = ExampleSerial::default();
//! let mut adapter: Adapter<_, _, 1_000> = Adapter::new(serial, ExampleTimer::default(), Config::default());
//!
//! let report = adapter.upload_metrics("KEY1", &[21.5, 40.0]).unwrap();
//! assert!(report.is_confirmed());
//! assert_eq!(Some(true), report.outcome(Step::Payload));
//! ````
use crate::commands::{
    CloseSocketCommand, ConnectCommand, SslBufferSizeCommand, TransmissionPrepareCommand, UploadCommand,
    SSL_BUFFER_SIZE,
};
use crate::config::SequencePolicy;
use crate::request::{RequestError, UploadRequest};
use crate::wifi::{Adapter, CommandError};
use atat::AtatCmd;
use core::fmt::Debug;
use embedded_io::{ErrorKind, Read, ReadReady, Write};
use fugit_timer::Timer;
use heapless::Vec;

/// Max. number of steps of a single upload
pub(crate) const MAX_STEPS: usize = 5;

/// Stage of the upload pipeline
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Configuring the SSL buffer size (SSL endpoints only)
    SslBufferSize,
    /// Opening the TCP/SSL socket
    Connect,
    /// Announcing the byte count of the request
    DeclareLength,
    /// Transmitting the request text
    Payload,
    /// Closing the socket
    Close,
}

/// Outcome of each executed step in execution order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadReport {
    outcomes: Vec<(Step, bool), MAX_STEPS>,
}

impl UploadReport {
    /// Returns all executed steps and whether they were confirmed by the modem
    pub fn outcomes(&self) -> &[(Step, bool)] {
        self.outcomes.as_slice()
    }

    /// Returns the outcome of the given step or None if the step was not executed
    pub fn outcome(&self, step: Step) -> Option<bool> {
        self.outcomes
            .iter()
            .find(|(executed, _)| *executed == step)
            .map(|(_, accepted)| *accepted)
    }

    /// Returns the first step not confirmed by the modem
    pub fn first_failure(&self) -> Option<Step> {
        self.outcomes
            .iter()
            .find(|(_, accepted)| !accepted)
            .map(|(step, _)| *step)
    }

    /// True if steps were executed and all of them got confirmed
    pub fn is_confirmed(&self) -> bool {
        !self.outcomes.is_empty() && self.first_failure().is_none()
    }

    /// Stores the outcome of a step and applies the policy
    pub(crate) fn record(&mut self, step: Step, accepted: bool, policy: SequencePolicy) -> Result<(), UploadError> {
        let recorded = self.outcomes.push((step, accepted)).is_ok();
        debug_assert!(recorded, "Upload report capacity exceeded");
        if !recorded {
            error!("Outcome of upload step {:?} dropped, report is full", step);
        }

        if accepted {
            debug!("Upload step {:?} confirmed", step);
            return Ok(());
        }

        warn!("Upload step {:?} was not confirmed", step);
        match policy {
            SequencePolicy::BestEffort => Ok(()),
            SequencePolicy::AbortOnFailure => Err(UploadError::StepFailed(step)),
        }
    }
}

/// Errors when uploading
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UploadError {
    /// Request could not be composed
    Request(RequestError),

    /// Step was rejected or timed out, just returned for [SequencePolicy::AbortOnFailure]
    StepFailed(Step),

    /// Reading from or writing to the UART failed
    Transport(ErrorKind),

    /// Upstream timer error
    TimerError,
}

impl From<CommandError> for UploadError {
    fn from(error: CommandError) -> Self {
        match error {
            CommandError::Transport(kind) => Self::Transport(kind),
            CommandError::TimerError => Self::TimerError,
        }
    }
}

impl From<RequestError> for UploadError {
    fn from(error: RequestError) -> Self {
        Self::Request(error)
    }
}

/// Uploads to the supported cloud services
pub trait CloudUploader {
    type Error: Debug;

    /// Executes the upload of an arbitrary composed request
    fn upload(&mut self, request: &UploadRequest) -> Result<UploadReport, Self::Error>;

    /// Updates up to eight fields of a metrics channel
    fn upload_metrics(&mut self, api_key: &str, fields: &[f64]) -> Result<UploadReport, Self::Error>;

    /// Triggers a webhook event with up to three values
    fn trigger_webhook(&mut self, api_key: &str, event: &str, values: &[f64]) -> Result<UploadReport, Self::Error>;

    /// Submits a form with two (entry ID, value) pairs
    fn submit_form(&mut self, api_key: &str, entries: [(&str, &str); 2]) -> Result<UploadReport, Self::Error>;
}

impl<S, T, const TIMER_HZ: u32> CloudUploader for Adapter<S, T, TIMER_HZ>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
{
    type Error = UploadError;

    fn upload(&mut self, request: &UploadRequest) -> Result<UploadReport, UploadError> {
        let connect = ConnectCommand::new(request.endpoint())?;
        let policy = self.config.policy;
        let settle = self.config.command_settle_ms;
        let mut report = UploadReport::default();

        if request.requires_ssl_buffer() {
            let accepted = self.transmit(SslBufferSizeCommand::new(SSL_BUFFER_SIZE), settle)?;
            report.record(SslBufferSizeCommand::STEP, accepted, policy)?;
        }

        let accepted = self.transmit(connect, self.config.connect_settle_ms)?;
        report.record(ConnectCommand::STEP, accepted, policy)?;

        let accepted = self.transmit(TransmissionPrepareCommand::new(request.send_length()), settle)?;
        report.record(TransmissionPrepareCommand::STEP, accepted, policy)?;

        self.discard_pending()?;
        self.dispatch(request.text(), settle)?;
        let accepted = self.wait_for_response(self.config.response_timeout_ms)?;
        report.record(Step::Payload, accepted, policy)?;

        if request.closes_socket() {
            let accepted = self.transmit(CloseSocketCommand, settle)?;
            report.record(CloseSocketCommand::STEP, accepted, policy)?;
        }

        Ok(report)
    }

    fn upload_metrics(&mut self, api_key: &str, fields: &[f64]) -> Result<UploadReport, UploadError> {
        self.upload(&UploadRequest::metrics(api_key, fields)?)
    }

    fn trigger_webhook(&mut self, api_key: &str, event: &str, values: &[f64]) -> Result<UploadReport, UploadError> {
        self.upload(&UploadRequest::webhook(api_key, event, values)?)
    }

    fn submit_form(&mut self, api_key: &str, entries: [(&str, &str); 2]) -> Result<UploadReport, UploadError> {
        self.upload(&UploadRequest::form(api_key, entries)?)
    }
}

impl<S, T, const TIMER_HZ: u32> Adapter<S, T, TIMER_HZ>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
{
    /// Sends an upload command and returns true if it was confirmed
    fn transmit<Cmd: AtatCmd + UploadCommand>(&mut self, command: Cmd, settle_ms: u32) -> Result<bool, CommandError> {
        self.discard_pending()?;
        self.send_command(&command, settle_ms)?;
        self.wait_for_response(self.config.response_timeout_ms)
    }
}
