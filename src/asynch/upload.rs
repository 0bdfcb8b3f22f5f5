use core::fmt::Debug;
use core::future::Future;

use atat::AtatCmd;
use embedded_io::ReadReady;
use embedded_io_async::{Read, Write};

use crate::commands::{
    CloseSocketCommand, ConnectCommand, SslBufferSizeCommand, TransmissionPrepareCommand, UploadCommand,
    SSL_BUFFER_SIZE,
};
use crate::request::UploadRequest;
use crate::upload::{Step, UploadError, UploadReport};
use crate::wifi::CommandError;

use super::wifi::{Adapter, InnerAdapter};

/// Uploads to the supported cloud services
pub trait CloudUploader {
    type Error: Debug;

    /// Executes the upload of an arbitrary composed request
    fn upload(&self, request: &UploadRequest) -> impl Future<Output = Result<UploadReport, Self::Error>>;

    /// Updates up to eight fields of a metrics channel
    fn upload_metrics(&self, api_key: &str, fields: &[f64]) -> impl Future<Output = Result<UploadReport, Self::Error>>;

    /// Triggers a webhook event with up to three values
    fn trigger_webhook(
        &self,
        api_key: &str,
        event: &str,
        values: &[f64],
    ) -> impl Future<Output = Result<UploadReport, Self::Error>>;

    /// Submits a form with two (entry ID, value) pairs
    fn submit_form(
        &self,
        api_key: &str,
        entries: [(&str, &str); 2],
    ) -> impl Future<Output = Result<UploadReport, Self::Error>>;
}

impl<S: Read + Write + ReadReady> CloudUploader for Adapter<S> {
    type Error = UploadError;

    async fn upload(&self, request: &UploadRequest) -> Result<UploadReport, UploadError> {
        self.inner.lock().await.upload(request).await
    }

    async fn upload_metrics(&self, api_key: &str, fields: &[f64]) -> Result<UploadReport, UploadError> {
        self.upload(&UploadRequest::metrics(api_key, fields)?).await
    }

    async fn trigger_webhook(&self, api_key: &str, event: &str, values: &[f64]) -> Result<UploadReport, UploadError> {
        self.upload(&UploadRequest::webhook(api_key, event, values)?).await
    }

    async fn submit_form(&self, api_key: &str, entries: [(&str, &str); 2]) -> Result<UploadReport, UploadError> {
        self.upload(&UploadRequest::form(api_key, entries)?).await
    }
}

impl<S: Read + Write + ReadReady> InnerAdapter<S> {
    async fn upload(&mut self, request: &UploadRequest) -> Result<UploadReport, UploadError> {
        let connect = ConnectCommand::new(request.endpoint())?;
        let policy = self.config.policy;
        let settle = self.config.command_settle_ms;
        let mut report = UploadReport::default();

        if request.requires_ssl_buffer() {
            let accepted = self.transmit(SslBufferSizeCommand::new(SSL_BUFFER_SIZE), settle).await?;
            report.record(SslBufferSizeCommand::STEP, accepted, policy)?;
        }

        let accepted = self.transmit(connect, self.config.connect_settle_ms).await?;
        report.record(ConnectCommand::STEP, accepted, policy)?;

        let accepted = self
            .transmit(TransmissionPrepareCommand::new(request.send_length()), settle)
            .await?;
        report.record(TransmissionPrepareCommand::STEP, accepted, policy)?;

        self.discard_pending().await?;
        self.dispatch(request.text(), settle).await?;
        let accepted = self.wait_for_response(self.config.response_timeout_ms).await?;
        report.record(Step::Payload, accepted, policy)?;

        if request.closes_socket() {
            let accepted = self.transmit(CloseSocketCommand, settle).await?;
            report.record(CloseSocketCommand::STEP, accepted, policy)?;
        }

        Ok(report)
    }

    async fn transmit<Cmd: AtatCmd + UploadCommand>(&mut self, command: Cmd, settle_ms: u32) -> Result<bool, CommandError> {
        self.discard_pending().await?;
        self.send_command(&command, settle_ms).await?;
        self.wait_for_response(self.config.response_timeout_ms).await
    }
}
