use crate::request::{Endpoint, RequestError, Security};
use crate::responses::NoResponse;
use crate::upload::Step;
use atat::atat_derive::AtatCmd;
use atat::heapless::String;
use core::str::FromStr;

/// Max. encoded length of any command in this module, terminator included
pub(crate) const COMMAND_BUFFER_SIZE: usize = 256;

/// Buffer size configured for SSL sockets before connecting
pub(crate) const SSL_BUFFER_SIZE: usize = 4096;

/// Trait for commands issued as part of an upload
pub trait UploadCommand {
    /// Stage of the upload pipeline the command represents
    const STEP: Step;
}

/// Restarts the module
#[derive(Clone, Default, AtatCmd)]
#[at_cmd("+RST", NoResponse)]
pub struct RestartCommand;

/// Sets the WIFI mode for the current session (not stored in flash)
#[derive(Clone, Default, AtatCmd)]
#[at_cmd("+CWMODE_CUR", NoResponse)]
pub struct WifiModeCommand {
    /// WIFI mode:
    ///     1: Station mode.
    ///     2: SoftAP mode.
    ///     3: SoftAP+Station mode.
    mode: usize,
}

impl WifiModeCommand {
    pub fn station_mode() -> Self {
        Self { mode: 1 }
    }
}

/// Command for joining the target WIFI access point for the current session
#[derive(Clone, Default, AtatCmd)]
#[at_cmd("+CWJAP_CUR", NoResponse)]
pub struct AccessPointConnectCommand {
    /// The SSID of the target access point
    ssid: String<32>,

    /// The password/key of the target access point
    password: String<64>,
}

impl AccessPointConnectCommand {
    pub fn new(ssid: String<32>, password: String<64>) -> Self {
        Self { ssid, password }
    }
}

/// Sets the buffer size of the SSL socket. Needs to be sent before the connection gets established.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSSLSIZE", NoResponse)]
pub struct SslBufferSizeCommand {
    /// Buffer size in bytes, 2048 - 4096
    size: usize,
}

impl SslBufferSizeCommand {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl UploadCommand for SslBufferSizeCommand {
    const STEP: Step = Step::SslBufferSize;
}

/// Establish TCP or SSL connection in single connection mode
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSTART", NoResponse)]
pub struct ConnectCommand {
    /// Connection type, TCP or SSL
    connection_type: String<3>,

    /// Remote host name or IP address
    remote_host: String<64>,

    /// Remote port
    port: u16,
}

impl ConnectCommand {
    /// Connects to the given endpoint, SSL or plain TCP depending on its security mode
    pub fn new(endpoint: &Endpoint) -> Result<Self, RequestError> {
        let connection_type = match endpoint.security {
            Security::Tcp => "TCP",
            Security::Ssl => "SSL",
        };

        Ok(Self {
            connection_type: String::from_str(connection_type).map_err(|_| RequestError::TooLong)?,
            remote_host: String::from_str(endpoint.host).map_err(|_| RequestError::TooLong)?,
            port: endpoint.port,
        })
    }
}

impl UploadCommand for ConnectCommand {
    const STEP: Step = Step::Connect;
}

/// Announces the byte count of the next transmission
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSEND", NoResponse)]
pub struct TransmissionPrepareCommand {
    /// Length in bytes, terminator of the payload included
    length: usize,
}

impl TransmissionPrepareCommand {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl UploadCommand for TransmissionPrepareCommand {
    const STEP: Step = Step::DeclareLength;
}

/// Closes the connection in single connection mode
#[derive(Clone, Default, AtatCmd)]
#[at_cmd("+CIPCLOSE", NoResponse)]
pub struct CloseSocketCommand;

impl UploadCommand for CloseSocketCommand {
    const STEP: Step = Step::Close;
}
