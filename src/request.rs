//! # HTTP request composition
//!
//! Requests are written as raw text and transmitted through the socket of the modem. Parameter
//! names and their order are part of the contract with the remote services and must not change.
//!
//! Values are inserted as given, no URL encoding is applied.
use core::fmt::Write;
use heapless::String;

/// Max. length of request text in bytes
pub const REQUEST_CAPACITY: usize = 512;

/// Line terminator appended to every transmission
pub const TERMINATOR: &str = "\r\n";

/// Max. number of fields accepted by the metrics channel
pub const MAX_METRIC_FIELDS: usize = 8;

/// Max. number of values accepted by the webhook service
pub const MAX_WEBHOOK_VALUES: usize = 3;

/// Metrics collector (ThingSpeak channel update)
pub const METRICS_ENDPOINT: Endpoint = Endpoint::new("api.thingspeak.com", 80, Security::Tcp);

/// Webhook trigger service (IFTTT maker)
pub const WEBHOOK_ENDPOINT: Endpoint = Endpoint::new("maker.ifttt.com", 80, Security::Tcp);

/// Forms backend (Google Forms)
pub const FORMS_ENDPOINT: Endpoint = Endpoint::new("docs.google.com", 443, Security::Ssl);

/// Transport security of the socket
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Security {
    /// Plain TCP
    Tcp,
    /// TLS, handled by the SSL socket mode of the modem
    Ssl,
}

/// Remote socket address of a service
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Endpoint {
    /// Host name, resolved by the modem
    pub host: &'static str,

    pub port: u16,

    pub security: Security,
}

impl Endpoint {
    pub const fn new(host: &'static str, port: u16, security: Security) -> Self {
        Self { host, port, security }
    }
}

/// Errors while composing a request
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    /// Request text or host name exceeds the buffer capacity
    TooLong,

    /// More values given than the service accepts
    TooManyValues,
}

impl From<core::fmt::Error> for RequestError {
    fn from(_: core::fmt::Error) -> Self {
        Self::TooLong
    }
}

/// A composed request together with its target
#[derive(Clone, Debug)]
pub struct UploadRequest {
    endpoint: Endpoint,

    text: String<REQUEST_CAPACITY>,

    /// True if socket gets closed after the transmission
    close: bool,
}

impl UploadRequest {
    /// Channel update of the metrics collector
    ///
    /// `GET /update?key=K&field1=V1...&fieldN=VN`
    pub fn metrics(api_key: &str, fields: &[f64]) -> Result<Self, RequestError> {
        if fields.len() > MAX_METRIC_FIELDS {
            return Err(RequestError::TooManyValues);
        }

        let mut text = String::new();
        write!(text, "GET /update?key={}", api_key)?;

        for (index, value) in fields.iter().enumerate() {
            write!(text, "&field{}={}", index + 1, value)?;
        }

        Ok(Self {
            endpoint: METRICS_ENDPOINT,
            text,
            close: false,
        })
    }

    /// Event trigger of the webhook service
    ///
    /// `GET /trigger/{event}/with/key/{key}?value1=V1...&valueN=VN`
    pub fn webhook(api_key: &str, event: &str, values: &[f64]) -> Result<Self, RequestError> {
        if values.len() > MAX_WEBHOOK_VALUES {
            return Err(RequestError::TooManyValues);
        }

        let mut text = String::new();
        write!(text, "GET /trigger/{}/with/key/{}", event, api_key)?;

        for (index, value) in values.iter().enumerate() {
            let separator = if index == 0 { '?' } else { '&' };
            write!(text, "{}value{}={}", separator, index + 1, value)?;
        }

        Ok(Self {
            endpoint: WEBHOOK_ENDPOINT,
            text,
            close: true,
        })
    }

    /// Form submission with two (entry ID, value) pairs
    pub fn form(api_key: &str, entries: [(&str, &str); 2]) -> Result<Self, RequestError> {
        let [(first_id, first_value), (second_id, second_value)] = entries;

        let mut text = String::new();
        write!(
            text,
            "GET /forms/d/e/{}/formResponse?entry.{}={}&entry.{}={}&submit=Submit HTTP/1.1\r\n",
            api_key, first_id, first_value, second_id, second_value
        )?;
        write!(text, "Host: {}\r\nConnection: close\r\n\r\n\r\n\r\n", FORMS_ENDPOINT.host)?;

        Ok(Self {
            endpoint: FORMS_ENDPOINT,
            text,
            close: true,
        })
    }

    /// Request text as transmitted, without the terminator
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Byte count to declare before transmitting, covers the terminator appended on transmission
    pub fn send_length(&self) -> usize {
        self.text.len() + TERMINATOR.len()
    }

    /// True if the socket needs to be closed after the transmission
    pub fn closes_socket(&self) -> bool {
        self.close
    }

    /// True if the SSL buffer size needs to be configured before connecting
    pub fn requires_ssl_buffer(&self) -> bool {
        self.endpoint.security == Security::Ssl
    }
}
