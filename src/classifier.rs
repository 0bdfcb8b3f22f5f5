//! # Response classification
//!
//! The module output is not parsed line by line. Instead the most recent bytes are kept in a
//! bounded window, which is searched for terminal tokens:
//!
//! * Success: `OK`, `ALREADY CONNECTED`
//! * Failure: `ERROR`, `SEND FAIL`
//!
//! Tokens are matched as case-sensitive substrings, so `OK` embedded in unrelated output (e.g.
//! `SEND OK` of a previous transmission still in the UART) is classified as success as well.
//! This is a known weakness kept for compatibility with existing firmware behaviour.

/// Max. number of bytes kept for classification. Older bytes are discarded first.
pub const WINDOW_SIZE: usize = 200;

/// Tokens terminating a wait successfully
pub(crate) const SUCCESS_TOKENS: [&[u8]; 2] = [b"OK", b"ALREADY CONNECTED"];

/// Tokens terminating a wait unsuccessfully
pub(crate) const FAILURE_TOKENS: [&[u8]; 2] = [b"ERROR", b"SEND FAIL"];

/// Result of classifying the current window content
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Classification {
    /// A success token was found
    Success,
    /// A failure token was found, no success token
    Failure,
    /// No terminal token yet
    Pending,
}

/// Rolling buffer holding the trailing [WINDOW_SIZE] bytes of module output
#[derive(Clone)]
pub struct ResponseWindow {
    buffer: [u8; WINDOW_SIZE],

    /// Number of valid bytes at the start of `buffer`
    length: usize,
}

impl Default for ResponseWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseWindow {
    pub fn new() -> Self {
        Self {
            buffer: [0x0; WINDOW_SIZE],
            length: 0,
        }
    }

    /// Appends received data, dropping the oldest bytes if the window would exceed [WINDOW_SIZE]
    pub fn extend(&mut self, data: &[u8]) {
        if data.len() >= WINDOW_SIZE {
            self.buffer.copy_from_slice(&data[data.len() - WINDOW_SIZE..]);
            self.length = WINDOW_SIZE;
            return;
        }

        let overflow = (self.length + data.len()).saturating_sub(WINDOW_SIZE);
        if overflow > 0 {
            self.buffer.copy_within(overflow..self.length, 0);
            self.length -= overflow;
        }

        let end = self.length + data.len();
        self.buffer[self.length..end].copy_from_slice(data);
        self.length = end;
    }

    /// Searches the window for terminal tokens. Success tokens take precedence.
    pub fn classify(&self) -> Classification {
        let window = self.as_bytes();

        if SUCCESS_TOKENS.iter().any(|token| contains(window, token)) {
            return Classification::Success;
        }

        if FAILURE_TOKENS.iter().any(|token| contains(window, token)) {
            return Classification::Failure;
        }

        Classification::Pending
    }

    /// Returns the current window content
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.length]
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|candidate| candidate == needle)
}
