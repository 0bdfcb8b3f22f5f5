use crate::transport::DEFAULT_BAUD_RATE;

/// Behaviour of an upload when a single step gets rejected or times out
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencePolicy {
    /// All steps are executed regardless of the module responses. Outcomes are just reported.
    BestEffort,
    /// Upload stops at the first rejected step
    AbortOnFailure,
}

impl Default for SequencePolicy {
    fn default() -> Self {
        Self::BestEffort
    }
}

/// Timing and behaviour configuration shared by the blocking and async adapters
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Baud rate the UART gets configured with when joining
    pub(crate) baud_rate: u32,

    /// Pause after a regular command in ms
    pub(crate) command_settle_ms: u32,

    /// Pause after opening a socket in ms, covers DNS lookup and TCP/TLS handshake
    pub(crate) connect_settle_ms: u32,

    /// Pause after the join response in ms, until the module accepts further commands
    pub(crate) join_settle_ms: u32,

    /// Max. time in ms to wait for a terminal token
    pub(crate) response_timeout_ms: u32,

    /// Upload behaviour on rejected steps
    pub(crate) policy: SequencePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            command_settle_ms: 1_000,
            connect_settle_ms: 5_000,
            join_settle_ms: 1_000,
            response_timeout_ms: 5_000,
            policy: SequencePolicy::BestEffort,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_command_settle_ms(mut self, settle: u32) -> Self {
        self.command_settle_ms = settle;
        self
    }

    pub fn with_connect_settle_ms(mut self, settle: u32) -> Self {
        self.connect_settle_ms = settle;
        self
    }

    /// Observed working values are between 1000 and 3000 ms
    pub fn with_join_settle_ms(mut self, settle: u32) -> Self {
        self.join_settle_ms = settle;
        self
    }

    pub fn with_response_timeout_ms(mut self, timeout: u32) -> Self {
        self.response_timeout_ms = timeout;
        self
    }

    pub fn with_policy(mut self, policy: SequencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets all settle delays to zero. Used for doubles responding instantly.
    pub fn without_settle_delays(self) -> Self {
        self.with_command_settle_ms(0)
            .with_connect_settle_ms(0)
            .with_join_settle_ms(0)
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    pub fn response_timeout_ms(&self) -> u32 {
        self.response_timeout_ms
    }

    pub fn policy(&self) -> SequencePolicy {
        self.policy
    }
}
