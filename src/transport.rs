//! # Serial transport
//!
//! Byte transfer is expressed with [embedded_io] traits (`Read + Write + ReadReady` for the
//! blocking [Adapter](crate::wifi::Adapter), the [embedded_io_async] counterparts for the
//! [async adapter](crate::asynch::wifi::Adapter)). `read_ready()` must report whether a read would
//! return without blocking, as the response classification polls the UART.
//!
//! Routing the UART to pins is platform specific and provided by [SerialRouting].
use core::fmt::Debug;
use embedded_io::ErrorType;

/// Fixed baud rate of the AT firmware in its factory configuration
pub const DEFAULT_BAUD_RATE: u32 = 9_600;

/// Pin routing and baud rate selection of the UART connected to the modem
pub trait SerialRouting: ErrorType {
    /// Pin identifier of the host platform
    type Pin: Copy + Debug;

    /// Routes the UART to the given pins and (re)configures the baud rate.
    ///
    /// tx: pin the modem transmits on (host receives)
    /// rx: pin the modem receives on (host transmits)
    fn redirect(&mut self, tx: Self::Pin, rx: Self::Pin, baud_rate: u32) -> Result<(), Self::Error>;
}
