//! # Async adapter
//!
//! Same operations as the blocking [Adapter](crate::wifi::Adapter), built on [embedded_io_async]
//! and [embassy_time]. Response polling yields between reads, so other tasks keep running while
//! waiting for the modem. Operations of concurrent tasks are serialized by a mutex, so command
//! sequences of different tasks do not interleave on the UART.
pub mod upload;
pub mod wifi;
