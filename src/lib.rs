//! Client side GELF (Graylog Extended Log Format) over UDP.
//!
//! A payload written to [`GelfUdpWriter`] is compressed according to the configured
//! [`Compression`], split into GELF chunks when it exceeds the configured chunk size, and
//! sent to the collector as one UDP datagram per chunk.

#![deny(unused_allocation)]
#![deny(unused_extern_crates)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]

pub mod chunking;
pub mod cli;
pub mod compression;
pub mod config;
pub mod error;
pub mod gelf;
pub mod internal_events;
pub mod net;
pub mod trace;
pub mod udp;
pub mod writer;

pub use chunking::{GelfChunker, MessageId, MessageIdGenerator, OsMessageIdGenerator};
pub use compression::Compression;
pub use config::{ConfigError, GelfUdpConfig};
pub use error::WriteError;
pub use gelf::GelfMessage;
pub use writer::GelfUdpWriter;
