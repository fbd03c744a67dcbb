use std::{io, net::SocketAddr};

use metrics::counter;
use tracing::{debug, trace, warn};

use crate::{chunking::MessageId, error::WriteError};

pub trait InternalEvent {
    fn emit_logs(&self) {}
    fn emit_metrics(&self) {}
}

pub fn emit(event: impl InternalEvent) {
    event.emit_logs();
    event.emit_metrics();
}

#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::internal_events::emit($event);
    };
}

mod error_type {
    pub const ENCODER_FAILED: &str = "encoder_failed";
    pub const CONNECTION_FAILED: &str = "connection_failed";
    pub const WRITER_FAILED: &str = "writer_failed";
}

#[derive(Debug)]
pub struct GelfChunksGenerated {
    pub message_id: MessageId,
    pub chunk_count: usize,
    pub chunk_size: usize,
}

impl InternalEvent for GelfChunksGenerated {
    fn emit_logs(&self) {
        trace!(
            message = "Generating chunks for GELF.",
            message_id = %self.message_id,
            chunk_count = self.chunk_count,
            chunk_size = self.chunk_size,
        );
    }

    fn emit_metrics(&self) {
        counter!("gelf_chunks_generated_total").increment(self.chunk_count as u64);
    }
}

#[derive(Debug)]
pub struct UdpSocketConnectionEstablished {
    pub peer_addr: SocketAddr,
}

impl InternalEvent for UdpSocketConnectionEstablished {
    fn emit_logs(&self) {
        debug!(message = "Connected.", peer_addr = %self.peer_addr);
    }

    fn emit_metrics(&self) {
        counter!("connection_established_total", "mode" => "udp").increment(1);
    }
}

#[derive(Debug)]
pub struct UdpSendBufferSizeError {
    pub error: io::Error,
    pub size: usize,
}

impl InternalEvent for UdpSendBufferSizeError {
    fn emit_logs(&self) {
        warn!(
            message = "Failed configuring send buffer size on UDP socket.",
            error = %self.error,
            size = self.size,
        );
    }
}

#[derive(Debug)]
pub struct GelfMessageSent {
    pub byte_size: usize,
    pub datagrams: usize,
}

impl InternalEvent for GelfMessageSent {
    fn emit_logs(&self) {
        trace!(
            message = "Sent GELF message.",
            byte_size = self.byte_size,
            datagrams = self.datagrams,
        );
    }

    fn emit_metrics(&self) {
        counter!("component_sent_events_total").increment(1);
        counter!("component_sent_bytes_total").increment(self.byte_size as u64);
    }
}

/// A write failed. The error is handed back to the caller, so this only counts it.
#[derive(Debug)]
pub struct GelfWriteError<'a> {
    pub error: &'a WriteError,
}

impl GelfWriteError<'_> {
    const fn error_type(&self) -> &'static str {
        match self.error {
            WriteError::Compress { .. }
            | WriteError::MessageId { .. }
            | WriteError::TooManyChunks { .. } => error_type::ENCODER_FAILED,
            WriteError::FailedToResolve { .. }
            | WriteError::NoAddresses { .. }
            | WriteError::FailedToBind { .. }
            | WriteError::FailedToConfigure { .. }
            | WriteError::FailedToConnect { .. } => error_type::CONNECTION_FAILED,
            WriteError::FailedToSend { .. } | WriteError::SendIncomplete { .. } => {
                error_type::WRITER_FAILED
            }
        }
    }
}

impl InternalEvent for GelfWriteError<'_> {
    fn emit_logs(&self) {
        debug!(
            message = "GELF write failed.",
            error = %self.error,
            error_type = self.error_type(),
        );
    }

    fn emit_metrics(&self) {
        counter!("component_errors_total", "error_type" => self.error_type()).increment(1);
    }
}
