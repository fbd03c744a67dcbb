use std::io;

use snafu::Snafu;

/// An error that aborted a GELF write.
///
/// Every variant is fatal for the write that produced it. Datagrams sent before a
/// `FailedToSend` or `SendIncomplete` stay sent; nothing is retried.
#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)), visibility(pub(crate)))]
pub enum WriteError {
    #[snafu(display("Failed to compress payload: {}", source))]
    Compress { source: io::Error },

    #[snafu(display("Failed to generate chunked message id: {}", source))]
    MessageId { source: io::Error },

    #[snafu(display("Too many chunks to generate for GELF: {}, max: {}", chunk_count, max))]
    TooManyChunks { chunk_count: usize, max: usize },

    #[snafu(display("Failed to resolve address {}: {}", address, source))]
    FailedToResolve { address: String, source: io::Error },

    #[snafu(display("No addresses returned for {}.", address))]
    NoAddresses { address: String },

    #[snafu(display("Failed to bind socket: {}.", source))]
    FailedToBind { source: io::Error },

    #[snafu(display("Failed to configure socket: {}.", source))]
    FailedToConfigure { source: io::Error },

    #[snafu(display("Failed to connect to endpoint: {}", source))]
    FailedToConnect { source: io::Error },

    #[snafu(display("Failed to send datagram: {}", source))]
    FailedToSend { source: io::Error },

    #[snafu(display(
        "Could not send all data in one UDP packet: sent {} of {} bytes.",
        sent,
        data_size
    ))]
    SendIncomplete { data_size: usize, sent: usize },
}

impl WriteError {
    /// The I/O error kind that best describes this failure.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Compress { source }
            | Self::MessageId { source }
            | Self::FailedToResolve { source, .. }
            | Self::FailedToBind { source }
            | Self::FailedToConfigure { source }
            | Self::FailedToConnect { source }
            | Self::FailedToSend { source } => source.kind(),
            Self::TooManyChunks { .. } => io::ErrorKind::InvalidInput,
            Self::NoAddresses { .. } => io::ErrorKind::NotFound,
            Self::SendIncomplete { .. } => io::ErrorKind::WriteZero,
        }
    }
}

impl From<WriteError> for io::Error {
    fn from(error: WriteError) -> Self {
        io::Error::new(error.kind(), error)
    }
}
