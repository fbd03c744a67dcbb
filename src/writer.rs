use std::io;

use snafu::ResultExt;

use crate::{
    chunking::{GelfChunker, MessageIdGenerator, OsMessageIdGenerator},
    compression::Compression,
    config::{ConfigError, GelfUdpConfig},
    emit,
    error::{self, WriteError},
    internal_events::{GelfMessageSent, GelfWriteError},
    udp::{Destination, Transport, UdpTransmitter},
};

/// Compresses, chunks and sends GELF payloads over UDP.
///
/// Every write runs synchronously on the calling thread: compress, chunk, then send each
/// datagram in sequence order on a freshly connected socket. The writer holds no mutable
/// state, so a shared reference can be used from several threads at once. Datagrams of
/// concurrent messages may interleave on the wire; their message ids keep them apart.
#[derive(Clone, Debug)]
pub struct GelfUdpWriter<G = OsMessageIdGenerator, T = UdpTransmitter> {
    compression: Compression,
    chunker: GelfChunker<G>,
    transport: T,
}

impl GelfUdpWriter {
    pub fn new(config: &GelfUdpConfig) -> Result<Self, ConfigError> {
        Self::with_message_ids(config, OsMessageIdGenerator)
    }
}

impl<G: MessageIdGenerator> GelfUdpWriter<G> {
    pub fn with_message_ids(config: &GelfUdpConfig, message_ids: G) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(
            config.compression,
            GelfChunker::with_message_ids(config.max_chunk_size()?, message_ids),
            UdpTransmitter::from_config(config),
        ))
    }
}

impl<G, T> GelfUdpWriter<G, T> {
    /// Assembles a writer that sends through `transport` instead of a UDP socket.
    pub const fn from_parts(
        compression: Compression,
        chunker: GelfChunker<G>,
        transport: T,
    ) -> Self {
        Self {
            compression,
            chunker,
            transport,
        }
    }
}

impl<G: MessageIdGenerator, T: Transport> GelfUdpWriter<G, T> {
    /// Sends `payload` as one GELF message, returning the number of payload bytes consumed.
    ///
    /// # Errors
    ///
    /// Compression, chunking and address resolution failures abort before anything is
    /// sent. A send failure aborts the remaining chunks; chunks already sent are not
    /// retracted, so the collector never sees a complete message.
    pub fn write_message(&self, payload: &[u8]) -> Result<usize, WriteError> {
        self.try_write_message(payload).inspect_err(|error| {
            emit!(GelfWriteError { error });
        })
    }

    fn try_write_message(&self, payload: &[u8]) -> Result<usize, WriteError> {
        let compressed = self
            .compression
            .compress(payload)
            .context(error::Compress)?;
        let datagrams = self.chunker.chunk(compressed)?;

        let destination = self.transport.open()?;
        let mut byte_size = 0;
        for datagram in &datagrams {
            byte_size += destination.send(datagram)?;
        }

        emit!(GelfMessageSent {
            byte_size,
            datagrams: datagrams.len(),
        });

        Ok(payload.len())
    }
}

impl<G: MessageIdGenerator, T: Transport> io::Write for GelfUdpWriter<G, T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Each `write` call is one GELF message; nothing is buffered, so `flush` has nothing to do.
impl<G: MessageIdGenerator, T: Transport> io::Write for &GelfUdpWriter<G, T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_message(buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
