use std::num::NonZeroUsize;

use bytes::{BufMut, Bytes, BytesMut};
use snafu::ResultExt;

use super::{MessageIdGenerator, OsMessageIdGenerator};
use crate::{
    emit,
    error::{self, WriteError},
    internal_events::GelfChunksGenerated,
};

/// The sequence count is framed in a single byte.
pub const GELF_MAX_TOTAL_CHUNKS: usize = u8::MAX as usize;
pub const GELF_CHUNK_HEADERS_LENGTH: usize = 12;
pub const GELF_MAGIC_BYTES: [u8; 2] = [0x1e, 0x0f];

/// Chunks with GELF native chunking format, as documented from the [source][source].
///
/// Payloads that fit in `max_chunk_size` bytes pass through untouched. Larger payloads
/// are sliced into `max_chunk_size` pieces, each prefixed with a 12 byte header:
///
/// | bytes  | field                         |
/// |--------|-------------------------------|
/// | 0..2   | magic bytes `0x1e 0x0f`       |
/// | 2..10  | message id                    |
/// | 10     | sequence number, zero based   |
/// | 11     | sequence count                |
///
/// Supports up to 255 chunks.
///
/// [source]: https://go2docs.graylog.org/current/getting_in_log_data/gelf.html#chunking
#[derive(Clone, Debug)]
pub struct GelfChunker<G = OsMessageIdGenerator> {
    /// Max payload bytes carried by one datagram. The chunk header is not included, so a
    /// chunk datagram is up to `max_chunk_size + 12` bytes on the wire.
    max_chunk_size: NonZeroUsize,
    message_ids: G,
}

impl GelfChunker {
    pub const fn new(max_chunk_size: NonZeroUsize) -> Self {
        Self::with_message_ids(max_chunk_size, OsMessageIdGenerator)
    }
}

impl<G> GelfChunker<G> {
    pub const fn with_message_ids(max_chunk_size: NonZeroUsize, message_ids: G) -> Self {
        Self {
            max_chunk_size,
            message_ids,
        }
    }

    pub const fn max_chunk_size(&self) -> usize {
        self.max_chunk_size.get()
    }
}

impl<G: MessageIdGenerator> GelfChunker<G> {
    /// Splits `bytes` into the datagrams to send, in sequence order.
    ///
    /// # Errors
    ///
    /// Fails without producing any datagram when the payload needs more than
    /// [`GELF_MAX_TOTAL_CHUNKS`] chunks or when no message id can be generated.
    pub fn chunk(&self, bytes: Bytes) -> Result<Vec<Bytes>, WriteError> {
        let chunk_size = self.max_chunk_size.get();
        if bytes.len() <= chunk_size {
            return Ok(vec![bytes]);
        }

        let chunk_count = bytes.len().div_ceil(chunk_size);
        let Ok(sequence_count) = u8::try_from(chunk_count) else {
            return error::TooManyChunks {
                chunk_count,
                max: GELF_MAX_TOTAL_CHUNKS,
            }
            .fail();
        };

        let message_id = self.message_ids.generate().context(error::MessageId)?;

        emit!(GelfChunksGenerated {
            message_id,
            chunk_count,
            chunk_size,
        });

        // Zip with the sequence number. The count fits in a byte, so the range never runs out.
        let chunks = bytes
            .chunks(chunk_size)
            .zip(0..=u8::MAX)
            .map(|(chunk, sequence_number)| {
                let mut framed = BytesMut::with_capacity(GELF_CHUNK_HEADERS_LENGTH + chunk.len());
                framed.put_slice(&GELF_MAGIC_BYTES);
                framed.put_slice(message_id.as_bytes());
                framed.put_u8(sequence_number);
                framed.put_u8(sequence_count);
                framed.put_slice(chunk);
                framed.freeze()
            })
            .collect();
        Ok(chunks)
    }
}
