//! Splitting of oversized payloads into GELF chunk datagrams.

mod gelf;

use std::{fmt, io};

use rand::{TryRngCore, rngs::OsRng};

pub use self::gelf::{
    GELF_CHUNK_HEADERS_LENGTH, GELF_MAGIC_BYTES, GELF_MAX_TOTAL_CHUNKS, GelfChunker,
};

/// The 8-byte identifier shared by every chunk of one chunked message.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MessageId([u8; 8]);

impl MessageId {
    pub const fn new(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl From<u64> for MessageId {
    fn from(value: u64) -> Self {
        Self(value.to_be_bytes())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", u64::from_be_bytes(self.0))
    }
}

/// Source of message ids for chunked messages.
///
/// Ids must be unpredictable enough that concurrently in-flight messages to the same
/// collector do not collide. Generation may fail, in which case nothing is sent.
pub trait MessageIdGenerator {
    fn generate(&self) -> io::Result<MessageId>;
}

/// Draws message ids from the operating system's cryptographically secure RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsMessageIdGenerator;

impl MessageIdGenerator for OsMessageIdGenerator {
    fn generate(&self) -> io::Result<MessageId> {
        let mut id = [0; 8];
        OsRng.try_fill_bytes(&mut id).map_err(io::Error::other)?;
        Ok(MessageId(id))
    }
}

impl<G: MessageIdGenerator + ?Sized> MessageIdGenerator for &G {
    fn generate(&self) -> io::Result<MessageId> {
        (**self).generate()
    }
}
