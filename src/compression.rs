use std::io;

use bytes::Bytes;
use flate2::write::{GzEncoder, ZlibEncoder};
use serde::{Deserialize, Serialize};

/// Compression applied to a payload before it is chunked.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Send the payload as-is.
    #[default]
    None,

    /// [Gzip][gzip] compression.
    ///
    /// [gzip]: https://www.gzip.org/
    Gzip,

    /// [Zlib][zlib] compression.
    ///
    /// [zlib]: https://zlib.net/
    Zlib,
}

impl Compression {
    /// Compresses `payload` into a freshly allocated buffer.
    ///
    /// # Errors
    ///
    /// If the encoder fails while writing or finalizing the stream, the I/O error is returned
    /// and no partial output is kept.
    pub fn compress(self, payload: &[u8]) -> io::Result<Bytes> {
        let mut compressor = Compressor::from(self);
        io::Write::write_all(&mut compressor, payload)?;
        compressor.finish().map(Bytes::from)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Zlib => "zlib",
        }
    }
}

impl std::str::FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "gzip" => Ok(Self::Gzip),
            "zlib" => Ok(Self::Zlib),
            other => Err(format!(
                "unknown compression `{other}`, expected one of: none, gzip, zlib"
            )),
        }
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

enum Writer {
    Plain(Vec<u8>),
    Gzip(GzEncoder<Vec<u8>>),
    Zlib(ZlibEncoder<Vec<u8>>),
}

impl From<Compression> for Writer {
    fn from(compression: Compression) -> Self {
        let buffer = Vec::with_capacity(1_024);
        let level = flate2::Compression::default();
        match compression {
            Compression::None => Writer::Plain(buffer),
            Compression::Gzip => Writer::Gzip(GzEncoder::new(buffer, level)),
            Compression::Zlib => Writer::Zlib(ZlibEncoder::new(buffer, level)),
        }
    }
}

impl io::Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Writer::Plain(inner_buf) => inner_buf.write(buf),
            Writer::Gzip(writer) => writer.write(buf),
            Writer::Zlib(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Writer::Plain(_) => Ok(()),
            Writer::Gzip(writer) => writer.flush(),
            Writer::Zlib(writer) => writer.flush(),
        }
    }
}

/// Streaming compressor for a single payload.
///
/// Acquired via [`Compressor::from`] for the desired [`Compression`].
pub struct Compressor {
    inner: Writer,
}

impl Compressor {
    /// Consumes the compressor, returning the finalized buffer.
    ///
    /// # Errors
    ///
    /// If the compressor encounters an I/O error while writing the stream trailer, an error
    /// variant will be returned.
    pub fn finish(self) -> io::Result<Vec<u8>> {
        let buf = match self.inner {
            Writer::Plain(buf) => buf,
            Writer::Gzip(writer) => writer.finish()?,
            Writer::Zlib(writer) => writer.finish()?,
        };

        Ok(buf)
    }
}

impl io::Write for Compressor {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl From<Compression> for Compressor {
    fn from(compression: Compression) -> Self {
        Compressor {
            inner: compression.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use flate2::read::{GzDecoder, ZlibDecoder};
    use rstest::rstest;
    use similar_asserts::assert_eq;

    use super::{Compression, Compressor};

    const PAYLOAD: &[u8] = br#"{"host":"h","short_message":"Test Message","version":"1.1"}"#;

    fn decompress(compression: Compression, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        match compression {
            Compression::None => out.extend_from_slice(data),
            Compression::Gzip => {
                GzDecoder::new(data).read_to_end(&mut out).unwrap();
            }
            Compression::Zlib => {
                ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
            }
        }
        out
    }

    #[rstest]
    #[case(Compression::None)]
    #[case(Compression::Gzip)]
    #[case(Compression::Zlib)]
    fn compress_recovers_payload(#[case] compression: Compression) {
        let compressed = compression.compress(PAYLOAD).unwrap();
        assert_eq!(decompress(compression, &compressed), PAYLOAD.to_vec());
    }

    #[test]
    fn none_is_identity() {
        let compressed = Compression::None.compress(PAYLOAD).unwrap();
        assert_eq!(&compressed[..], PAYLOAD);
    }

    #[test]
    fn stream_headers() {
        let gzip = Compression::Gzip.compress(PAYLOAD).unwrap();
        assert!(gzip.starts_with(&[0x1f, 0x8b]));

        // CMF byte for deflate with a 32K window.
        let zlib = Compression::Zlib.compress(PAYLOAD).unwrap();
        assert_eq!(zlib[0], 0x78_u8);
    }

    #[test]
    fn empty_payload_still_framed() {
        let gzip = Compression::Gzip.compress(b"").unwrap();
        assert!(!gzip.is_empty());
        assert!(decompress(Compression::Gzip, &gzip).is_empty());
    }

    #[test]
    fn compressor_streams_multiple_writes() {
        let mut compressor = Compressor::from(Compression::Zlib);
        for part in PAYLOAD.chunks(7) {
            compressor.write_all(part).unwrap();
        }
        compressor.flush().unwrap();
        let compressed = compressor.finish().unwrap();
        assert_eq!(decompress(Compression::Zlib, &compressed), PAYLOAD.to_vec());
    }

    #[test]
    fn plain_compressor_passes_writes_through() {
        let mut compressor = Compressor::from(Compression::None);
        for part in PAYLOAD.chunks(7) {
            compressor.write_all(part).unwrap();
        }
        assert_eq!(compressor.finish().unwrap(), PAYLOAD.to_vec());
    }

    #[test]
    fn parses_names() {
        for compression in [Compression::None, Compression::Gzip, Compression::Zlib] {
            assert_eq!(compression.as_str().parse::<Compression>(), Ok(compression));
        }
        assert!("lz4".parse::<Compression>().is_err());
    }

    #[test]
    fn deserializes_lowercase() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            compression: Compression,
        }

        let parsed: Wrapper = toml::from_str(r#"compression = "zlib""#).unwrap();
        assert_eq!(parsed.compression, Compression::Zlib);
        assert!(toml::from_str::<Wrapper>(r#"compression = "brotli""#).is_err());
    }
}
