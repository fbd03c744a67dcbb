use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use snafu::{OptionExt, ResultExt, Snafu, ensure};

use crate::compression::Compression;

/// The registered GELF UDP port.
pub const DEFAULT_PORT: u16 = 12201;

/// Ethernet MTU minus IP, UDP and chunk headers, leaving some headroom so chunked
/// datagrams are never fragmented.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 1420;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)), visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("Host must not be empty."))]
    MissingHost,

    #[snafu(display("`max_chunk_size` must be greater than zero."))]
    InvalidChunkSize,

    #[snafu(display("Could not read config file {}: {}", path.display(), source))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Could not parse config: {}", source))]
    Parse { source: toml::de::Error },
}

/// Configuration for a GELF UDP writer.
///
/// Immutable once a writer has been built from it.
#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GelfUdpConfig {
    /// Hostname or IP address of the GELF collector.
    pub host: String,

    /// UDP port of the GELF collector.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Compression applied to each message before chunking.
    #[serde(default)]
    pub compression: Compression,

    /// Messages whose compressed size exceeds this many bytes are chunked.
    ///
    /// Each chunk carries up to this many payload bytes plus a 12 byte header.
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    /// The size of the socket's send buffer.
    ///
    /// If set, the value of the setting is passed via the `SO_SNDBUF` option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_buffer_size: Option<usize>,

    /// Deadline for each datagram write, in seconds.
    ///
    /// Unset means sends block for as long as the operating system lets them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde_as(as = "Option<serde_with::DurationSecondsWithFrac<f64>>")]
    #[serde(rename = "send_timeout_secs")]
    pub send_timeout: Option<Duration>,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

const fn default_max_chunk_size() -> usize {
    DEFAULT_MAX_CHUNK_SIZE
}

impl GelfUdpConfig {
    /// Default settings for sending to `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            compression: Compression::default(),
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            send_buffer_size: None,
            send_timeout: None,
        }
    }

    /// Loads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).context(Read { path })?;
        contents.parse()
    }

    /// Checks the settings a writer cannot work without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(!self.host.trim().is_empty(), MissingHost);
        self.max_chunk_size().map(drop)
    }

    pub fn max_chunk_size(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.max_chunk_size).context(InvalidChunkSize)
    }
}

impl FromStr for GelfUdpConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s).context(Parse)?;
        config.validate()?;
        Ok(config)
    }
}
