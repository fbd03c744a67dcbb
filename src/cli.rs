use std::{io::IsTerminal, path::PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use snafu::OptionExt;

use crate::{
    compression::Compression,
    config::{self, ConfigError, GelfUdpConfig},
};

/// Send each line of stdin to a GELF collector over UDP.
#[derive(Parser, Debug)]
#[command(rename_all = "kebab-case", version, about)]
pub struct Opts {
    /// Read configuration from a TOML file. Flags below override its values.
    #[arg(short, long, env = "GELF_UDP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Hostname or IP address of the GELF collector.
    #[arg(long, env = "GELF_UDP_HOST")]
    pub host: Option<String>,

    /// UDP port of the GELF collector.
    #[arg(short, long, env = "GELF_UDP_PORT")]
    pub port: Option<u16>,

    /// Compression applied to each message: none, gzip or zlib.
    #[arg(long, env = "GELF_UDP_COMPRESSION")]
    pub compression: Option<Compression>,

    /// Messages larger than this many bytes after compression are chunked.
    #[arg(long, env = "GELF_UDP_MAX_CHUNK_SIZE")]
    pub max_chunk_size: Option<usize>,

    /// Wrap each line in a GELF message instead of sending it verbatim.
    #[arg(short, long)]
    pub wrap: bool,

    /// The `host` field of wrapped messages. Defaults to `$HOSTNAME`.
    #[arg(long, env = "GELF_UDP_SOURCE_HOST")]
    pub source_host: Option<String>,

    /// Enable more detailed internal logging. Repeat to increase level. Overridden by `--quiet`.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Reduce detail of internal logging. Repeat to reduce further. Overrides `--verbose`.
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Set the logging format.
    #[arg(long, default_value = "text", env = "GELF_UDP_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Control when ANSI terminal formatting is used.
    #[arg(long, default_value = "auto", env = "GELF_UDP_COLOR")]
    pub color: Color,
}

impl Opts {
    pub const fn log_level(&self) -> &'static str {
        match self.quiet {
            0 => match self.verbose {
                0 => "info",
                1 => "debug",
                2..=255 => "trace",
            },
            1 => "warn",
            2 => "error",
            3..=255 => "off",
        }
    }

    pub fn use_color(&self) -> bool {
        match self.color {
            Color::Always => true,
            Color::Never => false,
            Color::Auto => std::io::stderr().is_terminal(),
        }
    }

    /// Builds the writer config from the config file, if any, and the flag overrides.
    pub fn config(&self) -> Result<GelfUdpConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => GelfUdpConfig::load(path)?,
            None => GelfUdpConfig::new(self.host.clone().context(config::MissingHost)?),
        };

        if let Some(host) = &self.host {
            config.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(compression) = self.compression {
            config.compression = compression;
        }
        if let Some(max_chunk_size) = self.max_chunk_size {
            config.max_chunk_size = max_chunk_size;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn source_host(&self) -> String {
        self.source_host
            .clone()
            .or_else(|| std::env::var("HOSTNAME").ok())
            .unwrap_or_else(|| "localhost".to_owned())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Color {
    Auto,
    Always,
    Never,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;

    use super::{LogFormat, Opts};
    use crate::{compression::Compression, config::ConfigError};

    #[test]
    fn flags_only() {
        let opts = Opts::try_parse_from([
            "gelf-udp",
            "--host",
            "127.0.0.1",
            "--port",
            "1234",
            "--compression",
            "gzip",
            "--max-chunk-size",
            "80",
            "-vv",
        ])
        .unwrap();

        let config = opts.config().unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 1234);
        assert_eq!(config.compression, Compression::Gzip);
        assert_eq!(config.max_chunk_size, 80);
        assert_eq!(opts.log_level(), "trace");
        assert_eq!(opts.log_format, LogFormat::Text);
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"10.0.0.1\"\ncompression = \"zlib\"").unwrap();
        let path = file.path().to_str().unwrap();

        let opts = Opts::try_parse_from(["gelf-udp", "-c", path, "--port", "5555", "-q"]).unwrap();
        let config = opts.config().unwrap();
        assert_eq!(config.host, "10.0.0.1");
        assert_eq!(config.port, 5555);
        assert_eq!(config.compression, Compression::Zlib);
        assert_eq!(opts.log_level(), "warn");
    }

    #[test]
    fn host_required_without_file() {
        let opts = Opts::try_parse_from(["gelf-udp"]).unwrap();
        assert!(matches!(opts.config(), Err(ConfigError::MissingHost)));
    }

    #[test]
    fn rejects_unknown_compression() {
        let result = Opts::try_parse_from(["gelf-udp", "--host", "h", "--compression", "lz4"]);
        assert!(result.is_err());
    }
}
