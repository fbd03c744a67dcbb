use std::{
    io::{self, BufRead},
    process,
};

use chrono::Utc;
use clap::Parser;
use gelf_udp::{
    GelfMessage, GelfUdpWriter,
    cli::{LogFormat, Opts},
    trace,
};
use tracing::{error, info};

fn main() {
    let opts = Opts::parse();
    trace::init(
        opts.use_color(),
        opts.log_format == LogFormat::Json,
        opts.log_level(),
    );

    process::exit(run(&opts));
}

fn run(opts: &Opts) -> exitcode::ExitCode {
    let config = match opts.config() {
        Ok(config) => config,
        Err(error) => {
            error!(message = "Configuration error.", %error);
            return exitcode::CONFIG;
        }
    };
    let writer = match GelfUdpWriter::new(&config) {
        Ok(writer) => writer,
        Err(error) => {
            error!(message = "Configuration error.", %error);
            return exitcode::CONFIG;
        }
    };

    info!(
        message = "Sending GELF messages from stdin.",
        host = %config.host,
        port = config.port,
        compression = %config.compression,
        max_chunk_size = config.max_chunk_size,
    );

    let source_host = opts.source_host();
    let mut sent = 0;
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                error!(message = "Failed reading stdin.", %error);
                return exitcode::IOERR;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let payload = if opts.wrap {
            match GelfMessage::new(source_host.as_str(), line)
                .with_timestamp(Utc::now())
                .to_bytes()
            {
                Ok(payload) => payload,
                Err(error) => {
                    error!(message = "Failed to encode GELF message.", %error);
                    return exitcode::DATAERR;
                }
            }
        } else {
            line.into_bytes()
        };

        if let Err(error) = writer.write_message(&payload) {
            error!(message = "Failed to send GELF message.", %error, sent);
            return exitcode::IOERR;
        }
        sent += 1;
    }

    info!(message = "Finished.", sent);
    exitcode::OK
}
