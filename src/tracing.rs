//! Subscriber setup for the keychord binary
//!
//! `RUST_LOG` filters console output and defaults to `warn`. Use
//! `RUST_LOG=keychord::keymap=trace` to see every dispatched key. A debug
//! level copy of keychord's own events goes to a daily log file under
//! [`config_paths::logs_dir`].

use std::io;

use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths;

const LOG_FILE_PREFIX: &str = "keychord.log";

fn log_writer() -> io::Result<RollingFileAppender> {
    let dir = config_paths::create_logs_dir()?;
    Ok(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
}

pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let console = fmt::layer().with_target(true).with_filter(console_filter);

    let file = match log_writer() {
        Ok(writer) => Some(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_line_number(true)
                .with_filter(EnvFilter::new("keychord=debug")),
        ),
        Err(err) => {
            eprintln!("keychord: file logging disabled: {}", err);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();
}
