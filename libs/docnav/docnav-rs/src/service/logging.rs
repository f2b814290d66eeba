use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::{env, panic};

use chrono::Local;
use tracing::metadata::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{filter, fmt, Layer};

use crate::model::errors::NavResult;
use crate::Config;

pub static LOG_FILE: &str = "docnav.log";

fn ours(metadata: &tracing::Metadata) -> bool {
    metadata.target().starts_with("docnav")
}

/// Installs the global subscriber. A host that already installed its own keeps it; we only
/// note that ours was not installed.
pub fn init(config: &Config) -> NavResult<()> {
    if config.logs {
        std::fs::create_dir_all(&config.writeable_path)?;

        let docnav_log_level = env::var("LOG_LEVEL")
            .ok()
            .and_then(|s| s.as_str().parse().ok())
            .unwrap_or(LevelFilter::DEBUG);

        let mut layers = Vec::with_capacity(2);

        layers.push(
            fmt::Layer::new()
                .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                .with_ansi(false)
                .with_target(true)
                .with_writer(tracing_appender::rolling::never(&config.writeable_path, LOG_FILE))
                .with_filter(docnav_log_level)
                .with_filter(filter::filter_fn(ours))
                .boxed(),
        );

        if config.stdout_logs {
            layers.push(
                fmt::Layer::new()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_ansi(config.colored_logs)
                    .with_target(true)
                    .with_filter(docnav_log_level)
                    .with_filter(filter::filter_fn(ours))
                    .boxed(),
            );
        }

        match tracing::subscriber::set_global_default(
            tracing_subscriber::Registry::default().with(layers),
        ) {
            Ok(()) => panic_capture(config),
            Err(err) => warn!(?err, "a global subscriber is already installed, keeping it"),
        }
    }
    Ok(())
}

fn panic_capture(config: &Config) {
    let path = config.writeable_path.clone();
    panic::set_hook(Box::new(move |panic_info| {
        let bt = Backtrace::force_capture();
        error!("panic detected: {panic_info} {}", bt);
        eprintln!("panic detected and logged: {panic_info} {bt}");
        let timestamp = Local::now().format("%Y-%m-%d---%H-%M-%S");
        let file_name = format!("{path}/panic---{timestamp}.log");
        let content = format!("INFO: {panic_info}\nBT: {bt}");

        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_name)
            .and_then(|mut file| file.write_all(content.as_bytes()));
        if let Err(err) = written {
            eprintln!("could not write {file_name}: {err}");
        }
    }));
}
