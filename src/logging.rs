use std::fs;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
///
/// `--verbose` raises the crate to `debug`; other targets follow `RUST_LOG`.
pub fn init_logging(verbose: bool) {
    let _ = fs::create_dir_all("logs");

    // Daily-rotated JSON file next to the human-readable console output
    let file_appender = tracing_appender::rolling::daily("logs", "pipeline.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(crate_directive(verbose)))
        .with(file_layer)
        .with(console_layer)
        .init();

    // Keep the writer alive for the life of the process so logs flush on exit
    std::mem::forget(guard);
}

fn crate_directive(verbose: bool) -> Directive {
    let directive = if verbose { "seattle_airbnb=debug" } else { "seattle_airbnb=info" };
    directive.parse().unwrap_or_else(|_| LevelFilter::INFO.into())
}
