//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr through `log`/`env_logger`. `RUST_LOG` wins when
//! set; otherwise the level comes from the number of `-v` flags.

use log::LevelFilter;

/// Level for a given `-v` count: warn, info, debug, then trace.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global logger. Safe to call more than once.
pub fn init(verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level_for(verbosity));
    // Third-party HTTP internals stay quiet below trace
    if verbosity < 3 {
        builder.filter_module("hyper_util", LevelFilter::Warn);
        builder.filter_module("reqwest", LevelFilter::Warn);
    }
    builder.parse_default_env();
    builder.format_timestamp(None);
    let _ = builder.try_init();
}
