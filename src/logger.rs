//! Log setup for the binary. Library code only uses the `log` facade.

use std::io::Write;

use chrono::Local;
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs a stderr logger with local timestamps.
///
/// `RUST_LOG` overrides the default level; `verbose` raises the default from
/// info to debug.
pub fn init(verbose: bool) {
    let default_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    Builder::from_env(Env::default().default_filter_or(default_level.as_str()))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}
