use env_logger::{Builder, Env, Logger};
use std::io::Write;

/// Build the run's logger: `timestamp - LEVEL - message` on stderr, debug and
/// up unless `RUST_LOG` says otherwise.
///
/// The logger is returned rather than installed; callers pass it down and log
/// through it with the `logger:` form of the `log` macros.
pub fn build() -> Logger {
    Builder::from_env(Env::default().default_filter_or("debug"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .build()
}
