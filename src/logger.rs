use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE: &str = "fruit_master.log";
const DEFAULT_FILTER: &str = "fruit_master=debug,info";

fn open_log(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Route `tracing` output to a file. The terminal belongs to the UI, so
/// nothing is ever written to stdout or stderr.
pub fn init(path: impl AsRef<Path>) -> io::Result<()> {
    let file = open_log(path.as_ref())?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_thread_names(true)
                .with_writer(Mutex::new(file)),
        )
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_init_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");
        init(&path).unwrap();
        tracing::info!("Test log message");
        assert!(path.exists());
    }

    #[test]
    fn test_logger_init_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("test.log");
        assert!(init(&path).is_err());
    }
}
