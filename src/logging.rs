use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

const DEFAULT_FILTER: &str = "grid_snake=info";

/// Installs a file-backed tracing subscriber.
///
/// Nothing is installed without a path: the game owns the terminal, so log
/// lines must never reach stdout or stderr. `RUST_LOG` overrides the default
/// filter. Installing twice in one process is reported as
/// [`AppError::Subscriber`].
pub fn init_tracing(log_file: Option<&Path>) -> Result<(), AppError> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| AppError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(AppError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::init_tracing;
    use crate::error::AppError;

    #[test]
    fn no_path_installs_nothing() {
        assert!(init_tracing(None).is_ok());
    }

    #[test]
    fn unopenable_path_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let path = dir.path().join("missing").join("snake.log");

        let error = init_tracing(Some(&path)).expect_err("parent does not exist");

        assert!(matches!(error, AppError::LogFile { .. }));
    }

    // The only test in this crate that installs the global subscriber.
    #[test]
    fn second_install_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let path = dir.path().join("snake.log");

        init_tracing(Some(&path)).expect("first install succeeds");
        let error = init_tracing(Some(&path)).expect_err("subscriber already set");

        assert!(matches!(error, AppError::Subscriber(_)));
        assert!(path.exists());
    }
}
