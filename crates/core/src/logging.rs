use crate::error::{ConversionError, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default directives when neither `RUST_LOG` nor an explicit filter is given.
pub const DEFAULT_FILTER: &str = "info,jdt_bridge_core::convert=warn";

/// Where and how much a process logs. The rolling file is always written;
/// stderr only on request.
#[derive(Debug, Clone)]
pub struct LogSettings {
    component: String,
    dir: Option<PathBuf>,
    filter: Option<String>,
    to_stderr: bool,
}

impl LogSettings {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            dir: None,
            filter: None,
            to_stderr: false,
        }
    }

    pub fn dir(mut self, dir: Option<PathBuf>) -> Self {
        self.dir = dir;
        self
    }

    pub fn filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    pub fn stderr(mut self, to_stderr: bool) -> Self {
        self.to_stderr = to_stderr;
        self
    }

    /// `~/.jdt-bridge/logs` unless overridden.
    pub fn log_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".jdt-bridge")
                .join("logs")
        })
    }

    /// An explicit filter wins over `RUST_LOG`, which wins over [`DEFAULT_FILTER`].
    pub fn env_filter(&self) -> Result<EnvFilter> {
        match &self.filter {
            Some(directives) => {
                EnvFilter::try_new(directives).map_err(|e| ConversionError::InvalidOption {
                    key: "log-filter".to_string(),
                    value: format!("{directives} ({e})"),
                })
            }
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
        }
    }

    /// Installs the global subscriber. Keep the guard alive for as long as
    /// file output should be flushed.
    pub fn init(&self) -> Result<WorkerGuard> {
        let filter = self.env_filter()?;
        let log_dir = self.log_dir();
        std::fs::create_dir_all(&log_dir)?;

        // Files are named after the component, e.g. cli.2026-10-18
        let file_appender = tracing_appender::rolling::daily(&log_dir, &self.component);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true);

        let registry = tracing_subscriber::registry().with(filter).with(file_layer);

        if self.to_stderr {
            let stderr_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(false);
            registry.with(stderr_layer).init();
        } else {
            registry.init();
        }

        tracing::debug!("Logging {} to {}", self.component, log_dir.display());
        Ok(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LogSettings::new("cli").dir(Some(dir.path().to_path_buf()));
        assert_eq!(settings.log_dir(), dir.path());
    }

    #[test]
    fn test_default_dir_is_per_user() {
        let dir = LogSettings::new("cli").log_dir();
        assert!(dir.ends_with(".jdt-bridge/logs"));
    }

    #[test]
    fn test_filter_directives_are_validated() {
        let ok = LogSettings::new("cli").filter(Some("jdt_bridge_core=debug".to_string()));
        assert!(ok.env_filter().is_ok());

        let bad = LogSettings::new("cli").filter(Some("jdt_bridge_core=loud".to_string()));
        assert!(matches!(
            bad.env_filter(),
            Err(ConversionError::InvalidOption { key, .. }) if key == "log-filter"
        ));
    }
}
