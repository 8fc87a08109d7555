//! Startup arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::observability::{LogFormat, LoggingConfig};

/// How the process runs once bootstrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RunMode {
    /// Bind a port and serve HTTP until shutdown.
    #[default]
    Serve,
    /// Initialize applications and return.
    Headless,
}

/// Arguments selecting the run mode and the configuration source.
#[derive(Debug, Clone, Parser)]
#[command(name = "service-bootstrap")]
#[command(about = "Resolve a service's configuration and start it", long_about = None)]
pub struct StartupArgs {
    #[arg(long, value_enum, default_value_t = RunMode::Serve)]
    pub mode: RunMode,

    /// Directory containing one sub-directory per profile.
    #[arg(long, default_value = "config")]
    pub config_dir: PathBuf,

    #[arg(long, default_value = "default")]
    pub profile: String,

    /// Service to start; `<config_dir>/<profile>/<service>.toml` is its core config.
    #[arg(long)]
    pub service: String,

    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// In headless mode, keep the process alive until Ctrl+C.
    #[arg(long)]
    pub wait: bool,
}

impl StartupArgs {
    pub fn new(
        mode: RunMode,
        config_dir: impl Into<PathBuf>,
        profile: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            config_dir: config_dir.into(),
            profile: profile.into(),
            service: service.into(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            wait: false,
        }
    }

    pub fn serving(&self) -> bool {
        self.mode == RunMode::Serve
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format,
        }
    }
}
