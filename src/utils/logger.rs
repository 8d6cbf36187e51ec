use crate::utils::error::{ImportError, Result};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

pub const DEFAULT_LOG_FILE: &str = "logs/leads_import.log";

/// Targets whose events carry per-lead request/response detail; kept out of the console.
const PER_LEAD_TARGETS: [&str; 2] = [
    "leads_import::adapters::bitrix",
    "leads_import::core::batch",
];

/// Console + audit-file logging for one run.
///
/// The returned [`Dispatch`] is not installed globally; callers scope it with
/// `tracing::dispatcher::set_default` (or `with_default`) for the duration of the run.
pub fn build_cli_dispatch(verbose: bool, log_file: Option<&Path>) -> Result<Dispatch> {
    build_dispatch(verbose, log_file, std::io::stderr)
}

pub fn build_dispatch<W>(
    verbose: bool,
    log_file: Option<&Path>,
    console_writer: W,
) -> Result<Dispatch>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let console = tracing_subscriber::fmt::layer()
        .with_writer(console_writer)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_filter(console_filter(verbose)?);

    // 審計日誌：完整記錄每個請求與回應，不受 RUST_LOG 影響
    let audit = match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_filter(EnvFilter::new("leads_import=debug,warn")),
            )
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry().with(console).with(audit);
    Ok(Dispatch::new(subscriber))
}

/// Operator console: warnings only, and never the per-lead failure detail
/// unless `--verbose` is given.
pub fn console_filter(verbose: bool) -> Result<EnvFilter> {
    if verbose {
        return Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("leads_import=debug,warn")));
    }

    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    for target in PER_LEAD_TARGETS {
        let directive = format!("{}=off", target)
            .parse()
            .map_err(|e| ImportError::ConfigError {
                message: format!("Invalid log directive for {}: {}", target, e),
            })?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

/// Opens the audit log in append mode, creating parent directories as needed.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(file)
}
