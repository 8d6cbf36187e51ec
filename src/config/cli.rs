use clap::Parser;
use std::path::PathBuf;

/// The webhook URL is deliberately not a flag: it carries CRM credentials and
/// comes from the environment (or `.env`) only.
#[derive(Debug, Clone, Parser)]
#[command(name = "leads-import")]
#[command(about = "Upload phone numbers from a spreadsheet as Bitrix24 leads")]
pub struct CliConfig {
    /// Spreadsheet with a "Телефон" column; a file picker is shown when omitted
    pub file: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Audit log file (appended to)
    #[arg(long, default_value = crate::utils::logger::DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["leads-import"]);
        assert!(config.file.is_none());
        assert!(config.config.is_none());
        assert_eq!(config.log_file, PathBuf::from("logs/leads_import.log"));
        assert!(!config.verbose);
    }

    #[test]
    fn test_file_and_flags() {
        let config = CliConfig::parse_from([
            "leads-import",
            "leads.xlsx",
            "--config",
            "import.toml",
            "-v",
        ]);
        assert_eq!(config.file, Some(PathBuf::from("leads.xlsx")));
        assert_eq!(config.config, Some(PathBuf::from("import.toml")));
        assert!(config.verbose);
    }
}
