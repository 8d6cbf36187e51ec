use clap::Parser;
use leads_import::adapters::spreadsheet::normalize_phone;
use leads_import::utils::logger;
use leads_import::{BitrixClient, SubmissionConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "create-contact")]
#[command(about = "Create a single Bitrix24 contact for a phone number")]
struct Args {
    /// Phone number used as both the contact name and its work phone
    phone: String,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Audit log file (appended to)
    #[arg(long, default_value = logger::DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let dispatch = logger::build_cli_dispatch(args.verbose, Some(&args.log_file))?;
    let _log_guard = tracing::dispatcher::set_default(&dispatch);

    let Some(phone) = normalize_phone(&args.phone) else {
        eprintln!("❌ '{}' is not a phone number", args.phone);
        std::process::exit(1);
    };

    let config = match SubmissionConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    let client = BitrixClient::new(config)?;
    match client.create_contact(&phone).await {
        Ok(id) => println!("✅ Contact created, ID: {}", id),
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
