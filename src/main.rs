use clap::Parser;
use leads_import::utils::logger;
use leads_import::{import_leads, ui, CliConfig, ConfigSources, ImportError, ImportOutcome};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌（僅在本次執行範圍內生效）
    let dispatch = logger::build_cli_dispatch(cli.verbose, Some(&cli.log_file))?;
    let _log_guard = tracing::dispatcher::set_default(&dispatch);

    tracing::info!("🚀 Starting leads-import");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let Some(path) = ui::select_file(cli.file.clone())? else {
        println!("No file selected. Upload cancelled.");
        return Ok(());
    };

    if !path.exists() {
        println!("File not found: {}", path.display());
        return Ok(());
    }

    let sources = match ConfigSources::load(cli.config.as_deref()) {
        Ok(sources) => sources,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            exit_with(e)
        }
    };

    let mut progress: Option<ui::ConsoleProgress> = None;
    let outcome = import_leads(
        &sources,
        &path,
        |leads| {
            ui::preview(leads);
            Ok(ui::confirm_upload()?)
        },
        |report| {
            progress
                .get_or_insert_with(|| ui::ConsoleProgress::new(report.total))
                .report(report)
        },
    )
    .await;

    if let Some(progress) = &progress {
        progress.finish();
    }

    match outcome {
        Ok(ImportOutcome::NoLeads) => println!("No leads found to upload"),
        Ok(ImportOutcome::Cancelled) => println!("Upload cancelled"),
        Ok(ImportOutcome::Finished(summary)) => {
            println!("\n{}", summary.line());
            tracing::info!("📁 Audit log: {}", cli.log_file.display());
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn exit_with(e: ImportError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
