// UI layer: everything that talks to the operator lives here, so the batch
// runner and the Bitrix client stay free of console I/O.

use crate::domain::model::{Lead, LeadReport};
use anyhow::Result;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

const SAMPLE_SIZE: usize = 3;

/// Path given on the command line, otherwise asks the operator.
/// `None` means the operator picked nothing.
pub fn select_file(cli_path: Option<PathBuf>) -> Result<Option<PathBuf>> {
    if let Some(path) = cli_path {
        return Ok(Some(path));
    }
    pick_file()
}

#[cfg(feature = "file-dialog")]
fn pick_file() -> Result<Option<PathBuf>> {
    let start_dir = std::env::current_dir()?;
    Ok(rfd::FileDialog::new()
        .set_title("Select the Excel file with leads")
        .add_filter("Excel files", &["xlsx", "xls"])
        .add_filter("CSV files", &["csv"])
        .set_directory(start_dir)
        .pick_file())
}

#[cfg(not(feature = "file-dialog"))]
fn pick_file() -> Result<Option<PathBuf>> {
    let path: String = dialoguer::Input::new()
        .with_prompt("Spreadsheet with leads")
        .allow_empty(true)
        .interact_text()?;
    let path = path.trim();
    Ok((!path.is_empty()).then(|| PathBuf::from(path)))
}

pub fn preview(leads: &[Lead]) {
    println!("Found {} leads.", leads.len());
    println!("\nFirst {} leads:", SAMPLE_SIZE.min(leads.len()));
    for lead in leads.iter().take(SAMPLE_SIZE) {
        println!("- Phone: {}", lead.phone);
        println!("{}", "-".repeat(50));
    }
}

/// The single yes/no gate before any request is sent.
pub fn confirm_upload() -> std::io::Result<bool> {
    let answer = Confirm::new()
        .with_prompt("Start upload?")
        .default(false)
        .interact()?;
    Ok(answer)
}

pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self { bar }
    }

    pub fn report(&self, report: &LeadReport) {
        self.bar.println(report.line());
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
