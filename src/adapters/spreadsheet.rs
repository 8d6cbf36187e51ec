use crate::domain::model::Lead;
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::validate_file_extension;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

pub const PHONE_COLUMN: &str = "Телефон";
pub const COMMENTS_COLUMN: &str = "Комментарий";

pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"];

/// Header row plus data rows, every cell already coerced to text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Reads leads, reporting any failure and returning an empty list instead.
///
/// An empty result therefore means "nothing to upload", not necessarily an empty file.
pub fn read_leads(path: &Path) -> Vec<Lead> {
    match try_read_leads(path) {
        Ok(leads) => leads,
        Err(e) => {
            tracing::error!("❌ Failed to read spreadsheet {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

pub fn try_read_leads(path: &Path) -> Result<Vec<Lead>> {
    let table = load_table(path)?;
    let leads = extract_leads(&table)?;
    tracing::info!("Read {} leads from {}", leads.len(), path.display());
    Ok(leads)
}

pub fn load_table(path: &Path) -> Result<SheetTable> {
    let extension = validate_file_extension(path, &SUPPORTED_EXTENSIONS)?;
    if extension == "csv" {
        load_csv(path)
    } else {
        load_workbook(path)
    }
}

fn load_workbook(path: &Path) -> Result<SheetTable> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(calamine::Error::Msg("workbook has no worksheets"))??;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());

    let headers = rows
        .next()
        .map(|header| header.into_iter().map(|h| h.trim().to_string()).collect())
        .unwrap_or_default();

    Ok(SheetTable {
        headers,
        rows: rows.collect(),
    })
}

fn load_csv(path: &Path) -> Result<SheetTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(SheetTable { headers, rows })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        // f64 Display 不會產生科學記號，整數值也不帶小數
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Turns rows into leads in sheet order, dropping rows without a usable phone.
pub fn extract_leads(table: &SheetTable) -> Result<Vec<Lead>> {
    let phone_idx = table
        .column_index(PHONE_COLUMN)
        .ok_or_else(|| ImportError::MissingColumn {
            column: PHONE_COLUMN.to_string(),
        })?;
    let comments_idx = table.column_index(COMMENTS_COLUMN);

    let mut leads = Vec::new();
    for (row_no, row) in table.rows.iter().enumerate() {
        let raw = row.get(phone_idx).map(String::as_str).unwrap_or_default();
        let Some(phone) = normalize_phone(raw) else {
            tracing::debug!("Skipping row {}: no phone ({:?})", row_no + 2, raw);
            continue;
        };

        let comments = comments_idx
            .and_then(|idx| row.get(idx))
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        leads.push(Lead { phone, comments });
    }

    Ok(leads)
}

/// Trims the cell and strips one trailing `.0` left by numeric auto-typing.
/// Returns `None` for blank cells and `nan` in any case.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let phone = trimmed.strip_suffix(".0").unwrap_or(trimmed).trim();

    if phone.is_empty() || phone.eq_ignore_ascii_case("nan") {
        return None;
    }

    Some(phone.to_string())
}
