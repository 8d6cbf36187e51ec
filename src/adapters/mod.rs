// Adapters layer: concrete implementations for external systems (spreadsheets, Bitrix24 REST).

pub mod bitrix;
pub mod spreadsheet;
