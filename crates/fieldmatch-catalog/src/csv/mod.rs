#![deny(unsafe_code)]

//! Readers for the individual catalog CSV files.

pub mod fields;
pub mod models;
pub mod selections;
pub mod tables;

use std::path::Path;

use crate::error::CatalogError;

/// A parsed CSV file: header row plus records, with the source path kept for errors.
pub(crate) struct CsvTable<'a> {
    path: &'a Path,
    headers: ::csv::StringRecord,
    records: Vec<::csv::StringRecord>,
}

impl<'a> CsvTable<'a> {
    pub(crate) fn read(path: &'a Path) -> Result<Self, CatalogError> {
        let bytes = std::fs::read(path).map_err(|e| CatalogError::io(path, e))?;
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes.as_slice());
        let headers = reader
            .headers()
            .map_err(|e| CatalogError::csv(path, &e))?
            .clone();
        let mut records = Vec::new();
        for record in reader.records() {
            records.push(record.map_err(|e| CatalogError::csv(path, &e))?);
        }
        Ok(Self {
            path,
            headers,
            records,
        })
    }

    /// Index of the first header matching any of `names` (case-insensitive, BOM-tolerant).
    pub(crate) fn column(&self, names: &[&str]) -> Option<usize> {
        self.headers.iter().position(|header| {
            let header = header.trim_matches('\u{feff}').trim();
            names.iter().any(|name| header.eq_ignore_ascii_case(name))
        })
    }

    pub(crate) fn required_column(&self, names: &[&str]) -> Result<usize, CatalogError> {
        self.column(names).ok_or_else(|| CatalogError::MissingColumn {
            path: self.path.to_path_buf(),
            column: names.first().copied().unwrap_or_default().to_string(),
        })
    }

    pub(crate) fn records(&self) -> &[::csv::StringRecord] {
        &self.records
    }

    pub(crate) fn path(&self) -> &Path {
        self.path
    }
}

pub(crate) fn get_string(row: &::csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn get_bool(row: &::csv::StringRecord, idx: Option<usize>) -> bool {
    get_string(row, idx).is_some_and(|value| {
        matches!(
            value.to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "y" | "x"
        )
    })
}
