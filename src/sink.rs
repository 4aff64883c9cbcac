//! Persisting accumulated search results.
//!
//! Two durable forms: the raw records as a JSON file, and a flat CSV
//! table for spreadsheet or dataframe import. Both overwrite the
//! target file.

use std::fs;
use std::path::Path;

use crate::models::SearchResult;
use crate::Result;

/// Write the collected records as a pretty-printed JSON array.
pub fn write_json(result: &SearchResult, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(&result.items)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write the collected records as a CSV table, one row per article.
pub fn write_csv(result: &SearchResult, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "pii",
        "doi",
        "title",
        "journal",
        "load_date",
        "publication_date",
    ])?;

    for article in result {
        writer.write_record([
            article.pii.as_ref().map(|p| p.as_str()).unwrap_or(""),
            article.doi.as_ref().map(|d| d.as_str()).unwrap_or(""),
            article.title.as_deref().unwrap_or(""),
            article.source_title.as_deref().unwrap_or(""),
            article.load_date.as_deref().unwrap_or(""),
            article.publication_date.as_deref().unwrap_or(""),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
