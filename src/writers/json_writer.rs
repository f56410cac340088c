use crate::error::{ProcessingError, Result};
use crate::models::StationSummary;
use crate::processors::StationTable;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Top-level JSON document: `{"cities": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsDocument {
    pub cities: Vec<StationSummary>,
}

impl ResultsDocument {
    /// Summaries ordered by ascending standard deviation, ties by station name.
    pub fn from_table(table: &StationTable) -> Self {
        let mut cities: Vec<StationSummary> = table
            .iter()
            .map(|(name, stats)| StationSummary::new(String::from_utf8_lossy(name).into_owned(), stats))
            .collect();

        cities.sort_by(|a, b| a.std.total_cmp(&b.std).then_with(|| a.name.cmp(&b.name)));

        Self { cities }
    }
}

pub struct JsonWriter {
    pretty: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Export the table to `path`, returning the number of stations written.
    ///
    /// The document is written to a temporary file beside `path` and renamed
    /// into place, so a failed export leaves no partial file behind.
    pub fn write_results(&self, table: &StationTable, path: &Path) -> Result<usize> {
        let document = ResultsDocument::from_table(table);

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;
        {
            let mut out = BufWriter::new(temp.as_file_mut());
            self.write_document(&document, &mut out)?;
            out.flush()?;
        }
        temp.persist(path)
            .map_err(|e| ProcessingError::Io(e.error))?;

        info!(output = %path.display(), stations = document.cities.len(), "results written");
        Ok(document.cities.len())
    }

    pub fn write_document<W: Write>(&self, document: &ResultsDocument, writer: W) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(writer, document)?;
        } else {
            serde_json::to_writer(writer, document)?;
        }
        Ok(())
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn scenario_table() -> StationTable {
        let mut table = StationTable::new();
        table.record(b"Tokyo", 154);
        table.record(b"Tokyo", 160);
        table.record(b"Paris", -37);
        table
    }

    #[test]
    fn test_sorted_by_ascending_stddev() {
        let document = ResultsDocument::from_table(&scenario_table());
        let names: Vec<&str> = document.cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Paris", "Tokyo"]);
    }

    #[test]
    fn test_ties_broken_by_name() {
        let mut table = StationTable::new();
        for name in [&b"Zurich"[..], b"Accra", b"Minsk"] {
            table.record(name, 100);
        }
        let document = ResultsDocument::from_table(&table);
        let names: Vec<&str> = document.cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Accra", "Minsk", "Zurich"]);
    }

    #[test]
    fn test_compact_json_layout() -> Result<()> {
        let mut table = StationTable::new();
        table.record(b"Paris", -37);
        table.record(b"Oslo", 160);
        table.record(b"Oslo", 160);

        let mut out = Vec::new();
        JsonWriter::new()
            .with_pretty(false)
            .write_document(&ResultsDocument::from_table(&table), &mut out)?;

        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"{"cities":[{"name":"Oslo","avg":16.0,"std":0.0,"min":16.0,"max":16.0},{"name":"Paris","avg":-3.7,"std":0.0,"min":-3.7,"max":-3.7}]}"#
        );
        Ok(())
    }

    #[test]
    fn test_write_results_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("results.json");

        let written = JsonWriter::new().write_results(&scenario_table(), &path)?;
        assert_eq!(written, 2);

        let text = std::fs::read_to_string(&path)?;
        let document: ResultsDocument = serde_json::from_str(&text)?;
        assert_eq!(document.cities[0].name, "Paris");
        assert_eq!(document.cities[0].min, -3.7);
        assert_eq!(document.cities[1].name, "Tokyo");
        assert_eq!(document.cities[1].max, 16.0);
        assert!((document.cities[1].std - 0.3).abs() < 1e-9);

        // Only the results file remains, no temporary leftovers.
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("results.json");
        let result = JsonWriter::new().write_results(&scenario_table(), &path);
        assert!(matches!(result, Err(ProcessingError::Io(_))));
        assert!(!path.exists());
    }
}
