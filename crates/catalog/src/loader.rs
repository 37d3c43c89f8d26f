use crate::error::{CatalogError, Result};
use crate::topics::TopicConfig;
use std::path::{Path, PathBuf};
use uxguide_search::{FieldSet, Record};

/// Rows of one CSV file, ready to hand to the search orchestrator.
#[derive(Debug, Clone)]
pub struct Table {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    /// Read `path` with a header row. Short rows keep only the columns they have.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|source| csv_error(path, source))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|source| csv_error(path, source))?
            .iter()
            .map(|header| header.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|source| csv_error(path, source))?;
            records.push(Record::from_pairs(
                headers.iter().map(String::as_str).zip(row.iter()),
            ));
        }

        log::debug!("Loaded {} rows from {}", records.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            records,
        })
    }

    /// Log configured fields this table does not provide.
    pub fn warn_missing(&self, fields: &FieldSet) -> Vec<String> {
        let missing = fields.missing_from(&self.headers);
        if !missing.is_empty() {
            log::warn!(
                "{} has no column(s) {}; they are skipped",
                self.path.display(),
                missing.join(", ")
            );
        }
        missing
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load the table a topic (or stack) points at, relative to `data_dir`.
pub fn load_topic(data_dir: &Path, name: &str, config: &TopicConfig) -> Result<Table> {
    let path = data_dir.join(&config.file);
    if !path.is_file() {
        return Err(CatalogError::NotFound {
            topic: name.to_string(),
            path,
        });
    }
    let table = Table::load(&path)?;
    table.warn_missing(&config.fields);
    Ok(table)
}

fn csv_error(path: &Path, source: csv::Error) -> CatalogError {
    CatalogError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_rows_in_header_order() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "styles.csv",
            "Style Category,Keywords,Best For\nMinimalism,\"clean, simple\",SaaS\nBrutalism,raw,Portfolio\n",
        );
        let table = Table::load(&path).unwrap();
        assert_eq!(table.headers, vec!["Style Category", "Keywords", "Best For"]);
        assert_eq!(table.len(), 2);
        let first: Vec<(&str, &str)> = table.records[0].iter().collect();
        assert_eq!(
            first,
            vec![
                ("Style Category", "Minimalism"),
                ("Keywords", "clean, simple"),
                ("Best For", "SaaS"),
            ]
        );
    }

    #[test]
    fn short_rows_keep_present_columns_only() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "short.csv", "A,B,C\n1,2\n");
        let table = Table::load(&path).unwrap();
        assert_eq!(table.records[0].len(), 2);
        assert!(!table.records[0].contains("C"));
    }

    #[test]
    fn strips_byte_order_mark() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bom.csv", "\u{feff}Name,Value\nx,y\n");
        let table = Table::load(&path).unwrap();
        assert_eq!(table.headers[0], "Name");
        assert_eq!(table.records[0].get("Name"), Some("x"));
    }

    #[test]
    fn reports_missing_configured_fields() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "t.csv", "Name,Keywords\nx,y\n");
        let table = Table::load(&path).unwrap();
        let fields = FieldSet::new(["Name", "Notes"], ["Name", "Value", "Notes"]);
        assert_eq!(table.warn_missing(&fields), vec!["Notes", "Value"]);
    }

    #[test]
    fn missing_file_names_topic_and_path() {
        let dir = TempDir::new().unwrap();
        let config = TopicConfig {
            file: PathBuf::from("colors.csv"),
            fields: FieldSet::new(["Keywords"], ["Keywords"]),
        };
        let err = load_topic(dir.path(), "color", &config).unwrap_err();
        match &err {
            CatalogError::NotFound { topic, path } => {
                assert_eq!(topic, "color");
                assert_eq!(path, &dir.path().join("colors.csv"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("colors.csv"));
    }

    #[test]
    fn header_only_file_is_empty_table() {
        let dir = TempDir::new().unwrap();
        write(&dir, "stacks/vue.csv", "Category,Guideline\n");
        let config = TopicConfig {
            file: PathBuf::from("stacks/vue.csv"),
            fields: FieldSet::new(["Category"], ["Category"]),
        };
        let table = load_topic(dir.path(), "vue", &config).unwrap();
        assert!(table.is_empty());
    }
}
