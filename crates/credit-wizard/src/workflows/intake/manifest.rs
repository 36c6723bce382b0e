use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::domain::CandidateFile;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    Csv(#[from] csv::Error),
}

/// Read a `name,content_type,size` CSV listing into intake candidates.
pub fn parse_manifest<R: Read>(reader: R) -> Result<Vec<CandidateFile>, ManifestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut candidates = Vec::new();

    for record in csv_reader.deserialize::<ManifestRow>() {
        let row = record?;
        candidates.push(CandidateFile {
            name: row.name,
            content_type: row.content_type.unwrap_or_default(),
            size: row.size,
        });
    }

    Ok(candidates)
}

pub fn read_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<CandidateFile>, ManifestError> {
    let file = File::open(path)?;
    parse_manifest(file)
}

#[derive(Debug, Deserialize)]
struct ManifestRow {
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    content_type: Option<String>,
    #[serde(default)]
    size: u64,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|raw| !raw.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn manifest_rows_become_candidates_in_order() {
        let csv = "name,content_type,size\n\
                   bankstmt1.pdf, application/pdf ,1048576\n\
                   photo.jpg,image/jpeg,2048\n\
                   notes.pdf,,10\n";

        let candidates = parse_manifest(Cursor::new(csv)).expect("manifest parses");

        assert_eq!(candidates.len(), 3);
        assert_eq!(
            candidates[0],
            CandidateFile::new("bankstmt1.pdf", "application/pdf", 1_048_576)
        );
        assert_eq!(candidates[1].content_type, "image/jpeg");
        assert_eq!(candidates[2].content_type, "");
    }

    #[test]
    fn malformed_size_is_a_csv_error() {
        let csv = "name,content_type,size\nbank.pdf,application/pdf,huge\n";
        let err = parse_manifest(Cursor::new(csv)).expect_err("size must be numeric");
        assert!(matches!(err, ManifestError::Csv(_)));
    }
}
