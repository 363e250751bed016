use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use omni_core::model::{CatalogEntry, QuestionSet, SetId, SetMetadata};

use crate::error::CatalogError;

/// File name of the catalog index inside the data root.
pub const INDEX_FILE: &str = "sets-index.json";

/// Directory of set documents inside the data root.
pub const SETS_DIR: &str = "sets";

/// Where the catalog index and set documents live.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// A local data directory containing `sets-index.json` and `sets/`.
    Directory(PathBuf),
    /// A remote base URL with the same layout. Must end with a slash so
    /// relative segments resolve underneath it.
    Remote(Url),
}

/// Loads the catalog index and full question-set documents.
#[derive(Clone)]
pub struct CatalogService {
    source: CatalogSource,
    http: reqwest::Client,
}

impl CatalogService {
    #[must_use]
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            http: reqwest::Client::new(),
        }
    }

    #[must_use]
    pub fn from_directory(path: impl Into<PathBuf>) -> Self {
        Self::new(CatalogSource::Directory(path.into()))
    }

    #[must_use]
    pub fn from_remote(base: Url) -> Self {
        Self::new(CatalogSource::Remote(base))
    }

    /// Fetch the catalog index.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the index cannot be read or parsed.
    pub async fn load_index(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let raw = self.fetch(INDEX_FILE).await?;
        serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
            name: INDEX_FILE.to_owned(),
            source,
        })
    }

    /// Fetch and validate the full question set behind a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the document cannot be read, parsed, or
    /// fails validation (bad metadata or out-of-range answer indices).
    pub async fn load_set(&self, entry: &CatalogEntry) -> Result<QuestionSet, CatalogError> {
        let raw = self.fetch(&format!("{SETS_DIR}/{}", entry.file)).await?;
        let set: QuestionSet =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                name: entry.file.clone(),
                source,
            })?;
        set.validate().map_err(|source| CatalogError::Invalid {
            name: entry.file.clone(),
            source,
        })?;
        Ok(set)
    }

    async fn fetch(&self, segment: &str) -> Result<String, CatalogError> {
        match &self.source {
            CatalogSource::Directory(dir) => {
                let path = dir.join(segment);
                std::fs::read_to_string(&path)
                    .map_err(|source| CatalogError::Io { path, source })
            }
            CatalogSource::Remote(base) => {
                let url = base.join(segment).map_err(|_| CatalogError::InvalidUrl {
                    segment: segment.to_owned(),
                })?;
                let response = self
                    .http
                    .get(url.clone())
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(|source| CatalogError::Http {
                        url: url.to_string(),
                        source,
                    })?;
                response.text().await.map_err(|source| CatalogError::Http {
                    url: url.to_string(),
                    source,
                })
            }
        }
    }
}

//
// ─── INDEX GENERATION ──────────────────────────────────────────────────────────
//

#[derive(Deserialize)]
struct MetadataOnly {
    metadata: SetMetadata,
}

/// Scan a directory of set documents into catalog entries.
///
/// Documents that fail to parse or validate are skipped and logged, so one
/// broken set never blocks the rest of the catalog. Entries are ordered by
/// file name for a stable index.
///
/// # Errors
///
/// Returns `CatalogError::Io` if the directory itself cannot be read.
pub fn build_index(sets_dir: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
    let read_dir = std::fs::read_dir(sets_dir).map_err(|source| CatalogError::Io {
        path: sets_dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<String> = read_dir
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".json"))
        .collect();
    files.sort();

    let mut entries = Vec::new();
    for file in files {
        let path = sets_dir.join(&file);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(file = %file, error = %err, "skipping unreadable set document");
                continue;
            }
        };
        let doc: MetadataOnly = match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(file = %file, error = %err, "skipping unparseable set document");
                continue;
            }
        };
        if let Err(err) = doc.metadata.validate() {
            tracing::warn!(file = %file, error = %err, "skipping set document with invalid metadata");
            continue;
        }

        let stem = file.trim_end_matches(".json");
        entries.push(CatalogEntry::from_metadata(
            SetId::new(stem),
            file.clone(),
            &doc.metadata,
        ));
        tracing::info!(file = %file, title = %doc.metadata.title, "indexed set document");
    }

    Ok(entries)
}

/// Generate `sets-index.json` next to a sets directory.
///
/// Returns the number of indexed sets.
///
/// # Errors
///
/// Returns `CatalogError` if scanning fails or the index cannot be written.
pub fn write_index(sets_dir: &Path, out_file: &Path) -> Result<usize, CatalogError> {
    let entries = build_index(sets_dir)?;
    let json = serde_json::to_string_pretty(&entries).map_err(|source| CatalogError::Parse {
        name: INDEX_FILE.to_owned(),
        source,
    })?;
    std::fs::write(out_file, json).map_err(|source| CatalogError::Io {
        path: out_file.to_path_buf(),
        source,
    })?;
    Ok(entries.len())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    const SET_DOC: &str = r#"{
        "metadata": {
            "title": "Sample Exam",
            "description": "Two questions",
            "totalQuestions": 2,
            "timeLimit": 5,
            "passLine": 50
        },
        "questions": [
            {
                "majorCategory": "General",
                "question": "Pick A",
                "options": ["A", "B"],
                "answer": 0,
                "explanation": "A is right"
            },
            {
                "majorCategory": "General",
                "question": "Pick both",
                "options": ["A", "B", "C"],
                "answer": [0, 2],
                "explanation": "A and C"
            }
        ]
    }"#;

    fn data_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "omnimock-catalog-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let sets = dir.join(SETS_DIR);
        std::fs::create_dir_all(&sets).unwrap();
        std::fs::write(sets.join("sample.json"), SET_DOC).unwrap();
        std::fs::write(sets.join("broken.json"), "{ nope").unwrap();
        dir
    }

    #[test]
    fn build_index_skips_broken_documents() {
        let dir = data_dir();
        let entries = build_index(&dir.join(SETS_DIR)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, SetId::new("sample"));
        assert_eq!(entries[0].file, "sample.json");
        assert_eq!(entries[0].total_questions, 2);
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn directory_source_loads_index_and_set() {
        let dir = data_dir();
        let written = write_index(&dir.join(SETS_DIR), &dir.join(INDEX_FILE)).unwrap();
        assert_eq!(written, 1);

        let service = CatalogService::from_directory(&dir);
        let index = service.load_index().await.unwrap();
        assert_eq!(index.len(), 1);

        let set = service.load_set(&index[0]).await.unwrap();
        assert_eq!(set.questions.len(), 2);
        assert_eq!(set.metadata.pass_line, 50);
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn missing_set_surfaces_io_error() {
        let dir = data_dir();
        let entry = CatalogEntry {
            id: SetId::new("ghost"),
            file: "ghost.json".to_owned(),
            title: "Ghost".to_owned(),
            description: String::new(),
            total_questions: 1,
            time_limit: 1,
            pass_line: 50,
        };
        let service = CatalogService::from_directory(&dir);
        let err = service.load_set(&entry).await.unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        std::fs::remove_dir_all(dir).ok();
    }
}
