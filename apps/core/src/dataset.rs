use std::path::PathBuf;

use crate::model::{Dataset, Item, ItemRecord};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch dataset: {0}")]
    Http(#[from] reqwest::Error),
    #[error("dataset is not valid JSON: {0}")]
    Malformed(String),
    #[error("dataset must be a JSON array of items")]
    NotAnArray,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    Url(String),
}

impl DatasetSource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Fetches the dataset once. There is no retry; callers treat an error as
/// terminal for the session.
pub async fn fetch(source: &DatasetSource) -> Result<Dataset, LoadError> {
    let raw = match source {
        DatasetSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?
        }
        DatasetSource::Url(url) => {
            reqwest::get(url.as_str())
                .await?
                .error_for_status()?
                .text()
                .await?
        }
    };

    let dataset = parse_dataset(&raw)?;
    tracing::info!(source = %source, items = dataset.len(), "dataset loaded");
    Ok(dataset)
}

/// Strict JSON first, JSON5 as a fallback. Entries that do not fit the item
/// shape are skipped so one bad record does not take the catalogue down.
pub fn parse_dataset(raw: &str) -> Result<Dataset, LoadError> {
    let value = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => value,
        Err(json_error) => json5::from_str::<serde_json::Value>(raw)
            .map_err(|_| LoadError::Malformed(json_error.to_string()))?,
    };

    let serde_json::Value::Array(entries) = value else {
        return Err(LoadError::NotAnArray);
    };

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<ItemRecord>(entry) {
            Ok(record) => items.push(Item::from_record(record)),
            Err(error) => tracing::warn!(index, %error, "skipping malformed dataset entry"),
        }
    }

    Ok(Dataset::from_items(items))
}
