///! Typed failures for dataset loading, wiki import and caught-state storage.
///!
///! Domain data itself never fails: unparseable times, missing prices and
///! empty filters all have defined fallbacks inside the table engine.

use critterdex_common::Species;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CritterError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset {path}: {source}")]
    Dataset {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no creature table found in page")]
    TableNotFound,

    #[error("no {0} rows found in page, dataset left unchanged")]
    EmptyImport(Species),

    #[error("selector error: {0}")]
    Selector(String),

    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CritterError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        CritterError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

pub type CritterResult<T> = std::result::Result<T, CritterError>;
