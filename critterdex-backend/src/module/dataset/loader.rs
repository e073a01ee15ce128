use std::collections::HashSet;
use std::path::{Path, PathBuf};

use critterdex_common::{Record, Species};
use tokio::fs;
use tracing::{info, warn};

use crate::error::{CritterError, CritterResult};

/// File name of a species collection inside the data directory
pub fn dataset_file(species: Species) -> &'static str {
    match species {
        Species::Fish => "fishes.json",
        Species::Bug => "bugs.json",
    }
}

/// Immutable base dataset: fish first, then bugs, each in file order
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    fish: Vec<Record>,
    bugs: Vec<Record>,
}

impl RecordStore {
    pub fn new(fish: Vec<Record>, bugs: Vec<Record>) -> Self {
        Self {
            fish: prepare(fish, Species::Fish),
            bugs: prepare(bugs, Species::Bug),
        }
    }

    /// Load both collections from `data_dir`.
    ///
    /// A missing collection file loads as empty; a malformed one is an error.
    pub async fn load_dir(data_dir: impl AsRef<Path>) -> CritterResult<Self> {
        let data_dir = data_dir.as_ref();
        let fish = load_collection(&data_dir.join(dataset_file(Species::Fish))).await?;
        let bugs = load_collection(&data_dir.join(dataset_file(Species::Bug))).await?;

        let store = Self::new(fish, bugs);
        info!(
            "Loaded {} fish and {} bugs from {:?}",
            store.fish.len(),
            store.bugs.len(),
            data_dir
        );
        Ok(store)
    }

    pub fn collection(&self, species: Species) -> &[Record] {
        match species {
            Species::Fish => &self.fish,
            Species::Bug => &self.bugs,
        }
    }

    /// Every record in display order
    pub fn all(&self) -> Vec<Record> {
        self.fish.iter().chain(self.bugs.iter()).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.fish.len() + self.bugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Swap one collection, as after an import
    pub fn replace(&mut self, species: Species, records: Vec<Record>) {
        let records = prepare(records, species);
        match species {
            Species::Fish => self.fish = records,
            Species::Bug => self.bugs = records,
        }
    }
}

async fn load_collection(path: &Path) -> CritterResult<Vec<Record>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Dataset file {:?} not found, collection is empty", path);
            return Ok(Vec::new());
        }
        Err(e) => return Err(CritterError::io(path, e)),
    };

    serde_json::from_str(&content).map_err(|source| CritterError::Dataset {
        path: path.display().to_string(),
        source,
    })
}

/// Stamp the species tag and drop repeated names, keeping the first.
fn prepare(records: Vec<Record>, species: Species) -> Vec<Record> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter_map(|mut record| {
            if !seen.insert(record.name.clone()) {
                warn!("Duplicate {} '{}' dropped", species, record.name);
                return None;
            }
            record.species = species;
            Some(record)
        })
        .collect()
}

/// Write a collection as pretty JSON, the format `load_dir` reads back
pub async fn save_collection(data_dir: impl AsRef<Path>, species: Species, records: &[Record]) -> CritterResult<PathBuf> {
    let data_dir = data_dir.as_ref();
    fs::create_dir_all(data_dir)
        .await
        .map_err(|e| CritterError::io(data_dir, e))?;

    let path = data_dir.join(dataset_file(species));
    let content = serde_json::to_string_pretty(records)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)
        .await
        .map_err(|e| CritterError::io(&tmp, e))?;
    fs::rename(&tmp, &path)
        .await
        .map_err(|e| CritterError::io(&path, e))?;

    info!("Saved {} {} records to {:?}", records.len(), species, path);
    Ok(path)
}
