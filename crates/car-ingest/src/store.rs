//! Session-scoped cache of validated result records.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use car_model::{ConfidenceLevel, DataError, DataErrorKind, ResultRecord, SourceInfo, StoneId};

use crate::discovery::{RESULT_SUFFIX, discover_stones, list_result_files, locate_result_file};
use crate::error::{IngestError, Result};
use crate::hash::sha256_hex;
use crate::schema::ResultFile;
use crate::validate::build_record;

/// Read access to loaded records, by stone.
///
/// Implemented by [`ResultStore`]; renderers only need this seam.
pub trait RecordLookup {
    fn lookup(&self, stone: &StoneId) -> std::result::Result<Arc<ResultRecord>, DataError>;
}

/// Loads one record per stone from a results directory and keeps it for
/// the lifetime of the store.
///
/// Failed loads are not cached, so a corrected file is picked up on the
/// next request. The cache may be populated from several threads; the
/// first record inserted for a stone wins.
#[derive(Debug)]
pub struct ResultStore {
    root: PathBuf,
    cache: Mutex<BTreeMap<StoneId, Arc<ResultRecord>>>,
}

impl ResultStore {
    /// Bind a store to an existing results directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(IngestError::DirectoryNotFound { path: root });
        }
        Ok(Self {
            root,
            cache: Mutex::new(BTreeMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Record for `stone`, loading and validating it on first request.
    pub fn get(&self, stone: &StoneId) -> std::result::Result<Arc<ResultRecord>, DataError> {
        if let Some(record) = self.lock().get(stone) {
            return Ok(Arc::clone(record));
        }

        let record = match self.load(stone) {
            Ok(record) => Arc::new(record),
            Err(kind) => {
                let error = DataError::new(stone.clone(), kind);
                warn!(stone = %stone, error = %error.kind, "result file rejected");
                return Err(error);
            }
        };

        let mut cache = self.lock();
        let cached = cache
            .entry(stone.clone())
            .or_insert_with(|| Arc::clone(&record));
        info!(
            stone = %stone,
            levels = cached.levels().len(),
            points = cached.time().len(),
            "result record cached"
        );
        Ok(Arc::clone(cached))
    }

    /// Cached record, without loading.
    pub fn cached(&self, stone: &StoneId) -> Option<Arc<ResultRecord>> {
        self.lock().get(stone).cloned()
    }

    pub fn cached_count(&self) -> usize {
        self.lock().len()
    }

    /// Stones with a result file in the directory.
    pub fn discover(&self) -> Result<Vec<StoneId>> {
        discover_stones(&self.root)
    }

    /// Load every discovered stone, keeping per-stone outcomes.
    pub fn load_all(
        &self,
    ) -> Result<Vec<(StoneId, std::result::Result<Arc<ResultRecord>, DataError>)>> {
        let stones = self.discover()?;
        Ok(stones
            .into_iter()
            .map(|stone| {
                let outcome = self.get(&stone);
                (stone, outcome)
            })
            .collect())
    }

    /// Union of levels across cached records, highest confidence first.
    pub fn available_levels(&self) -> Vec<ConfidenceLevel> {
        let levels: BTreeSet<ConfidenceLevel> = self
            .lock()
            .values()
            .flat_map(|record| record.levels())
            .collect();
        levels.into_iter().rev().collect()
    }

    fn load(&self, stone: &StoneId) -> std::result::Result<ResultRecord, DataErrorKind> {
        let path = self.locate(stone)?;
        debug!(stone = %stone, path = %path.display(), "loading result file");

        let bytes = std::fs::read(&path).map_err(|source| DataErrorKind::SourceRead {
            path: path.clone(),
            source,
        })?;
        let file = ResultFile::from_slice(&bytes).map_err(|e| DataErrorKind::Malformed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let source = SourceInfo {
            sha256: sha256_hex(&bytes),
            path,
        };

        build_record(stone, source, file)
    }

    fn locate(&self, stone: &StoneId) -> std::result::Result<PathBuf, DataErrorKind> {
        let files = list_result_files(&self.root).map_err(|e| match e {
            IngestError::DirectoryRead { path, source } => {
                DataErrorKind::SourceRead { path, source }
            }
            IngestError::DirectoryNotFound { path } => DataErrorKind::SourceMissing { path },
        })?;
        locate_result_file(&files, stone).ok_or_else(|| DataErrorKind::SourceMissing {
            path: self.root.join(format!("{stone}{RESULT_SUFFIX}.json")),
        })
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<StoneId, Arc<ResultRecord>>> {
        // Records are immutable Arcs, so a poisoned map is still consistent.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordLookup for ResultStore {
    fn lookup(&self, stone: &StoneId) -> std::result::Result<Arc<ResultRecord>, DataError> {
        self.get(stone)
    }
}
