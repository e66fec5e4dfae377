//! Result file discovery.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use car_model::StoneId;

use crate::error::{IngestError, Result};

/// Conventional suffix of result file stems (`A_CAR.json`).
pub const RESULT_SUFFIX: &str = "_CAR";

/// Lists all JSON files in a directory.
///
/// Returns files sorted by filename.
pub fn list_result_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Stone identifier for a result file: the stem with any `_CAR` suffix removed.
pub fn stone_id_from_path(path: &Path) -> Option<StoneId> {
    let stem = path.file_stem()?.to_str()?;
    let key = stem.strip_suffix(RESULT_SUFFIX).unwrap_or(stem);
    StoneId::new(key).ok()
}

/// Whether the file uses the conventional `_CAR` suffix.
pub fn has_result_suffix(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(RESULT_SUFFIX) && stem.len() > RESULT_SUFFIX.len())
}

/// Stones available in a directory, sorted and deduplicated.
pub fn discover_stones(dir: &Path) -> Result<Vec<StoneId>> {
    let stones: BTreeSet<StoneId> = list_result_files(dir)?
        .iter()
        .filter_map(|path| stone_id_from_path(path))
        .collect();
    Ok(stones.into_iter().collect())
}

/// Picks the file backing `stone` among `files`, preferring `<id>_CAR.json`
/// over `<id>.json`.
pub fn locate_result_file(files: &[PathBuf], stone: &StoneId) -> Option<PathBuf> {
    let mut matches: Vec<&PathBuf> = files
        .iter()
        .filter(|path| stone_id_from_path(path).as_ref() == Some(stone))
        .collect();
    matches.sort_by_key(|path| !has_result_suffix(path));
    matches.first().map(|path| (*path).clone())
}
