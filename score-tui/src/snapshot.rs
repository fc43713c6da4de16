use score_types::{Game, PlayerProfile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SNAPSHOT_DIR: &str = "plink";
const SNAPSHOT_FILE: &str = "snapshot.json";
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("no data directory available (set SCORE_SNAPSHOT, XDG_DATA_HOME or HOME)")]
    NoDataDir,
    #[error("failed to read snapshot")]
    Read(#[source] io::Error),
    #[error("failed to write snapshot")]
    Write(#[source] io::Error),
    #[error("snapshot is not valid JSON")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported snapshot version {0}")]
    Version(u32),
}

/// On-disk session state. The version gate means an incompatible file
/// is ignored wholesale instead of half-loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    version: u32,
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub profiles: Vec<PlayerProfile>,
}

pub fn load(path_override: Option<&Path>) -> Result<Snapshot, SnapshotError> {
    let path = resolve_path(path_override)?;
    let raw = fs::read_to_string(&path).map_err(SnapshotError::Read)?;
    let snapshot = serde_json::from_str::<Snapshot>(&raw)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::Version(snapshot.version));
    }
    Ok(snapshot)
}

pub fn save(
    games: &[Game],
    profiles: &[PlayerProfile],
    path_override: Option<&Path>,
) -> Result<(), SnapshotError> {
    let path = resolve_path(path_override)?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(SnapshotError::Write)?;
    }
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        games: games.to_vec(),
        profiles: profiles.to_vec(),
    };
    let json = serde_json::to_string(&snapshot)?;
    // Write-then-rename so a crash mid-write never truncates the
    // previous snapshot.
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(SnapshotError::Write)?;
    fs::rename(&tmp, &path).map_err(SnapshotError::Write)?;
    Ok(())
}

fn resolve_path(path_override: Option<&Path>) -> Result<PathBuf, SnapshotError> {
    if let Some(path) = path_override {
        return Ok(path.to_path_buf());
    }
    if let Ok(base) = std::env::var("XDG_DATA_HOME") {
        if !base.trim().is_empty() {
            return Ok(PathBuf::from(base).join(SNAPSHOT_DIR).join(SNAPSHOT_FILE));
        }
    }
    let home = std::env::var("HOME").map_err(|_| SnapshotError::NoDataDir)?;
    if home.trim().is_empty() {
        return Err(SnapshotError::NoDataDir);
    }
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join(SNAPSHOT_DIR)
        .join(SNAPSHOT_FILE))
}
