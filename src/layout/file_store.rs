use crate::layout::store::{GeometryPatch, GeometryPersistence, StoredGeometry};
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const GEOMETRY_FILE_NAME: &str = "window_geometry.json";

pub fn geometry_path_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(GEOMETRY_FILE_NAME))
}

pub fn resolve_geometry_path() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    geometry_path_from_exe_path(&exe_path)
}

/// JSON document of `label -> geometry` records, rewritten on every save.
pub struct JsonGeometryStore {
    path: PathBuf,
    records: Mutex<BTreeMap<String, StoredGeometry>>,
}

impl JsonGeometryStore {
    pub fn open(path: &Path) -> Result<Self> {
        let records = load_records(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            records: Mutex::new(records),
        })
    }

    pub fn open_default() -> Result<Self> {
        let path = resolve_geometry_path()?;
        Self::open(&path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn load_records(path: &Path) -> Result<BTreeMap<String, StoredGeometry>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read window geometry file {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_str(&content)
        .with_context(|| format!("deserialize window geometry file {}", path.display()))
}

fn save_records(path: &Path, records: &BTreeMap<String, StoredGeometry>) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create window geometry folder {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(records).context("serialize window geometry")?;
    std::fs::write(path, json)
        .with_context(|| format!("write window geometry file {}", path.display()))
}

impl GeometryPersistence for JsonGeometryStore {
    fn get_window_geometry(&self, label: &str) -> Result<Option<StoredGeometry>> {
        let records = self
            .records
            .lock()
            .map_err(|_| anyhow!("window geometry lock poisoned"))?;
        Ok(records.get(label).copied())
    }

    fn save_window_geometry(&self, label: &str, patch: &GeometryPatch) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| anyhow!("window geometry lock poisoned"))?;
        records.entry(label.to_string()).or_default().merge(patch);
        save_records(&self.path, &records)
            .with_context(|| format!("save geometry for window {label}"))
    }
}
