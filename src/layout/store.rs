use crate::layout::model::{LogicalSize, PhysicalPosition, PhysicalSize};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Partial physical-pixel geometry merged into the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeometryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl GeometryPatch {
    pub fn position(position: PhysicalPosition) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Self::default()
        }
    }

    pub fn size(size: PhysicalSize) -> Self {
        Self {
            width: Some(size.width),
            height: Some(size.height),
            ..Self::default()
        }
    }

    pub fn full(position: PhysicalPosition, size: PhysicalSize) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            width: Some(size.width),
            height: Some(size.height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.width.is_none() && self.height.is_none()
    }
}

/// A stored record. Any field may be missing when only part of the geometry
/// was ever saved.
pub type StoredGeometry = GeometryPatch;

impl StoredGeometry {
    pub fn merge(&mut self, patch: &GeometryPatch) {
        if patch.x.is_some() {
            self.x = patch.x;
        }
        if patch.y.is_some() {
            self.y = patch.y;
        }
        if patch.width.is_some() {
            self.width = patch.width;
        }
        if patch.height.is_some() {
            self.height = patch.height;
        }
    }

    pub fn stored_position(&self) -> Option<PhysicalPosition> {
        Some(PhysicalPosition::new(self.x?, self.y?))
    }

    pub fn stored_size(&self) -> Option<PhysicalSize> {
        Some(PhysicalSize::new(self.width?, self.height?))
    }
}

/// Durable per-label geometry storage owned by the host.
pub trait GeometryPersistence: Send + Sync {
    fn get_window_geometry(&self, label: &str) -> Result<Option<StoredGeometry>>;
    fn save_window_geometry(&self, label: &str, patch: &GeometryPatch) -> Result<()>;
}

/// Small string key/value cache kept from before geometry moved into the
/// persistence service. Only read as a fallback and mirrored on writes.
#[derive(Debug, Default)]
pub struct LegacyCache {
    path: Option<PathBuf>,
    values: Mutex<HashMap<String, String>>,
}

impl LegacyCache {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a JSON-backed cache. A missing or empty file is an empty cache.
    pub fn open(path: &Path) -> Result<Self> {
        let values = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("read legacy cache {}", path.display()))?;
            if content.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&content)
                    .with_context(|| format!("deserialize legacy cache {}", path.display()))?
            }
        } else {
            HashMap::new()
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            values: Mutex::new(values),
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    pub fn set(&self, key: &str, value: String) -> Result<()> {
        {
            let mut values = self
                .values
                .lock()
                .map_err(|_| anyhow::anyhow!("legacy cache lock poisoned"))?;
            values.insert(key.to_string(), value);
        }
        self.flush()
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        {
            let mut values = self
                .values
                .lock()
                .map_err(|_| anyhow::anyhow!("legacy cache lock poisoned"))?;
            values.remove(key);
        }
        self.flush()
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = {
            let values = self
                .values
                .lock()
                .map_err(|_| anyhow::anyhow!("legacy cache lock poisoned"))?;
            serde_json::to_string_pretty(&*values).context("serialize legacy cache")?
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create legacy cache folder {}", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("write legacy cache {}", path.display()))
    }

    fn get_number<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key)?.trim().parse().ok()
    }
}

/// Per-window view over the persistence service and the legacy cache.
///
/// Failures are logged here and never propagated: the in-memory remembered
/// geometry stays authoritative for the session.
#[derive(Clone)]
pub struct GeometryStoreAdapter {
    label: String,
    persistence: Arc<dyn GeometryPersistence>,
    legacy: Arc<LegacyCache>,
}

impl GeometryStoreAdapter {
    pub fn new(
        label: &str,
        persistence: Arc<dyn GeometryPersistence>,
        legacy: Arc<LegacyCache>,
    ) -> Self {
        Self {
            label: label.to_string(),
            persistence,
            legacy,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn load(&self) -> Option<StoredGeometry> {
        match self.persistence.get_window_geometry(&self.label) {
            Ok(stored) => {
                tracing::debug!(label = %self.label, ?stored, "loaded stored geometry");
                stored
            }
            Err(err) => {
                tracing::warn!(label = %self.label, error = %err, "failed to load stored geometry");
                None
            }
        }
    }

    /// Returns whether the write reached the persistence service.
    pub fn save(&self, patch: &GeometryPatch) -> bool {
        if patch.is_empty() {
            return true;
        }
        match self.persistence.save_window_geometry(&self.label, patch) {
            Ok(()) => {
                tracing::info!(label = %self.label, ?patch, "persisted window geometry");
                true
            }
            Err(err) => {
                tracing::warn!(label = %self.label, error = %err, ?patch, "failed to persist window geometry");
                false
            }
        }
    }

    fn legacy_key(&self, suffix: &str) -> String {
        format!("{}-{}", self.label, suffix)
    }

    pub fn legacy_position(&self) -> Option<PhysicalPosition> {
        let x = self.legacy.get_number(&self.legacy_key("pos-x"))?;
        let y = self.legacy.get_number(&self.legacy_key("pos-y"))?;
        Some(PhysicalPosition::new(x, y))
    }

    pub fn legacy_width(&self) -> Option<u32> {
        self.legacy.get_number(&self.legacy_key("width"))
    }

    pub fn legacy_height(&self) -> Option<u32> {
        self.legacy.get_number(&self.legacy_key("height"))
    }

    pub fn mirror_position(&self, position: PhysicalPosition) {
        let result = self
            .legacy
            .set(&self.legacy_key("pos-x"), position.x.to_string())
            .and_then(|_| {
                self.legacy
                    .set(&self.legacy_key("pos-y"), position.y.to_string())
            });
        if let Err(err) = result {
            tracing::warn!(label = %self.label, error = %err, "failed to mirror position into legacy cache");
        }
    }

    /// Mirror the logical size; `height` is skipped when it should not
    /// become the remembered height.
    pub fn mirror_size(&self, width: u32, height: Option<u32>) {
        let mut result = self.legacy.set(&self.legacy_key("width"), width.to_string());
        if let Some(height) = height {
            result = result.and_then(|_| {
                self.legacy
                    .set(&self.legacy_key("height"), height.to_string())
            });
        }
        if let Err(err) = result {
            tracing::warn!(label = %self.label, error = %err, "failed to mirror size into legacy cache");
        }
    }

    pub fn mirror_logical_size(&self, size: LogicalSize) {
        self.mirror_size(size.width, Some(size.height));
    }

    pub fn forget_legacy_position(&self) {
        let result = self
            .legacy
            .remove(&self.legacy_key("pos-x"))
            .and_then(|_| self.legacy.remove(&self.legacy_key("pos-y")));
        if let Err(err) = result {
            tracing::warn!(label = %self.label, error = %err, "failed to clear legacy position");
        }
    }
}
