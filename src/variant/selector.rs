//! A/B store holding the active funnel variant, persisted across sessions.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::registry::FlowVariant;
use super::storage::VariantStorage;
use crate::error::{Result, StorageError};

/// Storage key for the persisted selection. Must stay stable across
/// releases so stored choices keep loading.
pub const STORAGE_KEY: &str = "ab-test-storage";

/// Envelope version written next to the state.
const RECORD_VERSION: u32 = 0;

/// On-disk record: `{"state":{"currentVersion":"v1"},"version":0}`.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedRecord {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    current_version: FlowVariant,
}

/// Holds the active variant and writes every change through to storage.
///
/// Switching variants is a caller policy: pair it with a flow reset and a
/// new step count (see `FlowSession::switch_version`).
pub struct AbTestStore {
    current_version: FlowVariant,
    storage: Box<dyn VariantStorage>,
}

impl AbTestStore {
    /// Load the persisted selection, defaulting to v1.
    ///
    /// Unreadable or unrecognized records are discarded with a warning.
    pub fn open(storage: Box<dyn VariantStorage>) -> Self {
        let current_version = match load_record(storage.as_ref()) {
            Ok(Some(version)) => version,
            Ok(None) => FlowVariant::default(),
            Err(e) => {
                warn!(key = STORAGE_KEY, error = %e, "Discarding persisted variant record");
                FlowVariant::default()
            }
        };
        info!(version = %current_version, "A/B store opened");
        Self {
            current_version,
            storage,
        }
    }

    pub fn current_version(&self) -> FlowVariant {
        self.current_version
    }

    pub fn storage(&self) -> &dyn VariantStorage {
        self.storage.as_ref()
    }

    /// Overwrite the active variant and persist it.
    ///
    /// A storage failure is logged; the in-memory selection still changes.
    pub fn set_version(&mut self, version: FlowVariant) {
        self.current_version = version;
        if let Err(e) = self.persist() {
            warn!(version = %version, error = %e, "Failed to persist variant selection");
        }
    }

    /// Parse and set a variant id. Unknown ids are rejected and nothing changes.
    pub fn set_version_str(&mut self, id: &str) -> Result<()> {
        let version = id.parse()?;
        self.set_version(version);
        Ok(())
    }

    fn persist(&mut self) -> std::result::Result<(), StorageError> {
        let record = PersistedRecord {
            state: PersistedState {
                current_version: self.current_version,
            },
            version: RECORD_VERSION,
        };
        let json = serde_json::to_string(&record)?;
        self.storage.save(STORAGE_KEY, &json)
    }
}

fn load_record(
    storage: &dyn VariantStorage,
) -> std::result::Result<Option<FlowVariant>, StorageError> {
    let Some(raw) = storage.load(STORAGE_KEY)? else {
        return Ok(None);
    };
    let record: PersistedRecord = serde_json::from_str(&raw)?;
    Ok(Some(record.state.current_version))
}
