//! # Snapshot Loading
//!
//! Reads the JSON files of the web application's data directory. Nothing
//! is ever written back.
//!
//! ```text
//! data/
//! ├── licensees.json              Vec<Licensee>
//! ├── packs.json                  Vec<Pack>
//! ├── licensee-categories.json    Vec<LicenseeCategory>  (descriptions re-derived)
//! ├── settings.json               season, reductions, club info
//! ├── stock.json                  Vec<StockEntry>
//! ├── equipements.json            Vec<EquipmentItem>
//! ├── categories.json             Vec<EquipmentCategory> (size charts)
//! └── email-templates.json        EmailTemplates
//! ```
//!
//! All files are read concurrently. A missing file is not an error: it
//! yields the same default the web application falls back to.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use club_core::category::with_season_descriptions;
use club_core::validation::validate_quantity;
use club_core::{
    AppSettings, CoreError, EmailTemplates, EquipmentCategory, EquipmentItem, Licensee,
    LicenseeCategory, Pack, StockEntry, StockLedger, StoredSettings,
};

pub const LICENSEES_FILE: &str = "licensees.json";
pub const PACKS_FILE: &str = "packs.json";
pub const LICENSEE_CATEGORIES_FILE: &str = "licensee-categories.json";
pub const SETTINGS_FILE: &str = "settings.json";
pub const STOCK_FILE: &str = "stock.json";
pub const EQUIPMENT_FILE: &str = "equipements.json";
pub const EQUIPMENT_CATEGORIES_FILE: &str = "categories.json";
pub const EMAIL_TEMPLATES_FILE: &str = "email-templates.json";

/// Snapshot loading errors.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything the commands need, loaded once.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub licensees: Vec<Licensee>,
    pub packs: Vec<Pack>,
    /// Catalog with descriptions projected on the reference season.
    pub licensee_categories: Vec<LicenseeCategory>,
    pub settings: AppSettings,
    pub stock: Vec<StockEntry>,
    pub equipment: Vec<EquipmentItem>,
    pub equipment_categories: Vec<EquipmentCategory>,
    pub email_templates: EmailTemplates,
}

impl Snapshot {
    /// Loads every snapshot file from `dir`.
    ///
    /// `today` provides the fallback season when `settings.json` has none.
    pub async fn load(dir: &Path, today: NaiveDate) -> Result<Snapshot, SnapshotError> {
        info!(dir = %dir.display(), "Loading snapshot");

        let (
            licensees,
            packs,
            raw_categories,
            stored_settings,
            stock,
            equipment,
            equipment_categories,
            email_templates,
        ) = tokio::try_join!(
            read_json::<Vec<Licensee>>(dir, LICENSEES_FILE),
            read_json::<Vec<Pack>>(dir, PACKS_FILE),
            read_json::<Vec<LicenseeCategory>>(dir, LICENSEE_CATEGORIES_FILE),
            read_json::<StoredSettings>(dir, SETTINGS_FILE),
            read_json::<Vec<StockEntry>>(dir, STOCK_FILE),
            read_json::<Vec<EquipmentItem>>(dir, EQUIPMENT_FILE),
            read_json::<Vec<EquipmentCategory>>(dir, EQUIPMENT_CATEGORIES_FILE),
            read_json::<EmailTemplates>(dir, EMAIL_TEMPLATES_FILE),
        )?;

        for entry in stock.iter().filter(|e| validate_quantity(e.quantity).is_err()) {
            warn!(
                item = %entry.equipment_name,
                size = %entry.size_name,
                quantity = entry.quantity,
                "Negative managed quantity in stock file"
            );
        }

        let settings = stored_settings.resolve(today);
        let licensee_categories =
            with_season_descriptions(&raw_categories, settings.reference_season);

        info!(
            licensees = licensees.len(),
            packs = packs.len(),
            categories = licensee_categories.len(),
            season = %settings.season(),
            "Snapshot loaded"
        );

        Ok(Snapshot {
            licensees,
            packs,
            licensee_categories,
            settings,
            stock,
            equipment,
            equipment_categories,
            email_templates,
        })
    }

    pub fn licensee(&self, id: &str) -> Result<&Licensee, CoreError> {
        self.licensees
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| CoreError::LicenseeNotFound(id.to_string()))
    }

    pub fn pack(&self, id: &str) -> Result<&Pack, CoreError> {
        self.packs
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::PackNotFound(id.to_string()))
    }

    pub fn equipment_item(&self, name: &str) -> Result<&EquipmentItem, CoreError> {
        self.equipment
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| CoreError::EquipmentNotFound(name.to_string()))
    }

    /// Stock availability over every licensee.
    pub fn ledger(&self) -> StockLedger {
        StockLedger::new(&self.stock, &self.licensees)
    }

    /// Stock availability ignoring one licensee's current assignments.
    pub fn ledger_excluding(&self, licensee_id: &str) -> StockLedger {
        StockLedger::excluding(&self.stock, &self.licensees, licensee_id)
    }
}

/// Reads and parses one file, falling back to `T::default()` when absent.
async fn read_json<T>(dir: &Path, file: &str) -> Result<T, SnapshotError>
where
    T: DeserializeOwned + Default,
{
    let path = dir.join(file);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(file, "Snapshot file not found, using defaults");
            return Ok(T::default());
        }
        Err(source) => return Err(SnapshotError::Io { path, source }),
    };

    debug!(file, bytes = bytes.len(), "Read snapshot file");
    serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Parse { path, source })
}
