// Ledger module - JSON file holding the purchase lots

pub mod models;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub use models::{LedgerSummary, Lot};

/// File-backed store of purchase lots.
///
/// The file is the single source of truth: every operation reloads it and
/// every mutation rewrites it whole, sorted by purchase date.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all lots in date order.
    ///
    /// A missing or unreadable file yields an empty ledger.
    pub fn load(&self) -> Vec<Lot> {
        if !self.path.exists() {
            debug!("Ledger file {:?} not found, starting empty", self.path);
            return Vec::new();
        }

        match read_lots(&self.path) {
            Ok(mut lots) => {
                sort_lots(&mut lots);
                lots.iter_mut().for_each(Lot::normalize);
                debug!("Loaded {} lots from {:?}", lots.len(), self.path);
                lots
            }
            Err(e) => {
                warn!("Ignoring unreadable ledger {:?}: {:#}", self.path, e);
                Vec::new()
            }
        }
    }

    /// Sort and write the whole collection, replacing the file.
    pub fn save(&self, lots: &mut [Lot]) -> Result<()> {
        sort_lots(lots);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create ledger directory {:?}", parent))?;
        }

        let json = to_json_pretty(lots)?;
        fs::write(&self.path, json).context(format!("Failed to write ledger {:?}", self.path))?;
        debug!("Saved {} lots to {:?}", lots.len(), self.path);
        Ok(())
    }

    /// Append a lot and persist. Returns the ledger as saved.
    pub fn add(&self, lot: Lot) -> Result<Vec<Lot>> {
        let mut lots = self.load();
        info!("Recording purchase of {} sats on {}", lot.sats, lot.date);
        lots.push(lot);
        self.save(&mut lots)?;
        Ok(lots)
    }

    /// Remove the lot at 1-based `position` of the date-sorted view.
    ///
    /// Positions outside `1..=len` leave the ledger untouched and return `None`.
    pub fn remove(&self, position: usize) -> Result<Option<Lot>> {
        let mut lots = self.load();
        if position == 0 || position > lots.len() {
            debug!("Ignoring removal of position {} ({} lots)", position, lots.len());
            return Ok(None);
        }

        let removed = lots.remove(position - 1);
        self.save(&mut lots)?;
        info!("Removed lot {} dated {}", position, removed.date);
        Ok(Some(removed))
    }
}

fn read_lots(path: &Path) -> Result<Vec<Lot>> {
    let content = fs::read_to_string(path).context("Failed to read ledger file")?;
    serde_json::from_str(&content).context("Failed to parse ledger JSON")
}

/// Stable sort: lots bought on the same day keep their insertion order.
fn sort_lots(lots: &mut [Lot]) {
    lots.sort_by_key(|lot| lot.date);
}

fn to_json_pretty(lots: &[Lot]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    serde::Serialize::serialize(lots, &mut ser).context("Failed to serialize ledger")?;
    Ok(buf)
}
