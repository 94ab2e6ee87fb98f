use crate::aircraft::AircraftId;
use crate::error::Result;
use crate::rotation::Rotation;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted rotations, keyed by aircraft and date.
///
/// An absent key reads as an empty rotation and putting an empty rotation
/// removes the key.
pub trait RotationStore {
    fn get(&self, aircraft: &AircraftId, date: NaiveDate) -> Rotation;
    fn put(&mut self, aircraft: &AircraftId, date: NaiveDate, rotation: Rotation) -> Result<()>;
    fn delete(&mut self, aircraft: &AircraftId, date: NaiveDate) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryStore {
    rotations: HashMap<(AircraftId, NaiveDate), Rotation>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl RotationStore for MemoryStore {
    fn get(&self, aircraft: &AircraftId, date: NaiveDate) -> Rotation {
        self.rotations
            .get(&(aircraft.clone(), date))
            .cloned()
            .unwrap_or_default()
    }

    fn put(&mut self, aircraft: &AircraftId, date: NaiveDate, rotation: Rotation) -> Result<()> {
        if rotation.is_empty() {
            return self.delete(aircraft, date);
        }
        self.rotations.insert((aircraft.clone(), date), rotation);
        Ok(())
    }

    fn delete(&mut self, aircraft: &AircraftId, date: NaiveDate) -> Result<()> {
        self.rotations.remove(&(aircraft.clone(), date));
        Ok(())
    }
}

type RotationsByAircraft = BTreeMap<AircraftId, BTreeMap<NaiveDate, Rotation>>;

/// Rotations kept in a JSON file shaped `{aircraft: {"YYYY-MM-DD": [legs]}}`.
///
/// The whole file is rewritten on every change.
pub struct JsonFileStore {
    path: PathBuf,
    rotations: RotationsByAircraft,
}

impl JsonFileStore {
    /// Opens the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let rotations = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            log::info!("No rotations at '{}', starting empty", path.display());
            RotationsByAircraft::new()
        };
        Ok(JsonFileStore { path, rotations })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.rotations)?)?;
        log::debug!("Saved rotations to '{}'", self.path.display());
        Ok(())
    }
}

impl RotationStore for JsonFileStore {
    fn get(&self, aircraft: &AircraftId, date: NaiveDate) -> Rotation {
        self.rotations
            .get(aircraft)
            .and_then(|by_date| by_date.get(&date))
            .cloned()
            .unwrap_or_default()
    }

    fn put(&mut self, aircraft: &AircraftId, date: NaiveDate, rotation: Rotation) -> Result<()> {
        if rotation.is_empty() {
            return self.delete(aircraft, date);
        }
        self.rotations
            .entry(aircraft.clone())
            .or_default()
            .insert(date, rotation);
        self.save()
    }

    fn delete(&mut self, aircraft: &AircraftId, date: NaiveDate) -> Result<()> {
        if let Some(by_date) = self.rotations.get_mut(aircraft) {
            by_date.remove(&date);
            if by_date.is_empty() {
                self.rotations.remove(aircraft);
            }
        }
        self.save()
    }
}
