use crate::aircraft::{Aircraft, AircraftId};
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::leg::Leg;
use crate::rotation::Rotation;
use crate::store::RotationStore;
use crate::timeline::{Timeline, utilization};
use chrono::NaiveDate;

/// New state of one (aircraft, date) rotation after a change.
#[derive(Debug)]
pub struct RotationChange {
    pub aircraft: AircraftId,
    pub date: NaiveDate,
    pub rotation: Rotation,
    pub removed: Vec<Leg>,
}

/// Assigns catalog flights to aircraft rotations and keeps them in a store.
///
/// Every change is a read, validate, write sequence on a single key performed
/// under `&mut self`, so it cannot interleave with another change made
/// through the same planner.
pub struct Planner<S: RotationStore> {
    catalog: Catalog,
    store: S,
}

impl<S: RotationStore> Planner<S> {
    pub fn new(catalog: Catalog, store: S) -> Planner<S> {
        Planner { catalog, store }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn aircraft_id(&self, aircraft: &str) -> Result<AircraftId> {
        self.catalog
            .find_aircraft(aircraft)
            .map(|a| a.ident.clone())
            .ok_or_else(|| Error::UnknownAircraft(aircraft.to_string()))
    }

    pub fn rotation(&self, aircraft: &str, date: NaiveDate) -> Result<Rotation> {
        let ac_id = self.aircraft_id(aircraft)?;
        Ok(self.store.get(&ac_id, date))
    }

    pub fn timeline(&self, aircraft: &str, date: NaiveDate) -> Result<Timeline> {
        Ok(Timeline::derive(self.rotation(aircraft, date)?.legs()))
    }

    /// Appends a catalog flight to the aircraft's rotation for `date`.
    ///
    /// A rejected flight leaves the stored rotation unchanged.
    pub fn assign(&mut self, aircraft: &str, date: NaiveDate, flight: &str) -> Result<RotationChange> {
        let ac_id = self.aircraft_id(aircraft)?;
        let leg = self
            .catalog
            .find_flight(flight)
            .cloned()
            .ok_or_else(|| Error::UnknownFlight(flight.to_string()))?;

        let current = self.store.get(&ac_id, date);
        if current.contains(&leg.ident) {
            return Err(Error::AlreadyAssigned {
                flight: leg.ident,
                aircraft: ac_id,
                date,
            });
        }

        let rotation = current
            .append(leg)
            .inspect_err(|r| log::info!("Rejected {} for {} on {}: {}", flight, ac_id, date, r))?;
        self.store.put(&ac_id, date, rotation.clone())?;
        log::info!(
            "Assigned {} to {} on {} ({} legs)",
            flight,
            ac_id,
            date,
            rotation.len()
        );

        Ok(RotationChange {
            aircraft: ac_id,
            date,
            rotation,
            removed: vec![],
        })
    }

    /// Removes `flight` and every later leg from the aircraft's rotation.
    pub fn remove(&mut self, aircraft: &str, date: NaiveDate, flight: &str) -> Result<RotationChange> {
        let ac_id = self.aircraft_id(aircraft)?;
        let current = self.store.get(&ac_id, date);

        let Some((rotation, removed)) = current.truncate_at(flight) else {
            return Err(Error::NotInRotation {
                flight: flight.into(),
                aircraft: ac_id,
                date,
            });
        };

        self.store.put(&ac_id, date, rotation.clone())?;
        log::info!(
            "Removed {} legs from {} on {} starting at {}",
            removed.len(),
            ac_id,
            date,
            flight
        );

        Ok(RotationChange {
            aircraft: ac_id,
            date,
            rotation,
            removed,
        })
    }

    pub fn clear(&mut self, aircraft: &str, date: NaiveDate) -> Result<RotationChange> {
        let ac_id = self.aircraft_id(aircraft)?;
        let removed = self.store.get(&ac_id, date).legs().to_vec();
        self.store.delete(&ac_id, date)?;
        log::info!("Cleared rotation of {} on {}", ac_id, date);

        Ok(RotationChange {
            aircraft: ac_id,
            date,
            rotation: Rotation::new(),
            removed,
        })
    }

    /// Catalog flights not yet in the aircraft's rotation for `date`, in departure order.
    pub fn available_flights(&self, aircraft: &str, date: NaiveDate) -> Result<Vec<&Leg>> {
        let rotation = self.rotation(aircraft, date)?;
        Ok(self
            .catalog
            .flights()
            .iter()
            .filter(|f| !rotation.contains(&f.ident))
            .collect())
    }

    pub fn fleet_usage(&self, date: NaiveDate) -> Vec<(&Aircraft, u8)> {
        self.catalog
            .aircraft()
            .iter()
            .map(|a| (a, utilization(self.store.get(&a.ident, date).legs())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::Rejection;
    use crate::rotation::tests::utils::id;
    use crate::store::MemoryStore;
    use crate::timeline::BlockKind;

    const CATALOG: &str = r#"{
        "aircraft": [
            {"ident": "GABCD", "type": "A320", "economySeats": 186, "base": "LFSB"},
            {"ident": "GXYZW", "type": "A321", "economySeats": 220, "base": "LFMN"}
        ],
        "flights": [
            {"ident": "AS1001", "readable_departure": "06:00", "readable_arrival": "07:00",
             "origin": "LFSB", "destination": "LFMN"},
            {"ident": "AS1002", "readable_departure": "07:20", "readable_arrival": "08:20",
             "origin": "LFMN", "destination": "LFSB"},
            {"ident": "AS1003", "readable_departure": "07:10", "readable_arrival": "08:10",
             "origin": "LFMN", "destination": "EGKK"},
            {"ident": "AS1004", "readable_departure": "09:00", "readable_arrival": "10:00",
             "origin": "LFSB", "destination": "LFPG"},
            {"ident": "AS1005", "readable_departure": "09:00", "readable_arrival": "10:00",
             "origin": "EGKK", "destination": "LFPG"}
        ]
    }"#;

    fn planner() -> Planner<MemoryStore> {
        Planner::new(Catalog::from_json(CATALOG).unwrap(), MemoryStore::new())
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn idents(legs: &[Leg]) -> Vec<&str> {
        legs.iter().map(|l| &*l.ident).collect()
    }

    #[test]
    fn test_assign_builds_rotation() {
        let mut planner = planner();

        planner.assign("GABCD", date(), "AS1001").unwrap();
        let change = planner.assign("GABCD", date(), "AS1002").unwrap();
        planner.assign("GABCD", date(), "AS1004").unwrap();

        assert_eq!(id("GABCD"), change.aircraft);
        assert_eq!(vec!["AS1001", "AS1002"], idents(change.rotation.legs()));
        assert_eq!(
            vec!["AS1001", "AS1002", "AS1004"],
            idents(planner.rotation("GABCD", date()).unwrap().legs())
        );
    }

    #[test]
    fn test_rejected_assignment_is_not_stored() {
        let mut planner = planner();
        planner.assign("GABCD", date(), "AS1001").unwrap();

        let err = planner.assign("GABCD", date(), "AS1003").unwrap_err();
        assert!(matches!(
            err,
            Error::Rejected(Rejection::InsufficientTurnaround { .. })
        ));

        let err = planner.assign("GABCD", date(), "AS1005").unwrap_err();
        assert!(matches!(err, Error::Rejected(Rejection::OriginMismatch { .. })));

        assert_eq!(vec!["AS1001"], idents(planner.rotation("GABCD", date()).unwrap().legs()));
    }

    #[test]
    fn test_assign_twice_is_refused() {
        let mut planner = planner();
        planner.assign("GABCD", date(), "AS1001").unwrap();

        assert!(matches!(
            planner.assign("GABCD", date(), "AS1001"),
            Err(Error::AlreadyAssigned { .. })
        ));
    }

    #[test]
    fn test_unknown_aircraft_and_flight() {
        let mut planner = planner();

        assert!(matches!(
            planner.assign("NOPE", date(), "AS1001"),
            Err(Error::UnknownAircraft(_))
        ));
        assert!(matches!(
            planner.assign("GABCD", date(), "AS9999"),
            Err(Error::UnknownFlight(_))
        ));
        assert!(matches!(planner.rotation("NOPE", date()), Err(Error::UnknownAircraft(_))));
    }

    #[test]
    fn test_rotations_are_per_aircraft_and_date() {
        let mut planner = planner();
        let next_day = date().succ_opt().unwrap();
        planner.assign("GABCD", date(), "AS1001").unwrap();

        assert!(planner.rotation("GABCD", next_day).unwrap().is_empty());
        assert!(planner.rotation("GXYZW", date()).unwrap().is_empty());

        // the same flight may start another aircraft's day
        planner.assign("GXYZW", date(), "AS1001").unwrap();
        assert_eq!(1, planner.rotation("GXYZW", date()).unwrap().len());
    }

    #[test]
    fn test_remove_truncates() {
        let mut planner = planner();
        planner.assign("GABCD", date(), "AS1001").unwrap();
        planner.assign("GABCD", date(), "AS1002").unwrap();
        planner.assign("GABCD", date(), "AS1004").unwrap();

        let change = planner.remove("GABCD", date(), "AS1002").unwrap();

        assert_eq!(vec!["AS1001"], idents(change.rotation.legs()));
        assert_eq!(vec!["AS1002", "AS1004"], idents(&change.removed));
        assert_eq!(change.rotation, planner.rotation("GABCD", date()).unwrap());
    }

    #[test]
    fn test_remove_flight_not_in_rotation() {
        let mut planner = planner();
        planner.assign("GABCD", date(), "AS1001").unwrap();

        assert!(matches!(
            planner.remove("GABCD", date(), "AS1002"),
            Err(Error::NotInRotation { .. })
        ));
    }

    #[test]
    fn test_clear() {
        let mut planner = planner();
        planner.assign("GABCD", date(), "AS1001").unwrap();
        planner.assign("GABCD", date(), "AS1002").unwrap();

        let change = planner.clear("GABCD", date()).unwrap();

        assert!(change.rotation.is_empty());
        assert_eq!(2, change.removed.len());
        assert!(planner.rotation("GABCD", date()).unwrap().is_empty());
    }

    #[test]
    fn test_available_flights_exclude_rotation() {
        let mut planner = planner();
        planner.assign("GABCD", date(), "AS1001").unwrap();

        let available = planner.available_flights("GABCD", date()).unwrap();
        assert_eq!(
            vec!["AS1003", "AS1002", "AS1004", "AS1005"],
            available.iter().map(|l| &*l.ident).collect::<Vec<_>>()
        );
        assert_eq!(5, planner.available_flights("GXYZW", date()).unwrap().len());
    }

    #[test]
    fn test_fleet_usage_and_timeline() {
        let mut planner = planner();
        planner.assign("GABCD", date(), "AS1001").unwrap();
        planner.assign("GABCD", date(), "AS1002").unwrap();

        let usage = planner
            .fleet_usage(date())
            .into_iter()
            .map(|(a, u)| (&*a.ident, u))
            .collect::<Vec<_>>();
        // 60 + 20 + 60 minutes of 1440
        assert_eq!(vec![("GABCD", 10), ("GXYZW", 0)], usage);

        let timeline = planner.timeline("GABCD", date()).unwrap();
        assert_eq!(10, timeline.utilization);
        assert_eq!(
            vec![
                BlockKind::Idle,
                BlockKind::Flight,
                BlockKind::Turnaround,
                BlockKind::Flight,
                BlockKind::Idle
            ],
            timeline.blocks.iter().map(|b| b.kind).collect::<Vec<_>>()
        );
    }
}
