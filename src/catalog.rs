use crate::aircraft::Aircraft;
use crate::error::{Error, Result};
use crate::leg::{FlightId, Leg};
use crate::time::{Time, to_minutes};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

/// Flight as published by the flight data source.
#[derive(Deserialize)]
struct RawFlight {
    ident: String,
    origin: String,
    destination: String,
    #[serde(alias = "departure")]
    readable_departure: String,
    #[serde(alias = "arrival")]
    readable_arrival: String,
}

impl TryFrom<RawFlight> for Leg {
    type Error = Error;

    fn try_from(raw: RawFlight) -> Result<Self> {
        let leg = Leg {
            ident: Arc::from(raw.ident),
            origin: Arc::from(raw.origin),
            destination: Arc::from(raw.destination),
            departure: Time(to_minutes(&raw.readable_departure)?),
            arrival: Time(to_minutes(&raw.readable_arrival)?),
        };
        if !leg.is_valid() {
            return Err(Error::OvernightLeg {
                flight: leg.ident,
                departure: leg.departure,
                arrival: leg.arrival,
            });
        }
        Ok(leg)
    }
}

/// Aircraft and flights available for planning.
pub struct Catalog {
    aircraft: Vec<Aircraft>,
    flights: Vec<Leg>,
    flights_index: HashMap<FlightId, usize>,
}

impl Catalog {
    pub fn new(aircraft: Vec<Aircraft>, flights: Vec<Leg>) -> Catalog {
        let mut unique = Vec::with_capacity(flights.len());
        let mut seen = HashSet::new();
        for flight in flights {
            if !seen.insert(flight.ident.clone()) {
                log::warn!("Skipping duplicate flight {}", flight.ident);
                continue;
            }
            unique.push(flight);
        }
        unique.sort_by_key(|f| f.departure);

        let flights_index = unique
            .iter()
            .enumerate()
            .map(|(i, f)| (f.ident.clone(), i))
            .collect::<HashMap<FlightId, usize>>();

        Catalog {
            aircraft,
            flights: unique,
            flights_index,
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parses a catalog, dropping flights whose times cannot be planned.
    pub fn from_json(data: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct RawData {
            #[serde(default)]
            aircraft: Vec<Aircraft>,
            #[serde(default)]
            flights: Vec<RawFlight>,
        }
        let raw: RawData = serde_json::from_str(data)?;

        let flights = raw
            .flights
            .into_iter()
            .filter_map(|f| {
                let ident = f.ident.clone();
                Leg::try_from(f)
                    .inspect_err(|e| log::warn!("Skipping flight {}: {}", ident, e))
                    .ok()
            })
            .collect::<Vec<Leg>>();

        log::debug!("Loaded {} aircraft and {} flights", raw.aircraft.len(), flights.len());
        Ok(Catalog::new(raw.aircraft, flights))
    }

    pub fn aircraft(&self) -> &[Aircraft] {
        &self.aircraft
    }

    pub fn find_aircraft(&self, ident: &str) -> Option<&Aircraft> {
        self.aircraft.iter().find(|a| *a.ident == *ident)
    }

    /// All flights, in departure order.
    pub fn flights(&self) -> &[Leg] {
        &self.flights
    }

    pub fn find_flight(&self, ident: &str) -> Option<&Leg> {
        self.flights_index.get(ident).map(|i| &self.flights[*i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "aircraft": [
            {"ident": "GABCD", "type": "A320", "economySeats": 186, "base": "EGKK"},
            {"ident": "GXYZW", "type": "A321", "economySeats": 220, "base": "LFPG"}
        ],
        "flights": [
            {"ident": "AS1002", "departuretime": 1553947200, "arrivaltime": 1553952000,
             "readable_departure": "12:00", "readable_arrival": "13:20",
             "origin": "LFSB", "destination": "LFMN"},
            {"ident": "AS1001", "departuretime": 1553929200, "arrivaltime": 1553934000,
             "readable_departure": "07:00", "readable_arrival": "08:20",
             "origin": "LFMN", "destination": "LFSB"},
            {"ident": "AS1003", "readable_departure": "25:00", "readable_arrival": "26:00",
             "origin": "LFMN", "destination": "LFSB"},
            {"ident": "AS1004", "readable_departure": "23:30", "readable_arrival": "00:45",
             "origin": "LFMN", "destination": "LFSB"},
            {"ident": "AS1001", "readable_departure": "09:00", "readable_arrival": "10:00",
             "origin": "LFMN", "destination": "LFSB"}
        ]
    }"#;

    #[test]
    fn test_load_catalog() {
        let catalog = Catalog::from_json(CATALOG).unwrap();

        assert_eq!(2, catalog.aircraft().len());
        let aircraft = catalog.find_aircraft("GABCD").unwrap();
        assert_eq!("A320", aircraft.kind);
        assert_eq!(186, aircraft.economy_seats);
        assert_eq!("EGKK", &*aircraft.base);
        assert!(catalog.find_aircraft("NOPE").is_none());
    }

    #[test]
    fn test_flights_sorted_by_departure() {
        let catalog = Catalog::from_json(CATALOG).unwrap();

        let idents = catalog.flights().iter().map(|f| &*f.ident).collect::<Vec<_>>();
        assert_eq!(vec!["AS1001", "AS1002"], idents);

        let flight = catalog.find_flight("AS1002").unwrap();
        assert_eq!(Time(12 * 60), flight.departure);
        assert_eq!(Time(13 * 60 + 20), flight.arrival);
    }

    #[test]
    fn test_malformed_and_overnight_flights_are_skipped() {
        let catalog = Catalog::from_json(CATALOG).unwrap();

        assert!(catalog.find_flight("AS1003").is_none());
        assert!(catalog.find_flight("AS1004").is_none());
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let catalog = Catalog::from_json(CATALOG).unwrap();

        assert_eq!(Time(7 * 60), catalog.find_flight("AS1001").unwrap().departure);
    }

    #[test]
    fn test_overnight_leg_error() {
        let raw = RawFlight {
            ident: "AS1".to_string(),
            origin: "A".to_string(),
            destination: "B".to_string(),
            readable_departure: "10:00".to_string(),
            readable_arrival: "10:00".to_string(),
        };

        assert!(matches!(Leg::try_from(raw), Err(Error::OvernightLeg { .. })));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(Catalog::from_json("{"), Err(Error::Json(_))));
    }
}
