use crate::time::Time;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tabled::Tabled;

pub type FlightId = Arc<str>;
pub type AirportId = Arc<str>;

/// A single scheduled flight segment within one day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct Leg {
    #[tabled(rename = "Flight")]
    pub ident: FlightId,
    #[tabled(rename = "Origin")]
    pub origin: AirportId,
    #[tabled(rename = "Destination")]
    pub destination: AirportId,
    #[tabled(rename = "Departure")]
    pub departure: Time,
    #[tabled(rename = "Arrival")]
    pub arrival: Time,
}

impl Leg {
    /// Minutes between departure and arrival.
    pub fn block_time(&self) -> u64 {
        self.arrival.0.saturating_sub(self.departure.0)
    }

    pub fn is_valid(&self) -> bool {
        self.arrival > self.departure
    }
}
