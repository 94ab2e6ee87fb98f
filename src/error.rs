use crate::aircraft::AircraftId;
use crate::leg::FlightId;
use crate::rotation::Rejection;
use crate::time::{FormatError, Time};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file could not be read or written: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("flight {flight} departs at {departure} but arrives at {arrival}, overnight legs are not supported")]
    OvernightLeg {
        flight: FlightId,
        departure: Time,
        arrival: Time,
    },

    #[error("no aircraft selected, use: select <aircraft>")]
    NoAircraftSelected,

    #[error("unknown aircraft {0}")]
    UnknownAircraft(String),

    #[error("unknown flight {0}")]
    UnknownFlight(String),

    #[error("flight {flight} is already in the rotation of {aircraft} on {date}")]
    AlreadyAssigned {
        flight: FlightId,
        aircraft: AircraftId,
        date: NaiveDate,
    },

    #[error("flight {flight} is not in the rotation of {aircraft} on {date}")]
    NotInRotation {
        flight: FlightId,
        aircraft: AircraftId,
        date: NaiveDate,
    },

    #[error("flight rejected: {0}")]
    Rejected(#[from] Rejection),
}

pub type Result<T> = std::result::Result<T, Error>;
