use crate::leg::{AirportId, FlightId, Leg};
use crate::time::Time;
use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Why a leg cannot be appended to a rotation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("the origin of flight {flight} ({origin}) must match the destination of the last flight {last} ({destination})")]
    OriginMismatch {
        flight: FlightId,
        origin: AirportId,
        last: FlightId,
        destination: AirportId,
    },

    #[error("insufficient turnaround between arrival of flight {last} ({arrival}) and departure of flight {flight} ({departure}), minimum required is {minimum} minutes", minimum = Rotation::TURNAROUND)]
    InsufficientTurnaround {
        flight: FlightId,
        departure: Time,
        last: FlightId,
        arrival: Time,
    },

    #[error("flight {flight} arrives after midnight ({arrival}), which is not allowed")]
    ArrivesAfterMidnight { flight: FlightId, arrival: Time },
}

/// Why a stored list of legs does not form a rotation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidRotation {
    #[error("flight {flight} departs at {departure} but arrives at {arrival}")]
    BackwardsLeg {
        flight: FlightId,
        departure: Time,
        arrival: Time,
    },

    #[error(transparent)]
    Rejected(#[from] Rejection),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Rejected(Rejection),
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted)
    }
}

/// Legs flown by one aircraft on one date, in departure order.
///
/// A rotation only grows through [`Rotation::append`] and only shrinks by
/// cutting it at a leg with [`Rotation::truncate_at`], so every stored
/// rotation keeps its routing and turnaround continuity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Leg>", into = "Vec<Leg>")]
pub struct Rotation {
    legs: Vec<Leg>,
}

/// Rebuilds a rotation leg by leg, so stored data passes the same checks as
/// a planner append.
impl TryFrom<Vec<Leg>> for Rotation {
    type Error = InvalidRotation;

    fn try_from(legs: Vec<Leg>) -> Result<Self, Self::Error> {
        legs.into_iter().try_fold(Rotation::new(), |rotation, leg| {
            if !leg.is_valid() {
                return Err(InvalidRotation::BackwardsLeg {
                    flight: leg.ident,
                    departure: leg.departure,
                    arrival: leg.arrival,
                });
            }
            Ok(rotation.append(leg)?)
        })
    }
}

impl From<Rotation> for Vec<Leg> {
    fn from(rotation: Rotation) -> Self {
        rotation.legs
    }
}

impl Rotation {
    /// Minimum ground time between two consecutive legs, in minutes.
    pub const TURNAROUND: u64 = 20;

    pub fn new() -> Rotation {
        Rotation::default()
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn last(&self) -> Option<&Leg> {
        self.legs.last()
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn contains(&self, flight: &str) -> bool {
        self.position(flight).is_some()
    }

    fn position(&self, flight: &str) -> Option<usize> {
        self.legs.iter().position(|l| *l.ident == *flight)
    }

    /// Decides whether `candidate` may follow the current last leg.
    pub fn can_append(&self, candidate: &Leg) -> Decision {
        // Departures are unsigned minutes, so the first leg of the day can
        // never leave before midnight.
        let Some(last) = self.legs.last() else {
            return Decision::Accepted;
        };

        if candidate.origin != last.destination {
            return Decision::Rejected(Rejection::OriginMismatch {
                flight: candidate.ident.clone(),
                origin: candidate.origin.clone(),
                last: last.ident.clone(),
                destination: last.destination.clone(),
            });
        }

        if candidate.departure < last.arrival + Self::TURNAROUND {
            return Decision::Rejected(Rejection::InsufficientTurnaround {
                flight: candidate.ident.clone(),
                departure: candidate.departure,
                last: last.ident.clone(),
                arrival: last.arrival,
            });
        }

        if candidate.arrival > Time::LAST_MINUTE {
            return Decision::Rejected(Rejection::ArrivesAfterMidnight {
                flight: candidate.ident.clone(),
                arrival: candidate.arrival,
            });
        }

        Decision::Accepted
    }

    /// Returns a new rotation with `candidate` appended, leaving `self` untouched.
    pub fn append(&self, candidate: Leg) -> Result<Rotation, Rejection> {
        match self.can_append(&candidate) {
            Decision::Rejected(rejection) => Err(rejection),
            Decision::Accepted => {
                let mut legs = self.legs.clone();
                legs.push(candidate);
                let rotation = Rotation { legs };
                rotation.assert_invariants();
                Ok(rotation)
            }
        }
    }

    /// Cuts the rotation right before `flight`.
    ///
    /// Later legs depend on the removed one for continuity, so they go with it.
    /// Returns the kept prefix and the removed legs, or `None` when the flight
    /// is not part of this rotation.
    pub fn truncate_at(&self, flight: &str) -> Option<(Rotation, Vec<Leg>)> {
        let idx = self.position(flight)?;
        let (kept, removed) = self.legs.split_at(idx);
        Some((Rotation { legs: kept.to_vec() }, removed.to_vec()))
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.legs.windows(2).all(|ls| ls[0].departure <= ls[1].departure),
            "Departure order violated"
        );
        debug_assert!(
            self.legs.windows(2).all(|ls| ls[0].destination == ls[1].origin),
            "Prev destination <-> next origin location continuity violated"
        );
        debug_assert!(
            self.legs
                .windows(2)
                .all(|ls| ls[1].departure >= ls[0].arrival + Self::TURNAROUND),
            "Prev arrival <-> next departure turnaround violated"
        );
    }
}
