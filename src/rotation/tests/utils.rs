use crate::leg::Leg;
use crate::rotation::Rotation;
use crate::time::Time;
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::sync::Arc;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn leg(ident: &str, origin: &str, destination: &str, departure: &str, arrival: &str) -> Leg {
    Leg {
        ident: id(ident),
        origin: id(origin),
        destination: id(destination),
        departure: departure.parse().unwrap(),
        arrival: arrival.parse().unwrap(),
    }
}

pub fn leg_at(ident: &str, origin: &str, destination: &str, departure: u64, arrival: u64) -> Leg {
    Leg {
        ident: id(ident),
        origin: id(origin),
        destination: id(destination),
        departure: Time(departure),
        arrival: Time(arrival),
    }
}

pub fn rotation(legs: Vec<Leg>) -> Rotation {
    legs.into_iter()
        .fold(Rotation::new(), |r, l| r.append(l).unwrap())
}

pub fn arb_id(prefix: &'static str) -> impl Strategy<Value = Arc<str>> {
    prop_oneof![
        Just(Arc::from(format!("{}_1", prefix))),
        Just(Arc::from(format!("{}_2", prefix))),
        Just(Arc::from(format!("{}_3", prefix))),
    ]
}

/// Individually valid legs: arrival after departure, both within the day.
pub fn arb_leg() -> impl Strategy<Value = Leg> {
    (arb_id("AP"), arb_id("AP"), 0..1400u64, 1..400u64).prop_map(|(org, dst, dep, dur)| {
        let arr = (dep + dur).min(Time::LAST_MINUTE.0);
        Leg {
            ident: id(&format!("FL_{dep}_{arr}")),
            origin: org,
            destination: dst,
            departure: Time(dep),
            arrival: Time(arr),
        }
    })
}
