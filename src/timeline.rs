use crate::leg::Leg;
use crate::rotation::Rotation;
use crate::time::{DAY_MINUTES, Time, to_percent};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Idle,
    Flight,
    Turnaround,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Idle => write!(f, "Idle"),
            BlockKind::Flight => write!(f, "Scheduled Flight"),
            BlockKind::Turnaround => write!(f, "Turnaround"),
        }
    }
}

/// A labelled span `[from, to)` of the day.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub from: Time,
    pub to: Time,
    pub start_percent: f64,
    pub width_percent: f64,
}

impl Block {
    fn new(kind: BlockKind, from: Time, to: Time) -> Block {
        Block {
            kind,
            from,
            to,
            start_percent: from.to_percent(),
            width_percent: to_percent(to.0.saturating_sub(from.0)),
        }
    }

    pub fn contains(&self, minute: u64) -> bool {
        self.from.0 <= minute && minute < self.to.0
    }
}

/// Occupancy of one aircraft over a 24 hour day.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    pub blocks: Vec<Block>,
    /// Share of the day spent flying or turning around, rounded and capped at 100.
    pub utilization: u8,
}

impl Timeline {
    /// Lays the legs out over the day.
    ///
    /// Legs are sorted by departure first, so callers may pass them in any
    /// order. A turnaround block of exactly [`Rotation::TURNAROUND`] minutes is
    /// placed after every leg but the last; any longer ground time shows up as
    /// an idle block before the next departure.
    pub fn derive(legs: &[Leg]) -> Timeline {
        let mut sorted = legs.iter().collect::<Vec<&Leg>>();
        sorted.sort_by_key(|l| l.departure);

        let mut blocks = vec![];
        let mut current = Time::MIDNIGHT;
        for (idx, leg) in sorted.iter().enumerate() {
            if leg.departure > current {
                blocks.push(Block::new(BlockKind::Idle, current, leg.departure));
            }
            blocks.push(Block::new(BlockKind::Flight, leg.departure, leg.arrival));
            current = leg.arrival;

            if idx < sorted.len() - 1 {
                let ready_at = current + Rotation::TURNAROUND;
                blocks.push(Block::new(BlockKind::Turnaround, current, ready_at));
                current = ready_at;
            }
        }

        if current.0 < DAY_MINUTES {
            blocks.push(Block::new(BlockKind::Idle, current, Time(DAY_MINUTES)));
        }

        Timeline {
            blocks,
            utilization: utilization(legs),
        }
    }

    pub fn kind_at(&self, minute: u64) -> Option<BlockKind> {
        self.blocks.iter().find(|b| b.contains(minute)).map(|b| b.kind)
    }
}

/// Flight time plus one turnaround between each pair of legs, as a percentage
/// of the day.
pub fn utilization(legs: &[Leg]) -> u8 {
    let flying: u64 = legs.iter().map(Leg::block_time).sum();
    let turnarounds = legs.len().saturating_sub(1) as u64 * Rotation::TURNAROUND;
    let used = flying + turnarounds;
    (to_percent(used).round().min(100.0)) as u8
}
