use crate::aircraft::Aircraft;
use crate::leg::Leg;
use crate::time::DAY_MINUTES;
use crate::timeline::{BlockKind, Timeline};
use colored::Colorize;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

/// Width of the timeline bar; one cell per 15 minutes.
pub const TIMELINE_COLUMNS: usize = 96;

#[derive(Tabled)]
struct FleetRow<'a> {
    #[tabled(rename = "Aircraft")]
    ident: &'a str,
    #[tabled(rename = "Type")]
    kind: &'a str,
    #[tabled(rename = "Economy seats")]
    economy_seats: u32,
    #[tabled(rename = "Base")]
    base: &'a str,
    #[tabled(rename = "Usage")]
    usage: String,
}

fn styled(mut table: Table) -> String {
    table.with(Style::rounded());
    table.with(Alignment::left());
    table.to_string()
}

pub fn fleet_table(usage: &[(&Aircraft, u8)]) -> String {
    let rows = usage.iter().map(|(aircraft, percent)| FleetRow {
        ident: &aircraft.ident,
        kind: &aircraft.kind,
        economy_seats: aircraft.economy_seats,
        base: &aircraft.base,
        usage: format!("{}%", percent),
    });
    styled(Table::new(rows))
}

pub fn legs_table<'a>(legs: impl IntoIterator<Item = &'a Leg>) -> String {
    styled(Table::new(legs))
}

/// Kind of the block covering the middle of each bar cell.
pub fn timeline_cells(timeline: &Timeline, columns: usize) -> Vec<BlockKind> {
    let cell = DAY_MINUTES as f64 / columns as f64;
    (0..columns)
        .map(|c| {
            let minute = ((c as f64 + 0.5) * cell) as u64;
            timeline.kind_at(minute).unwrap_or(BlockKind::Idle)
        })
        .collect()
}

pub fn timeline_bar(timeline: &Timeline) -> String {
    let bar = timeline_cells(timeline, TIMELINE_COLUMNS)
        .into_iter()
        .map(|kind| match kind {
            BlockKind::Idle => "█".bright_black().to_string(),
            BlockKind::Flight => "█".green().to_string(),
            BlockKind::Turnaround => "█".truecolor(128, 0, 128).to_string(),
        })
        .collect::<String>();

    let quarter = TIMELINE_COLUMNS / 4;
    let axis = ["00:00", "06:00", "12:00", "18:00"]
        .iter()
        .map(|label| format!("{:<width$}", label, width = quarter))
        .collect::<String>();

    format!(
        "{}\n{}24:00\n{} {}  {} {}  {} {}  Usage: {}%",
        bar,
        axis,
        "█".green(),
        BlockKind::Flight,
        "█".truecolor(128, 0, 128),
        BlockKind::Turnaround,
        "█".bright_black(),
        BlockKind::Idle,
        timeline.utilization
    )
}
