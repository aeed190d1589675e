//! `leadgate slots`: the bookable time slots, with occupancy for a date.

use serde::Serialize;
use tabled::Tabled;

use leadgate_core::{BookingQuery, TimeSlot};

use crate::cli::SlotsArgs;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct SlotInfo {
    slot: &'static str,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    booked: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    available: Option<usize>,
}

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Slot")]
    slot: &'static str,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Booked")]
    booked: String,
    #[tabled(rename = "Available")]
    available: String,
}

fn to_row(s: &SlotInfo) -> SlotRow {
    let count = |n: Option<usize>| n.map_or_else(|| "-".to_owned(), |n| n.to_string());
    SlotRow {
        slot: s.slot,
        label: s.label.clone(),
        booked: count(s.booked),
        available: count(s.available),
    }
}

pub fn handle(args: &SlotsArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let occupancy = match args.date.as_deref() {
        Some(raw) => {
            let date = util::parse_date(raw, "date")?;
            Some((date, util::load_store(args.records.as_deref())?))
        }
        None => None,
    };
    let capacity = ctx.config.guard.slot_capacity;

    let slots = TimeSlot::all()
        .map(|slot| -> Result<SlotInfo, CliError> {
            let booked = match &occupancy {
                Some((date, store)) => Some(store.count_active_in_slot(*date, slot)?),
                None => None,
            };
            Ok(SlotInfo {
                slot: slot.as_str(),
                label: slot.label(),
                booked,
                available: booked.map(|n| capacity.saturating_sub(n)),
            })
        })
        .collect::<Result<Vec<_>, CliError>>()?;

    let rendered = output::render_list(ctx.output, &slots, to_row, |s| s.slot.to_owned())?;
    ctx.print(&rendered);
    Ok(())
}
