use anyhow::Context;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::sheets::Worksheet;
use crate::state::AppState;
use crate::tracker::ledger::{DailyLedger, FoodEntry, GoalSet};
use crate::tracker::weekly::{self, WeeklyTotals};

const ENTRY_STAMP: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const DAY_STAMP: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

fn entry_timestamp() -> anyhow::Result<String> {
    OffsetDateTime::now_utc()
        .format(ENTRY_STAMP)
        .context("format entry timestamp")
}

fn day_timestamp() -> anyhow::Result<String> {
    OffsetDateTime::now_utc()
        .format(DAY_STAMP)
        .context("format date")
}

/// Logs locally first, then mirrors the entry to the Entries worksheet.
/// On a failed remote write the entry stays in the ledger and the error is
/// returned for the caller to surface.
pub async fn log_meal(
    state: &AppState,
    ledger: &mut DailyLedger,
    entry: FoodEntry,
) -> anyhow::Result<()> {
    let row = vec![
        entry_timestamp()?,
        entry.name.clone(),
        entry.calories.to_string(),
        entry.protein_g.to_string(),
        entry.fat_g.to_string(),
        entry.carbs_g.to_string(),
    ];
    let name = entry.name.clone();
    ledger.log(entry);
    state
        .sheets
        .append_row(Worksheet::Entries, row)
        .await
        .with_context(|| format!("record {name:?} in the Entries sheet"))
}

/// Appends today's consumed sums next to the goals in effect, the one
/// place consumed-vs-goal history is kept.
pub async fn push_goal_snapshot(state: &AppState, ledger: &DailyLedger) -> anyhow::Result<()> {
    let totals = ledger.totals();
    let goals = ledger.goals();
    let row = vec![
        day_timestamp()?,
        totals.protein.to_string(),
        totals.fat.to_string(),
        totals.carbs.to_string(),
        goals.protein.to_string(),
        goals.fat.to_string(),
        goals.carbs.to_string(),
    ];
    state
        .sheets
        .append_row(Worksheet::Goal, row)
        .await
        .context("record snapshot in the Goal sheet")
}

pub async fn record_goals(
    state: &AppState,
    ledger: &mut DailyLedger,
    goals: GoalSet,
) -> anyhow::Result<()> {
    ledger.set_goals(goals);
    push_goal_snapshot(state, ledger).await
}

/// Reads the whole Entries history, sums the trailing window, and logs the
/// result to the WeekTotal worksheet before returning it for display.
pub async fn weekly_totals(state: &AppState) -> anyhow::Result<WeeklyTotals> {
    let rows = state
        .sheets
        .read_all_rows(Worksheet::Entries)
        .await
        .context("read the Entries sheet")?;
    let totals = weekly::weekly_totals(&rows)?;
    let row = vec![
        day_timestamp()?,
        totals.calories.to_string(),
        totals.protein.to_string(),
        totals.fat.to_string(),
        totals.carbs.to_string(),
    ];
    state
        .sheets
        .append_row(Worksheet::WeekTotal, row)
        .await
        .context("record totals in the WeekTotal sheet")?;
    Ok(totals)
}
