use thiserror::Error;

/// Trailing row count, not calendar days. Matches what the sheet has
/// always stored; see DESIGN.md for why this is not date-based.
pub const WINDOW: usize = 7;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeeklyError {
    #[error("entries row {row}: {column} value {value:?} is not a whole number")]
    MalformedRow {
        row: usize,
        column: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeeklyTotals {
    pub calories: u64,
    pub protein: u64,
    pub fat: u64,
    pub carbs: u64,
}

// Entries rows are [timestamp, name, calories, protein, fat, carbs].
const CALORIES: usize = 2;
const PROTEIN: usize = 3;
const FAT: usize = 4;
const CARBS: usize = 5;

/// Sums the last [`WINDOW`] rows (all of them when fewer exist). One
/// unparseable field aborts the whole aggregation; a partial sum would
/// silently underreport.
pub fn weekly_totals(rows: &[Vec<String>]) -> Result<WeeklyTotals, WeeklyError> {
    let start = rows.len().saturating_sub(WINDOW);
    let mut totals = WeeklyTotals::default();
    for (offset, row) in rows[start..].iter().enumerate() {
        let row_number = start + offset + 1;
        totals.calories += field(row, row_number, CALORIES, "calories")?;
        totals.protein += field(row, row_number, PROTEIN, "protein")?;
        totals.fat += field(row, row_number, FAT, "fat")?;
        totals.carbs += field(row, row_number, CARBS, "carbs")?;
    }
    Ok(totals)
}

fn field(
    row: &[String],
    row_number: usize,
    index: usize,
    column: &'static str,
) -> Result<u64, WeeklyError> {
    let raw = row.get(index).map(String::as_str).unwrap_or("");
    raw.trim()
        .parse::<u64>()
        .map_err(|_| WeeklyError::MalformedRow {
            row: row_number,
            column,
            value: raw.to_string(),
        })
}
