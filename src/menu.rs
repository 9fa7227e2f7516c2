use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Stdin};
use tracing::warn;

use crate::state::AppState;
use crate::tracker::ledger::{DailyLedger, FoodEntry, GoalSet};
use crate::tracker::services;
use crate::tracker::weekly;

const MENU: &str = "\
(1) Log a meal
(2) Set new daily goals
(3) Review today's progress
(4) Calculate weekly totals
(q) Quit";

type Input = BufReader<Stdin>;

/// Interactive loop. Every recoverable error prints a message and comes
/// back to the menu; only broken stdin/stdout ends the process early.
pub async fn run(state: &AppState) -> anyhow::Result<()> {
    let mut input = BufReader::new(tokio::io::stdin());
    let mut ledger = DailyLedger::new();

    loop {
        println!("\n{MENU}");
        let Some(choice) = prompt(&mut input, "Enter your choice: ").await? else {
            break;
        };
        match normalize_choice(&choice).as_str() {
            "1" => log_meal_flow(state, &mut ledger, &mut input).await?,
            "2" => set_goals_flow(state, &mut ledger, &mut input).await?,
            "3" => daily_report_flow(state, &ledger).await,
            "4" => weekly_totals_flow(state).await,
            "q" => break,
            _ => println!("Invalid choice, please try again."),
        }
    }

    println!("Great job tracking your food today!");
    Ok(())
}

async fn log_meal_flow(
    state: &AppState,
    ledger: &mut DailyLedger,
    input: &mut Input,
) -> anyhow::Result<()> {
    let Some(name) = prompt(input, "What did you eat? ").await? else {
        return Ok(());
    };
    if name.is_empty() {
        println!("A meal needs a name.");
        return Ok(());
    }
    let Some(answer) = prompt(input, "Do you know the calorie and macro values? (y/n): ").await?
    else {
        return Ok(());
    };

    let entry = if normalize_choice(&answer) == "n" {
        match state.nutrition.lookup(&name).await {
            Ok(Some(facts)) => {
                let entry = facts.into_entry(&name);
                println!(
                    "Found {}: {} kcal, {}g protein, {}g fat, {}g carbs",
                    entry.name, entry.calories, entry.protein_g, entry.fat_g, entry.carbs_g
                );
                Some(entry)
            }
            Ok(None) => {
                println!("No nutrition data for {name:?}; enter the values yourself.");
                manual_entry(input, name).await?
            }
            Err(err) => {
                warn!(error = %err, "nutrition lookup failed");
                println!("{err}; the meal was not logged.");
                None
            }
        }
    } else {
        manual_entry(input, name).await?
    };

    let Some(entry) = entry else {
        return Ok(());
    };
    match services::log_meal(state, ledger, entry).await {
        Ok(()) => println!("Successfully added!"),
        Err(err) => {
            warn!(error = %err, "spreadsheet append failed");
            println!("Kept locally, but the spreadsheet write failed: {err:#}");
        }
    }
    Ok(())
}

async fn manual_entry(input: &mut Input, name: String) -> anyhow::Result<Option<FoodEntry>> {
    let Some(calories) = prompt_amount(input, "Calories (whole number): ").await? else {
        return Ok(None);
    };
    let Some(protein_g) = prompt_amount(input, "Protein in grams (whole number): ").await? else {
        return Ok(None);
    };
    let Some(fat_g) = prompt_amount(input, "Fat in grams (whole number): ").await? else {
        return Ok(None);
    };
    let Some(carbs_g) = prompt_amount(input, "Carbs in grams (whole number): ").await? else {
        return Ok(None);
    };
    Ok(Some(FoodEntry {
        name,
        calories,
        protein_g,
        fat_g,
        carbs_g,
    }))
}

async fn set_goals_flow(
    state: &AppState,
    ledger: &mut DailyLedger,
    input: &mut Input,
) -> anyhow::Result<()> {
    let Some(protein) = prompt_amount(input, "New protein goal in grams: ").await? else {
        return Ok(());
    };
    let Some(fat) = prompt_amount(input, "New fat goal in grams: ").await? else {
        return Ok(());
    };
    let Some(carbs) = prompt_amount(input, "New carb goal in grams: ").await? else {
        return Ok(());
    };

    match services::record_goals(state, ledger, GoalSet { protein, fat, carbs }).await {
        Ok(()) => println!("New goals set and logged."),
        Err(err) => {
            warn!(error = %err, "spreadsheet append failed");
            println!("Goals set, but the spreadsheet write failed: {err:#}");
        }
    }
    Ok(())
}

async fn daily_report_flow(state: &AppState, ledger: &DailyLedger) {
    let Some(report) = ledger.goal_report() else {
        println!("Nothing logged yet today.");
        return;
    };
    println!("\nDaily goal progress:");
    println!("Protein: {:.2}% of goal reached", report.protein_pct);
    println!("Fat: {:.2}% of goal reached", report.fat_pct);
    println!("Carbs: {:.2}% of goal reached", report.carbs_pct);
    if let Err(err) = services::push_goal_snapshot(state, ledger).await {
        warn!(error = %err, "spreadsheet append failed");
        println!("Could not record the snapshot: {err:#}");
    }
}

async fn weekly_totals_flow(state: &AppState) {
    match services::weekly_totals(state).await {
        Ok(totals) => {
            println!("\nWeekly totals (last {} logged meals):", weekly::WINDOW);
            println!("Calories: {}", totals.calories);
            println!("Protein: {}g", totals.protein);
            println!("Fat: {}g", totals.fat);
            println!("Carbs: {}g", totals.carbs);
        }
        Err(err) => {
            warn!(error = %err, "weekly aggregation failed");
            println!("Weekly totals unavailable: {err:#}");
        }
    }
}

/// Reads one trimmed line; `None` on EOF, which every caller treats as
/// "back out quietly".
async fn prompt(input: &mut Input, message: &str) -> anyhow::Result<Option<String>> {
    print!("{message}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Re-prompts until the line parses as a non-negative whole number.
async fn prompt_amount(input: &mut Input, message: &str) -> anyhow::Result<Option<u32>> {
    loop {
        let Some(raw) = prompt(input, message).await? else {
            return Ok(None);
        };
        match parse_amount(&raw) {
            Ok(value) => return Ok(Some(value)),
            Err(reason) => println!("{reason}"),
        }
    }
}

fn normalize_choice(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

fn parse_amount(raw: &str) -> Result<u32, &'static str> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| "Please enter a whole, non-negative number.")
}

#[cfg(test)]
mod menu_tests {
    use super::*;

    #[test]
    fn choices_are_trimmed_and_lowercased() {
        assert_eq!(normalize_choice("  Q \n"), "q");
        assert_eq!(normalize_choice("1"), "1");
        assert_eq!(normalize_choice("N"), "n");
    }

    #[test]
    fn amounts_must_be_whole_and_non_negative() {
        assert_eq!(parse_amount("42"), Ok(42));
        assert_eq!(parse_amount(" 0 "), Ok(0));
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("12.5").is_err());
        assert!(parse_amount("lots").is_err());
        assert!(parse_amount("").is_err());
    }
}
