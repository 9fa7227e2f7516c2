use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntry {
    pub name: String,
    pub calories: u32,
    pub protein_g: u32,
    pub fat_g: u32,
    pub carbs_g: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GoalSet {
    pub protein: u32,
    pub fat: u32,
    pub carbs: u32,
}

impl Default for GoalSet {
    fn default() -> Self {
        Self {
            protein: 100,
            fat: 70,
            carbs: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MacroTotals {
    pub calories: u64,
    pub protein: u64,
    pub fat: u64,
    pub carbs: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GoalReport {
    pub protein_pct: f64,
    pub fat_pct: f64,
    pub carbs_pct: f64,
}

/// Everything eaten today plus the goals in effect. Entries are append-only
/// and live only for the process run; history is the spreadsheet's job.
#[derive(Debug, Default)]
pub struct DailyLedger {
    entries: Vec<FoodEntry>,
    goals: GoalSet,
}

impl DailyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, entry: FoodEntry) {
        self.entries.push(entry);
    }

    pub fn set_goals(&mut self, goals: GoalSet) {
        self.goals = goals;
    }

    pub fn goals(&self) -> GoalSet {
        self.goals
    }

    pub fn totals(&self) -> MacroTotals {
        self.entries
            .iter()
            .fold(MacroTotals::default(), |mut acc, entry| {
                acc.calories += u64::from(entry.calories);
                acc.protein += u64::from(entry.protein_g);
                acc.fat += u64::from(entry.fat_g);
                acc.carbs += u64::from(entry.carbs_g);
                acc
            })
    }

    /// `None` when nothing has been logged yet, so callers can tell the
    /// user apart from "logged meals with zero grams of everything".
    pub fn goal_report(&self) -> Option<GoalReport> {
        if self.entries.is_empty() {
            return None;
        }
        let totals = self.totals();
        Some(GoalReport {
            protein_pct: percent_of_goal(totals.protein, u64::from(self.goals.protein)),
            fat_pct: percent_of_goal(totals.fat, u64::from(self.goals.fat)),
            carbs_pct: percent_of_goal(totals.carbs, u64::from(self.goals.carbs)),
        })
    }
}

/// Share of `goal` covered by `consumed`, capped at 100. A zero goal reads
/// as "goal not set" and reports 0 rather than dividing by zero.
pub fn percent_of_goal(consumed: u64, goal: u64) -> f64 {
    if goal == 0 {
        return 0.0;
    }
    ((consumed as f64 / goal as f64) * 100.0).min(100.0)
}

#[cfg(test)]
mod ledger_tests {
    use super::*;

    fn entry(name: &str, calories: u32, protein: u32, fat: u32, carbs: u32) -> FoodEntry {
        FoodEntry {
            name: name.to_string(),
            calories,
            protein_g: protein,
            fat_g: fat,
            carbs_g: carbs,
        }
    }

    #[test]
    fn percent_is_zero_for_zero_goal() {
        assert_eq!(percent_of_goal(0, 0), 0.0);
        assert_eq!(percent_of_goal(50, 0), 0.0);
        assert_eq!(percent_of_goal(10_000, 0), 0.0);
    }

    #[test]
    fn percent_is_zero_for_zero_consumed() {
        assert_eq!(percent_of_goal(0, 1), 0.0);
        assert_eq!(percent_of_goal(0, 300), 0.0);
    }

    #[test]
    fn percent_is_monotonic_and_caps_at_100() {
        let mut last = 0.0;
        for consumed in 0..=250 {
            let pct = percent_of_goal(consumed, 100);
            assert!(pct >= last, "dipped at consumed={consumed}");
            assert!((0.0..=100.0).contains(&pct));
            last = pct;
        }
        assert_eq!(percent_of_goal(100, 100), 100.0);
        assert_eq!(percent_of_goal(250, 100), 100.0);
    }

    #[test]
    fn overshoot_is_capped_not_reflected() {
        // 150/100 must read 100, not the old 100 - (150 - 100) = 50.
        assert_eq!(percent_of_goal(150, 100), 100.0);
    }

    #[test]
    fn default_goals_match_the_usual_daily_targets() {
        let goals = GoalSet::default();
        assert_eq!(goals.protein, 100);
        assert_eq!(goals.fat, 70);
        assert_eq!(goals.carbs, 300);
    }

    #[test]
    fn totals_sum_every_entry() {
        let mut ledger = DailyLedger::new();
        ledger.log(entry("eggs", 150, 12, 10, 1));
        ledger.log(entry("rice", 200, 4, 0, 45));
        ledger.log(entry("chicken", 300, 40, 8, 0));
        assert_eq!(
            ledger.totals(),
            MacroTotals {
                calories: 650,
                protein: 56,
                fat: 18,
                carbs: 46,
            }
        );
    }

    #[test]
    fn report_on_empty_ledger_is_none() {
        let ledger = DailyLedger::new();
        assert!(ledger.goal_report().is_none());
    }

    #[test]
    fn report_sums_protein_against_goal() {
        let mut ledger = DailyLedger::new();
        ledger.set_goals(GoalSet {
            protein: 100,
            fat: 70,
            carbs: 300,
        });
        ledger.log(entry("a", 0, 20, 0, 0));
        ledger.log(entry("b", 0, 30, 0, 0));
        ledger.log(entry("c", 0, 25, 0, 0));
        let report = ledger.goal_report().expect("entries were logged");
        assert_eq!(report.protein_pct, 75.0);
        assert_eq!(report.fat_pct, 0.0);
        assert_eq!(report.carbs_pct, 0.0);
    }

    #[test]
    fn report_caps_overshoot_at_100() {
        let mut ledger = DailyLedger::new();
        ledger.set_goals(GoalSet {
            protein: 100,
            fat: 70,
            carbs: 300,
        });
        ledger.log(entry("shake", 600, 150, 0, 0));
        let report = ledger.goal_report().expect("entries were logged");
        assert_eq!(report.protein_pct, 100.0);
    }

    #[test]
    fn set_goals_replaces_the_whole_set() {
        let mut ledger = DailyLedger::new();
        ledger.set_goals(GoalSet {
            protein: 120,
            fat: 60,
            carbs: 250,
        });
        let goals = ledger.goals();
        assert_eq!(goals.protein, 120);
        assert_eq!(goals.fat, 60);
        assert_eq!(goals.carbs, 250);
    }
}
