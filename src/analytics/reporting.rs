use crate::analytics::goal_progress::{GoalProgress, goal_progress};
use crate::entries::{ConsumptionEntry, ConsumptionGoal, ConsumptionType, RecyclingEntry, School};
use crate::error::{DashboardError, DashboardResult};
use crate::month::Month;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Inclusive month range; an open end means unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<Month>,
    pub to: Option<Month>,
}

impl DateRange {
    pub fn all() -> Self {
        DateRange::default()
    }

    pub fn new(from: Option<Month>, to: Option<Month>) -> DashboardResult<Self> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(DashboardError::Validation(format!(
                    "Start month {} is after end month {}",
                    from, to
                )));
            }
        }
        Ok(DateRange { from, to })
    }

    pub fn contains(&self, month: Month) -> bool {
        self.from.is_none_or(|from| month >= from) && self.to.is_none_or(|to| month <= to)
    }

    pub fn describe(&self) -> String {
        match (self.from, self.to) {
            (None, None) => "All time".to_string(),
            (Some(from), None) => format!("Since {}", from),
            (None, Some(to)) => format!("Until {}", to),
            (Some(from), Some(to)) => format!("{} to {}", from, to),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecyclingTotals {
    pub total_kg: f64,
    pub total_co2_kg: f64,
    pub entry_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialTotal {
    pub material: String,
    pub kg: f64,
    pub co2_kg: f64,
    pub entry_count: usize,
    pub share_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRecycling {
    pub month: Month,
    pub kg: f64,
    pub co2_kg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyConsumption {
    pub month: Month,
    pub consumption: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionSummary {
    pub consumption_type: ConsumptionType,
    pub total_consumption: f64,
    pub total_cost: f64,
    pub average_monthly: f64,
    pub months: usize,
    /// Change between the last two months, positive when consumption rose
    pub latest_change_percent: Option<f64>,
}

pub fn recycling_totals(entries: &[RecyclingEntry]) -> RecyclingTotals {
    entries
        .iter()
        .fold(RecyclingTotals::default(), |mut totals, entry| {
            totals.total_kg += entry.quantity;
            totals.total_co2_kg += entry.co2_saved;
            totals.entry_count += 1;
            totals
        })
}

/// Per-material totals, heaviest first; equal weights keep name order
pub fn material_breakdown(entries: &[RecyclingEntry]) -> Vec<MaterialTotal> {
    let mut grouped: BTreeMap<String, (f64, f64, usize)> = BTreeMap::new();
    for entry in entries {
        let slot = grouped.entry(entry.material.clone()).or_default();
        slot.0 += entry.quantity;
        slot.1 += entry.co2_saved;
        slot.2 += 1;
    }

    let total_kg = grouped.values().fold(0.0_f64, |acc, (kg, _, _)| acc + *kg);
    let mut breakdown: Vec<MaterialTotal> = grouped
        .into_iter()
        .map(|(material, (kg, co2_kg, entry_count))| MaterialTotal {
            material,
            kg,
            co2_kg,
            entry_count,
            share_percent: if total_kg > 0.0 {
                kg / total_kg * 100.0
            } else {
                0.0
            },
        })
        .collect();
    breakdown.sort_by(|a, b| b.kg.total_cmp(&a.kg));
    breakdown
}

pub fn distinct_materials(entries: &[RecyclingEntry]) -> usize {
    entries
        .iter()
        .map(|e| e.material.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Monthly recycling series in chronological order
pub fn monthly_recycling(entries: &[RecyclingEntry]) -> Vec<MonthlyRecycling> {
    let mut grouped: BTreeMap<Month, (f64, f64)> = BTreeMap::new();
    for entry in entries {
        let slot = grouped.entry(entry.month()).or_default();
        slot.0 += entry.quantity;
        slot.1 += entry.co2_saved;
    }
    grouped
        .into_iter()
        .map(|(month, (kg, co2_kg))| MonthlyRecycling { month, kg, co2_kg })
        .collect()
}

/// Monthly series for one consumption type; several entries in the same
/// month are summed
pub fn monthly_consumption(
    entries: &[ConsumptionEntry],
    consumption_type: ConsumptionType,
) -> Vec<MonthlyConsumption> {
    let mut grouped: BTreeMap<Month, (f64, f64)> = BTreeMap::new();
    for entry in entries
        .iter()
        .filter(|e| e.consumption_type == consumption_type)
    {
        let slot = grouped.entry(entry.month).or_default();
        slot.0 += entry.consumption;
        slot.1 += entry.cost;
    }
    grouped
        .into_iter()
        .map(|(month, (consumption, cost))| MonthlyConsumption {
            month,
            consumption,
            cost,
        })
        .collect()
}

/// Percentage change from the second-to-last to the last value.
/// `None` with fewer than two values or a zero baseline.
pub fn period_delta(values: &[f64]) -> Option<f64> {
    let [.., previous, latest] = values else {
        return None;
    };
    if *previous == 0.0 {
        return None;
    }
    Some((latest - previous) / previous * 100.0)
}

pub fn consumption_summary(
    entries: &[ConsumptionEntry],
    consumption_type: ConsumptionType,
) -> ConsumptionSummary {
    let series = monthly_consumption(entries, consumption_type);
    // fold from +0.0: an empty f64 sum is -0.0, which prints as "-0.00"
    let total_consumption = series.iter().fold(0.0_f64, |acc, m| acc + m.consumption);
    let total_cost = series.iter().fold(0.0_f64, |acc, m| acc + m.cost);
    let months = series.len();
    let values: Vec<f64> = series.iter().map(|m| m.consumption).collect();

    ConsumptionSummary {
        consumption_type,
        total_consumption,
        total_cost,
        average_monthly: if months > 0 {
            total_consumption / months as f64
        } else {
            0.0
        },
        months,
        latest_change_percent: period_delta(&values),
    }
}

/// Everything the dashboard and the exporters show for one school
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolReport {
    pub school: School,
    pub range: DateRange,
    pub generated_on: NaiveDate,
    pub recycling: RecyclingTotals,
    pub materials: Vec<MaterialTotal>,
    pub monthly_recycling: Vec<MonthlyRecycling>,
    pub water: ConsumptionSummary,
    pub energy: ConsumptionSummary,
    pub monthly_water: Vec<MonthlyConsumption>,
    pub monthly_energy: Vec<MonthlyConsumption>,
    pub goals: Vec<ConsumptionGoal>,
    pub goal_progress: Vec<GoalProgress>,
    pub recycling_entries: Vec<RecyclingEntry>,
    pub consumption_entries: Vec<ConsumptionEntry>,
}

impl SchoolReport {
    pub fn consumption(&self, consumption_type: ConsumptionType) -> &ConsumptionSummary {
        match consumption_type {
            ConsumptionType::Water => &self.water,
            ConsumptionType::Energy => &self.energy,
        }
    }

    pub fn monthly(&self, consumption_type: ConsumptionType) -> &[MonthlyConsumption] {
        match consumption_type {
            ConsumptionType::Water => &self.monthly_water,
            ConsumptionType::Energy => &self.monthly_energy,
        }
    }

    pub fn progress_for(&self, consumption_type: ConsumptionType) -> Option<&GoalProgress> {
        self.goal_progress
            .iter()
            .find(|p| p.consumption_type == consumption_type)
    }

    pub fn goal_for(&self, consumption_type: ConsumptionType) -> Option<&ConsumptionGoal> {
        self.goals
            .iter()
            .find(|g| g.consumption_type == consumption_type)
    }
}

pub fn build_report(
    school: &School,
    recycling: &[RecyclingEntry],
    consumption: &[ConsumptionEntry],
    goals: &[ConsumptionGoal],
    range: DateRange,
    generated_on: NaiveDate,
) -> SchoolReport {
    let mut recycling_entries: Vec<RecyclingEntry> = recycling
        .iter()
        .filter(|e| e.school_id == school.id && range.contains(e.month()))
        .cloned()
        .collect();
    recycling_entries.sort_by_key(|e| (e.date, e.id));

    let mut consumption_entries: Vec<ConsumptionEntry> = consumption
        .iter()
        .filter(|e| e.school_id == school.id && range.contains(e.month))
        .cloned()
        .collect();
    consumption_entries.sort_by_key(|e| (e.month, e.id));

    let goals: Vec<ConsumptionGoal> = goals
        .iter()
        .filter(|g| g.school_id == school.id)
        .cloned()
        .collect();

    let monthly_water = monthly_consumption(&consumption_entries, ConsumptionType::Water);
    let monthly_energy = monthly_consumption(&consumption_entries, ConsumptionType::Energy);

    let goal_progress = goals
        .iter()
        .filter_map(|goal| {
            let series = match goal.consumption_type {
                ConsumptionType::Water => &monthly_water,
                ConsumptionType::Energy => &monthly_energy,
            };
            goal_progress(goal.consumption_type, series, goal.reduction_percentage)
        })
        .collect();

    SchoolReport {
        school: school.clone(),
        range,
        generated_on,
        recycling: recycling_totals(&recycling_entries),
        materials: material_breakdown(&recycling_entries),
        monthly_recycling: monthly_recycling(&recycling_entries),
        water: consumption_summary(&consumption_entries, ConsumptionType::Water),
        energy: consumption_summary(&consumption_entries, ConsumptionType::Energy),
        monthly_water,
        monthly_energy,
        goals,
        goal_progress,
        recycling_entries,
        consumption_entries,
    }
}
