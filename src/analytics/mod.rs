//! Derivation layer: pure folds from raw entries to the aggregates the
//! dashboard and exports display. Nothing here touches the database.

pub mod goal_progress;
pub mod ranking;
pub mod reporting;

pub use goal_progress::{GoalProgress, GoalStatus, classify, goal_progress};
pub use ranking::{RankedSchool, RankingWeights, SchoolStanding, rank_schools, standings};
pub use reporting::{
    ConsumptionSummary, DateRange, MaterialTotal, MonthlyConsumption, MonthlyRecycling,
    RecyclingTotals, SchoolReport, build_report, consumption_summary, material_breakdown,
    monthly_consumption, monthly_recycling, period_delta, recycling_totals,
};
