use crate::analytics::reporting::MonthlyConsumption;
use crate::entries::ConsumptionType;
use crate::month::Month;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    OnTrack,
    Improving,
    NeedsImprovement,
}

impl GoalStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GoalStatus::OnTrack => "on_track",
            GoalStatus::Improving => "improving",
            GoalStatus::NeedsImprovement => "needs_improvement",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            GoalStatus::OnTrack => "On track",
            GoalStatus::Improving => "Improving",
            GoalStatus::NeedsImprovement => "Needs improvement",
        }
    }
}

/// Reduction between the two most recent monthly readings, measured
/// against the school's goal for that consumption type
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub consumption_type: ConsumptionType,
    pub previous_month: Month,
    pub latest_month: Month,
    pub previous: f64,
    pub latest: f64,
    /// Positive when consumption went down
    pub reduction_percent: f64,
    pub goal_percent: f64,
    pub status: GoalStatus,
    /// The previous reading was zero, so no reduction can be measured
    pub no_baseline: bool,
}

pub fn classify(reduction_percent: f64, goal_percent: f64) -> GoalStatus {
    if reduction_percent >= goal_percent {
        GoalStatus::OnTrack
    } else if reduction_percent > 0.0 {
        GoalStatus::Improving
    } else {
        GoalStatus::NeedsImprovement
    }
}

/// (previous − latest) / previous × 100, or 0 when there is no baseline
pub fn reduction_percent(previous: f64, latest: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (previous - latest) / previous * 100.0
    }
}

/// Progress from a monthly series (any order). Fewer than two months of
/// readings yields `None`.
pub fn goal_progress(
    consumption_type: ConsumptionType,
    series: &[MonthlyConsumption],
    goal_percent: f64,
) -> Option<GoalProgress> {
    let mut ordered: Vec<&MonthlyConsumption> = series.iter().collect();
    ordered.sort_by_key(|m| m.month);

    let [.., previous, latest] = ordered.as_slice() else {
        return None;
    };

    let no_baseline = previous.consumption == 0.0;
    let reduction = reduction_percent(previous.consumption, latest.consumption);

    Some(GoalProgress {
        consumption_type,
        previous_month: previous.month,
        latest_month: latest.month,
        previous: previous.consumption,
        latest: latest.consumption,
        reduction_percent: reduction,
        goal_percent,
        status: classify(reduction, goal_percent),
        no_baseline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(month: &str, consumption: f64) -> MonthlyConsumption {
        MonthlyConsumption {
            month: month.parse().unwrap(),
            consumption,
            cost: 0.0,
        }
    }

    #[test]
    fn test_water_scenario_on_track() {
        let series = vec![reading("2024-01", 1000.0), reading("2024-02", 800.0)];
        let progress = goal_progress(ConsumptionType::Water, &series, 15.0).unwrap();
        assert!((progress.reduction_percent - 20.0).abs() < 1e-9);
        assert_eq!(progress.status, GoalStatus::OnTrack);
        assert!(!progress.no_baseline);
    }

    #[test]
    fn test_uses_last_two_months_regardless_of_input_order() {
        let series = vec![
            reading("2024-03", 900.0),
            reading("2024-01", 1000.0),
            reading("2024-02", 1000.0),
        ];
        let progress = goal_progress(ConsumptionType::Energy, &series, 15.0).unwrap();
        assert_eq!(progress.previous_month.to_string(), "2024-02");
        assert_eq!(progress.latest_month.to_string(), "2024-03");
        assert!((progress.reduction_percent - 10.0).abs() < 1e-9);
        assert_eq!(progress.status, GoalStatus::Improving);
    }

    #[test]
    fn test_increase_needs_improvement() {
        let series = vec![reading("2024-01", 800.0), reading("2024-02", 1000.0)];
        let progress = goal_progress(ConsumptionType::Water, &series, 10.0).unwrap();
        assert!(progress.reduction_percent < 0.0);
        assert_eq!(progress.status, GoalStatus::NeedsImprovement);
    }

    #[test]
    fn test_fewer_than_two_readings_is_none() {
        assert!(goal_progress(ConsumptionType::Water, &[], 10.0).is_none());
        assert!(goal_progress(ConsumptionType::Water, &[reading("2024-01", 5.0)], 10.0).is_none());
    }

    #[test]
    fn test_zero_previous_is_defined_no_change() {
        let series = vec![reading("2024-01", 0.0), reading("2024-02", 500.0)];
        let progress = goal_progress(ConsumptionType::Water, &series, 10.0).unwrap();
        assert_eq!(progress.reduction_percent, 0.0);
        assert!(!progress.reduction_percent.is_nan());
        assert!(progress.no_baseline);
        assert_eq!(progress.status, GoalStatus::NeedsImprovement);
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(15.0, 15.0), GoalStatus::OnTrack);
        assert_eq!(classify(0.1, 15.0), GoalStatus::Improving);
        assert_eq!(classify(0.0, 15.0), GoalStatus::NeedsImprovement);
        assert_eq!(classify(0.0, 0.0), GoalStatus::OnTrack);
    }
}
