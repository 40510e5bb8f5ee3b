use crate::analytics::reporting::MonthlyConsumption;
use crate::entries::ConsumptionType;

const TREND_THRESHOLD_PERCENT: f64 = 5.0;
const RISING_SUGGESTION: f64 = 10.0;
const STABLE_SUGGESTION: f64 = 5.0;
const FALLING_BONUS: f64 = 5.0;
const MAX_SUGGESTION: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Rising,
    Stable,
    Falling,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalSuggestion {
    pub consumption_type: ConsumptionType,
    /// Mean of the last three monthly readings
    pub recent_average: f64,
    /// Latest reading vs. the one two periods before it
    pub trend_percent: f64,
    pub direction: TrendDirection,
    pub suggested_percent: f64,
}

impl GoalSuggestion {
    pub fn reason(&self) -> String {
        let unit = self.consumption_type.unit();
        match self.direction {
            TrendDirection::Rising => format!(
                "Consumption rose {:.1}% over the last months (average {:.0} {}). Start with a moderate target.",
                self.trend_percent, self.recent_average, unit
            ),
            TrendDirection::Falling => format!(
                "Consumption already fell {:.1}% (average {:.0} {}). Keep the momentum with a stretch target.",
                -self.trend_percent, self.recent_average, unit
            ),
            TrendDirection::Stable => format!(
                "Consumption is stable around {:.0} {}. A small target is a good first step.",
                self.recent_average, unit
            ),
        }
    }
}

/// Suggests a reduction goal from the recent trend.
///
/// Needs at least three months; the series may be in any order.
pub fn suggest_goal(
    consumption_type: ConsumptionType,
    series: &[MonthlyConsumption],
) -> Option<GoalSuggestion> {
    let mut ordered: Vec<&MonthlyConsumption> = series.iter().collect();
    ordered.sort_by_key(|m| m.month);

    let [.., two_back, _, latest] = ordered.as_slice() else {
        return None;
    };

    let last_three = &ordered[ordered.len() - 3..];
    let recent_average = last_three.iter().map(|m| m.consumption).sum::<f64>() / 3.0;
    let trend_percent = if two_back.consumption == 0.0 {
        0.0
    } else {
        (latest.consumption - two_back.consumption) / two_back.consumption * 100.0
    };

    let (direction, suggested_percent) = if trend_percent > TREND_THRESHOLD_PERCENT {
        (TrendDirection::Rising, RISING_SUGGESTION)
    } else if trend_percent < -TREND_THRESHOLD_PERCENT {
        let stretch = (trend_percent.abs() + FALLING_BONUS).min(MAX_SUGGESTION);
        (TrendDirection::Falling, stretch.round())
    } else {
        (TrendDirection::Stable, STABLE_SUGGESTION)
    };

    Some(GoalSuggestion {
        consumption_type,
        recent_average,
        trend_percent,
        direction,
        suggested_percent,
    })
}
