use crate::analytics::reporting::DateRange;
use crate::entries::{RecyclingEntry, School};
use std::collections::HashMap;

/// Weights of the school ranking score:
/// `recycled_kg × recycled_weight + co2_kg × co2_weight`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingWeights {
    pub recycled_weight: f64,
    pub co2_weight: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        RankingWeights {
            recycled_weight: 0.5,
            co2_weight: 10.0,
        }
    }
}

impl RankingWeights {
    pub fn score(&self, recycled_kg: f64, co2_kg: f64) -> f64 {
        recycled_kg * self.recycled_weight + co2_kg * self.co2_weight
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchoolStanding {
    pub school_id: i64,
    pub school_name: String,
    pub recycled_kg: f64,
    pub co2_kg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedSchool {
    pub rank: usize,
    pub school_id: i64,
    pub school_name: String,
    pub recycled_kg: f64,
    pub co2_kg: f64,
    pub score: f64,
}

/// Per-school totals, one standing per school in `schools` order
pub fn standings(
    schools: &[School],
    entries: &[RecyclingEntry],
    range: DateRange,
) -> Vec<SchoolStanding> {
    let mut totals: HashMap<i64, (f64, f64)> = HashMap::new();
    for entry in entries.iter().filter(|e| range.contains(e.month())) {
        let slot = totals.entry(entry.school_id).or_default();
        slot.0 += entry.quantity;
        slot.1 += entry.co2_saved;
    }

    schools
        .iter()
        .map(|school| {
            let (recycled_kg, co2_kg) = totals.get(&school.id).copied().unwrap_or_default();
            SchoolStanding {
                school_id: school.id,
                school_name: school.name.clone(),
                recycled_kg,
                co2_kg,
            }
        })
        .collect()
}

/// Highest score first. The sort is stable, so equal scores keep the
/// order of `standings`.
pub fn rank_schools(standings: &[SchoolStanding], weights: &RankingWeights) -> Vec<RankedSchool> {
    let mut scored: Vec<(f64, &SchoolStanding)> = standings
        .iter()
        .map(|s| (weights.score(s.recycled_kg, s.co2_kg), s))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (score, standing))| RankedSchool {
            rank: idx + 1,
            school_id: standing.school_id,
            school_name: standing.school_name.clone(),
            recycled_kg: standing.recycled_kg,
            co2_kg: standing.co2_kg,
            score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::reporting::test_support::{recycling, school};

    fn standing(id: i64, recycled_kg: f64, co2_kg: f64) -> SchoolStanding {
        SchoolStanding {
            school_id: id,
            school_name: format!("School {}", id),
            recycled_kg,
            co2_kg,
        }
    }

    #[test]
    fn test_default_weights() {
        let weights = RankingWeights::default();
        assert_eq!(weights.score(100.0, 10.0), 150.0);
    }

    #[test]
    fn test_ranking_sorted_descending_by_score() {
        let input = vec![
            standing(1, 10.0, 1.0),  // 15
            standing(2, 100.0, 5.0), // 100
            standing(3, 40.0, 3.0),  // 50
        ];
        let ranked = rank_schools(&input, &RankingWeights::default());
        let ids: Vec<i64> = ranked.iter().map(|r| r.school_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].score, 100.0);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_preserve_input_order() {
        let input = vec![
            standing(7, 20.0, 0.0), // 10
            standing(3, 0.0, 1.0),  // 10
            standing(5, 10.0, 0.5), // 10
            standing(1, 0.0, 0.0),  // 0
        ];
        let ranked = rank_schools(&input, &RankingWeights::default());
        let ids: Vec<i64> = ranked.iter().map(|r| r.school_id).collect();
        assert_eq!(ids, vec![7, 3, 5, 1]);
    }

    #[test]
    fn test_custom_weights_change_order() {
        let input = vec![standing(1, 100.0, 1.0), standing(2, 10.0, 5.0)];
        let by_weight = RankingWeights {
            recycled_weight: 1.0,
            co2_weight: 0.0,
        };
        let ranked = rank_schools(&input, &by_weight);
        assert_eq!(ranked[0].school_id, 1);

        let ranked = rank_schools(&input, &RankingWeights::default());
        assert_eq!(ranked[0].school_id, 1);
        let by_co2 = RankingWeights {
            recycled_weight: 0.0,
            co2_weight: 1.0,
        };
        assert_eq!(rank_schools(&input, &by_co2)[0].school_id, 2);
    }

    #[test]
    fn test_standings_include_schools_without_entries() {
        let schools = vec![school(1, "Sol"), school(2, "Lua")];
        let entries = vec![recycling(1, "papel", 10.0, 1.1, "2024-01-05")];
        let result = standings(&schools, &entries, DateRange::all());
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].recycled_kg, 10.0);
        assert_eq!(result[1].recycled_kg, 0.0);
        assert_eq!(result[1].school_name, "Lua");
    }

    #[test]
    fn test_empty_ranking() {
        assert!(rank_schools(&[], &RankingWeights::default()).is_empty());
    }
}
