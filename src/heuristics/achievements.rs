use crate::analytics::goal_progress::GoalStatus;
use crate::analytics::reporting::{SchoolReport, distinct_materials};
use crate::entries::ConsumptionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Achievement {
    FirstEntry,
    Recycled100Kg,
    Recycled500Kg,
    Recycled1000Kg,
    Co2Saved100Kg,
    MaterialVariety,
    GoalSetter,
    WaterSaver,
    EnergySaver,
}

pub struct AchievementInfo {
    pub achievement: Achievement,
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub const ACHIEVEMENTS: [AchievementInfo; 9] = [
    AchievementInfo {
        achievement: Achievement::FirstEntry,
        id: "first_entry",
        title: "First Step",
        description: "Log the first recycling entry",
        icon: "🌱",
    },
    AchievementInfo {
        achievement: Achievement::Recycled100Kg,
        id: "recycled_100kg",
        title: "Collector",
        description: "Recycle 100 kg of material",
        icon: "♻",
    },
    AchievementInfo {
        achievement: Achievement::Recycled500Kg,
        id: "recycled_500kg",
        title: "Recycling Champion",
        description: "Recycle 500 kg of material",
        icon: "🏅",
    },
    AchievementInfo {
        achievement: Achievement::Recycled1000Kg,
        id: "recycled_1000kg",
        title: "One Tonne Club",
        description: "Recycle 1000 kg of material",
        icon: "🏆",
    },
    AchievementInfo {
        achievement: Achievement::Co2Saved100Kg,
        id: "co2_100kg",
        title: "Climate Helper",
        description: "Avoid 100 kg of CO2",
        icon: "🌍",
    },
    AchievementInfo {
        achievement: Achievement::MaterialVariety,
        id: "material_variety",
        title: "Sorting Expert",
        description: "Recycle 5 different materials",
        icon: "🗂",
    },
    AchievementInfo {
        achievement: Achievement::GoalSetter,
        id: "goal_setter",
        title: "Goal Setter",
        description: "Set a consumption reduction goal",
        icon: "🎯",
    },
    AchievementInfo {
        achievement: Achievement::WaterSaver,
        id: "water_saver",
        title: "Water Saver",
        description: "Reach the water reduction goal",
        icon: "💧",
    },
    AchievementInfo {
        achievement: Achievement::EnergySaver,
        id: "energy_saver",
        title: "Energy Saver",
        description: "Reach the energy reduction goal",
        icon: "⚡",
    },
];

const VARIETY_THRESHOLD: usize = 5;

impl Achievement {
    pub fn info(&self) -> &'static AchievementInfo {
        ACHIEVEMENTS
            .iter()
            .find(|info| info.achievement == *self)
            .unwrap_or(&ACHIEVEMENTS[0])
    }

    pub fn id(&self) -> &'static str {
        self.info().id
    }

    pub fn from_id(id: &str) -> Option<Self> {
        ACHIEVEMENTS
            .iter()
            .find(|info| info.id == id)
            .map(|info| info.achievement)
    }
}

fn goal_reached(report: &SchoolReport, consumption_type: ConsumptionType) -> bool {
    report
        .progress_for(consumption_type)
        .is_some_and(|p| p.goal_percent > 0.0 && p.status == GoalStatus::OnTrack)
}

/// Milestones the report currently satisfies, in table order
pub fn evaluate(report: &SchoolReport) -> Vec<Achievement> {
    let recycled = report.recycling.total_kg;
    ACHIEVEMENTS
        .iter()
        .map(|info| info.achievement)
        .filter(|achievement| match achievement {
            Achievement::FirstEntry => report.recycling.entry_count >= 1,
            Achievement::Recycled100Kg => recycled >= 100.0,
            Achievement::Recycled500Kg => recycled >= 500.0,
            Achievement::Recycled1000Kg => recycled >= 1000.0,
            Achievement::Co2Saved100Kg => report.recycling.total_co2_kg >= 100.0,
            Achievement::MaterialVariety => {
                distinct_materials(&report.recycling_entries) >= VARIETY_THRESHOLD
            }
            Achievement::GoalSetter => !report.goals.is_empty(),
            Achievement::WaterSaver => goal_reached(report, ConsumptionType::Water),
            Achievement::EnergySaver => goal_reached(report, ConsumptionType::Energy),
        })
        .collect()
}

/// Achievements in `current` whose id is not already in `previous_ids`
pub fn newly_unlocked(previous_ids: &[String], current: &[Achievement]) -> Vec<Achievement> {
    current
        .iter()
        .filter(|a| !previous_ids.iter().any(|id| id == a.id()))
        .copied()
        .collect()
}
