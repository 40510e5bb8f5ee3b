use crate::entries::ConsumptionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipCategory {
    Recycling,
    Consumption(ConsumptionType),
}

#[derive(Debug)]
pub struct Tip {
    pub id: &'static str,
    pub category: TipCategory,
    pub text: &'static str,
}

pub const TIPS: [Tip; 6] = [
    Tip {
        id: "separate_at_source",
        category: TipCategory::Recycling,
        text: "Put labelled bins in every classroom so material is separated at the source.",
    },
    Tip {
        id: "weigh_weekly",
        category: TipCategory::Recycling,
        text: "Weigh collected material once a week so monthly totals stay accurate.",
    },
    Tip {
        id: "fix_leaks",
        category: TipCategory::Consumption(ConsumptionType::Water),
        text: "Check taps and toilets for leaks; a dripping tap wastes thousands of liters a year.",
    },
    Tip {
        id: "rainwater",
        category: TipCategory::Consumption(ConsumptionType::Water),
        text: "Collect rainwater for cleaning courtyards and watering the garden.",
    },
    Tip {
        id: "lights_off",
        category: TipCategory::Consumption(ConsumptionType::Energy),
        text: "Assign a student each day to switch lights and projectors off after class.",
    },
    Tip {
        id: "standby",
        category: TipCategory::Consumption(ConsumptionType::Energy),
        text: "Unplug computers and chargers overnight to cut standby consumption.",
    },
];

/// Tips the user has not dismissed, in table order
pub fn visible_tips(dismissed: &[String]) -> Vec<&'static Tip> {
    TIPS.iter()
        .filter(|tip| !dismissed.iter().any(|id| id == tip.id))
        .collect()
}

pub fn is_known_tip(id: &str) -> bool {
    TIPS.iter().any(|tip| tip.id == id)
}
