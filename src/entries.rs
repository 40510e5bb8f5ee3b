use crate::month::Month;
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConsumptionType {
    Water,
    Energy,
}

struct ConsumptionTypeInfo {
    key: &'static str,
    label: &'static str,
    unit: &'static str,
    icon: &'static str,
}

const CONSUMPTION_TYPES: [(ConsumptionType, ConsumptionTypeInfo); 2] = [
    (
        ConsumptionType::Water,
        ConsumptionTypeInfo {
            key: "water",
            label: "Water",
            unit: "L",
            icon: "💧",
        },
    ),
    (
        ConsumptionType::Energy,
        ConsumptionTypeInfo {
            key: "energy",
            label: "Energy",
            unit: "kWh",
            icon: "⚡",
        },
    ),
];

impl ConsumptionType {
    pub const ALL: [ConsumptionType; 2] = [ConsumptionType::Water, ConsumptionType::Energy];

    fn info(&self) -> &'static ConsumptionTypeInfo {
        match self {
            ConsumptionType::Water => &CONSUMPTION_TYPES[0].1,
            ConsumptionType::Energy => &CONSUMPTION_TYPES[1].1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.info().key
    }

    pub fn from(s: &str) -> Option<Self> {
        CONSUMPTION_TYPES
            .iter()
            .find(|(_, info)| info.key.eq_ignore_ascii_case(s.trim()))
            .map(|(kind, _)| *kind)
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    /// Liters for water, kWh for energy
    pub fn unit(&self) -> &'static str {
        self.info().unit
    }

    pub fn icon(&self) -> &'static str {
        self.info().icon
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct School {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecyclingEntry {
    pub id: i64,
    pub school_id: i64,
    pub material: String,
    pub quantity: f64,
    pub co2_saved: f64,
    pub date: NaiveDate,
}

impl RecyclingEntry {
    pub fn month(&self) -> Month {
        Month::of(self.date)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionEntry {
    pub id: i64,
    pub school_id: i64,
    pub consumption_type: ConsumptionType,
    pub month: Month,
    pub consumption: f64,
    pub cost: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionGoal {
    pub school_id: i64,
    pub consumption_type: ConsumptionType,
    pub reduction_percentage: f64,
}

/// Validated recycling input, ready to be stored once its CO2 is computed
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecyclingEntry {
    pub material: String,
    pub quantity: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewConsumptionEntry {
    pub consumption_type: ConsumptionType,
    pub month: Month,
    pub consumption: f64,
    pub cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumption_type_as_str() {
        assert_eq!(ConsumptionType::Water.as_str(), "water");
        assert_eq!(ConsumptionType::Energy.as_str(), "energy");
    }

    #[test]
    fn test_consumption_type_from_str() {
        assert_eq!(ConsumptionType::from("water"), Some(ConsumptionType::Water));
        assert_eq!(ConsumptionType::from(" Energy "), Some(ConsumptionType::Energy));
        assert_eq!(ConsumptionType::from("gas"), None);
    }

    #[test]
    fn test_consumption_type_units() {
        assert_eq!(ConsumptionType::Water.unit(), "L");
        assert_eq!(ConsumptionType::Energy.unit(), "kWh");
    }

    #[test]
    fn test_recycling_entry_month() {
        let entry = RecyclingEntry {
            id: 1,
            school_id: 1,
            material: "papel".to_string(),
            quantity: 10.0,
            co2_saved: 11.0,
            date: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
        };
        assert_eq!(entry.month().to_string(), "2024-05");
    }
}
