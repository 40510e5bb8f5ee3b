//! Checks applied at the write boundary, before anything reaches the database.
//!
//! Form parsing stops at the first violated rule and reports it, so the user
//! sees one actionable message at a time.

use crate::entries::{ConsumptionType, NewConsumptionEntry, NewRecyclingEntry};
use crate::error::{DashboardError, DashboardResult};
use crate::month::Month;
use chrono::NaiveDate;

const MAX_NAME_LENGTH: usize = 80;

fn invalid<T>(message: impl Into<String>) -> DashboardResult<T> {
    Err(DashboardError::Validation(message.into()))
}

pub fn validate_quantity(quantity: f64) -> DashboardResult<f64> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return invalid("Quantity must be a positive number of kilograms");
    }
    Ok(quantity)
}

pub fn validate_consumption(consumption: f64) -> DashboardResult<f64> {
    if !consumption.is_finite() || consumption <= 0.0 {
        return invalid("Consumption must be a positive number");
    }
    Ok(consumption)
}

pub fn validate_cost(cost: f64) -> DashboardResult<f64> {
    if !cost.is_finite() || cost < 0.0 {
        return invalid("Cost must be zero or a positive amount");
    }
    Ok(cost)
}

pub fn validate_percentage(percentage: f64) -> DashboardResult<f64> {
    if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
        return invalid("Reduction percentage must be between 0 and 100");
    }
    Ok(percentage)
}

pub fn validate_factor(factor: f64) -> DashboardResult<f64> {
    if !factor.is_finite() || factor <= 0.0 {
        return invalid("CO2 factor must be a positive number");
    }
    Ok(factor)
}

fn validate_name(value: &str, what: &str) -> DashboardResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return invalid(format!("{} is required", what));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return invalid(format!(
            "{} must be at most {} characters",
            what, MAX_NAME_LENGTH
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_material_name(material: &str) -> DashboardResult<String> {
    validate_name(material, "Material")
}

pub fn validate_school_name(name: &str) -> DashboardResult<String> {
    validate_name(name, "School name")
}

/// True for "12,500" or "1,234,567.5": commas only between groups of three
/// digits in the integer part, as `format_amount` prints them
fn is_grouped(text: &str) -> bool {
    let integer = text.split('.').next().unwrap_or_default();
    let integer = integer.strip_prefix('-').unwrap_or(integer);
    let mut groups = integer.split(',');
    let leading_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()));
    leading_ok && groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_number(text: &str, field: &str) -> DashboardResult<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return invalid(format!("{} is required", field));
    }

    // A lone comma is a decimal comma ("12,5"), except before exactly three
    // digits where it reads just as well as a thousands separator
    let normalized = match trimmed.split_once(',') {
        None => trimmed.to_string(),
        Some((whole, fraction)) if !fraction.contains([',', '.']) => {
            if fraction.len() == 3 && fraction.bytes().all(|b| b.is_ascii_digit()) {
                return invalid(format!(
                    "{} '{}' is ambiguous: write {}{} or {}.{}",
                    field, trimmed, whole, fraction, whole, fraction
                ));
            }
            format!("{}.{}", whole, fraction)
        }
        Some(_) if is_grouped(trimmed) => trimmed.replace(',', ""),
        Some(_) => return invalid(format!("{} must be a number", field)),
    };
    normalized
        .parse::<f64>()
        .map_err(|_| DashboardError::Validation(format!("{} must be a number", field)))
}

pub fn parse_date(text: &str) -> DashboardResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| {
        DashboardError::Validation(format!(
            "Date must use the YYYY-MM-DD format (got '{}')",
            text.trim()
        ))
    })
}

/// Raw text of the "log recycling" form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecyclingForm {
    pub material: String,
    pub quantity: String,
    pub date: String,
}

impl RecyclingForm {
    /// An empty date means "today"
    pub fn parse(&self, today: NaiveDate) -> DashboardResult<NewRecyclingEntry> {
        let material = validate_material_name(&self.material)?;
        let quantity = validate_quantity(parse_number(&self.quantity, "Quantity")?)?;
        let date = if self.date.trim().is_empty() {
            today
        } else {
            parse_date(&self.date)?
        };
        if date > today {
            return invalid("Date cannot be in the future");
        }
        Ok(NewRecyclingEntry {
            material,
            quantity,
            date,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionForm {
    pub consumption_type: ConsumptionType,
    pub month: String,
    pub consumption: String,
    pub cost: String,
}

impl Default for ConsumptionForm {
    fn default() -> Self {
        ConsumptionForm {
            consumption_type: ConsumptionType::Water,
            month: String::new(),
            consumption: String::new(),
            cost: String::new(),
        }
    }
}

impl ConsumptionForm {
    pub fn parse(&self) -> DashboardResult<NewConsumptionEntry> {
        let month: Month = self.month.trim().parse()?;
        let consumption = validate_consumption(parse_number(&self.consumption, "Consumption")?)?;
        let cost = if self.cost.trim().is_empty() {
            0.0
        } else {
            validate_cost(parse_number(&self.cost, "Cost")?)?
        };
        Ok(NewConsumptionEntry {
            consumption_type: self.consumption_type,
            month,
            consumption,
            cost,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalForm {
    pub consumption_type: ConsumptionType,
    pub reduction_percentage: String,
}

impl Default for GoalForm {
    fn default() -> Self {
        GoalForm {
            consumption_type: ConsumptionType::Water,
            reduction_percentage: String::new(),
        }
    }
}

impl GoalForm {
    pub fn parse(&self) -> DashboardResult<(ConsumptionType, f64)> {
        let percentage = validate_percentage(parse_number(
            &self.reduction_percentage,
            "Reduction percentage",
        )?)?;
        Ok((self.consumption_type, percentage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_quantity_rules() {
        assert!(validate_quantity(0.1).is_ok());
        assert!(validate_quantity(0.0).is_err());
        assert!(validate_quantity(-1.0).is_err());
        assert!(validate_quantity(f64::INFINITY).is_err());
        assert!(validate_quantity(f64::NAN).is_err());
    }

    #[test]
    fn test_percentage_bounds_inclusive() {
        assert!(validate_percentage(0.0).is_ok());
        assert!(validate_percentage(100.0).is_ok());
        assert!(validate_percentage(100.5).is_err());
        assert!(validate_percentage(-0.1).is_err());
    }

    #[test]
    fn test_cost_allows_zero() {
        assert!(validate_cost(0.0).is_ok());
        assert!(validate_cost(-0.01).is_err());
    }

    #[test]
    fn test_recycling_form_parses() {
        let form = RecyclingForm {
            material: " papel ".to_string(),
            quantity: "12,5".to_string(),
            date: "2024-06-01".to_string(),
        };
        let entry = form.parse(today()).unwrap();
        assert_eq!(entry.material, "papel");
        assert_eq!(entry.quantity, 12.5);
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_number_separators() {
        assert_eq!(parse_number("12,5", "Consumption").unwrap(), 12.5);
        assert_eq!(parse_number("12500", "Consumption").unwrap(), 12500.0);
        assert_eq!(parse_number("12.500", "Consumption").unwrap(), 12.5);
        assert_eq!(parse_number("1,234,567", "Consumption").unwrap(), 1234567.0);
        assert_eq!(parse_number("12,500.5", "Consumption").unwrap(), 12500.5);
        assert!(parse_number("1,2,3", "Consumption").is_err());
        assert!(parse_number("12,50,0", "Consumption").is_err());
    }

    #[test]
    fn test_displayed_amount_is_not_misread() {
        // format_amount shows 12,500 litres as "12,500 L"
        let form = ConsumptionForm {
            consumption_type: ConsumptionType::Water,
            month: "2024-03".to_string(),
            consumption: "12,500".to_string(),
            cost: String::new(),
        };
        let err = form.parse().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Consumption '12,500' is ambiguous: write 12500 or 12.500"
        );
    }

    #[test]
    fn test_recycling_form_defaults_to_today() {
        let form = RecyclingForm {
            material: "vidro".to_string(),
            quantity: "3".to_string(),
            date: String::new(),
        };
        assert_eq!(form.parse(today()).unwrap().date, today());
    }

    #[test]
    fn test_recycling_form_reports_first_violation() {
        let form = RecyclingForm {
            material: String::new(),
            quantity: "-4".to_string(),
            date: "yesterday".to_string(),
        };
        let err = form.parse(today()).unwrap_err();
        assert_eq!(err.to_string(), "Material is required");

        let form = RecyclingForm {
            material: "papel".to_string(),
            quantity: "-4".to_string(),
            date: "yesterday".to_string(),
        };
        let err = form.parse(today()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Quantity must be a positive number of kilograms"
        );
    }

    #[test]
    fn test_recycling_form_rejects_future_date() {
        let form = RecyclingForm {
            material: "papel".to_string(),
            quantity: "1".to_string(),
            date: "2024-07-01".to_string(),
        };
        assert!(form.parse(today()).is_err());
    }

    #[test]
    fn test_consumption_form_malformed_month() {
        let form = ConsumptionForm {
            consumption_type: ConsumptionType::Energy,
            month: "06/2024".to_string(),
            consumption: "120".to_string(),
            cost: String::new(),
        };
        let err = form.parse().unwrap_err();
        assert!(err.to_string().contains("YYYY-MM"));
    }

    #[test]
    fn test_consumption_form_parses_with_default_cost() {
        let form = ConsumptionForm {
            consumption_type: ConsumptionType::Energy,
            month: "2024-06".to_string(),
            consumption: "120".to_string(),
            cost: String::new(),
        };
        let entry = form.parse().unwrap();
        assert_eq!(entry.consumption, 120.0);
        assert_eq!(entry.cost, 0.0);
        assert_eq!(entry.month.to_string(), "2024-06");
    }

    #[test]
    fn test_goal_form_out_of_range() {
        let form = GoalForm {
            consumption_type: ConsumptionType::Water,
            reduction_percentage: "150".to_string(),
        };
        assert_eq!(
            form.parse().unwrap_err().to_string(),
            "Reduction percentage must be between 0 and 100"
        );
    }

    #[test]
    fn test_school_name_length() {
        assert!(validate_school_name("Escola Municipal").is_ok());
        assert!(validate_school_name(&"x".repeat(81)).is_err());
    }
}
