use chrono::NaiveDate;

/// Inserts thousands separators into the integer part: 1234567 -> "1,234,567"
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Weights below a tonne in kg with one decimal, above in tonnes
///
/// Examples:
/// - 15.0 -> "15.0 kg"
/// - 1250.0 -> "1.25 t"
pub fn format_kg(kg: f64) -> String {
    if kg.abs() >= 1000.0 {
        format!("{:.2} t", kg / 1000.0)
    } else {
        format!("{:.1} kg", kg)
    }
}

/// Whole units with separators, e.g. "12,500 L"
pub fn format_amount(value: f64, unit: &str) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{} {}", sign, group_thousands(rounded.abs() as u64), unit)
}

pub fn format_cost(cost: f64) -> String {
    format!("$ {:.2}", cost)
}

/// Signed percentage change, "n/a" when there is none
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(value) if value > 0.0 => format!("+{:.1}%", value),
        Some(value) => format!("{:.1}%", value),
        None => "n/a".to_string(),
    }
}

/// Human description of a past date relative to `today`
///
/// Examples:
/// - same day: "today"
/// - one day before: "yesterday"
/// - 5 days before: "5 days ago"
/// - 30 days or more, or a future date: "on 2024-01-02"
pub fn format_relative_date(date: NaiveDate, today: NaiveDate) -> String {
    let days = (today - date).num_days();
    match days {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        2..=29 => format!("{} days ago", days),
        _ => format!("on {}", date.format("%Y-%m-%d")),
    }
}
