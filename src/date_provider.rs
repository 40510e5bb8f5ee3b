use chrono::{DateTime, NaiveDate, Timelike, Utc};

/// Source of "now" for everything that stamps or defaults dates
pub trait DateProvider: Send + Sync {
    fn get_current_time(&self) -> DateTime<Utc>;

    /// Calendar date used to default entry dates and to reject future ones
    fn today(&self) -> NaiveDate {
        self.get_current_time().date_naive()
    }
}

pub struct SystemDateProvider;

impl DateProvider for SystemDateProvider {
    fn get_current_time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Pretends today is `override_date`, keeping the wall-clock time of day
pub struct OverrideDateProvider {
    override_date: NaiveDate,
}

impl OverrideDateProvider {
    pub fn new(override_date: NaiveDate) -> Self {
        Self { override_date }
    }
}

impl DateProvider for OverrideDateProvider {
    fn get_current_time(&self) -> DateTime<Utc> {
        let now = Utc::now();
        let naive_datetime = self
            .override_date
            .and_hms_opt(now.hour(), now.minute(), now.second())
            .unwrap_or_else(|| self.override_date.and_time(chrono::NaiveTime::MIN));
        DateTime::from_naive_utc_and_offset(naive_datetime, Utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_date_provider_returns_current_time() {
        let provider = SystemDateProvider;
        let time1 = provider.get_current_time();
        let time2 = provider.get_current_time();
        assert!((time2 - time1).num_seconds() <= 1);
    }

    #[test]
    fn test_override_date_provider_uses_override_date() {
        let override_date = NaiveDate::from_ymd_opt(2025, 11, 18).unwrap();
        let provider = OverrideDateProvider::new(override_date);
        assert_eq!(provider.today(), override_date);
        assert_eq!(
            provider.get_current_time().format("%Y-%m-%d").to_string(),
            "2025-11-18"
        );
    }
}
