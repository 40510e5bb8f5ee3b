pub mod connection;
pub mod consumption_entries;
pub mod consumption_goals;
pub mod recycling_entries;
pub mod schools;

use crate::date_provider::{DateProvider, SystemDateProvider};
use crate::entries::{ConsumptionEntry, ConsumptionGoal, ConsumptionType, RecyclingEntry, School};
use crate::month::Month;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, Result};
use std::sync::Arc;

pub use consumption_entries::ConsumptionEntriesRepository;
pub use consumption_goals::ConsumptionGoalsRepository;
pub use recycling_entries::RecyclingEntriesRepository;
pub use schools::SchoolsRepository;

/// Persistence service: one SQLite connection, every table scoped by school
pub struct Database {
    pub conn: Connection,
    date_provider: Arc<dyn DateProvider>,
}

impl Database {
    pub fn new(db_path: &str) -> Result<Self> {
        Self::init(db_path, Arc::new(SystemDateProvider))
    }

    pub fn with_date_provider(db_path: &str, date_provider: Arc<dyn DateProvider>) -> Result<Self> {
        Self::init(db_path, date_provider)
    }

    fn init(db_path: &str, date_provider: Arc<dyn DateProvider>) -> Result<Self> {
        let conn = connection::init_connection(db_path)?;
        Ok(Database {
            conn,
            date_provider,
        })
    }

    pub fn get_current_time(&self) -> DateTime<Utc> {
        self.date_provider.get_current_time()
    }

    pub fn today(&self) -> NaiveDate {
        self.date_provider.today()
    }

    // ===== Schools =====

    pub fn create_school(&self, name: &str) -> Result<i64> {
        let repo = SchoolsRepository::new(&self.conn, Box::new(|| self.get_current_time()));
        repo.insert(name)
    }

    pub fn get_school(&self, school_id: i64) -> Result<Option<School>> {
        let repo = SchoolsRepository::new(&self.conn, Box::new(|| self.get_current_time()));
        repo.get(school_id)
    }

    pub fn list_schools(&self) -> Result<Vec<School>> {
        let repo = SchoolsRepository::new(&self.conn, Box::new(|| self.get_current_time()));
        repo.list()
    }

    pub fn count_schools(&self) -> Result<i64> {
        let repo = SchoolsRepository::new(&self.conn, Box::new(|| self.get_current_time()));
        repo.count()
    }

    // ===== Recycling entries =====

    pub fn insert_recycling_entry(
        &self,
        school_id: i64,
        material: &str,
        quantity: f64,
        co2_saved: f64,
        date: NaiveDate,
    ) -> Result<i64> {
        let repo = RecyclingEntriesRepository::new(&self.conn);
        repo.insert(school_id, material, quantity, co2_saved, date)
    }

    pub fn get_recycling_entry(&self, entry_id: i64) -> Result<Option<RecyclingEntry>> {
        let repo = RecyclingEntriesRepository::new(&self.conn);
        repo.get(entry_id)
    }

    pub fn list_recycling_entries(&self, school_id: i64) -> Result<Vec<RecyclingEntry>> {
        let repo = RecyclingEntriesRepository::new(&self.conn);
        repo.list_for_school(school_id)
    }

    pub fn list_all_recycling_entries(&self) -> Result<Vec<RecyclingEntry>> {
        let repo = RecyclingEntriesRepository::new(&self.conn);
        repo.list_all()
    }

    pub fn delete_recycling_month(&self, school_id: i64, month: Month) -> Result<usize> {
        let repo = RecyclingEntriesRepository::new(&self.conn);
        repo.delete_month(school_id, month)
    }

    pub fn count_recycling_entries(&self) -> Result<i64> {
        let repo = RecyclingEntriesRepository::new(&self.conn);
        repo.count()
    }

    // ===== Consumption entries =====

    pub fn insert_consumption_entry(
        &self,
        school_id: i64,
        consumption_type: ConsumptionType,
        month: Month,
        consumption: f64,
        cost: f64,
    ) -> Result<i64> {
        let repo = ConsumptionEntriesRepository::new(&self.conn);
        repo.insert(
            school_id,
            consumption_type,
            month,
            consumption,
            cost,
            self.today(),
        )
    }

    pub fn list_consumption_entries(&self, school_id: i64) -> Result<Vec<ConsumptionEntry>> {
        let repo = ConsumptionEntriesRepository::new(&self.conn);
        repo.list_for_school(school_id)
    }

    pub fn list_consumption_entries_by_type(
        &self,
        school_id: i64,
        consumption_type: ConsumptionType,
    ) -> Result<Vec<ConsumptionEntry>> {
        let repo = ConsumptionEntriesRepository::new(&self.conn);
        repo.list_for_school_and_type(school_id, consumption_type)
    }

    pub fn count_consumption_entries(&self) -> Result<i64> {
        let repo = ConsumptionEntriesRepository::new(&self.conn);
        repo.count()
    }

    // ===== Goals =====

    pub fn upsert_goal(
        &self,
        school_id: i64,
        consumption_type: ConsumptionType,
        reduction_percentage: f64,
    ) -> Result<()> {
        let repo =
            ConsumptionGoalsRepository::new(&self.conn, Box::new(|| self.get_current_time()));
        repo.upsert(school_id, consumption_type, reduction_percentage)
    }

    pub fn get_goal(
        &self,
        school_id: i64,
        consumption_type: ConsumptionType,
    ) -> Result<Option<ConsumptionGoal>> {
        let repo =
            ConsumptionGoalsRepository::new(&self.conn, Box::new(|| self.get_current_time()));
        repo.get(school_id, consumption_type)
    }

    pub fn list_goals(&self, school_id: i64) -> Result<Vec<ConsumptionGoal>> {
        let repo =
            ConsumptionGoalsRepository::new(&self.conn, Box::new(|| self.get_current_time()));
        repo.list_for_school(school_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database_factory::{DatabaseConfig, DatabaseFactory};

    fn create_test_db() -> Database {
        Database::new(":memory:").expect("Failed to create test database")
    }

    #[test]
    fn test_database_creation() {
        let db = create_test_db();
        assert_eq!(db.count_schools().unwrap(), 0);
        assert_eq!(db.count_recycling_entries().unwrap(), 0);
        assert_eq!(db.count_consumption_entries().unwrap(), 0);
    }

    #[test]
    fn test_school_with_entries() {
        let db = create_test_db();
        let school_id = db.create_school("Escola Sol").unwrap();
        db.insert_recycling_entry(
            school_id,
            "papel",
            10.0,
            11.0,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        )
        .unwrap();
        db.insert_consumption_entry(
            school_id,
            ConsumptionType::Energy,
            "2024-01".parse().unwrap(),
            420.0,
            130.0,
        )
        .unwrap();
        db.upsert_goal(school_id, ConsumptionType::Energy, 10.0)
            .unwrap();

        assert_eq!(db.list_recycling_entries(school_id).unwrap().len(), 1);
        assert_eq!(db.list_consumption_entries(school_id).unwrap().len(), 1);
        assert_eq!(
            db.get_goal(school_id, ConsumptionType::Energy)
                .unwrap()
                .unwrap()
                .reduction_percentage,
            10.0
        );
    }

    #[test]
    fn test_consumption_entry_stamped_with_provider_date() {
        let db_config = DatabaseConfig::builder()
            .test_mode()
            .date_ymd(2025, 11, 12)
            .build();
        let db = DatabaseFactory::create(db_config).unwrap();
        let school_id = db.create_school("Escola Lua").unwrap();
        db.insert_consumption_entry(
            school_id,
            ConsumptionType::Water,
            "2025-10".parse().unwrap(),
            900.0,
            45.0,
        )
        .unwrap();

        let entries = db.list_consumption_entries(school_id).unwrap();
        assert_eq!(
            entries[0].date,
            NaiveDate::from_ymd_opt(2025, 11, 12).unwrap()
        );
        assert_eq!(
            db.get_school(school_id).unwrap().unwrap().created_at.date_naive(),
            NaiveDate::from_ymd_opt(2025, 11, 12).unwrap()
        );
    }
}
