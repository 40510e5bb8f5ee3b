use crate::entries::{ConsumptionEntry, ConsumptionType};
use crate::month::Month;
use crate::row_factories::ConsumptionEntryRowFactory;
use chrono::NaiveDate;
use rusqlite::{Connection, Result, params};

const SELECT_COLUMNS: &str = "SELECT id, school_id, consumption_type, month, consumption, cost, entry_date
     FROM consumption_entries";

pub struct ConsumptionEntriesRepository<'a> {
    conn: &'a Connection,
}

impl<'a> ConsumptionEntriesRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        ConsumptionEntriesRepository { conn }
    }

    pub fn insert(
        &self,
        school_id: i64,
        consumption_type: ConsumptionType,
        month: Month,
        consumption: f64,
        cost: f64,
        date: NaiveDate,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO consumption_entries
                (school_id, consumption_type, month, consumption, cost, entry_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                school_id,
                consumption_type.as_str(),
                month,
                consumption,
                cost,
                date
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All entries of a school ordered by month, then insertion
    pub fn list_for_school(&self, school_id: i64) -> Result<Vec<ConsumptionEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE school_id = ?1 ORDER BY month, id",
            SELECT_COLUMNS
        ))?;
        let rows = stmt.query_map([school_id], ConsumptionEntryRowFactory::from_row)?;
        rows.collect()
    }

    pub fn list_for_school_and_type(
        &self,
        school_id: i64,
        consumption_type: ConsumptionType,
    ) -> Result<Vec<ConsumptionEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE school_id = ?1 AND consumption_type = ?2 ORDER BY month, id",
            SELECT_COLUMNS
        ))?;
        let rows = stmt.query_map(
            params![school_id, consumption_type.as_str()],
            ConsumptionEntryRowFactory::from_row,
        )?;
        rows.collect()
    }

    pub fn count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM consumption_entries", [], |row| {
                row.get(0)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::init_connection;
    use crate::database::schools::SchoolsRepository;
    use chrono::Utc;

    fn create_test_db() -> (Connection, i64) {
        let conn = init_connection(":memory:").expect("Failed to create test database");
        let school_id = SchoolsRepository::new(&conn, Box::new(Utc::now))
            .insert("Test School")
            .unwrap();
        (conn, school_id)
    }

    fn month(s: &str) -> Month {
        s.parse().unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_insert_and_list() {
        let (conn, school_id) = create_test_db();
        let repo = ConsumptionEntriesRepository::new(&conn);
        repo.insert(school_id, ConsumptionType::Water, month("2024-02"), 800.0, 40.0, today())
            .unwrap();
        repo.insert(school_id, ConsumptionType::Water, month("2024-01"), 1000.0, 50.0, today())
            .unwrap();

        let entries = repo.list_for_school(school_id).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].month, month("2024-01"));
        assert_eq!(entries[0].consumption, 1000.0);
        assert_eq!(entries[0].consumption_type, ConsumptionType::Water);
        assert_eq!(entries[1].cost, 40.0);
    }

    #[test]
    fn test_list_by_type() {
        let (conn, school_id) = create_test_db();
        let repo = ConsumptionEntriesRepository::new(&conn);
        repo.insert(school_id, ConsumptionType::Water, month("2024-01"), 1000.0, 50.0, today())
            .unwrap();
        repo.insert(school_id, ConsumptionType::Energy, month("2024-01"), 300.0, 90.0, today())
            .unwrap();

        let energy = repo
            .list_for_school_and_type(school_id, ConsumptionType::Energy)
            .unwrap();
        assert_eq!(energy.len(), 1);
        assert_eq!(energy[0].consumption, 300.0);
    }
}
