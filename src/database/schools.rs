use crate::entries::School;
use crate::row_factories::SchoolRowFactory;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Result, params};

pub struct SchoolsRepository<'a> {
    conn: &'a Connection,
    get_current_time: Box<dyn Fn() -> DateTime<Utc> + 'a>,
}

impl<'a> SchoolsRepository<'a> {
    pub fn new(
        conn: &'a Connection,
        get_current_time: Box<dyn Fn() -> DateTime<Utc> + 'a>,
    ) -> Self {
        SchoolsRepository {
            conn,
            get_current_time,
        }
    }

    pub fn insert(&self, name: &str) -> Result<i64> {
        let now_utc = (self.get_current_time)().to_rfc3339();
        self.conn.execute(
            "INSERT INTO schools (name, created_at) VALUES (?1, ?2)",
            params![name, now_utc],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get(&self, school_id: i64) -> Result<Option<School>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM schools WHERE id = ?1")?;

        let mut rows = stmt.query([school_id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(SchoolRowFactory::from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn list(&self) -> Result<Vec<School>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM schools ORDER BY id")?;

        let rows = stmt.query_map([], SchoolRowFactory::from_row)?;
        rows.collect()
    }

    pub fn count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM schools", [], |row| row.get(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::init_connection;
    use chrono::TimeZone;

    fn create_test_db() -> Connection {
        init_connection(":memory:").expect("Failed to create test database")
    }

    fn create_repo(conn: &Connection) -> SchoolsRepository {
        let fixed = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        SchoolsRepository::new(conn, Box::new(move || fixed))
    }

    #[test]
    fn test_insert_and_get_school() {
        let conn = create_test_db();
        let repo = create_repo(&conn);
        let id = repo.insert("Escola Estadual Rio Verde").unwrap();
        assert_eq!(id, 1);

        let school = repo.get(id).unwrap().unwrap();
        assert_eq!(school.name, "Escola Estadual Rio Verde");
        assert_eq!(
            school.created_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_get_nonexistent_school() {
        let conn = create_test_db();
        let repo = create_repo(&conn);
        assert!(repo.get(42).unwrap().is_none());
    }

    #[test]
    fn test_list_schools_in_insertion_order() {
        let conn = create_test_db();
        let repo = create_repo(&conn);
        repo.insert("B").unwrap();
        repo.insert("A").unwrap();

        let names: Vec<String> = repo.list().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(repo.count().unwrap(), 2);
    }
}
