use crate::entries::RecyclingEntry;
use crate::month::Month;
use crate::row_factories::RecyclingEntryRowFactory;
use chrono::NaiveDate;
use log::debug;
use rusqlite::{Connection, Result, params};

const SELECT_COLUMNS: &str =
    "SELECT id, school_id, material, quantity, co2_saved, entry_date FROM recycling_entries";

pub struct RecyclingEntriesRepository<'a> {
    conn: &'a Connection,
}

impl<'a> RecyclingEntriesRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        RecyclingEntriesRepository { conn }
    }

    pub fn insert(
        &self,
        school_id: i64,
        material: &str,
        quantity: f64,
        co2_saved: f64,
        date: NaiveDate,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO recycling_entries (school_id, material, quantity, co2_saved, entry_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![school_id, material, quantity, co2_saved, date],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get(&self, entry_id: i64) -> Result<Option<RecyclingEntry>> {
        let mut stmt = self.conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;
        let mut rows = stmt.query([entry_id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(RecyclingEntryRowFactory::from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// All entries of a school, oldest first
    pub fn list_for_school(&self, school_id: i64) -> Result<Vec<RecyclingEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE school_id = ?1 ORDER BY entry_date, id",
            SELECT_COLUMNS
        ))?;
        let rows = stmt.query_map([school_id], RecyclingEntryRowFactory::from_row)?;
        rows.collect()
    }

    pub fn list_all(&self) -> Result<Vec<RecyclingEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY entry_date, id", SELECT_COLUMNS))?;
        let rows = stmt.query_map([], RecyclingEntryRowFactory::from_row)?;
        rows.collect()
    }

    /// Bulk delete of one school's entries for a month; returns rows removed
    pub fn delete_month(&self, school_id: i64, month: Month) -> Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM recycling_entries
             WHERE school_id = ?1 AND substr(entry_date, 1, 7) = ?2",
            params![school_id, month],
        )?;
        debug!(
            "Deleted {} recycling entries for school {} in {}",
            deleted, school_id, month
        );
        Ok(deleted)
    }

    pub fn count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM recycling_entries", [], |row| row.get(0))
    }
}
