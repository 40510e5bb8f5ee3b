use crate::entries::{ConsumptionGoal, ConsumptionType};
use crate::row_factories::ConsumptionGoalRowFactory;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Result, params};

pub struct ConsumptionGoalsRepository<'a> {
    conn: &'a Connection,
    get_current_time: Box<dyn Fn() -> DateTime<Utc> + 'a>,
}

impl<'a> ConsumptionGoalsRepository<'a> {
    pub fn new(
        conn: &'a Connection,
        get_current_time: Box<dyn Fn() -> DateTime<Utc> + 'a>,
    ) -> Self {
        ConsumptionGoalsRepository {
            conn,
            get_current_time,
        }
    }

    /// Insert or replace the school's goal for a consumption type
    pub fn upsert(
        &self,
        school_id: i64,
        consumption_type: ConsumptionType,
        reduction_percentage: f64,
    ) -> Result<()> {
        let now_utc = (self.get_current_time)().to_rfc3339();
        self.conn.execute(
            "INSERT INTO consumption_goals (school_id, consumption_type, reduction_percentage, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (school_id, consumption_type) DO UPDATE SET
                reduction_percentage = excluded.reduction_percentage,
                updated_at = excluded.updated_at",
            params![
                school_id,
                consumption_type.as_str(),
                reduction_percentage,
                now_utc
            ],
        )?;
        Ok(())
    }

    pub fn get(
        &self,
        school_id: i64,
        consumption_type: ConsumptionType,
    ) -> Result<Option<ConsumptionGoal>> {
        let mut stmt = self.conn.prepare(
            "SELECT school_id, consumption_type, reduction_percentage
             FROM consumption_goals WHERE school_id = ?1 AND consumption_type = ?2",
        )?;
        let mut rows = stmt.query(params![school_id, consumption_type.as_str()])?;

        if let Some(row) = rows.next()? {
            Ok(Some(ConsumptionGoalRowFactory::from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn list_for_school(&self, school_id: i64) -> Result<Vec<ConsumptionGoal>> {
        let mut stmt = self.conn.prepare(
            "SELECT school_id, consumption_type, reduction_percentage
             FROM consumption_goals WHERE school_id = ?1 ORDER BY consumption_type DESC",
        )?;
        let rows = stmt.query_map([school_id], ConsumptionGoalRowFactory::from_row)?;
        rows.collect()
    }
}
