use crate::entries::{ConsumptionEntry, ConsumptionGoal, ConsumptionType, RecyclingEntry, School};
use rusqlite::Row;
use rusqlite::types::Type;

fn consumption_type_column(row: &Row, idx: usize) -> rusqlite::Result<ConsumptionType> {
    let raw: String = row.get(idx)?;
    ConsumptionType::from(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown consumption type '{}'", raw).into(),
        )
    })
}

/// Factory for creating School objects from database rows
pub struct SchoolRowFactory;

impl SchoolRowFactory {
    /// Expected columns: id, name, created_at
    pub fn from_row(row: &Row) -> rusqlite::Result<School> {
        Ok(School {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

pub struct RecyclingEntryRowFactory;

impl RecyclingEntryRowFactory {
    /// Expected columns: id, school_id, material, quantity, co2_saved, entry_date
    pub fn from_row(row: &Row) -> rusqlite::Result<RecyclingEntry> {
        Ok(RecyclingEntry {
            id: row.get(0)?,
            school_id: row.get(1)?,
            material: row.get(2)?,
            quantity: row.get(3)?,
            co2_saved: row.get(4)?,
            date: row.get(5)?,
        })
    }
}

pub struct ConsumptionEntryRowFactory;

impl ConsumptionEntryRowFactory {
    /// Expected columns: id, school_id, consumption_type, month, consumption,
    ///                   cost, entry_date
    pub fn from_row(row: &Row) -> rusqlite::Result<ConsumptionEntry> {
        Ok(ConsumptionEntry {
            id: row.get(0)?,
            school_id: row.get(1)?,
            consumption_type: consumption_type_column(row, 2)?,
            month: row.get(3)?,
            consumption: row.get(4)?,
            cost: row.get(5)?,
            date: row.get(6)?,
        })
    }
}

pub struct ConsumptionGoalRowFactory;

impl ConsumptionGoalRowFactory {
    /// Expected columns: school_id, consumption_type, reduction_percentage
    pub fn from_row(row: &Row) -> rusqlite::Result<ConsumptionGoal> {
        Ok(ConsumptionGoal {
            school_id: row.get(0)?,
            consumption_type: consumption_type_column(row, 1)?,
            reduction_percentage: row.get(2)?,
        })
    }
}
