use crate::analytics::ranking::{RankedSchool, RankingWeights, rank_schools, standings};
use crate::analytics::reporting::{DateRange, SchoolReport, build_report, monthly_consumption};
use crate::database::Database;
use crate::entries::{
    ConsumptionEntry, ConsumptionGoal, ConsumptionType, NewConsumptionEntry, NewRecyclingEntry,
    RecyclingEntry, School,
};
use crate::error::{DashboardError, DashboardResult};
use crate::format::format_kg;
use crate::heuristics::achievements::{Achievement, evaluate, newly_unlocked};
use crate::heuristics::suggestions::{GoalSuggestion, suggest_goal};
use crate::heuristics::tips::{Tip, is_known_tip, visible_tips};
use crate::local_store::{ActionRecord, LocalState, LocalStore};
use crate::materials::{MaterialFactors, material_label, normalize_key};
use crate::month::Month;
use crate::validation::{
    validate_consumption, validate_cost, validate_material_name, validate_percentage,
    validate_school_name,
};
use chrono::NaiveDate;
use log::{info, warn};
use std::sync::Arc;

/// Everything stored for one school, loaded in one go
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolData {
    pub school: School,
    pub recycling: Vec<RecyclingEntry>,
    pub consumption: Vec<ConsumptionEntry>,
    pub goals: Vec<ConsumptionGoal>,
}

/// Service layer for dashboard operations, decoupled from GUI
pub struct DashboardService {
    db: Arc<Database>,
    store: Arc<dyn LocalStore>,
}

impl DashboardService {
    pub fn new(db: Arc<Database>, store: Arc<dyn LocalStore>) -> Self {
        Self { db, store }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn today(&self) -> NaiveDate {
        self.db.today()
    }

    fn require_school(&self, school_id: i64) -> DashboardResult<School> {
        self.db
            .get_school(school_id)?
            .ok_or_else(|| DashboardError::NotFound(format!("School {}", school_id)))
    }

    /// Appends to the action history. A store failure is logged, never fatal,
    /// since the database write it describes already succeeded.
    fn record_action(&self, school_id: Option<i64>, description: String) {
        let result = self.store.load().and_then(|mut state| {
            state.record_action(self.db.get_current_time(), school_id, description);
            self.store.save(&state)
        });
        if let Err(e) = result {
            warn!("Could not record action in local store: {}", e);
        }
    }

    fn local_state(&self) -> DashboardResult<LocalState> {
        self.store.load()
    }

    // ===== Schools =====

    pub fn add_school(&self, name: &str) -> DashboardResult<School> {
        let name = validate_school_name(name)?;
        let school_id = self.db.create_school(&name)?;
        info!("Created school {} ({})", school_id, name);
        self.record_action(Some(school_id), format!("Added school {}", name));
        self.require_school(school_id)
    }

    pub fn list_schools(&self) -> DashboardResult<Vec<School>> {
        Ok(self.db.list_schools()?)
    }

    // ===== Entries =====

    /// Stores a recycling entry with its CO2 computed from the current
    /// factor table, custom factors included.
    pub fn add_recycling_entry(
        &self,
        school_id: i64,
        entry: &NewRecyclingEntry,
    ) -> DashboardResult<RecyclingEntry> {
        self.require_school(school_id)?;
        let material = normalize_key(&validate_material_name(&entry.material)?);
        if entry.date > self.today() {
            return Err(DashboardError::Validation(
                "Date cannot be in the future".to_string(),
            ));
        }

        let co2_saved = self.material_factors()?.co2_saved(&material, entry.quantity)?;
        let entry_id = self.db.insert_recycling_entry(
            school_id,
            &material,
            entry.quantity,
            co2_saved,
            entry.date,
        )?;
        info!(
            "Recorded {} kg of {} for school {} ({} kg CO2)",
            entry.quantity, material, school_id, co2_saved
        );
        self.record_action(
            Some(school_id),
            format!(
                "Recorded {} of {}",
                format_kg(entry.quantity),
                material_label(&material)
            ),
        );

        self.db
            .get_recycling_entry(entry_id)?
            .ok_or_else(|| DashboardError::NotFound(format!("Recycling entry {}", entry_id)))
    }

    pub fn add_consumption_entry(
        &self,
        school_id: i64,
        entry: &NewConsumptionEntry,
    ) -> DashboardResult<i64> {
        self.require_school(school_id)?;
        let consumption = validate_consumption(entry.consumption)?;
        let cost = validate_cost(entry.cost)?;

        let entry_id = self.db.insert_consumption_entry(
            school_id,
            entry.consumption_type,
            entry.month,
            consumption,
            cost,
        )?;
        info!(
            "Recorded {} {} for school {} in {}",
            consumption,
            entry.consumption_type.unit(),
            school_id,
            entry.month
        );
        self.record_action(
            Some(school_id),
            format!(
                "Recorded {} for {}",
                entry.consumption_type.label().to_lowercase(),
                entry.month.label()
            ),
        );
        Ok(entry_id)
    }

    pub fn set_goal(
        &self,
        school_id: i64,
        consumption_type: ConsumptionType,
        reduction_percentage: f64,
    ) -> DashboardResult<ConsumptionGoal> {
        self.require_school(school_id)?;
        let reduction_percentage = validate_percentage(reduction_percentage)?;
        self.db
            .upsert_goal(school_id, consumption_type, reduction_percentage)?;
        info!(
            "Set {} goal for school {} to {}%",
            consumption_type.as_str(),
            school_id,
            reduction_percentage
        );
        self.record_action(
            Some(school_id),
            format!(
                "Set {} goal to {:.0}%",
                consumption_type.label().to_lowercase(),
                reduction_percentage
            ),
        );
        Ok(ConsumptionGoal {
            school_id,
            consumption_type,
            reduction_percentage,
        })
    }

    /// Bulk delete of one month's recycling entries; returns how many went
    pub fn delete_recycling_month(&self, school_id: i64, month: Month) -> DashboardResult<usize> {
        self.require_school(school_id)?;
        let deleted = self.db.delete_recycling_month(school_id, month)?;
        info!(
            "Deleted {} recycling entries for school {} in {}",
            deleted, school_id, month
        );
        if deleted > 0 {
            self.record_action(
                Some(school_id),
                format!("Deleted {} recycling entries from {}", deleted, month.label()),
            );
        }
        Ok(deleted)
    }

    // ===== Reads =====

    pub fn load_school_data(&self, school_id: i64) -> DashboardResult<SchoolData> {
        let school = self.require_school(school_id)?;
        Ok(SchoolData {
            recycling: self.db.list_recycling_entries(school_id)?,
            consumption: self.db.list_consumption_entries(school_id)?,
            goals: self.db.list_goals(school_id)?,
            school,
        })
    }

    pub fn report(&self, school_id: i64, range: DateRange) -> DashboardResult<SchoolReport> {
        let data = self.load_school_data(school_id)?;
        Ok(build_report(
            &data.school,
            &data.recycling,
            &data.consumption,
            &data.goals,
            range,
            self.today(),
        ))
    }

    pub fn ranking(
        &self,
        weights: &RankingWeights,
        range: DateRange,
    ) -> DashboardResult<Vec<RankedSchool>> {
        let schools = self.db.list_schools()?;
        let entries = self.db.list_all_recycling_entries()?;
        Ok(rank_schools(&standings(&schools, &entries, range), weights))
    }

    pub fn suggest_goal(
        &self,
        school_id: i64,
        consumption_type: ConsumptionType,
    ) -> DashboardResult<Option<GoalSuggestion>> {
        self.require_school(school_id)?;
        let entries = self
            .db
            .list_consumption_entries_by_type(school_id, consumption_type)?;
        Ok(suggest_goal(
            consumption_type,
            &monthly_consumption(&entries, consumption_type),
        ))
    }

    // ===== Local state =====

    /// Evaluates milestones over all recorded data and persists the ones not
    /// seen before. Returns only the newly unlocked achievements.
    pub fn refresh_achievements(&self, school_id: i64) -> DashboardResult<Vec<Achievement>> {
        let report = self.report(school_id, DateRange::all())?;
        let current = evaluate(&report);

        let mut state = self.local_state()?;
        let fresh = newly_unlocked(state.unlocked_for(school_id), &current);
        if fresh.is_empty() {
            return Ok(fresh);
        }

        let ids: Vec<&str> = fresh.iter().map(|a| a.id()).collect();
        state.unlock(school_id, &ids);
        for achievement in &fresh {
            state.record_action(
                self.db.get_current_time(),
                Some(school_id),
                format!("Unlocked {}", achievement.info().title),
            );
        }
        self.store.save(&state)?;
        info!(
            "School {} unlocked {} achievement(s): {}",
            school_id,
            fresh.len(),
            ids.join(", ")
        );
        Ok(fresh)
    }

    pub fn unlocked_achievements(&self, school_id: i64) -> DashboardResult<Vec<Achievement>> {
        let state = self.local_state()?;
        Ok(state
            .unlocked_for(school_id)
            .iter()
            .filter_map(|id| Achievement::from_id(id))
            .collect())
    }

    pub fn add_custom_factor(&self, material: &str, factor: f64) -> DashboardResult<()> {
        let mut state = self.local_state()?;
        let mut factors = MaterialFactors::with_custom(&state.custom_factors)?;
        factors.add_custom(material, factor)?;
        state.custom_factors = factors.custom().clone();
        state.record_action(
            self.db.get_current_time(),
            None,
            format!("Set CO2 factor for {} to {}", material.trim(), factor),
        );
        self.store.save(&state)?;
        info!("Custom CO2 factor {} = {}", normalize_key(material), factor);
        Ok(())
    }

    pub fn material_factors(&self) -> DashboardResult<MaterialFactors> {
        MaterialFactors::with_custom(&self.local_state()?.custom_factors)
    }

    pub fn dismiss_tip(&self, tip_id: &str) -> DashboardResult<()> {
        if !is_known_tip(tip_id) {
            return Err(DashboardError::NotFound(format!("Tip '{}'", tip_id)));
        }
        let mut state = self.local_state()?;
        state.dismiss_tip(tip_id);
        self.store.save(&state)
    }

    pub fn visible_tips(&self) -> DashboardResult<Vec<&'static Tip>> {
        Ok(visible_tips(&self.local_state()?.dismissed_tips))
    }

    /// Most recent first
    pub fn recent_actions(&self, limit: usize) -> DashboardResult<Vec<ActionRecord>> {
        let state = self.local_state()?;
        Ok(state.action_history.iter().rev().take(limit).cloned().collect())
    }
}
