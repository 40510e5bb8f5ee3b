use crate::analytics::ranking::{RankedSchool, RankingWeights};
use crate::analytics::reporting::{DateRange, SchoolReport};
use crate::dashboard_service::DashboardService;
use crate::entries::{ConsumptionType, School};
use crate::error::{DashboardError, DashboardResult};
use crate::export::{ChartOptions, render_monthly_recycling, report_to_csv, report_to_pdf};
use crate::format::{format_amount, format_change, format_cost, format_kg, format_relative_date};
use crate::materials::{material_icon, material_label};
use crate::month::Month;
use crate::validation::{ConsumptionForm, GoalForm, RecyclingForm};
use eframe::egui;
use log::{error, warn};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Recycling,
    Consumption,
    Goals,
    Ranking,
    Export,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Overview,
        Tab::Recycling,
        Tab::Consumption,
        Tab::Goals,
        Tab::Ranking,
        Tab::Export,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Recycling => "Recycling",
            Tab::Consumption => "Consumption",
            Tab::Goals => "Goals",
            Tab::Ranking => "Ranking",
            Tab::Export => "Export",
        }
    }
}

/// Toast-style message shown under the tab bar
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

pub struct DashboardApp {
    service: DashboardService,
    schools: Vec<School>,
    selected_school: Option<i64>,
    tab: Tab,
    report: Option<SchoolReport>,
    range_from: String,
    range_to: String,
    new_school_name: String,
    recycling_form: RecyclingForm,
    consumption_form: ConsumptionForm,
    goal_form: GoalForm,
    delete_month: String,
    factor_material: String,
    factor_value: String,
    ranking: Vec<RankedSchool>,
    ranking_weights: RankingWeights,
    export_path: String,
    status: Option<StatusMessage>,
}

impl DashboardApp {
    pub fn new(service: DashboardService) -> Self {
        let mut app = Self {
            service,
            schools: Vec::new(),
            selected_school: None,
            tab: Tab::Overview,
            report: None,
            range_from: String::new(),
            range_to: String::new(),
            new_school_name: String::new(),
            recycling_form: RecyclingForm::default(),
            consumption_form: ConsumptionForm::default(),
            goal_form: GoalForm::default(),
            delete_month: String::new(),
            factor_material: String::new(),
            factor_value: String::new(),
            ranking: Vec::new(),
            ranking_weights: RankingWeights::default(),
            export_path: "report".to_string(),
            status: None,
        };
        app.refresh_schools();
        if let Some(first) = app.schools.first().map(|s| s.id) {
            app.select_school(first);
        }
        app
    }

    fn show_error(&mut self, err: DashboardError) {
        error!("{}", err);
        self.status = Some(StatusMessage {
            text: err.user_message(),
            is_error: true,
        });
    }

    fn show_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    fn refresh_schools(&mut self) {
        match self.service.list_schools() {
            Ok(schools) => self.schools = schools,
            Err(e) => self.show_error(e),
        }
    }

    /// Empty bounds mean an open range
    pub fn current_range(&self) -> DashboardResult<DateRange> {
        let parse = |text: &str| -> DashboardResult<Option<Month>> {
            let text = text.trim();
            if text.is_empty() {
                Ok(None)
            } else {
                text.parse().map(Some)
            }
        };
        DateRange::new(parse(&self.range_from)?, parse(&self.range_to)?)
    }

    /// Recomputes the report; on failure the previous report stays on screen
    pub fn reload(&mut self) {
        let Some(school_id) = self.selected_school else {
            self.report = None;
            return;
        };
        let result = self
            .current_range()
            .and_then(|range| self.service.report(school_id, range));
        match result {
            Ok(report) => self.report = Some(report),
            Err(e) => self.show_error(e),
        }
    }

    pub fn select_school(&mut self, school_id: i64) {
        self.selected_school = Some(school_id);
        self.report = None;
        self.reload();
    }

    fn announce_achievements(&mut self, school_id: i64) {
        match self.service.refresh_achievements(school_id) {
            Ok(fresh) if !fresh.is_empty() => {
                let titles: Vec<&str> = fresh.iter().map(|a| a.info().title).collect();
                self.show_info(format!("Achievement unlocked: {}", titles.join(", ")));
            }
            Ok(_) => {}
            Err(e) => warn!("Could not refresh achievements: {}", e),
        }
    }

    fn after_write(&mut self, school_id: i64, message: String) {
        self.show_info(message);
        self.reload();
        self.announce_achievements(school_id);
    }

    fn require_selected(&mut self) -> Option<i64> {
        if self.selected_school.is_none() {
            self.show_info("Add or select a school first");
        }
        self.selected_school
    }

    pub fn add_school(&mut self) {
        match self.service.add_school(&self.new_school_name) {
            Ok(school) => {
                self.new_school_name.clear();
                self.refresh_schools();
                self.show_info(format!("Added {}", school.name));
                self.select_school(school.id);
            }
            Err(e) => self.show_error(e),
        }
    }

    pub fn submit_recycling(&mut self) {
        let Some(school_id) = self.require_selected() else {
            return;
        };
        let result = self
            .recycling_form
            .parse(self.service.today())
            .and_then(|entry| self.service.add_recycling_entry(school_id, &entry));
        match result {
            Ok(entry) => {
                self.recycling_form = RecyclingForm::default();
                self.after_write(
                    school_id,
                    format!(
                        "Saved {} of {} ({} CO2 avoided)",
                        format_kg(entry.quantity),
                        material_label(&entry.material),
                        format_kg(entry.co2_saved)
                    ),
                );
            }
            Err(e) => self.show_error(e),
        }
    }

    pub fn submit_consumption(&mut self) {
        let Some(school_id) = self.require_selected() else {
            return;
        };
        let result = self
            .consumption_form
            .parse()
            .and_then(|entry| self.service.add_consumption_entry(school_id, &entry));
        match result {
            Ok(_) => {
                let consumption_type = self.consumption_form.consumption_type;
                self.consumption_form = ConsumptionForm {
                    consumption_type,
                    ..ConsumptionForm::default()
                };
                self.after_write(
                    school_id,
                    format!("Saved {} reading", consumption_type.label().to_lowercase()),
                );
            }
            Err(e) => self.show_error(e),
        }
    }

    pub fn submit_goal(&mut self) {
        let Some(school_id) = self.require_selected() else {
            return;
        };
        let result = self
            .goal_form
            .parse()
            .and_then(|(kind, percentage)| self.service.set_goal(school_id, kind, percentage));
        match result {
            Ok(goal) => self.after_write(
                school_id,
                format!(
                    "{} goal set to {:.0}%",
                    goal.consumption_type.label(),
                    goal.reduction_percentage
                ),
            ),
            Err(e) => self.show_error(e),
        }
    }

    /// Copies the heuristic suggestion into the goal form
    pub fn apply_suggestion(&mut self, consumption_type: ConsumptionType) {
        let Some(school_id) = self.require_selected() else {
            return;
        };
        match self.service.suggest_goal(school_id, consumption_type) {
            Ok(Some(suggestion)) => {
                self.goal_form = GoalForm {
                    consumption_type,
                    reduction_percentage: format!("{:.0}", suggestion.suggested_percent),
                };
                self.show_info(suggestion.reason());
            }
            Ok(None) => self.show_info("At least three months of readings are needed"),
            Err(e) => self.show_error(e),
        }
    }

    pub fn delete_selected_month(&mut self) {
        let Some(school_id) = self.require_selected() else {
            return;
        };
        let result = self
            .delete_month
            .trim()
            .parse::<Month>()
            .and_then(|month| self.service.delete_recycling_month(school_id, month));
        match result {
            Ok(deleted) => {
                self.delete_month.clear();
                self.show_info(format!("Deleted {} entries", deleted));
                self.reload();
            }
            Err(e) => self.show_error(e),
        }
    }

    pub fn add_custom_factor(&mut self) {
        let factor = self.factor_value.trim().replace(',', ".").parse::<f64>();
        let result = match factor {
            Ok(factor) => self.service.add_custom_factor(&self.factor_material, factor),
            Err(_) => Err(DashboardError::Validation(
                "CO2 factor must be a number".to_string(),
            )),
        };
        match result {
            Ok(()) => {
                self.show_info(format!("Saved factor for {}", self.factor_material.trim()));
                self.factor_material.clear();
                self.factor_value.clear();
            }
            Err(e) => self.show_error(e),
        }
    }

    pub fn refresh_ranking(&mut self) {
        let result = self
            .current_range()
            .and_then(|range| self.service.ranking(&self.ranking_weights, range));
        match result {
            Ok(ranking) => self.ranking = ranking,
            Err(e) => self.show_error(e),
        }
    }

    pub fn dismiss_tip(&mut self, tip_id: &str) {
        if let Err(e) = self.service.dismiss_tip(tip_id) {
            self.show_error(e);
        }
    }

    pub fn export_csv(&mut self, path: &Path) {
        let Some(report) = &self.report else {
            self.show_info("Nothing to export yet");
            return;
        };
        let written = report_to_csv(report)
            .and_then(|csv| fs::write(path, csv).map_err(DashboardError::from));
        match written {
            Ok(()) => self.show_info(format!("Exported {}", path.display())),
            Err(e) => self.show_error(e),
        }
    }

    /// The chart is optional; a failure to draw it only drops it from the PDF
    pub fn export_pdf(&mut self, path: &Path) {
        let Some(report) = &self.report else {
            self.show_info("Nothing to export yet");
            return;
        };
        let chart = if report.monthly_recycling.is_empty() {
            None
        } else {
            render_monthly_recycling(&report.monthly_recycling, &ChartOptions::default())
                .map_err(|e| warn!("Exporting PDF without chart: {}", e))
                .ok()
        };
        let result = report_to_pdf(report, chart.as_ref())
            .and_then(|bytes| fs::write(path, bytes).map_err(DashboardError::from));
        match result {
            Ok(()) => self.show_info(format!("Exported {}", path.display())),
            Err(e) => self.show_error(e),
        }
    }

    // Helper methods for testing
    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    pub fn selected_school(&self) -> Option<i64> {
        self.selected_school
    }

    pub fn report(&self) -> Option<&SchoolReport> {
        self.report.as_ref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn ranking(&self) -> &[RankedSchool] {
        &self.ranking
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn set_new_school_name(&mut self, name: &str) {
        self.new_school_name = name.to_string();
    }

    pub fn set_range(&mut self, from: &str, to: &str) {
        self.range_from = from.to_string();
        self.range_to = to.to_string();
    }

    pub fn set_delete_month(&mut self, month: &str) {
        self.delete_month = month.to_string();
    }

    pub fn set_custom_factor(&mut self, material: &str, factor: &str) {
        self.factor_material = material.to_string();
        self.factor_value = factor.to_string();
    }

    pub fn recycling_form_mut(&mut self) -> &mut RecyclingForm {
        &mut self.recycling_form
    }

    pub fn consumption_form_mut(&mut self) -> &mut ConsumptionForm {
        &mut self.consumption_form
    }

    pub fn goal_form(&self) -> &GoalForm {
        &self.goal_form
    }

    pub fn goal_form_mut(&mut self) -> &mut GoalForm {
        &mut self.goal_form
    }

    pub fn service(&self) -> &DashboardService {
        &self.service
    }

    // ===== Rendering =====

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("School Sustainability Dashboard");
            ui.separator();

            let mut selected = self.selected_school;
            let selected_name = self
                .schools
                .iter()
                .find(|s| Some(s.id) == selected)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| "No school".to_string());
            egui::ComboBox::from_label("School")
                .selected_text(selected_name)
                .show_ui(ui, |ui| {
                    for school in &self.schools {
                        ui.selectable_value(&mut selected, Some(school.id), &school.name);
                    }
                });
            if selected != self.selected_school {
                if let Some(school_id) = selected {
                    self.select_school(school_id);
                }
            }

            ui.text_edit_singleline(&mut self.new_school_name);
            if ui.button("Add school").clicked() {
                self.add_school();
            }
        });

        ui.horizontal(|ui| {
            ui.label("From (YYYY-MM):");
            ui.add(egui::TextEdit::singleline(&mut self.range_from).desired_width(70.0));
            ui.label("To:");
            ui.add(egui::TextEdit::singleline(&mut self.range_to).desired_width(70.0));
            if ui.button("Apply").clicked() {
                self.reload();
            }
        });

        ui.horizontal(|ui| {
            for tab in Tab::ALL {
                ui.selectable_value(&mut self.tab, tab, tab.title());
            }
        });

        if let Some(status) = &self.status {
            let color = if status.is_error {
                egui::Color32::RED
            } else {
                egui::Color32::DARK_GREEN
            };
            ui.label(egui::RichText::new(&status.text).color(color));
        }
    }

    fn show_overview(&mut self, ui: &mut egui::Ui) {
        let Some(report) = &self.report else {
            ui.label("Add a school to get started.");
            return;
        };

        ui.heading(&report.school.name);
        ui.label(report.range.describe());
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            ui.group(|ui| {
                ui.label("Recycled");
                ui.heading(format_kg(report.recycling.total_kg));
            });
            ui.group(|ui| {
                ui.label("CO2 avoided");
                ui.heading(format_kg(report.recycling.total_co2_kg));
            });
            for summary in [&report.water, &report.energy] {
                let kind = summary.consumption_type;
                ui.group(|ui| {
                    ui.label(format!("{} {}", kind.icon(), kind.label()));
                    ui.heading(format_amount(summary.total_consumption, kind.unit()));
                    ui.label(format!(
                        "{} · {}",
                        format_cost(summary.total_cost),
                        format_change(summary.latest_change_percent)
                    ));
                });
            }
        });

        ui.add_space(10.0);
        ui.label(egui::RichText::new("Monthly recycling").strong());
        let max_kg = report
            .monthly_recycling
            .iter()
            .map(|m| m.kg)
            .fold(0.0, f64::max);
        for month in &report.monthly_recycling {
            let fraction = if max_kg > 0.0 { month.kg / max_kg } else { 0.0 };
            ui.horizontal(|ui| {
                ui.label(month.month.label());
                ui.add(egui::ProgressBar::new(fraction as f32).text(format_kg(month.kg)));
            });
        }

        ui.add_space(10.0);
        let school_id = report.school.id;
        let today = self.service.today();
        if let Ok(unlocked) = self.service.unlocked_achievements(school_id) {
            if !unlocked.is_empty() {
                ui.label(egui::RichText::new("Achievements").strong());
                ui.horizontal_wrapped(|ui| {
                    for achievement in unlocked {
                        let info = achievement.info();
                        ui.label(format!("{} {}", info.icon, info.title))
                            .on_hover_text(info.description);
                    }
                });
            }
        }

        let mut dismissed = None;
        if let Ok(tips) = self.service.visible_tips() {
            if !tips.is_empty() {
                ui.add_space(10.0);
                ui.label(egui::RichText::new("Tips").strong());
            }
            for tip in tips.into_iter().take(2) {
                ui.horizontal(|ui| {
                    ui.label(tip.text);
                    if ui.small_button("Dismiss").clicked() {
                        dismissed = Some(tip.id);
                    }
                });
            }
        }
        if let Some(tip_id) = dismissed {
            self.dismiss_tip(tip_id);
        }

        if let Ok(actions) = self.service.recent_actions(5) {
            if !actions.is_empty() {
                ui.add_space(10.0);
                ui.label(egui::RichText::new("Recent activity").strong());
                for action in actions {
                    ui.label(format!(
                        "{} ({})",
                        action.description,
                        format_relative_date(action.at.date_naive(), today)
                    ));
                }
            }
        }
    }

    fn show_recycling(&mut self, ui: &mut egui::Ui) {
        let materials = self
            .service
            .material_factors()
            .map(|factors| factors.all())
            .unwrap_or_default();

        egui::Grid::new("recycling_form").num_columns(2).show(ui, |ui| {
            ui.label("Material");
            let selected_text = if self.recycling_form.material.is_empty() {
                "Choose...".to_string()
            } else {
                material_label(&self.recycling_form.material)
            };
            egui::ComboBox::from_id_salt("material")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for (key, factor) in &materials {
                        ui.selectable_value(
                            &mut self.recycling_form.material,
                            key.clone(),
                            format!("{} {} ({} kg CO2/kg)", material_icon(key), material_label(key), factor),
                        );
                    }
                });
            ui.end_row();

            ui.label("Quantity (kg)");
            ui.text_edit_singleline(&mut self.recycling_form.quantity);
            ui.end_row();

            ui.label("Date (YYYY-MM-DD, empty for today)");
            ui.text_edit_singleline(&mut self.recycling_form.date);
            ui.end_row();
        });
        if ui.button("Save entry").clicked() {
            self.submit_recycling();
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            ui.label("Custom material");
            ui.add(egui::TextEdit::singleline(&mut self.factor_material).desired_width(100.0));
            ui.label("kg CO2/kg");
            ui.add(egui::TextEdit::singleline(&mut self.factor_value).desired_width(50.0));
            if ui.button("Save factor").clicked() {
                self.add_custom_factor();
            }
        });

        ui.horizontal(|ui| {
            ui.label("Delete month (YYYY-MM)");
            ui.add(egui::TextEdit::singleline(&mut self.delete_month).desired_width(70.0));
            if ui.button("Delete").clicked() {
                self.delete_selected_month();
            }
        });

        let Some(report) = &self.report else {
            return;
        };
        ui.add_space(10.0);
        ui.label(egui::RichText::new("By material").strong());
        egui::Grid::new("materials").striped(true).show(ui, |ui| {
            for material in &report.materials {
                ui.label(format!(
                    "{} {}",
                    material_icon(&material.material),
                    material_label(&material.material)
                ));
                ui.label(format_kg(material.kg));
                ui.label(format_kg(material.co2_kg));
                ui.label(format!("{:.1}%", material.share_percent));
                ui.end_row();
            }
        });

        ui.add_space(10.0);
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("recycling_entries").striped(true).show(ui, |ui| {
                for entry in report.recycling_entries.iter().rev() {
                    ui.label(entry.date.to_string());
                    ui.label(material_label(&entry.material));
                    ui.label(format_kg(entry.quantity));
                    ui.label(format_kg(entry.co2_saved));
                    ui.end_row();
                }
            });
        });
    }

    fn show_consumption(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("consumption_form").num_columns(2).show(ui, |ui| {
            ui.label("Type");
            ui.horizontal(|ui| {
                for kind in ConsumptionType::ALL {
                    ui.selectable_value(
                        &mut self.consumption_form.consumption_type,
                        kind,
                        format!("{} {}", kind.icon(), kind.label()),
                    );
                }
            });
            ui.end_row();

            ui.label("Month (YYYY-MM)");
            ui.text_edit_singleline(&mut self.consumption_form.month);
            ui.end_row();

            ui.label(format!(
                "Consumption ({})",
                self.consumption_form.consumption_type.unit()
            ));
            ui.text_edit_singleline(&mut self.consumption_form.consumption);
            ui.end_row();

            ui.label("Cost");
            ui.text_edit_singleline(&mut self.consumption_form.cost);
            ui.end_row();
        });
        if ui.button("Save reading").clicked() {
            self.submit_consumption();
        }

        let Some(report) = &self.report else {
            return;
        };
        for kind in ConsumptionType::ALL {
            ui.add_space(10.0);
            ui.label(egui::RichText::new(format!("{} {}", kind.icon(), kind.label())).strong());
            egui::Grid::new(kind.as_str()).striped(true).show(ui, |ui| {
                for month in report.monthly(kind) {
                    ui.label(month.month.label());
                    ui.label(format_amount(month.consumption, kind.unit()));
                    ui.label(format_cost(month.cost));
                    ui.end_row();
                }
            });
        }
    }

    fn show_goals(&mut self, ui: &mut egui::Ui) {
        let mut suggest = None;
        if let Some(report) = &self.report {
            for kind in ConsumptionType::ALL {
                ui.group(|ui| {
                    ui.label(egui::RichText::new(format!("{} {}", kind.icon(), kind.label())).strong());
                    match (report.goal_for(kind), report.progress_for(kind)) {
                        (Some(goal), Some(progress)) => {
                            ui.label(format!(
                                "Goal {:.0}% · {} → {}: {:.1}% reduction",
                                goal.reduction_percentage,
                                progress.previous_month.label(),
                                progress.latest_month.label(),
                                progress.reduction_percent
                            ));
                            let fraction = if goal.reduction_percentage > 0.0 {
                                (progress.reduction_percent / goal.reduction_percentage).clamp(0.0, 1.0)
                            } else {
                                1.0
                            };
                            ui.add(
                                egui::ProgressBar::new(fraction as f32)
                                    .text(progress.status.label()),
                            );
                        }
                        (Some(goal), None) => {
                            ui.label(format!(
                                "Goal {:.0}% · needs two months of readings",
                                goal.reduction_percentage
                            ));
                        }
                        (None, _) => {
                            ui.label("No goal set");
                        }
                    }
                    if ui.small_button("Suggest a goal").clicked() {
                        suggest = Some(kind);
                    }
                });
            }
        }
        if let Some(kind) = suggest {
            self.apply_suggestion(kind);
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            for kind in ConsumptionType::ALL {
                ui.selectable_value(&mut self.goal_form.consumption_type, kind, kind.label());
            }
            ui.label("Reduction %");
            ui.add(
                egui::TextEdit::singleline(&mut self.goal_form.reduction_percentage)
                    .desired_width(50.0),
            );
            if ui.button("Save goal").clicked() {
                self.submit_goal();
            }
        });
    }

    fn show_ranking(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Recycled weight");
            ui.add(egui::DragValue::new(&mut self.ranking_weights.recycled_weight).speed(0.1));
            ui.label("CO2 weight");
            ui.add(egui::DragValue::new(&mut self.ranking_weights.co2_weight).speed(0.1));
            if ui.button("Refresh").clicked() {
                self.refresh_ranking();
            }
        });

        egui::Grid::new("ranking").striped(true).show(ui, |ui| {
            ui.label("#");
            ui.label("School");
            ui.label("Recycled");
            ui.label("CO2 avoided");
            ui.label("Score");
            ui.end_row();
            for entry in &self.ranking {
                ui.label(entry.rank.to_string());
                ui.label(&entry.school_name);
                ui.label(format_kg(entry.recycled_kg));
                ui.label(format_kg(entry.co2_kg));
                ui.label(format!("{:.1}", entry.score));
                ui.end_row();
            }
        });
    }

    fn show_export(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("File name (without extension)");
            ui.text_edit_singleline(&mut self.export_path);
        });
        let base = self.export_path.trim().to_string();
        ui.horizontal(|ui| {
            if ui.button("Export CSV").clicked() {
                self.export_csv(Path::new(&format!("{}.csv", base)));
            }
            if ui.button("Export PDF").clicked() {
                self.export_pdf(Path::new(&format!("{}.pdf", base)));
            }
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.show_header(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.tab {
                Tab::Overview => self.show_overview(ui),
                Tab::Recycling => self.show_recycling(ui),
                Tab::Consumption => self.show_consumption(ui),
                Tab::Goals => self.show_goals(ui),
                Tab::Ranking => self.show_ranking(ui),
                Tab::Export => self.show_export(ui),
            });
        });
    }
}

pub fn run_app(service: DashboardService) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "School Sustainability Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(service)))),
    )
}
