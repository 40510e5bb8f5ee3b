use chrono::NaiveDate;
use eco_dashboard::analytics::goal_progress::GoalStatus;
use eco_dashboard::analytics::ranking::RankingWeights;
use eco_dashboard::analytics::reporting::DateRange;
use eco_dashboard::dashboard_service::DashboardService;
use eco_dashboard::database::{Database, RecyclingEntriesRepository};
use eco_dashboard::database_factory::{DatabaseConfig, DatabaseFactory};
use eco_dashboard::entries::{ConsumptionType, NewConsumptionEntry, NewRecyclingEntry};
use eco_dashboard::error::DashboardError;
use eco_dashboard::export::report_to_csv;
use eco_dashboard::heuristics::achievements::Achievement;
use eco_dashboard::local_store::{JsonFileStore, LocalStore, MemoryStore};
use eco_dashboard::validation::{ConsumptionForm, RecyclingForm};
use std::sync::Arc;

fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

fn create_db() -> Database {
    let config = DatabaseConfig::builder()
        .test_mode()
        .date_ymd(2024, 6, 15)
        .build();
    DatabaseFactory::create(config).unwrap()
}

fn create_service_with_store(store: Arc<dyn LocalStore>) -> DashboardService {
    DashboardService::new(Arc::new(create_db()), store)
}

fn create_service() -> DashboardService {
    create_service_with_store(Arc::new(MemoryStore::new()))
}

fn recycling(material: &str, quantity: f64, on: &str) -> NewRecyclingEntry {
    NewRecyclingEntry {
        material: material.to_string(),
        quantity,
        date: date(on),
    }
}

fn reading(consumption_type: ConsumptionType, month: &str, value: f64) -> NewConsumptionEntry {
    NewConsumptionEntry {
        consumption_type,
        month: month.parse().unwrap(),
        consumption: value,
        cost: 0.0,
    }
}

#[test]
fn test_store_and_retrieve_recycling_entry() {
    let db = create_db();
    let school_id = db.create_school("Escola").unwrap();

    let repo = RecyclingEntriesRepository::new(&db.conn);
    let entry_id = repo
        .insert(school_id, "vidro", 12.5, 3.75, date("2024-02-10"))
        .unwrap();
    let stored = repo.get(entry_id).unwrap().unwrap();

    assert_eq!(stored.school_id, school_id);
    assert_eq!(stored.material, "vidro");
    assert_eq!(stored.quantity, 12.5);
    assert_eq!(stored.co2_saved, 3.75);
    assert_eq!(stored.date, date("2024-02-10"));
}

#[test]
fn test_deleting_school_cascades_to_entries() {
    let db = create_db();
    let school_id = db.create_school("Escola").unwrap();
    db.insert_recycling_entry(school_id, "papel", 1.0, 1.1, date("2024-01-01"))
        .unwrap();

    db.conn
        .execute("DELETE FROM schools WHERE id = ?1", [school_id])
        .unwrap();
    assert_eq!(db.count_recycling_entries().unwrap(), 0);
}

#[test]
fn test_same_material_totals_and_co2() {
    let service = create_service();
    let school = service.add_school("Escola Sol").unwrap();
    service
        .add_recycling_entry(school.id, &recycling("papel", 10.0, "2024-03-01"))
        .unwrap();
    service
        .add_recycling_entry(school.id, &recycling("papel", 5.0, "2024-03-20"))
        .unwrap();

    let report = service.report(school.id, DateRange::all()).unwrap();
    assert_eq!(report.materials.len(), 1);
    assert_eq!(report.materials[0].material, "papel");
    assert!((report.materials[0].kg - 15.0).abs() < 1e-9);
    assert!((report.recycling.total_co2_kg - 16.5).abs() < 1e-9);
}

#[test]
fn test_monthly_sums_match_total() {
    let service = create_service();
    let school = service.add_school("Escola").unwrap();
    for (material, quantity, on) in [
        ("papel", 3.0, "2024-01-05"),
        ("plastico", 4.5, "2024-01-28"),
        ("vidro", 7.25, "2024-02-02"),
        ("metal", 1.0, "2024-04-30"),
    ] {
        service
            .add_recycling_entry(school.id, &recycling(material, quantity, on))
            .unwrap();
    }

    let report = service.report(school.id, DateRange::all()).unwrap();
    let monthly_total: f64 = report.monthly_recycling.iter().map(|m| m.kg).sum();
    assert_eq!(report.monthly_recycling.len(), 3);
    assert!((monthly_total - report.recycling.total_kg).abs() < 1e-9);
}

#[test]
fn test_water_goal_on_track_scenario() {
    let service = create_service();
    let school = service.add_school("Escola").unwrap();
    service
        .add_consumption_entry(school.id, &reading(ConsumptionType::Water, "2024-01", 1000.0))
        .unwrap();
    service
        .add_consumption_entry(school.id, &reading(ConsumptionType::Water, "2024-02", 800.0))
        .unwrap();
    service
        .set_goal(school.id, ConsumptionType::Water, 15.0)
        .unwrap();

    let report = service.report(school.id, DateRange::all()).unwrap();
    let progress = report.progress_for(ConsumptionType::Water).unwrap();
    assert!((progress.reduction_percent - 20.0).abs() < 1e-9);
    assert_eq!(progress.status, GoalStatus::OnTrack);

    let unlocked = service.refresh_achievements(school.id).unwrap();
    assert!(unlocked.contains(&Achievement::GoalSetter));
    assert!(unlocked.contains(&Achievement::WaterSaver));
}

#[test]
fn test_schema_rejects_non_positive_readings() {
    let db = create_db();
    let school_id = db.create_school("Escola").unwrap();
    let result = db.conn.execute(
        "INSERT INTO consumption_entries (school_id, consumption_type, month, consumption, cost, entry_date)
         VALUES (?1, 'energy', '2024-01', 0, 0, '2024-01-31')",
        [school_id],
    );
    assert!(result.is_err());
    assert_eq!(db.count_consumption_entries().unwrap(), 0);
}

#[test]
fn test_range_filters_report() {
    let service = create_service();
    let school = service.add_school("Escola").unwrap();
    service
        .add_recycling_entry(school.id, &recycling("papel", 1.0, "2024-01-10"))
        .unwrap();
    service
        .add_recycling_entry(school.id, &recycling("papel", 2.0, "2024-03-10"))
        .unwrap();
    service
        .add_recycling_entry(school.id, &recycling("papel", 4.0, "2024-05-10"))
        .unwrap();

    let range = DateRange::new(Some("2024-02".parse().unwrap()), Some("2024-04".parse().unwrap()))
        .unwrap();
    let report = service.report(school.id, range).unwrap();
    assert_eq!(report.recycling.entry_count, 1);
    assert_eq!(report.recycling.total_kg, 2.0);
}

#[test]
fn test_schools_do_not_see_each_others_entries() {
    let service = create_service();
    let first = service.add_school("Primeira").unwrap();
    let second = service.add_school("Segunda").unwrap();
    service
        .add_recycling_entry(first.id, &recycling("metal", 3.0, "2024-02-01"))
        .unwrap();

    let data = service.load_school_data(second.id).unwrap();
    assert!(data.recycling.is_empty());
    assert_eq!(service.load_school_data(first.id).unwrap().recycling.len(), 1);
}

#[test]
fn test_ranking_ties_keep_insertion_order() {
    let service = create_service();
    let a = service.add_school("A").unwrap();
    let b = service.add_school("B").unwrap();
    let c = service.add_school("C").unwrap();
    service
        .add_recycling_entry(b.id, &recycling("metal", 10.0, "2024-02-01"))
        .unwrap();

    let ranking = service
        .ranking(&RankingWeights::default(), DateRange::all())
        .unwrap();
    let order: Vec<i64> = ranking.iter().map(|r| r.school_id).collect();
    assert_eq!(order, vec![b.id, a.id, c.id]);
}

#[test]
fn test_form_to_entry_workflow() {
    let service = create_service();
    let school = service.add_school("Escola").unwrap();

    let form = RecyclingForm {
        material: "Alumínio".to_string(),
        quantity: "1,5".to_string(),
        date: "2024-06-01".to_string(),
    };
    // Unknown key: the accented spelling is not a built-in material
    let parsed = form.parse(service.today()).unwrap();
    assert!(matches!(
        service.add_recycling_entry(school.id, &parsed),
        Err(DashboardError::UnknownMaterial(_))
    ));

    let form = RecyclingForm {
        material: "aluminio".to_string(),
        ..form
    };
    let entry = service
        .add_recycling_entry(school.id, &form.parse(service.today()).unwrap())
        .unwrap();
    assert!((entry.co2_saved - 13.5).abs() < 1e-9);

    let consumption = ConsumptionForm {
        consumption_type: ConsumptionType::Energy,
        month: "2024-13".to_string(),
        consumption: "300".to_string(),
        cost: String::new(),
    };
    assert!(matches!(consumption.parse(), Err(DashboardError::Validation(_))));
}

#[test]
fn test_csv_export_from_database_keeps_columns() {
    let service = create_service();
    let school = service.add_school("Escola").unwrap();
    service.add_custom_factor("Paper, Mixed", 1.0).unwrap();
    service
        .add_recycling_entry(school.id, &recycling("Paper, Mixed", 4.0, "2024-02-10"))
        .unwrap();

    let csv = report_to_csv(&service.report(school.id, DateRange::all()).unwrap()).unwrap();
    assert!(csv.contains("2024-02-10,\"paper, mixed\",4.00,4.00\n"));
}

#[test]
fn test_local_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let service = create_service_with_store(Arc::new(JsonFileStore::new(&path)));
    service.add_custom_factor("isopor", 2.0).unwrap();
    service.dismiss_tip("fix_leaks").unwrap();
    drop(service);

    let reopened = create_service_with_store(Arc::new(JsonFileStore::new(&path)));
    let factors = reopened.material_factors().unwrap();
    assert_eq!(factors.factor_for("isopor").unwrap(), 2.0);
    assert!(reopened
        .visible_tips()
        .unwrap()
        .iter()
        .all(|tip| tip.id != "fix_leaks"));
}

#[test]
fn test_file_database_persists_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schools.db");
    let config = || {
        DatabaseConfig::builder()
            .path(path.to_string_lossy())
            .date_ymd(2024, 6, 15)
            .build()
    };

    {
        let db = DatabaseFactory::create(config()).unwrap();
        let school_id = db.create_school("Escola").unwrap();
        db.upsert_goal(school_id, ConsumptionType::Water, 12.0).unwrap();
    }

    let db = DatabaseFactory::create(config()).unwrap();
    assert_eq!(db.count_schools().unwrap(), 1);
    assert_eq!(db.list_goals(1).unwrap()[0].reduction_percentage, 12.0);
}
