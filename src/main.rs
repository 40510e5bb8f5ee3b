use eco_dashboard::cli::Args;
use eco_dashboard::dashboard_service::DashboardService;
use eco_dashboard::database_factory::{DatabaseConfig, DatabaseFactory};
use eco_dashboard::gui;
use eco_dashboard::local_store::{JsonFileStore, LocalStore, MemoryStore};
use log::info;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse_args();
    let override_date = args.validate_override_date()?;

    let config = DatabaseConfig::from_args(&args, override_date);
    info!("Opening database at {}", config.get_path());
    let db = Arc::new(DatabaseFactory::create(config)?);

    // Test mode keeps local state in memory as well
    let store: Arc<dyn LocalStore> = if args.test {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(JsonFileStore::new(args.store_path()))
    };

    gui::run_app(DashboardService::new(db, store))?;

    Ok(())
}
