use log::{debug, error};
use rusqlite::{Connection, Result, ffi};

// Embed migrations from the migrations directory
refinery::embed_migrations!("migrations");

/// Opens the database, enables foreign keys and runs pending migrations
pub fn init_connection(db_path: &str) -> Result<Connection> {
    let mut conn = Connection::open(db_path)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    match migrations::runner().run(&mut conn) {
        Ok(report) => {
            debug!(
                "Migrations completed successfully ({} applied)",
                report.applied_migrations().len()
            );
        }
        Err(e) => {
            error!("Refinery migration error: {}", e);
            return Err(rusqlite::Error::SqliteFailure(
                ffi::Error::new(ffi::SQLITE_ERROR),
                Some(format!("migration failed: {}", e)),
            ));
        }
    }

    Ok(conn)
}
