//! Scan database access.
//!
//! The factory's barcode scanners append one row per scanned item;
//! this crate only ever counts them. Two tables, two parameterized
//! range-count queries, nothing else.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::path::Path;

use prodpulse_core::error::{PulseError, Result};

/// Read-mostly handle on the scan database.
pub struct ScanDb {
    conn: Connection,
}

impl ScanDb {
    /// Open the scan database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| PulseError::Database(format!("DB open {}: {e}", path.display())))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// In-memory database, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| PulseError::Database(format!("DB open: {e}")))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
            -- One row per produced item scan
            CREATE TABLE IF NOT EXISTS production_scan (
                id INTEGER PRIMARY KEY,
                barcode TEXT NOT NULL,
                prod_date TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_production_scan_date ON production_scan(prod_date);

            -- One row per finished-goods (storage) scan
            CREATE TABLE IF NOT EXISTS storage_scan (
                id INTEGER PRIMARY KEY,
                barcode TEXT NOT NULL,
                store_date TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_storage_scan_date ON storage_scan(store_date);
            ",
            )
            .map_err(|e| PulseError::Database(format!("DB migrate: {e}")))?;
        Ok(())
    }

    /// Production scans with `prod_date` in `[start, end]`.
    pub fn count_production(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<u32> {
        self.count("SELECT COUNT(*) FROM production_scan WHERE prod_date BETWEEN ?1 AND ?2", start, end)
    }

    /// Storage scans with `store_date` in `[start, end]`.
    pub fn count_storage(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<u32> {
        self.count("SELECT COUNT(*) FROM storage_scan WHERE store_date BETWEEN ?1 AND ?2", start, end)
    }

    fn count(&self, sql: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<u32> {
        self.conn
            .query_row(sql, rusqlite::params![start, end], |row| row.get::<_, u32>(0))
            .map_err(|e| PulseError::Database(format!("Count query failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 29)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn seed(db: &ScanDb, table: &str, column: &str, times: &[NaiveDateTime]) {
        for (i, t) in times.iter().enumerate() {
            db.conn
                .execute(
                    &format!("INSERT INTO {table} (barcode, {column}) VALUES (?1, ?2)"),
                    rusqlite::params![format!("BC{i:05}"), t],
                )
                .unwrap();
        }
    }

    #[test]
    fn test_count_production_range() {
        let db = ScanDb::open_in_memory().unwrap();
        seed(&db, "production_scan", "prod_date", &[
            dt(8, 30),
            dt(9, 15),
            dt(9, 45),
            dt(10, 30),
        ]);
        assert_eq!(db.count_production(dt(9, 0), dt(10, 0)).unwrap(), 2);
        assert_eq!(db.count_production(dt(8, 0), dt(11, 0)).unwrap(), 4);
        assert_eq!(db.count_production(dt(12, 0), dt(13, 0)).unwrap(), 0);
    }

    #[test]
    fn test_count_storage_independent_of_production() {
        let db = ScanDb::open_in_memory().unwrap();
        seed(&db, "production_scan", "prod_date", &[dt(9, 15)]);
        seed(&db, "storage_scan", "store_date", &[dt(9, 20), dt(9, 40)]);
        assert_eq!(db.count_storage(dt(9, 0), dt(10, 0)).unwrap(), 2);
        assert_eq!(db.count_production(dt(9, 0), dt(10, 0)).unwrap(), 1);
    }

    #[test]
    fn test_open_creates_schema_on_disk() {
        let dir = std::env::temp_dir().join("prodpulse-scandb-test");
        std::fs::create_dir_all(&dir).ok();
        let db = ScanDb::open(&dir.join("scans.db")).unwrap();
        assert_eq!(db.count_production(dt(0, 0), dt(23, 0)).unwrap(), 0);
        std::fs::remove_dir_all(&dir).ok();
    }
}
