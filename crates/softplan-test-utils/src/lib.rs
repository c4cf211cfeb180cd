//! Shared test utilities for softplan integration tests.
//!
//! Every test gets its own storage: either a [`MemoryStorage`] or a
//! [`FileStorage`] rooted in a fresh temporary directory that is removed
//! when the returned [`TempDir`] guard is dropped.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use softplan_db::clock::FixedClock;
use softplan_db::config::StoreConfig;
use softplan_db::storage::{FileStorage, MemoryStorage};

/// File-backed storage in a throwaway directory.
///
/// Keep the returned `TempDir` alive for as long as the storage is used.
pub async fn temp_file_storage() -> (FileStorage, TempDir) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let storage = FileStorage::open(StoreConfig::new(dir.path()))
        .await
        .expect("failed to open file storage");
    (storage, dir)
}

/// Fresh in-memory storage behind an `Arc`, ready to hand to a service.
pub fn memory_storage() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::new())
}

/// A fixed instant used as "now" across tests: 2024-06-01 10:00 local time.
pub fn fixed_now() -> DateTime<Utc> {
    local_instant(date(2024, 6, 1), 10, 0)
}

/// A clock frozen at [`fixed_now`].
pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(fixed_now()))
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// The UTC instant of `hour:minute` on `date` in host local time.
pub fn local_instant(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    let naive = date
        .and_hms_opt(hour, minute, 0)
        .expect("valid time of day");
    Local
        .from_local_datetime(&naive)
        .earliest()
        .expect("local time exists")
        .with_timezone(&Utc)
}
