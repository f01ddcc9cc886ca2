//! Counters for record writes and rejected input.

/// Records and logs a successful create.
pub fn record_created(entity: &'static str, key: &str) {
    metrics::counter!("organizer_records_created_total", "entity" => entity).increment(1);
    tracing::info!("Created {} {}", entity, key);
}

pub fn record_updated(entity: &'static str, key: &str) {
    tracing::info!("Updated {} {}", entity, key);
}

/// Records and logs a successful delete.
pub fn record_deleted(entity: &'static str, key: &str) {
    metrics::counter!("organizer_records_deleted_total", "entity" => entity).increment(1);
    tracing::info!("Deleted {} {}", entity, key);
}

pub fn record_rejected(kind: &'static str) {
    metrics::counter!("organizer_validation_failures_total", "kind" => kind).increment(1);
}
