//! Schedule fingerprints for determinism checks and deduplication.

use sha2::{Digest, Sha256};

use crate::error::{PlannerError, PlannerResult};
use crate::models::Schedule;

/// Calculate the SHA-256 checksum of serialized content.
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

/// Checksum of a schedule's JSON encoding. Equal schedules always produce
/// equal checksums since every map in a schedule keeps insertion order.
pub fn schedule_checksum(schedule: &Schedule) -> PlannerResult<String> {
    let json = serde_json::to_string(schedule)
        .map_err(|e| PlannerError::from(e).with_stage("fingerprint"))?;
    Ok(calculate_checksum(&json))
}
