//! Content hashes used as cache-key parts.

use ps_engine::{DutyPoint, SelectionConfig};
use serde::Serialize;
use sha2::{Digest, Sha256};

fn sha256_json<T: Serialize>(value: &T) -> String {
    let json = serde_json::to_string(value).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Signature of every scoring weight and threshold in `config`.
pub fn config_signature(config: &SelectionConfig) -> String {
    sha256_json(config)
}

/// Signature of a duty point, including its constraints.
pub fn duty_signature(duty: &DutyPoint) -> String {
    sha256_json(duty)
}
