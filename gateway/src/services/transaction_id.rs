// gateway/src/services/transaction_id.rs

use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};

/// 16 hex characters of OS randomness followed by the unix timestamp, e.g.
/// `9f2c0e41d7a3b865` + `1760600000`.
pub fn generate_transaction_id(now: DateTime<Utc>) -> String {
  let mut bytes = [0u8; 8];
  OsRng.fill_bytes(&mut bytes);
  format!("{}{}", hex::encode(bytes), now.timestamp())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn has_hex_prefix_and_timestamp_suffix() {
    let now = Utc::now();
    let id = generate_transaction_id(now);
    let (prefix, suffix) = id.split_at(16);
    assert!(prefix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_eq!(suffix, now.timestamp().to_string());
  }

  #[test]
  fn two_ids_in_the_same_second_differ() {
    let now = Utc::now();
    assert_ne!(generate_transaction_id(now), generate_transaction_id(now));
  }
}
