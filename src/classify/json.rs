//! JSON parsing helper for provider responses.

use anyhow::Result;
use serde::de::DeserializeOwned;

/// Parse JSON, reporting the serde path of the failing field on error.
///
/// Provider contracts are loose enough that "missing field `results`" alone
/// is useless in logs; the path pinpoints which part of the body broke.
pub fn parse_with_path<T: DeserializeOwned>(body: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(de).map_err(|err| {
        let path = err.path().to_string();
        let inner = err.into_inner();
        if path.is_empty() || path == "." {
            anyhow::anyhow!("{inner}")
        } else {
            anyhow::anyhow!("at {path}: {inner}")
        }
    })
}
