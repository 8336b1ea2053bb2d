// Generic record trait and lenient field decoding

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Core trait that any queryable record must implement
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Unique identifier for this record
    fn id(&self) -> &str;

    /// Store that owns this record; None for records shared across stores
    fn tienda_id(&self) -> Option<&str>;

    /// Collection name for this record type (e.g., "productos")
    /// Also accepted as the envelope key when loading `{"productos": [...]}`
    fn collection_name() -> &'static str
    where
        Self: Sized;
}

// ============================================================================
// Lenient decoding
// ============================================================================
//
// The backend is not consistent about ids (sometimes `"12"`, sometimes `12`)
// or numbers (`"19.90"`, `19.9`, `null`). A single odd field should not drop
// the whole record.

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Uint(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Int(i) => i.to_string(),
            RawId::Uint(u) => u.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Num(f64),
    Text(String),
}

impl RawNumber {
    fn as_f64(&self) -> f64 {
        match self {
            RawNumber::Num(n) => *n,
            RawNumber::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        }
    }
}

/// Identifier given as a JSON string or integer
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawId::deserialize(deserializer)?.into_string())
}

/// Optional identifier given as a JSON string, integer or null
pub fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(RawId::into_string))
}

/// Number given as JSON number, numeric string or null (null and junk become 0)
pub fn deserialize_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<RawNumber>::deserialize(deserializer)?
        .map(|raw| raw.as_f64())
        .unwrap_or(0.0);
    Ok(if value.is_finite() { value } else { 0.0 })
}

/// Optional number; null stays None, junk strings become None
pub fn deserialize_opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawNumber>::deserialize(deserializer)?.and_then(|raw| match raw {
        RawNumber::Num(n) => Some(n),
        RawNumber::Text(s) => s.trim().parse::<f64>().ok(),
    }))
}

/// Integer count (stock, quantities); fractional input is truncated
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_number(deserializer).map(|n| n as i64)
}
