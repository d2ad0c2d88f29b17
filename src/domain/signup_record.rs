use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::{collections::BTreeMap, fmt};

/// The fields of a signup exactly as they were submitted.
///
/// No schema is enforced on the fields. Which field identifies the record is
/// decided by the store it is written to, and the notifier only reads `email`
/// to build a summary.
///
/// When a field is submitted more than once, its first value is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
#[serde(transparent)]
pub struct SignupRecord(BTreeMap<String, String>);

impl SignupRecord {
    /// Look up the value of a single field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// The email the record was submitted with, if any.
    pub fn email(&self) -> Option<&str> {
        self.get("email")
    }

    /// Encode the record as a JSON object of its fields.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}

impl<'de> Deserialize<'de> for SignupRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FirstValueWins)
    }
}

struct FirstValueWins;

impl<'de> Visitor<'de> for FirstValueWins {
    type Value = SignupRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of field names to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut fields = BTreeMap::new();
        while let Some((field, value)) = access.next_entry::<String, String>()? {
            fields.entry(field).or_insert(value);
        }
        Ok(SignupRecord(fields))
    }
}

impl From<BTreeMap<String, String>> for SignupRecord {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self(fields)
    }
}

impl<K, V> FromIterator<(K, V)> for SignupRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
