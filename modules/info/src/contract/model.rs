use serde::{Deserialize, Serialize};

/// The only stored entity: a numeric id and a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl Info {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// `Info` with a fixed default id of 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AiData(Info);

impl AiData {
    pub const DEFAULT_ID: i64 = 1;

    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self(Info::new(id, name))
    }

    #[must_use]
    pub fn id(&self) -> i64 {
        self.0.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }
}

impl Default for AiData {
    fn default() -> Self {
        Self(Info::new(Self::DEFAULT_ID, String::new()))
    }
}

impl AsRef<Info> for AiData {
    fn as_ref(&self) -> &Info {
        &self.0
    }
}

impl From<AiData> for Info {
    fn from(data: AiData) -> Self {
        data.0
    }
}

/// Save payload.
///
/// Without an id the store assigns one; with an id the row is updated, or
/// inserted under that id when absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewInfo {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
}

impl NewInfo {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn with_id(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn info_name_defaults_to_empty() {
        let info: Info = serde_json::from_value(json!({"id": 5})).unwrap();
        assert_eq!(info, Info::new(5, ""));
    }

    #[test]
    fn info_serializes_as_id_and_name() {
        let value = serde_json::to_value(Info::new(2, "two")).unwrap();
        assert_eq!(value, json!({"id": 2, "name": "two"}));
    }

    #[test]
    fn ai_data_defaults() {
        let data = AiData::default();
        assert_eq!(data.id(), 1);
        assert_eq!(data.name(), "");
        assert_eq!(data.as_ref().id, 1);

        let info: Info = data.into();
        assert_eq!(info, Info::new(1, ""));
    }

    #[test]
    fn ai_data_serializes_like_info() {
        let value = serde_json::to_value(AiData::new(3, "ai")).unwrap();
        assert_eq!(value, json!({"id": 3, "name": "ai"}));
    }

    #[test]
    fn new_info_accepts_missing_fields() {
        let new: NewInfo = serde_json::from_value(json!({})).unwrap();
        assert_eq!(new, NewInfo::default());

        let new: NewInfo = serde_json::from_value(json!({"id": 9, "name": "x"})).unwrap();
        assert_eq!(new, NewInfo::with_id(9, "x"));
    }
}
