//! `Duration` fields in humantime form (`"10s"`, `"1m 30s"`).
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Limits {
//!     #[serde(with = "info::humantime_serde")]
//!     timeout: Duration,
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserializer, Serializer, de};

/// # Errors
/// Fails on anything `humantime::parse_duration` rejects
pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;

    impl de::Visitor<'_> for Visitor {
        type Value = Duration;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a duration such as \"10s\" or \"250ms\"")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
            humantime::parse_duration(v)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    d.deserialize_str(Visitor)
}

/// # Errors
/// Propagates serializer errors
pub fn serialize<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.collect_str(&humantime::format_duration(*d))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::time::Duration;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Holder {
        #[serde(with = "super")]
        ttl: Duration,
    }

    #[test]
    fn parses_humantime() {
        let h: Holder = serde_json::from_value(json!({"ttl": "1m 30s"})).unwrap();
        assert_eq!(h.ttl, Duration::from_secs(90));
    }

    #[test]
    fn writes_humantime() {
        let value = serde_json::to_value(Holder {
            ttl: Duration::from_millis(1500),
        })
        .unwrap();
        assert_eq!(value, json!({"ttl": "1s 500ms"}));
    }

    #[test]
    fn rejects_garbage() {
        let err = serde_json::from_value::<Holder>(json!({"ttl": "soon"})).unwrap_err();
        assert!(err.to_string().contains("duration"));
    }
}
