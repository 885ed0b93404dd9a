//! Serde helpers for the shapes Kalshi uses on the wire.
//!
//! Kalshi encodes "nothing" in several ways depending on the endpoint: an
//! absent field, `null`, or an empty string. These helpers fold those into
//! one representation.

use std::collections::BTreeSet;
use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serializer};

/// Serialize a `BTreeSet<T>` as a comma-separated string.
///
/// Used for multi-value query filters such as `tickers`.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeSet;
/// use serde::Serialize;
/// use kalshi_api_client::types::serde_helpers::comma_separated;
///
/// #[derive(Serialize)]
/// struct Filter {
///     #[serde(serialize_with = "comma_separated::serialize")]
///     tickers: BTreeSet<String>,
/// }
///
/// let filter = Filter {
///     tickers: ["KXB", "KXA"].iter().map(|s| s.to_string()).collect(),
/// };
/// assert_eq!(serde_urlencoded::to_string(&filter).unwrap(), "tickers=KXA%2CKXB");
/// ```
pub mod comma_separated {
    use super::*;

    /// Serialize a BTreeSet as a comma-separated string.
    pub fn serialize<T, S>(set: &BTreeSet<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        let s = set
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        serializer.serialize_str(&s)
    }
}

/// Deserialize an optional string, treating `""` the same as `null`.
///
/// Pagination cursors come back as `""` on the last page of some endpoints
/// and as `null` or absent on others.
///
/// ```rust
/// use serde::Deserialize;
/// use kalshi_api_client::types::serde_helpers::empty_string_as_none;
///
/// #[derive(Deserialize)]
/// struct Page {
///     #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
///     cursor: Option<String>,
/// }
///
/// let page: Page = serde_json::from_str(r#"{"cursor":""}"#).unwrap();
/// assert!(page.cursor.is_none());
/// ```
pub mod empty_string_as_none {
    use super::*;

    /// Deserialize a string, returning None if empty.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.filter(|s| !s.is_empty()))
    }
}

/// Deserialize `null` as `T::default()`.
///
/// Orderbook sides are `null` instead of `[]` when they hold no levels.
pub mod null_as_default {
    use super::*;

    /// Deserialize an optional value, falling back to the default.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: Default + Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[test]
    fn test_comma_separated_serialize() {
        #[derive(Serialize)]
        struct Test {
            #[serde(serialize_with = "comma_separated::serialize")]
            tickers: BTreeSet<String>,
        }

        let test = Test {
            tickers: ["c", "a", "b"].iter().map(|s| s.to_string()).collect(),
        };
        let json = serde_json::to_string(&test).unwrap();
        assert_eq!(json, r#"{"tickers":"a,b,c"}"#);
    }

    #[test]
    fn test_empty_string_as_none() {
        #[derive(Deserialize, Debug)]
        struct Test {
            #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
            cursor: Option<String>,
        }

        let empty: Test = serde_json::from_str(r#"{"cursor":""}"#).unwrap();
        assert!(empty.cursor.is_none());

        let null: Test = serde_json::from_str(r#"{"cursor":null}"#).unwrap();
        assert!(null.cursor.is_none());

        let absent: Test = serde_json::from_str("{}").unwrap();
        assert!(absent.cursor.is_none());

        let present: Test = serde_json::from_str(r#"{"cursor":"abc"}"#).unwrap();
        assert_eq!(present.cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn test_null_as_default() {
        #[derive(Deserialize, Debug)]
        struct Test {
            #[serde(default, deserialize_with = "null_as_default::deserialize")]
            levels: Vec<u32>,
        }

        let null: Test = serde_json::from_str(r#"{"levels":null}"#).unwrap();
        assert!(null.levels.is_empty());

        let absent: Test = serde_json::from_str("{}").unwrap();
        assert!(absent.levels.is_empty());

        let present: Test = serde_json::from_str(r#"{"levels":[1,2]}"#).unwrap();
        assert_eq!(present.levels, vec![1, 2]);
    }
}
