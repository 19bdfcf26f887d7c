//! Integer fields that also accept numeric strings, as SQLite's integer
//! affinity does for the same values.

use serde::de::Error;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

pub fn option_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected an integer, got {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "super::option_i64")]
        unit: Option<i64>,
    }

    fn unit(json: &str) -> Result<Option<i64>, serde_json::Error> {
        serde_json::from_str::<Body>(json).map(|b| b.unit)
    }

    #[test]
    fn accepts_numbers_and_numeric_text() {
        assert_eq!(unit(r#"{"unit": 2}"#).unwrap(), Some(2));
        assert_eq!(unit(r#"{"unit": " 2 "}"#).unwrap(), Some(2));
    }

    #[test]
    fn absent_and_null_are_none() {
        assert_eq!(unit("{}").unwrap(), None);
        assert_eq!(unit(r#"{"unit": null}"#).unwrap(), None);
    }

    #[test]
    fn rejects_non_numeric_text() {
        let err = unit(r#"{"unit": "two"}"#).unwrap_err();
        assert!(err.to_string().contains("expected an integer"));
    }
}
