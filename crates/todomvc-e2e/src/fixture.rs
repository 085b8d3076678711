//! Seed data for scenarios that start from a populated list.
//!
//! The item labels are data owned by whoever provides the application, so
//! they load from JSON and are never baked into the runner. The default
//! matches the items the classic TodoMVC app tests use.

use crate::result::{E2eError, E2eResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Labels submitted by `createDefaultTodos`
///
/// Only constructed through validation, so every fixture holds at least
/// three distinct labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FixtureFile")]
pub struct TodoFixture {
    items: Vec<String>,
}

/// Unchecked JSON shape of a fixture
#[derive(Deserialize)]
struct FixtureFile {
    items: Vec<String>,
}

impl TryFrom<FixtureFile> for TodoFixture {
    type Error = E2eError;

    fn try_from(file: FixtureFile) -> E2eResult<Self> {
        Self::new(file.items)
    }
}

impl Default for TodoFixture {
    fn default() -> Self {
        Self {
            items: vec![
                "buy some cheese".to_string(),
                "feed the cat".to_string(),
                "book a doctors appointment".to_string(),
            ],
        }
    }
}

impl TodoFixture {
    /// Create a fixture from labels
    pub fn new<I, S>(items: I) -> E2eResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fixture = Self {
            items: items.into_iter().map(Into::into).collect(),
        };
        fixture.validate()?;
        Ok(fixture)
    }

    /// Parse a JSON document (`{"items": [...]}`)
    pub fn from_json_str(json: &str) -> E2eResult<Self> {
        let file: FixtureFile = serde_json::from_str(json)?;
        file.try_into()
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> E2eResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| E2eError::FixtureError {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_json_str(&json)
    }

    /// Scenarios index up to the third item and need distinct rows
    fn validate(&self) -> E2eResult<()> {
        if self.items.len() < 3 {
            return Err(E2eError::FixtureError {
                message: format!("need at least 3 items, got {}", self.items.len()),
            });
        }
        for (i, item) in self.items.iter().enumerate() {
            if item.trim().is_empty() {
                return Err(E2eError::FixtureError {
                    message: format!("item {i} is blank"),
                });
            }
            if item.trim() != item {
                return Err(E2eError::FixtureError {
                    message: format!("item {i} has surrounding whitespace"),
                });
            }
            if self.items[..i].iter().any(|prev| prev == item) {
                return Err(E2eError::FixtureError {
                    message: format!("item {i} duplicates an earlier item: {item:?}"),
                });
            }
        }
        Ok(())
    }

    /// Item labels in submission order
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Label at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is past the last item. Indices 0 to 2 always exist.
    #[must_use]
    pub fn item(&self, index: usize) -> &str {
        &self.items[index]
    }

    /// Number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remaining-count text shown once every item is submitted
    #[must_use]
    pub fn items_left_text(&self) -> String {
        items_left_text(self.items.len())
    }
}

/// Text of the remaining-items counter for `count` active items
#[must_use]
pub fn items_left_text(count: usize) -> String {
    if count == 1 {
        "1 item left".to_string()
    } else {
        format!("{count} items left")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_items() {
        let fixture = TodoFixture::default();
        assert_eq!(fixture.len(), 3);
        assert_eq!(fixture.item(0), "buy some cheese");
        assert_eq!(fixture.item(2), "book a doctors appointment");
        assert!(fixture.validate().is_ok());
    }

    #[test]
    fn test_items_left_text() {
        assert_eq!(items_left_text(0), "0 items left");
        assert_eq!(items_left_text(1), "1 item left");
        assert_eq!(TodoFixture::default().items_left_text(), "3 items left");
    }

    #[test]
    fn test_from_json() {
        let fixture =
            TodoFixture::from_json_str(r#"{"items": ["a", "b", "c", "d"]}"#).unwrap();
        assert_eq!(fixture.len(), 4);
        assert_eq!(fixture.items_left_text(), "4 items left");
    }

    #[test]
    fn test_rejects_short_list() {
        let err = TodoFixture::new(["a", "b"]).unwrap_err();
        assert!(err.to_string().contains("at least 3"));
    }

    #[test]
    fn test_rejects_blank_and_padded() {
        assert!(TodoFixture::new(["a", "  ", "c"]).is_err());
        assert!(TodoFixture::new(["a", " b", "c"]).is_err());
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = TodoFixture::new(["a", "b", "a"]).unwrap_err();
        assert!(err.to_string().contains("duplicates"));
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<TodoFixture>(r#"{"items": []}"#).is_err());
        let fixture: TodoFixture =
            serde_json::from_str(r#"{"items": ["a", "b", "c"]}"#).unwrap();
        assert_eq!(fixture.items(), ["a", "b", "c"]);
    }

    #[test]
    fn test_empty_json_is_fixture_error() {
        let err = TodoFixture::from_json_str(r#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, E2eError::FixtureError { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"items": ["walk the dog", "water plants", "call mom"]}"#)
            .unwrap();
        let fixture = TodoFixture::load(file.path()).unwrap();
        assert_eq!(fixture.item(1), "water plants");
    }

    #[test]
    fn test_load_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"items: [a]").unwrap();
        assert!(matches!(
            TodoFixture::load(file.path()),
            Err(E2eError::Json(_))
        ));
    }
}
