//! The categorized summary returned for every analysis

use crate::schema::{KeyProblem, ProblemKind, SchemaViolation};
use crate::Category;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A document summary split into six ordered lists of strings
///
/// Serializes with the exact PascalCase keys (`ThingsToKnow`, `ImportantPoints`,
/// ...). Lists keep the model's order; duplicates and empty lists are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategorizedResult {
    /// Key information the reader should be aware of
    pub things_to_know: Vec<String>,
    /// Critical points that need attention
    pub important_points: Vec<String>,
    /// Potential risks or concerns
    pub risks: Vec<String>,
    /// What the reader must or must not do
    pub user_obligations: Vec<String>,
    /// Rights and protections the reader keeps
    pub user_rights: Vec<String>,
    /// Anything else worth mentioning
    pub optional_notes: Vec<String>,
}

impl CategorizedResult {
    /// Validate an arbitrary JSON value against the six-key schema
    ///
    /// Every category key must be present and hold an array of strings. Keys
    /// outside the schema are ignored. A partial object is never returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use termsense_domain::CategorizedResult;
    /// use serde_json::json;
    ///
    /// let value = json!({
    ///     "ThingsToKnow": ["a"],
    ///     "ImportantPoints": [],
    ///     "Risks": [],
    ///     "UserObligations": [],
    ///     "UserRights": [],
    ///     "OptionalNotes": []
    /// });
    /// let result = CategorizedResult::from_value(&value).unwrap();
    /// assert_eq!(result.things_to_know, vec!["a".to_string()]);
    ///
    /// assert!(CategorizedResult::from_value(&json!({"ThingsToKnow": []})).is_err());
    /// ```
    pub fn from_value(value: &Value) -> Result<Self, SchemaViolation> {
        let object = value.as_object().ok_or(SchemaViolation::NotAnObject)?;

        let mut result = Self::default();
        let mut problems = Vec::new();

        for category in Category::ALL {
            match object.get(category.key()) {
                None => problems.push(KeyProblem::new(category, ProblemKind::Missing)),
                Some(Value::Array(items)) => match collect_strings(items) {
                    Ok(strings) => *result.items_mut(category) = strings,
                    Err(index) => problems.push(KeyProblem::new(
                        category,
                        ProblemKind::NonStringItem { index },
                    )),
                },
                Some(_) => problems.push(KeyProblem::new(category, ProblemKind::NotAnArray)),
            }
        }

        if problems.is_empty() {
            Ok(result)
        } else {
            Err(SchemaViolation::InvalidKeys(problems))
        }
    }

    /// Items stored under a category
    pub fn items(&self, category: Category) -> &[String] {
        match category {
            Category::ThingsToKnow => &self.things_to_know,
            Category::ImportantPoints => &self.important_points,
            Category::Risks => &self.risks,
            Category::UserObligations => &self.user_obligations,
            Category::UserRights => &self.user_rights,
            Category::OptionalNotes => &self.optional_notes,
        }
    }

    /// Mutable access to the items stored under a category
    pub fn items_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::ThingsToKnow => &mut self.things_to_know,
            Category::ImportantPoints => &mut self.important_points,
            Category::Risks => &mut self.risks,
            Category::UserObligations => &mut self.user_obligations,
            Category::UserRights => &mut self.user_rights,
            Category::OptionalNotes => &mut self.optional_notes,
        }
    }

    /// Total number of items across all categories
    pub fn total_items(&self) -> usize {
        Category::ALL.iter().map(|c| self.items(*c).len()).sum()
    }

    /// True if every category is empty
    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }
}

/// Collect string items, or return the index of the first non-string
fn collect_strings(items: &[Value]) -> Result<Vec<String>, usize> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| item.as_str().map(str::to_string).ok_or(index))
        .collect()
}
