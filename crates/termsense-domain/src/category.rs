//! The six summary categories

use std::fmt;

/// One of the six categories a document summary is split into
///
/// The JSON key of each category is fixed: it is what the model is asked to
/// produce and what the browser clients read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Key information the reader should be aware of
    ThingsToKnow,
    /// Critical points that need attention
    ImportantPoints,
    /// Potential risks or concerns
    Risks,
    /// What the reader must or must not do
    UserObligations,
    /// Rights and protections the reader keeps
    UserRights,
    /// Anything else worth mentioning
    OptionalNotes,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Category; 6] = [
        Category::ThingsToKnow,
        Category::ImportantPoints,
        Category::Risks,
        Category::UserObligations,
        Category::UserRights,
        Category::OptionalNotes,
    ];

    /// The JSON object key for this category
    pub fn key(&self) -> &'static str {
        match self {
            Category::ThingsToKnow => "ThingsToKnow",
            Category::ImportantPoints => "ImportantPoints",
            Category::Risks => "Risks",
            Category::UserObligations => "UserObligations",
            Category::UserRights => "UserRights",
            Category::OptionalNotes => "OptionalNotes",
        }
    }

    /// Short instruction describing what belongs in this category
    pub fn description(&self) -> &'static str {
        match self {
            Category::ThingsToKnow => "Key information the user should be aware of",
            Category::ImportantPoints => "Critical points that require attention",
            Category::Risks => "Potential risks or concerns for the user",
            Category::UserObligations => "What the user is required to do or not do",
            Category::UserRights => "What rights and protections the user has",
            Category::OptionalNotes => "Additional notes or clarifications",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
