//! Note category - closed set, lowercase on the wire

use serde::Serialize;

use super::ValidationError;

/// Category tag attached to every note
///
/// Values are matched case-sensitively. `"Other"` is still accepted by
/// `FromStr` as an alias of `other` so older clients keep working; it is
/// never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Personal,
    Work,
    Study,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Personal,
        Category::Work,
        Category::Study,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Personal => "personal",
            Category::Work => "work",
            Category::Study => "study",
            Category::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(Category::Personal),
            "work" => Ok(Category::Work),
            "study" => Ok(Category::Study),
            "other" | "Other" => Ok(Category::Other),
            _ => Err(ValidationError::InvalidVariant {
                field: "category",
                value: s.to_owned(),
            }),
        }
    }
}
