use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Translation,
    Images,
    Definitions,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Translation => "translation",
            Category::Images => "images",
            Category::Definitions => "definitions",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown query type: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "translation" => Ok(Category::Translation),
            "images" => Ok(Category::Images),
            "definitions" => Ok(Category::Definitions),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlannedStage {
    pub category: Category,
    /// Stages whose side effects this one may rely on.
    pub needs: &'static [Category],
}

/// Fixed execution order. `definitions` reads the source language that `translation` detects.
pub const PLAN: [PlannedStage; 3] = [
    PlannedStage {
        category: Category::Translation,
        needs: &[],
    },
    PlannedStage {
        category: Category::Images,
        needs: &[],
    },
    PlannedStage {
        category: Category::Definitions,
        needs: &[Category::Translation],
    },
];

/// Requested categories in plan order; duplicates collapse.
pub fn schedule(requested: &[Category]) -> Vec<Category> {
    PLAN.iter()
        .map(|stage| stage.category)
        .filter(|category| requested.contains(category))
        .collect()
}
