use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Grade code → display name (e.g. `1` → `"1st"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeTable(BTreeMap<i32, String>);

impl GradeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kindergarten (code 0) through 12th.
    pub fn standard() -> Self {
        let mut table = BTreeMap::new();
        table.insert(0, "K".to_string());
        for code in 1..=12 {
            table.insert(code, ordinal(code));
        }
        Self(table)
    }

    pub fn with_grade(mut self, code: i32, name: impl Into<String>) -> Self {
        self.0.insert(code, name.into());
        self
    }

    pub fn label(&self, code: i32) -> Option<&str> {
        self.0.get(&code).map(String::as_str)
    }
}

fn ordinal(n: i32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
