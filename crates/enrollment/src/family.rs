use serde::{Deserialize, Serialize};

use coopbill_core::{Entity, FamilyId};

/// A family: the billing unit.
///
/// Snapshot as read from the persistence layer. The engine never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub id: FamilyId,
    pub last_name: String,
    #[serde(default)]
    pub father: Option<String>,
    #[serde(default)]
    pub mother: Option<String>,
    #[serde(default)]
    pub needs_background_check: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Family {
    pub fn new(id: FamilyId, last_name: impl Into<String>) -> Self {
        Self {
            id,
            last_name: last_name.into(),
            father: None,
            mother: None,
            needs_background_check: false,
            active: true,
        }
    }

    pub fn with_background_check(mut self, needed: bool) -> Self {
        self.needs_background_check = needed;
        self
    }

    /// Salutation line for a statement, e.g. `"John & Jane Smith"`.
    pub fn display_name(&self) -> String {
        let parents: Vec<&str> = [self.father.as_deref(), self.mother.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parents.is_empty() {
            format!("{} Family", self.last_name)
        } else {
            format!("{} {}", parents.join(" & "), self.last_name)
        }
    }
}

impl Entity for Family {
    type Id = FamilyId;

    fn id(&self) -> FamilyId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_collaborator_shape() {
        let json = r#"{"id":7,"lastName":"Nguyen","mother":"Linh","needsBackgroundCheck":true}"#;
        let family: Family = serde_json::from_str(json).unwrap();

        assert_eq!(family.id, FamilyId::new(7));
        assert_eq!(family.father, None);
        assert!(family.needs_background_check);
        assert!(family.active);
    }

    #[test]
    fn display_name_joins_parents() {
        let mut family = Family::new(FamilyId::new(1), "Smith");
        assert_eq!(family.display_name(), "Smith Family");

        family.father = Some("John".into());
        family.mother = Some("Jane".into());
        assert_eq!(family.display_name(), "John & Jane Smith");

        family.father = Some("  ".into());
        assert_eq!(family.display_name(), "Jane Smith");
    }
}
