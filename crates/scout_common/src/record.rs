//! Candidate record - everything collected during one session

use crate::catalog::ProfileField;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Profile answers plus technical answers keyed by question text.
///
/// Values are stored verbatim. Unset fields are omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<String>,

    /// Created on the first technical answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_answers: Option<IndexMap<String, String>>,
}

impl CandidateRecord {
    fn slot_mut(&mut self, field: ProfileField) -> &mut Option<String> {
        match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Email => &mut self.email,
            ProfileField::Phone => &mut self.phone,
            ProfileField::Experience => &mut self.experience,
            ProfileField::Position => &mut self.position,
            ProfileField::Location => &mut self.location,
            ProfileField::TechStack => &mut self.tech_stack,
        }
    }

    pub fn get(&self, field: ProfileField) -> Option<&str> {
        let slot = match field {
            ProfileField::Name => &self.name,
            ProfileField::Email => &self.email,
            ProfileField::Phone => &self.phone,
            ProfileField::Experience => &self.experience,
            ProfileField::Position => &self.position,
            ProfileField::Location => &self.location,
            ProfileField::TechStack => &self.tech_stack,
        };
        slot.as_deref()
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Record an answer to a generated question; a repeated question text
    /// overwrites the earlier answer.
    pub fn record_answer(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.technical_answers
            .get_or_insert_with(IndexMap::new)
            .insert(question.into(), answer.into());
    }

    /// Number of profile fields filled so far
    pub fn filled_fields(&self) -> usize {
        ProfileField::ALL
            .iter()
            .filter(|f| self.get(**f).is_some())
            .count()
    }

    /// Profile fields in catalog order, for display
    pub fn profile_entries(&self) -> Vec<(ProfileField, &str)> {
        ProfileField::ALL
            .iter()
            .filter_map(|f| self.get(*f).map(|v| (*f, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_every_field() {
        let mut record = CandidateRecord::default();
        for field in ProfileField::ALL {
            assert!(record.get(field).is_none());
            record.set(field, format!("value-{}", field));
        }
        for field in ProfileField::ALL {
            assert_eq!(record.get(field), Some(format!("value-{}", field).as_str()));
        }
        assert_eq!(record.filled_fields(), 7);
    }

    #[test]
    fn test_values_are_verbatim() {
        let mut record = CandidateRecord::default();
        record.set(ProfileField::Name, "  jane DOE ");
        assert_eq!(record.name.as_deref(), Some("  jane DOE "));
    }

    #[test]
    fn test_technical_answers_created_lazily_and_ordered() {
        let mut record = CandidateRecord::default();
        assert!(record.technical_answers.is_none());

        record.record_answer("Q2?", "b");
        record.record_answer("Q1?", "a");

        let answers = record.technical_answers.as_ref().unwrap();
        let keys: Vec<&String> = answers.keys().collect();
        assert_eq!(keys, vec!["Q2?", "Q1?"]);
    }

    #[test]
    fn test_json_omits_unset_fields() {
        let mut record = CandidateRecord::default();
        record.set(ProfileField::Email, "jane@example.com");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"email": "jane@example.com"}));
    }

    #[test]
    fn test_json_keys_follow_catalog() {
        let mut record = CandidateRecord::default();
        for field in ProfileField::ALL {
            record.set(field, "x");
        }
        record.record_answer("What is ownership?", "moves");

        let json = serde_json::to_value(&record).unwrap();
        let object = json.as_object().unwrap();
        for field in ProfileField::ALL {
            assert!(object.contains_key(field.key()), "missing {}", field.key());
        }
        assert_eq!(object["technical_answers"]["What is ownership?"], "moves");
        assert_eq!(object.len(), 8);
    }
}
