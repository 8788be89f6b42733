//! Question catalog - the fixed profile questions
//!
//! Order is significant: it is both the question sequence and the order used
//! to find the next field.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the seven profile fields collected before the assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Name,
    Email,
    Phone,
    Experience,
    Position,
    Location,
    TechStack,
}

/// Immutable (prompt, validation instruction) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub field: ProfileField,
    pub prompt: &'static str,
    pub validation: &'static str,
}

pub const CATALOG: [CatalogEntry; 7] = [
    CatalogEntry {
        field: ProfileField::Name,
        prompt: "What is your full name?",
        validation: "Is this a valid full name? It should contain first and last name, only letters and spaces, no numbers or special characters. Respond with only 'valid' or 'invalid: <reason>'",
    },
    CatalogEntry {
        field: ProfileField::Email,
        prompt: "What is your email address?",
        validation: "Is this a valid email address? It should contain @ and a valid domain. Respond with only 'valid' or 'invalid: <reason>'",
    },
    CatalogEntry {
        field: ProfileField::Phone,
        prompt: "What is your phone number? Please include your country code (e.g., +91 for India, +1 for USA, +44 for UK)",
        validation: "Is this a valid phone number? It should start with + followed by country code and number. Example: +91XXXXXXXXXX. Respond with only 'valid' or 'invalid: <reason>'",
    },
    CatalogEntry {
        field: ProfileField::Experience,
        prompt: "How many years of experience do you have? (Type 'fresher' if you have no experience)",
        validation: "Is this a valid experience? Should be either a number, decimal, or the word 'fresher'. Respond with only 'valid' or 'invalid: <reason>'",
    },
    CatalogEntry {
        field: ProfileField::Position,
        prompt: "What is your desired position?",
        validation: "Is this a valid job position? Should be a reasonable job title in the technology field. Respond with only 'valid' or 'invalid: <reason>'",
    },
    CatalogEntry {
        field: ProfileField::Location,
        prompt: "What is your current location?",
        validation: "Is this a valid location? Should be a city, state, country or combination. Respond with only 'valid' or 'invalid: <reason>'",
    },
    CatalogEntry {
        field: ProfileField::TechStack,
        prompt: "Please list your tech stack (technologies you're proficient in):",
        validation: "Is this a valid tech stack? Should contain known programming languages, frameworks, or tools. Respond with only 'valid' or 'invalid: <reason>'",
    },
];

/// Re-prompt for the literal "0" answer to the experience question
pub const FRESHER_REDIRECT: &str = "For candidates with no experience, please type 'fresher'. ";

/// Extra guidance shown when a phone number is rejected
pub const PHONE_HELP: &str = "Please include your country code. Examples:\n- +91 XXXXXXXXXX (India)\n- +1 XXXXXXXXXX (USA)\n- +44 XXXXXXXXXX (UK)\n\nPlease try again.";

impl ProfileField {
    pub const ALL: [ProfileField; 7] = [
        ProfileField::Name,
        ProfileField::Email,
        ProfileField::Phone,
        ProfileField::Experience,
        ProfileField::Position,
        ProfileField::Location,
        ProfileField::TechStack,
    ];

    pub fn first() -> Self {
        ProfileField::Name
    }

    /// Field following this one, `None` after the tech stack
    pub fn next(self) -> Option<Self> {
        let idx = self.index();
        Self::ALL.get(idx + 1).copied()
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn entry(self) -> &'static CatalogEntry {
        &CATALOG[self.index()]
    }

    pub fn prompt(self) -> &'static str {
        self.entry().prompt
    }

    pub fn validation_instruction(self) -> &'static str {
        self.entry().validation
    }

    /// JSON key used in the persisted record
    pub fn key(self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Email => "email",
            ProfileField::Phone => "phone",
            ProfileField::Experience => "experience",
            ProfileField::Position => "position",
            ProfileField::Location => "location",
            ProfileField::TechStack => "tech_stack",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_matches_enum() {
        for (idx, entry) in CATALOG.iter().enumerate() {
            assert_eq!(entry.field.index(), idx);
            assert_eq!(ProfileField::ALL[idx], entry.field);
        }
    }

    #[test]
    fn test_next_walks_every_field_once() {
        let mut walked = vec![ProfileField::first()];
        while let Some(next) = walked.last().and_then(|f| f.next()) {
            walked.push(next);
        }
        assert_eq!(walked, ProfileField::ALL.to_vec());
        assert!(ProfileField::TechStack.is_last());
        assert!(!ProfileField::Location.is_last());
    }

    #[test]
    fn test_every_instruction_asks_for_verdict() {
        for entry in &CATALOG {
            assert!(entry.validation.contains("'valid'"), "{}", entry.field);
            assert!(!entry.prompt.is_empty());
        }
    }

    #[test]
    fn test_keys_match_serde_names() {
        for field in ProfileField::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.key()));
        }
    }
}
