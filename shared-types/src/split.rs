use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::{parse_positive_amount, ValidationError};

/// Either [`ME`] or a friend id
pub type ParticipantId = String;

/// Participant id standing for the app user
pub const ME: &str = "me";

pub fn is_me(participant: &str) -> bool {
    participant == ME
}

/// Someone bills can be split with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: String,
    pub name: String,
    /// Emoji or short glyph shown next to the name
    pub avatar: String,
}

/// A bill shared between the user and friends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct SplitExpense {
    pub id: String,
    pub description: String,
    pub total_amount: f64,
    pub paid_by: ParticipantId,
    pub date: NaiveDate,
    pub split_between: Vec<ParticipantId>,
    #[serde(default)]
    pub settled: bool,
}

impl SplitExpense {
    /// Share charged to each participant
    pub fn share(&self) -> f64 {
        if self.split_between.is_empty() {
            0.0
        } else {
            self.total_amount / self.split_between.len() as f64
        }
    }
}

/// Raw values from the split form
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct SplitForm {
    pub description: String,
    pub total_amount: String,
    pub paid_by: ParticipantId,
    pub date: Option<NaiveDate>,
    pub split_between: Vec<ParticipantId>,
}

impl SplitForm {
    pub fn validate(&self, id: String, today: NaiveDate) -> Result<SplitExpense, ValidationError> {
        let total_amount = parse_positive_amount(&self.total_amount)?;

        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }

        let mut split_between: Vec<ParticipantId> = Vec::new();
        for participant in &self.split_between {
            let participant = participant.trim();
            if !participant.is_empty() && !split_between.iter().any(|p| p == participant) {
                split_between.push(participant.to_string());
            }
        }
        if split_between.is_empty() {
            return Err(ValidationError::MissingParticipants);
        }

        let paid_by = match self.paid_by.trim() {
            "" => ME.to_string(),
            other => other.to_string(),
        };

        Ok(SplitExpense {
            id,
            description: description.to_string(),
            total_amount,
            paid_by,
            date: self.date.unwrap_or(today),
            split_between,
            settled: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 20).unwrap()
    }

    #[test]
    fn test_validate_dedupes_participants_and_defaults_payer() {
        let form = SplitForm {
            description: "Dinner".to_string(),
            total_amount: "300".to_string(),
            paid_by: String::new(),
            date: None,
            split_between: vec!["me".into(), "f1".into(), "f1".into(), " ".into()],
        };
        let split = form.validate("s1".to_string(), today()).unwrap();
        assert_eq!(split.paid_by, ME);
        assert_eq!(split.split_between, vec!["me".to_string(), "f1".to_string()]);
        assert_eq!(split.share(), 150.0);
        assert!(!split.settled);
    }

    #[test]
    fn test_validate_requires_participants() {
        let form = SplitForm {
            description: "Taxi".to_string(),
            total_amount: "90".to_string(),
            split_between: vec![],
            ..Default::default()
        };
        assert_eq!(
            form.validate("s1".to_string(), today()),
            Err(ValidationError::MissingParticipants)
        );
    }

    #[test]
    fn test_split_json_shape() {
        let json = r#"{"id":"s1","description":"Pizza","totalAmount":450,"paidBy":"me",
            "date":"2025-11-18","splitBetween":["me","f1","f2"]}"#;
        let split: SplitExpense = serde_json::from_str(json).unwrap();
        assert_eq!(split.total_amount, 450.0);
        assert!(!split.settled);
    }
}
