use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::{is_plausible_email, ValidationError};

/// Display currency for all amounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
pub enum Currency {
    #[default]
    Birr,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Birr => "ETB",
            Currency::Usd => "USD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Birr => "Br",
            Currency::Usd => "$",
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "birr" | "etb" | "br" => Ok(Currency::Birr),
            "usd" | "$" => Ok(Currency::Usd),
            other => Err(format!("unknown currency: {other}")),
        }
    }
}

/// Profile of the person using the app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub email: String,
    /// Monthly budget, never negative
    pub budget: f64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default = "default_true")]
    pub notifications: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Avatar image as a `data:` URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Partial profile edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub budget: Option<f64>,
    pub currency: Option<Currency>,
    pub notifications: Option<bool>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

impl User {
    /// Apply an edit, validating before anything is changed.
    pub fn apply(&mut self, update: UpdateProfileRequest) -> Result<(), ValidationError> {
        if let Some(budget) = update.budget {
            if !budget.is_finite() || budget < 0.0 {
                return Err(ValidationError::NegativeBudget);
            }
        }
        if let Some(email) = &update.email {
            if !is_plausible_email(email) {
                return Err(ValidationError::InvalidEmail);
            }
        }

        if let Some(name) = update.name {
            let name = name.trim();
            if !name.is_empty() {
                self.name = name.to_string();
            }
        }
        if let Some(email) = update.email {
            self.email = email.trim().to_string();
        }
        if let Some(budget) = update.budget {
            self.budget = budget;
        }
        if let Some(currency) = update.currency {
            self.currency = currency;
        }
        if let Some(notifications) = update.notifications {
            self.notifications = notifications;
        }
        if let Some(phone) = update.phone {
            let phone = phone.trim();
            self.phone = (!phone.is_empty()).then(|| phone.to_string());
        }
        if let Some(avatar) = update.avatar {
            self.avatar = avatar.starts_with("data:").then_some(avatar);
        }

        Ok(())
    }
}
