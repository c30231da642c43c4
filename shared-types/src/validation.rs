/// Rejections raised at the form boundary before any state is touched.
///
/// The `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid amount greater than 0")]
    InvalidAmount,

    #[error("Please choose a category")]
    MissingCategory,

    #[error("Please enter a description")]
    MissingDescription,

    #[error("Select at least one person to split with")]
    MissingParticipants,

    #[error("Budget cannot be negative")]
    NegativeBudget,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Start date must not be after end date")]
    InvalidRange,

    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("Password must be at least 6 characters")]
    WeakPassword,
}

/// Parse a raw amount field. Accepts anything that reads as a finite number
/// strictly greater than zero.
pub fn parse_positive_amount(raw: &str) -> Result<f64, ValidationError> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidAmount)?;

    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::InvalidAmount);
    }

    Ok(amount)
}

/// Parse a `yyyy-mm-dd` date field.
pub fn parse_date(raw: &str) -> Result<chrono::NaiveDate, ValidationError> {
    chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Loose email shape check used by profile and sign-up forms.
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_amount() {
        assert_eq!(parse_positive_amount("120"), Ok(120.0));
        assert_eq!(parse_positive_amount(" 12.5 "), Ok(12.5));
    }

    #[test]
    fn test_rejects_zero_negative_and_garbage() {
        assert_eq!(parse_positive_amount("0"), Err(ValidationError::InvalidAmount));
        assert_eq!(parse_positive_amount("-5"), Err(ValidationError::InvalidAmount));
        assert_eq!(parse_positive_amount(""), Err(ValidationError::InvalidAmount));
        assert_eq!(parse_positive_amount("abc"), Err(ValidationError::InvalidAmount));
        assert_eq!(parse_positive_amount("NaN"), Err(ValidationError::InvalidAmount));
        assert_eq!(parse_positive_amount("inf"), Err(ValidationError::InvalidAmount));
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2025-11-20").unwrap();
        assert_eq!(date.to_string(), "2025-11-20");
        assert!(parse_date("20/11/2025").is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(is_plausible_email("abebe@example.com"));
        assert!(!is_plausible_email("abebe"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("abebe@example."));
    }
}
