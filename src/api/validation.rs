use crate::api::errors::ApiError;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;
const MAX_EMAIL_LEN: usize = 254;

pub(crate) fn validate_email(email: &str) -> Result<(), ApiError> {
    let trimmed = email.trim();
    let valid = trimmed.len() <= MAX_EMAIL_LEN
        && !trimmed.contains(char::is_whitespace)
        && matches!(trimmed.split_once('@'), Some((local, domain))
            if !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.'));

    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Invalid email format".to_string()))
    }
}

pub(crate) fn validate_password_len(password: &str) -> Result<(), ApiError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("artist@label.com").is_ok());
        assert!(validate_email("a.b+tag@music.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@label.com").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("user@.com").is_err());
        assert!(validate_email("two words@label.com").is_err());
        assert!(validate_email("user@one@two.com").is_err());
    }

    #[test]
    fn password_length_boundary() {
        assert!(validate_password_len("1234567").is_err());
        assert!(validate_password_len("12345678").is_ok());
    }
}
