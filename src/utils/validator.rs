/// Validate if a username is in the acceptable format
pub fn validate_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Validate the basic shape of an email address
pub fn validate_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();

    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Validate if a filename is valid
pub fn validate_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\', ':', '*', '?', '"', '<', '>', '|'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_format() {
        assert!(validate_username("alice"));
        assert!(validate_username("alice.smith_2"));
        assert!(!validate_username(""));
        assert!(!validate_username("alice smith"));
        assert!(!validate_username("alice/smith"));
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("alice@example.com"));
        assert!(!validate_email("alice"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("alice@nodot"));
        assert!(!validate_email("alice@.com"));
    }

    #[test]
    fn test_filename_rejects_separators() {
        assert!(validate_filename("alice.png"));
        assert!(!validate_filename("../alice.png"));
        assert!(!validate_filename("a/b.png"));
        assert!(!validate_filename(""));
    }
}
