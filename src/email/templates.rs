//! Builders for the two message kinds the identity flows produce.

use super::EmailMessage;

/// Account activation message pointing at the activation URL
pub fn activation(app_name: &str, from: &str, to: &str, activation_url: &str) -> EmailMessage {
    EmailMessage {
        from: from.to_string(),
        to: to.to_string(),
        subject: format!("{} - Account Activation", app_name),
        text: format!("Activate your account from the link: {}", activation_url),
        html: format!(
            "<p>Activate your account from the link: <a href=\"{0}\">{0}</a></p>",
            activation_url
        ),
    }
}

/// Password recovery message pointing at the reset URL
pub fn recovery(app_name: &str, from: &str, to: &str, reset_url: &str) -> EmailMessage {
    EmailMessage {
        from: from.to_string(),
        to: to.to_string(),
        subject: format!("{} - Password Recovery", app_name),
        text: format!("Reset your password from the link: {}", reset_url),
        html: format!(
            "<p>Reset your password from the link: <a href=\"{0}\">{0}</a></p>",
            reset_url
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_message() {
        let message = activation(
            "Acme",
            "no-reply@acme.test",
            "alice@example.com",
            "http://acme.test/activation-user/tok123",
        );

        assert_eq!(message.subject, "Acme - Account Activation");
        assert_eq!(message.to, "alice@example.com");
        assert!(message.text.contains("/activation-user/tok123"));
        assert!(message.html.contains("href=\"http://acme.test/activation-user/tok123\""));
    }

    #[test]
    fn test_recovery_message() {
        let message = recovery(
            "Acme",
            "no-reply@acme.test",
            "alice@example.com",
            "http://acme.test/reset-password/tok456",
        );

        assert_eq!(message.subject, "Acme - Password Recovery");
        assert!(message.text.contains("/reset-password/tok456"));
    }
}
