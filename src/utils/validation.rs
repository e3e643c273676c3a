//! Input checks for user-supplied contact details.

use url::Url;

/// Loose address check: one `@`, no whitespace, and a dot inside the
/// domain part.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Absolute `http` or `https` URL.
pub fn is_valid_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("user.name@domain.co.uk"));
        assert!(!is_valid_email("invalid-email"));
        assert!(!is_valid_email("test@"));
        assert!(!is_valid_email("@domain.com"));
        assert!(!is_valid_email("a b@domain.com"));
        assert!(!is_valid_email("a@b@domain.com"));
        assert!(!is_valid_email("user@localhost"));
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://localhost:3000"));
        assert!(!is_valid_url("not-a-url"));
        assert!(!is_valid_url("ftp://invalid"));
    }
}
