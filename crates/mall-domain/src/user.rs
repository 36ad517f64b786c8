//! Account field validation shared by registration, login and the address book.

/// Username length bounds, in characters.
pub const USERNAME_MIN_LEN: usize = 5;
pub const USERNAME_MAX_LEN: usize = 20;

/// Password length bounds, in characters.
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 20;

/// Validate a username: 5-20 word characters (letters, digits, underscore).
///
/// A username that is itself a valid mobile number is rejected so that login by
/// "username or mobile" is never ambiguous.
pub fn validate_username(username: &str) -> bool {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return false;
    }
    if validate_mobile(username) {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_')
}

/// Validate a mainland mobile number: `1[3-9]` followed by nine digits.
pub fn validate_mobile(mobile: &str) -> bool {
    let bytes = mobile.as_bytes();
    bytes.len() == 11
        && bytes[0] == b'1'
        && (b'3'..=b'9').contains(&bytes[1])
        && bytes[2..].iter().all(u8::is_ascii_digit)
}

/// Validate a password: 8-20 characters, no whitespace.
pub fn validate_password(password: &str) -> bool {
    let len = password.chars().count();
    (PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len)
        && !password.chars().any(char::is_whitespace)
}

/// Loose email syntax check: `local@domain.tld`, no whitespace, at most 254 bytes.
pub fn validate_email(email: &str) -> bool {
    if email.is_empty() || email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !host.starts_with('.') && tld.len() >= 2,
        None => false,
    }
}
