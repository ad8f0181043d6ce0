//! Field rules shared by the account and message services.
//!
//! Each check returns the reason it failed so callers can log it; the client only ever
//! sees the operation's generic message. Lengths are UTF-16 code units, so a character
//! outside the Basic Multilingual Plane counts as two.

/// Messages are accepted up to this many characters.
pub const MAX_MESSAGE_LEN: usize = 254;
pub const MIN_PASSWORD_LEN: usize = 4;

/// Length in UTF-16 code units.
pub fn text_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Empty or whitespace only.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub fn check_username(username: Option<&str>) -> Result<&str, &'static str> {
    match username {
        None => Err("username is required"),
        Some(u) if is_blank(u) => Err("username must not be blank"),
        Some(u) => Ok(u),
    }
}

pub fn check_password(password: Option<&str>) -> Result<&str, &'static str> {
    match password {
        None => Err("password is required"),
        Some(p) if text_len(p) < MIN_PASSWORD_LEN => Err("password must be at least 4 characters"),
        Some(p) => Ok(p),
    }
}

pub fn check_message_text(text: Option<&str>) -> Result<&str, &'static str> {
    match text {
        None => Err("messageText is required"),
        Some(t) if is_blank(t) => Err("messageText must not be blank"),
        Some(t) if text_len(t) > MAX_MESSAGE_LEN => Err("messageText must be at most 254 characters"),
        Some(t) => Ok(t),
    }
}
