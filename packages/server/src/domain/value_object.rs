//! Value objects
//!
//! 不変で、生成時にバリデーションを行う値の型。
//! チャット本文と表示名はここでサニタイズされるため、生成後の値は
//! そのままマークアップとして解釈されても安全です。

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of a chat message body, in characters (before escaping)
pub const MAX_MESSAGE_CHARS: usize = 500;

/// Maximum length of a display name or username, in characters
pub const MAX_DISPLAY_NAME_CHARS: usize = 64;

/// Label used when a connection never identified itself
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

const ESCAPED_ENTITIES: [&str; 6] = ["&amp;", "&lt;", "&gt;", "&quot;", "&#x27;", "&#x2F;"];

/// Escape markup-significant characters (`& < > " ' /`).
///
/// An `&` that already starts one of the produced entities is kept as is, so
/// `escape_markup(escape_markup(s)) == escape_markup(s)`.
pub fn escape_markup(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for (idx, ch) in raw.char_indices() {
        match ch {
            '&' if ESCAPED_ENTITIES
                .iter()
                .any(|entity| raw[idx..].starts_with(entity)) =>
            {
                escaped.push('&')
            }
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn truncate_chars(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &value[..byte_idx],
        None => value,
    }
}

/// Opaque identifier of one stream session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh, unique session id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier the hub assigns to each registered connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username of the broadcaster owning a session
///
/// Trimmed, non-empty, at most `MAX_DISPLAY_NAME_CHARS` characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::Empty("username"));
        }
        if trimmed.chars().count() > MAX_DISPLAY_NAME_CHARS {
            return Err(ValueObjectError::TooLong {
                field: "username",
                max: MAX_DISPLAY_NAME_CHARS,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name shown as the author of chat messages (escaped)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// Parse a client-supplied name.
    ///
    /// Returns `None` when the value is empty after trimming, so callers can
    /// fall back to the connection label.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let truncated = truncate_chars(trimmed, MAX_DISPLAY_NAME_CHARS);
        Some(Self(escape_markup(truncated)))
    }

    /// Whether this is the placeholder label for unidentified connections
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_DISPLAY_NAME
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for DisplayName {
    fn default() -> Self {
        Self(DEFAULT_DISPLAY_NAME.to_string())
    }
}

impl From<&Username> for DisplayName {
    fn from(username: &Username) -> Self {
        Self(escape_markup(username.as_str()))
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sanitized chat message body
///
/// Construction trims, rejects empty input, truncates to
/// `MAX_MESSAGE_CHARS` characters and escapes markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(raw: &str) -> Result<Self, ValueObjectError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::Empty("text"));
        }
        let truncated = truncate_chars(trimmed, MAX_MESSAGE_CHARS);
        Ok(Self(escape_markup(truncated)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, clamped at zero
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        u64::try_from(self.0.saturating_sub(earlier.0)).unwrap_or(0)
    }
}
