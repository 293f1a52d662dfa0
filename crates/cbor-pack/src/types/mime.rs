//! [`MimeMessage`]: a minimal RFC 822 style message (tag 36).

use std::str::FromStr;

use crate::error::InvalidValue;

/// A MIME message: ordered header fields followed by a body.
///
/// ```
/// use cbor_pack::MimeMessage;
///
/// let message = MimeMessage::new()
///     .with_header("MIME-Version", "1.0")
///     .with_header("Content-Type", "text/plain")
///     .with_body("Hello");
/// assert_eq!(
///     message.as_string(),
///     "MIME-Version: 1.0\nContent-Type: text/plain\n\nHello"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MimeMessage {
    headers: Vec<(String, String)>,
    body: String,
}

impl MimeMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// First header with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Serializes the message with `\n` line endings.
    pub fn as_string(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.body);
        out
    }
}

impl FromStr for MimeMessage {
    type Err = InvalidValue;

    /// Splits header fields from the body at the first blank line. Folded
    /// header lines (starting with whitespace) continue the previous field.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace("\r\n", "\n");
        let (head, body) = if let Some(rest) = normalized.strip_prefix('\n') {
            ("", rest)
        } else {
            normalized.split_once("\n\n").unwrap_or((normalized.as_str(), ""))
        };
        let mut message = MimeMessage::new().with_body(body);
        for line in head.lines() {
            if line.starts_with([' ', '\t']) {
                let (_, value) = message.headers.last_mut().ok_or_else(|| {
                    InvalidValue::MalformedMessage("continuation line before any header".into())
                })?;
                value.push(' ');
                value.push_str(line.trim());
                continue;
            }
            let (name, value) = line.split_once(':').ok_or_else(|| {
                InvalidValue::MalformedMessage(format!("header line without colon: {line:?}"))
            })?;
            message
                .headers
                .push((name.trim().to_owned(), value.trim().to_owned()));
        }
        Ok(message)
    }
}
