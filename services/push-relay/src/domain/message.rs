/// Outcome of turning a raw request body into a display message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedMessage {
    /// The body was a JSON object carrying one of the well-known message keys.
    Field { key: &'static str, value: String },
    /// The trimmed body, used verbatim.
    RawText(String),
    /// The body was blank.
    Fallback(String),
}

impl ExtractedMessage {
    const PRIORITY_KEYS: [&str; 4] = ["message", "msg", "text", "title"];

    pub fn extract(body: &[u8], fallback: &str) -> Self {
        let decoded = decode_text(body);
        let text = decoded.trim();

        if text.is_empty() {
            return Self::Fallback(fallback.to_string());
        }

        if text.starts_with(['{', '['])
            && let Some((key, value)) = Self::probe_json_field(text)
        {
            return Self::Field { key, value };
        }

        Self::RawText(text.to_string())
    }

    // Anything that does not parse as an object with a usable key yields None
    fn probe_json_field(text: &str) -> Option<(&'static str, String)> {
        let serde_json::Value::Object(object) = serde_json::from_str(text).ok()? else {
            return None;
        };

        Self::PRIORITY_KEYS.into_iter().find_map(|key| {
            object
                .get(key)
                .and_then(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(|value| (key, value.to_string()))
        })
    }

    pub const fn source(&self) -> &'static str {
        match self {
            Self::Field { .. } => "field",
            Self::RawText(_) => "raw_text",
            Self::Fallback(_) => "fallback",
        }
    }

    pub fn into_message(self) -> String {
        match self {
            Self::Field { value, .. } => value,
            Self::RawText(text) | Self::Fallback(text) => text,
        }
    }
}

/// Decodes UTF-8, silently dropping invalid byte sequences.
pub fn decode_text(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
