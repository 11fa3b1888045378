use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PushStatus {
    Up,
    Down,
}

impl PushStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for PushStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(PushStatus::Up.to_string(), "up");
        assert_eq!(PushStatus::Down.to_string(), "down");
        assert_eq!(serde_json::to_string(&PushStatus::Down).unwrap(), "\"down\"");
    }
}
