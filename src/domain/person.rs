// Person domain model
use serde::Deserialize;

/// Avatar shown when a person has none of their own.
pub const DEFAULT_AVATAR: &str = "😀";

#[derive(Debug, Clone, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub avatar_emoji: Option<String>,
    /// On the wire, but the board shows zone membership positionally.
    #[allow(dead_code)]
    #[serde(default)]
    pub current_zone: Option<String>,
}

impl Person {
    /// First name only, for compact captions under a figure.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    pub fn avatar(&self) -> &str {
        self.avatar_emoji.as_deref().unwrap_or(DEFAULT_AVATAR)
    }
}

/// Profile shape served by the user pull endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub current_zone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str) -> Person {
        Person {
            id: 1,
            name: name.to_string(),
            avatar_emoji: None,
            current_zone: None,
        }
    }

    #[test]
    fn test_first_name() {
        assert_eq!(person("Ada Lovelace").first_name(), "Ada");
        assert_eq!(person("Prince").first_name(), "Prince");
    }

    #[test]
    fn test_avatar_falls_back_to_default() {
        let mut p = person("Ada Lovelace");
        assert_eq!(p.avatar(), DEFAULT_AVATAR);
        p.avatar_emoji = Some("🦆".to_string());
        assert_eq!(p.avatar(), "🦆");
    }
}
