use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::DashboardError;

/// Names of the external service credentials the dashboard keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CredentialName {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "groq")]
    Groq,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "openWeather")]
    OpenWeather,
    #[serde(rename = "gnews")]
    GNews,
    #[serde(rename = "twelveData")]
    TwelveData,
}

impl CredentialName {
    pub const ALL: [CredentialName; 6] = [
        CredentialName::OpenAi,
        CredentialName::Groq,
        CredentialName::Gemini,
        CredentialName::OpenWeather,
        CredentialName::GNews,
        CredentialName::TwelveData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialName::OpenAi => "openai",
            CredentialName::Groq => "groq",
            CredentialName::Gemini => "gemini",
            CredentialName::OpenWeather => "openWeather",
            CredentialName::GNews => "gnews",
            CredentialName::TwelveData => "twelveData",
        }
    }

    /// Environment variable holding the default value
    pub fn env_var(&self) -> &'static str {
        match self {
            CredentialName::OpenAi => "OPENAI_API_KEY",
            CredentialName::Groq => "GROQ_API_KEY",
            CredentialName::Gemini => "GEMINI_API_KEY",
            CredentialName::OpenWeather => "OPENWEATHER_API_KEY",
            CredentialName::GNews => "GNEWS_API_KEY",
            CredentialName::TwelveData => "TWELVEDATA_API_KEY",
        }
    }
}

impl std::fmt::Display for CredentialName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialName {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CredentialName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DashboardError::NotFound(format!("Unknown credential: {}", s)))
    }
}

/// The fixed set of API keys. Values are stored as given, with no format checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeys {
    pub openai: String,
    pub groq: String,
    pub gemini: String,
    pub open_weather: String,
    pub gnews: String,
    pub twelve_data: String,
}

impl ApiKeys {
    /// Read defaults from the environment. Missing variables become empty strings.
    pub fn from_env() -> Self {
        let mut keys = ApiKeys::default();
        for name in CredentialName::ALL {
            if let Ok(value) = std::env::var(name.env_var()) {
                keys.set(name, value);
            }
        }
        keys
    }

    pub fn get(&self, name: CredentialName) -> &str {
        match name {
            CredentialName::OpenAi => &self.openai,
            CredentialName::Groq => &self.groq,
            CredentialName::Gemini => &self.gemini,
            CredentialName::OpenWeather => &self.open_weather,
            CredentialName::GNews => &self.gnews,
            CredentialName::TwelveData => &self.twelve_data,
        }
    }

    pub fn set(&mut self, name: CredentialName, value: impl Into<String>) {
        let value = value.into();
        match name {
            CredentialName::OpenAi => self.openai = value,
            CredentialName::Groq => self.groq = value,
            CredentialName::Gemini => self.gemini = value,
            CredentialName::OpenWeather => self.open_weather = value,
            CredentialName::GNews => self.gnews = value,
            CredentialName::TwelveData => self.twelve_data = value,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CredentialName, &str)> + '_ {
        CredentialName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }

    /// Copy with every value masked for display
    pub fn masked(&self) -> ApiKeys {
        let mut masked = ApiKeys::default();
        for (name, value) in self.iter() {
            masked.set(name, mask_secret(value));
        }
        masked
    }
}

/// Keep the first and last four characters of long secrets, hide short ones entirely
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_credential_name() {
        assert_eq!("openWeather".parse::<CredentialName>().unwrap(), CredentialName::OpenWeather);
        assert_eq!("TWELVEDATA".parse::<CredentialName>().unwrap(), CredentialName::TwelveData);
        assert!(matches!(
            "weather".parse::<CredentialName>(),
            Err(DashboardError::NotFound(_))
        ));
    }

    #[test]
    fn test_set_replaces_only_one_entry() {
        let mut keys = ApiKeys::default();
        keys.set(CredentialName::Groq, "gsk_123");
        assert_eq!(keys.get(CredentialName::Groq), "gsk_123");
        assert_eq!(keys.get(CredentialName::OpenAi), "");
        assert_eq!(keys.iter().filter(|(_, v)| !v.is_empty()).count(), 1);
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("short"), "****");
        assert_eq!(mask_secret("abcd1234efgh5678"), "abcd...5678");
    }

    #[test]
    fn test_serialized_names_match_wire_names() {
        let value = serde_json::to_value(ApiKeys::default()).unwrap();
        for name in CredentialName::ALL {
            assert!(value.get(name.as_str()).is_some(), "missing {}", name);
        }
    }
}
