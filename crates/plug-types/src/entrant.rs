//! Entrant classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseKindError;

/// Which side of the marketplace an entrant is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Looking for services.
    User,
    /// Offers services.
    Provider,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::User => "user",
            UserType::Provider => "provider",
        }
    }

    /// Human-readable label used in emails.
    pub fn label(&self) -> &'static str {
        match self {
            UserType::User => "service user",
            UserType::Provider => "service provider",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "user" => Ok(UserType::User),
            "provider" => Ok(UserType::Provider),
            other => Err(ParseKindError {
                kind: "user type",
                value: other.to_string(),
            }),
        }
    }
}

/// Business shape of a provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Individual,
    /// Salon or shop.
    Shop,
    Company,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Individual => "individual",
            ProviderKind::Shop => "shop",
            ProviderKind::Company => "company",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "individual" => Ok(ProviderKind::Individual),
            "shop" => Ok(ProviderKind::Shop),
            "company" => Ok(ProviderKind::Company),
            other => Err(ParseKindError {
                kind: "provider type",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_parse() {
        assert_eq!("user".parse::<UserType>(), Ok(UserType::User));
        assert_eq!(" provider ".parse::<UserType>(), Ok(UserType::Provider));
        assert!("".parse::<UserType>().is_err());
        assert!("admin".parse::<UserType>().is_err());
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("shop".parse::<ProviderKind>(), Ok(ProviderKind::Shop));
        let err = "salon".parse::<ProviderKind>().expect_err("unknown kind");
        assert_eq!(err.kind, "provider type");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&UserType::Provider).expect("serialize");
        assert_eq!(json, "\"provider\"");
        let kind: ProviderKind = serde_json::from_str("\"company\"").expect("parse");
        assert_eq!(kind, ProviderKind::Company);
    }

    #[test]
    fn test_labels() {
        assert_eq!(UserType::User.label(), "service user");
        assert_eq!(UserType::Provider.label(), "service provider");
    }
}
