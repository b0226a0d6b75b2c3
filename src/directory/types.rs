use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Discriminator for directory entities. Only `User` principals are
/// terminal; every other kind is expanded as a nested group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrincipalKind {
    User,
    Group,
    DistributionList,
    SecurityGroup,
}

impl PrincipalKind {
    pub fn is_user(&self) -> bool {
        matches!(self, PrincipalKind::User)
    }
}

/// A directory entity as returned by a member listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub login_name: Option<String>,
    pub kind: PrincipalKind,
}

impl Principal {
    /// Best available label for ordering and display: display name, then
    /// email, then login, then the raw identifier.
    pub fn sort_label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .or(self.login_name.as_deref())
            .unwrap_or(self.id.as_str())
    }
}

/// A group as resolved by name lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub id: GroupId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotoSize {
    Small,
    Medium,
    Large,
}

impl PhotoSize {
    pub fn as_str(&self) -> &str {
        match self {
            PhotoSize::Small => "S",
            PhotoSize::Medium => "M",
            PhotoSize::Large => "L",
        }
    }
}

impl FromStr for PhotoSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" | "s" | "small" => Ok(PhotoSize::Small),
            "M" | "m" | "medium" => Ok(PhotoSize::Medium),
            "L" | "l" | "large" => Ok(PhotoSize::Large),
            other => Err(format!("unknown photo size: {}", other)),
        }
    }
}

/// A fetched (non-placeholder) profile photo.
#[derive(Debug, Clone, PartialEq)]
pub struct UserPhoto {
    pub bytes: Vec<u8>,
    pub size: PhotoSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(
        display_name: Option<&str>,
        email: Option<&str>,
        login_name: Option<&str>,
    ) -> Principal {
        Principal {
            id: PrincipalId::new("p-1"),
            display_name: display_name.map(String::from),
            email: email.map(String::from),
            login_name: login_name.map(String::from),
            kind: PrincipalKind::User,
        }
    }

    #[test]
    fn test_sort_label_prefers_display_name() {
        let p = principal(Some("Alice Adams"), Some("alice@corp.test"), Some("alice"));
        assert_eq!(p.sort_label(), "Alice Adams");
    }

    #[test]
    fn test_sort_label_falls_back_to_email_then_login() {
        let p = principal(None, Some("alice@corp.test"), Some("alice"));
        assert_eq!(p.sort_label(), "alice@corp.test");

        let p = principal(None, None, Some("alice"));
        assert_eq!(p.sort_label(), "alice");

        let p = principal(None, None, None);
        assert_eq!(p.sort_label(), "p-1");
    }

    #[test]
    fn test_only_user_kind_is_terminal() {
        assert!(PrincipalKind::User.is_user());
        assert!(!PrincipalKind::Group.is_user());
        assert!(!PrincipalKind::DistributionList.is_user());
        assert!(!PrincipalKind::SecurityGroup.is_user());
    }

    #[test]
    fn test_photo_size_parse_round_trip() {
        assert_eq!("M".parse::<PhotoSize>().unwrap(), PhotoSize::Medium);
        assert_eq!("small".parse::<PhotoSize>().unwrap(), PhotoSize::Small);
        assert_eq!(PhotoSize::Large.as_str(), "L");
        assert!("XL".parse::<PhotoSize>().is_err());
    }

    #[test]
    fn test_principal_kind_wire_format() {
        let kind: PrincipalKind = serde_json::from_str("\"distributionList\"").unwrap();
        assert_eq!(kind, PrincipalKind::DistributionList);
    }
}
