use thiserror::Error;

/// Errors are cloneable so a coalesced resolution can hand the same failure
/// to every caller waiting on it.
#[derive(Debug, Clone, Error)]
pub enum GroupResolverError {
    #[error("group not found: {0}")]
    GroupNotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("directory request failed: {0}")]
    Directory(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serde(String),
}

impl GroupResolverError {
    /// True for errors the caller should present as "group not found /
    /// no permission" rather than a generic failure.
    pub fn is_access_error(&self) -> bool {
        matches!(
            self,
            GroupResolverError::GroupNotFound(_) | GroupResolverError::PermissionDenied(_)
        )
    }
}

impl From<reqwest::Error> for GroupResolverError {
    fn from(err: reqwest::Error) -> Self {
        GroupResolverError::Directory(err.to_string())
    }
}

impl From<serde_json::Error> for GroupResolverError {
    fn from(err: serde_json::Error) -> Self {
        GroupResolverError::Serde(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GroupResolverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_access_error() {
        assert!(GroupResolverError::GroupNotFound("approvers".into()).is_access_error());
        assert!(GroupResolverError::PermissionDenied("approvers".into()).is_access_error());
        assert!(!GroupResolverError::Directory("timeout".into()).is_access_error());
    }

    #[test]
    fn test_errors_are_cloneable() {
        let err = GroupResolverError::GroupNotFound("approvers".into());
        let copy = err.clone();
        assert_eq!(err.to_string(), copy.to_string());
    }
}
