use crate::config::DirectoryConfig;
use crate::directory::service::DirectoryService;
use crate::directory::types::{GroupId, GroupInfo, PhotoSize, Principal, PrincipalId, PrincipalKind};
use crate::error::{GroupResolverError, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::OnceCell;

/// HTTP client for the directory's JSON API.
pub struct RestDirectoryClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    /// The deployment-wide placeholder avatar, fetched once on first photo
    /// request and compared byte-for-byte by `is_default_photo`.
    default_photo: OnceCell<Option<Vec<u8>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupRecord {
    id: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberRecord {
    id: String,
    display_name: Option<String>,
    email: Option<String>,
    login_name: Option<String>,
    kind: PrincipalKind,
}

impl From<MemberRecord> for Principal {
    fn from(record: MemberRecord) -> Self {
        Principal {
            id: PrincipalId::new(record.id),
            display_name: record.display_name,
            email: record.email,
            login_name: record.login_name,
            kind: record.kind,
        }
    }
}

impl RestDirectoryClient {
    pub fn new(config: DirectoryConfig) -> Result<Self> {
        // Initialize rustls crypto provider
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GroupResolverError::Directory(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token,
            default_photo: OnceCell::new(),
        })
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let builder = self.http.get(url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Fetch the deployment's placeholder avatar, once. A failed fetch
    /// disables placeholder suppression rather than failing photo lookups.
    async fn placeholder_photo(&self, site_url: &str) -> Option<&Vec<u8>> {
        self.default_photo
            .get_or_init(|| async {
                let url = format!("{}/users/default/photo", site_url.trim_end_matches('/'));
                match self.request(&url).send().await {
                    Ok(response) if response.status().is_success() => {
                        response.bytes().await.ok().map(|b| b.to_vec())
                    }
                    Ok(response) => {
                        tracing::debug!(
                            status = %response.status(),
                            "No placeholder avatar published by this directory"
                        );
                        None
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to fetch placeholder avatar");
                        None
                    }
                }
            })
            .await
            .as_ref()
    }
}

impl DirectoryService for RestDirectoryClient {
    async fn get_group_by_name(&self, name: &str) -> Result<GroupInfo> {
        let url = format!("{}/groups/by-name", self.base_url);
        let response = self.request(&url).query(&[("name", name)]).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status, &format!("group '{}'", name)));
        }

        let record: GroupRecord = response.json().await?;
        tracing::debug!(group = %record.display_name, group_id = %record.id, "Resolved group by name");

        Ok(GroupInfo {
            id: GroupId::new(record.id),
            name: record.display_name,
        })
    }

    async fn get_group_members(&self, group_id: &GroupId) -> Result<Vec<Principal>> {
        let url = format!("{}/groups/{}/members", self.base_url, group_id.as_str());
        let response = self.request(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(
                status,
                &format!("members of group {}", group_id.as_str()),
            ));
        }

        let records: Vec<MemberRecord> = response.json().await?;
        tracing::debug!(
            group_id = %group_id.as_str(),
            member_count = records.len(),
            "Listed group members"
        );

        Ok(records.into_iter().map(Principal::from).collect())
    }

    async fn get_user_photo(
        &self,
        site_url: &str,
        login_name: &str,
        size: PhotoSize,
    ) -> Result<Option<Vec<u8>>> {
        // Warm the placeholder before the first real fetch so classification
        // is available as soon as bytes come back
        let _ = self.placeholder_photo(site_url).await;

        let url = format!("{}/users/photo", site_url.trim_end_matches('/'));
        let response = self
            .request(&url)
            .query(&[("login", login_name), ("size", size.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(classify_status(
                status,
                &format!("photo for '{}'", login_name),
            ));
        }

        let bytes = response.bytes().await?;
        Ok(Some(bytes.to_vec()))
    }

    fn is_default_photo(&self, bytes: &[u8]) -> bool {
        if bytes.is_empty() {
            return true;
        }
        match self.default_photo.get() {
            Some(Some(placeholder)) => placeholder.as_slice() == bytes,
            _ => false,
        }
    }
}

fn classify_status(status: StatusCode, what: &str) -> GroupResolverError {
    match status {
        StatusCode::NOT_FOUND => GroupResolverError::GroupNotFound(what.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GroupResolverError::PermissionDenied(what.to_string())
        }
        other => GroupResolverError::Directory(format!("{}: unexpected status {}", what, other)),
    }
}
