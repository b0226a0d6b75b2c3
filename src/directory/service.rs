use crate::directory::types::{GroupId, GroupInfo, PhotoSize, Principal};
use crate::error::Result;

/// The directory service seam consumed by the resolver.
///
/// Implementations are remote clients ([`RestDirectoryClient`] in
/// production); tests substitute an in-memory fake. All operations are
/// suspension points; none of them is expected to be cheap.
///
/// [`RestDirectoryClient`]: crate::directory::RestDirectoryClient
pub trait DirectoryService: Send + Sync {
    /// Resolve a group by its name.
    ///
    /// Fails with `GroupNotFound` when the directory has no such group and
    /// `PermissionDenied` when the caller may not read it.
    fn get_group_by_name(&self, name: &str) -> impl Future<Output = Result<GroupInfo>> + Send;

    /// List a group's direct members, users and nested groups alike.
    fn get_group_members(
        &self,
        group_id: &GroupId,
    ) -> impl Future<Output = Result<Vec<Principal>>> + Send;

    /// Fetch a user's profile photo. `Ok(None)` means the directory holds
    /// no photo for this login.
    fn get_user_photo(
        &self,
        site_url: &str,
        login_name: &str,
        size: PhotoSize,
    ) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Classify a fetched photo as the deployment's default/placeholder
    /// image, which callers suppress rather than display.
    fn is_default_photo(&self, bytes: &[u8]) -> bool;
}
