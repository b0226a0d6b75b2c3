//! In-memory directory fake shared by the resolver tests.

use crate::directory::{
    DirectoryService, GroupId, GroupInfo, PhotoSize, Principal, PrincipalId, PrincipalKind,
};
use crate::error::{GroupResolverError, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A user member record.
pub fn user(id: &str, name: &str) -> Principal {
    Principal {
        id: PrincipalId::new(id),
        display_name: Some(name.to_string()),
        email: None,
        login_name: None,
        kind: PrincipalKind::User,
    }
}

/// A user member record with email and login set.
pub fn user_with_login(id: &str, name: &str, email: &str, login: &str) -> Principal {
    Principal {
        id: PrincipalId::new(id),
        display_name: Some(name.to_string()),
        email: Some(email.to_string()),
        login_name: Some(login.to_string()),
        kind: PrincipalKind::User,
    }
}

/// A nested-group member record.
pub fn nested_group(id: &str, name: &str) -> Principal {
    Principal {
        id: PrincipalId::new(id),
        display_name: Some(name.to_string()),
        email: None,
        login_name: None,
        kind: PrincipalKind::SecurityGroup,
    }
}

/// Scriptable in-memory `DirectoryService` with per-operation counters.
#[derive(Default)]
pub struct FakeDirectory {
    groups: HashMap<String, GroupInfo>,
    members: HashMap<String, Vec<Principal>>,
    group_errors: HashMap<String, GroupResolverError>,
    member_errors: HashMap<String, GroupResolverError>,
    photos: HashMap<String, Vec<u8>>,
    photo_errors: HashMap<String, GroupResolverError>,
    default_photo: Option<Vec<u8>>,
    photo_delay: Option<Duration>,

    lookups: AtomicUsize,
    listings: Mutex<HashMap<String, usize>>,
    photo_fetches: AtomicUsize,
    in_flight_photos: AtomicUsize,
    max_in_flight_photos: AtomicUsize,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group by name with the given id and direct members.
    pub fn with_group(mut self, name: &str, id: &str, members: Vec<Principal>) -> Self {
        self.groups.insert(
            name.to_string(),
            GroupInfo {
                id: GroupId::new(id),
                name: name.to_string(),
            },
        );
        self.members.insert(id.to_string(), members);
        self
    }

    /// Make lookups of `name` fail with `error`.
    pub fn with_group_error(mut self, name: &str, error: GroupResolverError) -> Self {
        self.group_errors.insert(name.to_string(), error);
        self
    }

    /// Make member listings of group `id` fail with `error`.
    pub fn with_member_error(mut self, id: &str, error: GroupResolverError) -> Self {
        self.member_errors.insert(id.to_string(), error);
        self
    }

    pub fn with_photo(mut self, login: &str, bytes: Vec<u8>) -> Self {
        self.photos.insert(login.to_string(), bytes);
        self
    }

    pub fn with_photo_error(mut self, login: &str) -> Self {
        self.photo_errors.insert(
            login.to_string(),
            GroupResolverError::Directory(format!("photo fetch failed for {}", login)),
        );
        self
    }

    pub fn with_default_photo(mut self, bytes: Vec<u8>) -> Self {
        self.default_photo = Some(bytes);
        self
    }

    /// Hold each photo fetch open for `ms`, so overlap is observable.
    pub fn with_photo_delay_ms(mut self, ms: u64) -> Self {
        self.photo_delay = Some(Duration::from_millis(ms));
        self
    }

    /// Total `get_group_by_name` calls.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// `get_group_members` calls for one group id.
    pub fn member_listings(&self, group_id: &str) -> usize {
        *self.listings.lock().unwrap().get(group_id).unwrap_or(&0)
    }

    /// Total `get_user_photo` calls.
    pub fn photo_fetches(&self) -> usize {
        self.photo_fetches.load(Ordering::SeqCst)
    }

    /// Highest number of photo fetches observed in flight at once.
    pub fn max_in_flight_photos(&self) -> usize {
        self.max_in_flight_photos.load(Ordering::SeqCst)
    }
}

impl DirectoryService for FakeDirectory {
    async fn get_group_by_name(&self, name: &str) -> Result<GroupInfo> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        // Suspend like a real network call would
        tokio::task::yield_now().await;

        if let Some(error) = self.group_errors.get(name) {
            return Err(error.clone());
        }
        self.groups
            .get(name)
            .cloned()
            .ok_or_else(|| GroupResolverError::GroupNotFound(name.to_string()))
    }

    async fn get_group_members(&self, group_id: &GroupId) -> Result<Vec<Principal>> {
        *self
            .listings
            .lock()
            .unwrap()
            .entry(group_id.as_str().to_string())
            .or_insert(0) += 1;
        tokio::task::yield_now().await;

        if let Some(error) = self.member_errors.get(group_id.as_str()) {
            return Err(error.clone());
        }
        Ok(self
            .members
            .get(group_id.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn get_user_photo(
        &self,
        _site_url: &str,
        login_name: &str,
        _size: PhotoSize,
    ) -> Result<Option<Vec<u8>>> {
        self.photo_fetches.fetch_add(1, Ordering::SeqCst);

        let in_flight = self.in_flight_photos.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight_photos
            .fetch_max(in_flight, Ordering::SeqCst);

        match self.photo_delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        self.in_flight_photos.fetch_sub(1, Ordering::SeqCst);

        if let Some(error) = self.photo_errors.get(login_name) {
            return Err(error.clone());
        }
        Ok(self.photos.get(login_name).cloned())
    }

    fn is_default_photo(&self, bytes: &[u8]) -> bool {
        self.default_photo.as_deref() == Some(bytes)
    }
}
