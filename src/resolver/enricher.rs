use crate::directory::{DirectoryService, PhotoSize, UserPhoto};
use crate::resolver::dedup::DiscoveredUser;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A discovered user plus its optional profile photo.
///
/// `photo` is `None` when the directory holds no photo for the user, the
/// fetch failed, or the payload was the deployment's placeholder image.
#[derive(Debug, Clone)]
pub struct EnrichedUser {
    pub user: DiscoveredUser,
    pub photo: Option<UserPhoto>,
}

/// Fetches per-user photos over a fixed-size cooperative worker pool.
///
/// Firing one request per user at once invites directory throttling on
/// large groups; strictly sequential fetches are too slow. The pool caps
/// simultaneous in-flight requests at the configured limit.
pub(crate) struct PhotoEnricher<'a, D: DirectoryService> {
    directory: &'a D,
    site_url: &'a str,
    photo_size: PhotoSize,
    concurrency: usize,
}

impl<'a, D: DirectoryService> PhotoEnricher<'a, D> {
    pub fn new(
        directory: &'a D,
        site_url: &'a str,
        photo_size: PhotoSize,
        concurrency: usize,
    ) -> Self {
        Self {
            directory,
            site_url,
            photo_size,
            concurrency,
        }
    }

    /// Enrich `users` with photos, preserving input order in the output.
    ///
    /// Runs `min(concurrency, N)` workers; each repeatedly claims the next
    /// unclaimed index from a shared counter and records its result against
    /// that index, so completion order never affects output order. Returns
    /// only once every worker has drained the counter.
    pub async fn enrich(&self, users: Vec<DiscoveredUser>) -> Vec<EnrichedUser> {
        let total = users.len();
        if total == 0 {
            return Vec::new();
        }

        let workers = self.concurrency.min(total).max(1);
        let next_index = AtomicUsize::new(0);

        let fetched = {
            let users = &users;
            let next_index = &next_index;
            futures::future::join_all((0..workers).map(|worker| async move {
                let mut claimed = Vec::new();
                loop {
                    let index = next_index.fetch_add(1, Ordering::Relaxed);
                    if index >= total {
                        break;
                    }
                    let photo = self.fetch_photo(&users[index]).await;
                    claimed.push((index, photo));
                }
                tracing::trace!(worker, fetched = claimed.len(), "Photo worker drained");
                claimed
            }))
            .await
        };

        let mut photos: Vec<Option<UserPhoto>> = vec![None; total];
        for (index, photo) in fetched.into_iter().flatten() {
            photos[index] = photo;
        }

        users
            .into_iter()
            .zip(photos)
            .map(|(user, photo)| EnrichedUser { user, photo })
            .collect()
    }

    /// A failed or placeholder fetch degrades to "no photo" for this entry;
    /// it never aborts the pool.
    async fn fetch_photo(&self, user: &DiscoveredUser) -> Option<UserPhoto> {
        let login = user.principal.login_name.as_deref()?;

        match self
            .directory
            .get_user_photo(self.site_url, login, self.photo_size)
            .await
        {
            Ok(Some(bytes)) => {
                if self.directory.is_default_photo(&bytes) {
                    tracing::trace!(login, "Suppressing placeholder photo");
                    None
                } else {
                    Some(UserPhoto {
                        bytes,
                        size: self.photo_size,
                    })
                }
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(
                    login,
                    error = %e,
                    "Photo fetch failed, continuing without photo"
                );
                None
            }
        }
    }
}
