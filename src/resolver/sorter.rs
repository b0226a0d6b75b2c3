use crate::resolver::dedup::DiscoveredUser;

/// Order users deterministically for presentation.
///
/// Primary key is the case-folded display label (display name, falling back
/// to email, then login, then identifier); ties break on the raw identifier
/// so identical input sets always sort identically, independent of traversal
/// or map-iteration order.
pub(crate) fn sort_users(users: &mut [DiscoveredUser]) {
    users.sort_by(|a, b| {
        let key_a = a.principal.sort_label().to_lowercase();
        let key_b = b.principal.sort_label().to_lowercase();
        key_a
            .cmp(&key_b)
            .then_with(|| a.principal.id.as_str().cmp(b.principal.id.as_str()))
    });
}
