use uuid::Uuid;

pub type ResolutionId = String;

/// Generate a unique id for one resolution call, used to correlate its
/// log lines across the expansion and enrichment stages.
///
/// Format: resolve-{root}-{timestamp}-{random}
/// Example: resolve-approvers-1761520471-a3f9b2
pub fn generate_resolution_id(root_group: &str) -> ResolutionId {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();

    let random = &Uuid::new_v4().to_string()[..6];

    format!("resolve-{}-{}-{}", root_group, timestamp, random)
}
