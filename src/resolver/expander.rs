use crate::directory::{DirectoryService, GroupId, GroupInfo};
use crate::error::Result;
use crate::resolver::dedup::{DiscoveredUser, DiscoveredUsers};
use std::collections::HashSet;
use std::pin::Pin;

/// One depth-first walk of the membership graph.
///
/// Owns the visited set and the accumulator for a single `resolve` call;
/// neither outlives it. A group already in the visited set is never
/// re-expanded, which bounds the walk to O(distinct groups) on any graph,
/// cycles included.
pub(crate) struct Expansion<'a, D: DirectoryService> {
    directory: &'a D,
    visited: HashSet<GroupId>,
    discovered: DiscoveredUsers,
}

impl<'a, D: DirectoryService> Expansion<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self {
            directory,
            visited: HashSet::new(),
            discovered: DiscoveredUsers::new(),
        }
    }

    /// Resolve the root group and walk its membership.
    ///
    /// Failures on the root lookup or the root member listing propagate to
    /// the caller; failures below the root are logged and contribute
    /// nothing.
    pub async fn run(mut self, root_group: &str) -> Result<Vec<DiscoveredUser>> {
        let root = self.directory.get_group_by_name(root_group).await?;
        self.expand(&root).await?;

        tracing::debug!(
            root = root_group,
            groups_expanded = self.visited.len(),
            users_discovered = self.discovered.len(),
            "Expansion finished"
        );

        Ok(self.discovered.into_vec())
    }

    fn expand<'b>(
        &'b mut self,
        group: &'b GroupInfo,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'b>> {
        Box::pin(async move {
            // Cycle guard: each group is expanded at most once per walk
            if !self.visited.insert(group.id.clone()) {
                tracing::trace!(group = %group.name, "Already expanded, skipping");
                return Ok(());
            }

            let members = self.directory.get_group_members(&group.id).await?;

            for member in members {
                if member.kind.is_user() {
                    self.discovered.upsert(member, &group.name);
                    continue;
                }

                // Nested group. Anything that goes wrong below here only
                // loses this branch; siblings keep going.
                let Some(name) = member.display_name.clone() else {
                    tracing::warn!(
                        member_id = %member.id.as_str(),
                        "Nested group has no display name, skipping"
                    );
                    continue;
                };

                let nested = match self.directory.get_group_by_name(&name).await {
                    Ok(info) => info,
                    Err(e) => {
                        tracing::warn!(
                            group = %name,
                            error = %e,
                            "Failed to look up nested group, skipping branch"
                        );
                        continue;
                    }
                };

                if let Err(e) = self.expand(&nested).await {
                    tracing::warn!(
                        group = %nested.name,
                        error = %e,
                        "Failed to expand nested group, skipping branch"
                    );
                }
            }

            Ok(())
        })
    }
}
