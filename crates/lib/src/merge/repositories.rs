use super::Change;
use crate::manifest::Repository;

/// Append source repositories the target doesn't have yet.
///
/// Descriptors are matched by value. Existing target entries are never
/// reordered or removed; new ones are appended in source order.
pub fn merge_repositories(source: &[Repository], target: &mut Vec<Repository>) -> Vec<Change> {
  let mut changes = Vec::new();

  for repo in source {
    if target.contains(repo) {
      continue;
    }
    target.push(repo.clone());
    changes.push(Change::RepositoryAdded {
      repository: repo.clone(),
    });
  }

  changes
}
