use tracing::debug;

use super::Change;
use crate::manifest::PatchSet;

/// Merge source patches into `target`.
///
/// A patch is identified by its location: one already referenced anywhere in
/// the target, under any package, is skipped. Otherwise it is stored under its
/// package and description. If the target already has that description for
/// the package with a different location, the source location replaces it.
pub fn merge_patches(source: &PatchSet, target: &mut PatchSet) -> Vec<Change> {
  let mut known = target.locations();
  let mut changes = Vec::new();

  for (package, patch) in source.iter() {
    if let Some(owner) = known.get(&patch.location) {
      debug!(location = %patch.location, owner = %owner, "patch already present");
      continue;
    }

    let replaced = target.insert(package, &patch.description, &patch.location);
    if let Some(old) = &replaced {
      if !target.iter().any(|(_, p)| &p.location == old) {
        known.remove(old);
      }
    }
    known.insert(patch.location.clone(), package.to_string());

    changes.push(Change::PatchAdded {
      package: package.to_string(),
      description: patch.description.clone(),
      location: patch.location.clone(),
      replaced,
    });
  }

  changes
}
