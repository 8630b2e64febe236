use tracing::debug;

use super::Change;
use crate::manifest::Requirements;
use crate::version;

/// Merge `source` requirements into `target`.
///
/// Walks the source in its own order: packages missing from the target are
/// added, and packages whose target constraint is older than the source's are
/// raised to the source constraint. Equal or newer target constraints are left
/// alone. When anything changed, the target is sorted by package name.
pub fn merge_packages(source: &Requirements, target: &mut Requirements) -> Vec<Change> {
  let mut changes = Vec::new();

  for req in source.iter() {
    match target.get(&req.package) {
      None => {
        target.insert(req.package.clone(), req.constraint.clone());
        changes.push(Change::PackageAdded {
          package: req.package.clone(),
          version: req.constraint.clone(),
        });
      }
      Some(current) if version::is_older(current, &req.constraint) => {
        let from = current.to_string();
        target.insert(req.package.clone(), req.constraint.clone());
        changes.push(Change::PackageUpdated {
          package: req.package.clone(),
          from,
          to: req.constraint.clone(),
        });
      }
      Some(current) => {
        debug!(package = %req.package, target = current, source = %req.constraint, "keeping target constraint");
      }
    }
  }

  if !changes.is_empty() {
    target.sort();
  }

  changes
}
