//! Ordering of Composer version constraints.
//!
//! Constraints are compared by their floor: the lowest version they admit.
//! `^1.2`, `~1.2`, `>=1.2` and `1.2.0` all have the floor `1.2.0`, so none of
//! them is older than the others.
//!
//! Composer syntax is mapped onto `semver` requirements clause by clause:
//! - `||` (or `|`) separates alternatives, the floor is the lowest among them
//! - whitespace or `,` separates conjunctive clauses, the floor is the highest
//!   lower bound among them
//! - `A - B` hyphen ranges are bounded below by `A`
//! - `@stability` flags, `v` prefixes, build metadata and `as` aliases are dropped
//! - stability suffixes order as `dev < alpha < beta < RC < stable`

use semver::{Comparator, Op, Version, VersionReq};
use tracing::debug;

/// Lower bound contributed by one clause.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Bound {
  Lower(Version),
  Unbounded,
}

/// The lowest version admitted by `constraint`.
///
/// Returns `None` when any part of the constraint can't be understood, for
/// example branch constraints like `dev-main`.
pub fn floor(constraint: &str) -> Option<Version> {
  let mut lowest: Option<Version> = None;

  for alternative in constraint.split('|').map(str::trim).filter(|a| !a.is_empty()) {
    let floor = alternative_floor(alternative)?;
    lowest = Some(match lowest {
      Some(current) => current.min(floor),
      None => floor,
    });
  }

  lowest
}

/// Whether `current` should give way to `candidate`.
///
/// True only if both constraints are understood and `current`'s floor is
/// strictly lower than `candidate`'s.
pub fn is_older(current: &str, candidate: &str) -> bool {
  match (floor(current), floor(candidate)) {
    (Some(current), Some(candidate)) => current < candidate,
    _ => {
      debug!(current, candidate, "constraints not comparable");
      false
    }
  }
}

fn alternative_floor(alternative: &str) -> Option<Version> {
  let alternative = match alternative.split_once(" as ") {
    Some((_, alias)) => alias.trim(),
    None => alternative,
  };

  if let Some((lower, _)) = alternative.split_once(" - ") {
    return match clause_bound(&format!(">={}", lower.trim()))? {
      Bound::Lower(v) => Some(v),
      Bound::Unbounded => Some(Version::new(0, 0, 0)),
    };
  }

  let mut floor = Version::new(0, 0, 0);
  for clause in clauses(alternative)? {
    if let Bound::Lower(v) = clause_bound(&clause)? {
      floor = floor.max(v);
    }
  }
  Some(floor)
}

/// Split a conjunction into clauses, re-attaching operators written apart
/// from their version (`>= 1.0`).
///
/// Returns `None` if an operator is left without a version.
fn clauses(conjunction: &str) -> Option<Vec<String>> {
  let mut clauses: Vec<String> = Vec::new();
  let mut pending_op = String::new();

  for token in conjunction.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()) {
    if token.chars().all(is_operator_char) {
      pending_op.push_str(token);
      continue;
    }
    clauses.push(format!("{}{}", std::mem::take(&mut pending_op), token));
  }

  if !pending_op.is_empty() {
    debug!(conjunction, operator = %pending_op, "operator without a version");
    return None;
  }
  Some(clauses)
}

fn is_operator_char(c: char) -> bool {
  matches!(c, '<' | '>' | '=' | '!' | '^' | '~')
}

fn clause_bound(clause: &str) -> Option<Bound> {
  let clause = clause.split('@').next().unwrap_or_default().trim();
  if clause.is_empty() {
    return Some(Bound::Unbounded);
  }

  let op_len = clause.find(|c: char| !is_operator_char(c)).unwrap_or(clause.len());
  let (op, version) = clause.split_at(op_len);
  if op == "!=" || op == "<>" {
    return Some(Bound::Unbounded);
  }

  let normalized = format!("{}{}", op, normalize_version(version));
  let req = match VersionReq::parse(&normalized) {
    Ok(req) => req,
    Err(e) => {
      debug!(clause, normalized = %normalized, error = %e, "unparseable constraint clause");
      return None;
    }
  };

  let bound = req.comparators.iter().filter_map(comparator_floor).max();
  Some(bound.map_or(Bound::Unbounded, Bound::Lower))
}

fn comparator_floor(comparator: &Comparator) -> Option<Version> {
  match comparator.op {
    Op::Exact | Op::Greater | Op::GreaterEq | Op::Tilde | Op::Caret | Op::Wildcard => Some(Version {
      major: comparator.major,
      minor: comparator.minor.unwrap_or(0),
      patch: comparator.patch.unwrap_or(0),
      pre: comparator.pre.clone(),
      build: Default::default(),
    }),
    _ => None,
  }
}

/// Rewrite a Composer version into `semver` requirement syntax.
fn normalize_version(version: &str) -> String {
  let version = version.trim_start_matches(['v', 'V']);
  let version = version.split('+').next().unwrap_or_default();
  let (numeric, suffix) = match version.split_once('-') {
    Some((numeric, suffix)) => (numeric, Some(suffix)),
    None => (version, None),
  };

  let mut parts: Vec<&str> = numeric.split('.').collect();
  if let Some(i) = parts.iter().position(|p| matches!(*p, "*" | "x" | "X")) {
    parts.truncate(i + 1);
    parts[i] = "*";
    return parts.join(".");
  }
  parts.truncate(3);

  match suffix.and_then(prerelease) {
    Some(pre) => {
      while parts.len() < 3 {
        parts.push("0");
      }
      format!("{}-{}", parts.join("."), pre)
    }
    None => parts.join("."),
  }
}

/// Map a Composer stability suffix onto ordered pre-release identifiers.
///
/// Patch-level suffixes (`-p1`, `-pl2`, `-patch3`) count as stable.
fn prerelease(suffix: &str) -> Option<String> {
  let flat: String = suffix
    .chars()
    .filter(|c| !matches!(c, '.' | '-' | '_'))
    .collect::<String>()
    .to_lowercase();
  let split = flat.find(|c: char| c.is_ascii_digit()).unwrap_or(flat.len());
  let (label, number) = flat.split_at(split);

  let rank = match label {
    "dev" => 0,
    "alpha" | "a" => 1,
    "beta" | "b" => 2,
    "rc" => 3,
    "p" | "pl" | "patch" => return None,
    _ => return Some(flat),
  };

  match number.parse::<u64>() {
    Ok(n) => Some(format!("{}.{}", rank, n)),
    Err(_) => Some(rank.to_string()),
  }
}
