use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::error::{GarajError, Result};
use crate::store;
use crate::types::Recipient;

// ---------------------------------------------------------------------------
// AudienceSelector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudienceSelector {
    /// Every user whose status is `active`.
    All,
    /// Distinct owners of `active` startups.
    StartupOwners,
    /// Distinct users holding an `accepted` membership.
    StartupMembers,
}

impl AudienceSelector {
    pub fn all() -> &'static [AudienceSelector] {
        &[
            AudienceSelector::All,
            AudienceSelector::StartupOwners,
            AudienceSelector::StartupMembers,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AudienceSelector::All => "all",
            AudienceSelector::StartupOwners => "startup_owners",
            AudienceSelector::StartupMembers => "startup_members",
        }
    }

    /// The resolution query and the status value bound to `?1`.
    fn query(self) -> (&'static str, &'static str) {
        match self {
            AudienceSelector::All => ("SELECT user_id FROM users WHERE status = ?1", "active"),
            AudienceSelector::StartupOwners => (
                "SELECT DISTINCT owner_id FROM startups WHERE status = ?1",
                "active",
            ),
            AudienceSelector::StartupMembers => (
                "SELECT DISTINCT user_id FROM startup_members WHERE status = ?1",
                "accepted",
            ),
        }
    }
}

impl fmt::Display for AudienceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AudienceSelector {
    type Err = GarajError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(AudienceSelector::All),
            "startup_owners" => Ok(AudienceSelector::StartupOwners),
            "startup_members" => Ok(AudienceSelector::StartupMembers),
            _ => Err(GarajError::InvalidAudienceSelector(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve `selector` to its recipients with a single read on `conn`.
///
/// Order is storage order. Duplicate ids are dropped, keeping the first
/// occurrence, so the result is a set even if the schema lacks a uniqueness
/// constraint.
pub fn resolve(conn: &Connection, selector: AudienceSelector) -> Result<Vec<Recipient>> {
    let (sql, status) = selector.query();
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([status], |row| row.get::<_, i64>(0))?;

    let mut seen = HashSet::new();
    let mut recipients = Vec::new();
    for row in rows {
        let id = row?;
        if seen.insert(id) {
            recipients.push(Recipient(id));
        }
    }
    Ok(recipients)
}

/// Open the store at `path` read-only, resolve, and close it again.
///
/// No transaction outlives this call, so the audience may be stale by the
/// time dispatch starts.
pub fn resolve_at(path: &Path, selector: AudienceSelector) -> Result<Vec<Recipient>> {
    let conn = store::open_read_only(path)?;
    resolve(&conn, selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("garajhub.db");
        let conn = store::open(&path).unwrap();
        store::ensure_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO users (user_id, first_name, status) VALUES
                (1, 'a', 'active'), (2, 'b', 'active'), (3, 'c', 'blocked'), (4, 'd', 'active');
             INSERT INTO startups (name, group_link, owner_id, status) VALUES
                ('s1', 'l', 1, 'active'), ('s2', 'l', 1, 'active'),
                ('s3', 'l', 2, 'pending'), ('s4', 'l', 4, 'active');
             INSERT INTO startup_members (startup_id, user_id, status) VALUES
                (1, 2, 'accepted'), (2, 2, 'accepted'), (1, 3, 'pending'), (4, 1, 'accepted');",
        )
        .unwrap();
        path
    }

    fn ids(recipients: &[Recipient]) -> Vec<i64> {
        let mut v: Vec<i64> = recipients.iter().map(|r| r.id()).collect();
        v.sort();
        v
    }

    #[test]
    fn selector_parses_known_tags() {
        for sel in AudienceSelector::all() {
            let parsed: AudienceSelector = sel.as_str().parse().unwrap();
            assert_eq!(parsed, *sel);
        }
    }

    #[test]
    fn unknown_selector_is_an_error() {
        let err = "nonexistent_tag".parse::<AudienceSelector>().unwrap_err();
        assert!(matches!(err, GarajError::InvalidAudienceSelector(_)));
        assert!("All".parse::<AudienceSelector>().is_err());
        assert!("".parse::<AudienceSelector>().is_err());
    }

    #[test]
    fn all_returns_active_users() {
        let dir = TempDir::new().unwrap();
        let path = seeded(&dir);
        let r = resolve_at(&path, AudienceSelector::All).unwrap();
        assert_eq!(ids(&r), vec![1, 2, 4]);
    }

    #[test]
    fn owners_are_deduplicated() {
        let dir = TempDir::new().unwrap();
        let path = seeded(&dir);
        let r = resolve_at(&path, AudienceSelector::StartupOwners).unwrap();
        assert_eq!(ids(&r), vec![1, 4]);
    }

    #[test]
    fn members_are_deduplicated_and_accepted_only() {
        let dir = TempDir::new().unwrap();
        let path = seeded(&dir);
        let r = resolve_at(&path, AudienceSelector::StartupMembers).unwrap();
        assert_eq!(ids(&r), vec![1, 2]);
    }

    #[test]
    fn no_selector_yields_duplicates() {
        let dir = TempDir::new().unwrap();
        let path = seeded(&dir);
        for sel in AudienceSelector::all() {
            let r = resolve_at(&path, *sel).unwrap();
            let unique: HashSet<_> = r.iter().collect();
            assert_eq!(unique.len(), r.len(), "duplicates for {sel}");
        }
    }

    #[test]
    fn empty_store_resolves_to_empty_audience() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.db");
        let conn = store::open(&path).unwrap();
        store::ensure_schema(&conn).unwrap();
        drop(conn);
        assert!(resolve_at(&path, AudienceSelector::All).unwrap().is_empty());
    }

    #[test]
    fn missing_store_is_a_read_failure() {
        let dir = TempDir::new().unwrap();
        let err = resolve_at(&dir.path().join("absent.db"), AudienceSelector::All).unwrap_err();
        assert!(matches!(err, GarajError::Store(_)));
    }
}
