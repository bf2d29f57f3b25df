//! Live inventory: the provider seam and the snapshot built from it

pub mod fixture;
pub mod snapshot;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

pub use fixture::{InventoryFile, ServerRecord, StaticInventoryProvider};
pub use snapshot::{snapshot, InventorySnapshot};

/// A live server as returned by a name search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveInstance {
    pub name: String,
    pub id: String,
}

/// A live interface (Neutron port) and its IPs in provider order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveInterface {
    pub id: String,
    #[serde(default)]
    pub ips: Vec<String>,
}

/// Characters with special meaning in a POSIX extended regex
const ERE_METACHARACTERS: &str = "\\.+*?()|[]{}^$";

/// Anchored exact-name search pattern
///
/// Rendered as `^name$` with regex metacharacters escaped, which is what the
/// Nova `name` filter expects for an exact match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    name: String,
}

impl NamePattern {
    pub fn exact(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Anchored pattern for Nova's `name` filter
    ///
    /// Nova hands the filter to the database as a POSIX extended regex (MySQL
    /// `REGEXP`, PostgreSQL `~`). Every ERE metacharacter is backslash-escaped,
    /// which both dialects read as a literal.
    pub fn to_regex(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + 2);
        out.push('^');
        for c in self.name.chars() {
            if ERE_METACHARACTERS.contains(c) {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('$');
        out
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.name == candidate
    }
}

impl std::fmt::Display for NamePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_regex())
    }
}

/// The two queries reconciliation needs from the inventory system
///
/// Implementations do not retry; errors propagate to the caller unchanged.
#[cfg_attr(test, mockall::automock)]
pub trait InventoryProvider {
    /// Servers whose name matches `pattern`
    fn find_instances(&self, pattern: &NamePattern) -> Result<Vec<LiveInstance>>;

    /// Interfaces of one server, in provider order
    fn list_interfaces(&self, instance_id: &str) -> Result<Vec<LiveInterface>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_ere_metacharacter_is_escaped() {
        let pattern = NamePattern::exact(ERE_METACHARACTERS);
        let escaped: String = ERE_METACHARACTERS.chars().flat_map(|c| ['\\', c]).collect();
        assert_eq!(pattern.to_regex(), format!("^{}$", escaped));
    }

    #[test]
    fn test_pattern_is_anchored() {
        assert_eq!(NamePattern::exact("web-1").to_regex(), "^web-1$");
    }

    #[test]
    fn test_pattern_escapes_metacharacters() {
        let pattern = NamePattern::exact("web.1(a)");
        assert_eq!(pattern.to_regex(), r"^web\.1\(a\)$");
        assert_eq!(pattern.to_string(), pattern.to_regex());
    }

    #[test]
    fn test_matches_is_exact() {
        let pattern = NamePattern::exact("web-1");
        assert!(pattern.matches("web-1"));
        assert!(!pattern.matches("web-10"));
        assert!(!pattern.matches("xweb-1"));
    }
}
