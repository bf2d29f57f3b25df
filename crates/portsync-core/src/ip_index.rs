//! IP → owner lookup with collision tracking
//!
//! Used for both the document's IP → port-id index and the snapshot's
//! IP → interface-id index. Later inserts win; every time an IP changes
//! owner the displaced pair is recorded so callers can warn or reject.

use std::collections::HashMap;

use crate::errors::PortSyncError;

/// An IP claimed by two different owners while building an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpCollision {
    pub ip: String,
    /// Owner that was displaced
    pub first: String,
    /// Owner that won
    pub second: String,
}

impl From<&IpCollision> for PortSyncError {
    fn from(c: &IpCollision) -> Self {
        PortSyncError::IpCollision {
            ip: c.ip.clone(),
            first: c.first.clone(),
            second: c.second.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpIndex {
    owners: HashMap<String, String>,
    collisions: Vec<IpCollision>,
}

impl IpIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `ip` as owned by `owner`; the same owner listed twice is not a collision
    pub fn insert(&mut self, ip: impl Into<String>, owner: impl Into<String>) {
        let ip = ip.into();
        let owner = owner.into();
        if let Some(previous) = self.owners.insert(ip.clone(), owner.clone()) {
            if previous != owner {
                self.collisions.push(IpCollision {
                    ip,
                    first: previous,
                    second: owner,
                });
            }
        }
    }

    pub fn get(&self, ip: &str) -> Option<&str> {
        self.owners.get(ip).map(String::as_str)
    }

    pub fn contains(&self, ip: &str) -> bool {
        self.owners.contains_key(ip)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.owners.iter().map(|(ip, owner)| (ip.as_str(), owner.as_str()))
    }

    /// Entries sorted by IP, for stable display
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable();
        entries
    }

    pub fn collisions(&self) -> &[IpCollision] {
        &self.collisions
    }

    /// Fail on the first recorded collision
    pub fn ensure_no_collisions(&self) -> Result<(), PortSyncError> {
        match self.collisions.first() {
            Some(collision) => Err(collision.into()),
            None => Ok(()),
        }
    }
}
