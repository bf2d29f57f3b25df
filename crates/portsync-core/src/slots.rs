//! Caller-declared port slots
//!
//! The operator lists the instance's port resources as
//! `slot:network,slot:network,...`. The list order is the slot order: entry
//! `i` is paired with network attachment `i` of the compute instance. Pairing
//! is positional only; the network name is informational.

use std::collections::HashSet;
use std::str::FromStr;

use crate::errors::PortSyncError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSlot {
    /// Declared `openstack_networking_port_v2` resource name
    pub slot: String,
    /// Live network name the slot is expected to sit on
    pub network: String,
}

/// Ordered, duplicate-free list of port slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSlots(Vec<PortSlot>);

impl PortSlots {
    /// # Errors
    ///
    /// `DuplicateSlot` when a slot name repeats.
    pub fn new(slots: Vec<PortSlot>) -> Result<Self, PortSyncError> {
        let mut seen = HashSet::new();
        for slot in &slots {
            if !seen.insert(slot.slot.as_str()) {
                return Err(PortSyncError::DuplicateSlot {
                    slot: slot.slot.clone(),
                });
            }
        }
        Ok(Self(slots))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&PortSlot> {
        self.0.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PortSlot> {
        self.0.iter()
    }
}

impl FromStr for PortSlots {
    type Err = PortSyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |entry: &str, reason: &str| PortSyncError::InvalidPortDeclaration {
            entry: entry.to_string(),
            reason: reason.to_string(),
        };

        if s.trim().is_empty() {
            return Err(invalid(s, "no port slots declared"));
        }

        let slots = s
            .split(',')
            .map(|entry| {
                let (slot, network) = entry
                    .split_once(':')
                    .ok_or_else(|| invalid(entry, "expected slot:network"))?;
                let (slot, network) = (slot.trim(), network.trim());
                if slot.is_empty() || network.is_empty() {
                    return Err(invalid(entry, "slot and network must be non-empty"));
                }
                if network.contains(':') {
                    return Err(invalid(entry, "expected exactly one ':'"));
                }
                Ok(PortSlot {
                    slot: slot.to_string(),
                    network: network.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        PortSlots::new(slots)
    }
}
