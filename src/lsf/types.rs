// SPDX-FileCopyrightText: 2026 University Corporation for Atmospheric Research
// SPDX-License-Identifier: BSD-3-Clause

//! Data types for LSF advance reservations.

/// State of an advance reservation as reported by LSF
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsvState {
    Inactive,
    PreStarted,
    PreFailed,
    Active,
    PostStarted,
    Unknown(String),
}

impl From<&str> for RsvState {
    fn from(s: &str) -> Self {
        // brsvs may append a qualifier like "Active(-1)", drop it
        let word = s.split_once('(').map_or(s, |(w, _)| w).trim();
        match word.to_uppercase().as_str() {
            "INACTIVE" => RsvState::Inactive,
            "PRE_STARTED" | "PRE-STARTED" => RsvState::PreStarted,
            "PRE_FAILED" | "PRE-FAILED" => RsvState::PreFailed,
            "ACTIVE" => RsvState::Active,
            "POST_STARTED" | "POST-STARTED" => RsvState::PostStarted,
            other => RsvState::Unknown(other.to_string()),
        }
    }
}

impl RsvState {
    /// Check if the reservation window is currently in effect
    pub fn is_active(&self) -> bool {
        matches!(self, RsvState::Active)
    }
}

/// Ownership category of a reservation.
///
/// LSF distinguishes user- and group-owned reservations, but both are
/// accounted identically here; only system reservations are split out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvOwner {
    System,
    UserGroup,
}

impl From<&str> for RsvOwner {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "sys" | "system" => RsvOwner::System,
            _ => RsvOwner::UserGroup,
        }
    }
}

/// Slots reserved on a single host by one reservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostAlloc {
    /// Hostname
    pub host: String,
    /// Number of slots reserved on this host
    pub slots: u64,
}

/// An advance reservation
#[derive(Debug, Clone)]
pub struct Reservation {
    /// Reservation ID (e.g. "user1#3")
    pub rsv_id: String,
    /// Reservation state
    pub state: RsvState,
    /// Ownership category
    pub owner: RsvOwner,
    /// Per-host slot allocations, in the order reported by LSF
    pub hosts: Vec<HostAlloc>,
}
