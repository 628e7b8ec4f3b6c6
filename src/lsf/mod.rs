// SPDX-FileCopyrightText: 2026 University Corporation for Atmospheric Research
// SPDX-License-Identifier: BSD-3-Clause

//! LSF integration module for querying advance reservations.
//!
//! The scheduler is reached through its command-line tools: `lsid` for
//! session initialization and `brsvs -l` for the reservation inventory.

pub mod client;
pub mod types;

pub use client::LsfClient;
pub use types::{HostAlloc, Reservation, RsvOwner, RsvState};
