// SPDX-FileCopyrightText: 2026 University Corporation for Atmospheric Research
// SPDX-License-Identifier: BSD-3-Clause

//! LSF CLI integration: query advance reservations via brsvs.

use std::process::Command;

use anyhow::{anyhow, Context, Result};

use super::types::{HostAlloc, Reservation, RsvOwner, RsvState};

/// Message printed by LSF when the reservation inventory is empty
const NO_RESERVATION: &str = "No reservation found";

/// Handle to an initialized LSF session.
///
/// Constructed once per run; all queries go through the handle so the
/// report logic stays decoupled from the live cluster.
pub struct LsfClient {
    _private: (),
}

impl LsfClient {
    /// Verify the LSF environment is configured and reachable.
    ///
    /// Runs `lsid`, which fails when LSF_ENVDIR is unset or the master
    /// host cannot be contacted.
    pub fn connect() -> Result<Self> {
        let output = Command::new("lsid")
            .output()
            .context("Failed to execute lsid (is LSF installed?)")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("lsid failed: {}", stderr.trim()));
        }

        Ok(Self { _private: () })
    }

    /// List all advance reservations known to the scheduler.
    ///
    /// An empty inventory is not an error; any other brsvs failure is.
    pub fn reservations(&self) -> Result<Vec<Reservation>> {
        let output = Command::new("brsvs")
            .arg("-l")
            .output()
            .context("Failed to execute brsvs")?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if stdout.contains(NO_RESERVATION) || stderr.contains(NO_RESERVATION) {
            return Ok(Vec::new());
        }

        if !output.status.success() {
            return Err(anyhow!("brsvs failed: {}", stderr.trim()));
        }

        Ok(parse_brsvs_output(&stdout))
    }
}

/// Parse `brsvs -l` long-format output.
///
/// Each reservation is a table row (RSVID TYPE USER NCPUS RSV_HOSTS
/// TIME_WINDOW), optionally followed by indented continuation lines with
/// further host:used/total entries, and long-format detail lines of which
/// only `Reservation Status:` is of interest.
fn parse_brsvs_output(output: &str) -> Vec<Reservation> {
    let mut reservations = Vec::new();
    let mut current: Option<Reservation> = None;

    for line in output.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // header may repeat between records
        if trimmed.starts_with("RSVID") {
            continue;
        }

        if let Some(status) = trimmed.strip_prefix("Reservation Status:") {
            if let Some(rsv) = current.as_mut() {
                rsv.state = RsvState::from(status.trim());
            }
            continue;
        }

        if let Some(rsv) = parse_record_line(trimmed) {
            if let Some(done) = current.take() {
                reservations.push(done);
            }
            current = Some(rsv);
            continue;
        }

        // indented continuation: additional hosts of the current record
        if line.starts_with(char::is_whitespace) {
            if let Some(rsv) = current.as_mut() {
                rsv.hosts.extend(trimmed.split_whitespace().filter_map(parse_host_alloc));
            }
        }
        // other long-format lines (Creator:, Reservation Type:, ...) ignored
    }

    if let Some(done) = current.take() {
        reservations.push(done);
    }

    reservations
}

/// Parse a reservation table row, or None if the line is not one.
fn parse_record_line(line: &str) -> Option<Reservation> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 6 {
        return None;
    }

    // NCPUS column ("used/total") identifies a record row
    parse_slot_pair(fields[3])?;

    Some(Reservation {
        rsv_id: fields[0].to_string(),
        state: RsvState::Unknown(String::new()),
        owner: RsvOwner::from(fields[1]),
        hosts: fields[4..fields.len() - 1]
            .iter()
            .filter_map(|t| parse_host_alloc(t))
            .collect(),
    })
}

/// Parse a "host:used/total" token into the slots reserved on that host
fn parse_host_alloc(token: &str) -> Option<HostAlloc> {
    let (host, alloc) = token.split_once(':')?;
    let (_, slots) = parse_slot_pair(alloc)?;
    if host.is_empty() {
        return None;
    }
    Some(HostAlloc {
        host: host.to_string(),
        slots,
    })
}

/// Parse a "used/total" pair
fn parse_slot_pair(s: &str) -> Option<(u64, u64)> {
    let (used, total) = s.split_once('/')?;
    Some((used.parse().ok()?, total.parse().ok()?))
}
