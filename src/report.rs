// SPDX-FileCopyrightText: 2026 University Corporation for Atmospheric Research
// SPDX-License-Identifier: BSD-3-Clause

//! Aggregate active reservations into per-category host/slot statistics.

use std::collections::BTreeMap;
use std::io::{self, Write};

use regex::Regex;

use crate::lsf::{Reservation, RsvOwner};

/// Accumulated totals for one ownership category
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    /// Hostname -> cumulative reserved slots; stacks slots on shared nodes
    hosts: BTreeMap<String, u64>,
    /// Number of matching reservations
    reservations: u64,
}

impl CategoryTotals {
    fn add(&mut self, rsv: &Reservation) {
        self.reservations += 1;
        for alloc in &rsv.hosts {
            *self.hosts.entry(alloc.host.clone()).or_insert(0) += alloc.slots;
        }
    }

    /// Number of distinct hosts touched by matching reservations
    pub fn distinct_hosts(&self) -> usize {
        self.hosts.len()
    }

    /// Total slots reserved across all matching reservations
    pub fn total_slots(&self) -> u64 {
        self.hosts.values().sum()
    }

    /// Number of matching reservations
    pub fn reservations(&self) -> u64 {
        self.reservations
    }
}

/// Statistics over active reservations whose host set matches a pattern
#[derive(Debug, Default)]
pub struct ReservationReport {
    pub system: CategoryTotals,
    pub user: CategoryTotals,
}

impl ReservationReport {
    /// Filter and aggregate reservations.
    ///
    /// Only active reservations with at least one hostname matching the
    /// pattern are counted; a matching reservation contributes all of its
    /// host allocations, not only the matching ones.
    pub fn build(reservations: &[Reservation], host_regex: &Regex) -> Self {
        let mut report = Self::default();

        for rsv in reservations {
            if !rsv.state.is_active() {
                continue;
            }
            if !rsv.hosts.iter().any(|a| host_regex.is_match(&a.host)) {
                continue;
            }

            match rsv.owner {
                RsvOwner::System => report.system.add(rsv),
                RsvOwner::UserGroup => report.user.add(rsv),
            }
        }

        report
    }

    /// Write the two report lines: system first, then user.
    ///
    /// Format: `<label><type> <hosts> <slots> <reservations>`
    pub fn write<W: Write>(&self, w: &mut W, label: &str) -> io::Result<()> {
        for (tag, totals) in [("system", &self.system), ("user", &self.user)] {
            writeln!(
                w,
                "{}{} {} {} {}",
                label,
                tag,
                totals.distinct_hosts(),
                totals.total_slots(),
                totals.reservations()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsf::{HostAlloc, RsvState};

    fn rsv(id: &str, state: RsvState, owner: RsvOwner, hosts: &[(&str, u64)]) -> Reservation {
        Reservation {
            rsv_id: id.to_string(),
            state,
            owner,
            hosts: hosts
                .iter()
                .map(|(h, s)| HostAlloc {
                    host: h.to_string(),
                    slots: *s,
                })
                .collect(),
        }
    }

    fn render(report: &ReservationReport, label: &str) -> String {
        let mut buf = Vec::new();
        report.write(&mut buf, label).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_example_report() {
        let rsvs = vec![
            rsv(
                "sys#1",
                RsvState::Active,
                RsvOwner::System,
                &[("nodeA", 4), ("nodeB", 2)],
            ),
            rsv("u1#1", RsvState::Active, RsvOwner::UserGroup, &[("nodeA", 1)]),
            rsv("sys#2", RsvState::Inactive, RsvOwner::System, &[("nodeC", 8)]),
        ];
        let pattern = Regex::new("node[AB]").unwrap();
        let report = ReservationReport::build(&rsvs, &pattern);

        assert_eq!(
            render(&report, "cluster1-"),
            "cluster1-system 2 6 1\ncluster1-user 1 1 1\n"
        );
    }

    #[test]
    fn test_empty_inventory_prints_zeros() {
        let report = ReservationReport::build(&[], &Regex::new(".*").unwrap());
        assert_eq!(render(&report, "c1-"), "c1-system 0 0 0\nc1-user 0 0 0\n");
    }

    #[test]
    fn test_inactive_never_counted() {
        for state in [
            RsvState::Inactive,
            RsvState::PreStarted,
            RsvState::PreFailed,
            RsvState::PostStarted,
            RsvState::Unknown("".to_string()),
        ] {
            let rsvs = vec![rsv("r#1", state, RsvOwner::System, &[("nodeA", 4)])];
            let report = ReservationReport::build(&rsvs, &Regex::new("nodeA").unwrap());
            assert_eq!(report.system.reservations(), 0);
            assert_eq!(report.system.distinct_hosts(), 0);
        }
    }

    #[test]
    fn test_no_host_match_skips_whole_reservation() {
        let rsvs = vec![rsv(
            "u1#1",
            RsvState::Active,
            RsvOwner::UserGroup,
            &[("nodeX", 4), ("nodeY", 2)],
        )];
        let report = ReservationReport::build(&rsvs, &Regex::new("nodeZ").unwrap());
        assert_eq!(report.user.reservations(), 0);
        assert_eq!(report.user.total_slots(), 0);
    }

    #[test]
    fn test_one_host_match_counts_all_hosts() {
        // reservation-level filter: nodeY does not match but still counts
        let rsvs = vec![rsv(
            "u1#1",
            RsvState::Active,
            RsvOwner::UserGroup,
            &[("nodeX", 4), ("nodeY", 2)],
        )];
        let report = ReservationReport::build(&rsvs, &Regex::new("nodeX").unwrap());
        assert_eq!(report.user.reservations(), 1);
        assert_eq!(report.user.distinct_hosts(), 2);
        assert_eq!(report.user.total_slots(), 6);
    }

    #[test]
    fn test_shared_hosts_stack_slots() {
        let rsvs = vec![
            rsv("s#1", RsvState::Active, RsvOwner::System, &[("nodeA", 4)]),
            rsv("s#2", RsvState::Active, RsvOwner::System, &[("nodeA", 8), ("nodeB", 1)]),
        ];
        let report = ReservationReport::build(&rsvs, &Regex::new("node").unwrap());
        assert_eq!(report.system.reservations(), 2);
        assert_eq!(report.system.distinct_hosts(), 2);
        assert_eq!(report.system.total_slots(), 13);
    }

    #[test]
    fn test_duplicate_host_within_one_reservation() {
        let rsvs = vec![rsv(
            "s#1",
            RsvState::Active,
            RsvOwner::System,
            &[("nodeA", 4), ("nodeA", 4)],
        )];
        let report = ReservationReport::build(&rsvs, &Regex::new("nodeA").unwrap());
        assert_eq!(report.system.distinct_hosts(), 1);
        assert_eq!(report.system.total_slots(), 8);
    }

    #[test]
    fn test_categories_accumulate_independently() {
        let rsvs = vec![
            rsv("s#1", RsvState::Active, RsvOwner::System, &[("nodeA", 4)]),
            rsv("u#1", RsvState::Active, RsvOwner::UserGroup, &[("nodeA", 2)]),
        ];
        let report = ReservationReport::build(&rsvs, &Regex::new("nodeA").unwrap());
        assert_eq!(report.system.total_slots(), 4);
        assert_eq!(report.user.total_slots(), 2);
    }

    #[test]
    fn test_regex_is_substring_search() {
        let rsvs = vec![rsv(
            "u#1",
            RsvState::Active,
            RsvOwner::UserGroup,
            &[("rack1-node001.cluster", 2)],
        )];
        let report = ReservationReport::build(&rsvs, &Regex::new("node0").unwrap());
        assert_eq!(report.user.reservations(), 1);
    }

    #[test]
    fn test_build_is_deterministic() {
        let rsvs = vec![
            rsv("s#1", RsvState::Active, RsvOwner::System, &[("nodeB", 2), ("nodeA", 4)]),
            rsv("u#1", RsvState::Active, RsvOwner::UserGroup, &[("nodeA", 1)]),
        ];
        let pattern = Regex::new("node").unwrap();
        let first = render(&ReservationReport::build(&rsvs, &pattern), "x-");
        let second = render(&ReservationReport::build(&rsvs, &pattern), "x-");
        assert_eq!(first, second);
    }
}
