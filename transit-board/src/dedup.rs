//! Departure deduplication.
//!
//! A station is a group of physically distinct stop records, so one bus
//! calling at a multi-platform station shows up as several stop-time rows a
//! minute or two apart. Two same-route rows closer than two minutes are the
//! same vehicle; genuinely distinct vehicles on one route never run that
//! close within a single date's result.
//!
//! The pass is stateful per route: rows are ordered by (route, minute, modal
//! destination first) and a row survives only when it is at least two
//! minutes after the last survivor of its route. Among rows at the same
//! minute the one whose destination is the route's most common destination
//! wins, falling back to the earliest-encountered row. The output is
//! re-sorted ascending by time. Running the pass on its own output changes
//! nothing.

use std::collections::HashMap;

use crate::destinations::most_common;
use crate::domain::TimeOfDay;

/// Minute gap below which two same-route rows are one vehicle.
const DEDUP_WINDOW_MINS: u32 = 2;

/// Row shape consumed by the deduplicator.
///
/// Implemented by both departure-board rows and connection rows, so the
/// same pass serves both queries.
pub trait BoardRow {
    /// Route display name the row belongs to.
    fn route(&self) -> &str;

    /// Resolved destination shown for the row.
    fn destination(&self) -> &str;

    /// Departure time the row is keyed on.
    fn time(&self) -> TimeOfDay;
}

/// Collapse same-vehicle rows, returning the survivors ascending by time.
pub fn dedup_board<T: BoardRow>(rows: Vec<T>) -> Vec<T> {
    if rows.len() <= 1 {
        return rows;
    }

    // Modal destination per route across the full input
    let mut by_route: HashMap<&str, Vec<&str>> = HashMap::new();
    for row in &rows {
        by_route.entry(row.route()).or_default().push(row.destination());
    }
    let modal: HashMap<String, String> = by_route
        .into_iter()
        .filter_map(|(route, destinations)| {
            most_common(destinations).map(|d| (route.to_string(), d.to_string()))
        })
        .collect();

    // Visit rows grouped by route in time order, modal destination first
    // among equal minutes, original order as the final tie-break
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| {
        let (ra, rb) = (&rows[a], &rows[b]);
        let modal_a = modal.get(ra.route()).is_some_and(|d| d == ra.destination());
        let modal_b = modal.get(rb.route()).is_some_and(|d| d == rb.destination());
        ra.route()
            .cmp(rb.route())
            .then(ra.time().minutes_since_midnight().cmp(&rb.time().minutes_since_midnight()))
            .then(modal_b.cmp(&modal_a))
            .then(a.cmp(&b))
    });

    let mut keep = vec![false; rows.len()];
    let mut current_route: Option<&str> = None;
    let mut last_kept_min = 0u32;
    for &i in &order {
        let row = &rows[i];
        let minute = row.time().minutes_since_midnight();
        let same_route = current_route == Some(row.route());
        if !same_route || minute - last_kept_min >= DEDUP_WINDOW_MINS {
            keep[i] = true;
            current_route = Some(row.route());
            last_kept_min = minute;
        }
    }

    let mut survivors: Vec<T> = rows
        .into_iter()
        .zip(keep)
        .filter_map(|(row, kept)| kept.then_some(row))
        .collect();
    survivors.sort_by_key(|row| row.time());
    survivors
}
