//! File size estimation
//!
//! A rough figure for progress bars and "this will be large" prompts. It
//! counts components, simulations and stored data values and multiplies by
//! typical encoded sizes. It never fails and is never a commitment: actual
//! sizes routinely differ by a factor of two or more, especially with
//! compression.

use crate::config::StorageOptions;
use crate::document::{Document, FlightDataBranch};

use super::header::{HEADER_LEN, TRAILER_LEN};

const BASE_BYTES: u64 = 256;
const BYTES_PER_COMPONENT: u64 = 320;
const BYTES_PER_SIMULATION: u64 = 480;
const BYTES_PER_EXTENSION: u64 = 96;
const BYTES_PER_DATA_VALUE: u64 = 18;
const BYTES_PER_EVENT: u64 = 40;
/// Typical gzip ratio on the JSON body.
const COMPRESSION_DIVISOR: u64 = 5;

/// Approximate encoded size in bytes; always greater than zero.
pub fn estimate_file_size(document: &Document, options: &StorageOptions) -> u64 {
    let mut body = BASE_BYTES;

    let components = document.rocket.component_count() as u64;
    body = body.saturating_add(components.saturating_mul(BYTES_PER_COMPONENT));

    for simulation in &document.simulations {
        body = body.saturating_add(BYTES_PER_SIMULATION);
        for script in simulation.scripts() {
            body = body.saturating_add(script.script_body.len() as u64);
        }
        body = body
            .saturating_add((simulation.extensions.len() as u64).saturating_mul(BYTES_PER_EXTENSION));

        if !options.stores_simulation_data() {
            continue;
        }
        if let Some(data) = &simulation.data {
            for branch in &data.branches {
                body = body.saturating_add(estimate_branch(branch, options.simulation_time_skip));
            }
        }
    }

    if options.compression_enabled {
        body = (body / COMPRESSION_DIVISOR).max(1);
    }

    body.saturating_add((HEADER_LEN + TRAILER_LEN) as u64)
}

fn estimate_branch(branch: &FlightDataBranch, time_skip: f64) -> u64 {
    let rows = estimated_rows(branch, time_skip);
    let columns = branch.columns.len().max(1) as u64;
    let events = branch.events.len() as u64;
    rows.saturating_mul(columns)
        .saturating_mul(BYTES_PER_DATA_VALUE)
        .saturating_add(events.saturating_mul(BYTES_PER_EVENT))
}

/// Rows expected to survive thinning, without actually thinning.
fn estimated_rows(branch: &FlightDataBranch, time_skip: f64) -> u64 {
    let total = branch.rows.len() as u64;
    if time_skip <= 0.0 || total <= 2 {
        return total;
    }

    let time = |row: Option<&Vec<f64>>| row.and_then(|r| r.first().copied());
    let span = match (time(branch.rows.first()), time(branch.rows.last())) {
        (Some(first), Some(last)) if (last - first).is_finite() => (last - first).max(0.0),
        _ => return total,
    };

    let spaced = (span / time_skip).ceil() as u64;
    spaced
        .saturating_add(branch.events.len() as u64)
        .saturating_add(2)
        .min(total)
}
