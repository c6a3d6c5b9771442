//! Gated operations, one module per application area.
//!
//! Every operation follows the same shape: evaluate its gate, validate the
//! payload structurally, make one backend call, reshape the rows. The gate
//! runs before any backend effect; a denial aborts with nothing performed.

pub mod counts;
pub mod daily_reports;
pub mod deliveries;
pub mod materials;
pub mod metrics;
pub mod team;
