//! Data-quality and route-consistency analyses over a stop dataset.
//!
//! Every analysis is a pure function over the same immutable record slice:
//! field validation and its per-field aggregation, stop counts per route,
//! the start/finish structural gate with stop-role classification, the
//! arrival time ordering check and the on-demand stop check.

pub mod aggregate;
pub mod arrival;
pub mod on_demand;
pub mod routes;
pub mod structure;
pub mod validator;
