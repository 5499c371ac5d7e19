//! sysplot-core — sampling, encoding, scheduling, and delivery primitives
//! for the sysplot agent.
//!
//! Provides:
//! - `model` — immutable per-tick snapshot values
//! - `collector` — procfs record parsers and the snapshot assembler
//! - `wire` — the textual wire document and its encoder
//! - `schedule` — the fixed-cadence tick scheduler
//! - `transport` — the outbound collector connection
//!
//! The daemon in `sysplotd` wires these together: a scheduler tick collects
//! a snapshot, encodes it, and sends it; any transport failure tears the
//! cycle down and the daemon retries with fresh instances.

pub mod collector;
pub mod model;
pub mod schedule;
pub mod transport;
pub mod wire;
