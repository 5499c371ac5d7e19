//! Snapshot assembly from the `/proc` filesystem.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        Collector                           │
//! │  ┌─────────────────────┐   ┌────────────────────────────┐  │
//! │  │  ProcessCollector   │   │      SystemCollector       │  │
//! │  │  - /proc/[pid]/*    │   │  - /proc/meminfo           │  │
//! │  │  - NameFilter       │   │  - /proc/stat              │  │
//! │  │  - task/[tid]/*     │   │  - /proc/cpuinfo           │  │
//! │  └──────────┬──────────┘   └──────────────┬─────────────┘  │
//! │             └──────────────┬──────────────┘                │
//! │                     ┌──────▼──────┐                        │
//! │                     │  FileSystem │ (trait)                │
//! │                     └──────┬──────┘                        │
//! └────────────────────────────┼───────────────────────────────┘
//!                       ┌──────┴──────┐
//!                ┌──────▼──────┐ ┌────▼────────┐
//!                │   RealFs    │ │   MockFs    │
//!                │ (live /proc)│ │ (testing)   │
//!                └─────────────┘ └─────────────┘
//! ```
//!
//! Every source is best-effort: a process that vanished between enumeration
//! and reading, a malformed record, or an unreadable file causes that entity
//! to be skipped, never the tick to fail.

#[allow(clippy::module_inception)]
mod collector;
pub mod filter;
pub mod mock;
pub mod procfs;
pub mod traits;

pub use collector::Collector;
pub use filter::NameFilter;
pub use mock::MockFs;
pub use procfs::{CollectError, ParseError};
pub use traits::{FileSystem, RealFs};
