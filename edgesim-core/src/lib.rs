//! # Edgesim Core
//!
//! Building blocks for simulating a two-tier content-delivery hierarchy: edge
//! nodes with bounded caches in front of an origin that holds the full catalog.
//!
//! ## Features
//!
//! - **Eviction Policies**: FIFO, LRU, LFU, ARC, Random, plus an unbounded
//!   catalog and a null cache, all behind one [`policy::CachePolicy`] trait
//! - **Nodes**: edge/origin nodes with connection accounting, safe to share
//!   across threads
//! - **Routers**: distance-adaptive, nearest-node and round-robin schedulers
//! - **Resolution**: per-request outcome and latency accounting, sequential or
//!   parallel runs
//!
//! ## Module Organization
//!
//! - [`policy`] - replacement policies and the `CachePolicy` trait
//! - [`eviction_policy`] - policy selector and name parsing
//! - [`cache_store`] - policy wrapper enforcing the capacity bound
//! - [`node`] - edge/origin nodes
//! - [`router`] - request schedulers
//! - [`resolver`] - request resolution, latency and run statistics
//! - [`config`] - simulation configuration and harness
//!
//! ## Example
//!
//! ```
//! use edgesim_core::{Outcome, Position, Simulation, SimulationConfig};
//!
//! let sim = Simulation::build(
//!     &SimulationConfig { capacity: 2, ..Default::default() },
//!     ["A", "B", "C"],
//!     &[Position::new(1000.0, 0.0)],
//!     Vec::<&str>::new(),
//! )
//! .unwrap();
//!
//! let user = Position::new(1000.0, 0.0);
//! assert_eq!(sim.resolve("u1", "A", user).outcome, Outcome::HitOrigin);
//! assert_eq!(sim.resolve("u1", "A", user).outcome, Outcome::HitLocal);
//! ```

pub mod cache_store;
pub mod config;
mod error;
pub mod eviction_policy;
pub mod node;
pub mod policy;
mod position;
pub mod resolver;
pub mod router;
mod stats;
pub mod utils;
mod workload;

pub use cache_store::CacheStore;
pub use config::{Simulation, SimulationConfig, ORIGIN_ID};
pub use error::ConfigError;
pub use eviction_policy::EvictionPolicy;
pub use node::{ConnectionGuard, Lookup, Node};
pub use position::{latency_for_distance, Position};
pub use resolver::{Outcome, Request, RequestRecord, Resolver};
pub use stats::{LatencySummary, NodeReport, RunStats, RunSummary};
pub use workload::{popular_keys, popular_request_keys};
