//! # Edgesim
//!
//! A simulator for edge-cache hierarchies: users request items from edge nodes,
//! edge nodes keep a bounded cache governed by an eviction policy and fall back
//! to an origin that holds the full catalog.
//!
//! ## Features
//!
//! - **Pluggable eviction**: FIFO, LRU, LFU, ARC and Random replacement, plus
//!   an unbounded catalog and a cache that never stores anything
//! - **Adaptive routing**: a distance band around the nearest node that widens
//!   under load imbalance and narrows otherwise; nearest-node and round-robin
//!   routers for comparison
//! - **Accounting**: per-request outcome and latency, per-node hit counts,
//!   latency mean and standard deviation
//! - **Thread-safe**: nodes and the resolver can be driven from many threads
//!
//! ## Quick Start
//!
//! ```rust
//! use edgesim::{popular_keys, Position, Request, Simulation, SimulationConfig};
//!
//! let catalog = ["intro.mp4", "song.mp3", "paper.pdf", "logo.png"];
//! let requests: Vec<Request> = ["song.mp3", "intro.mp4", "song.mp3", "logo.png"]
//!     .iter()
//!     .map(|key| Request::new("alice", *key, Position::new(1200.0, 800.0)))
//!     .collect();
//!
//! let warm = popular_keys(requests.iter().map(|r| r.key.as_str()), 1);
//! assert_eq!(warm, vec!["song.mp3"]);
//!
//! let config = SimulationConfig {
//!     capacity: 2,
//!     policy: "lfu".parse().unwrap(),
//!     ..Default::default()
//! };
//! let sim = Simulation::build(
//!     &config,
//!     catalog,
//!     &[Position::new(1000.0, 1000.0), Position::new(4000.0, 0.0)],
//!     &warm,
//! )
//! .unwrap();
//!
//! let summary = sim.run(requests);
//! assert_eq!(summary.total_requests, 4);
//! assert_eq!(summary.total_misses, 0);
//! ```
//!
//! ## Choosing a Policy
//!
//! Policy names are parsed case-insensitively:
//!
//! ```rust
//! use edgesim::EvictionPolicy;
//!
//! assert_eq!("ARC".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::ARC);
//! assert_eq!("rr".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Random);
//! assert!("mru".parse::<EvictionPolicy>().is_err());
//! ```
//!
//! ## Latency
//!
//! Each hop costs `2 * (floor(d / 1000) + (d mod 1000) / 1000)`, i.e. two units
//! per thousand distance units:
//!
//! ```rust
//! use edgesim::latency_for_distance;
//!
//! assert_eq!(latency_for_distance(1500.0), 3.0);
//! ```

pub use edgesim_core::*;
