use thiserror::Error;

/// Error returned when a simulation component is built from invalid parameters.
///
/// Every variant is raised at construction time. Once a [`Simulation`](crate::Simulation)
/// exists, requests never fail: a request that cannot be routed or served is
/// recorded as a miss instead.
///
/// # Examples
///
/// ```
/// use edgesim_core::{ConfigError, EvictionPolicy};
///
/// let err = EvictionPolicy::LRU.build(0).err().unwrap();
/// assert_eq!(err, ConfigError::ZeroCapacity);
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("cache capacity must be greater than zero")]
    ZeroCapacity,

    #[error("a router needs at least one node")]
    EmptyNodeList,

    #[error("unknown eviction policy `{0}`")]
    UnknownPolicy(String),

    #[error("unknown scheduler `{0}`")]
    UnknownScheduler(String),

    #[error("initial threshold {0} is outside [50, 1000]")]
    InvalidThreshold(f64),

    #[error("adjustment factor {0} is outside [0, 1)")]
    InvalidAdjustmentFactor(f64),
}
