use std::sync::atomic::{AtomicU64, Ordering};

/// Run-level request counters.
///
/// Tracks how each resolved request ended using atomic operations, so
/// parallel runs can record outcomes without additional synchronization.
///
/// # Thread Safety
///
/// All operations use `Relaxed` ordering: the counters are independent tallies
/// and are only read as a whole once the run is over.
///
/// # Examples
///
/// ```
/// use edgesim_core::RunStats;
///
/// let stats = RunStats::new();
/// stats.record_local_hit();
/// stats.record_origin_hit();
/// stats.record_miss();
///
/// assert_eq!(stats.total_requests(), 3);
/// assert_eq!(stats.hits(), 1);
/// assert!((stats.hit_rate() - 0.3333).abs() < 0.001);
/// ```
#[derive(Debug)]
pub struct RunStats {
    hits: AtomicU64,
    origin_hits: AtomicU64,
    misses: AtomicU64,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            origin_hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Records a request answered from the routed node's own store.
    #[inline]
    pub fn record_local_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a request the routed node had to fetch from the origin.
    #[inline]
    pub fn record_origin_hit(&self) {
        self.origin_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a request that was not routed or not found anywhere.
    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Local hits.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn origin_hits(&self) -> u64 {
        self.origin_hits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_requests(&self) -> u64 {
        self.hits() + self.origin_hits() + self.misses()
    }

    /// Fraction of requests served locally (0.0 to 1.0). 0.0 with no requests.
    #[inline]
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.origin_hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RunStats {
    fn clone(&self) -> Self {
        Self {
            hits: AtomicU64::new(self.hits()),
            origin_hits: AtomicU64::new(self.origin_hits()),
            misses: AtomicU64::new(self.misses()),
        }
    }
}

/// Mean and population standard deviation of a latency sequence.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct LatencySummary {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl LatencySummary {
    /// Summarizes `samples`.
    ///
    /// The mean of an empty sequence is 0.0, and the standard deviation is 0.0
    /// for fewer than two samples.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgesim_core::LatencySummary;
    ///
    /// let summary = LatencySummary::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
    /// assert_eq!(summary.mean, 5.0);
    /// assert_eq!(summary.std_dev, 2.0);
    /// ```
    pub fn from_samples(samples: &[f64]) -> Self {
        let count = samples.len();
        let total: f64 = samples.iter().sum();
        if count == 0 {
            return Self::default();
        }
        let mean = total / count as f64;
        let std_dev = if count > 1 {
            let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;
            variance.sqrt()
        } else {
            0.0
        };
        Self {
            count,
            total,
            mean,
            std_dev,
        }
    }
}

/// Per-node view after a run.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeReport {
    pub id: usize,
    /// Requests the router sent to this node.
    pub routed: u64,
    /// Requests satisfied through this node (local hits plus admitted fetches).
    pub request_count: u64,
    pub local_hits: u64,
    pub cached: usize,
}

impl NodeReport {
    /// Local hits over routed requests; 0.0 when nothing was routed here.
    pub fn hit_rate(&self) -> f64 {
        if self.routed == 0 {
            0.0
        } else {
            self.local_hits as f64 / self.routed as f64
        }
    }
}

/// Totals and latency statistics for a whole run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub total_requests: u64,
    pub total_hits: u64,
    pub origin_hits: u64,
    pub total_misses: u64,
    pub hit_rate: f64,
    pub latency: LatencySummary,
}
