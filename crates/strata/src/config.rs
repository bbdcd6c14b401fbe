//! Process-wide engine configuration: worker count, morsel size, the
//! per-operation parallelisation thresholds, and the SIMD level.
//!
//! The configuration is an explicit value with a lazily initialised
//! process-wide default sourced from hardware detection. Call
//! `EngineConfig::init` once at process start to override the default;
//! after the first read the configuration is fixed for the process.

// dependencies
use std::sync::OnceLock;
use serde::{Deserialize, Serialize};
use crate::error::{Result, StrataError};

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/* -----------------------------------------------------------------------------
SIMD level
----------------------------------------------------------------------------- */
/// The vector instruction tier the kernels may assume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimdLevel {
    Scalar,
    Sse4,
    Avx2,
    Avx512,
}

impl SimdLevel {
    /// Detect the widest level the running CPU supports.
    pub fn detect() -> SimdLevel {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("avx512f") {
                return SimdLevel::Avx512;
            }
            if is_x86_feature_detected!("avx2") {
                return SimdLevel::Avx2;
            }
            if is_x86_feature_detected!("sse4.1") {
                return SimdLevel::Sse4;
            }
        }
        SimdLevel::Scalar
    }
}

/* -----------------------------------------------------------------------------
per-operation parallelisation thresholds
----------------------------------------------------------------------------- */
/// Minimum row counts above which each operation tag runs parallel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelThresholds {
    pub reduce:      usize,
    pub elementwise: usize,
    pub filter:      usize,
    pub sort:        usize,
    pub join_build:  usize,
    pub join_probe:  usize,
    pub group_by:    usize,
}

impl Default for ParallelThresholds {
    fn default() -> Self {
        Self {
            reduce:      1 << 18,
            elementwise: 1 << 18,
            filter:      1 << 17,
            sort:        1 << 16,
            join_build:  1 << 16,
            join_probe:  1 << 16,
            group_by:    1 << 17,
        }
    }
}

/* -----------------------------------------------------------------------------
EngineConfig
----------------------------------------------------------------------------- */
/// The engine's tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Worker pool size; defaults to the machine's hardware parallelism.
    pub worker_count:          usize,
    /// Rows per morsel of parallel work.
    pub morsel_size:           usize,
    /// Per-operation minimum rows for the parallel path.
    pub min_rows_for_parallel: ParallelThresholds,
    /// Vector instruction tier; defaults to runtime detection.
    pub simd_level:            SimdLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::detect()
    }
}

impl EngineConfig {
    /// Build the default configuration from hardware detection.
    pub fn detect() -> Self {
        let worker_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = Self {
            worker_count,
            morsel_size: 64 * 1024,
            min_rows_for_parallel: ParallelThresholds::default(),
            simd_level: SimdLevel::detect(),
        };
        log::debug!(
            "engine config detected: {} workers, morsel {} rows, simd {:?}",
            config.worker_count, config.morsel_size, config.simd_level
        );
        config
    }

    /// The process-wide configuration, detecting defaults on first use.
    pub fn get() -> &'static EngineConfig {
        CONFIG.get_or_init(EngineConfig::detect)
    }

    /// Install `config` as the process-wide configuration. Returns false if
    /// the configuration was already initialised (explicitly or by first
    /// use), in which case the earlier value stays in force.
    pub fn init(config: EngineConfig) -> bool {
        CONFIG.set(config).is_ok()
    }

    /// Serialise for embedding hosts that persist tuning.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| StrataError::Parse(format!("cannot serialise config: {e}")))
    }
    /// The inverse of `to_json`.
    pub fn from_json(json: &str) -> Result<EngineConfig> {
        serde_json::from_str(json)
            .map_err(|e| StrataError::Parse(format!("cannot parse config: {e}")))
    }
}
