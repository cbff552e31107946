//! Topological invariants of binary images.
//!
//! This crate computes the Euler characteristic of a 2-D material/pore image
//! four independent ways and checks that they agree.
//!
//! # Pipeline Overview
//!
//! 1. **Preprocessing** (optional): morphological open + close
//! 2. **Labeling**: 8-connected components and the holes of each (β0, β1)
//! 3. **Cell complex**: vertex, edge and face counts of the material squares
//! 4. **Border following**: one Freeman (F8) chain per outer and hole border
//! 5. **Code transforms**: F8 → F4 → VCC → 3OT, each with a turn-balance estimate
//! 6. **Aggregation**: the [`InvariantRecord`] with pairwise consistency flags
//!
//! # Example
//!
//! ```
//! use topo_analyze::{analyze, BinaryImage};
//!
//! let square = BinaryImage::from_art(&["##", "##"])?;
//! let record = analyze(&square)?;
//! assert_eq!(record.euler_poincare, 1);
//! assert!(record.is_consistent());
//! # Ok::<(), topo_analyze::TopoError>(())
//! ```

pub mod batch;
pub mod codes;
pub mod complex;
pub mod contour;
pub mod invariants;
pub mod label;
pub mod morph;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use topo_core::{BinaryImage, Bounds, CodeKind, Result, TopoError};

pub use batch::{analyze_batch, BatchSummary};
pub use codes::F4Policy;
pub use invariants::{Consistency, EulerEstimates, InvariantRecord, DEFAULT_TOLERANCE};

/// Configuration for invariant analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeConfig {
    /// Level threshold for grayscale input in `[0, 1]`; values above it are
    /// material.
    pub threshold: f32,

    /// How diagonal Freeman moves are reduced to F4.
    pub f4_policy: F4Policy,

    /// Absolute tolerance for the pairwise consistency checks.
    pub tolerance: f64,

    /// Apply an opening then a closing before analysis.
    pub denoise: bool,

    /// Square kernel size for the denoise step.
    pub denoise_kernel: u32,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            threshold: topo_core::DEFAULT_LEVEL_THRESHOLD,
            f4_policy: F4Policy::default(),
            tolerance: DEFAULT_TOLERANCE,
            denoise: false,
            denoise_kernel: 3,
        }
    }
}

impl AnalyzeConfig {
    /// The level threshold scaled to 8-bit luma.
    pub fn luma_threshold(&self) -> u8 {
        (self.threshold.clamp(0.0, 1.0) * 255.0) as u8
    }
}

/// Analyze an image with the default configuration.
pub fn analyze(image: &BinaryImage) -> Result<InvariantRecord> {
    analyze_with_config(image, &AnalyzeConfig::default())
}

/// Analyze an image with a custom configuration.
#[tracing::instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn analyze_with_config(
    image: &BinaryImage,
    config: &AnalyzeConfig,
) -> Result<InvariantRecord> {
    let cleaned;
    let image = if config.denoise {
        cleaned = morph::denoise(image, config.denoise_kernel);
        &cleaned
    } else {
        image
    };

    if let Some(material) = image.uniform_value() {
        debug!(material, "uniform image");
    }

    let labeling = label::label_components(image);
    let cells = complex::count_cells(image);
    let census = complex::vertex_census(image);
    let chain = contour::freeman_chain_from(&labeling);
    let codes = codes::derive_codes(&chain, config.f4_policy)?;

    let record = invariants::assemble(
        labeling.betti(),
        cells,
        census,
        &chain,
        codes,
        config.tolerance,
    );

    debug!(
        beta0 = record.beta0,
        beta1 = record.beta1,
        euler_vef = record.euler_vef,
        vcc = record.vcc.x,
        ot3 = record.ot3.x,
        consistent = record.is_consistent(),
        "analyzed image"
    );

    Ok(record)
}

/// Threshold grayscale rows at `config.threshold`, then analyze.
pub fn analyze_levels<R: AsRef<[f32]>>(
    rows: &[R],
    config: &AnalyzeConfig,
) -> Result<InvariantRecord> {
    let image = BinaryImage::from_levels(rows, config.threshold)?;
    analyze_with_config(&image, config)
}

/// Decode an encoded raster (PNG), threshold its luma, then analyze.
pub fn analyze_encoded(bytes: &[u8], config: &AnalyzeConfig) -> Result<InvariantRecord> {
    let image = BinaryImage::decode(bytes, config.luma_threshold())?;
    analyze_with_config(&image, config)
}
