//! The invariant record and cross-derivation consistency checks.

use serde::{Deserialize, Serialize};

use crate::codes::CodeChain;
use crate::complex::{CellCounts, VertexCensus};
use crate::contour::FreemanChain;
use crate::label::BettiNumbers;

/// Absolute tolerance used when comparing two Euler estimates.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// The four independent Euler estimates of one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EulerEstimates {
    /// `V - E + F`.
    pub vef: f64,
    /// `β0 - β1`.
    pub betti: f64,
    /// VCC turn balance.
    pub vcc: f64,
    /// 3OT net rotation.
    pub ot3: f64,
}

/// Comparison of two estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairCheck {
    pub difference: f64,
    pub consistent: bool,
}

impl PairCheck {
    pub fn compare(a: f64, b: f64, tolerance: f64) -> Self {
        let difference = (a - b).abs();
        Self {
            difference,
            consistent: difference <= tolerance,
        }
    }
}

/// Pairwise agreement of all four estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Consistency {
    pub vef_vs_betti: PairCheck,
    pub vef_vs_vcc: PairCheck,
    pub vef_vs_3ot: PairCheck,
    pub betti_vs_vcc: PairCheck,
    pub betti_vs_3ot: PairCheck,
    pub vcc_vs_3ot: PairCheck,
    pub all_consistent: bool,
}

impl Consistency {
    pub fn check(estimates: &EulerEstimates, tolerance: f64) -> Self {
        let EulerEstimates {
            vef,
            betti,
            vcc,
            ot3,
        } = *estimates;

        let vef_vs_betti = PairCheck::compare(vef, betti, tolerance);
        let vef_vs_vcc = PairCheck::compare(vef, vcc, tolerance);
        let vef_vs_3ot = PairCheck::compare(vef, ot3, tolerance);
        let betti_vs_vcc = PairCheck::compare(betti, vcc, tolerance);
        let betti_vs_3ot = PairCheck::compare(betti, ot3, tolerance);
        let vcc_vs_3ot = PairCheck::compare(vcc, ot3, tolerance);

        let all_consistent = [
            vef_vs_betti,
            vef_vs_vcc,
            vef_vs_3ot,
            betti_vs_vcc,
            betti_vs_3ot,
            vcc_vs_3ot,
        ]
        .iter()
        .all(|p| p.consistent);

        Self {
            vef_vs_betti,
            vef_vs_vcc,
            vef_vs_3ot,
            betti_vs_vcc,
            betti_vs_3ot,
            vcc_vs_3ot,
            all_consistent,
        }
    }

    /// The six pairs with their field names.
    pub fn pairs(&self) -> [(&'static str, PairCheck); 6] {
        [
            ("vef_vs_betti", self.vef_vs_betti),
            ("vef_vs_vcc", self.vef_vs_vcc),
            ("vef_vs_3ot", self.vef_vs_3ot),
            ("betti_vs_vcc", self.betti_vs_vcc),
            ("betti_vs_3ot", self.betti_vs_3ot),
            ("vcc_vs_3ot", self.vcc_vs_3ot),
        ]
    }

    /// Names of the pairs that disagree.
    pub fn failures(&self) -> Vec<&'static str> {
        self.pairs()
            .into_iter()
            .filter(|(_, p)| !p.consistent)
            .map(|(name, _)| name)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VccSummary {
    /// Left turns (`1`).
    #[serde(rename = "N1")]
    pub n1: usize,
    /// Right turns (`3`). Reversals are not included.
    #[serde(rename = "N3")]
    pub n3: usize,
    /// Reversals (`2`).
    pub reversals: usize,
    /// `(N1 - N3) / 4`.
    pub x: f64,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ot3Summary {
    /// Count of `H` symbols.
    #[serde(rename = "N2h")]
    pub n2h: usize,
    /// Count of `V` symbols.
    #[serde(rename = "N2v")]
    pub n2v: usize,
    /// Count of `D` symbols.
    #[serde(rename = "N2d")]
    pub n2d: usize,
    /// Net rotation read back from the 3OT string, `(advances - retreats) / 4`
    /// with transitions measured from `H`. This is not `(N2h - N2v) / 4`,
    /// which depends on code length.
    #[serde(rename = "X")]
    pub x: f64,
    pub code: String,
}

/// The chain codes the VCC and 3OT estimates were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSummary {
    pub f8: String,
    pub f4: String,
    /// Borders that produced a code.
    pub contours: usize,
    /// Borders too short to encode.
    pub skipped_contours: usize,
    /// Borders enclosing no area.
    pub flat_contours: usize,
}

/// Every invariant derived from one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvariantRecord {
    pub beta0: usize,
    pub beta1: usize,
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
    pub euler_vef: i64,
    pub euler_poincare: i64,
    pub vcc: VccSummary,
    pub ot3: Ot3Summary,
    pub consistency: Consistency,
    pub census: VertexCensus,
    pub chain: ChainSummary,
}

impl InvariantRecord {
    pub fn estimates(&self) -> EulerEstimates {
        EulerEstimates {
            vef: self.euler_vef as f64,
            betti: self.euler_poincare as f64,
            vcc: self.vcc.x,
            ot3: self.ot3.x,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.consistency.all_consistent
    }

    pub fn cells(&self) -> CellCounts {
        CellCounts {
            vertices: self.vertices,
            edges: self.edges,
            faces: self.faces,
        }
    }
}

/// Assemble a record from the individual derivations.
pub fn assemble(
    betti: BettiNumbers,
    cells: CellCounts,
    census: VertexCensus,
    chain: &FreemanChain,
    codes: CodeChain,
    tolerance: f64,
) -> InvariantRecord {
    let estimates = EulerEstimates {
        vef: cells.euler() as f64,
        betti: betti.euler() as f64,
        vcc: codes.vcc.euler(),
        ot3: codes.ot3.euler(),
    };
    let consistency = Consistency::check(&estimates, tolerance);

    InvariantRecord {
        beta0: betti.beta0,
        beta1: betti.beta1,
        vertices: cells.vertices,
        edges: cells.edges,
        faces: cells.faces,
        euler_vef: cells.euler(),
        euler_poincare: betti.euler(),
        vcc: VccSummary {
            n1: codes.vcc.n1,
            n3: codes.vcc.n3,
            reversals: codes.vcc.reversals,
            x: estimates.vcc,
            code: codes.vcc.code,
        },
        ot3: Ot3Summary {
            n2h: codes.ot3.n2h,
            n2v: codes.ot3.n2v,
            n2d: codes.ot3.n2d,
            x: estimates.ot3,
            code: codes.ot3.code,
        },
        consistency,
        census,
        chain: ChainSummary {
            f8: codes.f8,
            f4: codes.f4,
            contours: chain.codes.len(),
            skipped_contours: chain.skipped,
            flat_contours: chain.flat,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimates(vef: f64, betti: f64, vcc: f64, ot3: f64) -> EulerEstimates {
        EulerEstimates {
            vef,
            betti,
            vcc,
            ot3,
        }
    }

    #[test]
    fn test_pair_check_tolerance() {
        assert!(PairCheck::compare(1.0, 1.0 + 1e-12, DEFAULT_TOLERANCE).consistent);
        assert!(!PairCheck::compare(1.0, 1.25, DEFAULT_TOLERANCE).consistent);
        assert_eq!(PairCheck::compare(-1.0, 2.0, 0.0).difference, 3.0);
    }

    #[test]
    fn test_all_agree() {
        let c = Consistency::check(&estimates(1.0, 1.0, 1.0, 1.0), DEFAULT_TOLERANCE);
        assert!(c.all_consistent);
        assert!(c.failures().is_empty());
    }

    #[test]
    fn test_one_outlier_breaks_three_pairs() {
        let c = Consistency::check(&estimates(0.0, 1.0, 0.0, 0.0), DEFAULT_TOLERANCE);
        assert!(!c.all_consistent);
        assert_eq!(
            c.failures(),
            vec!["vef_vs_betti", "betti_vs_vcc", "betti_vs_3ot"]
        );
        assert_eq!(c.betti_vs_vcc.difference, 1.0);
    }

    #[test]
    fn test_assemble_record() {
        let betti = BettiNumbers { beta0: 1, beta1: 0 };
        let cells = CellCounts {
            vertices: 9,
            edges: 12,
            faces: 4,
        };
        let chain = FreemanChain {
            codes: vec!["6024".to_string()],
            ..Default::default()
        };
        let codes = crate::codes::derive_codes(&chain, Default::default()).unwrap();

        let record = assemble(
            betti,
            cells,
            VertexCensus::default(),
            &chain,
            codes,
            DEFAULT_TOLERANCE,
        );
        assert_eq!(record.euler_vef, 1);
        assert_eq!(record.euler_poincare, 1);
        assert_eq!(record.vcc.code, "1111");
        assert_eq!(record.ot3.code, "VDHV");
        assert_eq!(record.chain.contours, 1);
        assert_eq!(record.cells(), cells);
        assert!(record.is_consistent());
        assert_eq!(record.estimates(), estimates(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn test_ot3_x_is_net_rotation_not_class_balance() {
        let chain = FreemanChain {
            codes: vec!["6024".to_string()],
            ..Default::default()
        };
        let codes = crate::codes::derive_codes(&chain, Default::default()).unwrap();
        let record = assemble(
            BettiNumbers { beta0: 1, beta1: 0 },
            CellCounts::default(),
            VertexCensus::default(),
            &chain,
            codes,
            DEFAULT_TOLERANCE,
        );

        let ot3 = &record.ot3;
        assert_eq!((ot3.n2h, ot3.n2v, ot3.n2d), (1, 2, 1));
        let class_balance = (ot3.n2h as f64 - ot3.n2v as f64) / 4.0;
        assert_eq!(class_balance, -0.25);
        assert_eq!(ot3.x, 1.0);

        let vcc = &record.vcc;
        assert_eq!((vcc.n1, vcc.n3, vcc.reversals), (4, 0, 0));
        assert_eq!(vcc.x, 1.0);
    }
}
