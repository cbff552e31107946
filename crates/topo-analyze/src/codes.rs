//! Chain-code transforms: F8 → F4 → VCC → 3OT.
//!
//! - **F8**: Freeman 8-direction code, digits `0..=7`.
//! - **F4**: the even (axis-aligned) subset `0, 2, 4, 6` of F8.
//! - **VCC**: vertex chain code, one symbol per consecutive F4 pair:
//!   `0` straight, `1` left turn, `3` right turn, `2` reversal.
//! - **3OT**: three-orthogonal code, the state of a three-state machine
//!   (`H`, `V`, `D`) driven by the VCC turns.
//!
//! Every code type can estimate the Euler number of the traced image from
//! its turn balance: a closed border turns four quarter turns in total,
//! positive for outer borders and negative for holes.

use serde::{Deserialize, Serialize};
use topo_core::{CodeKind, Result, TopoError};

use crate::contour::FreemanChain;

/// How diagonal F8 moves are handled when reducing to F4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum F4Policy {
    /// Replace each diagonal `d` with the axis direction `d - 1`.
    Approximate,
    /// Drop diagonal moves.
    #[default]
    Filter,
}

/// Parse one digit of a code, checking it against the alphabet's range.
fn digit(symbol: char, max: u8, kind: CodeKind, position: usize) -> Result<u8> {
    symbol
        .to_digit(10)
        .map(|d| d as u8)
        .filter(|&d| d <= max)
        .ok_or(TopoError::InvalidCodeSymbol {
            kind,
            symbol,
            position,
        })
}

/// Reduce an F8 code to F4.
pub fn f8_to_f4(f8: &str, policy: F4Policy) -> Result<String> {
    let mut out = String::with_capacity(f8.len());

    for (position, symbol) in f8.chars().enumerate() {
        let value = digit(symbol, 7, CodeKind::F8, position)?;
        match (value % 2, policy) {
            (0, _) => out.push(symbol),
            (_, F4Policy::Approximate) => out.push(char::from(b'0' + value - 1)),
            (_, F4Policy::Filter) => {}
        }
    }

    Ok(out)
}

/// A VCC string together with its turn counts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VccCode {
    pub code: String,
    /// Left turns (`1`).
    pub n1: usize,
    /// Right turns (`3`).
    pub n3: usize,
    /// Reversals (`2`).
    pub reversals: usize,
    /// Straight moves (`0`).
    pub straight: usize,
}

impl VccCode {
    /// Turn-balance Euler estimate `(N1 - N3) / 4`.
    pub fn euler(&self) -> f64 {
        (self.n1 as f64 - self.n3 as f64) / 4.0
    }

    /// Concatenated 8-bit binary renderings of N1 and N3.
    pub fn signature(&self) -> String {
        format!("{:08b}{:08b}", self.n1, self.n3)
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Append another code, summing the counts.
    pub fn extend(&mut self, other: &VccCode) {
        self.code.push_str(&other.code);
        self.n1 += other.n1;
        self.n3 += other.n3;
        self.reversals += other.reversals;
        self.straight += other.straight;
    }

    fn push(&mut self, symbol: char) {
        match symbol {
            '0' => self.straight += 1,
            '1' => self.n1 += 1,
            '3' => self.n3 += 1,
            _ => self.reversals += 1,
        }
        self.code.push(symbol);
    }
}

/// VCC symbol for the turn between two consecutive F4 directions.
fn turn_symbol(previous: u8, current: u8) -> char {
    match (current + 8 - previous) % 8 {
        0 => '0',
        2 => '1',
        6 => '3',
        _ => '2',
    }
}

fn parse_f4(f4: &str) -> Result<Vec<u8>> {
    f4.chars()
        .enumerate()
        .map(|(position, symbol)| {
            digit(symbol, 6, CodeKind::F4, position).and_then(|d| {
                if d % 2 == 0 {
                    Ok(d)
                } else {
                    Err(TopoError::InvalidCodeSymbol {
                        kind: CodeKind::F4,
                        symbol,
                        position,
                    })
                }
            })
        })
        .collect()
}

/// Convert an open F4 code to VCC: one symbol per consecutive pair.
///
/// Codes shorter than two symbols yield an empty VCC.
pub fn f4_to_vcc(f4: &str) -> Result<VccCode> {
    let directions = parse_f4(f4)?;
    let mut vcc = VccCode::default();
    for pair in directions.windows(2) {
        vcc.push(turn_symbol(pair[0], pair[1]));
    }
    Ok(vcc)
}

/// Convert the F4 code of a closed border to VCC, including the turn from the
/// last move back into the first.
pub fn closed_f4_to_vcc(f4: &str) -> Result<VccCode> {
    match f4.chars().next() {
        None => Ok(VccCode::default()),
        Some(first) => {
            let mut closed = String::with_capacity(f4.len() + 1);
            closed.push_str(f4);
            closed.push(first);
            f4_to_vcc(&closed)
        }
    }
}

/// State of the 3OT machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ot3State {
    H,
    V,
    D,
}

impl Ot3State {
    /// Next state in the cycle H → V → D → H.
    pub fn advance(self) -> Self {
        match self {
            Self::H => Self::V,
            Self::V => Self::D,
            Self::D => Self::H,
        }
    }

    /// Previous state in the cycle.
    pub fn retreat(self) -> Self {
        match self {
            Self::H => Self::D,
            Self::V => Self::H,
            Self::D => Self::V,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::H => 'H',
            Self::V => 'V',
            Self::D => 'D',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'H' => Some(Self::H),
            'V' => Some(Self::V),
            'D' => Some(Self::D),
            _ => None,
        }
    }
}

/// A 3OT string with its class and transition counts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ot3Code {
    pub code: String,
    pub n2h: usize,
    pub n2v: usize,
    pub n2d: usize,
    /// Forward steps H → V → D → H between consecutive states.
    pub advances: usize,
    /// Backward steps between consecutive states.
    pub retreats: usize,
}

impl Ot3Code {
    /// Euler estimate from the machine's net rotation.
    ///
    /// Every left turn advances the machine and every right turn retreats
    /// it, so `(advances - retreats) / 4` equals the VCC estimate.
    pub fn euler(&self) -> f64 {
        (self.advances as f64 - self.retreats as f64) / 4.0
    }

    /// Concatenated 8-bit binary renderings of N2h, N2v and N2d.
    pub fn signature(&self) -> String {
        format!("{:08b}{:08b}{:08b}", self.n2h, self.n2v, self.n2d)
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

/// Run the 3OT machine over a VCC string.
///
/// The machine starts in `H`: `1` advances, `3` retreats, `0` and `2` hold.
/// One state symbol is emitted per VCC symbol.
pub fn vcc_to_3ot(vcc: &str) -> Result<Ot3Code> {
    let mut state = Ot3State::H;
    let mut code = String::with_capacity(vcc.len());

    for (position, symbol) in vcc.chars().enumerate() {
        state = match symbol {
            '0' | '2' => state,
            '1' => state.advance(),
            '3' => state.retreat(),
            _ => {
                return Err(TopoError::InvalidCodeSymbol {
                    kind: CodeKind::Vcc,
                    symbol,
                    position,
                })
            }
        };
        code.push(state.symbol());
    }

    read_3ot(&code)
}

/// Count the classes and transitions of a 3OT string.
///
/// Transitions are measured from the machine's initial `H` state, so the
/// counts depend only on the string itself.
pub fn read_3ot(code: &str) -> Result<Ot3Code> {
    let mut out = Ot3Code {
        code: code.to_string(),
        ..Default::default()
    };
    let mut previous = Ot3State::H;

    for (position, symbol) in code.chars().enumerate() {
        let state = Ot3State::from_symbol(symbol).ok_or(TopoError::InvalidCodeSymbol {
            kind: CodeKind::Ot3,
            symbol,
            position,
        })?;

        match state {
            Ot3State::H => out.n2h += 1,
            Ot3State::V => out.n2v += 1,
            Ot3State::D => out.n2d += 1,
        }

        if state == previous.advance() {
            out.advances += 1;
        } else if state == previous.retreat() {
            out.retreats += 1;
        }
        previous = state;
    }

    Ok(out)
}

/// Bring two codes to a common length by cyclic repetition or truncation.
///
/// The target defaults to the longer of the two lengths. An empty code has
/// nothing to repeat and stays empty.
pub fn normalize_code_lengths(a: &str, b: &str, target: Option<usize>) -> (String, String) {
    let target = target.unwrap_or_else(|| a.chars().count().max(b.chars().count()));
    let fit = |code: &str| code.chars().cycle().take(target).collect::<String>();
    (fit(a), fit(b))
}

/// Every derived code of an image.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodeChain {
    pub f8: String,
    pub f4: String,
    pub vcc: VccCode,
    pub ot3: Ot3Code,
}

/// Derive F4, VCC and 3OT from a Freeman chain.
///
/// Each border is reduced and closed on its own, so no turn is ever counted
/// across two different borders. The 3OT machine then runs once over the
/// concatenated VCC.
pub fn derive_codes(chain: &FreemanChain, policy: F4Policy) -> Result<CodeChain> {
    let mut f4 = String::new();
    let mut vcc = VccCode::default();

    for border in &chain.codes {
        let border_f4 = f8_to_f4(border, policy)?;
        vcc.extend(&closed_f4_to_vcc(&border_f4)?);
        f4.push_str(&border_f4);
    }

    let ot3 = vcc_to_3ot(&vcc.code)?;

    Ok(CodeChain {
        f8: chain.code(),
        f4,
        vcc,
        ot3,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(codes: &[&str]) -> FreemanChain {
        FreemanChain {
            codes: codes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_f8_to_f4_policies() {
        assert_eq!(f8_to_f4("01234567", F4Policy::Filter).unwrap(), "0246");
        assert_eq!(f8_to_f4("01234567", F4Policy::Approximate).unwrap(), "00224466");
        assert_eq!(f8_to_f4("", F4Policy::Filter).unwrap(), "");
    }

    #[test]
    fn test_f8_rejects_bad_symbols() {
        assert_eq!(
            f8_to_f4("018", F4Policy::Filter),
            Err(TopoError::InvalidCodeSymbol {
                kind: CodeKind::F8,
                symbol: '8',
                position: 2
            })
        );
        assert!(f8_to_f4("0a", F4Policy::Approximate).is_err());
    }

    #[test]
    fn test_f4_to_vcc_turns() {
        let left = f4_to_vcc("0246").unwrap();
        assert_eq!(left.code, "111");
        assert_eq!(left.n1, 3);

        let right = f4_to_vcc("0642").unwrap();
        assert_eq!(right.code, "333");
        assert_eq!(right.n3, 3);

        let mixed = f4_to_vcc("0042").unwrap();
        assert_eq!(mixed.code, "023");
        assert_eq!((mixed.straight, mixed.reversals, mixed.n3), (1, 1, 1));
    }

    #[test]
    fn test_f4_to_vcc_short_and_invalid() {
        assert!(f4_to_vcc("").unwrap().is_empty());
        assert!(f4_to_vcc("6").unwrap().is_empty());
        assert_eq!(
            f4_to_vcc("03"),
            Err(TopoError::InvalidCodeSymbol {
                kind: CodeKind::F4,
                symbol: '3',
                position: 1
            })
        );
        assert!(f4_to_vcc("08").is_err());
    }

    #[test]
    fn test_closed_square_turns_once_around() {
        let vcc = closed_f4_to_vcc("6024").unwrap();
        assert_eq!(vcc.code, "1111");
        assert_eq!(vcc.euler(), 1.0);
        assert!(closed_f4_to_vcc("").unwrap().is_empty());
    }

    #[test]
    fn test_vcc_to_3ot_cycles() {
        let forward = vcc_to_3ot("1111").unwrap();
        assert_eq!(forward.code, "VDHV");
        assert_eq!((forward.n2h, forward.n2v, forward.n2d), (1, 2, 1));
        assert_eq!(forward.advances, 4);
        assert_eq!(forward.euler(), 1.0);

        let backward = vcc_to_3ot("3333").unwrap();
        assert_eq!(backward.code, "DVHD");
        assert_eq!(backward.retreats, 4);
        assert_eq!(backward.euler(), -1.0);
    }

    #[test]
    fn test_vcc_to_3ot_holds_on_straight_and_reversal() {
        let ot3 = vcc_to_3ot("0120").unwrap();
        assert_eq!(ot3.code, "HVVV");
        assert_eq!((ot3.advances, ot3.retreats), (1, 0));
        assert!(vcc_to_3ot("").unwrap().is_empty());
    }

    #[test]
    fn test_vcc_to_3ot_rejects_bad_symbols() {
        assert_eq!(
            vcc_to_3ot("014"),
            Err(TopoError::InvalidCodeSymbol {
                kind: CodeKind::Vcc,
                symbol: '4',
                position: 2
            })
        );
    }

    #[test]
    fn test_read_3ot_matches_machine() {
        let ot3 = vcc_to_3ot("110301331").unwrap();
        assert_eq!(read_3ot(&ot3.code).unwrap(), ot3);
        assert!(read_3ot("HVX").is_err());
    }

    #[test]
    fn test_signatures() {
        let vcc = VccCode {
            n1: 3,
            n3: 1,
            ..Default::default()
        };
        assert_eq!(vcc.signature(), "0000001100000001");

        let ot3 = vcc_to_3ot("1111").unwrap();
        assert_eq!(ot3.signature(), "000000010000001000000001");
    }

    #[test]
    fn test_normalize_code_lengths() {
        assert_eq!(
            normalize_code_lengths("0123", "01", None),
            ("0123".to_string(), "0101".to_string())
        );
        assert_eq!(
            normalize_code_lengths("0123", "01", Some(3)),
            ("012".to_string(), "010".to_string())
        );
        assert_eq!(
            normalize_code_lengths("", "HV", None),
            (String::new(), "HV".to_string())
        );
    }

    #[test]
    fn test_derive_codes_closes_each_border() {
        let codes = derive_codes(&chain(&["66002244", "7531"]), F4Policy::Filter).unwrap();
        assert_eq!(codes.f8, "660022447531");
        assert_eq!(codes.f4, "66002244");
        assert_eq!(codes.vcc.code, "01010101");
        assert_eq!(codes.vcc.euler(), 1.0);
        assert_eq!(codes.ot3.euler(), codes.vcc.euler());
    }

    #[test]
    fn test_derive_codes_approximate_keeps_diagonal_holes() {
        let codes = derive_codes(&chain(&["66002244", "7531"]), F4Policy::Approximate).unwrap();
        assert_eq!(codes.f4, "660022446420");
        assert_eq!(codes.vcc.code, "010101013333");
        assert_eq!(codes.vcc.euler(), 0.0);
        assert_eq!(codes.ot3.euler(), 0.0);
    }

    #[test]
    fn test_derive_codes_empty_chain() {
        let codes = derive_codes(&FreemanChain::default(), F4Policy::Filter).unwrap();
        assert_eq!(codes, CodeChain::default());
    }
}
