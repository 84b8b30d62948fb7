//! 4-bit coded nucleotide sequences.
//!
//! Each symbol is stored as a 4-bit membership mask over the four bases,
//! so IUPAC degenerate codes fall out of bitwise operations: two symbols
//! are compatible when the AND of their masks is non-zero, and the AND/OR
//! of two masks is itself a valid symbol (used for alignment masks and
//! covers).

use std::fmt;

const A: u8 = 0x1;
const C: u8 = 0x2;
const G: u8 = 0x4;
const T: u8 = 0x8;

const NCHRS: usize = 1 << 8;

const fn make_code_map() -> [u8; NCHRS] {
    let mut arr = [0_u8; NCHRS];
    arr[b'A' as usize] = A;
    arr[b'C' as usize] = C;
    arr[b'G' as usize] = G;
    arr[b'T' as usize] = T;
    arr[b'U' as usize] = T;
    arr[b'M' as usize] = A | C;
    arr[b'R' as usize] = A | G;
    arr[b'W' as usize] = A | T;
    arr[b'S' as usize] = C | G;
    arr[b'Y' as usize] = C | T;
    arr[b'K' as usize] = G | T;
    arr[b'V' as usize] = A | C | G;
    arr[b'H' as usize] = A | C | T;
    arr[b'D' as usize] = A | G | T;
    arr[b'B' as usize] = C | G | T;
    arr[b'N' as usize] = A | C | G | T;
    arr
}

const fn apply_lower(inarr: [u8; NCHRS]) -> [u8; NCHRS] {
    let mut arr = inarr;
    let mut i = 0;
    while i < 26 {
        arr[i + b'a' as usize] = inarr[i + b'A' as usize];
        i += 1;
    }
    arr
}

const fn invert_code_map(inarr: [u8; NCHRS]) -> [u8; 16] {
    let mut arr = [b'-'; 16];
    let mut i = NCHRS;
    while i > 0 {
        i -= 1;
        // only uppercase canonical letters land in the table
        if inarr[i] != 0 && i >= b'A' as usize && i <= b'Z' as usize {
            arr[inarr[i] as usize] = i as u8;
        }
    }
    arr
}

const STR_TO_CODE: [u8; NCHRS] = apply_lower(make_code_map());
const CODE_TO_STR: [u8; 16] = invert_code_map(make_code_map());

/// Returns the canonical IUPAC character for a 4-bit symbol code
/// (`'-'` for the empty mask).
pub fn code_to_char(code: u8) -> char {
    CODE_TO_STR[(code & 0xF) as usize] as char
}

/// An immutable nucleotide sequence in 4-bit coded form.
///
/// Parsing is case-insensitive and accepts the full IUPAC alphabet;
/// unrecognized characters become gaps (`'-'`, code 0), which never match
/// anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seq {
    codes: Vec<u8>,
}

impl Seq {
    /// Parses a sequence from text.
    pub fn read(text: &str) -> Self {
        Seq::from_bytes(text.as_bytes())
    }

    /// Parses a sequence from raw bytes. Coding is per byte, so each byte
    /// of a multi-byte character becomes its own gap symbol; slicing a
    /// byte buffer at any offset is therefore always safe and consistent
    /// with slicing the coded sequence.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Seq {
            codes: bytes.iter().map(|&b| STR_TO_CODE[b as usize]).collect(),
        }
    }

    /// Sequence length in symbols.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// True when the sequence has no symbols.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// The 4-bit code at position `i`, or 0 (gap) when out of range.
    /// Out-of-range reads are how windows hanging off either end of the
    /// target score zero without special-casing.
    pub fn code_at(&self, i: i64) -> u8 {
        if i < 0 {
            return 0;
        }
        self.codes.get(i as usize).copied().unwrap_or(0)
    }

    /// The raw 4-bit codes.
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }
}

impl fmt::Display for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &code in &self.codes {
            write!(f, "{}", code_to_char(code))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip() {
        let seq = Seq::read("ACGTMRWSYKVHDBN");
        assert_eq!(seq.to_string(), "ACGTMRWSYKVHDBN");
        assert_eq!(seq.len(), 15);
    }

    #[test]
    fn test_lowercase_and_unknown() {
        let seq = Seq::read("acgtn");
        assert_eq!(seq.to_string(), "ACGTN");
        // unrecognized characters become gaps
        assert_eq!(Seq::read("AX*G").to_string(), "A--G");
    }

    #[test]
    fn test_uracil_reads_as_t() {
        assert_eq!(Seq::read("AUG").to_string(), "ATG");
    }

    #[test]
    fn test_code_algebra() {
        let a = Seq::read("A").code_at(0);
        let c = Seq::read("C").code_at(0);
        let n = Seq::read("N").code_at(0);
        assert_eq!(code_to_char(a | c), 'M');
        assert_eq!(code_to_char(a & c), '-');
        assert_eq!(code_to_char(a & n), 'A');
    }

    #[test]
    fn test_multibyte_characters_code_per_byte() {
        // "é" is two bytes; each codes as a gap
        let seq = Seq::read("AéC");
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.to_string(), "A--C");
        assert_eq!(seq, Seq::from_bytes("AéC".as_bytes()));
        // splitting the bytes mid-character yields the same codes
        let bytes = "AéC".as_bytes();
        let mut codes = Seq::from_bytes(&bytes[..2]).codes().to_vec();
        codes.extend_from_slice(Seq::from_bytes(&bytes[2..]).codes());
        assert_eq!(codes, seq.codes());
    }

    #[test]
    fn test_out_of_range_is_gap() {
        let seq = Seq::read("AC");
        assert_eq!(seq.code_at(-1), 0);
        assert_eq!(seq.code_at(2), 0);
        assert_ne!(seq.code_at(0), 0);
    }
}
