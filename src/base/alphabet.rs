//! This module describes the 4 letters nucleotide alphabet ACGT.
//!
//! Sequences are kept uncompressed (one byte by base, uppercase) as kmers are
//! hashed from their byte representation.
//! Bases are conjugated : A <-> T and C <-> G.

/// check if a base is ACGT, lowercase bases are out of alphabet
#[inline(always)]
pub fn is_acgt(c: u8) -> bool {
    matches!(c, b'A' | b'C' | b'G' | b'T')
}

/// count bases not in ACGT
pub fn count_non_acgt(seq: &[u8]) -> usize {
    let non_acgt = seq.iter().fold(0u32, |acc, &b| acc + !is_acgt(b) as u32);
    non_acgt as usize
}

/// return complement of a base, case is kept. Other bytes are returned unchanged.
#[inline(always)]
pub fn complement(c: u8) -> u8 {
    match c {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        b'a' => b't',
        b'c' => b'g',
        b'g' => b'c',
        b't' => b'a',
        _ => c,
    }
} // end of complement

/// reverse the slice and complement each base, result in a new Vec.
pub fn reverse_complement(kmer: &[u8]) -> Vec<u8> {
    kmer.iter().rev().map(|&c| complement(c)).collect()
}

/// fills buf with reverse complement of kmer. buf is cleared first.
/// Avoids an allocation by kmer when hashing a whole sequence.
pub fn reverse_complement_into(kmer: &[u8], buf: &mut Vec<u8>) {
    buf.clear();
    buf.extend(kmer.iter().rev().map(|&c| complement(c)));
}

//===========================================================

// end of mod tests
