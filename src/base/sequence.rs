//! Describes a genome sequence : an identifier and its bases.

pub use super::alphabet::*;

//
//===================================================================================
// Sequence
//===================================================================================
//

/// a genome sequence as a vector of uppercase bytes, one byte by base, with the identifier
/// of the genome it comes from (usually the name of the fasta file).
/// A Sequence is not modified once constructed.
#[derive(Clone, Debug)]
pub struct Sequence {
    id: String,
    seq: Vec<u8>,
}

impl Sequence {
    /// bases are uppercased, nothing else is done. Non ACGT bases are kept but will
    /// not contribute to any kmer.
    pub fn new(id: &str, raw: &[u8]) -> Sequence {
        Sequence {
            id: String::from(id),
            seq: raw.to_ascii_uppercase(),
        }
    } // end of new

    /// builds a sequence with an allocated capacity, to be filled by [Self::add()]
    pub fn with_capacity(id: &str, capacity: usize) -> Sequence {
        Sequence {
            id: String::from(id),
            seq: Vec::with_capacity(capacity),
        }
    }

    /// concatenate raw bases at end of sequence. Used when a genome file has many records.
    pub fn add(&mut self, raw: &[u8]) {
        self.seq.extend(raw.iter().map(|c| c.to_ascii_uppercase()));
    }

    /// genome identifier
    pub fn get_id(&self) -> &str {
        &self.id
    }

    /// number of bases
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.seq.len()
    }

    pub fn get_bases(&self) -> &[u8] {
        &self.seq
    }

    /// returns number of bases not in ACGT
    pub fn get_nb_non_acgt(&self) -> usize {
        count_non_acgt(&self.seq)
    }
} // end of impl Sequence

//===========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_uppercase_and_add() {
        let mut seq = Sequence::new("genome", b"acgTN");
        assert_eq!(seq.get_bases(), b"ACGTN");
        assert_eq!(seq.get_nb_non_acgt(), 1);
        seq.add(b"ttg");
        assert_eq!(seq.size(), 8);
        assert_eq!(seq.get_bases(), b"ACGTNTTG");
        assert_eq!(seq.get_id(), "genome");
    }
} // end of mod tests
