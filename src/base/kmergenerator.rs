//! Kmer generation along a sequence.
//!
//! A window of width kmer_size slides one base at a time from offset 0 to len - kmer_size.
//! Windows containing a base out of ACGT are skipped.
//! Kmers are slices borrowed from the sequence, collected in a set so
//! multiplicity is lost : two equal kmers anywhere in the sequence count once.

use fnv::{FnvBuildHasher, FnvHashSet};

#[allow(unused)]
use log::{debug, trace};

use super::sequence::*;

/// The set of distinct kmers of a sequence. Kmers borrow the sequence bytes.
pub type KmerSet<'a> = FnvHashSet<&'a [u8]>;

// We need a guess to allocate HashSet used with Kmer Generation.
// There cannot be more distinct kmers than windows nor than 4^k.
pub(crate) fn get_nbkmer_guess(seq_len: usize, kmer_size: usize) -> usize {
    if kmer_size == 0 || seq_len < kmer_size {
        return 0;
    }
    let nb_windows = seq_len - kmer_size + 1;
    if kmer_size < 16 {
        nb_windows.min(1usize << (2 * kmer_size))
    } else {
        nb_windows
    }
} // end of get_nbkmer_guess

/// an iterator over the kmers (as slices) of a sequence.
/// Kmers containing non ACGT bases are not returned.
pub struct KmerSeqIterator<'a> {
    /// size of kmer
    kmer_size: usize,
    /// bases we iterate on
    bases: &'a [u8],
    /// start of next window
    pos: usize,
}

impl<'a> KmerSeqIterator<'a> {
    pub fn new(kmer_size: usize, bases: &'a [u8]) -> KmerSeqIterator<'a> {
        KmerSeqIterator {
            kmer_size,
            bases,
            pos: 0,
        }
    }
} // end of impl KmerSeqIterator

impl<'a> Iterator for KmerSeqIterator<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.kmer_size == 0 {
            return None;
        }
        while self.pos + self.kmer_size <= self.bases.len() {
            let window = &self.bases[self.pos..self.pos + self.kmer_size];
            // if a bad base is in window we can jump past it
            match window.iter().rposition(|&c| !is_acgt(c)) {
                Some(bad) => {
                    trace!("skipping window at {}, bad base at {}", self.pos, self.pos + bad);
                    self.pos += bad + 1;
                }
                None => {
                    self.pos += 1;
                    return Some(window);
                }
            }
        }
        None
    } // end of next
} // end of impl Iterator for KmerSeqIterator

/// generates the set of distinct kmers of size kmer_size of a sequence.
/// If kmer_size is 0 or greater than sequence length the set is empty.
pub fn generate_kmer_set(seq: &Sequence, kmer_size: usize) -> KmerSet<'_> {
    let nb_guess = get_nbkmer_guess(seq.size(), kmer_size);
    let mut kmers = KmerSet::with_capacity_and_hasher(nb_guess, FnvBuildHasher::default());
    kmers.extend(KmerSeqIterator::new(kmer_size, seq.get_bases()));
    debug!(
        "sequence {} : {} distinct kmers of size {}",
        seq.get_id(),
        kmers.len(),
        kmer_size
    );
    kmers
} // end of generate_kmer_set

//=======================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_gen_kmer16_80bases() {
        log_init();
        // got a string of 80 bases shoud have 65 windows
        let seqstr = String::from(
            "TCAAAGGGAAACATTCAAAATCAGTATGCGCCCGTTCAGTTACGTATTGCTCTCGCTAATGAGATGGGCTGGGTACAGAG",
        );
        let mut kmergen = KmerSeqIterator::new(16, seqstr.as_bytes());
        for i in 0..seqstr.len() - 16 + 1 {
            let kmer = kmergen.next().unwrap();
            assert_eq!(kmer, &seqstr.as_bytes()[i..i + 16]);
        }
        // check iterator sees the end
        assert!(kmergen.next().is_none());
    } // end of test_gen_kmer16_80bases

    #[test]
    fn test_lowercase_windows_skipped() {
        log_init();
        // raw bytes, not uppercased by Sequence
        assert_eq!(KmerSeqIterator::new(4, b"aacg").count(), 0);
        let kmers: Vec<&[u8]> = KmerSeqIterator::new(3, b"ACGtACG").collect();
        assert_eq!(kmers, vec![&b"ACG"[..], &b"ACG"[..]]);
        // Sequence uppercases so the same bases give all windows
        let seq = Sequence::new("lower", b"aacgt");
        assert_eq!(generate_kmer_set(&seq, 4).len(), 2);
    }

    #[test]
    fn test_kmer_set_collapses_duplicates() {
        log_init();
        // 10 windows of size 3 but only AAA, AAC, ACA, CAA
        let seq = Sequence::new("dup", b"AAAAACAAAAAC");
        let kmers = generate_kmer_set(&seq, 3);
        assert_eq!(kmers.len(), 4);
        assert!(kmers.contains(&b"ACA"[..]));
        assert!(kmers.contains(&b"AAA"[..]));
    }

    #[test]
    fn test_kmer_set_degenerate_sizes() {
        let seq = Sequence::new("short", b"ACGTA");
        assert!(generate_kmer_set(&seq, 0).is_empty());
        assert!(generate_kmer_set(&seq, 6).is_empty());
        // k equal to length gives one kmer
        assert_eq!(generate_kmer_set(&seq, 5).len(), 1);
    }

    #[test]
    fn test_kmer_skips_non_acgt() {
        // N at position 4 : windows of size 3 are ACG CGT (GTN TNA NAC skipped) ACC
        let seq = Sequence::new("withn", b"ACGTNACC");
        let kmers = generate_kmer_set(&seq, 3);
        assert_eq!(kmers.len(), 3);
        assert!(kmers.contains(&b"ACC"[..]));
        assert!(!kmers.iter().any(|k| k.contains(&b'N')));
    }
} // end of mod tests
