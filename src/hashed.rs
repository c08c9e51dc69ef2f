//! Canonical hashing of kmers.
//!
//! A kmer and its reverse complement are both hashed from their byte representation
//! with wyhash and the fingerprint is the minimum of the 2 values.
//! So a kmer and its reverse complement always get the same fingerprint whatever the strand
//! the sequence was read from.

use fnv::{FnvBuildHasher, FnvHashSet};

use crate::base::{alphabet::*, kmergenerator::*, sequence::Sequence};

/// We use a 64 bit hash value, uniformly distributed over u64.
pub type ItemHash = u64;

/// set of distinct canonical fingerprints of a sequence
pub type FingerprintSet = FnvHashSet<ItemHash>;

// fixed seed so that fingerprints are reproducible between runs and genomes.
const WYHASH_SEED: u64 = 0x5eed_1a7c_0ffe_e001;

/// hash of the bytes of a kmer (one strand only)
#[inline(always)]
pub fn hash_kmer(kmer: &[u8]) -> ItemHash {
    wyhash::wyhash(kmer, WYHASH_SEED)
}

/// canonical fingerprint : min of hash of kmer and hash of its reverse complement
pub fn canonical_fingerprint(kmer: &[u8]) -> ItemHash {
    let rc = reverse_complement(kmer);
    hash_kmer(kmer).min(hash_kmer(&rc))
}

/// This structure fingerprints many kmers reusing one buffer for reverse complements.
pub struct CanonicalHasher {
    rc_buf: Vec<u8>,
}

impl Default for CanonicalHasher {
    fn default() -> Self {
        CanonicalHasher::new()
    }
}

impl CanonicalHasher {
    pub fn new() -> Self {
        CanonicalHasher { rc_buf: Vec::new() }
    }

    pub fn fingerprint(&mut self, kmer: &[u8]) -> ItemHash {
        reverse_complement_into(kmer, &mut self.rc_buf);
        hash_kmer(kmer).min(hash_kmer(&self.rc_buf))
    }

    /// fingerprint all kmers of a set, duplicates are collapsed
    pub fn fingerprint_set(&mut self, kmers: &KmerSet) -> FingerprintSet {
        let mut fingerprints =
            FingerprintSet::with_capacity_and_hasher(kmers.len(), FnvBuildHasher::default());
        for kmer in kmers.iter() {
            fingerprints.insert(self.fingerprint(kmer));
        }
        fingerprints
    }
} // end of impl CanonicalHasher

/// generates kmers of a sequence and returns the set of their canonical fingerprints.
pub fn sequence_fingerprints(seq: &Sequence, kmer_size: usize) -> FingerprintSet {
    let kmers = generate_kmer_set(seq, kmer_size);
    let fingerprints = CanonicalHasher::new().fingerprint_set(&kmers);
    log::debug!(
        "sequence {} : {} kmers, {} canonical fingerprints",
        seq.get_id(),
        kmers.len(),
        fingerprints.len()
    );
    fingerprints
}

//===========================================================

// end of mod tests
