//! Bottom-k minhash sketching.
//!
//! A sketch keeps the sketch_size smallest distinct canonical fingerprints of a kmer set,
//! in ascending order. If there are less than sketch_size distinct fingerprints the sketch
//! contains all of them.
//!
//! The sketcher keeps a max heap bounded to sketch_size elements so memory does not depend
//! on the number of kmers pushed, and a set of hashes present in the heap to discard duplicates.

use log::trace;

use std::collections::BinaryHeap;

use fnv::{FnvBuildHasher, FnvHashSet};

use crate::base::kmergenerator::*;
use crate::errors::*;
use crate::hashed::*;

/// The S smallest distinct fingerprints of a kmer set, sorted in ascending order.
/// Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sketch {
    hashes: Vec<ItemHash>,
}

impl Sketch {
    /// ascending fingerprints
    pub fn get_hashes(&self) -> &[ItemHash] {
        &self.hashes
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
} // end of impl Sketch

/// builds a bottom-k sketch by pushing fingerprints one at a time.
pub struct BottomKSketcher {
    /// max heap, the root is the largest hash retained
    hashes: BinaryHeap<ItemHash>,
    /// hashes present in heap
    retained: FnvHashSet<ItemHash>,
    size: usize,
}

impl BottomKSketcher {
    /// size is the capacity of the sketch, it must be > 0
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(KmerTreeError::InvalidParameter(String::from(
                "sketch size must be > 0",
            )));
        }
        Ok(BottomKSketcher {
            hashes: BinaryHeap::with_capacity(size + 1),
            retained: FnvHashSet::with_capacity_and_hasher(size + 1, FnvBuildHasher::default()),
            size,
        })
    } // end of new

    /// push a fingerprint in the sketching
    pub fn push(&mut self, new_hash: ItemHash) {
        // do we insert
        let add_hash = match self.hashes.peek() {
            None => true,
            Some(&old_max_hash) => new_hash < old_max_hash || self.hashes.len() < self.size,
        };
        if !add_hash || self.retained.contains(&new_hash) {
            return;
        }
        self.hashes.push(new_hash);
        self.retained.insert(new_hash);
        if self.hashes.len() > self.size {
            if let Some(removed) = self.hashes.pop() {
                self.retained.remove(&removed);
            }
        }
    } // end push

    /// returns the sketch, hashes in ascending order. This consumes the sketcher.
    pub fn get_sketch(self) -> Sketch {
        trace!("sketch of {} hashes, capacity {}", self.hashes.len(), self.size);
        Sketch {
            hashes: self.hashes.into_sorted_vec(),
        }
    }
} // end of impl BottomKSketcher

/// sketch of a fingerprint set
pub fn sketch_fingerprints(fingerprints: &FingerprintSet, sketch_size: usize) -> Result<Sketch> {
    let mut sketcher = BottomKSketcher::new(sketch_size)?;
    fingerprints.iter().for_each(|&h| sketcher.push(h));
    Ok(sketcher.get_sketch())
}

/// fingerprints each kmer of the set and returns the bottom sketch_size fingerprints.
pub fn sketch_kmer_set(kmers: &KmerSet, sketch_size: usize) -> Result<Sketch> {
    let mut sketcher = BottomKSketcher::new(sketch_size)?;
    let mut hasher = CanonicalHasher::new();
    for kmer in kmers.iter() {
        sketcher.push(hasher.fingerprint(kmer));
    }
    Ok(sketcher.get_sketch())
}

////////////////////////////////////////////////////////////////////////////////////////:

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::sequence::Sequence;

    #[allow(dead_code)]
    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_sketch_keeps_smallest_sorted() {
        log_init();
        let mut sketcher = BottomKSketcher::new(5).unwrap();
        let values: Vec<u64> = vec![50, 3, 99, 3, 12, 7, 1000, 1, 12, 42, 8];
        values.iter().for_each(|&h| sketcher.push(h));
        let sketch = sketcher.get_sketch();
        assert_eq!(sketch.get_hashes(), &[1, 3, 7, 8, 12]);
    }

    #[test]
    fn test_sketch_smaller_universe_than_size() {
        log_init();
        let fingerprints: FingerprintSet = [17u64, 5, 900, 33].iter().cloned().collect();
        let sketch = sketch_fingerprints(&fingerprints, 1000).unwrap();
        assert_eq!(sketch.get_hashes(), &[5, 17, 33, 900]);
    }

    #[test]
    fn test_sketch_idempotence() {
        log_init();
        let seqstr = "TCAAAGGGAAACATTCAAAATCAGTATGCGCCCGTTCAGTTACGTATTGCTCTCGCTAATGAGATGGGCTGGGTACAGAG";
        let seq = Sequence::new("seq", seqstr.as_bytes());
        let kmers = generate_kmer_set(&seq, 10);
        let sk1 = sketch_kmer_set(&kmers, 20).unwrap();
        let sk2 = sketch_kmer_set(&kmers, 20).unwrap();
        assert_eq!(sk1.len(), 20);
        assert_eq!(sk1, sk2);
        // sketching the fingerprint set gives the same result
        let fingerprints = CanonicalHasher::new().fingerprint_set(&kmers);
        assert_eq!(sketch_fingerprints(&fingerprints, 20).unwrap(), sk1);
        // the sketch are the 20 smallest fingerprints
        let mut all: Vec<u64> = fingerprints.into_iter().collect();
        all.sort_unstable();
        assert_eq!(sk1.get_hashes(), &all[..20]);
    }

    #[test]
    fn test_sketch_empty_and_zero_size() {
        let empty = FingerprintSet::default();
        assert!(sketch_fingerprints(&empty, 10).unwrap().is_empty());
        assert!(matches!(
            BottomKSketcher::new(0),
            Err(KmerTreeError::InvalidParameter(_))
        ));
    }
} // end of mod test
