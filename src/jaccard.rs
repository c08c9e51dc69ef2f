//! Jaccard distances between kmer sets, fingerprint sets or sketches.
//!
//! distance = 1 - |A ∩ B| / |A ∪ B|
//!
//! The sketch distance treats each sketch as a plain set, the union is the union of the 2 sketches
//! and not a bottom-k sketch of the union. It is a biased estimate of the jaccard distance of the
//! underlying sets, reliable when both sets are large relative to the sketch size.
//!
//! Conventions for empty sets :
//! - empty vs empty is an error ([KmerTreeError::EmptyFingerprintSet]), the union is empty.
//! - empty vs non empty is the maximal distance 1.

use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};

use crate::errors::*;
use crate::minhash::Sketch;

/// counts found when comparing 2 sets : size of intersection and size of union
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JaccardCount {
    pub common: u64,
    pub total: u64,
}

impl JaccardCount {
    /// jaccard distance 1 - common/total. Errors if total is 0.
    pub fn distance(&self) -> Result<f64> {
        if self.total == 0 {
            return Err(KmerTreeError::EmptyFingerprintSet(String::from(
                "both sets are empty, jaccard distance undefined",
            )));
        }
        Ok(1. - self.common as f64 / self.total as f64)
    }
} // end of impl JaccardCount

/// intersection and union sizes of 2 sets.
/// Works on sets of kmers as well as sets of fingerprints.
pub fn jaccard_count<T, S>(seta: &HashSet<T, S>, setb: &HashSet<T, S>) -> JaccardCount
where
    T: Eq + Hash,
    S: BuildHasher,
{
    // iterate on smaller set
    let (small, large) = if seta.len() <= setb.len() {
        (seta, setb)
    } else {
        (setb, seta)
    };
    let common = small.iter().filter(|x| large.contains(*x)).count() as u64;
    let total = (seta.len() + setb.len()) as u64 - common;
    JaccardCount { common, total }
} // end of jaccard_count

/// exact jaccard distance between 2 full sets
pub fn exact_distance<T, S>(seta: &HashSet<T, S>, setb: &HashSet<T, S>) -> Result<f64>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    jaccard_count(seta, setb).distance()
}

/// intersection and union of 2 sketches. Sketches are sorted so we merge them.
pub fn sketch_count(sketch1: &Sketch, sketch2: &Sketch) -> JaccardCount {
    let h1 = sketch1.get_hashes();
    let h2 = sketch2.get_hashes();
    let mut i: usize = 0;
    let mut j: usize = 0;
    let mut common: u64 = 0;
    while i < h1.len() && j < h2.len() {
        if h1[i] < h2[j] {
            i += 1;
        } else if h2[j] < h1[i] {
            j += 1;
        } else {
            i += 1;
            j += 1;
            common += 1;
        }
    } // end while
    let total = (h1.len() + h2.len()) as u64 - common;
    JaccardCount { common, total }
} // end of sketch_count

/// estimated jaccard distance between 2 sketches
pub fn minhash_distance(sketch1: &Sketch, sketch2: &Sketch) -> Result<f64> {
    sketch_count(sketch1, sketch2).distance()
}

////////////////////////////////////////////////////////////////////////////////////////:

// end of mod tests
