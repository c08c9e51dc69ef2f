//! This module computes the pairwise jaccard distances between a collection of genome sequences.
//!
//! For each sequence the kmers of a given size are generated and hashed in canonical fingerprints.
//! Distances are then computed, according to [DistanceMode], either between full fingerprint sets
//! or between bottom-k sketches of these sets.
//!
//! Fingerprinting, sketching and distance computations are independent between sequences and pairs,
//! they are threaded with the Rayon crate. Results are collected in input order so output is
//! reproducible whatever the number of threads.

use log::*;

use rayon::prelude::*;

use crate::base::sequence::Sequence;
use crate::distmatrix::{DistanceMatrix, PairDistances};
use crate::errors::*;
use crate::hashed::*;
use crate::jaccard::{exact_distance, minhash_distance};
use crate::minhash::*;
use crate::sketcharg::{DistanceMode, SeqSketcherParams};

/// This structure describes the kmer size used in computing sketches, the number of fingerprints
/// kept in a sketch and the distance mode.
#[derive(Clone, Copy)]
pub struct SeqSketcher {
    params: SeqSketcherParams,
}

// prefix the error with the labels of the pair.
fn with_pair_context(err: KmerTreeError, first: &str, second: &str) -> KmerTreeError {
    match err {
        KmerTreeError::EmptyFingerprintSet(msg) => KmerTreeError::EmptyFingerprintSet(format!(
            "genomes {} and {} : {}",
            first, second, msg
        )),
        other => other,
    }
}

/// computes in parallel dist_fn on all pairs i < j of items, labels\[i\] being the label of items\[i\].
pub fn pairwise_distances<T, F>(labels: &[String], items: &[T], dist_fn: F) -> Result<PairDistances>
where
    T: Sync,
    F: Fn(&T, &T) -> Result<f64> + Send + Sync,
{
    let n = items.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();
    debug!("computing {} pairwise distances", pairs.len());
    let dists: Vec<Result<f64>> = pairs
        .par_iter()
        .map(|&(i, j)| {
            dist_fn(&items[i], &items[j]).map_err(|e| with_pair_context(e, &labels[i], &labels[j]))
        })
        .collect();
    //
    let mut distances = PairDistances::new();
    for (&(i, j), dist) in pairs.iter().zip(dists) {
        let d = dist?;
        trace!("distance {} {} : {}", labels[i], labels[j], d);
        distances.insert(&labels[i], &labels[j], d)?;
    }
    Ok(distances)
} // end of pairwise_distances

impl SeqSketcher {
    pub fn new(params: SeqSketcherParams) -> Result<Self> {
        params.validate()?;
        Ok(SeqSketcher { params })
    }

    /// returns kmer size
    pub fn get_kmer_size(&self) -> usize {
        self.params.get_kmer_size()
    }

    /// return sketch size
    pub fn get_sketch_size(&self) -> usize {
        self.params.get_sketch_size()
    }

    pub fn get_params(&self) -> &SeqSketcherParams {
        &self.params
    }

    /// returns the canonical fingerprint sets of sequences, in order of vseq
    pub fn fingerprint_sequences(&self, vseq: &[Sequence]) -> Vec<FingerprintSet> {
        let kmer_size = self.get_kmer_size();
        vseq.par_iter()
            .map(|seq| sequence_fingerprints(seq, kmer_size))
            .collect()
    }

    /// returns bottom-k sketches of sequences, in order of vseq
    pub fn sketch_sequences(&self, vseq: &[Sequence]) -> Result<Vec<Sketch>> {
        let sketch_size = self.get_sketch_size();
        self.fingerprint_sequences(vseq)
            .par_iter()
            .map(|fingerprints| sketch_fingerprints(fingerprints, sketch_size))
            .collect()
    }

    /// computes the distance matrix between sequences, labelled by their id.
    /// Needs at least 2 sequences.
    pub fn distance_matrix(&self, vseq: &[Sequence]) -> Result<DistanceMatrix> {
        if vseq.len() < 2 {
            return Err(KmerTreeError::InvalidParameter(format!(
                "at least 2 genomes needed, got {}",
                vseq.len()
            )));
        }
        let kmer_size = self.get_kmer_size();
        for seq in vseq.iter().filter(|s| s.size() < kmer_size) {
            warn!(
                "genome {} of length {} is shorter than kmer size {}",
                seq.get_id(),
                seq.size(),
                kmer_size
            );
        }
        let labels: Vec<String> = vseq.iter().map(|s| String::from(s.get_id())).collect();
        let distances = match self.params.get_mode() {
            DistanceMode::Exact => {
                info!("computing exact distances, kmer size {}", kmer_size);
                let fingerprints = self.fingerprint_sequences(vseq);
                pairwise_distances(&labels, &fingerprints, |a, b| exact_distance(a, b))?
            }
            DistanceMode::Sketch => {
                info!(
                    "computing sketch distances, kmer size {}, sketch size {}",
                    kmer_size,
                    self.get_sketch_size()
                );
                let sketches = self.sketch_sequences(vseq)?;
                pairwise_distances(&labels, &sketches, minhash_distance)?
            }
        };
        DistanceMatrix::from_pairs(&labels, &distances)
    } // end of distance_matrix
} // end of impl SeqSketcher

////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nj::BranchRule;

    use rand::distributions::{Distribution, Uniform};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[allow(dead_code)]
    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn random_bases(len: usize, rng: &mut Xoshiro256PlusPlus) -> Vec<u8> {
        let unif = Uniform::<usize>::new(0, 4);
        (0..len).map(|_| b"ACGT"[unif.sample(&mut *rng)]).collect()
    }

    // a genome, a mutated copy and an unrelated one
    fn three_genomes() -> Vec<Sequence> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(20_220_117);
        let base = random_bases(5000, &mut rng);
        let mut mutated = base.clone();
        let unif = Uniform::<usize>::new(0, mutated.len());
        for _ in 0..25 {
            let pos = unif.sample(&mut rng);
            mutated[pos] = if mutated[pos] == b'A' { b'C' } else { b'A' };
        }
        let other = random_bases(5000, &mut rng);
        vec![
            Sequence::new("base", &base),
            Sequence::new("mutated", &mutated),
            Sequence::new("other", &other),
        ]
    }

    #[test]
    fn test_sketch_matrix_orders_relatedness() {
        log_init();
        let params = SeqSketcherParams::new(14, 200, DistanceMode::Sketch, BranchRule::Symmetric);
        let sketcher = SeqSketcher::new(params).unwrap();
        let genomes = three_genomes();
        let matrix = sketcher.distance_matrix(&genomes).unwrap();
        assert_eq!(matrix.get_labels(), &["base", "mutated", "other"]);
        let close = matrix.get(0, 1);
        assert!(close < 0.5);
        assert!(matrix.get(0, 2) > 0.95);
        assert!(matrix.get(1, 2) > 0.95);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), 0.);
        }
    }

    #[test]
    fn test_large_sketch_equals_exact() {
        log_init();
        let genomes: Vec<Sequence> = three_genomes()
            .into_iter()
            .map(|s| Sequence::new(s.get_id(), &s.get_bases()[..300]))
            .collect();
        // less than 300 fingerprints by genome, a sketch of 1000 keeps them all
        let sketch = SeqSketcher::new(SeqSketcherParams::new(
            12,
            1000,
            DistanceMode::Sketch,
            BranchRule::Symmetric,
        ))
        .unwrap();
        let exact = SeqSketcher::new(SeqSketcherParams::new(
            12,
            1000,
            DistanceMode::Exact,
            BranchRule::Symmetric,
        ))
        .unwrap();
        let ms = sketch.distance_matrix(&genomes).unwrap();
        let me = exact.distance_matrix(&genomes).unwrap();
        assert_eq!(ms, me);
    }

    #[test]
    fn test_too_few_genomes_and_empty_sets() {
        log_init();
        let sketcher = SeqSketcher::new(SeqSketcherParams::default()).unwrap();
        let one = vec![Sequence::new("alone", b"ACGTACGTACGTACGTAC")];
        assert!(matches!(
            sketcher.distance_matrix(&one),
            Err(KmerTreeError::InvalidParameter(_))
        ));
        // 2 sequences shorter than kmer size : both sets empty
        let short = vec![Sequence::new("s1", b"ACGT"), Sequence::new("s2", b"TTGA")];
        match sketcher.distance_matrix(&short) {
            Err(KmerTreeError::EmptyFingerprintSet(msg)) => {
                assert!(msg.contains("s1") && msg.contains("s2"));
            }
            other => panic!("expected EmptyFingerprintSet, got {:?}", other),
        }
        // one empty, one not : maximal distance
        let mixed = vec![
            Sequence::new("s1", b"ACGT"),
            Sequence::new("long", b"ACGTTGCAAGGCTTAACCGGTA"),
        ];
        let matrix = sketcher.distance_matrix(&mixed).unwrap();
        assert_eq!(matrix.get(0, 1), 1.);
    }

    #[test]
    fn test_bad_params() {
        let params = SeqSketcherParams::new(14, 0, DistanceMode::Sketch, BranchRule::Symmetric);
        assert!(SeqSketcher::new(params).is_err());
    }
} // end of mod tests
