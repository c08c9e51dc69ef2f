//! Assembly of pairwise distances in a square symmetric matrix indexed by genome labels.
//!
//! Distances are given by unordered pairs of labels. Every unordered pair must be present,
//! a missing one is an error, it is never filled with 0.
//! The diagonal is always 0.
//!
//! The matrix can be dumped as tab separated text : a header row with an empty first cell
//! followed by labels, then one row by genome led by its label, values with 4 decimals.

use std::collections::hash_map::Entry;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use fnv::{FnvHashMap, FnvHashSet};
use ndarray::Array2;

use crate::errors::*;

/// distances between unordered pairs of labels.
/// (a,b) and (b,a) designate the same entry.
#[derive(Clone, Debug, Default)]
pub struct PairDistances {
    distances: FnvHashMap<(String, String), f64>,
}

impl PairDistances {
    pub fn new() -> Self {
        PairDistances {
            distances: FnvHashMap::default(),
        }
    }

    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (String::from(a), String::from(b))
        } else {
            (String::from(b), String::from(a))
        }
    }

    /// insert distance between a and b (a != b). A pair already present is an error
    /// and the first value is kept.
    pub fn insert(&mut self, a: &str, b: &str, dist: f64) -> Result<()> {
        if a == b {
            return Err(KmerTreeError::InvalidParameter(format!(
                "distance of label {} to itself",
                a
            )));
        }
        match self.distances.entry(Self::key(a, b)) {
            Entry::Occupied(_) => Err(KmerTreeError::DuplicatePair {
                first: String::from(a),
                second: String::from(b),
            }),
            Entry::Vacant(entry) => {
                entry.insert(dist);
                Ok(())
            }
        }
    } // end of insert

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.distances.get(&Self::key(a, b)).copied()
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
} // end of impl PairDistances

/// A square symmetric matrix with zero diagonal, rows and columns indexed by labels.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    labels: Vec<String>,
    dist: Array2<f64>,
}

fn check_labels(labels: &[String]) -> Result<()> {
    let mut seen = FnvHashSet::<&str>::default();
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(KmerTreeError::DuplicateLabel(label.clone()));
        }
    }
    Ok(())
}

fn check_value(first: &str, second: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0. {
        return Err(KmerTreeError::InvalidDistance {
            first: String::from(first),
            second: String::from(second),
            value,
        });
    }
    Ok(())
}

impl DistanceMatrix {
    /// assemble matrix from an ordered list of labels and distances of all unordered pairs of labels.
    pub fn from_pairs(labels: &[String], pairs: &PairDistances) -> Result<Self> {
        check_labels(labels)?;
        let known: FnvHashSet<&str> = labels.iter().map(|l| l.as_str()).collect();
        for (a, b) in pairs.distances.keys() {
            for label in [a, b] {
                if !known.contains(label.as_str()) {
                    return Err(KmerTreeError::UnknownLabel(label.clone()));
                }
            }
        }
        let n = labels.len();
        let mut dist = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in (i + 1)..n {
                let d = pairs.get(&labels[i], &labels[j]).ok_or_else(|| {
                    KmerTreeError::IncompleteMatrix {
                        first: labels[i].clone(),
                        second: labels[j].clone(),
                    }
                })?;
                check_value(&labels[i], &labels[j], d)?;
                dist[[i, j]] = d;
                dist[[j, i]] = d;
            }
        }
        log::debug!("assembled distance matrix of dimension {}", n);
        Ok(DistanceMatrix {
            labels: labels.to_vec(),
            dist,
        })
    } // end of from_pairs

    /// build from a full square array. The array must be symmetric with a zero diagonal.
    pub fn from_array(labels: &[String], dist: Array2<f64>) -> Result<Self> {
        check_labels(labels)?;
        let n = labels.len();
        if dist.nrows() != n || dist.ncols() != n {
            return Err(KmerTreeError::InvalidParameter(format!(
                "matrix of shape {:?} for {} labels",
                dist.shape(),
                n
            )));
        }
        for i in 0..n {
            if dist[[i, i]] != 0. {
                return Err(KmerTreeError::InvalidDistance {
                    first: labels[i].clone(),
                    second: labels[i].clone(),
                    value: dist[[i, i]],
                });
            }
            for j in (i + 1)..n {
                check_value(&labels[i], &labels[j], dist[[i, j]])?;
                if dist[[i, j]] != dist[[j, i]] {
                    return Err(KmerTreeError::InvalidDistance {
                        first: labels[j].clone(),
                        second: labels[i].clone(),
                        value: dist[[j, i]],
                    });
                }
            }
        }
        Ok(DistanceMatrix {
            labels: labels.to_vec(),
            dist,
        })
    } // end of from_array

    /// number of labels
    pub fn dim(&self) -> usize {
        self.labels.len()
    }

    pub fn get_labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.dist[[i, j]]
    }

    pub fn get_array(&self) -> &Array2<f64> {
        &self.dist
    }

    /// dump as tab separated text with 4 decimals
    pub fn dump_tsv<W: Write>(&self, out: W) -> anyhow::Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(out);
        let header = std::iter::once(String::new()).chain(self.labels.iter().cloned());
        writer.write_record(header)?;
        for (i, label) in self.labels.iter().enumerate() {
            let dist_row = self.dist.row(i);
            let row = std::iter::once(label.clone())
                .chain(dist_row.iter().map(|v| format!("{:.4}", v)));
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    } // end of dump_tsv

    /// dump as tab separated text in file
    pub fn dump_tsv_file(&self, path: &Path) -> anyhow::Result<()> {
        log::info!("dumping distance matrix in file : {:?}", path);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("could not open file {:?}", path))?;
        self.dump_tsv(BufWriter::new(file))
            .with_context(|| format!("could not write distance matrix in {:?}", path))
    }
} // end of impl DistanceMatrix

//===========================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| String::from(*s)).collect()
    }

    #[test]
    fn test_assemble_symmetric() {
        let names = labels(&["a", "b", "c"]);
        let mut pairs = PairDistances::new();
        pairs.insert("a", "b", 0.25).unwrap();
        // inserted in reverse order
        pairs.insert("c", "a", 0.5).unwrap();
        pairs.insert("b", "c", 0.75).unwrap();
        assert_eq!(pairs.len(), 3);
        let matrix = DistanceMatrix::from_pairs(&names, &pairs).unwrap();
        assert_eq!(matrix.dim(), 3);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), 0.);
            for j in 0..3 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
        assert_eq!(matrix.get(0, 2), 0.5);
        assert_eq!(matrix.get(2, 1), 0.75);
    }

    #[test]
    fn test_missing_pair_is_error() {
        let names = labels(&["a", "b", "c"]);
        let mut pairs = PairDistances::new();
        pairs.insert("a", "b", 0.25).unwrap();
        pairs.insert("b", "c", 0.75).unwrap();
        match DistanceMatrix::from_pairs(&names, &pairs) {
            Err(KmerTreeError::IncompleteMatrix { first, second }) => {
                assert_eq!(first, "a");
                assert_eq!(second, "c");
            }
            other => panic!("expected IncompleteMatrix, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_values_and_labels() {
        let names = labels(&["a", "b"]);
        let mut pairs = PairDistances::new();
        pairs.insert("a", "b", f64::NAN).unwrap();
        assert!(matches!(
            DistanceMatrix::from_pairs(&names, &pairs),
            Err(KmerTreeError::InvalidDistance { .. })
        ));
        let dup = labels(&["a", "a"]);
        assert!(matches!(
            DistanceMatrix::from_pairs(&dup, &pairs),
            Err(KmerTreeError::DuplicateLabel(_))
        ));
        let asym = ndarray::arr2(&[[0., 1.], [2., 0.]]);
        assert!(DistanceMatrix::from_array(&names, asym).is_err());
    }

    #[test]
    fn test_repeated_pair_and_unknown_label() {
        let mut pairs = PairDistances::new();
        pairs.insert("a", "b", 0.25).unwrap();
        // same unordered pair, in any order
        assert!(matches!(
            pairs.insert("b", "a", 0.5),
            Err(KmerTreeError::DuplicatePair { .. })
        ));
        assert_eq!(pairs.get("a", "b"), Some(0.25));
        assert!(pairs.insert("a", "a", 0.).is_err());
        // a pair referring to a label not in the matrix
        pairs.insert("a", "z", 0.5).unwrap();
        match DistanceMatrix::from_pairs(&labels(&["a", "b"]), &pairs) {
            Err(KmerTreeError::UnknownLabel(label)) => assert_eq!(label, "z"),
            other => panic!("expected UnknownLabel, got {:?}", other),
        }
    }

    #[test]
    fn test_dump_tsv() {
        let names = labels(&["g1.fa", "g2.fa"]);
        let mut pairs = PairDistances::new();
        pairs.insert("g1.fa", "g2.fa", 0.123456).unwrap();
        let matrix = DistanceMatrix::from_pairs(&names, &pairs).unwrap();
        let mut buf = Vec::<u8>::new();
        matrix.dump_tsv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "\tg1.fa\tg2.fa\ng1.fa\t0.0000\t0.1235\ng2.fa\t0.1235\t0.0000\n"
        );
    }
} // end of mod tests
