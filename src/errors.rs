//! Errors raised by the distance and tree computations.
//!
//! All of them are local and deterministic: nothing is retried, each one carries
//! the labels or counts needed to find the offending input.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum KmerTreeError {
    /// a run parameter (kmer size, sketch size, number of genomes ...) is out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// both sets reaching a jaccard computation are empty, the union is empty.
    #[error("empty fingerprint set: {0}")]
    EmptyFingerprintSet(String),
    /// an unordered pair of labels has no distance in the pairwise mapping
    #[error("incomplete distance matrix, no distance between {first} and {second}")]
    IncompleteMatrix { first: String, second: String },
    /// a distance is negative or not a finite number
    #[error("invalid distance {value} between {first} and {second}")]
    InvalidDistance {
        first: String,
        second: String,
        value: f64,
    },
    /// an unordered pair of labels is given a distance twice
    #[error("distance between {first} and {second} given twice")]
    DuplicatePair { first: String, second: String },
    /// labels index the matrix so they must be unique
    #[error("duplicate label {0}")]
    DuplicateLabel(String),
    /// a pairwise distance refers to a label absent from the matrix labels
    #[error("unknown label {0}")]
    UnknownLabel(String),
    /// neighbor joining needs at least 2 taxa
    #[error("degenerate input, got {nb_taxa} taxa, at least 2 needed")]
    DegenerateInput { nb_taxa: usize },
}

pub type Result<T> = std::result::Result<T, KmerTreeError>;
