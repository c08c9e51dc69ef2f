//! Sketching and distance computation on a collection of genomes.

pub mod seqsketchjaccard;

pub use seqsketchjaccard::*;
