//! Genome distances from canonical kmer fingerprints and bottom-k minhash sketches,
//! and neighbor joining trees built on these distances.
//!
//! sequences -> kmers -> canonical fingerprints -> (sketches) -> pairwise jaccard distances
//! -> distance matrix -> neighbor joining -> Newick tree.

// for logging (debug mostly, switched at compile time in cargo.toml)
#[macro_use]
extern crate lazy_static;

// basic stuff bases definitions, sequences, kmer generation
pub mod base;

pub mod errors;
pub mod io;
pub mod sketcharg;

// hashing stuff
pub mod hashed;
pub mod jaccard;
pub mod minhash;

// sketching of genome collections
pub mod sketching;

// distance matrix and tree
pub mod distmatrix;
pub mod nj;

pub mod prelude;

lazy_static! {
    #[allow(dead_code)]
    pub static ref LOG: u64 = init_log();
}

// install a logger facility
// set RUST_LOG to trace, warn debug off ....
fn init_log() -> u64 {
    env_logger::Builder::from_default_env().init();
    println!("\n ************** initializing logger from env *****************\n");
    1
}
