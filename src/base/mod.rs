//! Contains basic tools to describe sequences, bases and generate kmers

pub mod alphabet;
pub mod kmergenerator;
pub mod sequence;

pub use alphabet::*;
pub use kmergenerator::*;
pub use sequence::*;
