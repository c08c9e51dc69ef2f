// gathers the types and functions needed to go from sequences to a tree

pub use crate::base::{alphabet::*, kmergenerator::*, sequence::*};

pub use crate::hashed::*;
pub use crate::jaccard::*;
pub use crate::minhash::*;

pub use crate::distmatrix::*;
pub use crate::nj::*;
pub use crate::sketching::*;

pub use crate::errors::KmerTreeError;
pub use crate::sketcharg::*;
