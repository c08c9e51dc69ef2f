//! Neighbor joining on a distance matrix.
//!
//! Each active cluster owns a matrix slot and a label : a genome label or a subtree already
//! built, written in bracket (Newick) form with branch lengths.
//! At each iteration, with r active clusters :
//! - Q\[i,j\] = (r-2) * D\[i,j\] - rowsum(i) - rowsum(j)
//! - the pair i < j minimizing Q is joined. Scanning is i ascending then j ascending and only
//!   a strictly smaller value replaces the current minimum, so the first minimum found wins ties.
//! - branch length of i is (D\[i,j\] + (rowsum(i) - rowsum(j)) / (r-2)) / 2, branch length of j
//!   depends on the [BranchRule].
//! - the merged cluster takes slot i, in the matrix and in the cluster list, slot j is removed
//!   from both. Its distance to a surviving cluster k is (D\[i,k\] + D\[j,k\] - D\[i,j\]) / 2.
//!
//! When 2 clusters remain the tree is closed as (label0:D\[0,1\],label1:D\[0,1\]);
//! Branch lengths are written with 4 decimals.
//!
//! Each iteration consumes the state (matrix and clusters) of the previous one, so the matrix
//! and the cluster list are always rebuilt together.

use log::{debug, trace};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::distmatrix::DistanceMatrix;
use crate::errors::*;

/// How is computed the branch length of the second cluster of a joined pair.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchRule {
    /// both clusters of the pair get the branch length computed for the first one.
    #[default]
    Symmetric,
    /// the second cluster gets D\[i,j\] minus the branch length of the first one.
    Standard,
}

/// an active cluster : stable identifier and its label (leaf name or subtree in bracket form)
#[derive(Clone, Debug)]
struct Cluster {
    id: usize,
    label: String,
}

/// active clusters and their distance matrix. clusters\[k\] owns row and column k of dist.
struct NjState {
    clusters: Vec<Cluster>,
    dist: Array2<f64>,
}

/// computes the sum of each row of matrix
pub fn row_sums(dist: &Array2<f64>) -> Vec<f64> {
    dist.rows().into_iter().map(|row| row.sum()).collect()
}

/// The Q matrix of neighbor joining. Only entries i != j are meaningful, diagonal is left to 0.
pub fn q_matrix(dist: &Array2<f64>) -> Array2<f64> {
    let r = dist.nrows();
    let sums = row_sums(dist);
    let mut q = Array2::<f64>::zeros((r, r));
    for i in 0..r {
        for j in (i + 1)..r {
            let qij = (r as f64 - 2.) * dist[[i, j]] - sums[i] - sums[j];
            q[[i, j]] = qij;
            q[[j, i]] = qij;
        }
    }
    q
} // end of q_matrix

/// returns the pair (i,j), i < j with lowest Q value, the first one found in scan order wins ties.
/// Returns None if there is no pair or Q has no value smaller than infinity.
pub fn find_lowest_pair(q: &Array2<f64>) -> Option<(usize, usize)> {
    let mut min_val = f64::INFINITY;
    let mut min_index: Option<(usize, usize)> = None;
    for i in 0..q.nrows() {
        for j in (i + 1)..q.ncols() {
            if q[[i, j]] < min_val {
                min_val = q[[i, j]];
                min_index = Some((i, j));
            }
        }
    }
    min_index
} // end of find_lowest_pair

impl NjState {
    fn dim(&self) -> usize {
        self.clusters.len()
    }

    /// joins i and j (i < j) and returns the reduced state. The merged cluster is in slot i.
    fn join(self, i: usize, j: usize, rule: BranchRule, new_id: usize) -> NjState {
        let r = self.dim();
        let sums = row_sums(&self.dist);
        let dij = self.dist[[i, j]];
        let branch_i = (dij + (sums[i] - sums[j]) / (r as f64 - 2.)) / 2.;
        let branch_j = match rule {
            BranchRule::Symmetric => branch_i,
            BranchRule::Standard => dij - branch_i,
        };
        debug!(
            "joining clusters {} and {} (slots {} {}) into {}, branches {:.4} {:.4}",
            self.clusters[i].id, self.clusters[j].id, i, j, new_id, branch_i, branch_j
        );
        //
        let merged = Cluster {
            id: new_id,
            label: format!(
                "({}:{:.4},{}:{:.4})",
                self.clusters[i].label, branch_i, self.clusters[j].label, branch_j
            ),
        };
        // old slots surviving, in order. i stays at position i as j > i.
        let kept: Vec<usize> = (0..r).filter(|&k| k != j).collect();
        let merged_dist = |k: usize| -> f64 {
            if k == i {
                0.
            } else {
                (self.dist[[i, k]] + self.dist[[j, k]] - dij) / 2.
            }
        };
        let mut new_dist = Array2::<f64>::zeros((r - 1, r - 1));
        for (a, &ka) in kept.iter().enumerate() {
            for (b, &kb) in kept.iter().enumerate() {
                new_dist[[a, b]] = if ka == i {
                    merged_dist(kb)
                } else if kb == i {
                    merged_dist(ka)
                } else {
                    self.dist[[ka, kb]]
                };
            }
        }
        //
        let mut clusters = self.clusters;
        clusters.remove(j);
        clusters[i] = merged;
        NjState {
            clusters,
            dist: new_dist,
        }
    } // end of join
} // end of impl NjState

/// The result of neighbor joining : a tree in bracket form terminated by ;
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NjTree {
    newick: String,
    nb_leaves: usize,
    nb_joins: usize,
}

impl NjTree {
    pub fn as_newick(&self) -> &str {
        &self.newick
    }

    pub fn get_nb_leaves(&self) -> usize {
        self.nb_leaves
    }

    /// number of iterations done by neighbor joining, nb_leaves - 2.
    pub fn get_nb_joins(&self) -> usize {
        self.nb_joins
    }
}

impl std::fmt::Display for NjTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.newick)
    }
}

/// runs neighbor joining on matrix. Needs at least 2 labels.
pub fn neighbor_joining(matrix: &DistanceMatrix, rule: BranchRule) -> Result<NjTree> {
    let nb_leaves = matrix.dim();
    if nb_leaves < 2 {
        return Err(KmerTreeError::DegenerateInput { nb_taxa: nb_leaves });
    }
    let clusters: Vec<Cluster> = matrix
        .get_labels()
        .iter()
        .enumerate()
        .map(|(id, label)| Cluster {
            id,
            label: label.clone(),
        })
        .collect();
    let mut state = NjState {
        clusters,
        dist: matrix.get_array().clone(),
    };
    let mut nb_joins = 0;
    while state.dim() > 2 {
        let q = q_matrix(&state.dist);
        trace!("q matrix at dimension {} : {:?}", state.dim(), q);
        let (i, j) = find_lowest_pair(&q).ok_or_else(|| {
            KmerTreeError::InvalidParameter(format!(
                "no pair with finite Q value at dimension {}",
                state.dim()
            ))
        })?;
        state = state.join(i, j, rule, nb_leaves + nb_joins);
        nb_joins += 1;
    }
    let d01 = state.dist[[0, 1]];
    let newick = format!(
        "({}:{:.4},{}:{:.4});",
        state.clusters[0].label, d01, state.clusters[1].label, d01
    );
    debug!("neighbor joining done in {} joins", nb_joins);
    Ok(NjTree {
        newick,
        nb_leaves,
        nb_joins,
    })
} // end of neighbor_joining

//===========================================================

// end of mod tests
