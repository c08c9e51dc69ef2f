// describe sketching and tree parameters

use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::errors::*;
use crate::nj::BranchRule;

/// default kmer size
pub const DEFAULT_KMER_SIZE: usize = 14;
/// default number of fingerprints kept in a sketch
pub const DEFAULT_SKETCH_SIZE: usize = 1000;

const PARAMS_DUMP_NAME: &str = "parameters.json";

/// Specify if distances are computed on full fingerprint sets or on sketches.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMode {
    /// jaccard distance estimated on bottom-k sketches
    Sketch,
    /// jaccard distance on full canonical fingerprint sets
    Exact,
}

/// gathers all parameters of a run
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeqSketcherParams {
    kmer_size: usize,
    sketch_size: usize,
    mode: DistanceMode,
    branch_rule: BranchRule,
    /// number of threads used in sketching and distance computations
    nb_threads: usize,
}

impl Default for SeqSketcherParams {
    fn default() -> Self {
        SeqSketcherParams {
            kmer_size: DEFAULT_KMER_SIZE,
            sketch_size: DEFAULT_SKETCH_SIZE,
            mode: DistanceMode::Sketch,
            branch_rule: BranchRule::Symmetric,
            nb_threads: num_cpus::get(),
        }
    }
}

impl SeqSketcherParams {
    pub fn new(
        kmer_size: usize,
        sketch_size: usize,
        mode: DistanceMode,
        branch_rule: BranchRule,
    ) -> Self {
        SeqSketcherParams {
            kmer_size,
            sketch_size,
            mode,
            branch_rule,
            nb_threads: num_cpus::get(),
        }
    }

    /// set number of threads, 0 means number of cpus
    pub fn set_nb_threads(&mut self, nb_threads: usize) {
        self.nb_threads = if nb_threads == 0 {
            num_cpus::get()
        } else {
            nb_threads
        };
    }

    /// returns kmer size
    pub fn get_kmer_size(&self) -> usize {
        self.kmer_size
    }

    /// return sketch size
    pub fn get_sketch_size(&self) -> usize {
        self.sketch_size
    }

    pub fn get_mode(&self) -> DistanceMode {
        self.mode
    }

    pub fn get_branch_rule(&self) -> BranchRule {
        self.branch_rule
    }

    pub fn get_nb_threads(&self) -> usize {
        self.nb_threads
    }

    /// kmer size and sketch size must be > 0
    pub fn validate(&self) -> Result<()> {
        if self.kmer_size == 0 {
            return Err(KmerTreeError::InvalidParameter(String::from(
                "kmer size must be > 0",
            )));
        }
        if self.sketch_size == 0 {
            return Err(KmerTreeError::InvalidParameter(String::from(
                "sketch size must be > 0",
            )));
        }
        Ok(())
    } // end of validate

    /// serialized dump in dirpath/parameters.json
    pub fn dump_json(&self, dirpath: &Path) -> anyhow::Result<()> {
        let filepath = dirpath.join(PARAMS_DUMP_NAME);
        log::info!("dumping parameters in json file : {:?}", filepath);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&filepath)
            .with_context(|| format!("parameters dump could not open file {:?}", filepath))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self)
            .with_context(|| format!("parameters dump failed in {:?}", filepath))?;
        writer.flush()?;
        Ok(())
    } // end of dump_json

    /// reload from a json dump in dirpath
    pub fn reload_json(dirpath: &Path) -> anyhow::Result<SeqSketcherParams> {
        let filepath = dirpath.join(PARAMS_DUMP_NAME);
        log::info!("reloading parameters from {:?}", filepath);
        let file = OpenOptions::new()
            .read(true)
            .open(&filepath)
            .with_context(|| format!("parameters reload could not open file {:?}", filepath))?;
        let params: SeqSketcherParams = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("could not decode parameters in {:?}", filepath))?;
        log::info!(
            "SeqSketcherParams reload, kmer_size : {}, sketch_size : {}",
            params.get_kmer_size(),
            params.get_sketch_size()
        );
        Ok(params)
    } // end of reload_json
} // end of impl SeqSketcherParams

//==========================================================================================

// end of mod tests
