//! a tool computing pairwise distances between genomes and a neighbor joining tree.
//!
//! usage : kmertree --fasta (-f) g1.fa g2.fa ... \[--kmer (-k) k\] \[--sketch (-s) s\] \[--exact\]
//!             \[--branch symmetric|standard\] \[--threads (-t) n\] \[--outdir (-o) dir\]
//!
//! - --fasta : genome files, fasta or fastq possibly gzipped. All records of a file are concatenated.
//!     The file name is the genome label. At least 2 files.
//! - --kmer : kmer size, default 14
//! - --sketch : number of fingerprints kept in a bottom-k sketch, default 1000
//! - --exact : compute distances on full fingerprint sets instead of sketches
//! - --branch : branch length of the second node of a joined pair, symmetric (default) gives it the
//!     branch length of the first node, standard gives D\[i,j\] minus branch length of first node.
//! - --threads : number of threads, default to number of cpus
//! - --outdir : directory where pairwise_distance_matrix.txt, phylogenetic_tree.nwk and
//!     parameters.json are dumped, default current directory.

use std::path::PathBuf;
use std::time::SystemTime;

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use cpu_time::ProcessTime;

use kmertree::io::{dump_newick, load_genomes};
use kmertree::nj::{neighbor_joining, BranchRule};
use kmertree::sketcharg::*;
use kmertree::sketching::SeqSketcher;

const MATRIX_DUMP_NAME: &str = "pairwise_distance_matrix.txt";
const TREE_DUMP_NAME: &str = "phylogenetic_tree.nwk";

fn parse_branch_rule(arg: &str) -> Result<BranchRule, String> {
    match arg.to_ascii_lowercase().as_str() {
        "symmetric" => Ok(BranchRule::Symmetric),
        "standard" => Ok(BranchRule::Standard),
        _ => Err(format!(
            "unknown branch rule {}, expecting symmetric or standard",
            arg
        )),
    }
}

fn main() -> anyhow::Result<()> {
    lazy_static::initialize(&kmertree::LOG);
    log::debug!("entering kmertree, checking log trace");
    //
    let matches = Command::new("kmertree")
        .about("genome distances from kmer minhash sketches and neighbor joining tree")
        .arg(
            Arg::new("fasta")
                .long("fasta")
                .short('f')
                .required(true)
                .num_args(1..)
                .value_parser(clap::value_parser!(PathBuf))
                .help("expecting genome files (fasta), at least 2"),
        )
        .arg(
            Arg::new("kmer_size")
                .long("kmer")
                .short('k')
                .default_value("14")
                .value_parser(clap::value_parser!(usize))
                .help("expecting a kmer size"),
        )
        .arg(
            Arg::new("sketch_size")
                .long("sketch")
                .short('s')
                .default_value("1000")
                .value_parser(clap::value_parser!(usize))
                .help("expecting sketch size as usize"),
        )
        .arg(
            Arg::new("exact")
                .long("exact")
                .action(ArgAction::SetTrue)
                .help("distances on full fingerprint sets instead of sketches"),
        )
        .arg(
            Arg::new("branch")
                .long("branch")
                .default_value("symmetric")
                .value_parser(parse_branch_rule)
                .help("branch length rule : symmetric or standard"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('t')
                .value_parser(clap::value_parser!(usize))
                .help("number of threads, default to number of cpus"),
        )
        .arg(
            Arg::new("outdir")
                .long("outdir")
                .short('o')
                .default_value(".")
                .value_parser(clap::value_parser!(PathBuf))
                .help("directory where results are dumped"),
        )
        .get_matches();
    //
    let files: Vec<PathBuf> = matches
        .get_many::<PathBuf>("fasta")
        .context("--fasta is mandatory")?
        .cloned()
        .collect();
    let kmer_size = *matches.get_one::<usize>("kmer_size").context("bad kmer size")?;
    let sketch_size = *matches
        .get_one::<usize>("sketch_size")
        .context("bad sketch size")?;
    let mode = if matches.get_flag("exact") {
        DistanceMode::Exact
    } else {
        DistanceMode::Sketch
    };
    let branch_rule = *matches
        .get_one::<BranchRule>("branch")
        .context("bad branch rule")?;
    let outdir = matches
        .get_one::<PathBuf>("outdir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    //
    let mut params = SeqSketcherParams::new(kmer_size, sketch_size, mode, branch_rule);
    if let Some(nb_threads) = matches.get_one::<usize>("threads") {
        params.set_nb_threads(*nb_threads);
    }
    params.validate()?;
    log::info!("parameters : {:?}", params);
    //
    let start_t = SystemTime::now();
    let cpu_start = ProcessTime::now();
    //
    let genomes = load_genomes(&files)?;
    let sequences: Vec<_> = genomes.into_values().collect();
    let sketcher = SeqSketcher::new(params)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(params.get_nb_threads())
        .build()
        .context("could not build thread pool")?;
    let matrix = pool.install(|| sketcher.distance_matrix(&sequences))?;
    log::info!(
        "distance matrix computed, cpu time(s) {}",
        cpu_start.elapsed().as_secs()
    );
    //
    std::fs::create_dir_all(&outdir)
        .with_context(|| format!("could not create directory {:?}", outdir))?;
    matrix.dump_tsv_file(&outdir.join(MATRIX_DUMP_NAME))?;
    //
    let tree = neighbor_joining(&matrix, params.get_branch_rule())?;
    println!("Generated Phylogenetic Tree (Newick):\n{}", tree);
    dump_newick(&tree, &outdir.join(TREE_DUMP_NAME))?;
    params.dump_json(&outdir)?;
    //
    let cpu_time = cpu_start.elapsed().as_secs();
    let elapsed_t = start_t.elapsed().map(|d| d.as_secs_f32()).unwrap_or(0.);
    log::info!("kmertree : cpu time(s) {}", cpu_time);
    log::info!("kmertree : elapsed time(s) {}", elapsed_t);
    //
    Ok(())
} // end of main
