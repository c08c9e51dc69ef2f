//! this file gathers io : fasta loading with needletail and dump of trees.
//!
//! A genome file can contain many records (contigs), they are concatenated in one sequence
//! labelled by the file name.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{anyhow, Context};
use indexmap::IndexMap;

use crate::base::sequence::*;
use crate::nj::NjTree;

/// label of a genome : the file name
pub fn genome_label(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

/// loads all records of a fasta (or fastq) file, possibly gzipped, in one sequence.
pub fn load_genome(path: &Path) -> anyhow::Result<Sequence> {
    let label = genome_label(path);
    log::info!("parsing with needletail file : {:?}", path);
    let filesize = path
        .metadata()
        .with_context(|| format!("file does not exist: {:?}", path))?
        .len();
    let mut genome = Sequence::with_capacity(&label, filesize as usize);
    let mut reader = needletail::parse_fastx_file(path)
        .with_context(|| format!("could not parse file {:?}", path))?;
    let mut nb_record = 0;
    while let Some(record) = reader.next() {
        let seqrec = record.with_context(|| format!("invalid record in file {:?}", path))?;
        genome.add(&seqrec.seq());
        nb_record += 1;
    }
    if nb_record == 0 {
        return Err(anyhow!("no record in file {:?}", path));
    }
    let nb_bad_bases = genome.get_nb_non_acgt();
    log::info!(
        "genome {} : nb records {}, nb bases {}, nb bases not in ACGT {}",
        label,
        nb_record,
        genome.size(),
        nb_bad_bases
    );
    Ok(genome)
} // end of load_genome

/// loads genomes, keyed by their label, in the order of paths. Labels must be unique.
pub fn load_genomes(paths: &[PathBuf]) -> anyhow::Result<IndexMap<String, Sequence>> {
    let start_t = SystemTime::now();
    let mut genomes = IndexMap::<String, Sequence>::with_capacity(paths.len());
    for path in paths {
        let genome = load_genome(path)?;
        let label = String::from(genome.get_id());
        if genomes.insert(label.clone(), genome).is_some() {
            return Err(anyhow!("two genome files have the same name {}", label));
        }
    }
    if let Ok(elapsed) = start_t.elapsed() {
        log::info!("loaded {} genomes in {:?}", genomes.len(), elapsed);
    }
    Ok(genomes)
} // end of load_genomes

/// write tree in Newick format, in one line
pub fn dump_newick(tree: &NjTree, path: &Path) -> anyhow::Result<()> {
    log::info!("dumping newick tree in file : {:?}", path);
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("could not open file {:?}", path))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", tree.as_newick())?;
    writer.flush()?;
    Ok(())
} // end of dump_newick

//===========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genome_label() {
        assert_eq!(
            genome_label(Path::new("/data/genomes/14412_3#82.contigs_velvet.fa")),
            "14412_3#82.contigs_velvet.fa"
        );
    }

    #[test]
    fn test_load_multi_record() {
        let dir = std::env::temp_dir().join(format!("kmertree_io_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("contigs.fa");
        std::fs::write(&path, ">c1 first\nacgtac\nGGTT\n>c2\nTTGCA\n").unwrap();
        let genome = load_genome(&path).unwrap();
        assert_eq!(genome.get_id(), "contigs.fa");
        assert_eq!(genome.get_bases(), b"ACGTACGGTTTTGCA");
        //
        assert!(load_genome(&dir.join("missing.fa")).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
} // end of mod tests
