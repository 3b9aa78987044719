use std::{num::NonZeroUsize, path::PathBuf};

use anyhow::{bail, Error};

use clap::Parser;

use callable_core::{DepthBounds, Input};

mod runner;
use runner::Runner;

mod scatter;

/// The chromosome wildcard selecting multi-chromosome classification.
pub const ALL_CHROMOSOMES: &str = "ALL";

/// Classify callable sites from an all-sites VCF or BCF.
#[derive(Debug, Parser)]
pub struct Classify {
    /// Input VCF or BCF file.
    ///
    /// If no file is provided, stdin will be used. Classifying all chromosomes requires a file
    /// path, since every chromosome task reads the source independently.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// BED file of repeat regions.
    #[arg(short = 'b', long, value_name = "FILE")]
    repeats: PathBuf,

    /// BED file of ancestral repeat regions.
    ///
    /// May be gzip-compressed. When omitted, no site is classified as an ancestral repeat.
    #[arg(short = 'a', long, value_name = "FILE")]
    ancestral_repeats: Option<PathBuf>,

    /// Depth filter factor.
    ///
    /// Defines abnormal depth: a factor of 2 marks sites below half and above twice the mean
    /// depth as uncallable.
    #[arg(short = 'f', long, default_value_t = 2.0, value_name = "FLOAT")]
    filter_factor: f64,

    /// Mean coverage depth across samples.
    #[arg(short = 'm', long, default_value_t = 44.0, value_name = "FLOAT")]
    mean_depth: f64,

    /// Number of individuals in the input.
    #[arg(short = 'n', long, default_value_t = 10.0, value_name = "FLOAT")]
    individuals: f64,

    /// Chromosome to classify, or 'ALL' for every chromosome.
    ///
    /// 'ALL' runs one task per non-scaffold contig declared in the source header and requires
    /// --scatter.
    #[arg(short = 'c', long, default_value = ALL_CHROMOSOMES, value_name = "CHROM")]
    chromosome: String,

    /// Run one classification task per chromosome.
    #[arg(long)]
    scatter: bool,

    /// Contig-name prefix marking unplaced scaffolds.
    ///
    /// Contigs whose name starts with this prefix are skipped when classifying all chromosomes.
    #[arg(long, default_value = "NODE", value_name = "PREFIX")]
    scaffold_prefix: String,

    /// Output prefix.
    ///
    /// The classification for chromosome CHROM is written to '<PREFIX>.CHROM.fa'; with 'ALL',
    /// the merged output is written to '<PREFIX>.ALL.fa'.
    #[arg(short = 'o', long, value_name = "PREFIX")]
    out: PathBuf,

    /// Number of threads to use.
    ///
    /// In scatter mode, bounds the number of concurrently classified chromosomes; otherwise used
    /// for bgzf decompression.
    #[arg(short = 't', long, default_value_t = NonZeroUsize::new(4).unwrap(), value_name = "INT")]
    threads: NonZeroUsize,
}

impl Classify {
    pub fn run(self) -> Result<(), Error> {
        // the cutoffs are computed once per run and shared read-only by every
        // chromosome task
        let bounds = DepthBounds::new(self.mean_depth, self.filter_factor)?;

        let count = if self.chromosome == ALL_CHROMOSOMES {
            if !self.scatter {
                bail!("classifying chromosome '{ALL_CHROMOSOMES}' requires --scatter");
            }

            scatter::run(&self, bounds)?
        } else {
            let input = Input::new(self.input.clone())?;
            Runner::new(&self, &self.chromosome, bounds, input, self.threads)?.run()?
        };

        println!("{count}");

        Ok(())
    }

    fn artifact_path(&self, chromosome: &str) -> PathBuf {
        let mut name = self.out.as_os_str().to_os_string();
        name.push(format!(".{chromosome}.fa"));

        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::error::ErrorKind as ClapErrorKind;

    use crate::tests::{parse_subcmd, try_parse_subcmd};

    #[test]
    fn test_parse_defaults() {
        let args = parse_subcmd::<Classify>("callable classify -b repeats.bed -o out input.vcf");

        assert_eq!(args.chromosome, ALL_CHROMOSOMES);
        assert_eq!(args.filter_factor, 2.0);
        assert_eq!(args.mean_depth, 44.0);
        assert_eq!(args.individuals, 10.0);
        assert_eq!(args.scaffold_prefix, "NODE");
        assert!(!args.scatter);
        assert!(args.ancestral_repeats.is_none());
    }

    #[test]
    fn test_repeats_are_required() {
        let result = try_parse_subcmd::<Classify>("callable classify -o out input.vcf");

        assert_eq!(
            result.unwrap_err().kind(),
            ClapErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_out_is_required() {
        let result = try_parse_subcmd::<Classify>("callable classify -b repeats.bed input.vcf");

        assert_eq!(
            result.unwrap_err().kind(),
            ClapErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_artifact_paths() {
        let args = parse_subcmd::<Classify>("callable classify -b repeats.bed -o dir/run input.vcf");

        assert_eq!(args.artifact_path("chr1"), PathBuf::from("dir/run.chr1.fa"));
        assert_eq!(
            args.artifact_path(ALL_CHROMOSOMES),
            PathBuf::from("dir/run.ALL.fa")
        );
    }
}
