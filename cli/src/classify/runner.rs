use std::{fs::File, io::BufWriter, num::NonZeroUsize, path::PathBuf};

use anyhow::{bail, Context, Error};

use callable_core::{
    fasta,
    site::reader::{self, ReadStatus},
    Classifier, DepthBounds, Input, Mask,
};

use super::Classify;

/// A single-chromosome classification task.
pub struct Runner {
    chromosome: String,
    classifier: Classifier,
    reader: reader::DynReader,
    out: PathBuf,
}

impl Runner {
    /// Sets up the masks and site reader for one chromosome.
    pub fn new(
        args: &Classify,
        chromosome: &str,
        bounds: DepthBounds,
        input: Input,
        threads: NonZeroUsize,
    ) -> Result<Self, Error> {
        let repeats = Mask::read_from_path(&args.repeats, chromosome).with_context(|| {
            format!(
                "failed to read repeat regions from '{}'",
                args.repeats.display()
            )
        })?;

        let ancestral = match &args.ancestral_repeats {
            Some(path) => Mask::read_from_path(path, chromosome).with_context(|| {
                format!(
                    "failed to read ancestral repeat regions from '{}'",
                    path.display()
                )
            })?,
            None => Mask::default(),
        };

        log::info!(
            "{chromosome}: masking {} repeat positions, {} ancestral",
            repeats.coverage(),
            ancestral.coverage(),
        );

        let reader = reader::Builder::default()
            .set_input(input)
            .set_threads(threads)
            .build()
            .context("failed to open variant source")?;

        Ok(Self {
            chromosome: chromosome.to_string(),
            classifier: Classifier::new(repeats, ancestral, bounds, args.individuals),
            reader,
            out: args.artifact_path(chromosome),
        })
    }

    /// Streams the chromosome's sites through the classifier into the output artifact, returning
    /// the number of positions processed.
    pub fn run(mut self) -> Result<u64, Error> {
        if !self
            .reader
            .contigs()
            .iter()
            .any(|contig| contig == &self.chromosome)
        {
            bail!(
                "chromosome '{}' not found in variant source",
                self.chromosome
            );
        }

        let file = File::create(&self.out)
            .with_context(|| format!("failed to create '{}'", self.out.display()))?;
        let mut writer = fasta::Writer::new(BufWriter::new(file));

        writer.write_header(&self.chromosome)?;

        let mut count = 0;
        let mut seen = false;

        loop {
            let site = match self.reader.read_site() {
                ReadStatus::Read(site) => site,
                ReadStatus::Error(e) => return Err(e.into()),
                ReadStatus::Done => break,
            };

            if self.reader.current_contig() != self.chromosome {
                // records are grouped by contig, so the first foreign record
                // after ours ends the chromosome
                if seen {
                    break;
                }

                continue;
            }

            seen = true;
            writer.write_symbol(self.classifier.classify(&site).symbol())?;
            count += 1;
        }

        writer.finish()?;

        log::info!("{}: {count} sites -> '{}'", self.chromosome, self.out.display());

        Ok(count)
    }
}
