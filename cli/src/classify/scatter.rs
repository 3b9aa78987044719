use std::{fs::File, io, num::NonZeroUsize, path::Path};

use anyhow::{bail, Context, Error};

use rayon::prelude::*;

use callable_core::{site::reader, DepthBounds, Input};

use super::{runner::Runner, Classify, ALL_CHROMOSOMES};

/// Runs one classification task per chromosome and merges the results.
///
/// The merge runs only after every chromosome task has completed; artifacts are concatenated in
/// the order chromosomes are declared in the source header, not in completion order. When a task
/// fails, the merge is skipped and the artifacts of completed tasks are left on disk.
pub fn run(args: &Classify, bounds: DepthBounds) -> Result<u64, Error> {
    let Some(path) = args.input.as_deref() else {
        bail!("classifying chromosome '{ALL_CHROMOSOMES}' requires an input file path");
    };

    let chromosomes = enumerate_chromosomes(args, path)?;

    if chromosomes.is_empty() {
        bail!("variant source declares no chromosomes to classify");
    }

    log::info!("classifying {} chromosomes", chromosomes.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads.get())
        .build()
        .context("failed to build thread pool")?;

    // the pool is the only source of parallelism, so each task decompresses
    // on a single thread
    let task_threads = NonZeroUsize::new(1).unwrap();

    let counts = pool.install(|| {
        chromosomes
            .par_iter()
            .map(|chromosome| {
                let input = Input::Path(path.to_path_buf());

                Runner::new(args, chromosome, bounds, input, task_threads)?.run()
            })
            .collect::<Result<Vec<_>, Error>>()
    })?;

    merge(args, &chromosomes)?;

    Ok(counts.iter().sum())
}

/// Enumerates the chromosomes declared by the source header, skipping unplaced scaffolds.
fn enumerate_chromosomes(args: &Classify, path: &Path) -> Result<Vec<String>, Error> {
    let reader = reader::Builder::default()
        .set_input(Input::Path(path.to_path_buf()))
        .build()
        .context("failed to open variant source")?;

    Ok(reader
        .contigs()
        .into_iter()
        .filter(|name| args.scaffold_prefix.is_empty() || !name.starts_with(&args.scaffold_prefix))
        .collect())
}

fn merge(args: &Classify, chromosomes: &[String]) -> Result<(), Error> {
    let out = args.artifact_path(ALL_CHROMOSOMES);
    let mut writer = File::create(&out)
        .with_context(|| format!("failed to create '{}'", out.display()))?;

    for chromosome in chromosomes {
        let path = args.artifact_path(chromosome);
        let mut reader = File::open(&path)
            .with_context(|| format!("failed to open '{}'", path.display()))?;

        io::copy(&mut reader, &mut writer)
            .with_context(|| format!("failed to append '{}'", path.display()))?;
    }

    log::info!(
        "merged {} chromosomes -> '{}'",
        chromosomes.len(),
        out.display()
    );

    Ok(())
}
