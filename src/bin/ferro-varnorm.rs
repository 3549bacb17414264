// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-varnorm CLI
//!
//! Command-line interface for canonical normalization of variant records.

use clap::{Args, Parser, Subcommand};
use ferro_varnorm::batch::{BatchConfig, BatchProcessor, ItemResult};
use ferro_varnorm::config::{CliOverrides, FileConfig};
use ferro_varnorm::normalize::validate_allele;
use ferro_varnorm::{NormalizeError, NormalizerConfig, Variant, VariantNormalizer};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "ferro-varnorm")]
#[command(author, version, about = "Canonical normalization of VCF-style variant records")]
#[command(
    long_about = "Normalize variant records into a minimal, unambiguous representation.

Input and output are JSON lines, one variant record per line.

Examples:
  ferro-varnorm normalize -i variants.jsonl -o normalized.jsonl
  ferro-varnorm normalize --decompose-mnvs --reference-blocks < variants.jsonl
  ferro-varnorm trim 100 CAG CG
  ferro-varnorm trim --decompose-mnvs 10 AT GC,TT"
)]
struct Cli {
    /// Log debug messages
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Log errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize JSON-lines variant records
    Normalize {
        /// Input file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (default: .ferro-varnorm.toml or ~/.config/ferro/varnorm.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        options: NormalizeOptions,

        /// Build new output records instead of reusing single-allele inputs
        #[arg(long)]
        no_reuse: bool,

        /// Number of worker threads (0 = all cores)
        #[arg(short, long, default_value = "0")]
        workers: usize,

        /// Number of records normalized per batch
        #[arg(long, default_value = "1000")]
        batch_size: usize,

        /// Skip records that fail instead of stopping
        #[arg(long)]
        continue_on_error: bool,
    },

    /// Trim and split the alleles of a single site
    Trim {
        /// 1-based position of the first reference base
        position: u64,

        /// Reference allele
        reference: String,

        /// Comma-separated alternate alleles
        alternates: String,

        /// Chromosome, used in phase set identifiers
        #[arg(long, default_value = "1")]
        chromosome: String,

        #[command(flatten)]
        options: NormalizeOptions,
    },
}

#[derive(Args)]
struct NormalizeOptions {
    /// Split multi-nucleotide variants into phased SNVs and indels
    #[arg(long)]
    decompose_mnvs: bool,

    /// Add reference blocks over the uncovered span of each site
    #[arg(long)]
    reference_blocks: bool,

    /// Sort the alleles of unphased genotypes
    #[arg(long)]
    normalize_alleles: bool,
}

impl NormalizeOptions {
    /// Flags only override the config file when given
    fn overrides(&self, no_reuse: bool) -> CliOverrides {
        CliOverrides {
            reuse_variants: no_reuse.then_some(false),
            normalize_alleles: self.normalize_alleles.then_some(true),
            decompose_mnvs: self.decompose_mnvs.then_some(true),
            generate_reference_blocks: self.reference_blocks.then_some(true),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    match cli.command {
        Commands::Normalize {
            input,
            output,
            config,
            options,
            no_reuse,
            workers,
            batch_size,
            continue_on_error,
        } => {
            let file_config = match config {
                Some(path) => FileConfig::load_from_path(&path)?,
                None => FileConfig::load().unwrap_or_default(),
            };
            let config = file_config.merge_with_cli(&options.overrides(no_reuse));
            run_normalize(
                input.as_deref(),
                output.as_deref(),
                config,
                workers,
                batch_size,
                continue_on_error,
            )
        }
        Commands::Trim {
            position,
            reference,
            alternates,
            chromosome,
            options,
        } => run_trim(
            position,
            &reference,
            &alternates,
            &chromosome,
            FileConfig::default().merge_with_cli(&options.overrides(false)),
        ),
    }
}

/// Normalizes one batch and returns one result per input record
enum Engine {
    Sequential(BatchProcessor),
    #[cfg(feature = "parallel")]
    Parallel {
        normalizer: VariantNormalizer,
        pool: Option<rayon::ThreadPool>,
    },
}

impl Engine {
    fn new(config: NormalizerConfig, workers: usize) -> Result<Self, NormalizeError> {
        let normalizer = VariantNormalizer::new(config);
        #[cfg(feature = "parallel")]
        if workers != 1 {
            let pool = ferro_varnorm::parallel::ParallelConfig::new()
                .with_num_threads(workers)
                .thread_pool()?;
            return Ok(Engine::Parallel { normalizer, pool });
        }
        #[cfg(not(feature = "parallel"))]
        if workers > 1 {
            log::warn!("Built without the parallel feature; ignoring --workers {}", workers);
        }
        Ok(Engine::Sequential(
            BatchProcessor::with_normalizer(normalizer)
                .with_config(BatchConfig::new().continue_on_error(true)),
        ))
    }

    fn normalizer(&self) -> &VariantNormalizer {
        match self {
            Engine::Sequential(processor) => processor.normalizer(),
            #[cfg(feature = "parallel")]
            Engine::Parallel { normalizer, .. } => normalizer,
        }
    }

    fn run(&self, batch: Vec<Variant>) -> Vec<Result<Vec<Variant>, NormalizeError>> {
        match self {
            Engine::Sequential(processor) => processor
                .normalize_with_progress(batch, |progress| {
                    log::debug!(
                        "Normalized {}/{} records ({:.0} records/s)",
                        progress.processed,
                        progress.total,
                        progress.items_per_second()
                    )
                })
                .results
                .into_iter()
                .map(|item| match item {
                    ItemResult::Ok(records) => Ok(records),
                    ItemResult::Err { error, .. } => Err(error),
                })
                .collect(),
            #[cfg(feature = "parallel")]
            Engine::Parallel { normalizer, pool } => {
                use ferro_varnorm::parallel::normalize_parallel;
                match pool {
                    Some(pool) => pool.install(|| normalize_parallel(normalizer, batch)),
                    None => normalize_parallel(normalizer, batch),
                }
            }
        }
    }
}

#[derive(Default)]
struct Counts {
    input: usize,
    output: usize,
    errors: usize,
}

fn run_normalize(
    input: Option<&Path>,
    output: Option<&Path>,
    config: NormalizerConfig,
    workers: usize,
    batch_size: usize,
    continue_on_error: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!("Normalizer configuration: {:?}", config);
    let engine = Engine::new(config, workers)?;

    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let start = Instant::now();
    let batch_size = batch_size.max(1);
    let mut counts = Counts::default();
    let mut batch = Vec::with_capacity(batch_size);
    let mut lines = Vec::with_capacity(batch_size);

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        counts.input += 1;
        match serde_json::from_str::<Variant>(trimmed) {
            Ok(variant) => {
                batch.push(variant);
                lines.push(line_number);
            }
            Err(e) => {
                let error = NormalizeError::from(e);
                report(line_number, &error, continue_on_error)?;
                counts.errors += 1;
            }
        }

        if batch.len() == batch_size {
            flush(&engine, &mut batch, &mut lines, &mut writer, &mut counts, continue_on_error)?;
        }
    }
    flush(&engine, &mut batch, &mut lines, &mut writer, &mut counts, continue_on_error)?;
    writer.flush()?;

    let stats = engine.normalizer().cache().stats();
    log::info!(
        "Normalized {} records into {} records with {} errors in {:.2?}",
        counts.input,
        counts.output,
        counts.errors,
        start.elapsed()
    );
    log::debug!(
        "Genotype reordering cache: {} entries, {:.1}% hit rate",
        stats.size,
        stats.hit_rate()
    );
    Ok(())
}

fn flush(
    engine: &Engine,
    batch: &mut Vec<Variant>,
    lines: &mut Vec<usize>,
    writer: &mut dyn Write,
    counts: &mut Counts,
    continue_on_error: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if batch.is_empty() {
        return Ok(());
    }
    let results = engine.run(std::mem::take(batch));
    for (line_number, result) in lines.drain(..).zip(results) {
        match result {
            Ok(records) => {
                for record in &records {
                    serde_json::to_writer(&mut *writer, record).map_err(NormalizeError::from)?;
                    writeln!(writer)?;
                }
                counts.output += records.len();
            }
            Err(error) => {
                report(line_number, &error, continue_on_error)?;
                counts.errors += 1;
            }
        }
    }
    Ok(())
}

/// Log a failed record, or fail the run unless errors are skipped
fn report(
    line_number: usize,
    error: &NormalizeError,
    continue_on_error: bool,
) -> Result<(), NormalizeError> {
    if continue_on_error {
        log::warn!("Skipping line {}: {}", line_number, error.detailed_message());
        Ok(())
    } else {
        log::error!("Line {}: {}", line_number, error.detailed_message());
        Err(error.clone())
    }
}

fn run_trim(
    position: u64,
    reference: &str,
    alternates: &str,
    chromosome: &str,
    config: NormalizerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if position == 0 {
        return Err(Box::new(NormalizeError::InvalidCoordinates {
            msg: "position must be 1-based".to_string(),
        }));
    }
    let alternates: Vec<String> = alternates.split(',').map(str::to_string).collect();
    validate_allele(reference)?;
    for alternate in &alternates {
        validate_allele(alternate)?;
    }
    let normalizer = VariantNormalizer::new(config);
    let records = normalizer.normalize_alleles(chromosome, position, reference, &alternates);
    if records.is_empty() {
        println!("no variant");
    }
    for record in records {
        println!("{}:{}", chromosome, record);
    }
    Ok(())
}
