use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use bpalign::scan;
use bpalign::{Candidate, CandidateAligner, EngineConfig, PackedDna, ScoringConfig};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bpalign", about = "Bit-parallel banded read alignment")]
struct Cli {
    /// Log at debug level regardless of RUST_LOG.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Align reads at candidate reference offsets.
    Align {
        /// Reference genome (FASTA or raw sequence).
        reference: PathBuf,
        /// Candidates file (`<offset>\t<read>` per line).
        candidates: PathBuf,
        /// Largest edit distance accepted.
        #[arg(long)]
        max_edits: u32,
        /// Reference bases searched beyond the read length.
        #[arg(long, default_value_t = 8)]
        window_slack: usize,
        /// Score added per matching base.
        #[arg(long = "match", default_value_t = 1.0, allow_negative_numbers = true)]
        match_score: f64,
        /// Score added per substitution.
        #[arg(long, default_value_t = -4.0, allow_negative_numbers = true)]
        mismatch: f64,
        /// Score added when a gap opens.
        #[arg(long, default_value_t = -6.0, allow_negative_numbers = true)]
        gap_open: f64,
        /// Score added per further gap base.
        #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
        gap_extend: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Align {
            reference,
            candidates,
            max_edits,
            window_slack,
            match_score,
            mismatch,
            gap_open,
            gap_extend,
        } => {
            let scoring = ScoringConfig::new(match_score, mismatch, gap_open, gap_extend);
            run_align(&reference, &candidates, max_edits, window_slack, scoring)?
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_align(
    reference_path: &Path,
    candidates_path: &Path,
    max_edits: u32,
    window_slack: usize,
    scoring: ScoringConfig,
) -> Result<()> {
    let sequence = read_sequence_file(reference_path)
        .with_context(|| format!("failed to read reference from {}", reference_path.display()))?;
    let genome = PackedDna::pack(&sequence).context("failed to pack reference")?;

    let candidates = read_candidates_file(candidates_path).with_context(|| {
        format!("failed to read candidates from {}", candidates_path.display())
    })?;
    info!(
        reference_len = genome.len(),
        candidates = candidates.len(),
        "loaded inputs"
    );

    let initial_window = candidates
        .iter()
        .map(|(_, read)| read.len() + window_slack)
        .max()
        .unwrap_or(window_slack)
        .max(1);
    let mut aligner: CandidateAligner = CandidateAligner::new(
        EngineConfig::with_max_window(initial_window)?,
        scoring,
        max_edits,
    )?;

    let mut aligned = 0usize;
    for (idx, (offset, read)) in candidates.iter().enumerate() {
        aligner
            .load_read(read)
            .with_context(|| format!("invalid read in candidate {}", idx + 1))?;
        let candidate = Candidate::new(*offset, read.len() + window_slack);
        let result = aligner
            .align(&genome, candidate)
            .with_context(|| format!("alignment failed for candidate {}", idx + 1))?;

        match result {
            Some(alignment) => {
                aligned += 1;
                println!(
                    "{}\tpos={}\ted={}\tcigar={}\tscript={}\tscore={:.2}\tevents={}",
                    idx + 1,
                    alignment.ref_start,
                    alignment.edit_distance,
                    alignment.script.cigar_string(),
                    alignment.script,
                    alignment.score,
                    alignment.events
                );
            }
            None => println!("{}\tunaligned", idx + 1),
        }
    }

    info!(aligned, total = candidates.len(), "alignment finished");
    Ok(())
}

fn read_sequence_file(path: &Path) -> Result<Vec<u8>> {
    let contents = std::fs::read_to_string(path)?;
    let sequence: String = contents
        .lines()
        .filter(|line| !line.starts_with('>') && !line.trim().is_empty())
        .map(str::trim)
        .collect();
    Ok(sequence.to_ascii_uppercase().into_bytes())
}

fn read_candidates_file(path: &Path) -> Result<Vec<(usize, Vec<u8>)>> {
    let contents = std::fs::read(path)?;
    let mut candidates = Vec::with_capacity(scan::count_marker(&contents) + 1);

    for (line_no, line) in contents.split(|&b| b == scan::EOL_MARKER).enumerate() {
        let line = std::str::from_utf8(line)
            .with_context(|| format!("line {} is not valid UTF-8", line_no + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let offset_str = fields
            .next()
            .ok_or_else(|| anyhow!("missing offset on line {}", line_no + 1))?;
        let read = fields
            .next()
            .ok_or_else(|| anyhow!("missing read on line {}", line_no + 1))?;

        let offset: usize = offset_str.parse().with_context(|| {
            format!("invalid offset '{}' on line {}", offset_str, line_no + 1)
        })?;
        candidates.push((offset, read.as_bytes().to_vec()));
    }

    Ok(candidates)
}
