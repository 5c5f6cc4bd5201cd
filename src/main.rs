use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use salvage::carving::{CarveStats, carve_extents};
use salvage::extents::ExtentScanner;
use salvage::fallback::RecoveryChain;
use salvage::io::{FsEnumerator, ImageSectorSource};
use salvage::scan::{CapabilityProbe, ScanOrchestrator};
use salvage::signatures::SignatureTable;
use salvage::types::RecoveredArtifact;

#[derive(Parser)]
#[command(name = "salvage")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deleted-file recovery: signature carving, triage, and fallback recovery")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enumerate recovery candidates under a directory scope
    Scan {
        root: PathBuf,

        /// Visit system trash/cache locations as well
        #[arg(long)]
        elevated: bool,

        /// Also stream a raw image through the signature pass
        #[arg(long)]
        image: Option<PathBuf>,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Carve recoverable files out of a raw image
    Carve {
        image: PathBuf,

        #[arg(short, long, default_value = "./recovered")]
        output: PathBuf,
    },

    /// Run the fallback recovery chain on one target path
    Recover {
        target: PathBuf,

        #[arg(short, long, default_value = "./recovered")]
        output: PathBuf,
    },
}

/// Path-existence capability probe; the common su binary locations are
/// enough of a signal for scan-scope purposes.
struct SuPathProbe;

impl CapabilityProbe for SuPathProbe {
    fn has_elevated_access(&self) -> bool {
        ["/system/bin/su", "/system/xbin/su", "/sbin/su"]
            .iter()
            .any(|p| Path::new(p).exists())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Scan {
            root,
            elevated,
            image,
            json,
        } => run_scan(&root, elevated, image.as_deref(), json),
        Command::Carve { image, output } => run_carve(&image, &output),
        Command::Recover { target, output } => run_recover(&target, &output),
    }
}

fn run_scan(root: &Path, elevated: bool, image: Option<&Path>, json: bool) -> Result<()> {
    let table = Arc::new(SignatureTable::default_set());
    let orchestrator = ScanOrchestrator::new(table, FsEnumerator::new());

    let capability = elevated || SuPathProbe.has_elevated_access();

    let mut report = orchestrator
        .scan(root, capability)
        .with_context(|| format!("failed to scan {}", root.display()))?;

    if let Some(image_path) = image {
        let mut source = ImageSectorSource::open(image_path)
            .with_context(|| format!("failed to open image {}", image_path.display()))?;
        orchestrator.signature_pass(&mut source, &mut report)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("{}", style("Scan Report").cyan().bold());
    println!("Files examined:        {}", report.files_examined);
    println!("Classifier candidates: {}", report.classifier.len());
    println!("Elevated candidates:   {}", report.elevated.len());
    println!("Signature candidates:  {}", report.signature.len());

    for candidate in report
        .classifier
        .iter()
        .chain(&report.elevated)
        .chain(&report.signature)
    {
        match candidate.kind {
            Some(kind) => println!("  [{:>7}] {} ({})", candidate.id, candidate.source, kind),
            None => println!("  [{:>7}] {}", candidate.id, candidate.source),
        }
    }

    Ok(())
}

fn run_carve(image: &Path, output: &Path) -> Result<()> {
    let table = SignatureTable::default_set();
    let source = ImageSectorSource::open(image)
        .with_context(|| format!("failed to open image {}", image.display()))?;
    let buffer = source.bytes();

    let scanner = ExtentScanner::new(&table);
    let extents = scanner.scan_to_vec(buffer);

    if extents.is_empty() {
        println!("No recoverable extents found.");
        return Ok(());
    }

    let artifacts = carve_extents(buffer, &extents);

    let pb = ProgressBar::new(artifacts.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} writing ({percent}%)")?
            .progress_chars("=>-"),
    );

    fs::create_dir_all(output)?;
    let mut written = 0usize;
    for (i, artifact) in artifacts.iter().enumerate() {
        let name = format!("recovered_{:06}.{}", i, artifact.kind.extension());
        let path = output.join(&name);
        match fs::write(&path, &artifact.bytes) {
            Ok(()) => written += 1,
            Err(err) => eprintln!("Warning: failed to write {}: {}", name, err),
        }
        pb.set_position(i as u64 + 1);
    }
    pb.finish_and_clear();

    let stats = CarveStats::from_artifacts(&artifacts);
    println!();
    println!("{}", style("Carving Complete").green().bold());
    println!("Extents found:   {}", extents.len());
    println!("Files recovered: {}", written);
    println!("Bytes recovered: {}", stats.bytes);
    for (kind, count) in &stats.by_kind {
        println!("  {:<8} {}", format!("{}:", kind), count);
    }
    println!("Output folder:   {}", output.display());

    Ok(())
}

fn run_recover(target: &Path, output: &Path) -> Result<()> {
    let table = Arc::new(SignatureTable::default_set());
    let chain = RecoveryChain::new(table);

    let artifact = chain
        .recover(target)
        .with_context(|| format!("recovery failed for {}", target.display()))?;

    match artifact {
        Some(artifact) => {
            fs::create_dir_all(output)?;
            let name = recovered_name(target, &artifact);
            let path = output.join(&name);
            fs::write(&path, &artifact.bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;

            println!("{}", style("Recovered").green().bold());
            println!("Strategy: {}", artifact.strategy);
            println!("Kind:     {}", artifact.kind);
            println!("Size:     {} bytes", artifact.size_bytes());
            println!("SHA-256:  {}", artifact.sha256_hex());
            if !artifact.valid {
                println!(
                    "{}",
                    style("Note: journal residue; content is unvalidated").yellow()
                );
            }
            println!("Saved to: {}", path.display());
        }
        None => {
            println!(
                "{}",
                style("Nothing recoverable for this target.").yellow()
            );
        }
    }

    Ok(())
}

fn recovered_name(target: &Path, artifact: &RecoveredArtifact) -> String {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "recovered".to_string());
    format!("{}.{}", stem, artifact.kind.extension())
}
