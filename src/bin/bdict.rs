use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use bayes_dictionary::config::{DictionaryConfig, IngestConfig};
use bayes_dictionary::corpus::{load_documents, TokenDocument};
use bayes_dictionary::{Dictionary, DictionaryStats};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, LevelFilter};
use serde_json::{self, json};

const DEFAULT_STATE: &str = "dictionary.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "Frequency-weighted token dictionary toolkit", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest token multiset files as training documents
    Train(TrainArgs),
    /// Remove previously ingested documents from a dictionary
    Forget(ForgetArgs),
    /// Score token multiset files against a dictionary
    Match(MatchArgs),
    /// Print dictionary entries as JSON
    Dump(DumpArgs),
    /// Inspect dictionary statistics
    Info(InfoArgs),
}

#[derive(Args, Debug)]
struct DiscoveryArgs {
    /// Disable recursive directory traversal
    #[arg(long)]
    no_recursive: bool,

    /// Follow symlinks during traversal
    #[arg(long)]
    follow_symlinks: bool,

    /// Pick up every file inside directories, not only *.json
    #[arg(long)]
    all_files: bool,
}

impl DiscoveryArgs {
    fn ingest_config(&self) -> IngestConfig {
        let extension = if self.all_files {
            None
        } else {
            IngestConfig::default().extension
        };
        IngestConfig::builder()
            .recursive(!self.no_recursive)
            .follow_symlinks(self.follow_symlinks)
            .extension(extension)
            .build()
    }
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Token multiset files or directories to ingest, one document per file
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output path for the dictionary state
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_STATE)]
    output: PathBuf,

    /// Existing dictionary state to extend instead of starting empty
    #[arg(long, value_name = "PATH")]
    state: Option<PathBuf>,

    /// Shortest usable token, in characters
    #[arg(long, value_name = "LEN")]
    min_length: Option<usize>,

    /// Longest usable token, in characters
    #[arg(long, value_name = "LEN")]
    max_length: Option<usize>,

    /// Minimal share of documents a token must reach (0.0-1.0)
    #[arg(long, value_name = "RATIO")]
    document_frequency: Option<f64>,

    /// Enable the document-frequency filter
    #[arg(long)]
    use_document_frequency: bool,

    /// Disable progress reporting
    #[arg(long)]
    no_progress: bool,

    /// Emit pretty JSON
    #[arg(long)]
    pretty: bool,

    #[command(flatten)]
    discovery: DiscoveryArgs,
}

#[derive(Args, Debug)]
struct ForgetArgs {
    /// Token multiset files or directories to remove, one document per file
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Dictionary state to update
    #[arg(short = 's', long, value_name = "PATH", default_value = DEFAULT_STATE)]
    state: PathBuf,

    /// Write the result here instead of overwriting the state
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Emit pretty JSON
    #[arg(long)]
    pretty: bool,

    #[command(flatten)]
    discovery: DiscoveryArgs,
}

#[derive(Args, Debug)]
struct MatchArgs {
    /// Token multiset files or directories to score
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Dictionary state to score against
    #[arg(short = 's', long, value_name = "PATH", default_value = DEFAULT_STATE)]
    state: PathBuf,

    /// Report a verdict for probabilities strictly above this value
    #[arg(long, value_name = "PROBABILITY")]
    threshold: Option<f64>,

    /// Emit JSON lines instead of human-readable output
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    discovery: DiscoveryArgs,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// Dictionary state to dump
    #[arg(short = 's', long, value_name = "PATH", default_value = DEFAULT_STATE)]
    state: PathBuf,

    /// Only print the N heaviest usable tokens
    #[arg(long, value_name = "N")]
    top: Option<usize>,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Dictionary state to inspect
    #[arg(short = 's', long, value_name = "PATH", default_value = DEFAULT_STATE)]
    state: PathBuf,

    /// Emit JSON instead of human-readable output
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Train(args) => run_train(args),
        Commands::Forget(args) => run_forget(args),
        Commands::Match(args) => run_match(args),
        Commands::Dump(args) => run_dump(args),
        Commands::Info(args) => run_info(args),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    // RUST_LOG stays in charge unless -v or -q is given.
    if let Some(level) = verbosity_override(verbose, quiet) {
        builder.filter_level(level);
    }
    let _ = builder.try_init();
}

fn verbosity_override(verbose: u8, quiet: u8) -> Option<LevelFilter> {
    match (quiet, verbose) {
        (0, 0) => None,
        (1, _) => Some(LevelFilter::Warn),
        (q, _) if q > 1 => Some(LevelFilter::Error),
        (_, 1) => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

fn load_state(path: &Path) -> Result<Dictionary> {
    Dictionary::load(path)
        .with_context(|| format!("failed to load dictionary from {}", path.display()))
}

fn save_state(dictionary: &Dictionary, path: &Path, pretty: bool) -> Result<()> {
    bayes_dictionary::serialization::save_dictionary(dictionary, path, pretty)
        .with_context(|| format!("failed to save dictionary to {}", path.display()))
}

fn load_inputs(inputs: &[PathBuf], discovery: &DiscoveryArgs) -> Result<Vec<TokenDocument>> {
    let documents = load_documents(inputs, &discovery.ingest_config())
        .with_context(|| "failed to load token documents")?;
    info!("loaded {} token documents", documents.len());
    Ok(documents)
}

fn progress_bar(len: usize, enabled: bool, label: &str) -> Result<Option<ProgressBar>> {
    if !enabled {
        return Ok(None);
    }
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template(&format!(
        "{{spinner}} {label} [{{bar:30}}] {{pos}}/{{len}} {{elapsed}}"
    ))
    .context("invalid progress template")?;
    pb.set_style(style);
    Ok(Some(pb))
}

fn train_config(base: &DictionaryConfig, args: &TrainArgs) -> Result<DictionaryConfig> {
    let mut cfg = DictionaryConfig::builder()
        .minimal_frequency_in_documents(base.minimal_frequency_in_documents)
        .use_document_frequency_filter(base.use_document_frequency_filter)
        .token_length_range(base.minimal_token_length, base.maximal_token_length);
    if let Some(min_length) = args.min_length {
        cfg = cfg.minimal_token_length(min_length);
    }
    if let Some(max_length) = args.max_length {
        cfg = cfg.maximal_token_length(max_length);
    }
    if let Some(frequency) = args.document_frequency {
        cfg = cfg.minimal_frequency_in_documents(frequency);
    }
    if args.use_document_frequency {
        cfg = cfg.use_document_frequency_filter(true);
    }
    Ok(cfg.build()?)
}

fn run_train(args: TrainArgs) -> Result<()> {
    let mut dictionary = match &args.state {
        Some(path) => load_state(path)?,
        None => Dictionary::new(),
    };
    let cfg = train_config(dictionary.config(), &args)?;
    dictionary.set_config(cfg)?;

    let documents = load_inputs(&args.inputs, &args.discovery)?;
    let progress = progress_bar(documents.len(), !args.no_progress, "ingesting")?;

    let start = Instant::now();
    for document in &documents {
        if document.tokens.is_empty() {
            warn!("{} holds no tokens", document.path.display());
        }
        dictionary.add_tokens(&document.tokens);
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = progress {
        pb.finish_with_message("ingest complete");
    }
    let elapsed = start.elapsed();

    save_state(&dictionary, &args.output, args.pretty)?;

    info!(
        "training complete: documents={} entries={} usable_tokens={} duration={elapsed:.2?}",
        dictionary.document_count(),
        dictionary.len(),
        dictionary.usable_token_count()
    );
    println!(
        "wrote dictionary with {} tokens from {} documents to {}",
        dictionary.len(),
        dictionary.document_count(),
        args.output.display()
    );

    Ok(())
}

fn run_forget(args: ForgetArgs) -> Result<()> {
    let mut dictionary = load_state(&args.state)?;
    let documents = load_inputs(&args.inputs, &args.discovery)?;
    if documents.len() as u64 > dictionary.document_count() {
        warn!(
            "removing {} documents from a dictionary holding {}",
            documents.len(),
            dictionary.document_count()
        );
    }
    for document in &documents {
        dictionary.remove_tokens(&document.tokens);
    }

    let output = args.output.as_deref().unwrap_or(&args.state);
    save_state(&dictionary, output, args.pretty)?;
    println!(
        "removed {} documents; {} tokens from {} documents remain in {}",
        documents.len(),
        dictionary.len(),
        dictionary.document_count(),
        output.display()
    );

    Ok(())
}

fn run_match(args: MatchArgs) -> Result<()> {
    if let Some(threshold) = args.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            bail!("threshold {threshold} must lie within [0, 1]");
        }
    }
    let dictionary = load_state(&args.state)?;
    if dictionary.usable_token_count() == 0 {
        warn!("dictionary has no usable tokens; every document scores 0.5");
    }
    let documents = load_inputs(&args.inputs, &args.discovery)?;

    for document in &documents {
        let probability = dictionary.match_probability(&document.tokens);
        let verdict = args.threshold.map(|threshold| probability > threshold);
        if args.json {
            let record = json!({
                "path": document.path.display().to_string(),
                "probability": probability,
                "matched": verdict,
            });
            println!("{}", serde_json::to_string(&record)?);
        } else {
            match verdict {
                Some(true) => println!("{}\t{probability:.6}\tmatch", document.path.display()),
                Some(false) => println!("{}\t{probability:.6}\tno-match", document.path.display()),
                None => println!("{}\t{probability:.6}", document.path.display()),
            }
        }
    }

    Ok(())
}

fn run_dump(args: DumpArgs) -> Result<()> {
    let dictionary = load_state(&args.state)?;
    let value = match args.top {
        Some(limit) => {
            let top = dictionary
                .top_tokens(limit)
                .into_iter()
                .map(|(token, entry)| {
                    json!({
                        "token": token,
                        "count": entry.count,
                        "weight": entry.weight,
                    })
                })
                .collect::<Vec<_>>();
            serde_json::Value::Array(top)
        }
        None => serde_json::to_value(dictionary.dump())?,
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn run_info(args: InfoArgs) -> Result<()> {
    let dictionary = load_state(&args.state)?;
    let stats: DictionaryStats = dictionary.stats();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        let cfg = &stats.config;
        println!("Entries           : {}", stats.entries);
        println!("Usable entries    : {}", stats.usable_entries);
        println!("Documents         : {}", stats.document_count);
        println!("Tokens            : {}", stats.token_count);
        println!("Usable tokens     : {}", stats.usable_token_count);
        println!(
            "Token length      : {}..={}",
            cfg.minimal_token_length, cfg.maximal_token_length
        );
        if cfg.use_document_frequency_filter {
            println!(
                "Document frequency: >= {}",
                cfg.minimal_frequency_in_documents
            );
        } else {
            println!("Document frequency: (disabled)");
        }
    }

    Ok(())
}
