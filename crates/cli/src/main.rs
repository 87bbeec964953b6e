//! Cache hierarchy simulator CLI.
//!
//! This binary provides a single entry point for all simulation modes. It performs:
//! 1. **Run:** Replay a trace through a hierarchy assembled from a JSON document and/or flags.
//! 2. **Classic:** The positional two-level interface (`L2_SIZE = 0` disables L2).
//! 3. **Geometry:** Validate a configuration and print each level's bit-field layout.
//!
//! Reports go to stdout; logs (`RUST_LOG`, default `warn`) go to stderr.

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cachesim_core::config::LevelConfig;
use cachesim_core::sim::loader;
use cachesim_core::{Config, HierarchyGeometry, InclusionPolicy, ReplacementPolicy, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven multi-level cache hierarchy simulator",
    long_about = "Replay a memory-access trace through a set-associative cache hierarchy.\n\nTrace lines are '<r|w> <hex address>'; blank lines and '#' comments are skipped.\n\nExamples:\n  cachesim run --trace gcc.t --block-size 16 --level 1024:1 --level 8192:4 --inclusion inclusive\n  cachesim run --trace gcc.t --config hierarchy.json --json\n  cachesim classic 16 1024 1 8192 4 LRU inclusive gcc.t\n  cachesim geometry --level 32768:8 --level 262144:8"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace through a configured hierarchy.
    Run {
        /// Trace file to replay.
        #[arg(short, long)]
        trace: PathBuf,

        #[command(flatten)]
        hierarchy: HierarchyArgs,

        /// Print statistics as JSON instead of the text report.
        #[arg(long)]
        json: bool,

        /// Skip the per-set contents dump.
        #[arg(long)]
        no_contents: bool,

        /// Report sections to print (summary, levels, memory); all when omitted.
        #[arg(long, value_delimiter = ',')]
        sections: Vec<String>,
    },

    /// Positional two-level interface.
    Classic {
        /// Block size in bytes.
        block_size: u64,
        /// L1 size in bytes.
        l1_size: u64,
        /// L1 associativity.
        l1_assoc: u64,
        /// L2 size in bytes; 0 for no L2.
        l2_size: u64,
        /// L2 associativity.
        l2_assoc: u64,
        /// LRU, FIFO or OPTIMAL (or 1/2/3).
        replacement: ReplacementPolicy,
        /// inclusive, exclusive or non-inclusive (or 1/2/3).
        inclusion: InclusionPolicy,
        /// Trace file to replay.
        trace_file: PathBuf,
    },

    /// Validate a configuration and print per-level geometry.
    Geometry {
        #[command(flatten)]
        hierarchy: HierarchyArgs,
    },
}

/// Hierarchy selection shared by `run` and `geometry`.
///
/// Flags override the JSON document, which overrides the built-in defaults.
#[derive(Args, Debug)]
struct HierarchyArgs {
    /// JSON configuration document.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Block size in bytes.
    #[arg(long)]
    block_size: Option<u64>,

    /// Cache level as SIZE:ASSOC, L1 first; repeat for deeper levels.
    #[arg(long = "level", value_name = "SIZE:ASSOC")]
    levels: Vec<LevelConfig>,

    /// Replacement policy: LRU, FIFO or OPTIMAL.
    #[arg(long)]
    replacement: Option<ReplacementPolicy>,

    /// Inclusion policy: inclusive, exclusive or non-inclusive.
    #[arg(long)]
    inclusion: Option<InclusionPolicy>,
}

impl HierarchyArgs {
    fn resolve(self) -> Result<Config, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .map_err(|e| format!("could not read config '{}': {e}", path.display()))?;
                Config::from_json(&json)?
            }
            None => Config::default(),
        };
        if let Some(block_size) = self.block_size {
            config.block_size = block_size;
        }
        if !self.levels.is_empty() {
            config.levels = self.levels;
        }
        if let Some(replacement) = self.replacement {
            config.replacement = replacement;
        }
        if let Some(inclusion) = self.inclusion {
            config.inclusion = inclusion;
        }
        Ok(config)
    }
}

/// How `simulate` reports its results.
#[derive(Debug, Default)]
struct Output {
    json: bool,
    contents: bool,
    sections: Vec<String>,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            trace,
            hierarchy,
            json,
            no_contents,
            sections,
        } => hierarchy.resolve().and_then(|config| {
            let output = Output {
                json,
                contents: !no_contents,
                sections,
            };
            simulate(&config, &trace, &output)
        }),
        Commands::Classic {
            block_size,
            l1_size,
            l1_assoc,
            l2_size,
            l2_assoc,
            replacement,
            inclusion,
            trace_file,
        } => {
            let config = Config::new(
                block_size,
                &[(l1_size, l1_assoc), (l2_size, l2_assoc)],
                replacement,
                inclusion,
            );
            let output = Output {
                contents: true,
                ..Output::default()
            };
            simulate(&config, &trace_file, &output)
        }
        Commands::Geometry { hierarchy } => hierarchy.resolve().and_then(|c| print_geometry(&c)),
    };

    if let Err(e) = result {
        eprintln!("[!] {e}");
        process::exit(1);
    }
}

/// Installs the stderr log subscriber, honoring `RUST_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Validates `config`, replays `trace` and prints the reports.
///
/// The Optimal policy needs the whole trace before the first access, so it is
/// loaded up front; the other policies stream it.
fn simulate(config: &Config, trace: &Path, output: &Output) -> Result<(), Box<dyn Error>> {
    let geometry = config.validate()?;
    if !output.json {
        print_banner(&geometry, trace);
    }

    let sim = if geometry.replacement() == ReplacementPolicy::Optimal {
        let records = loader::load_trace(trace)?;
        let mut sim = Simulator::with_lookahead(&geometry, &records);
        sim.run(records);
        sim
    } else {
        let mut sim = Simulator::new(&geometry);
        for record in loader::open_trace(trace)? {
            let record = record?;
            let _ = sim.access(record.op, record.addr);
        }
        sim
    };

    if output.json {
        println!("{}", sim.stats().to_json()?);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if output.contents {
        sim.hierarchy().write_contents(&mut out)?;
    }
    sim.stats().write_sections(&mut out, &output.sections)?;
    out.flush()?;
    Ok(())
}

fn print_banner(geometry: &HierarchyGeometry, trace: &Path) {
    println!("===== Simulator configuration =====");
    println!("BLOCKSIZE:\t\t{}", geometry.block_size());
    for level in geometry.levels() {
        println!("L{}_SIZE:\t\t{}", level.level, level.size);
        println!("L{}_ASSOC:\t\t{}", level.level, level.associativity);
    }
    println!("REPLACEMENT POLICY:\t{}", geometry.replacement());
    println!("INCLUSION PROPERTY:\t{}", geometry.inclusion());
    println!("trace_file:\t\t{}", trace.display());
    println!("----------------------------------------");
}

fn print_geometry(config: &Config) -> Result<(), Box<dyn Error>> {
    let geometry = config.validate()?;
    println!(
        "Block Size: {}, Replacement: {}, Inclusion: {}",
        geometry.block_size(),
        geometry.replacement(),
        geometry.inclusion()
    );
    for level in geometry.levels() {
        println!(
            "Level: {}, Cache Size: {}, Associativity: {}, Sets: {}, Bits (tag/index/offset): {}/{}/{}",
            level.level,
            level.size,
            level.associativity,
            level.num_sets,
            level.decoder.tag_bits(),
            level.decoder.index_bits(),
            level.decoder.offset_bits()
        );
    }
    Ok(())
}
