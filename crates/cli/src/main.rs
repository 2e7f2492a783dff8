//! MIPS machine simulator CLI.
//!
//! Runs a NOFF user program on the simulated machine under the minimal kernel.
//! It performs:
//! 1. **Configuration:** Built-in defaults, optionally replaced by a JSON file
//!    and then overridden by command-line flags.
//! 2. **Loading:** Opens the program image and creates its address space.
//! 3. **Run:** Steps the machine until the program halts, exits or runs out of
//!    ticks, then prints the exit status and statistics.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use mipsim_core::config::{Config, LoadPolicy, TranslationMode};
use mipsim_core::core::cpu::StopReason;
use mipsim_core::sim::{Kernel, open_image};
use mipsim_core::Machine;

#[derive(Parser, Debug)]
#[command(
    name = "mipsim",
    author,
    version,
    about = "MIPS R2000/R3000 simulator with demand paging",
    long_about = "Run a NOFF program image on a simulated MIPS machine.\n\nExamples:\n  mipsim run halt.noff\n  mipsim run --policy demand-with-swap --tlb matmult.noff\n  mipsim run --config machine.json --trace sort.noff"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single program image to completion.
    Run {
        /// NOFF program image.
        image: PathBuf,

        /// JSON configuration file; flags below override it.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Page loading policy.
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Translate through the TLB instead of the page table.
        #[arg(long)]
        tlb: bool,

        /// Log every executed instruction (needs `RUST_LOG=trace`).
        #[arg(long)]
        trace: bool,

        /// Stop after this many ticks.
        #[arg(long)]
        max_ticks: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Eager,
    Demand,
    DemandWithSwap,
}

impl From<PolicyArg> for LoadPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Eager => Self::Eager,
            PolicyArg::Demand => Self::Demand,
            PolicyArg::DemandWithSwap => Self::DemandWithSwap,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            image,
            config,
            policy,
            tlb,
            trace,
            max_ticks,
        } => {
            let mut config = load_config(config).unwrap_or_else(|e| {
                error!("{e}");
                process::exit(1);
            });
            if let Some(policy) = policy {
                config.paging.policy = policy.into();
            }
            if tlb {
                config.memory.translation = TranslationMode::Tlb;
            }
            config.general.trace_instructions |= trace;
            if let Some(max_ticks) = max_ticks {
                config.general.max_ticks = max_ticks;
            }
            process::exit(cmd_run(&image, &config));
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config, mipsim_core::config::ConfigError> {
    match path {
        Some(path) => Config::from_json_file(path),
        None => Ok(Config::default()),
    }
}

/// Runs `image` to completion and returns the process exit code.
fn cmd_run(image: &Path, config: &Config) -> i32 {
    let built = Machine::new(config).and_then(|machine| Ok((machine, Kernel::new(config)?)));
    let (mut machine, mut kernel) = match built {
        Ok(pair) => pair,
        Err(e) => {
            error!("{e}");
            return 1;
        }
    };
    let program = match open_image(image) {
        Ok(program) => program,
        Err(e) => {
            error!(image = %image.display(), "{e}");
            return 1;
        }
    };

    println!(
        "[*] {}  page={}B frames={} translation={:?} policy={:?}",
        image.display(),
        config.memory.page_size,
        config.memory.num_phys_pages,
        config.memory.translation,
        config.paging.policy
    );

    if let Err(e) = kernel.exec(&mut machine, program) {
        error!("cannot start program: {e}");
        return 1;
    }

    let code = match machine.run(&mut kernel) {
        StopReason::Halted(status) => {
            println!("\n[*] Exit status {status}");
            status
        }
        StopReason::TickLimit => {
            println!("\n[!] Tick limit of {} reached", machine.max_ticks);
            machine.dump_state();
            1
        }
    };
    machine.stats.print();
    code
}
