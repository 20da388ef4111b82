//! blk66-demo entry point.
//!
//! ```text
//! blk66-demo block eligible-start --seq 0x12345   Print one block
//! blk66-demo block control --message nack --seq 7
//! blk66-demo dic --length 65 --counter 3           One DIC step
//! blk66-demo simulate --frames 32 --seed 1         Random frame stream
//! blk66-demo play                                  Interactive walkthrough
//! blk66-demo --gen-config                          Write default config to stdout
//! ```

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use blk66_core::dic::calculate;
use blk66_core::format::{parse_data_bytes, render_block, render_block_styled};
use blk66_core::sample::random_frame_lengths;
use blk66_core::{
    ControlKind, ProtocolBlock, control_block_masked, data_block, eligible_start_block,
    idle_block, ineligible_start_block, terminate_block,
};

use blk66_demo::config::DemoConfig;
use blk66_demo::player;
use blk66_demo::walkthrough::{Step, Walkthrough};

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "blk66-demo", about = "64/66B block and DIC walkthrough")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "blk66.toml", global = true)]
    config: PathBuf,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Disable coloured output.
    #[arg(long, global = true)]
    no_color: bool,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Print a single block.
    Block {
        kind: BlockKind,
        /// Frame sequence number (eligible-start, control).
        #[arg(long, default_value = "0", value_parser = parse_number)]
        seq: u64,
        /// /T/ position (terminate).
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        pos: i64,
        /// Init data (control).
        #[arg(long, default_value = "0", value_parser = parse_number)]
        payload: u64,
        /// Eight hex bytes (data); placeholders when omitted.
        #[arg(long)]
        bytes: Option<String>,
        /// Message kind (control): ack, nack, init, init_echo.
        #[arg(long, default_value = "ack")]
        message: ControlKind,
    },
    /// Evaluate one DIC step.
    Dic {
        /// Frame length in bytes.
        #[arg(long)]
        length: u64,
        /// Current DIC register (0-3).
        #[arg(long, default_value_t = 0)]
        counter: u8,
        /// Nominal IPG; defaults to the configured value.
        #[arg(long)]
        gap: Option<u32>,
    },
    /// Run a random frame stream through the DIC register.
    Simulate {
        #[arg(long)]
        frames: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        min: Option<u64>,
        #[arg(long)]
        max: Option<u64>,
    },
    /// Step through a random frame stream interactively.
    Play {
        #[arg(long)]
        frames: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BlockKind {
    EligibleStart,
    IneligibleStart,
    Data,
    Idle,
    Terminate,
    Control,
}

/// Decimal or `0x`-prefixed hex.
fn parse_number(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid number {s:?}: {e}"))
}

// ── Helpers ──────────────────────────────────────────────────────

fn print_block(block: &ProtocolBlock, json: bool, color: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(block)?);
    } else if color {
        println!("{}", render_block_styled(block));
    } else {
        println!("{}", render_block(block));
    }
    Ok(())
}

/// Frame lengths for `simulate` / `play`, after CLI overrides.
fn frame_stream(config: &DemoConfig) -> Vec<u64> {
    let sim = &config.simulation;
    let mut rng = match config.seed() {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    debug!(frames = sim.frames, seed = ?config.seed(), "generating frame stream");
    random_frame_lengths(&mut rng, sim.frames, sim.min_length, sim.max_length)
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        println!("{}", DemoConfig::default_toml()?);
        return Ok(());
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // Load config. Any fallback is logged once tracing is up.
    let (mut config, fallback) = DemoConfig::load(&cli.config);

    // Init tracing. Stdout carries the walkthrough itself.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(fallback) = &fallback {
        fallback.log(&cli.config);
    }
    debug!("blk66-demo v{}", env!("CARGO_PKG_VERSION"));
    let color = config.display.color && !cli.no_color;

    match command {
        Mode::Block {
            kind,
            seq,
            pos,
            payload,
            bytes,
            message,
        } => {
            let seq = seq as u32;
            let block = match kind {
                BlockKind::EligibleStart => eligible_start_block(seq),
                BlockKind::IneligibleStart => ineligible_start_block(),
                BlockKind::Data => data_block(bytes.as_deref().map(parse_data_bytes).transpose()?),
                BlockKind::Idle => idle_block(),
                BlockKind::Terminate => terminate_block(pos),
                BlockKind::Control => control_block_masked(message, seq, payload as u32),
            };
            print_block(&block, cli.json, color)?;
        }

        Mode::Dic {
            length,
            counter,
            gap,
        } => {
            let result = calculate(length, counter, gap.unwrap_or(config.dic.nominal_gap));
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("terminate position : {}", result.terminate_position);
                println!("deficit            : {}", result.deficit);
                println!("DIC                : {counter} -> {}", result.new_counter);
                println!("overflowed         : {}", result.overflowed);
                println!("gap adjustment     : +{}", result.gap_adjustment);
                println!("effective IPG      : {}", result.effective_gap);
            }
        }

        Mode::Simulate {
            frames,
            seed,
            min,
            max,
        } => {
            let sim = &mut config.simulation;
            sim.frames = frames.unwrap_or(sim.frames);
            sim.seed = seed.unwrap_or(sim.seed);
            sim.min_length = min.unwrap_or(sim.min_length);
            sim.max_length = max.unwrap_or(sim.max_length);

            let mut walk = Walkthrough::new(frame_stream(&config), config.dic_counter());
            let steps: Vec<Step> = walk.by_ref().collect();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&steps)?);
            } else {
                for step in &steps {
                    println!("{}", step.describe());
                }
                println!("{}", walk.summary());
            }
            info!(frames = steps.len(), "simulation finished");
        }

        Mode::Play { frames, seed } => {
            let sim = &mut config.simulation;
            sim.frames = frames.unwrap_or(sim.frames);
            sim.seed = seed.unwrap_or(sim.seed);

            let walk = Walkthrough::new(frame_stream(&config), config.dic_counter());
            player::play(walk, config.interval(), config.animation.speed, color).await?;
        }
    }

    Ok(())
}
