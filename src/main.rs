mod term;

use std::collections::VecDeque;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use clap::{Parser, Subcommand};
use frutin::{report, Cues, GameConfiguration, LogCues, Result, Session, Variant};
use rand::{rngs::StdRng, SeedableRng};
use simplelog::{LevelFilter, WriteLogger};

use term::{Input, TerminalBell, TerminalUi};

#[derive(Parser)]
#[command(name = "frutin")]
#[command(about = "Collect the fruit before the clock runs out")]
struct Cli {
    /// Write a debug log (the game screen takes over the terminal)
    #[arg(long, global = true)]
    debug: bool,
    /// Where the debug log goes
    #[arg(long, global = true, default_value = "frutin.log")]
    log_file: PathBuf,
    /// TOML file overriding the default game settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play in the terminal
    Play {
        /// Let the greedy walker play instead of the keyboard
        #[arg(long)]
        greedy: bool,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run greedy games without a screen and write the results as CSV
    Bench {
        #[arg(long, default_value_t = 100)]
        runs: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// CSV destination, stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.debug {
        setup_logging(&cli.log_file)?;
    }
    let configuration = match &cli.config {
        Some(path) => GameConfiguration::load(path)?,
        None => GameConfiguration::default(),
    };

    match cli.command {
        Commands::Play { greedy, seed } => {
            let variant = if greedy { Variant::Greedy } else { Variant::Interactive };
            play(configuration, variant, seed)
        },
        Commands::Bench { runs, seed, out } => bench(&configuration, runs, seed, out.as_deref()),
    }
}

fn setup_logging(path: &Path) -> Result<()> {
    WriteLogger::init(
        LevelFilter::Debug,
        simplelog::ConfigBuilder::new()
            .set_target_level(LevelFilter::Error)
            .build(),
        File::create(path)?,
    )?;
    Ok(())
}

fn play(configuration: GameConfiguration, variant: Variant, seed: Option<u64>) -> Result<()> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    // The greedy walker plays silently.
    let cues: Box<dyn Cues> = match variant {
        Variant::Interactive => Box::new(TerminalBell),
        Variant::Greedy => Box::new(LogCues),
    };
    let mut session = Session::new(configuration, variant.policy(), cues, rng)?;
    let frame = term::frame_duration(session.configuration().tick_rate);
    let end_delay = session.configuration().end_delay();

    let mut ui = TerminalUi::enter()?;
    let mut pending = VecDeque::new();
    ui.draw(&session)?;
    loop {
        for input in term::read_inputs(Instant::now() + frame)? {
            match input {
                Input::Quit => {
                    log::info!("Quit after {} ticks", session.ticks());
                    return Ok(());
                },
                Input::Move(movement) if variant == Variant::Interactive => pending.push_back(movement),
                Input::Move(_) => {},
            }
        }

        session.tick(pending.pop_front());
        ui.draw(&session)?;

        if session.state().is_terminal() {
            ui.draw_end(&session)?;
            thread::sleep(end_delay);
            return Ok(());
        }
    }
}

fn bench(configuration: &GameConfiguration, runs: usize, seed: u64, out: Option<&Path>) -> Result<()> {
    let records = report::run_greedy_batch(configuration, runs, seed)?;
    match out {
        Some(path) => report::write_csv(&records, File::create(path)?)?,
        None => report::write_csv(&records, io::stdout())?,
    }
    let summary = report::summarize(&records);
    eprintln!(
        "{} runs: {} won, mean score {:.1}, mean ticks {:.1}",
        summary.runs, summary.wins, summary.mean_score, summary.mean_ticks
    );
    Ok(())
}
