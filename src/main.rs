//! Flappy Evo - CLI entry point.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use flappy_evo::config::RunConfig;
use flappy_evo::game::flappy::{FlappyGame, OBSERVATION_SIZE};
use flappy_evo::neat::snapshot::PopulationSnapshot;
use flappy_evo::{EpisodeRunner, NeatError, Population};

#[derive(Parser)]
#[command(name = "flappy-evo")]
#[command(version)]
#[command(about = "Evolves feed-forward networks to play a headless flappy-bird game")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evolve a population
    Run {
        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of generations, overrides the config
        #[arg(short, long)]
        generations: Option<u32>,

        /// Frame cutoff per episode, overrides the config
        #[arg(short, long)]
        max_frames: Option<u32>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Continue from a saved population
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Write the final population to this file
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },

    /// Write the default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "flappy.json")]
        output: PathBuf,
    },

    /// Summarize a saved population
    Inspect {
        /// Snapshot file
        snapshot: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            generations,
            max_frames,
            seed,
            resume,
            snapshot,
        } => run(config, generations, max_frames, seed, resume, snapshot),
        Commands::Init { output } => init(output),
        Commands::Inspect { snapshot } => inspect(snapshot),
    }
}

fn run(
    config_path: Option<PathBuf>,
    generations: Option<u32>,
    max_frames: Option<u32>,
    seed: Option<u64>,
    resume: Option<PathBuf>,
    snapshot: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match config_path {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            RunConfig::from_json_file(path)?
        }
        None => RunConfig::default(),
    };
    if let Some(generations) = generations {
        config.generations = generations;
    }
    if let Some(max_frames) = max_frames {
        config.max_frames = max_frames;
    }
    config.validate()?;

    let seed = seed.or(config.seed).unwrap_or_else(rand::random);
    log::info!("using seed {seed}");

    let mut population = match resume {
        Some(path) => {
            let saved = PopulationSnapshot::load_from_file(&path)?;
            if saved.config.input_size != OBSERVATION_SIZE {
                return Err(NeatError::DimensionMismatch {
                    expected: OBSERVATION_SIZE,
                    actual: saved.config.input_size,
                }
                .into());
            }
            log::info!(
                "resuming generation {} from {} (saved {})",
                saved.generation,
                path.display(),
                saved.saved_at
            );
            saved.into_population(seed)?
        }
        None => Population::with_seed(config.neat.clone(), seed)?,
    };

    let mut game = FlappyGame::new(config.game.clone(), seed.wrapping_add(1))?;
    let runner = EpisodeRunner::new(config.max_frames);

    let start = Instant::now();
    let mut best_score = 0.0f32;
    for _ in 0..config.generations {
        let report = runner.run_generation(&mut population, &mut game)?;
        best_score = best_score.max(report.best_score);
    }
    let elapsed = start.elapsed();

    println!();
    println!("=== Evolution Complete ===");
    println!("Generations: {}", config.generations);
    println!("Current generation: {}", population.generation());
    println!("Best score: {best_score:.0} frames");
    println!("Time: {:.2}s", elapsed.as_secs_f64());

    if let Some(path) = snapshot {
        PopulationSnapshot::capture(&population).save_to_file(&path)?;
        println!("Population saved to {}", path.display());
    }

    Ok(())
}

fn init(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    RunConfig::default().save_to_file(&output)?;
    println!("Default configuration written to {}", output.display());
    Ok(())
}

fn inspect(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = PopulationSnapshot::load_from_file(&path)?;

    println!("=== Population Snapshot ===");
    println!("Saved at: {}", snapshot.saved_at);
    println!("Generation: {}", snapshot.generation);
    println!("Ranked: {}", snapshot.ranked);
    println!(
        "Topology: {}-{}-{}",
        snapshot.config.input_size, snapshot.config.hidden_size, snapshot.config.output_size
    );
    println!("Members: {}", snapshot.members.len());
    println!("Mutation rate: {}", snapshot.config.mutation_rate);

    if let Some(best) = snapshot.members.first() {
        println!("First member fitness: {:.1}", best.fitness());
        println!("First member score: {:.1}", best.score());
        println!("Parameters per network: {}", best.parameter_count());
    }

    Ok(())
}
