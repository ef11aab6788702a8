use anyhow::{ensure, Result};
use clap::Parser;
use log::{error, info};

use safe_follow::simulation::{
    Leaderboard, PedalInput, ResultSink, ScriptedDriver, Session, SessionConfig, TailgaterConfig,
    Weather,
};

#[derive(Parser)]
#[command(name = "safe_follow")]
#[command(about = "Safe following distance simulation, run headless")]
struct Cli {
    /// Maximum number of simulation ticks per session
    #[arg(long, default_value = "3000")]
    ticks: u32,

    /// Time delta per tick in seconds (clamped to 0.1 by the simulation)
    #[arg(long, default_value = "0.05")]
    delta: f32,

    /// Seed for reproducible sessions; session n uses seed + n
    #[arg(long)]
    seed: Option<u64>,

    /// Road conditions
    #[arg(long, value_enum, default_value_t = Weather::Clear)]
    weather: Weather,

    /// Let a tailgater appear behind the player
    #[arg(long)]
    tailgater: bool,

    /// Number of sessions to play back to back
    #[arg(long, default_value = "1")]
    sessions: u32,

    /// Gap the scripted driver keeps, as a multiple of the safe distance
    #[arg(long, default_value = "1.2")]
    follow_factor: f32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run_headless(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Play the configured sessions with the scripted driver
fn run_headless(cli: &Cli) -> Result<()> {
    ensure!(
        cli.delta.is_finite() && cli.delta > 0.0,
        "delta must be a positive number of seconds"
    );
    ensure!(cli.follow_factor > 0.0, "follow factor must be positive");

    info!(
        "Running {} session(s) headless: ticks={} delta={}s weather={}",
        cli.sessions,
        cli.ticks,
        cli.delta,
        cli.weather.label()
    );

    let driver = ScriptedDriver::new(cli.follow_factor);
    let mut leaderboard = Leaderboard::default();

    for n in 0..cli.sessions {
        let mut config = SessionConfig::default().with_weather(cli.weather);
        if let Some(seed) = cli.seed {
            config = config.with_seed(seed.wrapping_add(u64::from(n)));
        }
        if cli.tailgater {
            config = config.with_tailgater(TailgaterConfig::default());
        }

        let mut session = Session::new(config)?;
        println!("--- Session {} ---", n + 1);
        run_session(&mut session, &driver, cli.ticks, cli.delta);
        session.log_summary();
        leaderboard.record(session.result());
    }

    info!("=== LEADERBOARD ===");
    for (rank, entry) in leaderboard.entries().enumerate() {
        info!(
            "#{} score={} distance={:.3} km{}",
            rank + 1,
            entry.score,
            entry.distance_km.into_inner(),
            if entry.crashed { " (crashed)" } else { "" }
        );
    }

    Ok(())
}

fn run_session(session: &mut Session, driver: &ScriptedDriver, ticks: u32, delta: f32) {
    let traction = session.traction();
    let mut input = PedalInput::new();

    // Calculate how many ticks equal 1 second of simulation time
    let ticks_per_second = (1.0 / delta).ceil().max(1.0) as u32;

    for tick in 1..=ticks {
        let command = driver.step(
            &mut input,
            session.distance(),
            session.player().velocity(),
            traction,
            delta,
        );
        session.tick(delta, command, traction);

        if tick % ticks_per_second == 0 {
            session.print_status();
        }
        if session.is_over() {
            session.print_status();
            break;
        }
    }
}
