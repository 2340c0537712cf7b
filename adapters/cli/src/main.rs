#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Bead Hunt rounds headlessly.
//!
//! The binary is the composition root standing in for the outer game flow:
//! it resolves a level from the journey catalog, rolls the target
//! trajectory, boots the round through the bootstrap system, then drives it
//! with a fixed simulated timestep and a scripted selection policy while
//! narrating the event stream.

mod catalog;
mod round_code;
mod roulette;
mod settings;

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bead_hunt_core::{BeadId, BeadKind, Command, Event, RoundStatus, RoundTuning};
use bead_hunt_rendering::{compose_scene, render_text, PresentationBackend, Scene};
use bead_hunt_round::{self as round, query, Round};
use bead_hunt_system_analytics::RoundAnalytics;
use bead_hunt_system_bootstrap::Bootstrap;

use catalog::LEVELS_PER_JOURNEY;
use round_code::RoundCode;
use settings::Settings;

// Keeps the roulette's draws independent from the bootstrap streams derived
// from the same seed.
const ROULETTE_STREAM_SALT: u64 = 0x726f_756c_6574_7465;

const TICK: Duration = Duration::from_millis(100);

/// Plays one Bead Hunt round headlessly and prints the outcome.
#[derive(Debug, Parser)]
#[command(name = "bead-hunt")]
struct Args {
    /// One-based journey number from the catalog.
    #[arg(long, default_value_t = 1)]
    journey: u32,
    /// One-based level number within the journey.
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Seed for round generation; defaults to a clock-derived value.
    #[arg(long)]
    seed: Option<u64>,
    /// Shareable round code; overrides --journey, --level and --seed.
    #[arg(long)]
    code: Option<String>,
    /// Scripted selection policy standing in for the player.
    #[arg(long, value_enum, default_value_t = Policy::Spot)]
    policy: Policy,
    /// Full laps the policy watches before acting.
    #[arg(long, default_value_t = 1)]
    patience: u32,
    /// Print a text frame after every simulated tick.
    #[arg(long)]
    frames: bool,
    /// TOML file overriding the round tuning.
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Select the target once enough laps have been watched.
    Spot,
    /// Never select anything and let the countdown run out.
    Never,
    /// Waste two guesses on decoys before spotting the target.
    Fumble,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (journey_number, level_number, seed) = match &args.code {
        Some(code) => {
            let decoded = RoundCode::decode(code).context("invalid round code")?;
            (decoded.journey, decoded.level, decoded.seed)
        }
        None => (args.journey, args.level, args.seed.unwrap_or_else(clock_seed)),
    };

    let journeys = catalog::journeys();
    let journey = journeys
        .iter()
        .find(|journey| journey.number == journey_number)
        .with_context(|| format!("journey {journey_number} does not exist"))?;
    if level_number == 0 || level_number > LEVELS_PER_JOURNEY {
        bail!("journey {journey_number} has levels 1..={LEVELS_PER_JOURNEY}");
    }
    let level = journey
        .level(level_number)
        .context("level could not be built")?;

    let tuning = match &args.settings {
        Some(path) => Settings::load(path)?.apply(RoundTuning::default()),
        None => RoundTuning::default(),
    };

    let mut roulette_rng = ChaCha8Rng::seed_from_u64(seed ^ ROULETTE_STREAM_SALT);
    let target = roulette::roll_target(&mut roulette_rng, &journey.allowed_moves, level.num_moves());

    let setup = Bootstrap::default()
        .build_round(&level, &journey.allowed_moves, target, &journey.symbols, seed)
        .context("level could not be built")?;
    let mut game = Round::new(setup, tuning).context("level could not be built")?;

    println!("{}", query::welcome_banner(&game));
    let share = RoundCode {
        journey: journey_number,
        level: level_number,
        seed,
    };
    println!(
        "journey {journey_number}, level {level_number} — share code {}",
        share.encode()
    );

    let mut analytics = RoundAnalytics::new();
    let mut console = Console;
    let mut player = ScriptedPlayer::new(args.policy, args.patience);
    let mut events = Vec::new();

    round::apply(&mut game, Command::Start, &mut events);
    narrate(&events);
    analytics.handle(&events);

    while query::status(&game) == RoundStatus::Running {
        events.clear();
        round::apply(&mut game, Command::Tick { dt: TICK }, &mut events);
        narrate(&events);
        analytics.handle(&events);
        player.observe(&events);

        if let Some(bead) = player.next_selection(&game) {
            events.clear();
            round::apply(&mut game, Command::Select { bead }, &mut events);
            narrate(&events);
            analytics.handle(&events);
        }

        if args.frames {
            console.present(&scene_of(&game, tuning.total_stars))?;
        }
    }

    console.present(&scene_of(&game, tuning.total_stars))?;
    report(&analytics);
    match query::outcome(&game).and_then(|outcome| outcome.score()) {
        Some(score) => println!("final score: {score} stars"),
        None => println!("final score: none"),
    }
    Ok(())
}

/// Scripted stand-in for the player.
///
/// A demo driver rather than a solver: it reads bead roles straight from
/// the round snapshots, which a presentation layer facing a real player
/// must never do before the reveal.
#[derive(Debug)]
struct ScriptedPlayer {
    policy: Policy,
    patience: u32,
    laps_seen: u32,
    wrong_guesses: u32,
}

impl ScriptedPlayer {
    fn new(policy: Policy, patience: u32) -> Self {
        Self {
            policy,
            patience,
            laps_seen: 0,
            wrong_guesses: 0,
        }
    }

    fn observe(&mut self, events: &[Event]) {
        for event in events {
            if let Event::CycleCompleted { iteration, .. } = event {
                self.laps_seen = self.laps_seen.max(iteration + 1);
            }
        }
    }

    fn next_selection(&mut self, game: &Round) -> Option<BeadId> {
        if self.laps_seen < self.patience {
            return None;
        }
        match self.policy {
            Policy::Never => None,
            Policy::Spot => find_bead(game, BeadKind::Target),
            Policy::Fumble => {
                if self.wrong_guesses < 2 {
                    self.wrong_guesses += 1;
                    find_bead(game, BeadKind::Decoy)
                } else {
                    find_bead(game, BeadKind::Target)
                }
            }
        }
    }
}

fn find_bead(game: &Round, kind: BeadKind) -> Option<BeadId> {
    query::bead_view(game)
        .iter()
        .find(|snapshot| snapshot.kind == kind && !snapshot.hidden)
        .map(|snapshot| snapshot.id)
}

fn scene_of(game: &Round, total_stars: u32) -> Scene {
    let revealed = query::status(game) == RoundStatus::Won;
    compose_scene(
        query::grid(game),
        &query::bead_view(game),
        query::tray_order(game),
        query::stars_remaining(game),
        total_stars,
        revealed,
    )
}

fn narrate(events: &[Event]) {
    for event in events {
        match event {
            Event::RoundStarted => println!("the beads are moving — spot the one!"),
            Event::BeadSelected {
                kind: BeadKind::Decoy,
                ..
            } => println!("wrong bead!"),
            Event::StarConsumed { remaining } => println!("star lost ({remaining} left)"),
            Event::StarRestored { remaining } => {
                println!("last-instant catch — star returned ({remaining} left)")
            }
            Event::RoundWon { score } => println!("spotted it! {score} stars"),
            Event::RoundLost => println!("out of stars"),
            _ => {}
        }
    }
}

fn report(analytics: &RoundAnalytics) {
    let report = analytics.report();
    println!(
        "laps {} | stars consumed {} | wrong guesses {} | {:.1}s watched",
        report.cycles_completed,
        report.stars_consumed,
        report.wrong_guesses,
        report.elapsed.as_secs_f64()
    );
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

struct Console;

impl PresentationBackend for Console {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        print!("{}", render_text(scene));
        Ok(())
    }
}
