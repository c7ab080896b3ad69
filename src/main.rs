//! Painted Gallery - headless playthrough
//!
//! Walks up to the first painting, paints every sprite with whatever colors
//! the inventory allows, locks in, lets the chaos phase run, walks back out
//! and prints what happened.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;

use painted_gallery::color::ColorType;
use painted_gallery::core::error::Result;
use painted_gallery::core::GameConfig;
use painted_gallery::mode::ModeEvent;
use painted_gallery::npc::NpcEvent;
use painted_gallery::painting::WorldEvent;
use painted_gallery::session::{GameSession, SessionEvent};

/// Frame step for the scripted run
const FRAME: f32 = 1.0 / 50.0;

/// Headless Painted Gallery run
#[derive(Parser, Debug)]
#[command(name = "painted-gallery")]
#[command(about = "Run a scripted playthrough of one painting and report the outcome")]
struct Args {
    /// TOML config file; built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the session seed
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds of chaos phase to simulate
    #[arg(long, default_value_t = 10.0)]
    chaos_seconds: f32,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Log every state change
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "painted_gallery=debug"
    } else {
        "painted_gallery=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.session.seed = seed;
    }

    let mut session = GameSession::new(config)?;
    session.subscribe(|event| match event {
        ModeEvent::StateChanged(mode) => tracing::debug!(%mode, "Mode changed"),
        ModeEvent::EnteredPainting { painting, .. } => tracing::debug!(?painting, "Entered painting"),
        ModeEvent::ExitedPainting(painting) => tracing::debug!(?painting, "Exited painting"),
    });

    let Some(first) = session.config().paintings.first() else {
        tracing::warn!("No paintings configured; nothing to play");
        return Ok(());
    };
    let portal = first.portal.center();
    let targets: Vec<Vec2> = first.paintables.iter().map(|p| Vec2::from(p.position)).collect();

    session.walk_gallery(portal);
    if session.interact().is_none() {
        tracing::warn!("Could not enter the painting from its portal");
    }
    run(&mut session, 1.0);

    paint_everything(&mut session, &targets);
    session.lock_in();

    session.set_move_input(Vec2::X);
    run(&mut session, args.chaos_seconds);
    session.set_move_input(Vec2::ZERO);

    session.exit_painting();
    run(&mut session, 1.0);

    let events = session.drain_events();
    let deaths = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                SessionEvent::World {
                    event: WorldEvent::Npc { event: NpcEvent::Died, .. },
                    ..
                }
            )
        })
        .count();
    tracing::info!(events = events.len(), deaths, "Playthrough finished");

    let summary = session.summary();
    match args.format.as_str() {
        "json" => println!("{}", summary.to_json()),
        _ => println!("{}", summary.to_text()),
    }
    Ok(())
}

/// One color per sprite, taking the first color the inventory still holds
fn paint_everything(session: &mut GameSession, targets: &[Vec2]) {
    let preference = [
        ColorType::Black,
        ColorType::Green,
        ColorType::Red,
        ColorType::Blue,
        ColorType::Yellow,
    ];
    for target in targets {
        let Some(color) = preference
            .iter()
            .copied()
            .find(|c| session.inventory().has_any(*c))
        else {
            break;
        };
        session.select_color(color);
        if session.paint(*target).is_none() {
            tracing::debug!(?target, %color, "Paint rejected");
        }
        session.select_color(ColorType::None);
    }
}

fn run(session: &mut GameSession, seconds: f32) {
    let frames = (seconds / FRAME).ceil() as usize;
    for _ in 0..frames {
        session.tick(FRAME);
    }
}
