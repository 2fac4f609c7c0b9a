use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use padroute::{EngineHandle, RouterConfig, SceneRouter, engine, midi};
use tracing_subscriber::EnvFilter;

/// Routes a Launchpad grid controller to and from a sequencing host.
#[derive(Parser, Debug)]
#[command(name = "padroute")]
#[command(about = "Launchpad scene router")]
struct Args {
    /// RON router configuration; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scene to start in, overriding the configuration
    #[arg(short, long)]
    scene: Option<u8>,

    /// Print the available MIDI ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Print the effective configuration as RON and exit
    #[arg(long)]
    dump_config: bool,

    /// Debug logging unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &args.config {
        Some(path) => RouterConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RouterConfig::default(),
    };
    if let Some(scene) = args.scene {
        config.initial_scene = Some(scene);
    }

    if args.dump_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    if args.list_ports {
        let listing = midi::list_ports(&config.client_name)?;
        println!("inputs:");
        for name in &listing.inputs {
            println!("  {name}");
        }
        println!("outputs:");
        for name in &listing.outputs {
            println!("  {name}");
        }
        return Ok(());
    }

    let router = Arc::new(padroute::build_router(&config)?);
    let backend = midi::open(&config).context("opening midi ports")?;
    let mut reset_sink = backend.sink.clone();
    if config.reset_pad_on_start {
        engine::reset_pad(&mut reset_sink)?;
    }

    let inputs: Vec<_> = backend.inputs.ports().collect();
    tracing::info!(?inputs, switch = ?router.switch_mode(), "router running");

    let handle = engine::spawn_engine(router.clone(), backend.source, backend.sink)?;
    console(&router, &handle);

    backend.inputs.close();
    match handle.join() {
        Ok(stats) => tracing::info!(?stats, "router stopped"),
        Err(_) => tracing::error!("engine thread panicked"),
    }

    if config.reset_pad_on_start {
        engine::reset_pad(&mut reset_sink)?;
    }
    Ok(())
}

/// Reads scene commands from stdin until `q`, end of input, or the engine stops.
fn console(router: &SceneRouter, engine: &EngineHandle) {
    println!("scenes:");
    for (id, scene) in router.registry().iter() {
        println!("  {id}: {}", scene.name);
    }
    println!("number = select scene, n = next scene, q = quit");

    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        if engine.is_finished() {
            tracing::warn!("engine stopped, leaving console");
            break;
        }
        match line.trim() {
            "" => {}
            "q" => break,
            "n" => {
                router.next_scene();
            }
            other => match other.parse::<u8>() {
                Ok(id) => {
                    if let Err(warning) = router.select(id) {
                        tracing::warn!(%warning, "keeping current scene");
                    }
                }
                Err(_) => println!("unknown command {other:?}"),
            },
        }
    }
}
