//! A small standalone demonstration of `strata`: an in-memory world handle, a
//! generator wired from a hand-built config view, and a grid of chunks requested
//! around a couple of simulated players.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use strata::{GeneratedChunk, Generator, MapConfigView, WorldHandle};

const VIEW_DISTANCE: i32 = 6;

/// A toy world: no persistence, no networking, just a set of chunks considered
/// "loaded" and a couple of fixed player positions used for view-distance checks.
struct InMemoryWorld {
    available: Mutex<HashSet<(i32, i32)>>,
    players: Vec<(i32, i32)>,
}

impl InMemoryWorld {
    fn new(players: Vec<(i32, i32)>) -> Self {
        Self { available: Mutex::new(HashSet::new()), players }
    }
}

impl WorldHandle for InMemoryWorld {
    fn is_chunk_available(&self, cx: i32, cz: i32) -> bool {
        self.available.lock().unwrap().contains(&(cx, cz))
    }

    fn any_client_within_view(&self, cx: i32, cz: i32) -> bool {
        self.players.iter().any(|&(px, pz)| (px - cx).abs() <= VIEW_DISTANCE && (pz - cz).abs() <= VIEW_DISTANCE)
    }

    fn deliver_chunk(&self, cx: i32, cz: i32, chunk: GeneratedChunk) {
        info!(cx, cz, entities = chunk.entities.len(), "chunk delivered");
        self.available.lock().unwrap().insert((cx, cz));
    }
}

fn demo_config() -> MapConfigView {
    let mut view = MapConfigView::new();
    view.set("seed", "1173")
        .set("biome_gen", "Climate")
        .set("height_gen", "Climate")
        .set("composition_gen", "Layered")
        .set("structures", "Vein:coal_ore:20:8:0:128, Vein:iron_ore:16:6:0:64, Vein:gold_ore:8:4:0:32")
        .set("finishers", "Decorate:6:10")
        .set("high_water", "128");
    view
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("strata_demo=info".parse()?))
        .init();

    let world = Arc::new(InMemoryWorld::new(vec![(0, 0), (20, -15)]));
    let generator = Arc::new(Generator::start(world, &demo_config())?);
    info!(seed = generator.seed(), "generator started");

    let stop_requested = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&stop_requested);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst))?;

    for cx in -8..8 {
        for cz in -8..8 {
            generator.queue_generate_chunk(cx, 0, cz);
        }
    }

    while generator.queue_length() > 0 && !stop_requested.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(20));
    }
    let stats = generator.stats_snapshot();
    info!(
        generated = stats.chunks_generated,
        skipped = stats.chunks_skipped,
        faults = stats.stage_faults,
        micros = stats.generation_micros,
        "batch complete"
    );

    let sample_biome = generator.biome_at(8, 8)?;
    info!(?sample_biome, "biome at spawn");

    generator.stop();
    Ok(())
}
