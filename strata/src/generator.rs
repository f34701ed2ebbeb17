//! The public facade: `Generator::start`/`stop`, the request-queueing API, and the
//! direct (same-thread, queue-bypassing) biome query API.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::info;

use crate::biome::Biome;
use crate::chunk::BiomeMap;
use crate::config::ConfigView;
use crate::coord::ChunkCoord;
use crate::error::{GeneratorError, StageError};
use crate::pipeline::Pipeline;
use crate::queue::RequestQueue;
use crate::world::WorldHandle;
use crate::worker::{Stats, Worker};

/// The chunk generator: owns the request queue, the assembled pipeline, and the
/// single background worker thread that drains the queue against a [`WorldHandle`].
///
/// Not a global singleton — owned per-world by the caller.
pub struct Generator {
    queue: Arc<RequestQueue>,
    pipeline: Arc<Pipeline>,
    stats: Arc<Stats>,
    worker_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Generator {

    /// Assemble the pipeline from `config` and spawn the single background worker
    /// thread against `world`. Returns `InvalidConfig`/`OutOfResources` if the
    /// configuration doesn't name valid stages.
    pub fn start(world: Arc<dyn WorldHandle>, config: &dyn ConfigView) -> Result<Self, GeneratorError> {
        let resolved = crate::config::PipelineConfig::from_view(config)?;
        let high_water = resolved.high_water;
        let pipeline = Arc::new(Pipeline::from_config(&resolved)?);
        let queue = Arc::new(RequestQueue::new());
        let stats = Arc::new(Stats::default());

        let worker = Worker::new(Arc::clone(&queue), Arc::clone(&pipeline), world, high_water, Arc::clone(&stats));

        let worker_handle = thread::Builder::new()
            .name("chunk-generation-worker".into())
            .spawn(move || worker.run())
            .map_err(|err| GeneratorError::OutOfResources(err.to_string()))?;

        info!(seed = pipeline.seed(), high_water, "chunk generator started");

        Ok(Self { queue, pipeline, stats, worker_handle: Mutex::new(Some(worker_handle)) })
    }

    /// Enqueue a chunk for background generation. `y` is accepted for API
    /// compatibility with callers still passing a 3D position, and is ignored —
    /// generation is purely columnar. A no-op once `stop` has been called.
    pub fn queue_generate_chunk(&self, x: i32, _y: i32, z: i32) {
        self.queue.enqueue(ChunkCoord::from((x, z)));
    }

    /// Block until the queue is empty (or shutdown is signaled).
    pub fn wait_for_queue_empty(&self) {
        self.queue.wait_until_empty();
    }

    /// Current pending-request count. May be stale by the time it's read.
    pub fn queue_length(&self) -> usize {
        self.queue.len()
    }

    /// The pipeline's seed.
    pub fn seed(&self) -> i64 {
        self.pipeline.seed()
    }

    /// Run the biome stage synchronously on the caller's thread, bypassing the queue
    /// entirely. Safe to call concurrently with itself and with worker activity.
    pub fn generate_biomes(&self, x: i32, z: i32) -> Result<BiomeMap, StageError> {
        self.pipeline.generate_biomes(ChunkCoord::new(x, z))
    }

    /// Convert a world-block column to a biome tag.
    pub fn biome_at(&self, block_x: i32, block_z: i32) -> Result<Biome, StageError> {
        self.pipeline.biome_at(block_x, block_z)
    }

    /// A snapshot of the worker's lightweight generation counters.
    pub fn stats_snapshot(&self) -> GeneratorStats {
        GeneratorStats {
            chunks_generated: self.stats.chunks_generated.load(Ordering::Relaxed),
            chunks_skipped: self.stats.chunks_skipped.load(Ordering::Relaxed),
            stage_faults: self.stats.stage_faults.load(Ordering::Relaxed),
            generation_micros: self.stats.generation_micros.load(Ordering::Relaxed),
        }
    }

    /// Cooperatively stop the worker: release any blocked dequeue/wait callers,
    /// discard pending requests, and join the worker thread. Idempotent and safe to
    /// call from any thread other than the worker itself.
    pub fn stop(&self) {
        self.queue.shutdown();
        if let Some(handle) = self.worker_handle.lock().unwrap().take() {
            // Only reachable the first time `stop` actually had a thread to join;
            // subsequent calls find `None` here and are a no-op, which is what makes
            // this idempotent.
            let _ = handle.join();
            info!("chunk generator stopped");
        }
    }
}

impl Drop for Generator {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A point-in-time snapshot of the worker's generation counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorStats {
    pub chunks_generated: u64,
    pub chunks_skipped: u64,
    pub stage_faults: u64,
    pub generation_micros: u64,
}
