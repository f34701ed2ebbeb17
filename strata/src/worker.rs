//! The single background worker thread that drains the request queue and drives the
//! pipeline, and the lightweight statistics it accumulates along the way.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::coord::ChunkCoord;
use crate::pipeline::{GeneratedChunk, Pipeline};
use crate::queue::RequestQueue;
use crate::world::WorldHandle;

/// Lightweight generation statistics, queryable by the owning application for
/// observability. Mirrors the kind of counters a production chunk-generation worker
/// keeps for tuning, without requiring synchronized access.
#[derive(Debug, Default)]
pub struct Stats {
    pub chunks_generated: AtomicU64,
    pub chunks_skipped: AtomicU64,
    pub stage_faults: AtomicU64,
    pub generation_micros: AtomicU64,
}

impl Stats {
    fn record_generation(&self, duration_micros: u64) {
        self.chunks_generated.fetch_add(1, Ordering::Relaxed);
        self.generation_micros.fetch_add(duration_micros, Ordering::Relaxed);
    }

    fn record_skip(&self) {
        self.chunks_skipped.fetch_add(1, Ordering::Relaxed);
    }

    fn record_fault(&self) {
        self.stage_faults.fetch_add(1, Ordering::Relaxed);
    }
}

/// The long-lived state the worker thread owns for its whole run.
pub struct Worker {
    queue: Arc<RequestQueue>,
    pipeline: Arc<Pipeline>,
    world: Arc<dyn WorldHandle>,
    high_water: usize,
    stats: Arc<Stats>,
}

impl Worker {

    pub fn new(
        queue: Arc<RequestQueue>,
        pipeline: Arc<Pipeline>,
        world: Arc<dyn WorldHandle>,
        high_water: usize,
        stats: Arc<Stats>,
    ) -> Self {
        Self { queue, pipeline, world, high_water, stats }
    }

    /// Drain the queue until the stop sentinel is observed.
    pub fn run(self) {
        while let Some(coord) = self.queue.dequeue_blocking() {
            self.handle(coord);
            self.queue.notify_removed();
        }
        debug!("chunk generation worker stopping");
    }

    pub(crate) fn handle(&self, coord: ChunkCoord) {
        let ChunkCoord { x: cx, z: cz } = coord;

        if self.world.is_chunk_available(cx, cz) {
            debug!(cx, cz, "chunk already available, skipping generation");
            return;
        }

        if self.queue.len() > self.high_water && !self.world.any_client_within_view(cx, cz) {
            debug!(cx, cz, queue_len = self.queue.len(), "overloaded and no client interested, skipping");
            self.stats.record_skip();
            return;
        }

        let start = Instant::now();
        match self.pipeline.generate(coord) {
            Ok(chunk) => {
                let elapsed = start.elapsed().as_micros() as u64;
                self.stats.record_generation(elapsed);
                self.deliver(cx, cz, chunk);
            }
            Err(err) => {
                warn!(cx, cz, %err, "stage fault, abandoning chunk");
                self.stats.record_fault();
            }
        }
    }

    fn deliver(&self, cx: i32, cz: i32, chunk: GeneratedChunk) {
        // A sink that panics must not take the worker thread down with it; treat it
        // the same as a stage fault for this chunk.
        let world = &self.world;
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
            world.deliver_chunk(cx, cz, chunk);
        }));
        if result.is_err() {
            warn!(cx, cz, "sink panicked while delivering chunk, treating as stage fault");
            self.stats.record_fault();
        }
    }
}

#[cfg(test)]
mod tests {

    use std::sync::Mutex;
    use std::thread;

    use super::*;
    use crate::chunk::BiomeMap;
    use crate::config::{MapConfigView, PipelineConfig};
    use crate::error::StageError;
    use crate::gen::composition::ClassicCompositionGen;
    use crate::gen::height::FlatHeightGen;
    use crate::stage::BiomeGen;

    struct FakeWorld {
        available: Vec<(i32, i32)>,
        clients_watching: Vec<(i32, i32)>,
        delivered: Mutex<Vec<(i32, i32)>>,
    }

    impl WorldHandle for FakeWorld {
        fn is_chunk_available(&self, cx: i32, cz: i32) -> bool {
            self.available.contains(&(cx, cz))
        }

        fn any_client_within_view(&self, cx: i32, cz: i32) -> bool {
            self.clients_watching.contains(&(cx, cz))
        }

        fn deliver_chunk(&self, cx: i32, cz: i32, _chunk: GeneratedChunk) {
            self.delivered.lock().unwrap().push((cx, cz));
        }
    }

    fn s1_pipeline() -> Arc<Pipeline> {
        let mut view = MapConfigView::new();
        view.set("biome_gen", "Constant:plains")
            .set("height_gen", "Flat:64")
            .set("composition_gen", "Classic")
            .set("seed", "1");
        let config = PipelineConfig::from_view(&view).unwrap();
        Arc::new(Pipeline::from_config(&config).unwrap())
    }

    #[test]
    fn already_available_chunk_is_not_delivered() {
        let queue = Arc::new(RequestQueue::new());
        let world = Arc::new(FakeWorld { available: vec![(0, 0)], clients_watching: vec![], delivered: Mutex::new(Vec::new()) });
        let stats = Arc::new(Stats::default());
        let worker = Worker::new(Arc::clone(&queue), s1_pipeline(), world.clone(), 64, stats);

        worker.handle(ChunkCoord::new(0, 0));
        assert!(world.delivered.lock().unwrap().is_empty());
    }

    #[test]
    fn overloaded_chunk_with_no_client_is_skipped() {
        let queue = Arc::new(RequestQueue::new());
        let world = Arc::new(FakeWorld { available: vec![], clients_watching: vec![], delivered: Mutex::new(Vec::new()) });
        let stats = Arc::new(Stats::default());
        // Push a few extra entries so the queue length exceeds a high_water of 0.
        queue.enqueue(ChunkCoord::new(9, 9));
        let worker = Worker::new(Arc::clone(&queue), s1_pipeline(), world.clone(), 0, stats.clone());

        worker.handle(ChunkCoord::new(1, 1));
        assert!(world.delivered.lock().unwrap().is_empty());
        assert_eq!(stats.chunks_skipped.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn normal_chunk_is_generated_and_delivered() {
        let queue = Arc::new(RequestQueue::new());
        let world = Arc::new(FakeWorld { available: vec![], clients_watching: vec![], delivered: Mutex::new(Vec::new()) });
        let stats = Arc::new(Stats::default());
        let worker = Worker::new(Arc::clone(&queue), s1_pipeline(), world.clone(), 64, stats.clone());

        worker.handle(ChunkCoord::new(0, 0));
        assert_eq!(*world.delivered.lock().unwrap(), vec![(0, 0)]);
        assert_eq!(stats.chunks_generated.load(Ordering::Relaxed), 1);
    }

    struct FailingBiomeGen;

    impl BiomeGen for FailingBiomeGen {
        fn gen_biomes(&self, cx: i32, cz: i32) -> Result<BiomeMap, StageError> {
            Err(StageError::new("test_biome_gen", cx, cz, "intentional test failure"))
        }
    }

    #[test]
    fn stage_fault_is_recorded_and_not_delivered() {
        let queue = Arc::new(RequestQueue::new());
        let world = Arc::new(FakeWorld { available: vec![], clients_watching: vec![], delivered: Mutex::new(Vec::new()) });
        let stats = Arc::new(Stats::default());
        let pipeline = Arc::new(Pipeline::assemble(
            1,
            Box::new(FailingBiomeGen),
            Box::new(FlatHeightGen::new(64)),
            Box::new(ClassicCompositionGen),
            Vec::new(),
            Vec::new(),
        ));
        let worker = Worker::new(Arc::clone(&queue), pipeline, world.clone(), 64, stats.clone());

        worker.handle(ChunkCoord::new(0, 0));
        assert!(world.delivered.lock().unwrap().is_empty());
        assert_eq!(stats.stage_faults.load(Ordering::Relaxed), 1);
        assert_eq!(stats.chunks_generated.load(Ordering::Relaxed), 0);
    }

    struct PanickingWorld;

    impl WorldHandle for PanickingWorld {
        fn is_chunk_available(&self, _cx: i32, _cz: i32) -> bool {
            false
        }

        fn any_client_within_view(&self, _cx: i32, _cz: i32) -> bool {
            true
        }

        fn deliver_chunk(&self, _cx: i32, _cz: i32, _chunk: GeneratedChunk) {
            panic!("sink always panics in this test");
        }
    }

    #[test]
    fn sink_panic_is_contained_and_recorded_as_a_fault() {
        let queue = Arc::new(RequestQueue::new());
        let world = Arc::new(PanickingWorld);
        let stats = Arc::new(Stats::default());
        let worker = Worker::new(Arc::clone(&queue), s1_pipeline(), world, 64, stats.clone());

        worker.handle(ChunkCoord::new(0, 0));
        assert_eq!(stats.chunks_generated.load(Ordering::Relaxed), 1);
        assert_eq!(stats.stage_faults.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn worker_thread_joins_cleanly() {
        let queue = Arc::new(RequestQueue::new());
        let world = Arc::new(FakeWorld { available: vec![], clients_watching: vec![], delivered: Mutex::new(Vec::new()) });
        let stats = Arc::new(Stats::default());
        let worker = Worker::new(Arc::clone(&queue), s1_pipeline(), world, 64, stats);

        let handle = thread::Builder::new().name("test worker".into()).spawn(move || worker.run()).unwrap();
        queue.enqueue(ChunkCoord::new(2, 2));
        queue.shutdown();
        handle.join().unwrap();
    }
}
