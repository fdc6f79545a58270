//! Per-worker reaction engine pool.
//!
//! Each worker owns exactly one engine, created on that worker's first
//! request and reused for every later evaluation. The pool map lock is held
//! only long enough to fetch a worker's slot; the slot's own mutex guards
//! the one-time construction and each `calculate` call, so workers never
//! block on each other once their engines exist.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use az_core::{EngineFactory, Error, ReactionEngine, Result, WorkerId};

type Slot<E> = Arc<Mutex<Option<E>>>;

/// Next identity handed to a rayon thread. `0` is reserved for the default worker.
static NEXT_WORKER: AtomicUsize = AtomicUsize::new(1);

thread_local! {
    static THREAD_WORKER: WorkerId = WorkerId(NEXT_WORKER.fetch_add(1, Ordering::Relaxed));
}

/// Worker running the current code.
///
/// Every rayon thread gets its own process-wide identity (starting at 1) the
/// first time it asks, so threads of different pools never share one.
/// Outside a rayon pool this is the default worker `WorkerId(0)`; that is a
/// normal case, not an error.
pub fn current_worker() -> WorkerId {
    match rayon::current_thread_index() {
        Some(_) => THREAD_WORKER.with(|w| *w),
        None => WorkerId::default(),
    }
}

/// Physics-parameter layout reported by the engine.
#[derive(Debug, Clone)]
pub struct EngineLayout {
    /// Physics parameter names.
    pub names: Vec<String>,
    /// Native starting values.
    pub init: Vec<f64>,
}

impl EngineLayout {
    /// Number of physics parameters.
    pub fn n_params(&self) -> usize {
        self.names.len()
    }
}

/// Mapping from worker identity to its dedicated engine.
pub struct SolverPool<F: EngineFactory> {
    factory: F,
    slots: Mutex<HashMap<WorkerId, Slot<F::Engine>>>,
    layout: EngineLayout,
    dress_up: bool,
}

impl<F: EngineFactory> SolverPool<F> {
    /// Create the pool. The default worker's engine is built eagerly to read
    /// the physics-parameter layout.
    pub fn new(factory: F) -> Result<Self> {
        let engine = factory.create(WorkerId::default())?;
        let names = engine.parameter_names();
        let init = engine.parameter_init();
        if names.len() != engine.n_params() || init.len() != engine.n_params() {
            return Err(Error::Validation(format!(
                "engine reports {} parameters but {} names and {} initial values",
                engine.n_params(),
                names.len(),
                init.len()
            )));
        }
        log::debug!(
            "engine created for {} ({} physics parameters)",
            WorkerId::default(),
            names.len()
        );

        let mut slots = HashMap::new();
        slots.insert(WorkerId::default(), Arc::new(Mutex::new(Some(engine))));

        Ok(Self {
            factory,
            slots: Mutex::new(slots),
            layout: EngineLayout { names, init },
            dress_up: false,
        })
    }

    /// Forward `dress_up` to every engine call.
    pub fn with_dress_up(mut self, dress_up: bool) -> Self {
        self.dress_up = dress_up;
        self
    }

    /// Physics-parameter layout.
    pub fn layout(&self) -> &EngineLayout {
        &self.layout
    }

    /// Number of physics parameters.
    pub fn n_params(&self) -> usize {
        self.layout.n_params()
    }

    /// Number of workers whose engine has been built.
    pub fn n_initialized(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.lock().map(|e| e.is_some()).unwrap_or(false)).count()
    }

    /// Predictions for `physics` computed by `worker`'s own engine.
    ///
    /// Engine failures are returned unchanged.
    pub fn calculate(&self, physics: &[f64], worker: WorkerId) -> Result<Vec<Vec<f64>>> {
        if physics.len() != self.layout.n_params() {
            return Err(Error::Validation(format!(
                "expected {} physics parameters, got {}",
                self.layout.n_params(),
                physics.len()
            )));
        }

        let slot = self.slot(worker);
        let mut guard = match slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // A panic inside the engine leaves it in an unknown state: rebuild it.
                log::warn!("engine for {} panicked; rebuilding", worker);
                let mut guard = poisoned.into_inner();
                *guard = None;
                slot.clear_poison();
                guard
            }
        };

        if guard.is_none() {
            let engine = self.factory.create(worker)?;
            log::debug!("engine created for {}", worker);
            *guard = Some(engine);
        }
        let engine = guard
            .as_mut()
            .ok_or_else(|| Error::Computation(format!("engine for {} missing", worker)))?;

        engine.calculate(physics, self.dress_up)
    }

    fn slot(&self, worker: WorkerId) -> Slot<F::Engine> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(worker).or_default())
    }
}
