//! Instances: one active state configuration bound to a shared model.

use super::deferred::{DeferredEvent, DeferredPool};
use super::dispatch::Dispatcher;
use super::environment::Environment;
use super::error::EngineError;
use super::log::Categories;
use super::store::ActiveConfiguration;
use crate::core::{Element, Initialize, Model, RegionId, VertexId};
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// A running state machine.
///
/// Each instance owns its active state configuration, its pool of deferred
/// triggers, the user context `C` handed to guards and actions, and the
/// [`Environment`] used for logging and choice tie-breaking.
///
/// Every call to [`evaluate`](Instance::evaluate) runs in a transaction:
/// state changes are staged and only become visible through
/// [`last_known_state`](Instance::last_known_state) when evaluation finishes
/// without error. Actions receive `&mut C` rather than the instance, so an
/// action cannot call `evaluate` on the instance that is running it.
///
/// # Example
///
/// ```rust
/// use statechart::builder::{ModelBuilder, TransitionBuilder};
/// use statechart::core::PseudoStateKind;
/// use statechart::runtime::Instance;
/// use std::sync::Arc;
///
/// struct Flip;
///
/// let mut builder = ModelBuilder::<u32>::new("switch");
/// let root = builder.root();
/// let initial = builder.pseudo_state("initial", root, PseudoStateKind::Initial).unwrap();
/// let off = builder.state("off", root).unwrap();
/// let on = builder.state("on", root).unwrap();
/// builder.add_transition(TransitionBuilder::new(initial).to(off)).unwrap();
/// builder
///     .add_transition(
///         TransitionBuilder::new(off)
///             .to(on)
///             .on::<Flip>()
///             .effect(|flips: &mut u32, _| *flips += 1),
///     )
///     .unwrap();
/// builder.add_transition(TransitionBuilder::new(on).to(off).on::<Flip>()).unwrap();
/// let model = Arc::new(builder.build().unwrap());
///
/// let mut instance = Instance::new(Arc::clone(&model), 0).unwrap();
/// assert!(instance.is_in(off));
///
/// assert!(instance.evaluate(Flip).unwrap());
/// assert!(instance.is_in(on));
/// assert_eq!(*instance.context(), 1);
///
/// assert!(!instance.evaluate("unrelated").unwrap());
/// ```
pub struct Instance<C> {
    id: Uuid,
    model: Arc<Model<C>>,
    context: C,
    store: ActiveConfiguration,
    deferred: DeferredPool,
    environment: Environment,
}

impl<C> Instance<C> {
    /// Create an instance and enter the model's root state.
    pub fn new(model: Arc<Model<C>>, context: C) -> Result<Self, EngineError> {
        Self::with_environment(model, context, Environment::default())
    }

    /// Create an instance with explicit logging and random collaborators.
    pub fn with_environment(
        model: Arc<Model<C>>,
        context: C,
        environment: Environment,
    ) -> Result<Self, EngineError> {
        let mut instance = Self::unstarted(model, context, environment);

        instance.transaction(|dispatcher, _| {
            let root = dispatcher.model.root();
            dispatcher.enter_path(&[Element::Vertex(root)], &Initialize)
        })?;

        Ok(instance)
    }

    /// An instance with an empty configuration, used when restoring snapshots.
    pub(crate) fn unstarted(model: Arc<Model<C>>, context: C, environment: Environment) -> Self {
        let id = Uuid::new_v4();
        environment.logger.write(Categories::CREATE, || {
            format!("Create instance {} of model {}", id, model.name())
        });

        Self {
            id,
            model,
            context,
            store: ActiveConfiguration::new(),
            deferred: DeferredPool::new(),
            environment,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn model(&self) -> &Arc<Model<C>> {
        &self.model
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    /// Triggers currently waiting for a configuration that accepts them.
    pub fn deferred(&self) -> &DeferredPool {
        &self.deferred
    }

    /// The committed state of `region`, or `None` if it was never entered.
    pub fn last_known_state(&self, region: RegionId) -> Option<VertexId> {
        self.store.last_known_state(region)
    }

    /// Whether `vertex` is part of the committed active configuration.
    pub fn is_in(&self, vertex: VertexId) -> bool {
        let Some(v) = self.model.get_vertex(vertex) else {
            return false;
        };
        match v.parent() {
            None => true,
            Some(region) => {
                self.store.last_known_state(region) == Some(vertex)
                    && self.is_in(self.model.region(region).parent())
            }
        }
    }

    /// Active states below the root, depth first in model order.
    pub fn active_states(&self) -> Vec<VertexId> {
        let mut active = Vec::new();
        self.collect_active(self.model.root(), &mut active);
        active
    }

    fn collect_active(&self, state: VertexId, active: &mut Vec<VertexId>) {
        for region in self.model.vertex(state).regions() {
            if let Some(child) = self.store.last_known_state(*region) {
                active.push(child);
                self.collect_active(child, active);
            }
        }
    }

    /// Evaluate a trigger.
    ///
    /// Returns true if the trigger caused a transition or was deferred by an
    /// active state. After a transition, deferred triggers that the new
    /// configuration no longer defers are replayed, newest first.
    pub fn evaluate<E>(&mut self, event: E) -> Result<bool, EngineError>
    where
        E: Any + Send,
    {
        self.environment.logger.write(Categories::EVALUATE, || {
            format!("Evaluate {}", type_name::<E>())
        });

        self.transaction(move |dispatcher, pool| {
            let root = dispatcher.model.root();
            let result = dispatcher.evaluate_state(root, &event)?;
            let transitioned = dispatcher.transitions > 0;

            if dispatcher.deferred {
                pool.push(DeferredEvent::new(event));
            }
            if transitioned {
                replay_deferred(dispatcher, pool)?;
            }

            Ok(result)
        })
    }

    /// Run `operation` against the dirty configuration and commit on success.
    fn transaction<R, F>(&mut self, operation: F) -> Result<R, EngineError>
    where
        F: FnOnce(&mut Dispatcher<'_, C>, &mut DeferredPool) -> Result<R, EngineError>,
    {
        self.store.begin();

        let mut dispatcher = Dispatcher::new(
            &self.model,
            &mut self.store,
            &mut self.context,
            &mut self.environment,
        );
        let result = operation(&mut dispatcher, &mut self.deferred);

        match result {
            Ok(value) => {
                self.store.commit();
                self.deferred.commit();
                debug!(instance = %self.id, "transaction committed");
                Ok(value)
            }
            Err(err) => {
                self.store.rollback();
                self.deferred.rollback();
                warn!(instance = %self.id, error = %err, "transaction rolled back");
                Err(err)
            }
        }
    }

    /// Overwrite the configuration of the given regions without running any
    /// actions, and queue restored deferred triggers.
    pub(crate) fn load(
        &mut self,
        states: Vec<(RegionId, VertexId)>,
        deferred: Vec<Box<dyn Any + Send>>,
    ) -> Result<(), EngineError> {
        self.transaction(move |dispatcher, pool| {
            for (region, state) in states {
                dispatcher.set_state(region, state);
            }
            for event in deferred {
                pool.push(DeferredEvent::from_boxed(event));
            }
            Ok(())
        })
    }
}

/// Re-dispatch deferred triggers that the active configuration no longer defers.
///
/// The pool is scanned newest first. A replay that causes a transition
/// changes the deferrable set, so the scan restarts from the newest entry.
fn replay_deferred<C>(
    dispatcher: &mut Dispatcher<'_, C>,
    pool: &mut DeferredPool,
) -> Result<(), EngineError> {
    let root = dispatcher.model.root();

    'scan: loop {
        let deferrable = dispatcher.active_deferrable();

        for index in (0..pool.slot_count()).rev() {
            let entry = pool.get(index);
            if entry.fired || deferrable.contains(&entry.type_id) {
                continue;
            }

            pool.set_fired(index, true);
            dispatcher.reset_counters();
            dispatcher.evaluate_state(root, pool.get(index).event())?;

            if dispatcher.deferred {
                pool.set_fired(index, false);
            }
            if dispatcher.transitions > 0 {
                continue 'scan;
            }
        }

        break;
    }

    pool.compact();
    Ok(())
}

impl<C> fmt::Debug for Instance<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("model", &self.model.name())
            .field("store", &self.store)
            .field("deferred", &self.deferred)
            .finish_non_exhaustive()
    }
}
