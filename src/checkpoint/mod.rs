//! Snapshot and restore of an instance's active state configuration.
//!
//! A [`Snapshot`] mirrors the model's region/state tree. Every region records
//! the name of its last known state, which is enough to resume both the
//! active configuration and any history pseudo-states. Behaviour (guards and
//! actions) is never serialized; restoring needs the same model.

use crate::core::{Model, RegionId, VertexId};
use crate::runtime::{DeferredEvent, Environment, Instance};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for snapshot format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable record of an instance's configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: Uuid,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// Name of the model the instance runs
    pub model: String,

    /// The root state and everything below it
    pub root: StateNode,

    /// Deferred triggers, oldest first, as mapped by the caller
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deferred: Vec<Value>,
}

/// A state and its child regions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<RegionNode>,
}

/// A region, the name of its last known state, and its child states.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_known_state: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub states: Vec<StateNode>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Parse a snapshot, rejecting formats this version cannot read.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let snapshot: Snapshot = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}

impl<C> Instance<C> {
    /// Snapshot the committed configuration. Deferred triggers are omitted.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_with(|_| None)
    }

    /// Snapshot the committed configuration, serializing deferred triggers
    /// with `mapper`. Triggers it returns `None` for are left out.
    pub fn snapshot_with<F>(&self, mapper: F) -> Snapshot
    where
        F: Fn(&DeferredEvent) -> Option<Value>,
    {
        let model = self.model();
        let snapshot = Snapshot {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            taken_at: Utc::now(),
            model: model.name().to_string(),
            root: self.state_node(model.root()),
            deferred: self.deferred().iter().filter_map(mapper).collect(),
        };

        debug!(instance = %self.id(), snapshot = %snapshot.id, "snapshot taken");
        snapshot
    }

    fn state_node(&self, state: VertexId) -> StateNode {
        let model = self.model();
        let regions = model
            .vertex(state)
            .regions()
            .iter()
            .map(|&region| RegionNode {
                name: model.region(region).name().to_string(),
                last_known_state: self
                    .last_known_state(region)
                    .map(|v| model.vertex(v).name().to_string()),
                states: model
                    .region(region)
                    .vertices()
                    .iter()
                    .filter(|&&v| model.vertex(v).is_state())
                    .map(|&v| self.state_node(v))
                    .collect(),
            })
            .collect();

        StateNode {
            name: model.vertex(state).name().to_string(),
            regions,
        }
    }

    /// Create an instance whose configuration is read from `snapshot`.
    ///
    /// No entry actions run. Deferred triggers in the snapshot are dropped.
    pub fn restore(
        model: Arc<Model<C>>,
        context: C,
        snapshot: &Snapshot,
    ) -> Result<Self, CheckpointError> {
        Self::restore_with(model, context, Environment::default(), snapshot, |_| None)
    }

    /// Like [`restore`](Self::restore), rebuilding deferred triggers with
    /// `mapper`. Entries it returns `None` for are dropped.
    pub fn restore_with<F>(
        model: Arc<Model<C>>,
        context: C,
        environment: Environment,
        snapshot: &Snapshot,
        mapper: F,
    ) -> Result<Self, CheckpointError>
    where
        F: Fn(&Value) -> Option<Box<dyn Any + Send>>,
    {
        snapshot.check_version()?;
        if snapshot.model != model.name()
            || snapshot.root.name != model.vertex(model.root()).name()
        {
            return Err(CheckpointError::ModelMismatch {
                expected: model.name().to_string(),
                found: snapshot.model.clone(),
            });
        }

        let mut states = Vec::new();
        collect_states(&model, model.root(), &snapshot.root, &mut states)?;
        let deferred = snapshot.deferred.iter().filter_map(mapper).collect();

        let mut instance = Self::unstarted(model, context, environment);
        instance.load(states, deferred)?;

        debug!(instance = %instance.id(), snapshot = %snapshot.id, "snapshot restored");
        Ok(instance)
    }
}

/// Walk the model and the snapshot in lockstep, collecting every region whose
/// last known state names one of its child states.
fn collect_states<C>(
    model: &Model<C>,
    state: VertexId,
    node: &StateNode,
    states: &mut Vec<(RegionId, VertexId)>,
) -> Result<(), CheckpointError> {
    for region_node in &node.regions {
        let region = model
            .vertex(state)
            .regions()
            .iter()
            .copied()
            .find(|&r| model.region(r).name() == region_node.name)
            .ok_or_else(|| CheckpointError::UnknownElement {
                path: format!("{}.{}", model.vertex(state).qualified_name(), region_node.name),
            })?;

        let child = |name: &str| {
            model
                .region(region)
                .vertices()
                .iter()
                .copied()
                .find(|&v| model.vertex(v).is_state() && model.vertex(v).name() == name)
                .ok_or_else(|| CheckpointError::UnknownElement {
                    path: format!("{}.{}", model.region(region).qualified_name(), name),
                })
        };

        if let Some(name) = &region_node.last_known_state {
            states.push((region, child(name)?));
        }
        for state_node in &region_node.states {
            collect_states(model, child(&state_node.name)?, state_node, states)?;
        }
    }

    Ok(())
}
