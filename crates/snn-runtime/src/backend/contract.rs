//! Shared backend state and the per-step state machine (§4.6)
//!
//! [`Backend`] owns the network, the fabric, and per-entity endpoints. Its
//! control-plane methods (`start`/`stop`/`load_population`/...) are the
//! same regardless of scheduler; only the population-step and
//! projection-step phases are swapped out between
//! [`crate::backend::single_threaded`] and [`crate::backend::worker_pool`],
//! so the two schedulers produce identical message traffic and identical
//! neuron/synapse state for the same input (§4.6.4).

use crate::backend::{single_threaded, worker_pool};
use crate::config::{BackendConfig, SchedulerKind};
use crate::error::{Result, RuntimeError};
use crate::kernels::blifat;
use crate::kernels::delta_synapse::FutureMessages;
use log::{debug, info};
use snn_core::{Network, OutputType, PopulationVariant, ProjectionVariant, SynapticImpactMessage, Uid};
use snn_fabric::{Bus, Endpoint};
use std::collections::HashMap;

/// Fold every delivered impact into a per-neuron [`blifat::NeuronInput`]
/// and a per-neuron dopamine total, indexed by postsynaptic neuron index
pub(crate) fn accumulate_inputs(
    size: usize,
    messages: Vec<SynapticImpactMessage>,
) -> (Vec<blifat::NeuronInput>, Vec<f32>) {
    let mut inputs = vec![blifat::NeuronInput::default(); size];
    let mut dopamine = vec![0.0f32; size];
    for message in messages {
        for impact in message.impacts {
            let idx = impact.postsynaptic_neuron_index as usize;
            if idx >= size {
                continue;
            }
            match impact.synapse_type {
                OutputType::Excitatory => inputs[idx].excitatory += impact.impact_value,
                OutputType::InhibitoryCurrent => inputs[idx].inhibitory_current += impact.impact_value,
                OutputType::InhibitoryConductance => {
                    inputs[idx].inhibitory_conductance += impact.impact_value
                }
                OutputType::Dopamine => dopamine[idx] += impact.impact_value,
                OutputType::Blocking => {
                    if !message.is_forcing {
                        inputs[idx].blocked = true;
                    }
                }
            }
        }
    }
    (inputs, dopamine)
}

/// The result of stepping one population: which of its neurons spiked
pub(crate) struct PopulationStepOutput {
    pub uid: Uid,
    pub spiked_indexes: Vec<u32>,
    pub dopamine_received: f32,
}

/// The result of stepping one projection: nothing beyond side effects on
/// `future_messages` and the synapse weights, but kept as a named type so
/// both schedulers report the same shape
pub(crate) struct ProjectionStepOutput {
    pub uid: Uid,
}

/// A running (or not yet started) simulation backend
pub struct Backend {
    pub(crate) network: Network,
    pub(crate) bus: Bus,
    pub(crate) config: BackendConfig,
    pub(crate) pool: Option<rayon::ThreadPool>,
    pub(crate) step: u64,
    pub(crate) running: bool,
    pub(crate) learning_enabled: bool,
    pub(crate) endpoints: HashMap<Uid, Endpoint>,
    pub(crate) future_messages: HashMap<Uid, FutureMessages>,
    pub(crate) spikes_this_step: HashMap<Uid, Vec<u32>>,
    pub(crate) dopamine_this_step: HashMap<Uid, f32>,
}

impl Backend {
    /// Build an empty backend for `config`
    pub fn new(config: BackendConfig) -> Result<Self> {
        config.validate()?;
        let pool = match config.scheduler {
            SchedulerKind::SingleThreaded => None,
            SchedulerKind::WorkerPool => {
                let mut builder = rayon::ThreadPoolBuilder::new();
                if config.thread_count > 0 {
                    builder = builder.num_threads(config.thread_count);
                }
                Some(
                    builder
                        .build()
                        .map_err(|e| RuntimeError::invalid_config(e.to_string()))?,
                )
            }
        };
        Ok(Self {
            network: Network::new(),
            bus: Bus::new(),
            config,
            pool,
            step: 0,
            running: false,
            learning_enabled: false,
            endpoints: HashMap::new(),
            future_messages: HashMap::new(),
            spikes_this_step: HashMap::new(),
            dopamine_this_step: HashMap::new(),
        })
    }

    /// Add a population, giving it its own fabric endpoint
    pub fn load_population(&mut self, population: PopulationVariant) -> Uid {
        let uid = self.network.add_population(population);
        self.endpoints.insert(uid, Endpoint::new(self.bus.clone(), uid));
        debug!("loaded population {uid}");
        uid
    }

    /// Add a projection, wiring its endpoint to receive presynaptic spikes
    /// and its postsynaptic population to receive its impacts (§4.6.3)
    pub fn load_projection(&mut self, projection: ProjectionVariant) -> Result<Uid> {
        let presynaptic_uid = projection.presynaptic_uid();
        let postsynaptic_uid = projection.postsynaptic_uid();
        let is_stdp_additive = matches!(projection, ProjectionVariant::StdpAdditive(_));
        let uid = self.network.add_projection(projection)?;

        if is_stdp_additive {
            if let Some(ProjectionVariant::StdpAdditive(p)) = self.network.projection_mut(uid) {
                p.set_stdp_population(postsynaptic_uid, snn_core::StdpPopulationMode::StdpOnly);
            }
        }

        let endpoint = Endpoint::new(self.bus.clone(), uid);
        let mut tracked = vec![presynaptic_uid];
        tracked.extend(self.network.projection(uid).map(|p| p.stdp_populations()).unwrap_or_default());
        endpoint.subscribe::<snn_core::SpikeMessage>(tracked);
        self.endpoints.insert(uid, endpoint);

        if let Some(post_endpoint) = self.endpoints.get(&postsynaptic_uid) {
            post_endpoint.subscribe::<snn_core::SynapticImpactMessage>([uid]);
        }

        self.future_messages.insert(uid, FutureMessages::new());
        debug!("loaded projection {uid} ({presynaptic_uid} -> {postsynaptic_uid})");
        Ok(uid)
    }

    /// Remove a population and every projection touching it
    pub fn remove_population(&mut self, uid: Uid) -> Result<()> {
        self.network.remove_population(uid)?;
        self.bus.remove_receiver(uid);
        self.endpoints.remove(&uid);
        Ok(())
    }

    /// Remove a projection
    pub fn remove_projection(&mut self, uid: Uid) -> Result<()> {
        self.network.remove_projection(uid)?;
        self.bus.remove_receiver(uid);
        self.endpoints.remove(&uid);
        self.future_messages.remove(&uid);
        Ok(())
    }

    /// Begin accepting [`Backend::step`] calls
    pub fn start(&mut self) -> Result<()> {
        if self.running {
            return Err(RuntimeError::AlreadyRunning);
        }
        self.running = true;
        info!("backend started at step {}", self.step);
        Ok(())
    }

    /// Stop accepting [`Backend::step`] calls; already-running `run` loops
    /// observe this and exit cleanly
    pub fn stop(&mut self) {
        self.running = false;
        info!("backend stopped at step {}", self.step);
    }

    /// `true` if [`Backend::start`] has been called and [`Backend::stop`]
    /// has not
    pub fn running(&self) -> bool {
        self.running
    }

    /// Current step counter
    pub fn get_step(&self) -> u64 {
        self.step
    }

    /// Enable plasticity updates on subsequent steps
    pub fn start_learning(&mut self) {
        self.learning_enabled = true;
    }

    /// Disable plasticity updates on subsequent steps; existing weights are
    /// left as they are (§4.6.3)
    pub fn stop_learning(&mut self) {
        self.learning_enabled = false;
    }

    /// Clear `is_plastic` on one projection, so it is skipped by the
    /// plasticity phase regardless of [`Self::start_learning`] (§8 P6/S6)
    pub fn lock_weights(&mut self, projection_uid: Uid) -> Result<()> {
        let variant = self
            .network
            .projection_mut(projection_uid)
            .ok_or_else(|| RuntimeError::invalid_config(format!("no such projection: {projection_uid}")))?;
        match variant {
            ProjectionVariant::DeltaSynapse(p) => p.is_plastic = false,
            ProjectionVariant::StdpAdditive(p) => p.is_plastic = false,
            ProjectionVariant::StdpResource(p) => p.is_plastic = false,
        }
        Ok(())
    }

    /// Set `is_plastic` on one projection, letting it resume updates on
    /// subsequent steps if [`Self::start_learning`] is also in effect
    pub fn unlock_weights(&mut self, projection_uid: Uid) -> Result<()> {
        let variant = self
            .network
            .projection_mut(projection_uid)
            .ok_or_else(|| RuntimeError::invalid_config(format!("no such projection: {projection_uid}")))?;
        match variant {
            ProjectionVariant::DeltaSynapse(p) => p.is_plastic = true,
            ProjectionVariant::StdpAdditive(p) => p.is_plastic = true,
            ProjectionVariant::StdpResource(p) => p.is_plastic = true,
        }
        Ok(())
    }

    /// Borrow the underlying network, e.g. for a storage snapshot
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Mutably borrow the underlying network, e.g. to poke a neuron's state
    /// directly from a test harness or an external stimulus generator.
    /// Callers must not add or remove populations/projections through this
    /// handle; use [`Self::load_population`]/[`Self::load_projection`]/
    /// [`Self::remove_population`]/[`Self::remove_projection`] instead, since
    /// those also keep `endpoints` and `future_messages` in sync.
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    /// Run one full step of the §4.6.2 state machine, dispatching the
    /// per-entity work to whichever scheduler this backend was built with
    pub fn step(&mut self) -> Result<()> {
        if !self.running {
            return Err(RuntimeError::ScheduleStopped);
        }

        self.bus.route_messages();
        let population_outputs = match &self.pool {
            None => single_threaded::step_populations(self),
            Some(pool) => worker_pool::step_populations(self, pool),
        };
        self.spikes_this_step.clear();
        self.dopamine_this_step.clear();
        for output in population_outputs {
            self.dopamine_this_step.insert(output.uid, output.dopamine_received);
            self.spikes_this_step.insert(output.uid, output.spiked_indexes);
        }
        for (&uid, endpoint) in &self.endpoints {
            if let Some(spiked) = self.spikes_this_step.get(&uid) {
                if !spiked.is_empty() {
                    endpoint.send_message(snn_core::SpikeMessage::new(uid, self.step, spiked.clone()));
                }
            }
        }

        self.bus.route_messages();
        let _projection_outputs = match &self.pool {
            None => single_threaded::step_projections(self),
            Some(pool) => worker_pool::step_projections(self, pool),
        };

        self.bus.route_messages();
        self.step += 1;
        Ok(())
    }

    /// Run [`Backend::step`] repeatedly until it returns
    /// [`RuntimeError::ScheduleStopped`] or `max_steps` have run, whichever
    /// comes first
    pub fn run(&mut self, max_steps: u64) -> Result<u64> {
        let mut ran = 0;
        while ran < max_steps {
            match self.step() {
                Ok(()) => ran += 1,
                Err(RuntimeError::ScheduleStopped) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(ran)
    }
}
