//! Phase-plane session: the orchestrator between user controls, the compute
//! service and the rendering surface.
//!
//! All state lives here and is only mutated from the owner's thread, either by
//! [`Session::handle`] (a user event), [`Session::tick`] (a debounced action
//! becoming due) or [`Session::complete`] (a remote reply).
//!
//! # Staleness
//!
//! Every request gets a fresh [`RequestId`]. Per reply channel the session
//! remembers the id of the latest request it considers authoritative, and a
//! reply whose id is no longer the latest is dropped without touching state:
//! - schema channel (`model_changed`, `sliders_fragment`)
//! - vector-field channel (`graph_changed`, `parameters_changed`)
//! - trajectory refresh channel
//!
//! Trajectory replies additionally carry the trajectory epoch they were issued
//! under; clearing the trajectories or switching model bumps the epoch. A new
//! trajectory also remembers the vector-field generation it was computed under:
//! if a field recompute was issued meanwhile, the start is kept but its curve
//! is recomputed.

use std::collections::HashMap;
use std::time::Duration;

use pp_controls::{Axis, ControlGroup, Debounce, GraphConfiguration, Throttle};
use pp_core::{RequestCounter, RequestId, SessionId};
use pp_schema::{ModelSchema, PlotData, StatePoint, TrajectoryReply, parse_model_schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::change_detect::{ChangeDetector, TreeChange, TreeSnapshot};
use crate::config::SessionConfig;
use crate::error::{AppError, AppResult};
use crate::remote::{Completion, Operation, RemoteCompute, RemoteError, Request};
use crate::trajectories::TrajectorySet;
use crate::view::{MessageLevel, PhasePlaneView};

/// User input delivered to the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// The form tree changed; carries the full current snapshot.
    TreeChanged { snapshot: TreeSnapshot },
    Parameter { name: String, value: f64 },
    ParameterText { name: String, text: String },
    StateVariable { name: String, value: f64 },
    StateVariableText { name: String, text: String },
    SelectAxis { axis: Axis, variable: String },
    AxisRange { axis: Axis, range: [f64; 2] },
    Mode { mode: String },
    ResetParameters,
    ResetStateVariables,
    ResetAxes,
    /// Click on the phase plane at plot coordinates.
    Click { x: f64, y: f64 },
    ClearTrajectories,
    Submit { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No model schema loaded yet.
    Uninitialized,
    Ready,
    /// A vector-field recompute is outstanding.
    Recomputing,
    /// A model switch is fetching the new schema.
    Refetching,
}

#[derive(Debug)]
struct ModelState {
    name: String,
    params: ControlGroup,
    graph: GraphConfiguration,
}

/// What an outstanding request is for.
#[derive(Debug)]
enum Pending {
    Schema { model: String },
    Fragment { model: String, schema: ModelSchema },
    Field,
    Refresh { sent: usize, epoch: u64 },
    Append {
        start: StatePoint,
        epoch: u64,
        generation: u64,
    },
    Integrator,
    Submit { name: String },
}

impl Pending {
    fn operation(&self) -> &'static str {
        match self {
            Pending::Schema { .. } => "model_changed",
            Pending::Fragment { .. } => "sliders_fragment",
            Pending::Field => "recompute",
            Pending::Refresh { .. } | Pending::Append { .. } => "trajectories",
            Pending::Integrator => "integrator_changed",
            Pending::Submit { .. } => "submit",
        }
    }
}

pub struct Session<R: RemoteCompute, V: PhasePlaneView> {
    id: SessionId,
    config: SessionConfig,
    remote: R,
    view: V,
    detector: ChangeDetector,
    model: Option<ModelState>,
    trajectories: TrajectorySet,
    trajectory_epoch: u64,
    field_generation: u64,
    requests: RequestCounter,
    pending: HashMap<RequestId, Pending>,
    latest_schema: Option<RequestId>,
    latest_field: Option<RequestId>,
    latest_refresh: Option<RequestId>,
    graph_changed: Debounce<()>,
    parameters_changed: Debounce<()>,
    integrator_changed: Debounce<Value>,
    new_trajectory: Throttle,
}

impl<R: RemoteCompute, V: PhasePlaneView> Session<R, V> {
    pub fn new(config: SessionConfig, remote: R, view: V) -> Self {
        Self::with_id(SessionId::new_random(), config, remote, view)
    }

    pub fn with_id(id: SessionId, config: SessionConfig, remote: R, view: V) -> Self {
        Self {
            id,
            detector: ChangeDetector::new(config.tree.clone()),
            graph_changed: Debounce::new(config.debounce()),
            parameters_changed: Debounce::new(config.debounce()),
            integrator_changed: Debounce::new(config.debounce()),
            new_trajectory: Throttle::new(config.throttle()),
            config,
            remote,
            view,
            model: None,
            trajectories: TrajectorySet::new(),
            trajectory_epoch: 0,
            field_generation: 0,
            requests: RequestCounter::new(),
            pending: HashMap::new(),
            latest_schema: None,
            latest_field: None,
            latest_refresh: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn remote_mut(&mut self) -> &mut R {
        &mut self.remote
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_ref().map(|m| m.name.as_str())
    }

    pub fn parameters(&self) -> Option<&ControlGroup> {
        self.model.as_ref().map(|m| &m.params)
    }

    pub fn graph(&self) -> Option<&GraphConfiguration> {
        self.model.as_ref().map(|m| &m.graph)
    }

    pub fn trajectories(&self) -> &TrajectorySet {
        &self.trajectories
    }

    /// Number of requests sent and not yet completed.
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.latest_schema.is_some() {
            SessionPhase::Refetching
        } else if self.model.is_none() {
            SessionPhase::Uninitialized
        } else if self.latest_field.is_some() {
            SessionPhase::Recomputing
        } else {
            SessionPhase::Ready
        }
    }

    /// Earliest time at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Duration> {
        [
            self.graph_changed.deadline(),
            self.parameters_changed.deadline(),
            self.integrator_changed.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Apply a user event at time `now`.
    pub fn handle(&mut self, event: UiEvent, now: Duration) {
        if let Err(err) = self.dispatch(event, now) {
            self.report(err);
        }
    }

    /// Fire every debounced action whose quiet period has elapsed.
    pub fn tick(&mut self, now: Duration) {
        if self.graph_changed.poll(now).is_some() {
            let result = self.on_graph_changed();
            self.report_result(result);
        }
        if self.parameters_changed.poll(now).is_some() {
            let result = self.on_parameter_changed();
            self.report_result(result);
        }
        if let Some(state) = self.integrator_changed.poll(now) {
            self.on_integrator_changed(state);
        }
    }

    /// Merge a remote reply, or drop it if it has been superseded.
    pub fn complete(&mut self, completion: Completion) {
        let Some(pending) = self.pending.remove(&completion.id) else {
            tracing::debug!(id = %completion.id, "completion for unknown request");
            return;
        };
        let result = match completion.result {
            Ok(body) => self.merge(completion.id, pending, &body),
            Err(err) => Err(self.on_remote_failure(completion.id, &pending, err)),
        };
        self.report_result(result);
    }

    fn dispatch(&mut self, event: UiEvent, now: Duration) -> AppResult<()> {
        match event {
            UiEvent::TreeChanged { snapshot } => match self.detector.observe(snapshot) {
                TreeChange::ModelChanged { model } => self.on_model_changed(model),
                TreeChange::IntegratorSubtreeChanged { state } => {
                    self.integrator_changed.schedule(state, now)
                }
                TreeChange::NoAction => tracing::debug!("identity-only tree edit"),
            },
            UiEvent::Parameter { name, value } => {
                self.model_mut()?.params.set(&name, value)?;
                self.parameters_changed.schedule((), now);
            }
            UiEvent::ParameterText { name, text } => {
                self.model_mut()?.params.set_text(&name, &text)?;
                self.parameters_changed.schedule((), now);
            }
            UiEvent::StateVariable { name, value } => {
                self.model_mut()?.graph.set_state_variable(&name, value)?;
                self.graph_changed.schedule((), now);
            }
            UiEvent::StateVariableText { name, text } => {
                self.model_mut()?.graph.set_state_variable_text(&name, &text)?;
                self.graph_changed.schedule((), now);
            }
            UiEvent::SelectAxis { axis, variable } => {
                self.model_mut()?.graph.select_variable(axis, &variable)?;
                self.graph_changed.schedule((), now);
            }
            UiEvent::AxisRange { axis, range } => {
                self.model_mut()?.graph.set_range(axis, range)?;
                self.graph_changed.schedule((), now);
            }
            UiEvent::Mode { mode } => {
                self.model_mut()?.graph.set_mode(&mode)?;
                self.graph_changed.schedule((), now);
            }
            UiEvent::ResetParameters => {
                let changes = self.model_mut()?.params.reset();
                for change in changes {
                    tracing::trace!(control = %change.name, value = change.value, "reset");
                    self.parameters_changed.schedule((), now);
                }
            }
            UiEvent::ResetStateVariables => {
                let changes = self.model_mut()?.graph.reset_state_variables();
                for change in changes {
                    tracing::trace!(control = %change.name, value = change.value, "reset");
                    self.graph_changed.schedule((), now);
                }
            }
            UiEvent::ResetAxes => {
                self.model_mut()?.graph.reset_axes()?;
                self.graph_changed.schedule((), now);
            }
            UiEvent::Click { x, y } => self.add_trajectory(x, y, now)?,
            UiEvent::ClearTrajectories => self.clear_trajectories(),
            UiEvent::Submit { name } => self.submit(&name)?,
        }
        Ok(())
    }

    fn model_mut(&mut self) -> AppResult<&mut ModelState> {
        self.model.as_mut().ok_or(AppError::NoModel)
    }

    fn issue(&mut self, operation: Operation, pending: Pending) -> RequestId {
        let id = self.requests.next_id();
        tracing::debug!(%id, operation = operation.name(), "issuing request");
        self.pending.insert(id, pending);
        self.remote.send(Request {
            id,
            session: self.id,
            operation,
        });
        id
    }

    /// Discard everything model-dependent and fetch the new model's schema.
    fn on_model_changed(&mut self, model: String) {
        tracing::info!(%model, "model changed, refetching schema");
        self.model = None;
        self.graph_changed.cancel();
        self.parameters_changed.cancel();
        self.integrator_changed.cancel();
        self.latest_field = None;
        self.clear_trajectories();
        let id = self.issue(
            Operation::ModelChanged {
                model: model.clone(),
            },
            Pending::Schema { model },
        );
        self.latest_schema = Some(id);
    }

    fn on_graph_changed(&mut self) -> AppResult<()> {
        let model = self.model_mut()?;
        model.graph.sync_axis_sliders();
        let graph_state = model.graph.graph_state();
        self.issue_field(Operation::GraphChanged { graph_state });
        Ok(())
    }

    fn on_parameter_changed(&mut self) -> AppResult<()> {
        let params = self.model_mut()?.params.values();
        self.issue_field(Operation::ParametersChanged { params });
        Ok(())
    }

    fn issue_field(&mut self, operation: Operation) {
        self.field_generation += 1;
        let id = self.issue(operation, Pending::Field);
        self.latest_field = Some(id);
    }

    fn on_integrator_changed(&mut self, state: Value) {
        self.issue(Operation::IntegratorChanged { state }, Pending::Integrator);
    }

    /// Request a trajectory through `(x, y)`. Calls inside the throttle window
    /// are dropped.
    fn add_trajectory(&mut self, x: f64, y: f64, now: Duration) -> AppResult<()> {
        let start = self.model_mut()?.graph.start_point(x, y);
        if !self.new_trajectory.try_acquire(now) {
            tracing::debug!(x, y, "trajectory request throttled");
            return Ok(());
        }
        let epoch = self.trajectory_epoch;
        let generation = self.field_generation;
        self.issue(
            Operation::Trajectories {
                starting_points: vec![start.clone()],
            },
            Pending::Append {
                start,
                epoch,
                generation,
            },
        );
        Ok(())
    }

    fn clear_trajectories(&mut self) {
        self.trajectories.clear();
        self.trajectory_epoch += 1;
        self.latest_refresh = None;
        self.view.draw_trajectories(&[]);
        self.view.draw_signal(&[]);
    }

    /// Recompute every tracked trajectory. Nothing to do when none are tracked.
    fn refresh_trajectories(&mut self) {
        if self.trajectories.is_empty() {
            return;
        }
        let starting_points = self.trajectories.starts().to_vec();
        let sent = starting_points.len();
        let epoch = self.trajectory_epoch;
        let id = self.issue(
            Operation::Trajectories { starting_points },
            Pending::Refresh { sent, epoch },
        );
        self.latest_refresh = Some(id);
    }

    fn submit(&mut self, name: &str) -> AppResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::EmptyIdentity);
        }
        self.issue(
            Operation::Submit {
                name: name.to_string(),
            },
            Pending::Submit {
                name: name.to_string(),
            },
        );
        Ok(())
    }

    fn merge(&mut self, id: RequestId, pending: Pending, body: &str) -> AppResult<()> {
        match pending {
            Pending::Schema { model } => {
                if self.latest_schema != Some(id) {
                    stale(id);
                    return Ok(());
                }
                self.latest_schema = None;
                let schema = parse_model_schema(body)?;
                let next = self.issue(Operation::SlidersFragment, Pending::Fragment { model, schema });
                self.latest_schema = Some(next);
            }
            Pending::Fragment { model, schema } => {
                if self.latest_schema != Some(id) {
                    stale(id);
                    return Ok(());
                }
                self.latest_schema = None;
                self.view.install_fragment(body);
                let params = ControlGroup::new(&schema.params)?;
                let graph = GraphConfiguration::new(&schema.graph_params)?;
                tracing::info!(%model, params = params.len(), "model ready");
                self.model = Some(ModelState {
                    name: model,
                    params,
                    graph,
                });
                self.on_parameter_changed()?;
            }
            Pending::Field => {
                if self.latest_field != Some(id) {
                    stale(id);
                    return Ok(());
                }
                self.latest_field = None;
                let plot: PlotData = serde_json::from_str(body)?;
                self.redraw_phase_plane(&plot)?;
                self.refresh_trajectories();
            }
            Pending::Refresh { sent, epoch } => {
                if self.latest_refresh != Some(id) || epoch != self.trajectory_epoch {
                    stale(id);
                    return Ok(());
                }
                self.latest_refresh = None;
                let reply: TrajectoryReply = serde_json::from_str(body)?;
                self.trajectories.refresh(sent, reply)?;
                self.redraw_trajectories();
            }
            Pending::Append {
                start,
                epoch,
                generation,
            } => {
                if epoch != self.trajectory_epoch {
                    stale(id);
                    return Ok(());
                }
                let reply: TrajectoryReply = serde_json::from_str(body)?;
                self.trajectories.append(start, reply)?;
                self.redraw_trajectories();
                // Computed under an older field. An outstanding recompute will
                // refresh every start when it lands; otherwise refresh now.
                if generation != self.field_generation && self.latest_field.is_none() {
                    tracing::debug!(%id, "trajectory predates field recompute, refreshing");
                    self.refresh_trajectories();
                }
            }
            Pending::Integrator => self.refresh_trajectories(),
            Pending::Submit { name } => {
                tracing::info!(%name, "configuration saved");
                self.view
                    .show_message(MessageLevel::Info, &format!("Configuration saved as {name}"));
            }
        }
        Ok(())
    }

    fn redraw_phase_plane(&mut self, plot: &PlotData) -> AppResult<()> {
        let graph = &self.model.as_ref().ok_or(AppError::NoModel)?.graph;
        self.view.draw(plot);
        let (x, y) = (graph.axis(Axis::X), graph.axis(Axis::Y));
        self.view.set_labels(&x.variable, &y.variable);
        self.view.set_plot_labels(graph.variable_names());
        Ok(())
    }

    fn redraw_trajectories(&mut self) {
        self.view.draw_trajectories(self.trajectories.trajectories());
        self.view.draw_signal(self.trajectories.signals());
    }

    /// A failed request leaves state as it was; only the bookkeeping that
    /// marks it as outstanding is released.
    fn on_remote_failure(&mut self, id: RequestId, pending: &Pending, err: RemoteError) -> AppError {
        for latest in [
            &mut self.latest_schema,
            &mut self.latest_field,
            &mut self.latest_refresh,
        ] {
            if *latest == Some(id) {
                *latest = None;
            }
        }
        AppError::Remote {
            operation: pending.operation(),
            message: err.message,
        }
    }

    fn report_result(&mut self, result: AppResult<()>) {
        if let Err(err) = result {
            self.report(err);
        }
    }

    fn report(&mut self, err: AppError) {
        match &err {
            AppError::Validation(_) | AppError::NoModel => {
                tracing::debug!(%err, "event ignored");
            }
            AppError::EmptyIdentity => {
                self.view.show_message(MessageLevel::Error, &err.to_string());
            }
            AppError::DivergentComputation | AppError::Remote { .. } => {
                tracing::warn!(%err);
                self.view.show_message(MessageLevel::Warning, &err.to_string());
            }
            _ => {
                tracing::warn!(%err, "reply rejected");
                self.view.show_message(MessageLevel::Error, &err.to_string());
            }
        }
    }
}

fn stale(id: RequestId) {
    tracing::debug!(%id, "discarding superseded reply");
}
