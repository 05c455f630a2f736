//! Mutation Commands
//!
//! Each user action follows the same shape: update local state (optimistically
//! for reorder and toggles), call the server, then reconcile by re-fetching
//! the whole list. Failures are never undone by an inverse operation; the
//! refetch replaces local state with server truth.
//!
//! Commands are written against two seams so they run the same in the browser
//! and in tests: an API trait (`StageApi`, `LeadApi`) and a `ListSink` that
//! owns the page's list, loading flag and notices.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::endpoints::{LeadQuery, StageQuery};
use crate::error::{ApiError, ApiResult};
use crate::lead::{Lead, LeadInput};
use crate::reorder::{by_order, plan_reorder};
use crate::stage::{ReorderRequest, Stage, StageInput};
use crate::validation::{FieldErrors, LeadDraft, StageDraft};

// ========================
// Seams
// ========================

#[async_trait(?Send)]
pub trait StageApi {
    async fn list_stages(&self, query: &StageQuery) -> ApiResult<Vec<Stage>>;
    // Mutation replies carry no data the console needs; the refetch does
    async fn create_stage(&self, company_id: &str, input: &StageInput) -> ApiResult<()>;
    async fn update_stage(&self, id: &str, input: &StageInput) -> ApiResult<()>;
    async fn delete_stage(&self, id: &str) -> ApiResult<()>;
    async fn reorder_stages(&self, company_id: &str, request: &ReorderRequest) -> ApiResult<()>;
}

#[async_trait(?Send)]
pub trait LeadApi {
    async fn list_leads(&self, query: &LeadQuery) -> ApiResult<Vec<Lead>>;
    async fn create_lead(&self, company_id: &str, input: &LeadInput) -> ApiResult<()>;
    async fn convert_lead(&self, id: &str) -> ApiResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient snackbar message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, message: message.into() }
    }
}

/// Generation counter for list loads.
///
/// Every load (and every optimistic write) takes a new ticket; a response is
/// applied only if its ticket is still the latest, so a slow response cannot
/// overwrite newer state.
#[derive(Debug, Default)]
pub struct LoadGuard {
    latest: AtomicU64,
}

impl LoadGuard {
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::Relaxed) == ticket
    }
}

/// Page-owned list state the commands write into
pub trait ListSink {
    type Item;

    /// Full, unfiltered list as currently shown
    fn current(&self) -> Vec<Self::Item>;
    fn apply(&self, items: Vec<Self::Item>);
    fn set_loading(&self, loading: bool);
    fn notify(&self, notice: Notice);
    /// A 401 was seen; the screen must stop rendering
    fn session_expired(&self);
    fn guard(&self) -> &LoadGuard;
}

/// How a command ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing to do, no request sent
    Unchanged,
    /// Server accepted the change
    Saved,
    /// Refused locally, no request sent
    Rejected(String),
    /// Form did not validate, no request sent
    Invalid(FieldErrors),
    /// Server or network refused the change
    Failed(ApiError),
}

fn report<S: ListSink + ?Sized>(sink: &S, err: &ApiError) {
    if err.is_unauthorized() {
        sink.session_expired();
    } else {
        sink.notify(Notice::error(err.user_message()));
    }
}

fn reject<S: ListSink + ?Sized>(sink: &S, message: String) -> Outcome {
    sink.notify(Notice::error(message.clone()));
    Outcome::Rejected(message)
}

/// Optimistic write: invalidates loads still in flight, then applies
fn apply_local<S: ListSink + ?Sized>(sink: &S, items: Vec<S::Item>) {
    sink.guard().begin();
    sink.set_loading(false);
    sink.apply(items);
}

// ========================
// Stages
// ========================

pub async fn refresh_stages<A, S>(api: &A, sink: &S, query: &StageQuery) -> ApiResult<()>
where
    A: StageApi + ?Sized,
    S: ListSink<Item = Stage> + ?Sized,
{
    let ticket = sink.guard().begin();
    sink.set_loading(true);
    debug!(company = %query.company_id, ticket, "loading stages");

    let result = api.list_stages(query).await;
    if !sink.guard().is_current(ticket) {
        debug!(ticket, "dropping stale stage list");
        return Ok(());
    }
    sink.set_loading(false);

    match result {
        Ok(stages) => {
            debug!(count = stages.len(), "stages loaded");
            sink.apply(by_order(&stages));
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "failed to load stages");
            report(sink, &err);
            Err(err)
        }
    }
}

/// Drop handler: `view` is the filtered list the user dragged in.
pub async fn commit_reorder<A, S>(
    api: &A,
    sink: &S,
    query: &StageQuery,
    view: &[Stage],
    from: usize,
    to: usize,
) -> Outcome
where
    A: StageApi + ?Sized,
    S: ListSink<Item = Stage> + ?Sized,
{
    let plan = match plan_reorder(&sink.current(), view, from, to) {
        Ok(Some(plan)) => plan,
        Ok(None) => return Outcome::Unchanged,
        Err(err) => return reject(sink, err.to_string()),
    };

    info!(from, to, stages = plan.request.stages.len(), "reordering stages");
    apply_local(sink, plan.stages);

    match api.reorder_stages(&query.company_id, &plan.request).await {
        Ok(()) => {
            sink.notify(Notice::success("Stage order updated"));
            let _ = refresh_stages(api, sink, query).await;
            Outcome::Saved
        }
        Err(err) if err.is_unauthorized() => {
            sink.session_expired();
            Outcome::Failed(err)
        }
        Err(err) => {
            warn!(error = %err, "reorder failed, reloading");
            report(sink, &err);
            let _ = refresh_stages(api, sink, query).await;
            Outcome::Failed(err)
        }
    }
}

/// Flip `isActive` locally, PUT it, reconcile.
pub async fn toggle_stage_active<A, S>(api: &A, sink: &S, query: &StageQuery, id: &str) -> Outcome
where
    A: StageApi + ?Sized,
    S: ListSink<Item = Stage> + ?Sized,
{
    let mut stages = sink.current();
    let Some(stage) = stages.iter_mut().find(|s| s.id == id) else {
        return reject(sink, format!("Stage {} is no longer loaded", id));
    };
    stage.is_active = !stage.is_active;
    let input = stage.to_input();
    let message = if input.is_active { "Stage activated" } else { "Stage deactivated" };

    info!(id, active = input.is_active, "toggling stage");
    apply_local(sink, stages);

    match api.update_stage(id, &input).await {
        Ok(()) => {
            sink.notify(Notice::success(message));
            let _ = refresh_stages(api, sink, query).await;
            Outcome::Saved
        }
        Err(err) if err.is_unauthorized() => {
            sink.session_expired();
            Outcome::Failed(err)
        }
        Err(err) => {
            warn!(id, error = %err, "toggle failed, reloading");
            report(sink, &err);
            let _ = refresh_stages(api, sink, query).await;
            Outcome::Failed(err)
        }
    }
}

/// Create (`editing = None`) or update a stage from the dialog.
pub async fn save_stage<A, S>(
    api: &A,
    sink: &S,
    query: &StageQuery,
    editing: Option<&str>,
    draft: &StageDraft,
) -> Outcome
where
    A: StageApi + ?Sized,
    S: ListSink<Item = Stage> + ?Sized,
{
    let input = match draft.validate() {
        Ok(input) => input,
        Err(errors) => {
            debug!(fields = errors.len(), "stage form rejected");
            return Outcome::Invalid(errors);
        }
    };

    let (result, message) = match editing {
        Some(id) => {
            info!(id, "updating stage");
            (api.update_stage(id, &input).await, "Stage updated")
        }
        None => {
            info!(name = %input.name, "creating stage");
            (api.create_stage(&query.company_id, &input).await, "Stage created")
        }
    };

    match result {
        Ok(()) => {
            sink.notify(Notice::success(message));
            let _ = refresh_stages(api, sink, query).await;
            Outcome::Saved
        }
        Err(err) => {
            warn!(error = %err, "saving stage failed");
            report(sink, &err);
            Outcome::Failed(err)
        }
    }
}

pub async fn delete_stage<A, S>(api: &A, sink: &S, query: &StageQuery, id: &str) -> Outcome
where
    A: StageApi + ?Sized,
    S: ListSink<Item = Stage> + ?Sized,
{
    let current = sink.current();
    match current.iter().find(|s| s.id == id) {
        None => return reject(sink, format!("Stage {} is no longer loaded", id)),
        Some(stage) if stage.is_locked() => {
            return reject(sink, format!("\"{}\" is a default stage and cannot be deleted", stage.name));
        }
        Some(_) => {}
    }

    info!(id, "deleting stage");
    match api.delete_stage(id).await {
        Ok(()) => {
            sink.notify(Notice::success("Stage deleted"));
            let _ = refresh_stages(api, sink, query).await;
            Outcome::Saved
        }
        Err(err) => {
            warn!(id, error = %err, "delete failed");
            report(sink, &err);
            Outcome::Failed(err)
        }
    }
}

// ========================
// Leads
// ========================

pub async fn refresh_leads<A, S>(api: &A, sink: &S, query: &LeadQuery) -> ApiResult<()>
where
    A: LeadApi + ?Sized,
    S: ListSink<Item = Lead> + ?Sized,
{
    let ticket = sink.guard().begin();
    sink.set_loading(true);
    debug!(company = %query.company_id, ticket, "loading leads");

    let result = api.list_leads(query).await;
    if !sink.guard().is_current(ticket) {
        debug!(ticket, "dropping stale lead list");
        return Ok(());
    }
    sink.set_loading(false);

    match result {
        Ok(leads) => {
            debug!(count = leads.len(), "leads loaded");
            sink.apply(leads);
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "failed to load leads");
            report(sink, &err);
            Err(err)
        }
    }
}

pub async fn create_lead<A, S>(api: &A, sink: &S, query: &LeadQuery, draft: &LeadDraft) -> Outcome
where
    A: LeadApi + ?Sized,
    S: ListSink<Item = Lead> + ?Sized,
{
    let input = match draft.validate() {
        Ok(input) => input,
        Err(errors) => return Outcome::Invalid(errors),
    };

    info!(email = %input.email, "creating lead");
    match api.create_lead(&query.company_id, &input).await {
        Ok(()) => {
            sink.notify(Notice::success("Lead created"));
            let _ = refresh_leads(api, sink, query).await;
            Outcome::Saved
        }
        Err(err) => {
            warn!(error = %err, "creating lead failed");
            report(sink, &err);
            Outcome::Failed(err)
        }
    }
}

pub async fn convert_lead<A, S>(api: &A, sink: &S, query: &LeadQuery, id: &str) -> Outcome
where
    A: LeadApi + ?Sized,
    S: ListSink<Item = Lead> + ?Sized,
{
    let current = sink.current();
    match current.iter().find(|l| l.id == id) {
        None => return reject(sink, format!("Lead {} is no longer loaded", id)),
        Some(lead) if !lead.status.is_convertible() => {
            return reject(sink, format!("{} is already {}", lead.full_name(), lead.status.as_str()));
        }
        Some(_) => {}
    }

    info!(id, "converting lead");
    match api.convert_lead(id).await {
        Ok(()) => {
            sink.notify(Notice::success("Lead converted"));
            let _ = refresh_leads(api, sink, query).await;
            Outcome::Saved
        }
        Err(err) => {
            warn!(id, error = %err, "conversion failed");
            report(sink, &err);
            Outcome::Failed(err)
        }
    }
}
