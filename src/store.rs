//! Page State Stores
//!
//! Each screen owns a `reactive_stores` store for its list. The `ListSink`
//! impls let the domain commands write into them. A command can finish after
//! its screen is gone (tab switch mid-request); its writes are then dropped.

use std::sync::Arc;

use leptos::prelude::*;
use reactive_stores::Store;

use crm_domain::commands::{ListSink, LoadGuard, Notice};
use crm_domain::{Lead, Stage};

use crate::context::AppContext;

/// Stage board state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct StageBoardState {
    /// All stages of the company, in stored order
    pub stages: Vec<Stage>,
    pub loading: bool,
    /// First load finished (successfully or not)
    pub loaded: bool,
}

#[derive(Clone, Debug, Default, Store)]
pub struct LeadsState {
    /// Fetched leads, unfiltered
    pub leads: Vec<Lead>,
    pub loading: bool,
    pub loaded: bool,
}

pub type StageStore = Store<StageBoardState>;
pub type LeadStore = Store<LeadsState>;

/// Stage store wired to app notices
#[derive(Clone)]
pub struct StageSink {
    store: StageStore,
    ctx: AppContext,
    guard: Arc<LoadGuard>,
}

impl StageSink {
    pub fn new(store: StageStore, ctx: AppContext) -> Self {
        Self { store, ctx, guard: Arc::new(LoadGuard::default()) }
    }
}

impl ListSink for StageSink {
    type Item = Stage;

    fn current(&self) -> Vec<Stage> {
        self.store.stages().try_get_untracked().unwrap_or_default()
    }

    fn apply(&self, items: Vec<Stage>) {
        if self.store.is_disposed() {
            return;
        }
        *self.store.stages().write() = items;
        *self.store.loaded().write() = true;
    }

    fn set_loading(&self, loading: bool) {
        if self.store.is_disposed() {
            return;
        }
        *self.store.loading().write() = loading;
        if !loading {
            *self.store.loaded().write() = true;
        }
    }

    fn notify(&self, notice: Notice) {
        self.ctx.notify(notice);
    }

    fn session_expired(&self) {
        self.ctx.expire_session();
    }

    fn guard(&self) -> &LoadGuard {
        &self.guard
    }
}

/// Lead store wired to app notices
#[derive(Clone)]
pub struct LeadSink {
    store: LeadStore,
    ctx: AppContext,
    guard: Arc<LoadGuard>,
}

impl LeadSink {
    pub fn new(store: LeadStore, ctx: AppContext) -> Self {
        Self { store, ctx, guard: Arc::new(LoadGuard::default()) }
    }
}

impl ListSink for LeadSink {
    type Item = Lead;

    fn current(&self) -> Vec<Lead> {
        self.store.leads().try_get_untracked().unwrap_or_default()
    }

    fn apply(&self, items: Vec<Lead>) {
        if self.store.is_disposed() {
            return;
        }
        *self.store.leads().write() = items;
        *self.store.loaded().write() = true;
    }

    fn set_loading(&self, loading: bool) {
        if self.store.is_disposed() {
            return;
        }
        *self.store.loading().write() = loading;
        if !loading {
            *self.store.loaded().write() = true;
        }
    }

    fn notify(&self, notice: Notice) {
        self.ctx.notify(notice);
    }

    fn session_expired(&self) {
        self.ctx.expire_session();
    }

    fn guard(&self) -> &LoadGuard {
        &self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_domain::config::AppConfig;

    fn stage(id: &str) -> Stage {
        Stage::new(id, "c1", id.to_uppercase(), 0)
    }

    #[test]
    fn test_stage_sink_writes_after_unmount_are_dropped() {
        let root = Owner::new();
        root.set();
        let ctx = AppContext::new(AppConfig::for_company("c1"));

        let page = root.child();
        let (store, sink) = page.with(|| {
            let store = Store::new(StageBoardState::default());
            (store, StageSink::new(store, ctx))
        });
        sink.set_loading(true);
        sink.apply(vec![stage("a")]);
        assert_eq!(sink.current().len(), 1);

        page.cleanup();
        assert!(store.is_disposed());

        // Response of a request started before the tab switch
        sink.set_loading(false);
        sink.apply(vec![stage("a"), stage("b")]);
        assert!(sink.current().is_empty());
    }

    #[test]
    fn test_lead_sink_writes_after_unmount_are_dropped() {
        let root = Owner::new();
        root.set();
        let ctx = AppContext::new(AppConfig::for_company("c1"));

        let page = root.child();
        let sink = page.with(|| LeadSink::new(Store::new(LeadsState::default()), ctx));
        page.cleanup();

        sink.set_loading(true);
        sink.apply(Vec::new());
        assert!(sink.current().is_empty());
    }
}
