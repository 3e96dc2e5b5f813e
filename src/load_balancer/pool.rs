//! Backend pool management.
//!
//! # Responsibilities
//! - Manage collections of backends grouped by name
//! - Consult session affinity before normal selection
//! - Apply load balancing algorithms to select backends
//! - Mark responses so clients stick to balancer-chosen backends

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{Request, Response};
use url::Url;

use crate::affinity::{
    has_application_session, Affinity, AffinityDecision, StickySession, StickySessionError,
};
use crate::config::{BackendConfig, BalancerConfig};
use crate::load_balancer::{backend::Backend, round_robin::RoundRobin, LoadBalancer};
use crate::observability::metrics;

/// Where a selected backend came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// The request's affinity value named an alive backend.
    Affinity,
    /// The group's load balancer picked it.
    Balancer,
}

/// A selected backend.
#[derive(Debug, Clone)]
pub struct Selection {
    backend: Arc<Backend>,
    source: SelectionSource,
    /// True only for balancer choices made while affinity applied.
    markable: bool,
}

impl Selection {
    pub fn backend(&self) -> &Arc<Backend> {
        &self.backend
    }

    pub fn source(&self) -> SelectionSource {
        self.source
    }

    pub fn is_sticky(&self) -> bool {
        self.source == SelectionSource::Affinity
    }
}

#[derive(Debug)]
struct BackendGroup {
    backends: Vec<Arc<Backend>>,
    balancer: Box<dyn LoadBalancer>,
}

impl BackendGroup {
    /// Snapshot of the URLs currently considered alive.
    fn alive_urls(&self) -> Vec<Url> {
        self.backends
            .iter()
            .filter(|b| b.is_healthy())
            .map(|b| b.url.clone())
            .collect()
    }

    fn find(&self, url: &Url) -> Option<Arc<Backend>> {
        self.backends.iter().find(|b| &b.url == url).cloned()
    }
}

/// Manages backend pools, load balancing and session affinity.
#[derive(Debug)]
pub struct BackendManager<A = StickySession> {
    /// Map of backend_group name -> group.
    groups: HashMap<String, BackendGroup>,
    affinity: Option<Arc<A>>,
    require_app_session: bool,
}

impl BackendManager<StickySession> {
    /// Create a backend manager without session affinity.
    pub fn new(configs: Vec<BackendConfig>) -> Self {
        Self::build(configs, None)
    }

    /// Create a backend manager, with sticky sessions if enabled.
    pub fn from_config(config: &BalancerConfig) -> Result<Self, StickySessionError> {
        let sticky = &config.sticky_session;
        if !sticky.enabled {
            return Ok(Self::new(config.backends.clone()));
        }

        let session = StickySession::from_config(sticky)?;
        tracing::info!(
            carrier = %session.carrier_name(),
            marker = ?session.marker(),
            require_app_session = sticky.require_app_session,
            "Sticky sessions enabled"
        );

        Ok(Self::with_affinity(config.backends.clone(), Arc::new(session))
            .require_app_session(sticky.require_app_session))
    }
}

impl<A: Affinity> BackendManager<A> {
    /// Create a backend manager that consults `affinity` on every selection.
    pub fn with_affinity(configs: Vec<BackendConfig>, affinity: Arc<A>) -> Self {
        Self::build(configs, Some(affinity))
    }

    /// Only attempt affinity for requests carrying an application session.
    pub fn require_app_session(mut self, required: bool) -> Self {
        self.require_app_session = required;
        self
    }

    fn build(configs: Vec<BackendConfig>, affinity: Option<Arc<A>>) -> Self {
        let mut grouped: HashMap<String, Vec<Arc<Backend>>> = HashMap::new();

        for config in configs {
            match Url::parse(&config.url) {
                Ok(url) => {
                    let backend = Arc::new(Backend::new(config.name, url));
                    grouped.entry(config.group).or_default().push(backend);
                }
                Err(e) => {
                    tracing::warn!(backend = %config.name, url = %config.url, error = %e, "Invalid backend url");
                }
            }
        }

        let groups = grouped
            .into_iter()
            .map(|(name, backends)| {
                let balancer: Box<dyn LoadBalancer> = Box::new(RoundRobin::new());
                (name, BackendGroup { backends, balancer })
            })
            .collect();

        Self {
            groups,
            affinity,
            require_app_session: false,
        }
    }

    pub fn affinity(&self) -> Option<&A> {
        self.affinity.as_deref()
    }

    /// Select a backend for the given group.
    ///
    /// A request naming an alive backend is routed there; otherwise the
    /// group's balancer picks one.
    pub fn select<B>(&self, group_name: &str, req: &Request<B>) -> Option<Selection> {
        let Some(group) = self.groups.get(group_name) else {
            tracing::debug!(group = %group_name, "Group not found in BackendManager");
            return None;
        };

        let affinity = self
            .affinity
            .as_deref()
            .filter(|_| !self.require_app_session || has_application_session(req));

        if self.affinity.is_some() && affinity.is_none() {
            metrics::record_affinity_decision("skipped");
        }

        if let Some(affinity) = affinity {
            if let Some(backend) = self.resolve(group_name, group, affinity, req) {
                return Some(Selection {
                    backend,
                    source: SelectionSource::Affinity,
                    markable: false,
                });
            }
        }

        match group.balancer.next_server(&group.backends) {
            Some(backend) => Some(Selection {
                backend,
                source: SelectionSource::Balancer,
                markable: affinity.is_some(),
            }),
            None => {
                tracing::debug!(group = %group_name, backend_count = group.backends.len(), "No healthy backends found in group");
                None
            }
        }
    }

    fn resolve<B>(
        &self,
        group_name: &str,
        group: &BackendGroup,
        affinity: &A,
        req: &Request<B>,
    ) -> Option<Arc<Backend>> {
        let alive = group.alive_urls();
        match affinity.resolve(req, &alive) {
            AffinityDecision::Honor(url) => {
                metrics::record_affinity_decision("hit");
                group.find(&url)
            }
            AffinityDecision::NotFound => {
                metrics::record_affinity_decision("miss");
                None
            }
            AffinityDecision::Stale { requested } => {
                metrics::record_affinity_decision("stale");
                tracing::debug!(group = %group_name, backend = %requested, "Sticky backend unavailable, rebalancing");
                None
            }
            AffinityDecision::Malformed(e) => {
                metrics::record_affinity_decision("malformed");
                tracing::warn!(group = %group_name, error = %e, "Ignoring malformed affinity value");
                None
            }
        }
    }

    /// Mark the response with a balancer-chosen backend.
    ///
    /// Sticky hits are left alone: the client already carries the value.
    pub fn stick<B>(&self, selection: &Selection, res: &mut Response<B>) {
        if !selection.markable {
            return;
        }
        if let Some(affinity) = &self.affinity {
            affinity.mark(res, &selection.backend.url);
        }
    }

    /// URLs of the alive backends in a group.
    pub fn alive_urls(&self, group_name: &str) -> Vec<Url> {
        self.groups
            .get(group_name)
            .map(BackendGroup::alive_urls)
            .unwrap_or_default()
    }

    /// Return a list of all backends (for the liveness collaborator).
    pub fn all_backends(&self) -> Vec<Arc<Backend>> {
        self.groups
            .values()
            .flat_map(|group| group.backends.iter())
            .cloned()
            .collect()
    }
}
