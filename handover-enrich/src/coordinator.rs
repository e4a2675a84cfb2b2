//! Fan-out/join name resolution
//!
//! One tokio task per role. Every task ends with a mapping: the resolver's
//! own on success, a fallback mapping on failure or deadline. The join waits
//! for all four tasks, so a slow resolver holds the request and a failing
//! one never cancels its siblings.
//!
//! The only terminal error is a task that did not finish (panic or runtime
//! shutdown).

use std::sync::Arc;
use std::time::Duration;

use handover_core::{
    fallback_mapping, EnrichError, IdentifierSet, IdentifierSets, NameBundle, NameMapping,
    NameResolver, PerRole, ResolveError, ResolveResult, Role,
};
use tokio::task::{JoinError, JoinHandle};
use tracing::Instrument;

/// One resolver per role. Roles may share a resolver.
pub type Resolvers = PerRole<Arc<dyn NameResolver>>;

/// Build resolvers where both caregiver roles use the same directory.
pub fn resolvers_with_shared_caregiver(
    client: Arc<dyn NameResolver>,
    caregiver: Arc<dyn NameResolver>,
    user: Arc<dyn NameResolver>,
) -> Resolvers {
    PerRole {
        client,
        old_caregiver: Arc::clone(&caregiver),
        new_caregiver: caregiver,
        user,
    }
}

/// How a resolution task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The resolver answered; the mapping is its answer.
    Succeeded(NameMapping),
    /// The resolver failed or ran out of time; the mapping holds labels.
    FellBack(NameMapping),
}

impl TaskOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, TaskOutcome::FellBack(_))
    }

    pub fn mapping(&self) -> &NameMapping {
        match self {
            TaskOutcome::Succeeded(names) | TaskOutcome::FellBack(names) => names,
        }
    }

    pub fn into_mapping(self) -> NameMapping {
        match self {
            TaskOutcome::Succeeded(names) | TaskOutcome::FellBack(names) => names,
        }
    }
}

/// Runs the four role resolutions concurrently.
#[derive(Clone)]
pub struct Coordinator {
    resolvers: Resolvers,
    deadline: Option<Duration>,
}

impl Coordinator {
    pub fn new(resolvers: Resolvers) -> Self {
        Self {
            resolvers,
            deadline: None,
        }
    }

    /// Per-task deadline. An exceeded deadline is handled like a resolver
    /// failure.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Resolve every role and return the four mappings.
    pub async fn resolve_all(&self, ids: IdentifierSets) -> Result<NameBundle, EnrichError> {
        let outcomes = self.resolve_all_outcomes(ids).await?;
        Ok(outcomes.map(|_, outcome| outcome.into_mapping()))
    }

    /// Like [`Coordinator::resolve_all`], keeping whether each role fell back.
    pub async fn resolve_all_outcomes(
        &self,
        ids: IdentifierSets,
    ) -> Result<PerRole<TaskOutcome>, EnrichError> {
        let PerRole {
            client,
            old_caregiver,
            new_caregiver,
            user,
        } = ids;

        let client = self.spawn(Role::Client, client);
        let old_caregiver = self.spawn(Role::OldCaregiver, old_caregiver);
        let new_caregiver = self.spawn(Role::NewCaregiver, new_caregiver);
        let user = self.spawn(Role::User, user);

        let (client, old_caregiver, new_caregiver, user) =
            tokio::join!(client, old_caregiver, new_caregiver, user);

        Ok(PerRole {
            client: joined(Role::Client, client)?,
            old_caregiver: joined(Role::OldCaregiver, old_caregiver)?,
            new_caregiver: joined(Role::NewCaregiver, new_caregiver)?,
            user: joined(Role::User, user)?,
        })
    }

    fn spawn(&self, role: Role, ids: IdentifierSet) -> JoinHandle<TaskOutcome> {
        let resolver = Arc::clone(self.resolvers.get(role));
        let span = tracing::debug_span!("resolve_names", %role, ids = ids.len());
        tokio::spawn(resolve_role(role, resolver, ids, self.deadline).instrument(span))
    }
}

async fn resolve_role(
    role: Role,
    resolver: Arc<dyn NameResolver>,
    ids: IdentifierSet,
    deadline: Option<Duration>,
) -> TaskOutcome {
    match call_resolver(resolver.as_ref(), &ids, deadline).await {
        Ok(names) => {
            tracing::debug!(resolved = names.len(), "Names resolved");
            TaskOutcome::Succeeded(names)
        }
        Err(err) => {
            tracing::warn!(
                resolver = resolver.name(),
                error = %err,
                "Name resolution failed, using fallback labels"
            );
            TaskOutcome::FellBack(fallback_mapping(role, &ids))
        }
    }
}

async fn call_resolver(
    resolver: &dyn NameResolver,
    ids: &[String],
    deadline: Option<Duration>,
) -> ResolveResult<NameMapping> {
    let Some(limit) = deadline else {
        return resolver.resolve_names(ids).await;
    };

    match tokio::time::timeout(limit, resolver.resolve_names(ids)).await {
        Ok(result) => result,
        Err(_) => Err(ResolveError::Timeout {
            resolver: resolver.name().to_string(),
            elapsed: limit,
        }),
    }
}

fn joined(role: Role, result: Result<TaskOutcome, JoinError>) -> Result<TaskOutcome, EnrichError> {
    result.map_err(|err| {
        let reason = if err.is_panic() {
            "task panicked".to_string()
        } else {
            format!("task did not run to completion: {}", err)
        };
        tracing::error!(%role, %reason, "Resolution task failed");
        EnrichError::TaskJoin { role, reason }
    })
}
