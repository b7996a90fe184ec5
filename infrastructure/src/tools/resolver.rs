//! Title resolver: turns an id-or-title reference into one entity id.
//!
//! Read-only regardless of outcome: the only store call is a bounded
//! candidate look-up, and it is skipped entirely when an id is given.

use super::args::EntityRef;
use testhub_application::{StoreError, TestStore};
use testhub_domain::{DisambiguationOutcome, EntityKind, MAX_CANDIDATES};
use tracing::debug;

pub struct TitleResolver<'a> {
    store: &'a dyn TestStore,
}

impl<'a> TitleResolver<'a> {
    pub fn new(store: &'a dyn TestStore) -> Self {
        Self { store }
    }

    pub(crate) async fn resolve(
        &self,
        kind: EntityKind,
        reference: &EntityRef,
    ) -> Result<DisambiguationOutcome, StoreError> {
        self.resolve_parts(
            kind,
            reference.id.as_deref(),
            reference.search_title.as_deref(),
            reference.project_id.as_deref(),
        )
        .await
    }

    /// Resolve from raw parts. Blank strings are expected to be filtered out
    /// by the caller.
    pub async fn resolve_parts(
        &self,
        kind: EntityKind,
        id: Option<&str>,
        search_title: Option<&str>,
        project_id: Option<&str>,
    ) -> Result<DisambiguationOutcome, StoreError> {
        if let Some(id) = id {
            return Ok(DisambiguationOutcome::Resolved(id.to_string()));
        }
        let Some(fragment) = search_title else {
            return Ok(DisambiguationOutcome::InsufficientInput);
        };

        let candidates = self
            .store
            .find_candidates(kind, fragment, project_id, MAX_CANDIDATES)
            .await?;
        debug!(
            "Resolving {:?} by title '{}': {} candidates",
            kind,
            fragment,
            candidates.len()
        );

        Ok(DisambiguationOutcome::classify(kind, fragment, candidates))
    }
}
