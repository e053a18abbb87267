//! Port for the nine attribute reference tables.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::catalog::{Attribute, AttributeDraft, AttributeKind, AttributeRef};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by attribute persistence adapters.
    pub enum AttributeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "attribute repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "attribute repository query failed: {message}",
        /// The referenced attribute does not exist.
        NotFound { kind: AttributeKind, id: Uuid } =>
            "no {kind} attribute with id {id}",
        /// Another attribute of this kind already uses the slug.
        DuplicateSlug { kind: AttributeKind, slug: String } =>
            "{kind} slug already in use: {slug}",
    }
}

/// CRUD plus the bulk index the import resolver reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttributeRepository: Send + Sync {
    /// List attributes of one kind ordered by sort order then name.
    async fn list(&self, kind: AttributeKind) -> Result<Vec<Attribute>, AttributeRepositoryError>;

    /// Load every attribute of every kind in one pass. Used to build the
    /// import resolver's lookup index.
    async fn load_index(&self) -> Result<Vec<AttributeRef>, AttributeRepositoryError>;

    async fn create(
        &self,
        kind: AttributeKind,
        draft: &AttributeDraft,
    ) -> Result<Attribute, AttributeRepositoryError>;

    async fn update(
        &self,
        kind: AttributeKind,
        id: Uuid,
        draft: &AttributeDraft,
    ) -> Result<Attribute, AttributeRepositoryError>;

    async fn delete(&self, kind: AttributeKind, id: Uuid)
        -> Result<(), AttributeRepositoryError>;
}

/// Fixture implementation with an empty reference set.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAttributeRepository;

#[async_trait]
impl AttributeRepository for FixtureAttributeRepository {
    async fn list(
        &self,
        _kind: AttributeKind,
    ) -> Result<Vec<Attribute>, AttributeRepositoryError> {
        Ok(Vec::new())
    }

    async fn load_index(&self) -> Result<Vec<AttributeRef>, AttributeRepositoryError> {
        Ok(Vec::new())
    }

    async fn create(
        &self,
        _kind: AttributeKind,
        _draft: &AttributeDraft,
    ) -> Result<Attribute, AttributeRepositoryError> {
        Err(AttributeRepositoryError::connection(
            "no database configured",
        ))
    }

    async fn update(
        &self,
        _kind: AttributeKind,
        _id: Uuid,
        _draft: &AttributeDraft,
    ) -> Result<Attribute, AttributeRepositoryError> {
        Err(AttributeRepositoryError::connection(
            "no database configured",
        ))
    }

    async fn delete(
        &self,
        _kind: AttributeKind,
        _id: Uuid,
    ) -> Result<(), AttributeRepositoryError> {
        Err(AttributeRepositoryError::connection(
            "no database configured",
        ))
    }
}
