//! Port for storefront content: the banner and the gallery.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::catalog::{Banner, BannerDraft, GalleryImage, GalleryImageDraft};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by content persistence adapters.
    pub enum ContentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "content repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "content repository query failed: {message}",
        /// The referenced gallery image does not exist.
        NotFound { id: Uuid } =>
            "no gallery image with id {id}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// The current banner, if one has been configured.
    async fn banner(&self) -> Result<Option<Banner>, ContentRepositoryError>;

    /// Replace the banner wholesale. There is at most one.
    async fn set_banner(&self, draft: &BannerDraft) -> Result<Banner, ContentRepositoryError>;

    /// Gallery images ordered by sort order. `active_only` for the storefront.
    async fn gallery(&self, active_only: bool)
        -> Result<Vec<GalleryImage>, ContentRepositoryError>;

    async fn add_gallery_image(
        &self,
        draft: &GalleryImageDraft,
    ) -> Result<GalleryImage, ContentRepositoryError>;

    async fn update_gallery_image(
        &self,
        id: Uuid,
        draft: &GalleryImageDraft,
    ) -> Result<GalleryImage, ContentRepositoryError>;

    async fn delete_gallery_image(&self, id: Uuid) -> Result<(), ContentRepositoryError>;
}

/// Fixture implementation with no content configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContentRepository;

#[async_trait]
impl ContentRepository for FixtureContentRepository {
    async fn banner(&self) -> Result<Option<Banner>, ContentRepositoryError> {
        Ok(None)
    }

    async fn set_banner(&self, _draft: &BannerDraft) -> Result<Banner, ContentRepositoryError> {
        Err(ContentRepositoryError::connection("no database configured"))
    }

    async fn gallery(
        &self,
        _active_only: bool,
    ) -> Result<Vec<GalleryImage>, ContentRepositoryError> {
        Ok(Vec::new())
    }

    async fn add_gallery_image(
        &self,
        _draft: &GalleryImageDraft,
    ) -> Result<GalleryImage, ContentRepositoryError> {
        Err(ContentRepositoryError::connection("no database configured"))
    }

    async fn update_gallery_image(
        &self,
        _id: Uuid,
        _draft: &GalleryImageDraft,
    ) -> Result<GalleryImage, ContentRepositoryError> {
        Err(ContentRepositoryError::connection("no database configured"))
    }

    async fn delete_gallery_image(&self, _id: Uuid) -> Result<(), ContentRepositoryError> {
        Err(ContentRepositoryError::connection("no database configured"))
    }
}
