//! PostgreSQL-backed storefront content adapter.
//!
//! The banner is replace-only: `set_banner` clears the table and inserts one
//! row inside a transaction, keeping the at-most-one invariant in the data.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::catalog::{Banner, BannerDraft, GalleryImage, GalleryImageDraft};
use crate::domain::ports::{ContentRepository, ContentRepositoryError};

use super::diesel_helpers::{
    is_connection_failure, map_diesel_error_message, map_pool_error_message,
};
use super::models::{
    BannerRow, GalleryImageChangeset, GalleryImageRow, NewBannerRow, NewGalleryImageRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{banners, gallery_images};

/// Diesel-backed implementation of the content repository port.
#[derive(Clone)]
pub struct DieselContentRepository {
    pool: DbPool,
}

impl DieselContentRepository {
    /// Create a new repository with the given connection pool.
    #[rustfmt::skip]
    pub fn new(pool: DbPool) -> Self { Self { pool } }
}

fn map_pool_error(error: PoolError) -> ContentRepositoryError {
    ContentRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> ContentRepositoryError {
    if is_connection_failure(&error) {
        return ContentRepositoryError::connection(map_diesel_error_message(error, operation));
    }
    ContentRepositoryError::query(map_diesel_error_message(error, operation))
}

#[async_trait]
impl ContentRepository for DieselContentRepository {
    async fn banner(&self) -> Result<Option<Banner>, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BannerRow> = banners::table
            .select(BannerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "banner read"))?;
        Ok(row.map(Banner::from))
    }

    async fn set_banner(&self, draft: &BannerDraft) -> Result<Banner, ContentRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewBannerRow {
            id: Uuid::new_v4(),
            headline: &draft.headline,
            subtext: draft.subtext.as_deref(),
            image_url: draft.image_url.as_deref(),
            link_url: draft.link_url.as_deref(),
            is_active: draft.is_active,
        };
        let row: BannerRow = conn
            .transaction(|conn| {
                async move {
                    diesel::delete(banners::table).execute(conn).await?;
                    diesel::insert_into(banners::table)
                        .values(&new_row)
                        .returning(BannerRow::as_returning())
                        .get_result(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, "banner replace"))?;
        Ok(Banner::from(row))
    }

    async fn gallery(
        &self,
        active_only: bool,
    ) -> Result<Vec<GalleryImage>, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = gallery_images::table.into_boxed();
        if active_only {
            query = query.filter(gallery_images::is_active.eq(true));
        }
        let rows: Vec<GalleryImageRow> = query
            .order_by(gallery_images::sort_order.asc())
            .select(GalleryImageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "gallery list"))?;
        Ok(rows.into_iter().map(GalleryImage::from).collect())
    }

    async fn add_gallery_image(
        &self,
        draft: &GalleryImageDraft,
    ) -> Result<GalleryImage, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewGalleryImageRow {
            id: Uuid::new_v4(),
            url: &draft.url,
            caption: draft.caption.as_deref(),
            sort_order: draft.sort_order,
            is_active: draft.is_active,
        };
        let row: GalleryImageRow = diesel::insert_into(gallery_images::table)
            .values(&new_row)
            .returning(GalleryImageRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "gallery insert"))?;
        Ok(GalleryImage::from(row))
    }

    async fn update_gallery_image(
        &self,
        id: Uuid,
        draft: &GalleryImageDraft,
    ) -> Result<GalleryImage, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = GalleryImageChangeset {
            url: &draft.url,
            caption: Some(draft.caption.as_deref()),
            sort_order: draft.sort_order,
            is_active: draft.is_active,
        };
        let row: Option<GalleryImageRow> =
            diesel::update(gallery_images::table.filter(gallery_images::id.eq(id)))
                .set(&changeset)
                .returning(GalleryImageRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(|err| map_diesel_error(err, "gallery update"))?;
        let row = row.ok_or(ContentRepositoryError::NotFound { id })?;
        Ok(GalleryImage::from(row))
    }

    async fn delete_gallery_image(&self, id: Uuid) -> Result<(), ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(gallery_images::table.filter(gallery_images::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "gallery delete"))?;
        if deleted == 0 {
            return Err(ContentRepositoryError::NotFound { id });
        }
        Ok(())
    }
}
