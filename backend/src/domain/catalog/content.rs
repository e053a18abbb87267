//! Storefront content: gallery images and the landing banner.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A curated gallery image shown on the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: Uuid,
    pub url: String,
    pub caption: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Fields supplied when creating or updating a gallery image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImageDraft {
    pub url: String,
    pub caption: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

/// The single landing-page banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: Uuid,
    pub headline: String,
    pub subtext: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub is_active: bool,
}

/// Fields supplied when replacing the banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerDraft {
    pub headline: String,
    pub subtext: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub is_active: bool,
}
