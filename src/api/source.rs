//! Capability trait for chart data and artwork.
//!
//! The collage facade only talks to a [`ChartSource`], so tests can swap
//! the live Last.fm client for an in-memory fake.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::artwork;
use crate::error::Result;
use crate::models::{Entity, EntityKind, Period};

/// Provider of ranked top lists and their cover images.
#[async_trait]
pub trait ChartSource: Send + Sync {
    /// Fetch at most `limit` top entities for `username`, in the
    /// service's ranking order.
    async fn fetch_top_entities(
        &self,
        kind: EntityKind,
        username: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<Entity>>;

    /// Download the raw bytes of the image at `url`.
    async fn fetch_image(&self, url: &str) -> Result<Bytes>;

    /// Download an entity's artwork, or return the placeholder PNG when
    /// it has none.
    async fn fetch_artwork(&self, url: Option<&str>) -> Result<Bytes> {
        match url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => self.fetch_image(url).await,
            None => {
                debug!("No artwork URL, using placeholder");
                artwork::placeholder_png()
            }
        }
    }
}
