//! Collage generator facade.
//!
//! Validates options, fetches the top list, downloads each cover in rank
//! order, hands the decoded images to the layout engine and captions the
//! filled cells.

use tracing::{debug, info};

use crate::api::{ChartSource, LastfmClient};
use crate::artwork;
use crate::caption::{self, CaptionRenderer};
use crate::config::{self, CollageOptions, Credentials};
use crate::error::{CollageError, Result};
use crate::layout::{self, Collage};
use crate::models::{CellSize, EntityKind, GridSpec, Period};

/// Main collage interface.
///
/// Holds nothing but the chart source (and with it the immutable
/// credentials), so every call starts from scratch: no caching, no
/// state shared between calls.
///
/// # Example
///
/// ```rust,no_run
/// use lastfm_collage::{CollageGenerator, CollageOptions, Period};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let generator = CollageGenerator::new("api_key", "api_secret")?;
///     let options = CollageOptions::new().with_cols(3).with_rows(3).with_period(Period::Month);
///     let collage = generator.generate_top_albums_collage("rj", options).await?;
///     collage.save("collage.png")?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CollageGenerator<S = LastfmClient> {
    source: S,
    cell_size: CellSize,
}

impl CollageGenerator<LastfmClient> {
    /// Create a generator backed by the live Last.fm API.
    pub fn new(api_key: &str, api_secret: &str) -> Result<Self> {
        Self::from_credentials(Credentials::new(api_key, api_secret))
    }

    pub fn from_credentials(credentials: Credentials) -> Result<Self> {
        Ok(Self::with_source(LastfmClient::new(credentials)?))
    }
}

impl<S: ChartSource> CollageGenerator<S> {
    /// Create a generator over any chart source.
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            cell_size: CellSize::default(),
        }
    }

    /// Override the 300x300 cell size.
    pub fn with_cell_size(mut self, cell_size: CellSize) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Build a collage of `username`'s top `entity` items.
    ///
    /// Any failure aborts the whole call; no partial collage is returned.
    pub async fn generate(
        &self,
        entity: EntityKind,
        username: &str,
        options: CollageOptions,
    ) -> Result<Collage> {
        let grid = options.validate()?;
        let username = config::validate_username(username)?;
        self.validate_cell_size()?;

        self.build(entity, username, grid, &options).await
    }

    /// Same as [`generate`](Self::generate), with entity and period given
    /// by name (`"album"`, `"7day"`, ...).
    ///
    /// Unknown names are rejected before any request goes out.
    pub async fn generate_named(
        &self,
        entity: &str,
        username: &str,
        cols: u32,
        rows: u32,
        period: &str,
    ) -> Result<Collage> {
        let entity: EntityKind = entity.parse()?;
        let period: Period = period.parse()?;
        let options = CollageOptions {
            cols,
            rows,
            period,
            ..Default::default()
        };
        self.generate(entity, username, options).await
    }

    /// Collage of the user's top albums.
    pub async fn generate_top_albums_collage(
        &self,
        username: &str,
        options: CollageOptions,
    ) -> Result<Collage> {
        self.generate(EntityKind::Album, username, options).await
    }

    /// Collage of the user's top artists.
    pub async fn generate_top_artists_collage(
        &self,
        username: &str,
        options: CollageOptions,
    ) -> Result<Collage> {
        self.generate(EntityKind::Artist, username, options).await
    }

    /// Collage of the user's top tracks.
    pub async fn generate_top_tracks_collage(
        &self,
        username: &str,
        options: CollageOptions,
    ) -> Result<Collage> {
        self.generate(EntityKind::Track, username, options).await
    }

    fn validate_cell_size(&self) -> Result<()> {
        if self.cell_size.width == 0 || self.cell_size.height == 0 {
            return Err(CollageError::InvalidConfiguration(format!(
                "Invalid cell size: {}x{}",
                self.cell_size.width, self.cell_size.height
            )));
        }
        Ok(())
    }

    async fn build(
        &self,
        entity: EntityKind,
        username: &str,
        grid: GridSpec,
        options: &CollageOptions,
    ) -> Result<Collage> {
        let period = options.period;
        let entities = self
            .source
            .fetch_top_entities(entity, username, period, grid.capacity())
            .await?;

        let mut images = Vec::with_capacity(entities.len());
        for item in entities.iter().take(grid.capacity() as usize) {
            debug!("Fetching artwork for #{} {}", item.rank, item.title());
            let url = item.image_url.as_deref();
            let data = self.source.fetch_artwork(url).await?;
            images.push(artwork::decode(url.unwrap_or("placeholder"), &data)?);
        }

        let mut collage = layout::compose(&images, grid, self.cell_size);

        if options.show_captions {
            let renderer = CaptionRenderer::new()?;
            for (index, item) in entities.iter().take(images.len()).enumerate() {
                if let Some((row, col)) = grid.cell_of(index as u32) {
                    let text = caption::caption_text(item, options.show_playcount);
                    renderer.draw(&mut collage, row, col, &text);
                }
            }
        }

        info!(
            "Generated {}x{} {} collage for {} ({}, {} of {} cells filled)",
            grid.cols(),
            grid.rows(),
            entity,
            username,
            period,
            images.len(),
            grid.capacity()
        );
        Ok(collage)
    }
}
