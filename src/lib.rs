//! # Last.fm Collage
//!
//! A Rust library that turns a Last.fm user's top albums, artists or
//! tracks into a grid collage of their cover art.
//!
//! ## Quick Start
//!
//! The easiest way to use this library is through the [`CollageGenerator`] struct:
//!
//! ```rust,no_run
//! use lastfm_collage::{CollageGenerator, CollageOptions, Period};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = CollageGenerator::new("your_api_key", "your_api_secret")?;
//!
//!     // 5x5 grid of the last seven days
//!     let collage = generator
//!         .generate_top_albums_collage("rj", CollageOptions::default())
//!         .await?;
//!     collage.save("albums.png")?;
//!
//!     // 3x2 grid of all-time top artists
//!     let options = CollageOptions::new()
//!         .with_cols(3)
//!         .with_rows(2)
//!         .with_period(Period::Overall);
//!     let collage = generator.generate_top_artists_collage("rj", options).await?;
//!     println!("{}x{} pixels", collage.width(), collage.height());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. Options are validated (1 to 5 rows and columns).
//! 2. The top `rows * cols` entities are fetched, in the service's order.
//! 3. Each cover is downloaded one at a time; entities without artwork
//!    get a fixed placeholder.
//! 4. Covers are tiled row-major into 300x300 cells.
//! 5. Unless turned off, each filled cell gets an "Artist - Title.
//!    (playcount)" caption on a translucent strip.
//!
//! Any error aborts the call; no partial collage is returned.
//!
//! ## Low-Level APIs
//!
//! - [`LastfmClient`] - Top lists and image downloads
//! - [`ChartSource`] - The capability the generator depends on, for fakes
//! - [`layout`] - The pure grid layout engine

pub mod api;
pub mod artwork;
pub mod caption;
pub mod config;
pub mod converters;
pub mod error;
mod generator;
pub mod layout;
pub mod models;

// Main interface (recommended)
pub use generator::CollageGenerator;

pub use api::{ChartSource, LastfmClient};
pub use config::{CollageOptions, Credentials};
pub use error::{CollageError, Result};
pub use layout::Collage;
pub use models::{CellSize, Entity, EntityKind, GridSpec, Period};
