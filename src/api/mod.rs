//! API clients for Last.fm.
//!
//! - [`LastfmClient`]: HTTP client for top lists and cover images
//! - [`ChartSource`]: the capability the collage facade depends on

pub mod lastfm;
pub mod source;

pub use lastfm::LastfmClient;
pub use source::ChartSource;
