//! Credentials and collage options.

use std::fmt;

use crate::error::{CollageError, Result};
use crate::models::{GridSpec, Period};

/// Last.fm API credentials.
///
/// Never mutated after construction, so one value can be cloned into as
/// many clients as needed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    /// Create credentials from an API key and shared secret.
    pub fn new<S1: Into<String>, S2: Into<String>>(api_key: S1, api_secret: S2) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Grid shape, ranking window and captions for one collage.
///
/// Defaults to a 5x5 grid over the last seven days, captioned with
/// title and playcount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollageOptions {
    pub cols: u32,
    pub rows: u32,
    pub period: Period,
    /// Draw "Artist - Title" over the bottom of each filled cell.
    pub show_captions: bool,
    /// Append the playcount to captions.
    pub show_playcount: bool,
}

impl Default for CollageOptions {
    fn default() -> Self {
        Self {
            cols: 5,
            rows: 5,
            period: Period::default(),
            show_captions: true,
            show_playcount: true,
        }
    }
}

impl CollageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cols(mut self, cols: u32) -> Self {
        self.cols = cols;
        self
    }

    pub fn with_rows(mut self, rows: u32) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    pub fn with_captions(mut self, show: bool) -> Self {
        self.show_captions = show;
        self
    }

    pub fn with_playcount(mut self, show: bool) -> Self {
        self.show_playcount = show;
        self
    }

    /// Check the bounds and return the grid shape.
    pub fn validate(&self) -> Result<GridSpec> {
        GridSpec::new(self.rows, self.cols)
    }
}

/// Reject empty or blank usernames before any request goes out.
pub(crate) fn validate_username(username: &str) -> Result<&str> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(CollageError::InvalidConfiguration(
            "Username must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CollageOptions::default();
        assert_eq!(options.cols, 5);
        assert_eq!(options.rows, 5);
        assert_eq!(options.period, Period::Week);
        assert!(options.show_captions);
        assert!(options.show_playcount);
        assert_eq!(options.validate().unwrap().capacity(), 25);
    }

    #[test]
    fn test_builder_and_validation() {
        let options = CollageOptions::new()
            .with_cols(3)
            .with_rows(2)
            .with_period(Period::Overall);
        let grid = options.validate().unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 3));

        assert!(CollageOptions::new().with_rows(6).validate().is_err());
        assert!(CollageOptions::new().with_cols(0).validate().is_err());

        let plain = CollageOptions::new().with_captions(false).with_playcount(false);
        assert!(!plain.show_captions);
        assert!(!plain.show_playcount);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("key", "very-secret");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("key"));
        assert!(!printed.contains("very-secret"));
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username(" rj ").unwrap(), "rj");
        assert!(validate_username("   ").is_err());
    }
}
