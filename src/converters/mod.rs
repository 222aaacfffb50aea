//! JSON to model converters.
//!
//! Turns raw Last.fm `user.getTop*` responses into ranked [`Entity`]
//! lists. The service encodes numbers as strings and nests the rank
//! under `@attr`, so everything is read through small lenient helpers.

use serde_json::Value;

use crate::error::{CollageError, Result};
use crate::models::{Entity, EntityKind};

/// Hash of the generic star image Last.fm serves in place of real artwork.
pub const PLACEHOLDER_IMAGE_HASH: &str = "2a96cbd8b46e442fc41c2b86b821562f";

/// Image sizes in order of preference. `extralarge` is 300x300.
const IMAGE_SIZE_PREFERENCE: &[&str] = &["extralarge", "mega", "large", "medium", "small"];

/// Get string from JSON, returning empty string if not found.
fn get_str(json: &Value, key: &str) -> String {
    json.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Get u64 from JSON (handles both string and numeric values).
fn get_u64(json: &Value, key: &str) -> Option<u64> {
    json.get(key).and_then(|v| {
        v.as_u64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
    })
}

/// Artist name, which is an object for albums/tracks but may be a plain string.
fn get_artist_name(json: &Value) -> Option<String> {
    let artist = json.get("artist")?;
    let name = match artist {
        Value::String(s) => s.clone(),
        other => other
            .get("name")
            .or_else(|| other.get("#text"))
            .and_then(|n| n.as_str())
            .unwrap_or("")
            .to_string(),
    };
    (!name.is_empty()).then_some(name)
}

/// Whether a URL points at the generic star image.
pub fn is_placeholder_url(url: &str) -> bool {
    url.contains(PLACEHOLDER_IMAGE_HASH)
}

/// Pick the preferred cover URL from an `image` array.
///
/// Empty strings and the generic star image count as no artwork.
pub fn extract_image_url(json: &Value) -> Option<String> {
    let images: Vec<(String, String)> = json
        .get("image")
        .and_then(|i| i.as_array())
        .map(|arr| {
            arr.iter()
                .map(|img| (get_str(img, "size"), get_str(img, "#text")))
                .filter(|(_, url)| !url.trim().is_empty() && !is_placeholder_url(url))
                .collect()
        })
        .unwrap_or_default();

    IMAGE_SIZE_PREFERENCE
        .iter()
        .find_map(|size| images.iter().find(|(s, _)| s == size))
        .or_else(|| images.last())
        .map(|(_, url)| url.clone())
}

/// Items may come back as an array, a single object, or not at all.
fn items(container: &Value, key: &str) -> Vec<Value> {
    match container.get(key) {
        Some(Value::Array(arr)) => arr.clone(),
        Some(obj @ Value::Object(_)) => vec![obj.clone()],
        _ => Vec::new(),
    }
}

/// Parse one top-list item.
pub fn parse_entity(json: &Value, kind: EntityKind, position: usize) -> Result<Entity> {
    let name = get_str(json, "name");
    if name.is_empty() {
        return Err(CollageError::ServiceUnavailable(format!(
            "Malformed {} entry at position {}: missing name",
            kind, position
        )));
    }

    let artist = match kind {
        EntityKind::Artist => None,
        EntityKind::Album | EntityKind::Track => get_artist_name(json),
    };

    let rank = json
        .get("@attr")
        .and_then(|attr| get_u64(attr, "rank"))
        .and_then(|r| u32::try_from(r).ok())
        .unwrap_or(position as u32 + 1);

    Ok(Entity {
        kind,
        name,
        artist,
        image_url: extract_image_url(json),
        rank,
        playcount: get_u64(json, "playcount").unwrap_or(0),
    })
}

/// Album cover from a `track.getInfo` response.
///
/// Top-track lists only carry the generic star image, so track artwork
/// comes from the album the track belongs to.
pub fn parse_track_album_image(json: &Value) -> Option<String> {
    json.get("track")?.get("album").and_then(extract_image_url)
}

/// Parse a whole `user.getTop*` response, keeping the service's order.
///
/// At most `limit` entities are returned, since the service sometimes
/// pads the last page.
pub fn parse_top_entities(json: &Value, kind: EntityKind, limit: usize) -> Result<Vec<Entity>> {
    let root = json.get(kind.response_key()).ok_or_else(|| {
        CollageError::ServiceUnavailable(format!(
            "Malformed response: missing \"{}\"",
            kind.response_key()
        ))
    })?;

    items(root, kind.item_key())
        .iter()
        .take(limit)
        .enumerate()
        .map(|(position, item)| parse_entity(item, kind, position))
        .collect()
}
