//! Clip descriptors and the feed data source

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Separator used when flattening a clip identity into its key
const KEY_SEPARATOR: char = '`';

/// Identity of one clip plus its transient mute toggle
#[derive(Debug)]
pub struct ClipDescriptor {
    pub media_url: String,
    pub caption: String,
    pub section: String,
    pub event: String,
    mute_tap_count: AtomicU8,
}

/// Clips are shared between the feed data source and the cell showing them
pub type SharedClip = Arc<ClipDescriptor>;

/// Key identifying a clip in the remote like record
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClipKey(pub String);

impl std::fmt::Display for ClipKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ClipDescriptor {
    pub fn new(
        media_url: impl Into<String>,
        caption: impl Into<String>,
        section: impl Into<String>,
        event: impl Into<String>,
    ) -> Self {
        Self {
            media_url: media_url.into(),
            caption: caption.into(),
            section: section.into(),
            event: event.into(),
            mute_tap_count: AtomicU8::new(0),
        }
    }

    pub fn key(&self) -> ClipKey {
        ClipKey(format!(
            "{url}{sep}{caption}{sep}{section}{sep}{event}",
            url = self.media_url,
            caption = self.caption,
            section = self.section,
            event = self.event,
            sep = KEY_SEPARATOR,
        ))
    }

    /// Current mute toggle, always 0 or 1
    pub fn mute_tap_count(&self) -> u8 {
        self.mute_tap_count.load(Ordering::Acquire)
    }

    /// Flip the mute toggle and return its new value
    pub fn toggle_mute(&self) -> u8 {
        self.mute_tap_count.fetch_xor(1, Ordering::AcqRel) ^ 1
    }

    pub fn reset_mute(&self) {
        self.mute_tap_count.store(0, Ordering::Release);
    }
}

/// On-disk shape of a feed entry
#[derive(Debug, Deserialize)]
struct FeedEntry {
    media_url: String,
    #[serde(default)]
    caption: String,
    #[serde(default)]
    section: String,
    #[serde(default)]
    event: String,
}

/// Load the clips of a feed file, keeping only `event` when given
pub fn load_feed(path: &Path, event: Option<&str>) -> Result<Vec<SharedClip>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading feed file {}", path.display()))?;
    parse_feed(&content, event)
}

pub fn parse_feed(content: &str, event: Option<&str>) -> Result<Vec<SharedClip>> {
    let entries: Vec<FeedEntry> = serde_json::from_str(content).context("parsing feed JSON")?;

    let clips: Vec<SharedClip> = entries
        .into_iter()
        .filter(|entry| event.is_none_or(|wanted| entry.event == wanted))
        .map(|entry| {
            Arc::new(ClipDescriptor::new(
                entry.media_url,
                entry.caption,
                entry.section,
                entry.event,
            ))
        })
        .collect();

    tracing::debug!(count = clips.len(), event = ?event, "Feed parsed");
    Ok(clips)
}

/// Distinct sections in feed order, with the index of their first clip
pub fn sections(clips: &[SharedClip]) -> Vec<(String, usize)> {
    let mut seen: Vec<(String, usize)> = Vec::new();
    for (index, clip) in clips.iter().enumerate() {
        if !seen.iter().any(|(name, _)| *name == clip.section) {
            seen.push((clip.section.clone(), index));
        }
    }
    seen
}
