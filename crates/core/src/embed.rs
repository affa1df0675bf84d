//! Resolving submitted links into playable embed references.
//!
//! [`normalize`] never fails: a link on a recognized platform becomes that
//! platform's canonical embed URL, anything else is kept verbatim as an
//! external reference.

use serde::{Deserialize, Serialize};
use url::Url;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Platform tag stored for links that could not be parsed at all.
pub const PLATFORM_EXTERNAL: &str = "external";

const YOUTUBE_SHORT_HOST: &str = "youtu.be";
const YOUTUBE_HOST: &str = "youtube.com";
const VIMEO_HOST: &str = "vimeo.com";

// ---------------------------------------------------------------------------
// Platforms
// ---------------------------------------------------------------------------

/// Video platforms whose links are rewritten to a canonical embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoPlatform {
    YouTube,
    Vimeo,
}

impl VideoPlatform {
    /// Value stored in `videos.platform`.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::YouTube => "youtube",
            Self::Vimeo => "vimeo",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "youtube" => Some(Self::YouTube),
            "vimeo" => Some(Self::Vimeo),
            _ => None,
        }
    }

    pub fn embed_url(&self, id: &str) -> String {
        match self {
            Self::YouTube => format!("https://www.youtube.com/embed/{id}"),
            Self::Vimeo => format!("https://player.vimeo.com/video/{id}"),
        }
    }

    /// Static preview image, where the platform exposes one by id.
    pub fn thumbnail_url(&self, id: &str) -> Option<String> {
        match self {
            Self::YouTube => Some(format!("https://img.youtube.com/vi/{id}/mqdefault.jpg")),
            Self::Vimeo => None,
        }
    }
}

/// Where a submitted link points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedTarget {
    /// A video on a recognized platform, identified by its platform id.
    Recognized { platform: VideoPlatform, id: String },
    /// Anything else. `platform` is the link's hostname, or
    /// [`PLATFORM_EXTERNAL`] when the link does not parse.
    External { platform: String, url: String },
}

impl EmbedTarget {
    /// Classify a raw link.
    pub fn resolve(raw_url: &str) -> Self {
        let parsed = match Url::parse(raw_url) {
            Ok(parsed) => parsed,
            Err(_) => {
                return Self::External {
                    platform: PLATFORM_EXTERNAL.to_string(),
                    url: raw_url.to_string(),
                }
            }
        };

        // Links like `mailto:` parse but have no host.
        let Some(host) = parsed.host_str().map(str::to_ascii_lowercase) else {
            return Self::External {
                platform: PLATFORM_EXTERNAL.to_string(),
                url: raw_url.to_string(),
            };
        };

        let recognized = if host_matches(&host, YOUTUBE_SHORT_HOST) {
            first_segment(&parsed).map(|id| (VideoPlatform::YouTube, id))
        } else if host_matches(&host, YOUTUBE_HOST) {
            query_param(&parsed, "v")
                .or_else(|| last_segment(&parsed))
                .map(|id| (VideoPlatform::YouTube, id))
        } else if host_matches(&host, VIMEO_HOST) {
            last_segment(&parsed)
                .filter(|id| id.bytes().all(|b| b.is_ascii_digit()))
                .map(|id| (VideoPlatform::Vimeo, id))
        } else {
            None
        };

        match recognized {
            Some((platform, id)) => Self::Recognized { platform, id },
            None => Self::External {
                platform: host,
                url: raw_url.to_string(),
            },
        }
    }

    /// Flatten into the columns stored on a video.
    pub fn into_source(self) -> NormalizedSource {
        match self {
            Self::Recognized { platform, id } => NormalizedSource {
                platform: platform.tag().to_string(),
                embed_url: platform.embed_url(&id),
                platform_id: id,
            },
            Self::External { platform, url } => NormalizedSource {
                platform,
                platform_id: url.clone(),
                embed_url: url,
            },
        }
    }
}

/// Exact host or any subdomain of it (`m.youtube.com`, `www.youtube.com`).
fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn first_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn last_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}

fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// NormalizedSource
// ---------------------------------------------------------------------------

/// The platform columns derived from a submitted link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedSource {
    pub platform: String,
    pub platform_id: String,
    pub embed_url: String,
}

/// Resolve a raw link into platform, platform id and embed reference.
///
/// # Examples
///
/// ```
/// use monynha_core::embed::normalize;
/// let short = normalize("https://youtu.be/dQw4w9WgXcQ");
/// let long = normalize("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
/// assert_eq!(short, long);
/// assert_eq!(short.embed_url, "https://www.youtube.com/embed/dQw4w9WgXcQ");
/// assert_eq!(normalize("not a url").platform, "external");
/// ```
pub fn normalize(raw_url: &str) -> NormalizedSource {
    EmbedTarget::resolve(raw_url).into_source()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
