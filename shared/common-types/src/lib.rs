//! Wire types shared between the posts API and the front end

use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

pub mod lenient;

/// Author used when a post is published without one
pub const DEFAULT_AUTHOR: &str = "Anonymous Unicorn";

/// API endpoint used when `config.json` cannot be loaded
pub const LOCAL_API_ENDPOINT: &str = "http://localhost:3001";

/// A single feed entry as returned by `GET /posts`
///
/// Display fields decode leniently (see [`lenient`]) so one malformed item does not fail a
/// whole feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique post ID (UUID v4)
    pub post_id: String,
    /// Display name of the author
    #[schemars(with = "String")]
    #[serde(default, deserialize_with = "lenient::text")]
    pub author: String,
    /// Free text content
    #[schemars(with = "String")]
    #[serde(default, deserialize_with = "lenient::text")]
    pub content: String,
    /// Creation time in milliseconds since the Unix epoch
    #[schemars(with = "i64")]
    #[serde(default, deserialize_with = "lenient::millis")]
    pub timestamp: i64,
    /// Number of likes
    #[schemars(with = "u64")]
    #[serde(default, deserialize_with = "lenient::count")]
    pub likes: u64,
    /// Decorative unicorn colour, kept verbatim
    #[schemars(with = "String")]
    #[serde(default = "default_unicorn_color", deserialize_with = "lenient::color")]
    pub unicorn_color: String,
    /// Optional image attached to the post
    #[schemars(with = "Option<String>")]
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
}

fn default_unicorn_color() -> String {
    UnicornColor::Rainbow.to_string()
}

/// Recognized unicorn colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum UnicornColor {
    Pink,
    Blue,
    Purple,
    Green,
    Yellow,
    Rainbow,
}

impl UnicornColor {
    /// Resolves a colour name, ignoring case.
    ///
    /// Unrecognized names fall back to [`UnicornColor::Rainbow`]. The input is not validated
    /// anywhere upstream, so the fallback is logged.
    #[must_use]
    pub fn resolve(name: &str) -> Self {
        Self::from_str(&name.to_lowercase()).unwrap_or_else(|_| {
            tracing::debug!("Unrecognized unicorn colour {name:?}, using rainbow");
            Self::Rainbow
        })
    }

    /// CSS colour or gradient for this colour
    #[must_use]
    pub const fn css_value(self) -> &'static str {
        match self {
            Self::Pink => "#FF69B4",
            Self::Blue => "#1E90FF",
            Self::Purple => "#9370DB",
            Self::Green => "#3CB371",
            Self::Yellow => "#FFD700",
            Self::Rainbow => {
                "linear-gradient(to right, red, orange, yellow, green, blue, indigo, violet)"
            }
        }
    }

    /// Whether the colour is rendered as a gradient clipped to text
    #[must_use]
    pub const fn is_gradient(self) -> bool {
        matches!(self, Self::Rainbow)
    }
}

/// Front end configuration served as `/config.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the posts API
    pub api_endpoint: String,
}

impl Config {
    /// Configuration pointing at the local development API
    #[must_use]
    pub fn local() -> Self {
        Self {
            api_endpoint: LOCAL_API_ENDPOINT.to_string(),
        }
    }

    /// URL of the posts collection
    #[must_use]
    pub fn posts_url(&self) -> String {
        format!("{}/posts", self.api_endpoint.trim_end_matches('/'))
    }
}
