use chrono::DateTime;
use common_types::{Post, UnicornColor};

use super::escape;

/// Inline style of the avatar and the colour label
#[must_use]
pub fn unicorn_style(name: &str) -> String {
    let color = UnicornColor::resolve(name);

    if color.is_gradient() {
        format!(
            "background: {}; -webkit-background-clip: text; -webkit-text-fill-color: transparent;",
            color.css_value()
        )
    } else {
        format!("color: {};", color.css_value())
    }
}

/// Formats a millisecond timestamp as `M/D/YYYY, h:mm:ss AM` (UTC)
#[must_use]
pub fn format_timestamp(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|time| time.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_default()
}

/// Renders one post from its own fields
#[must_use]
pub fn render(post: &Post) -> String {
    let style = unicorn_style(&post.unicorn_color);

    format!(
        r#"<div class="post" data-post-id="{id}">
  <div class="post-header">
    <div class="post-author">
      <span class="author-icon" style="{style}">🦄</span>
      <span>{author}</span>
    </div>
    <div class="post-time">{time}</div>
  </div>
  <div class="post-content">{content}</div>
  <div class="post-footer">
    <div class="post-likes">
      <span class="like-icon">♥</span>
      <span>{likes}</span>
    </div>
    <div class="post-unicorn-color">
      <span class="color-label">Unicorn Color:</span>
      <span class="color-value" style="{style}">{color}</span>
    </div>
  </div>
</div>
"#,
        id = escape(&post.post_id),
        author = escape(&post.author),
        time = format_timestamp(post.timestamp),
        content = escape(&post.content),
        likes = post.likes,
        color = escape(&post.unicorn_color),
    )
}
