//! HTML rendering of the feed page

pub mod post;

use common_types::Post;

use crate::feed::FeedState;

pub const LOADING_CAPTION: &str = "Loading magical unicorn posts...";
pub const EMPTY_TITLE: &str = "No posts yet!";
pub const EMPTY_CAPTION: &str = "Be the first to share your unicorn adventures.";

/// Minimal HTML escaping for text and attribute values.
#[must_use]
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn header() -> &'static str {
    r#"<header class="header">
  <div class="header-container">
    <div class="logo">
      <span class="logo-icon">🦄</span>
      <h1>UniTok</h1>
    </div>
    <div class="tagline">Where Magical Unicorns Share Their Sparkle</div>
  </div>
</header>
"#
}

fn footer() -> &'static str {
    r#"<footer class="footer">
  <p>This is a dummy Unicorn Rentals Social Media site</p>
</footer>
"#
}

fn loading() -> String {
    format!(
        r#"<div class="loading">
  <div class="loading-spinner"></div>
  <p>{LOADING_CAPTION}</p>
</div>
"#
    )
}

/// Error panel; "Try Again" reloads the whole page
fn error(message: &str) -> String {
    format!(
        r#"<div class="error-message">
  <p>{}</p>
  <a class="retry-button" href="/">Try Again</a>
</div>
"#,
        escape(message)
    )
}

/// The feed in the order received, or the empty state
#[must_use]
pub fn feed(posts: &[Post]) -> String {
    if posts.is_empty() {
        return format!(
            r#"<div class="empty-feed">
  <h2>{EMPTY_TITLE}</h2>
  <p>{EMPTY_CAPTION}</p>
</div>
"#
        );
    }

    let items: String = posts.iter().map(post::render).collect();
    format!("<div class=\"feed\">\n{items}</div>\n")
}

/// Body of the main content area for a state
#[must_use]
pub fn content(state: &FeedState) -> String {
    match state {
        FeedState::Loading => loading(),
        FeedState::Error(message) => error(message),
        FeedState::Ready(posts) => feed(posts),
    }
}

/// Script tag of the static shell
const SHELL_SCRIPT: &str = "  <script src=\"/feed.js\" defer></script>\n";

fn document(state: &FeedState, script: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>UniTok</title>
  <link rel="stylesheet" href="/styles.css">
{script}</head>
<body>
<div class="app">
{header}<main class="main-content">
{content}</main>
{footer}</div>
</body>
</html>
"#,
        header = header(),
        content = content(state),
        footer = footer(),
    )
}

/// Full HTML document for a state
#[must_use]
pub fn page(state: &FeedState) -> String {
    document(state, "")
}

/// `index.html` of the static site: the loading page plus `feed.js`, which runs the
/// load sequence in the browser
#[must_use]
pub fn shell() -> String {
    document(&FeedState::Loading, SHELL_SCRIPT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FEED_ERROR_MESSAGE;
    use pretty_assertions::assert_eq;

    fn post(id: &str, color: &str) -> Post {
        Post {
            post_id: id.to_string(),
            author: format!("author-{id}"),
            content: format!("content-{id}"),
            timestamp: 1_700_000_000_000,
            likes: 1,
            unicorn_color: color.to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_loading_state() {
        let html = page(&FeedState::Loading);

        assert!(html.contains("loading-spinner"));
        assert!(html.contains(LOADING_CAPTION));
        assert!(!html.contains("Try Again"));
    }

    #[test]
    fn test_error_state() {
        let html = page(&FeedState::Error(FEED_ERROR_MESSAGE.to_string()));

        assert!(html.contains(FEED_ERROR_MESSAGE));
        assert!(html.contains("Try Again"));
        assert!(!html.contains("class=\"post\""));
        assert!(!html.contains(EMPTY_TITLE));
    }

    #[test]
    fn test_empty_feed() {
        let html = page(&FeedState::Ready(Vec::new()));

        assert!(html.contains(EMPTY_TITLE));
        assert!(html.contains(EMPTY_CAPTION));
        assert!(!html.contains("error-message"));
    }

    #[test]
    fn test_posts_rendered_in_order() {
        let posts = vec![post("c", "pink"), post("a", "blue"), post("b", "green")];

        let html = feed(&posts);

        assert_eq!(html.matches("class=\"post\"").count(), 3);
        let positions: Vec<usize> = ["content-c", "content-a", "content-b"]
            .iter()
            .map(|needle| html.find(needle).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_header_and_footer() {
        let html = page(&FeedState::Ready(vec![post("a", "yellow")]));

        assert!(html.contains("<h1>UniTok</h1>"));
        assert!(html.contains("Where Magical Unicorns Share Their Sparkle"));
        assert!(html.contains("This is a dummy Unicorn Rentals Social Media site"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_site_index_matches_shell() {
        let html = shell();

        assert_eq!(include_str!("../../site/index.html"), html);
        assert!(html.contains("<script src=\"/feed.js\" defer></script>"));
        assert!(html.contains(LOADING_CAPTION));
        assert!(!page(&FeedState::Loading).contains("feed.js"));
    }
}
