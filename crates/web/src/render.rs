//! Rich text rendering.
//!
//! Home content is authored in the CMS by administrators, who are trusted to
//! embed markup. [`RichTextPolicy`] makes that trust explicit per deployment.

use std::fmt;
use std::str::FromStr;

use comrak::{Options, markdown_to_html};
use thiserror::Error;

/// Unknown `WEB_RICH_TEXT` value.
#[derive(Debug, Clone, Error)]
#[error("unknown rich text policy {0:?} (expected raw, markdown or escaped)")]
pub struct RichTextPolicyError(String);

/// How stored rich text becomes HTML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RichTextPolicy {
    /// Insert stored content verbatim.
    #[default]
    Raw,
    /// Render markdown, passing inline HTML through.
    Markdown,
    /// Render markdown, dropping inline HTML.
    Escaped,
}

impl RichTextPolicy {
    /// Render `content` to HTML under this policy.
    #[must_use]
    pub fn render(self, content: &str) -> String {
        match self {
            Self::Raw => content.to_owned(),
            Self::Markdown => markdown(content, true),
            Self::Escaped => markdown(content, false),
        }
    }
}

fn markdown(content: &str, allow_html: bool) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    options.render.r#unsafe = allow_html;

    markdown_to_html(content, &options)
}

impl FromStr for RichTextPolicy {
    type Err = RichTextPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "markdown" => Ok(Self::Markdown),
            "escaped" => Ok(Self::Escaped),
            _ => Err(RichTextPolicyError(s.to_owned())),
        }
    }
}

impl fmt::Display for RichTextPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Raw => "raw",
            Self::Markdown => "markdown",
            Self::Escaped => "escaped",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "## Getting Started\n\nHello <em>there</em> <script>alert(1)</script>";

    #[test]
    fn test_raw_is_verbatim() {
        assert_eq!(RichTextPolicy::Raw.render(SAMPLE), SAMPLE);
    }

    #[test]
    fn test_default_is_verbatim() {
        let stored = "1 * 2 * 3 <div class=\"x\">a_b_c</div>";
        assert_eq!(RichTextPolicy::default(), RichTextPolicy::Raw);
        assert_eq!(RichTextPolicy::default().render(stored), stored);
    }

    #[test]
    fn test_markdown_keeps_inline_html() {
        let html = RichTextPolicy::Markdown.render(SAMPLE);
        assert!(html.contains("<h2>Getting Started</h2>"));
        assert!(html.contains("<em>there</em>"));
    }

    #[test]
    fn test_escaped_drops_inline_html() {
        let html = RichTextPolicy::Escaped.render(SAMPLE);
        assert!(html.contains("<h2>Getting Started</h2>"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<em>"));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Markdown".parse::<RichTextPolicy>().ok(), Some(RichTextPolicy::Markdown));
        assert_eq!(" raw ".parse::<RichTextPolicy>().ok(), Some(RichTextPolicy::Raw));
        assert!("html".parse::<RichTextPolicy>().is_err());
        assert_eq!(RichTextPolicy::Escaped.to_string(), "escaped");
    }
}
