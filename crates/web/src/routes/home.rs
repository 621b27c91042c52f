//! Home page route handlers.
//!
//! `/` renders the page shell with a loading skeleton; HTMX then swaps in
//! `/fragments/home`, which fetches the home singleton and renders one of the
//! error, empty or content states.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use chrono::{Datelike, Utc};
use tracing::instrument;

use cms_starter_client::{ResourceState, home_resource};
use cms_starter_core::HomeContent;

use crate::render::RichTextPolicy;
use crate::state::AppState;

/// Shared layout values (navigation and footer).
#[derive(Clone)]
pub struct Layout {
    pub admin_url: Option<String>,
    pub year: i32,
    pub css_hash: &'static str,
}

impl Layout {
    fn new(state: &AppState) -> Self {
        Self {
            admin_url: state.config().admin_url.clone(),
            year: Utc::now().year(),
            css_hash: env!("CSS_HASH"),
        }
    }
}

/// Home content prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub title: String,
    pub subtitle: Option<String>,
    /// Rendered rich text, already passed through the [`RichTextPolicy`].
    pub body_html: Option<String>,
}

impl HomeView {
    #[must_use]
    pub fn new(home: &HomeContent, policy: RichTextPolicy) -> Self {
        Self {
            title: home.welcome_text.clone(),
            subtitle: home.subtitle.clone().filter(|s| !s.trim().is_empty()),
            body_html: home
                .content
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .map(|c| policy.render(c)),
        }
    }
}

/// Page shell template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomePageTemplate {
    pub layout: Layout,
}

/// Home content fragment (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/home_content.html")]
pub struct HomeContentTemplate {
    pub loading: bool,
    pub error: Option<String>,
    pub home: Option<HomeView>,
}

impl HomeContentTemplate {
    /// Map a resource state to the fragment.
    #[must_use]
    pub fn from_state(state: &ResourceState<HomeContent>, policy: RichTextPolicy) -> Self {
        Self {
            loading: state.loading,
            error: state.error.clone(),
            home: state.data.as_ref().map(|home| HomeView::new(home, policy)),
        }
    }
}

/// Display the home page shell.
#[instrument(skip(state))]
pub async fn page(State(state): State<AppState>) -> impl IntoResponse {
    HomePageTemplate {
        layout: Layout::new(&state),
    }
}

/// Fetch the home singleton and render its state.
#[instrument(skip(state))]
pub async fn fragment(State(state): State<AppState>) -> impl IntoResponse {
    let resource = home_resource(state.client().clone());
    let result = resource.load().await;

    if let Some(error) = &result.error {
        tracing::warn!(%error, "Home content unavailable");
    }

    HomeContentTemplate::from_state(&result, state.config().rich_text)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use cms_starter_core::HomeId;

    use super::*;

    fn home(content: Option<&str>) -> HomeContent {
        HomeContent {
            id: HomeId::new(1),
            document_id: "home-document".to_owned(),
            welcome_text: "Welcome to Our Website".to_owned(),
            subtitle: Some("Built with a headless CMS".to_owned()),
            content: content.map(str::to_owned),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            published_at: Some(Utc::now()),
        }
    }

    fn render(state: &ResourceState<HomeContent>, policy: RichTextPolicy) -> String {
        HomeContentTemplate::from_state(state, policy)
            .render()
            .unwrap()
    }

    #[test]
    fn test_loading_renders_skeleton() {
        let html = render(&ResourceState::default(), RichTextPolicy::Markdown);
        assert!(html.contains("skeleton"));
        assert!(!html.contains("No Content"));
    }

    #[test]
    fn test_error_renders_warning() {
        let state = ResourceState {
            data: None,
            loading: false,
            error: Some("Forbidden".to_owned()),
        };
        let html = render(&state, RichTextPolicy::Markdown);
        assert!(html.contains("Failed to load home page data: Forbidden"));
        assert!(html.contains("alert-warning"));
    }

    #[test]
    fn test_empty_renders_info() {
        let state = ResourceState {
            data: None,
            loading: false,
            error: None,
        };
        let html = render(&state, RichTextPolicy::Markdown);
        assert!(html.contains("No Content"));
        assert!(html.contains("alert-info"));
    }

    #[test]
    fn test_content_renders_title_subtitle_and_body() {
        let state = ResourceState {
            data: Some(home(Some("## Getting Started\n\n<em>hi</em>"))),
            loading: false,
            error: None,
        };
        let html = render(&state, RichTextPolicy::Markdown);
        assert!(html.contains("Welcome to Our Website"));
        assert!(html.contains("Built with a headless CMS"));
        assert!(html.contains("<h2>Getting Started</h2>"));
        assert!(html.contains("<em>hi</em>"));
        assert!(!html.contains("Failed to load"));
    }

    #[test]
    fn test_default_policy_passes_body_through() {
        let body = r#"<div class="x">a_b_c</div>"#;
        let state = ResourceState {
            data: Some(home(Some(body))),
            loading: false,
            error: None,
        };
        let html = render(&state, RichTextPolicy::default());
        assert!(html.contains(body));
        assert!(!html.contains("<p>"));
    }

    #[test]
    fn test_escaped_policy_drops_markup() {
        let state = ResourceState {
            data: Some(home(Some("<script>alert(1)</script>"))),
            loading: false,
            error: None,
        };
        let html = render(&state, RichTextPolicy::Escaped);
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let mut content = home(None);
        content.welcome_text = "<b>Hi</b>".to_owned();
        let view = HomeView::new(&content, RichTextPolicy::Raw);
        assert!(view.body_html.is_none());

        let state = ResourceState {
            data: Some(content),
            loading: false,
            error: None,
        };
        let html = render(&state, RichTextPolicy::Raw);
        assert!(html.contains("&#60;b&#62;Hi&#60;/b&#62;") || html.contains("&lt;b&gt;Hi&lt;/b&gt;"));
    }
}
