//! Anchor-style navigation.

use std::fmt;
use std::sync::Arc;

use crate::router::{Router, VisitOptions};
use crate::transport::{Method, RequestData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// The parts of a click the host reports to a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickEvent {
    pub button: MouseButton,
    pub default_prevented: bool,
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl ClickEvent {
    pub fn primary() -> Self {
        Self::default()
    }

    pub fn has_modifier(&self) -> bool {
        self.meta || self.ctrl || self.shift || self.alt
    }
}

/// Host click handler; runs before the link decides whether to navigate.
pub type ClickHook = Arc<dyn Fn(&mut ClickEvent) + Send + Sync>;

/// A link that navigates through the router instead of a full page load.
#[derive(Clone, Default)]
pub struct Link {
    pub href: String,
    pub method: Method,
    pub data: RequestData,
    pub replace: bool,
    pub preserve_state: bool,
    pub preserve_scroll: bool,
    pub only: Vec<String>,
    pub headers: Vec<(String, String)>,
    pub on_click: Option<ClickHook>,
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("href", &self.href)
            .field("method", &self.method)
            .field("data", &self.data)
            .field("replace", &self.replace)
            .field("preserve_state", &self.preserve_state)
            .field("preserve_scroll", &self.preserve_scroll)
            .field("only", &self.only)
            .field("headers", &self.headers)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn data(mut self, data: impl Into<RequestData>) -> Self {
        self.data = data.into();
        self
    }

    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn preserve_state(mut self, preserve: bool) -> Self {
        self.preserve_state = preserve;
        self
    }

    pub fn preserve_scroll(mut self, preserve: bool) -> Self {
        self.preserve_scroll = preserve;
        self
    }

    pub fn only<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = components.into_iter().map(Into::into).collect();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Run `hook` on every click first. Setting `default_prevented` stops
    /// the visit.
    pub fn on_click(mut self, hook: impl Fn(&mut ClickEvent) + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(hook));
        self
    }

    /// Whether the router should take over this click. Modified and
    /// non-primary clicks are left to the host (new tab, context menu).
    pub fn should_intercept(event: &ClickEvent) -> bool {
        !event.default_prevented && !event.has_modifier() && event.button == MouseButton::Primary
    }

    pub fn visit_options(&self) -> VisitOptions {
        VisitOptions {
            method: self.method,
            data: self.data.clone(),
            replace: self.replace,
            preserve_state: self.preserve_state,
            preserve_scroll: self.preserve_scroll,
            only: self.only.clone(),
            headers: self.headers.clone(),
            ..VisitOptions::default()
        }
    }

    /// Handle a click. Returns `false` when the click was left to the host;
    /// otherwise visits `href` and returns `true` once the visit settles.
    pub async fn click(&self, router: &Router, event: &ClickEvent) -> bool {
        let mut event = *event;
        if let Some(on_click) = &self.on_click {
            on_click(&mut event);
        }
        if !Self::should_intercept(&event) {
            return false;
        }
        router.visit(&self.href, self.visit_options()).await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_primary_click_is_intercepted() {
        assert!(Link::should_intercept(&ClickEvent::primary()));
    }

    #[test]
    fn modifiers_prevented_and_secondary_clicks_are_ignored() {
        let cases = [
            ClickEvent { meta: true, ..ClickEvent::default() },
            ClickEvent { ctrl: true, ..ClickEvent::default() },
            ClickEvent { shift: true, ..ClickEvent::default() },
            ClickEvent { alt: true, ..ClickEvent::default() },
            ClickEvent { default_prevented: true, ..ClickEvent::default() },
            ClickEvent { button: MouseButton::Middle, ..ClickEvent::default() },
            ClickEvent { button: MouseButton::Secondary, ..ClickEvent::default() },
        ];
        for event in cases {
            assert!(!Link::should_intercept(&event), "{event:?}");
        }
    }

    #[test]
    fn visit_options_mirror_link_fields() {
        let link = Link::new("/users")
            .method(Method::Post)
            .replace(true)
            .preserve_scroll(true)
            .only(["users"])
            .header("X-Trace", "1");
        let options = link.visit_options();

        assert_eq!(options.method, Method::Post);
        assert!(options.replace);
        assert!(!options.preserve_state);
        assert!(options.preserve_scroll);
        assert_eq!(options.only, vec!["users"]);
        assert_eq!(options.headers, vec![("X-Trace".to_string(), "1".to_string())]);
    }
}
