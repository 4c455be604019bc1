//! Request headers the router adds to every visit.

use crate::transport::upsert_header as upsert;

pub const ORBITA: &str = "X-Orbita";
pub const REQUESTED_WITH: &str = "X-Requested-With";
pub const PARTIAL_COMPONENT: &str = "X-Orbita-Partial-Component";
pub const PRESERVE_STATE: &str = "X-Orbita-Preserve-State";
pub const PRESERVE_SCROLL: &str = "X-Orbita-Preserve-Scroll";

/// Build the header list for one visit.
///
/// Caller headers override the two client markers; the partial-reload and
/// preservation signals are applied last.
pub fn build(
    extra: &[(String, String)],
    only: &[String],
    preserve_state: bool,
    preserve_scroll: bool,
) -> Vec<(String, String)> {
    let mut headers = vec![
        (ORBITA.to_string(), "true".to_string()),
        (REQUESTED_WITH.to_string(), "XMLHttpRequest".to_string()),
    ];

    for (name, value) in extra {
        upsert(&mut headers, name, value);
    }
    if !only.is_empty() {
        upsert(&mut headers, PARTIAL_COMPONENT, &only.join(","));
    }
    if preserve_state {
        upsert(&mut headers, PRESERVE_STATE, "true");
    }
    if preserve_scroll {
        upsert(&mut headers, PRESERVE_SCROLL, "true");
    }

    headers
}
