//! Browser family detection from a user-agent string.
//!
//! Detection is an ordered rule list evaluated top-down. Order matters:
//! Edge and Opera UAs also contain "Chrome", and Chrome UAs also contain
//! "Safari", so each rule's exclusions only make sense relative to the
//! rules above it.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BrowserFamily {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Opera,
    #[serde(rename = "other")]
    Other,
    #[serde(rename = "unknown")]
    Unknown,
}

impl BrowserFamily {
    pub fn label(&self) -> &'static str {
        match self {
            BrowserFamily::Chrome => "Chrome",
            BrowserFamily::Firefox => "Firefox",
            BrowserFamily::Safari => "Safari",
            BrowserFamily::Edge => "Edge",
            BrowserFamily::Opera => "Opera",
            BrowserFamily::Other => "other",
            BrowserFamily::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

type Rule = (fn(&str) -> bool, BrowserFamily);

const RULES: &[Rule] = &[
    (is_chrome, BrowserFamily::Chrome),
    (is_firefox, BrowserFamily::Firefox),
    (is_safari, BrowserFamily::Safari),
    (is_edge, BrowserFamily::Edge),
    (is_opera, BrowserFamily::Opera),
];

fn is_chrome(ua: &str) -> bool {
    ua.contains("Chrome") && !ua.contains("Edg")
}

fn is_firefox(ua: &str) -> bool {
    ua.contains("Firefox")
}

fn is_safari(ua: &str) -> bool {
    ua.contains("Safari") && !ua.contains("Chrome")
}

fn is_edge(ua: &str) -> bool {
    ua.contains("Edg")
}

fn is_opera(ua: &str) -> bool {
    ua.contains("Opera") || ua.contains("OPR")
}

/// Classify a user-agent string. An empty string is `Unknown`.
pub fn browser_family(user_agent: &str) -> BrowserFamily {
    if user_agent.is_empty() {
        return BrowserFamily::Unknown;
    }
    RULES
        .iter()
        .find(|(matches, _)| matches(user_agent))
        .map(|(_, family)| *family)
        .unwrap_or(BrowserFamily::Other)
}
