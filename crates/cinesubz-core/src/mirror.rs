//! Mirror table and download URL rewriter
//!
//! Countdown pages hand out links on a handful of legacy redirect hosts.
//! [`rewrite`] maps them onto the canonical mirror and turns the trailing
//! file extension into an `ext=` query token so the result is directly
//! fetchable.
//!
//! Matching is prefix based (`starts_with`) and the first declared prefix
//! wins, both across rules and within a rule.

use url::Url;

/// One entry of a substitution table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorRule {
    /// Candidate prefixes, checked in order
    pub match_prefixes: &'static [&'static str],
    /// Replacement for whichever prefix matched
    pub canonical_prefix: &'static str,
}

/// Host of the canonical download mirror
pub const CANONICAL_DOMAIN: &str = "sonic-cloud.online";

/// Legacy redirect hosts mapped to the canonical mirror, in priority order
pub const MIRROR_RULES: &[MirrorRule] = &[
    MirrorRule {
        match_prefixes: &[
            "https://google.com/server11/1:/",
            "https://google.com/server12/1:/",
        ],
        canonical_prefix: "https://cloud.sonic-cloud.online/server1/",
    },
    MirrorRule {
        match_prefixes: &[
            "https://google.com/server21/1:/",
            "https://google.com/server22/1:/",
        ],
        canonical_prefix: "https://cloud.sonic-cloud.online/server2/",
    },
    MirrorRule {
        match_prefixes: &["https://google.com/server3/1:/"],
        canonical_prefix: "https://cloud.sonic-cloud.online/server3/",
    },
];

/// Telegram mirror domains folded onto `t.me`; consulted only when
/// [`MIRROR_RULES`] has no match
pub const CHAT_MIRROR_RULES: &[MirrorRule] = &[MirrorRule {
    match_prefixes: &[
        "https://telegram.me/",
        "http://telegram.me/",
        "https://telegram.dog/",
        "http://telegram.dog/",
        "http://t.me/",
    ],
    canonical_prefix: "https://t.me/",
}];

/// File extensions that the canonical mirror expects as `ext=` instead
const EXTENSION_MARKERS: [&str; 3] = ["mp4", "mkv", "zip"];

/// Rewrites a raw download link into its directly fetchable form
///
/// Pure and total: never fails, never touches the network.
///
/// - empty and fragment-only (`#...`) input yields `""`
/// - a URL starting with a [`MIRROR_RULES`] prefix gets that prefix replaced
/// - otherwise [`CHAT_MIRROR_RULES`] is tried the same way
/// - anything naming [`CANONICAL_DOMAIN`] is normalized (extension marker,
///   single `?`)
/// - everything else is returned unchanged
///
/// # Example
/// ```
/// use cinesubz_core::mirror::rewrite;
/// assert_eq!(
///     rewrite("https://google.com/server11/1:/abc.mp4"),
///     "https://cloud.sonic-cloud.online/server1/abc?ext=mp4"
/// );
/// assert_eq!(rewrite("https://example.com/a.mp4"), "https://example.com/a.mp4");
/// ```
pub fn rewrite(raw: &str) -> String {
    if raw.is_empty() || raw.starts_with('#') {
        return String::new();
    }

    let substituted = substitute(raw, MIRROR_RULES)
        .or_else(|| substitute(raw, CHAT_MIRROR_RULES))
        .unwrap_or_else(|| raw.to_string());

    if names_canonical_domain(&substituted) {
        normalize_canonical(&substituted)
    } else {
        substituted
    }
}

/// True when the URL starts with a legacy mirror prefix or already points
/// at the canonical mirror
pub fn matches_mirror(raw: &str) -> bool {
    substitute(raw, MIRROR_RULES).is_some() || names_canonical_domain(raw)
}

/// True when the URL's host is the canonical mirror or one of its subdomains
pub fn names_canonical_domain(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    parsed.host_str().is_some_and(|host| {
        host == CANONICAL_DOMAIN || host.ends_with(&format!(".{}", CANONICAL_DOMAIN))
    })
}

/// Applies the first matching prefix substitution from `rules`
fn substitute(raw: &str, rules: &[MirrorRule]) -> Option<String> {
    rules.iter().find_map(|rule| {
        rule.match_prefixes
            .iter()
            .find_map(|prefix| raw.strip_prefix(prefix))
            .map(|rest| format!("{}{}", rule.canonical_prefix, rest))
    })
}

/// Moves a trailing extension into `ext=` and merges query markers
///
/// The path is only cut when no `ext=` token exists yet, so feeding the
/// output back in returns it unchanged even for dotted names like
/// `Pack.mp4.zip`.
fn normalize_canonical(url: &str) -> String {
    let (body, fragment) = match url.split_once('#') {
        Some((body, fragment)) => (body, Some(fragment)),
        None => (url, None),
    };
    let (path, query) = body.split_once('?').unwrap_or((body, ""));

    let has_ext_token = query.split(['?', '&']).any(|t| t.starts_with("ext="));
    let ext = trailing_extension(path).filter(|_| !has_ext_token);
    let ext_token = ext.map(|ext| format!("ext={}", ext));

    let mut tokens: Vec<&str> = query.split(['?', '&']).filter(|t| !t.is_empty()).collect();
    let mut out = path.to_string();

    if let (Some(ext), Some(token)) = (ext, ext_token.as_deref()) {
        out.truncate(path.len() - ext.len() - 1);
        tokens.insert(0, token);
    }

    if !tokens.is_empty() {
        out.push('?');
        out.push_str(&tokens.join("&"));
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Returns the extension marker ending the last path segment, if any
fn trailing_extension(path: &str) -> Option<&'static str> {
    let path_start = path.find("://").map(|i| i + 3).unwrap_or(0);
    let slash = path[path_start..].rfind('/')? + path_start;
    let file = &path[slash + 1..];
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    EXTENSION_MARKERS
        .iter()
        .copied()
        .find(|marker| marker.eq_ignore_ascii_case(ext))
}
