//! Query-title normalization.
//!
//! [`normalize`] converts a human-readable series or episode title into the
//! provider-safe token used in indexer queries. The same token is the join
//! key for the scene-mapping forward index, so the algorithm must stay
//! deterministic: any change to it invalidates every cached mapping entry.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static LEADING_THE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^the\s").expect("valid regex"));
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W").expect("valid regex"));
static PLUS_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+{2,}").expect("valid regex"));

/// Normalize a title into a provider-safe query token.
///
/// Lowercases, strips one leading "the " token, folds `&` to "and", drops
/// backticks and apostrophes, replaces remaining non-word characters with
/// `+`, and collapses separator runs.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when `title` is empty or
/// all-whitespace.
pub fn normalize(title: &str) -> Result<String> {
    if title.trim().is_empty() {
        return Err(Error::invalid_argument("query title must not be blank"));
    }

    let lowered = title.to_lowercase();
    let stripped = LEADING_THE.replace(&lowered, "");

    let folded = stripped.replace('&', "and").replace(['`', '\''], "");

    let separated = NON_WORD.replace_all(&folded, "+");
    let collapsed = PLUS_RUN.replace_all(&separated, "+");

    Ok(collapsed
        .trim_matches(|c: char| c == '+' || c == ' ')
        .to_string())
}
