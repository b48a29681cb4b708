//! Name folding helpers
//!
//! Folder and section names arrive from users and from the external store
//! with inconsistent casing, Swedish diacritics, punctuation and ordering
//! prefixes. Every fuzzy comparison in the workspace goes through
//! [`fold_key`] so that the rules stay in one place.

/// Fold a name into a comparison key
///
/// Lower-cases, folds Swedish/Latin diacritics onto ASCII and drops every
/// character that is not alphanumeric.
///
/// # Examples
/// ```
/// # use phasenav_model::text::fold_key;
/// assert_eq!(fold_key("Förfrågnings-underlag"), "forfragningsunderlag");
/// assert_eq!(fold_key("  Möten & Protokoll "), "motenprotokoll");
/// ```
#[must_use]
pub fn fold_key(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter_map(|c| match c {
            'å' | 'ä' | 'à' | 'á' | 'â' => Some('a'),
            'ö' | 'ø' | 'ó' | 'ò' | 'ô' => Some('o'),
            'é' | 'è' | 'ê' | 'ë' => Some('e'),
            'ü' | 'ú' | 'ù' => Some('u'),
            'í' | 'ì' | 'ï' => Some('i'),
            c if c.is_ascii_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// Split a `"NN - Title"` name into its ordering prefix and title
///
/// Returns `None` when the name carries no two-digit prefix.
#[must_use]
pub fn split_order_prefix(name: &str) -> Option<(u32, &str)> {
    let trimmed = name.trim_start();
    let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
    if digits.len() != 2 {
        return None;
    }
    let rest = trimmed[digits.len()..].trim_start();
    let rest = rest.strip_prefix('-')?.trim_start();
    if rest.is_empty() {
        return None;
    }
    digits.parse().ok().map(|n| (n, rest))
}

/// Strip a `"NN - "` ordering prefix, returning the user-facing title
///
/// Names without a prefix are returned trimmed.
#[must_use]
pub fn strip_order_prefix(name: &str) -> &str {
    split_order_prefix(name).map_or_else(|| name.trim(), |(_, title)| title.trim_end())
}

/// Build a prefixed folder name from an order and a title
#[inline]
#[must_use]
pub fn prefixed_name(order: u32, title: &str) -> String {
    format!("{order:02} - {title}")
}
