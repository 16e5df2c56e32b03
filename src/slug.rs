//! Derivation of team path identifiers from display names.
//!
//! Slugs are single path segments, not ASCII: Unicode letters and digits are kept as-is
//! (`þór-akureyri`) and clients percent-encode them in URLs.

/// Derive the slug of a team from its display name.
///
/// The name is lowercased, every run of whitespace becomes a single hyphen and any character
/// that is neither alphanumeric nor `-`/`_` is dropped. The result never contains `/`, `?`,
/// `#`, `%` or whitespace.
///
/// ```ignore
/// make_slug("Foo Bar")      // "foo-bar"
/// make_slug("  Þór  Akureyri ") // "þór-akureyri"
/// make_slug("K.R.")         // "kr"
/// ```
pub fn make_slug(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .flat_map(char::to_lowercase)
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_slug_replaces_spaces() {
        assert_eq!(make_slug("Foo Bar"), "foo-bar");
        assert_eq!(make_slug("Alpha"), "alpha");
        assert_eq!(make_slug("Ungmennafélag Grindavíkur B"), "ungmennafélag-grindavíkur-b");
    }

    #[test]
    fn test_make_slug_collapses_whitespace() {
        assert_eq!(make_slug("  Foo \t  Bar  "), "foo-bar");
    }

    #[test]
    fn test_make_slug_drops_unsafe_characters() {
        assert_eq!(make_slug("K.R. / Reykjavík?"), "kr-reykjavík");
        assert_eq!(make_slug("team_1-b"), "team_1-b");
        assert_eq!(make_slug("!!!"), "");
    }

    #[test]
    fn test_make_slug_is_a_single_path_segment() {
        let slug = make_slug("Þór / Akureyri? #1 100% ");
        assert_eq!(slug, "þór-akureyri-1-100");
        assert!(!slug.contains(['/', '?', '#', '%', ' ']));
    }
}
