use crate::errors::{ReservedSlugError, ValidationError};

/// Path segments the startup routes use next to `/startup/{slug}/`.
pub const STARTUP_RESERVED_SLUGS: &[&str] = &["create"];

/// Path segments the newslink routes use next to `/startup/{slug}/{newslink}/`.
pub const NEWSLINK_RESERVED_SLUGS: &[&str] = &["delete", "update", "add_article"];

pub const NO_RESERVED_SLUGS: &[&str] = &[];

/// Words a derived tag slug skips so the tag page is not shadowed by
/// `/tag/create/`. Explicitly chosen tag slugs are not restricted.
pub const TAG_DERIVED_SKIP: &[&str] = &["create"];

/// Checks slug syntax: ASCII letters, digits, hyphens and underscores.
pub fn validate_slug(field: &str, slug: &str, max_len: usize) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(ValidationError::single(field, "This field is required."));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::single(
            field,
            "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
        ));
    }

    if slug.len() > max_len {
        return Err(ValidationError::single(
            field,
            format!("Ensure this value has at most {max_len} characters."),
        ));
    }

    Ok(())
}

/// Rejects a slug equal to one of `reserved`. Matching is exact and
/// case-sensitive.
pub fn check_not_reserved(slug: &str, reserved: &[&str]) -> Result<(), ReservedSlugError> {
    match reserved.iter().find(|word| **word == slug) {
        Some(word) => Err(ReservedSlugError {
            field: "slug",
            word: (*word).to_string(),
        }),
        None => Ok(()),
    }
}

/// Derives a slug from free text: lowercased, runs of whitespace and
/// hyphens collapse to one hyphen, other punctuation is dropped.
pub fn slugify(value: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;

    for ch in value.trim().chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch == '-' || ch.is_whitespace() {
            pending_dash = true;
        }
    }

    slug
}

/// `base` with a numeric suffix, truncated so the result fits `max_len`.
pub fn suffixed(base: &str, n: u32, max_len: usize) -> String {
    if n <= 1 {
        return truncate(base, max_len).to_string();
    }

    let suffix = format!("-{n}");
    let keep = max_len.saturating_sub(suffix.len());
    let stem = truncate(base, keep).trim_end_matches('-');
    format!("{stem}{suffix}")
}

fn truncate(value: &str, max_len: usize) -> &str {
    // slugs produced by `slugify` are ASCII, so byte slicing is safe
    if value.len() <= max_len {
        value
    } else {
        &value[..max_len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_slug_valid() {
        assert!(validate_slug("slug", "django", 31).is_ok());
        assert!(validate_slug("slug", "web-dev_2", 31).is_ok());
        assert!(validate_slug("slug", "Mixed-Case", 31).is_ok());
    }

    #[test]
    fn test_validate_slug_invalid() {
        assert!(validate_slug("slug", "", 31).is_err());
        assert!(validate_slug("slug", "has space", 31).is_err());
        assert!(validate_slug("slug", "dot.ted", 31).is_err());
        assert!(validate_slug("slug", "slash/ed", 31).is_err());
        assert!(validate_slug("slug", &"a".repeat(32), 31).is_err());
    }

    #[test]
    fn test_validate_slug_reports_field() {
        let err = validate_slug("tag_slug", "", 31).unwrap_err();
        assert_eq!(err.issues[0].field, "tag_slug");
    }

    #[test]
    fn test_startup_create_is_reserved() {
        let err = check_not_reserved("create", STARTUP_RESERVED_SLUGS).unwrap_err();
        assert_eq!(err.word, "create");
        assert!(check_not_reserved("created", STARTUP_RESERVED_SLUGS).is_ok());
    }

    #[test]
    fn test_newslink_reserved_words() {
        for word in ["delete", "update", "add_article"] {
            assert!(check_not_reserved(word, NEWSLINK_RESERVED_SLUGS).is_err());
        }
        assert!(check_not_reserved("create", NEWSLINK_RESERVED_SLUGS).is_ok());
    }

    #[test]
    fn test_reserved_match_is_case_sensitive() {
        assert!(check_not_reserved("Create", STARTUP_RESERVED_SLUGS).is_ok());
        assert!(check_not_reserved("UPDATE", NEWSLINK_RESERVED_SLUGS).is_ok());
    }

    #[test]
    fn test_empty_reserved_set_allows_anything() {
        assert!(check_not_reserved("create", NO_RESERVED_SLUGS).is_ok());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Django Girls"), "django-girls");
        assert_eq!(slugify("a "), "a");
        assert_eq!(slugify(" a"), "a");
        assert_eq!(slugify("Web -- Dev!"), "web-dev");
        assert_eq!(slugify("snake_case"), "snake_case");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_suffixed() {
        assert_eq!(suffixed("a", 1, 31), "a");
        assert_eq!(suffixed("a", 2, 31), "a-2");
        assert_eq!(suffixed("abcdef", 12, 6), "abc-12");
        assert_eq!(suffixed("ab-cdef", 3, 5), "ab-3");
    }
}
