//! Slug and SKU generation for catalog entities.
//!
//! Slugs are trimmed, non-empty identifiers composed of lowercase ASCII
//! letters, digits, and hyphens. Import-generated slugs append the current
//! timestamp plus a short random suffix so that two rows created within the
//! same millisecond cannot collide.

use chrono::Utc;
use rand::Rng;

/// Return `true` when `value` is a valid catalog slug.
pub fn is_valid_slug(value: &str) -> bool {
    is_trimmed_non_empty(value) && has_allowed_slug_chars(value)
}

fn is_trimmed_non_empty(value: &str) -> bool {
    !value.is_empty() && value.trim() == value
}

fn has_allowed_slug_chars(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

/// Reduce a display name to slug characters: lowercase, non-alphanumerics
/// collapsed into single hyphens, no leading or trailing hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Build a unique slug from a display name.
///
/// Falls back to `item` when the name contains no slug-safe characters.
pub fn unique_slug(name: &str, rng: &mut impl Rng) -> String {
    let base = slugify(name);
    let base = if base.is_empty() { "item" } else { base.as_str() };
    let suffix: u32 = rng.gen_range(1000..10000);
    format!("{base}-{}-{suffix}", Utc::now().timestamp_millis())
}

/// Build a synthetic SKU for an imported variant.
pub fn synthetic_sku(slug: &str, position: usize, rng: &mut impl Rng) -> String {
    let tag: u16 = rng.r#gen();
    let stem: String = slug
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .take(8)
        .collect::<String>()
        .to_ascii_uppercase();
    format!("FL-{stem}-{position}-{tag:04X}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rstest::rstest;

    #[rstest]
    #[case("Persian Garden Rug", "persian-garden-rug")]
    #[case("  Monstera  Deliciosa ", "monstera-deliciosa")]
    #[case("160×230", "160-230")]
    #[case("!!!", "")]
    fn slugify_normalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[test]
    fn unique_slug_is_valid_and_distinct() {
        let mut rng = SmallRng::seed_from_u64(7);
        let first = unique_slug("Persian Garden Rug", &mut rng);
        let second = unique_slug("Persian Garden Rug", &mut rng);
        assert!(is_valid_slug(&first), "slug {first} should be valid");
        assert!(first.starts_with("persian-garden-rug-"));
        assert_ne!(first, second);
    }

    #[test]
    fn unique_slug_falls_back_for_empty_base() {
        let mut rng = SmallRng::seed_from_u64(7);
        let slug = unique_slug("???", &mut rng);
        assert!(slug.starts_with("item-"));
    }

    #[test]
    fn synthetic_sku_uses_slug_stem() {
        let mut rng = SmallRng::seed_from_u64(7);
        let sku = synthetic_sku("persian-garden-rug-17", 2, &mut rng);
        assert!(sku.starts_with("FL-PERSIANG-2-"));
    }
}
