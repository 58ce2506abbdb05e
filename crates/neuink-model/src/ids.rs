//! Document-unique id generation.
//!
//! Ids follow the `<tag>_<millis>_<random>` pattern. The random suffix
//! disambiguates ids minted within the same millisecond; collision
//! probability is negligible at session-scale documents.

use rand::Rng;
use smol_str::SmolStr;
use web_time::{SystemTime, UNIX_EPOCH};

const SUFFIX_LEN: usize = 6;

/// Generate a fresh id with the given type tag, e.g. `paragraph_1714...`.
pub fn fresh_id(tag: &str) -> SmolStr {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let mut rng = rand::thread_rng();
    let mut suffix = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        let digit = rng.gen_range(0..36u32);
        suffix.push(char::from_digit(digit, 36).unwrap_or('0'));
    }
    SmolStr::new(format!("{tag}_{millis}_{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_shape() {
        let id = fresh_id("figure");
        assert!(id.starts_with("figure_"));
        assert_eq!(id.split('_').count(), 3);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(fresh_id("block")));
        }
    }
}
