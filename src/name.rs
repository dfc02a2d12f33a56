//! Character selection for the stolen name

use rand::Rng;

/// Pick one character of `name` uniformly at random.
///
/// Surrounding whitespace is ignored. Returns `None` when nothing is left.
pub fn pick_character<R: Rng + ?Sized>(name: &str, rng: &mut R) -> Option<String> {
    let chars: Vec<char> = name.trim().chars().collect();
    if chars.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..chars.len());
    Some(chars[idx].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_single_character_name() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick_character("千", &mut rng).as_deref(), Some("千"));
    }

    #[test]
    fn test_empty_and_blank_names() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick_character("", &mut rng), None);
        assert_eq!(pick_character("  \u{3000} ", &mut rng), None);
    }

    #[test]
    fn test_every_character_is_reachable() {
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<String> = (0..200)
            .filter_map(|_| pick_character("荻野千尋", &mut rng))
            .collect();

        let expected: HashSet<String> = ["荻", "野", "千", "尋"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_selection_counts_characters_not_bytes() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let picked = pick_character("たろう", &mut rng).unwrap();
            assert_eq!(picked.chars().count(), 1);
        }
    }

    proptest! {
        #[test]
        fn picked_character_comes_from_name(name in "\\PC{1,12}", seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            match pick_character(&name, &mut rng) {
                Some(picked) => {
                    prop_assert_eq!(picked.chars().count(), 1);
                    prop_assert!(name.trim().contains(picked.as_str()));
                }
                None => prop_assert!(name.trim().is_empty()),
            }
        }
    }
}
