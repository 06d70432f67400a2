//! Forgiving, case-insensitive name matching.

/// Returns true if `larger` starts with `smaller`, ignoring case.
pub fn is_approximate_substring(smaller: &str, larger: &str) -> bool {
    larger.to_lowercase().starts_with(&smaller.to_lowercase())
}

/// Returns true if either string is a case-insensitive prefix of the other.
pub fn is_approximate_string(a: &str, b: &str) -> bool {
    is_approximate_substring(a, b) || is_approximate_substring(b, a)
}

/// Find the first candidate whose name approximately matches `input`.
pub fn find_approximate<'a, T>(
    input: &str,
    candidates: &'a [T],
    name_of: impl Fn(&T) -> &str,
) -> Option<&'a T> {
    if input.is_empty() {
        return None;
    }
    candidates
        .iter()
        .find(|c| is_approximate_string(input, name_of(c)))
}

/// Find the candidate named exactly `input`, or failing that the first one
/// whose name starts with it. Case is ignored.
pub fn find_by_prefix<'a, T>(
    input: &str,
    candidates: &'a [T],
    name_of: impl Fn(&T) -> Option<&str>,
) -> Option<&'a T> {
    if input.is_empty() {
        return None;
    }
    candidates
        .iter()
        .find(|c| name_of(c).is_some_and(|n| n.eq_ignore_ascii_case(input)))
        .or_else(|| {
            candidates
                .iter()
                .find(|c| name_of(c).is_some_and(|n| is_approximate_substring(input, n)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_is_prefix_only() {
        assert!(is_approximate_substring("gun", "Gunslinger"));
        assert!(!is_approximate_substring("slinger", "Gunslinger"));
        assert!(!is_approximate_substring("Gunslinger", "gun"));
    }

    #[test]
    fn string_is_bidirectional() {
        assert!(is_approximate_string("james_bond_imposter", "James_Bond"));
        assert!(is_approximate_string("James_Bond", "james_bond_imposter"));
        assert!(!is_approximate_string("Bond", "James"));
    }

    #[test]
    fn find_first_match() {
        let names = ["Eastern", "Western"];
        assert_eq!(find_approximate("west", &names, |n| n), Some(&"Western"));
        assert_eq!(find_approximate("north", &names, |n| n), None);
        assert_eq!(find_approximate("", &names, |n| n), None);
    }

    #[test]
    fn prefix_lookup_prefers_exact_names() {
        let names = ["Patrick", "Pat", "Sandy"];
        let find = |input| find_by_prefix(input, &names, |n| Some(*n));
        assert_eq!(find("pat"), Some(&"Pat"));
        assert_eq!(find("patr"), Some(&"Patrick"));
        assert_eq!(find("SAN"), Some(&"Sandy"));
        assert_eq!(find("sandra"), None);
        assert_eq!(find(""), None);
    }
}
