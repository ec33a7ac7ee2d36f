//! Text rendering utilities for human-friendly error messages.
//!
//! Provides helpers to format dependency chains, type names,
//! and "did you mean?" suggestions in error output.

/// Renders a dependency chain as a readable string.
///
/// # Examples
/// ```
/// use wirebox_support::rendering::render_chain;
///
/// let chain = vec!["db", "repository", "service"];
/// let rendered = render_chain(&chain);
/// assert_eq!(rendered, "db → repository → service");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Renders a dependency chain as a "required by" list, one entry per line.
///
/// The first entry is the failure point, the last one the root request.
///
/// ```text
/// primaryDb
///   ← required by repository
///   ← required by service
/// ```
pub fn render_required_by(chain: &[impl AsRef<str>]) -> String {
    let mut result = String::new();

    for (i, name) in chain.iter().enumerate() {
        if i == 0 {
            result.push_str(name.as_ref());
        } else {
            result.push_str("\n  ← required by ");
            result.push_str(name.as_ref());
        }
    }

    result
}

/// Shortens a fully qualified type name for display.
///
/// ```
/// use wirebox_support::rendering::shorten_type_name;
///
/// let short = shorten_type_name("my_app::services::user::UserService");
/// assert_eq!(short, "UserService");
///
/// let short = shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>");
/// assert_eq!(short, "Arc<dyn Logger>");
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut current_segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                current_segment.clear();
            }
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
                result.push_str(&current_segment);
                result.push(ch);
                current_segment.clear();
            }
            _ => {
                current_segment.push(ch);
            }
        }
    }

    result.push_str(&current_segment);
    result
}

/// Edit distance between two strings (insertions, deletions, substitutions).
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Generates "did you mean?" suggestions for a requested provider name.
///
/// Compares the requested name against the available ones (case
/// insensitive) and returns at most `max_suggestions` close matches,
/// best first.
///
/// ```
/// use wirebox_support::rendering::suggest_similar;
///
/// let available = ["database", "logger", "userService"];
/// let suggestions = suggest_similar("databse", &available, 3);
/// assert_eq!(suggestions, vec!["database".to_string()]);
/// ```
pub fn suggest_similar(
    requested: &str,
    available: &[impl AsRef<str>],
    max_suggestions: usize,
) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    if requested_lower.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| *name != requested)
        .filter_map(|name| {
            let name_lower = name.to_lowercase();

            if name_lower == requested_lower {
                return Some((name, 200));
            }

            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                return Some((name, 100));
            }

            // Typos: allow roughly one edit per four characters.
            let distance = edit_distance(&name_lower, &requested_lower);
            let budget = (requested_lower.chars().count() / 4).max(1);
            if distance <= budget {
                return Some((name, 90usize.saturating_sub(distance)));
            }

            let common = name_lower
                .chars()
                .zip(requested_lower.chars())
                .take_while(|(a, b)| a == b)
                .count();

            if common >= 3 {
                return Some((name, common * 10));
            }

            None
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_simple_chain() {
        let chain = vec!["a", "b", "c", "a"];
        assert_eq!(render_chain(&chain), "a → b → c → a");
    }

    #[test]
    fn render_single_element_chain() {
        let chain = vec!["a"];
        assert_eq!(render_chain(&chain), "a");
    }

    #[test]
    fn render_empty_chain() {
        let chain: Vec<&str> = vec![];
        assert_eq!(render_chain(&chain), "");
    }

    #[test]
    fn required_by_rendering() {
        let chain = vec!["b", "a"];
        assert_eq!(render_required_by(&chain), "b\n  ← required by a");
    }

    #[test]
    fn shorten_simple_path() {
        assert_eq!(
            shorten_type_name("my_app::services::UserService"),
            "UserService"
        );
    }

    #[test]
    fn shorten_with_generics() {
        assert_eq!(
            shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>"),
            "Arc<dyn Logger>"
        );
    }

    #[test]
    fn shorten_no_path() {
        assert_eq!(shorten_type_name("u16"), "u16");
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("db", ""), 2);
        assert_eq!(edit_distance("database", "databse"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn suggest_typo() {
        let available = vec!["primaryDb", "logger", "greeting"];
        let suggestions = suggest_similar("greting", &available, 3);
        assert_eq!(suggestions, vec!["greeting".to_string()]);
    }

    #[test]
    fn suggest_substring_first() {
        let available = vec!["primaryDb", "db", "dbPool"];
        let suggestions = suggest_similar("Db", &available, 2);
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions.contains(&"db".to_string()));
    }

    #[test]
    fn suggest_no_match() {
        let available = vec!["database"];
        let suggestions = suggest_similar("xyz", &available, 3);
        assert!(suggestions.is_empty());
    }
}
