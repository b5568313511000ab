/// Normalized form of a place name: drop everything but ASCII letters and
/// spaces, then lowercase.
///
/// ```
/// assert_eq!(rm_search::clean_name("Peet's Coffee & Tea"), "peets coffee  tea");
/// ```
pub fn clean_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
