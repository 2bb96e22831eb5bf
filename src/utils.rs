/// Derives a URL-safe slug from a topic title: lowercase, runs of
/// non-alphanumeric characters collapsed to a single hyphen, leading and
/// trailing hyphens trimmed.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugifies_titles() {
        assert_eq!(slugify("Border Talks"), "border-talks");
        assert_eq!(slugify("  Hello, World!  "), "hello-world");
        assert_eq!(slugify("A--B"), "a-b");
        assert_eq!(slugify("Ceasefire: Day 12"), "ceasefire-day-12");
        assert_eq!(slugify("---"), "");
    }
}
