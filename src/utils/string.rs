//! String manipulation utilities

/// Pluralize a word based on count
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// Render a closed chain `a → b → c → a`
pub fn format_chain<S: AsRef<str>>(items: &[S]) -> String {
    let mut parts: Vec<&str> = items.iter().map(|s| s.as_ref()).collect();
    if let Some(first) = items.first() {
        parts.push(first.as_ref());
    }
    parts.join(" → ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("module", 0), "modules");
        assert_eq!(pluralize("module", 1), "module");
        assert_eq!(pluralize("cycle", 5), "cycles");
    }

    #[test]
    fn test_format_chain_closes_loop() {
        assert_eq!(format_chain(&["a.ts", "b.ts"]), "a.ts → b.ts → a.ts");
        assert_eq!(format_chain::<&str>(&[]), "");
    }
}
