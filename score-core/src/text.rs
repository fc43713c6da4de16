/// Input bound shared by the name fields of the add-player and
/// create-game forms.
pub const NAME_MAX_LEN: usize = 28;

/// Trims surrounding whitespace and clamps to `NAME_MAX_LEN` characters.
/// An empty result means the input is unusable and the operation should
/// be rejected.
pub fn clamp_name(raw: &str) -> String {
    raw.trim().chars().take(NAME_MAX_LEN).collect()
}

/// Uppercases the first character for display. Storage keeps the name
/// as entered.
pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_name_trims_and_bounds() {
        assert_eq!(clamp_name("  bob "), "bob");
        assert_eq!(clamp_name("   "), "");

        let long = "x".repeat(40);
        assert_eq!(clamp_name(&long).chars().count(), NAME_MAX_LEN);
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("bob"), "Bob");
        assert_eq!(capitalize_first("Bob"), "Bob");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("élise"), "Élise");
    }
}
