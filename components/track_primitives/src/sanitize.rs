use sanitize_filename::Options;

/// Longest sanitized name, in bytes. Leaves room for the extension the fetch
/// tool appends (`.webm` while downloading, `.mp3` after conversion) within
/// the 255-byte file name limit of common filesystems.
pub const MAX_NAME_BYTES: usize = 200;

/// Make `name` safe to use as a file name on every filesystem we write to.
///
/// Windows is the most restrictive target, so its rules apply everywhere:
/// `< > : " / \ | ? *` and control characters are removed, reserved device
/// names and trailing dots are dropped. Runs of whitespace (tabs and
/// newlines included) collapse to a single space and the result is trimmed.
/// Names are cut to at most [`MAX_NAME_BYTES`] on a character boundary.
///
/// The function is idempotent: sanitizing a sanitized name returns it
/// unchanged.
///
/// # Examples
/// ```
/// # use track_primitives::sanitize_filename;
/// assert_eq!(sanitize_filename("AC/DC: Back in Black?"), "ACDC Back in Black");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    // Whitespace first, so tabs become spaces instead of being stripped as
    // control characters and gluing words together.
    let spaced = collapse_whitespace(name);
    let mut current = truncate_to_bytes(&spaced, MAX_NAME_BYTES).to_string();

    // Stripping can expose a new trailing dot or reserved name ("CON ." ->
    // "CON"), so repeat until nothing changes. Every change shortens the name.
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_once(name: &str) -> String {
    let stripped = sanitize_filename::sanitize_with_options(
        name,
        Options {
            windows: true,
            truncate: false,
            replacement: "",
        },
    );

    collapse_whitespace(&stripped)
}

fn collapse_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_to_bytes(name: &str, max_bytes: usize) -> &str {
    if name.len() <= max_bytes {
        return name;
    }
    let mut end = max_bytes;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("AC/DC: Back in Black?", "ACDC Back in Black")]
    #[case("Guns N' Roses - Sweet Child O' Mine", "Guns N' Roses - Sweet Child O' Mine")]
    #[case("  Daft   Punk -\tOne More\nTime ", "Daft Punk - One More Time")]
    #[case(r#"Artist?<>\/*|" - Song"#, "Artist - Song")]
    #[case("Sigur Rós - Hoppípolla", "Sigur Rós - Hoppípolla")]
    #[case("CON .", "")]
    fn strips_illegal_characters_and_collapses_whitespace(
        #[case] input: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(sanitize_filename(input), expected);
    }

    #[rstest]
    #[case("AC/DC: Back in Black?".to_string())]
    #[case("a / b : c".to_string())]
    #[case("Title with trailing dots...".to_string())]
    #[case("  \t  ".to_string())]
    #[case("CON".to_string())]
    #[case("CON .".to_string())]
    #[case("a".repeat(254) + ".b")]
    #[case("a".repeat(199) + ".b")]
    #[case("é".repeat(150))]
    fn sanitizing_twice_changes_nothing(#[case] input: String) {
        let once = sanitize_filename(&input);
        assert_eq!(sanitize_filename(&once), once);
    }

    #[rstest]
    #[case("x".repeat(300))]
    #[case("a".repeat(199) + ".b")]
    #[case("é".repeat(150))]
    #[case(format!("{} - {}", "Orchestra", "y ".repeat(200)))]
    fn long_names_fit_the_budget_without_trailing_dot_or_space(#[case] input: String) {
        let sanitized = sanitize_filename(&input);

        assert!(!sanitized.is_empty());
        assert!(
            sanitized.len() <= MAX_NAME_BYTES,
            "{} bytes exceeds the budget",
            sanitized.len()
        );
        assert!(!sanitized.ends_with('.') && !sanitized.ends_with(' '));
    }

    #[test]
    fn truncation_respects_character_boundaries() {
        // 'é' is two bytes, so an odd budget falls inside a character
        assert_eq!(truncate_to_bytes("éé", 3), "é");
        assert_eq!(truncate_to_bytes("abc", 200), "abc");
    }

    #[test]
    fn removing_characters_does_not_leave_double_spaces() {
        // "a / b" loses the slash, which would leave two adjacent spaces
        assert_eq!(sanitize_filename("a / b"), "a b");
    }

    #[test]
    fn no_forbidden_characters_survive() {
        let sanitized = sanitize_filename("Song|\":\n\t<weird>*name?/\\");
        let forbidden = ['<', '>', '\\', '/', '*', '|', '"', ':', '?', '\n', '\t'];

        for c in forbidden {
            assert!(
                !sanitized.contains(c),
                "sanitized name '{}' should not contain '{}'",
                sanitized,
                c.escape_default()
            );
        }
    }
}
