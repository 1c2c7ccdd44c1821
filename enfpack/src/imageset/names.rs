//! Identifier normalization.

/// Convert an arbitrary string to a safe imageset identifier.
///
/// Only ASCII alphanumerics survive; every other character splits tokens.
/// Tokens join as `snake_case`, or as `CamelCase` when `camel` is set
/// (first letter upper, rest lower). Returns an empty string when nothing
/// survives.
pub fn normalize_name(input: &str, camel: bool) -> String {
    let tokens = split_tokens(input);
    if tokens.is_empty() {
        return String::new();
    }

    if camel {
        tokens.iter().map(|t| camel_token(t)).collect()
    } else {
        tokens.join("_")
    }
}

fn split_tokens(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buf = String::new();

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            buf.push(c.to_ascii_lowercase());
        } else if !buf.is_empty() {
            tokens.push(std::mem::take(&mut buf));
        }
    }
    if !buf.is_empty() {
        tokens.push(buf);
    }

    tokens
}

fn camel_token(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    for (i, c) in token.chars().enumerate() {
        if i == 0 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_basic() {
        assert_eq!(normalize_name("My Icon Name", false), "my_icon_name");
    }

    #[test]
    fn test_snake_symbols() {
        assert_eq!(normalize_name("UI@@Button##OK", false), "ui_button_ok");
    }

    #[test]
    fn test_camel_basic() {
        assert_eq!(normalize_name("my icon name", true), "MyIconName");
    }

    #[test]
    fn test_camel_mixed() {
        assert_eq!(normalize_name("HP_Bar-42", true), "HpBar42");
    }

    #[test]
    fn test_empty_normalization() {
        assert_eq!(normalize_name("___", false), "");
        assert_eq!(normalize_name("", true), "");
        assert_eq!(normalize_name("@#$%", true), "");
    }

    #[test]
    fn test_drops_non_ascii() {
        assert_eq!(normalize_name("héllo", false), "h_llo");
    }

    #[test]
    fn test_snake_and_camel_share_tokens() {
        // The two spellings differ only in separator and casing.
        let snake = normalize_name("HP_Bar-42", false);
        let camel = normalize_name("HP_Bar-42", true);
        assert_eq!(snake, "hp_bar_42");
        assert_eq!(camel, "HpBar42");
        assert_eq!(snake.replace('_', ""), camel.to_ascii_lowercase());
    }
}
