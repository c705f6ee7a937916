// Property blob tokenizer and value escaping

#[cfg(test)]
mod tests {
    use acmi_core::stream::framing::escape::{escape_value, has_continuation, split_property_tokens};
    use acmi_core::stream::framing::FrameError;

// # ✅ Tokenizer

    #[test]
    fn splits_on_unescaped_commas() {
        let tokens = split_property_tokens("a,b,c").unwrap();
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn escaped_comma_stays_in_token() {
        let tokens = split_property_tokens("a\\,b,c").unwrap();
        assert_eq!(tokens, vec!["a,b", "c"]);
    }

    #[test]
    fn escaped_backslash_is_literal() {
        let tokens = split_property_tokens("x\\\\,y").unwrap();
        assert_eq!(tokens, vec!["x\\", "y"]);
    }

    #[test]
    fn escape_of_ordinary_char_drops_backslash() {
        let tokens = split_property_tokens("\\q").unwrap();
        assert_eq!(tokens, vec!["q"]);
    }

    #[test]
    fn empty_blob_is_single_empty_token() {
        assert_eq!(split_property_tokens("").unwrap(), vec![""]);
    }

    #[test]
    fn empty_tokens_are_kept() {
        assert_eq!(split_property_tokens("a,,b,").unwrap(), vec!["a", "", "b", ""]);
    }

// # ❌ Dangling escape

    #[test]
    fn trailing_escape_is_malformed() {
        assert!(matches!(split_property_tokens("x\\"), Err(FrameError::MalformedEscape)));
    }

// # ✅ Escaping

    #[test]
    fn escape_value_handles_specials() {
        assert_eq!(escape_value("plain"), "plain");
        assert_eq!(escape_value("a,b"), "a\\,b");
        assert_eq!(escape_value("a\nb"), "a\\\nb");
        assert_eq!(escape_value("a\\b"), "a\\\\b");
    }

    #[test]
    fn escaped_value_tokenizes_back() {
        let value = "Hel\\lo, world\nline 2,";
        let blob = format!("Name={}", escape_value(value));
        let tokens = split_property_tokens(&blob).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0], format!("Name={value}"));
    }

// # ✅ Continuation detection

    #[test]
    fn continuation_needs_odd_trailing_backslashes() {
        assert!(!has_continuation("5,Name=Hello"));
        assert!(has_continuation("5,Name=Hel\\"));
        assert!(!has_continuation("5,Path=C:\\\\"));
        assert!(has_continuation("5,Path=C:\\\\\\"));
        assert!(!has_continuation(""));
    }
}
