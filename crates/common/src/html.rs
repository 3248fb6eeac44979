//! Escaping for Telegram's HTML parse mode.

/// Escape text for interpolation into an HTML-formatted message.
///
/// Covers the three characters Telegram requires plus both quote kinds, so
/// the output is also safe inside attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("plain text", "plain text")]
    #[case("<b>hi</b>", "&lt;b&gt;hi&lt;/b&gt;")]
    #[case("Tom & Jerry", "Tom &amp; Jerry")]
    #[case(r#"say "hi""#, "say &quot;hi&quot;")]
    #[case("it's", "it&#x27;s")]
    #[case("🎉 party", "🎉 party")]
    fn escapes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_html(input), expected);
    }

    #[test]
    fn escaping_is_not_idempotent_on_entities() {
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }
}
