use regex::Regex;
use std::sync::LazyLock;

// Raw function-call markup some models leak into plain replies. `.` does not
// cross newlines, so a tag split over lines is left alone.
static FUNCTION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<function=.*?>.*?</function>").expect("function tag pattern is valid"));

/// Strip `<function=...>...</function>` spans and surrounding whitespace
pub fn clean_response_text(text: &str) -> String {
    FUNCTION_TAG.replace_all(text, "").trim().to_string()
}
