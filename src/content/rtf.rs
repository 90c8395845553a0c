use regex::Regex;

/// Strip RTF control codes, keeping the document text.
///
/// This is a plain-text salvage pass, not an RTF parser: paragraph and
/// tab controls become whitespace, groups and remaining control words are
/// dropped, and the result is whitespace-collapsed. Paragraph controls
/// run before the generic control-word pass would eat them.
pub fn strip(text: &str) -> String {
    let mut out = text.to_string();

    out = replace(&out, r"\\pard?\b ?", "\n");
    out = replace(&out, r"\\tab\b ?", "\t");
    // Hex escapes carry encoding-specific bytes; drop them.
    out = replace(&out, r"\\'[0-9a-fA-F]{2}", "");
    // Control words consume one following space per the RTF grammar.
    out = replace(&out, r"\\[a-z]+(?:-?[0-9]+)? ?", "");
    // Escaped literals, then groups and stray braces.
    out = replace(&out, r"\\[\\'{}]", "");
    out = replace(&out, r"\{[^}]*\}", "");
    out = out.replace(['{', '}'], "");
    // Collapse all whitespace runs.
    out = replace(&out, r"\s+", " ");

    out.trim().to_string()
}

fn replace(text: &str, pattern: &str, replacement: &str) -> String {
    match Regex::new(pattern) {
        Ok(re) => re.replace_all(text, replacement).into_owned(),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_rtf_document() {
        let rtf = r"{\rtf1\ansi\deff0 {\fonttbl {\f0 Times New Roman;}}\f0\fs24 Hello World\par}";
        assert_eq!(strip(rtf), "Hello World");
    }

    #[test]
    fn test_par_becomes_break() {
        let rtf = r"first line\par second line";
        assert_eq!(strip(rtf), "first line second line");
    }

    #[test]
    fn test_hex_escapes_dropped() {
        let rtf = r"caf\'e9 visit";
        assert_eq!(strip(rtf), "caf visit");
    }

    #[test]
    fn test_groups_removed() {
        let rtf = r"{\colortbl;\red0\green0\blue0;}visible text";
        assert_eq!(strip(rtf), "visible text");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip("no markup at all"), "no markup at all");
    }
}
