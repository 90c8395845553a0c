use regex::Regex;

/// Strip Markdown syntax, keeping the readable text.
///
/// Markup that wraps text (emphasis, links, headings, quotes) keeps its
/// inner text; markup with no prose value (images, fenced code blocks,
/// horizontal rules) is dropped. The passes run in a fixed order because
/// later patterns assume earlier ones have already fired, e.g. images
/// before links.
pub fn strip(text: &str) -> String {
    let mut out = text.to_string();

    // Headings keep their title text.
    out = replace(&out, r"#{1,6}\s+([^\n]+)", "${1}\n");
    // List markers, bulleted and numbered.
    out = replace(&out, r"(?:^|\n)[-*+]\s+([^\n]+)", "\n${1}");
    out = replace(&out, r"(?:^|\n)\d+\.\s+([^\n]+)", "\n${1}");
    // Images before links, since every image is also link-shaped.
    out = replace(&out, r"!\[[^\]]*\]\([^)]+\)", "");
    // Inline and reference-style links keep the link text.
    out = replace(&out, r"\[([^\]]+)\]\([^)]+\)", "${1}");
    out = replace(&out, r"\[([^\]]+)\]\[[^\]]*\]", "${1}");
    // Emphasis, strong before regular.
    out = replace(&out, r"(?:\*\*|__)(.*?)(?:\*\*|__)", "${1}");
    out = replace(&out, r"(?:\*|_)(.*?)(?:\*|_)", "${1}");
    // Fenced code blocks go away entirely; inline code keeps its text.
    out = replace(&out, r"(?s)```.+?```", "");
    out = replace(&out, r"`([^`]+)`", "${1}");
    // Blockquote markers.
    out = replace(&out, r"(?m)^\s*>\s+([^\n]+)", "${1}");
    // Table rows become space-joined cell text.
    out = flatten_table_rows(&out);
    // Horizontal rules.
    out = replace(&out, r"(?:^|\n)[-*_]{3,}\s*(?:\n|$)", "\n");
    // Collapse runs of blank lines.
    out = replace(&out, r"\n\s*\n", "\n");

    out.trim().to_string()
}

fn replace(text: &str, pattern: &str, replacement: &str) -> String {
    match Regex::new(pattern) {
        Ok(re) => re.replace_all(text, replacement).into_owned(),
        Err(_) => text.to_string(),
    }
}

fn flatten_table_rows(text: &str) -> String {
    match Regex::new(r"\|[^\n]+\|") {
        Ok(re) => re
            .replace_all(text, |caps: &regex::Captures| {
                caps[0]
                    .split('|')
                    .map(str::trim)
                    .filter(|cell| !cell.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .into_owned(),
        Err(_) => text.to_string(),
    }
}
