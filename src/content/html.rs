use scraper::{ElementRef, Html, Selector};

// Elements whose text is chrome or code, never prose.
const SKIP_TAGS: [&str; 7] = ["script", "style", "header", "footer", "nav", "aside", "iframe"];

// Containers tried in order; the first non-empty match wins.
const CONTENT_SELECTORS: [&str; 5] = ["article", "main", ".content", ".post", "body"];

/// Extract readable text from an HTML document.
///
/// Navigation, scripts and styling are skipped, and the main content
/// container is preferred over the full body when the page marks one.
/// The result is whitespace-collapsed.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = element_text(element);
            if !text.is_empty() {
                return text;
            }
        }
    }

    // Fragment without a body; fall back to the whole tree.
    element_text(document.root_element())
}

fn element_text(element: ElementRef) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef, out: &mut String) {
    if SKIP_TAGS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_extraction() {
        let html = "<html><body><p>Hello</p><p>world</p></body></html>";
        assert_eq!(extract_text(html), "Hello world");
    }

    #[test]
    fn test_scripts_and_styles_skipped() {
        let html = concat!(
            "<html><head><style>body { color: red; }</style></head>",
            "<body><script>var x = 1;</script><p>visible</p></body></html>"
        );
        assert_eq!(extract_text(html), "visible");
    }

    #[test]
    fn test_chrome_elements_skipped() {
        let html = concat!(
            "<body><nav>Menu</nav><header>Site</header>",
            "<p>the story</p>",
            "<aside>Related</aside><footer>Copyright</footer></body>"
        );
        assert_eq!(extract_text(html), "the story");
    }

    #[test]
    fn test_article_preferred_over_body() {
        let html = concat!(
            "<body><div>sidebar junk</div>",
            "<article>the actual article text</article></body>"
        );
        assert_eq!(extract_text(html), "the actual article text");
    }

    #[test]
    fn test_content_class_preferred() {
        let html = r#"<body><div>noise</div><div class="content">main text</div></body>"#;
        assert_eq!(extract_text(html), "main text");
    }

    #[test]
    fn test_whitespace_collapsed() {
        let html = "<body><p>  spaced\n\n   out\ttext  </p></body>";
        assert_eq!(extract_text(html), "spaced out text");
    }

    #[test]
    fn test_nested_markup() {
        let html = "<body><p>some <strong>bold <em>and italic</em></strong> text</p></body>";
        assert_eq!(extract_text(html), "some bold and italic text");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(extract_text(""), "");
    }
}
