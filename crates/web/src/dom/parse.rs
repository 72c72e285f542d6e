// ABOUTME: Parses raw markup into a scraper document, optionally strained and cleaned.
// ABOUTME: ParseOptions bundles the strainer and the clean settings for parse_document.

use scraper::{ElementRef, Html};

use super::sanitize::{clean_document, CleanOptions};
use super::strainer::Strainer;

/// Options for [`parse_document`].
///
/// `cleaning: None` returns the parsed (and strained) tree untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub strainer: Option<Strainer>,
    pub cleaning: Option<CleanOptions>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strainer: None,
            cleaning: Some(CleanOptions::default()),
        }
    }
}

impl ParseOptions {
    /// Parse without cleaning.
    pub fn raw() -> Self {
        Self {
            strainer: None,
            cleaning: None,
        }
    }

    pub fn strainer(mut self, strainer: Strainer) -> Self {
        self.strainer = Some(strainer);
        self
    }

    pub fn cleaning(mut self, opts: CleanOptions) -> Self {
        self.cleaning = Some(opts);
        self
    }

    pub fn no_clean(mut self) -> Self {
        self.cleaning = None;
        self
    }
}

/// Parse `text` as an HTML document.
///
/// Malformed markup is recovered by html5ever and never fails. With a
/// strainer, the result is a fragment holding only the matching subtrees.
pub fn parse_document(text: &str, opts: &ParseOptions) -> Html {
    let mut doc = Html::parse_document(text);

    if let Some(ref strainer) = opts.strainer {
        doc = strainer.apply(&doc);
    }

    if let Some(ref cleaning) = opts.cleaning {
        clean_document(&mut doc, cleaning);
    }

    doc
}

/// Every element attached to the document, in document order.
pub fn elements(doc: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    doc.tree.root().descendants().filter_map(ElementRef::wrap)
}

/// Elements whose text content is never rendered.
const HIDDEN_TEXT_PARENTS: [&str; 3] = ["script", "style", "noscript"];

/// Visible text of the document with whitespace runs collapsed.
///
/// Text directly inside `script`, `style` or `noscript` is skipped, so an
/// uncleaned document still yields only what a reader would see.
pub fn document_text(doc: &Html) -> String {
    let mut out = String::new();
    for node in doc.tree.root().descendants() {
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element())
            .is_some_and(|el| HIDDEN_TEXT_PARENTS.contains(&el.name()));
        if hidden {
            continue;
        }
        if let Some(text) = node.value().as_text() {
            for word in text.split_whitespace() {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(word);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str =
        "<html><head><title>x</title></head><body><!--c--><p>hi</p></body></html>";

    #[test]
    fn raw_parse_matches_direct_parse() {
        let html = r#"<!DOCTYPE html><html><head><script>1</script></head><body><!--c--><img src="a"><p>hi</p></body></html>"#;
        let doc = parse_document(html, &ParseOptions::raw());
        assert_eq!(doc.html(), Html::parse_document(html).html());
    }

    #[test]
    fn default_clean_leaves_single_paragraph() {
        let doc = parse_document(SAMPLE, &ParseOptions::default());

        let names: Vec<&str> = elements(&doc).map(|e| e.value().name()).collect();
        assert_eq!(names, vec!["html", "body", "p"]);

        let body = elements(&doc).find(|e| e.value().name() == "body").unwrap();
        let body_children: Vec<ElementRef> = body.children().filter_map(ElementRef::wrap).collect();
        assert_eq!(body_children.len(), 1);
        assert_eq!(body_children[0].value().name(), "p");
        assert_eq!(body_children[0].text().collect::<String>(), "hi");

        assert!(!doc.tree.root().descendants().any(|n| n.value().is_comment()));
        assert_eq!(document_text(&doc), "hi");
    }

    #[test]
    fn strainer_then_clean() {
        let html = r#"<div class="post"><p>keep</p><script>x</script></div><div class="ad">drop</div>"#;
        let opts = ParseOptions::default().strainer(Strainer::new("div").attr("class", "post"));
        let doc = parse_document(html, &opts);

        let names: Vec<&str> = elements(&doc).map(|e| e.value().name()).collect();
        assert_eq!(names, vec!["div", "p"]);
        assert_eq!(document_text(&doc), "keep");
    }

    #[test]
    fn malformed_markup_is_recovered() {
        let doc = parse_document("<p>open <b>bold<p>next", &ParseOptions::default());
        assert_eq!(elements(&doc).filter(|e| e.value().name() == "p").count(), 2);
        assert!(document_text(&doc).contains("bold"));
    }

    #[test]
    fn document_text_collapses_whitespace() {
        let doc = parse_document("<p>  a\n\n b </p><p>c</p>", &ParseOptions::raw());
        assert_eq!(document_text(&doc), "a b c");
    }

    #[test]
    fn document_text_skips_script_and_style() {
        let html = "<html><head><style>p { color: red }</style></head>\
<body><script>var x = 1;</script><noscript>enable js</noscript><p>shown</p></body></html>";
        let doc = parse_document(html, &ParseOptions::raw());
        assert_eq!(elements(&doc).filter(|e| e.value().name() == "script").count(), 1);
        assert_eq!(document_text(&doc), "shown");
    }
}
