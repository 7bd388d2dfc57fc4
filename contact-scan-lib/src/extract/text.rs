//! Tag-stripping pass that turns a page body into searchable text.

use scraper::{Html, Node};

/// Elements whose text is code or markup rather than page content.
const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Convert an HTML (or plain text) body into a single line of text.
///
/// Every visible text node is trimmed, empty nodes are dropped and the rest
/// are joined with single spaces. Text inside `script`, `style`, `noscript`
/// and `template` elements is skipped.
pub fn html_to_text(raw: &str) -> String {
    let document = Html::parse_document(raw);

    document
        .root_element()
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|ancestor| match ancestor.value() {
                Node::Element(element) => NON_CONTENT_ELEMENTS.contains(&element.name()),
                _ => false,
            })
        })
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_joins_nodes() {
        let html = "<html><head><title>Acme</title></head>\
                    <body><h1> Contact </h1><p>Call <b>(555) 123-4567</b></p></body></html>";
        assert_eq!(html_to_text(html), "Acme Contact Call (555) 123-4567");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(html_to_text("just some text"), "just some text");
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(html_to_text(""), "");
        assert_eq!(html_to_text("<html><body>   </body></html>"), "");
    }

    #[test]
    fn test_script_and_style_are_skipped() {
        let html = "<html><head><style>.tel { color: #555123; }</style>\
                    <script>var x = '555-123-4567';</script></head>\
                    <body><script>dataLayer.push({zip: 'TX 78701'});</script><p>hi</p>\
                    <noscript>Enable JavaScript</noscript></body></html>";
        assert_eq!(html_to_text(html), "hi");
    }

    #[test]
    fn test_adjacent_blocks_are_separated() {
        let html = "<div>Austin,</div><div>TX 78701</div>";
        assert_eq!(html_to_text(html), "Austin, TX 78701");
    }
}
