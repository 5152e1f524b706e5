//! Meta-tag strategy: a fixed ordered list of metadata selectors known to
//! carry price content.

use scraper::{Html, Selector};

const META_SELECTORS: [&str; 3] = [
    r#"meta[itemprop="price"]"#,
    r#"meta[property="product:price:amount"]"#,
    r#"meta[name="price"]"#,
];

/// `content` attributes of the known price meta tags, in selector order.
pub fn candidates(doc: &Html) -> Vec<String> {
    let mut out = Vec::new();
    for sel in META_SELECTORS {
        let Ok(selector) = Selector::parse(sel) else {
            continue;
        };
        for el in doc.select(&selector) {
            if let Some(content) = el.value().attr("content") {
                if !content.is_empty() {
                    out.push(content.to_string());
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn itemprop_price_content() {
        let doc = Html::parse_document(r#"<meta itemprop="price" content="24,90">"#);
        assert_eq!(candidates(&doc), vec!["24,90"]);
    }

    #[test]
    fn selector_order_is_fixed() {
        let doc = Html::parse_document(
            r#"
            <meta name="price" content="30.00">
            <meta itemprop="price" content="25.00">
        "#,
        );
        // itemprop is tried first regardless of document order
        assert_eq!(candidates(&doc), vec!["25.00", "30.00"]);
    }

    #[test]
    fn empty_content_is_ignored() {
        let doc = Html::parse_document(r#"<meta itemprop="price" content="">"#);
        assert!(candidates(&doc).is_empty());
    }
}
