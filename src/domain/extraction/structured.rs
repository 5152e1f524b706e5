//! Structured-data strategy: JSON-LD Product/Offer blocks.

use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;

static LD_JSON: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid ld+json selector")
});

/// Price candidates declared by embedded Product/Offer blocks.
///
/// A block that is not valid JSON is skipped silently; another strategy may
/// still succeed on the same page.
pub fn candidates(doc: &Html) -> Vec<String> {
    let mut out = Vec::new();
    for tag in doc.select(&LD_JSON) {
        let raw: String = tag.text().collect();
        let Ok(data) = serde_json::from_str::<Value>(&raw) else {
            continue;
        };
        let blocks = match data {
            Value::Array(items) => items,
            other => vec![other],
        };
        for block in &blocks {
            let Some(obj) = block.as_object() else {
                continue;
            };
            match obj.get("@type").and_then(Value::as_str) {
                Some("Product") => {
                    if let Some(offers) = obj.get("offers").and_then(Value::as_object) {
                        if let Some(price) = offers.get("price") {
                            push_scalar(price, &mut out);
                        }
                        if let Some(spec) =
                            offers.get("priceSpecification").and_then(Value::as_object)
                        {
                            if let Some(price) = spec.get("price") {
                                push_scalar(price, &mut out);
                            }
                        }
                    }
                }
                Some("Offer") => {
                    if let Some(price) = obj.get("price") {
                        push_scalar(price, &mut out);
                    }
                }
                _ => {}
            }
        }
    }
    out
}

fn push_scalar(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Number(n) => out.push(n.to_string()),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Html {
        Html::parse_document(body)
    }

    #[test]
    fn product_offers_price() {
        let html = r#"<script type="application/ld+json">
            {"@type":"Product","name":"Casque","offers":{"price":"129.99"}}
        </script>"#;
        assert_eq!(candidates(&doc(html)), vec!["129.99"]);
    }

    #[test]
    fn product_price_specification_comes_after_offer_price() {
        let html = r#"<script type="application/ld+json">
            {"@type":"Product","offers":{"price":129.99,"priceSpecification":{"price":119.99}}}
        </script>"#;
        assert_eq!(candidates(&doc(html)), vec!["129.99", "119.99"]);
    }

    #[test]
    fn direct_offer_block() {
        let html = r#"<script type="application/ld+json">
            {"@type":"Offer","price":"59.90"}
        </script>"#;
        assert_eq!(candidates(&doc(html)), vec!["59.90"]);
    }

    #[test]
    fn top_level_array_of_blocks() {
        let html = r#"<script type="application/ld+json">
            [{"@type":"BreadcrumbList"},{"@type":"Product","offers":{"price":"7.50"}}]
        </script>"#;
        assert_eq!(candidates(&doc(html)), vec!["7.50"]);
    }

    #[test]
    fn malformed_json_is_skipped() {
        let html = r#"
            <script type="application/ld+json">{not json at all</script>
            <script type="application/ld+json">{"@type":"Offer","price":"3.20"}</script>
        "#;
        assert_eq!(candidates(&doc(html)), vec!["3.20"]);
    }

    #[test]
    fn unrelated_blocks_yield_nothing() {
        let html = r#"<script type="application/ld+json">
            {"@type":"Organization","name":"Shop"}
        </script>"#;
        assert!(candidates(&doc(html)).is_empty());
    }
}
