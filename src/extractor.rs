//! Pure HTML extraction helpers: price text from a CSS selector and
//! page-title resolution for product identity.

use scraper::{Html, Selector};

use crate::error::{Error, Result};

/// Longest title kept as a product identity; longer titles are cut to
/// [`TITLE_TRUNCATED_LEN`] characters plus `...`.
const TITLE_MAX_LEN: usize = 50;
const TITLE_TRUNCATED_LEN: usize = 47;

/// Extract a price from the first element matching `selector`.
///
/// The element's text is trimmed and filtered to ASCII digits and the
/// decimal point before parsing, which silently drops currency symbols,
/// thousands separators and surrounding labels. A selector that matches
/// nothing and text that does not survive as a parseable number are distinct
/// error kinds, but the Monitor treats both as "price unavailable".
pub fn extract_price(html: &str, selector: &str) -> Result<f64> {
    let parsed = Selector::parse(selector).map_err(|_| Error::InvalidSelector {
        selector: selector.to_string(),
    })?;

    let document = Html::parse_document(html);
    let element = document
        .select(&parsed)
        .next()
        .ok_or_else(|| Error::ElementNotFound {
            selector: selector.to_string(),
        })?;

    let text = element.text().collect::<String>();
    let text = text.trim();
    let numeric: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    numeric.parse::<f64>().map_err(|_| Error::ParsePrice {
        text: text.to_string(),
    })
}

/// Best-effort page title for product identity: trimmed, embedded line
/// breaks stripped, truncated when longer than 50 characters.
pub fn page_title(html: &str) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let document = Html::parse_document(html);
    let element = document.select(&selector).next()?;

    let title = element.text().collect::<String>();
    let title = title.trim().replace('\n', " ").replace('\r', "");
    if title.is_empty() {
        return None;
    }

    if title.chars().count() > TITLE_MAX_LEN {
        let truncated: String = title.chars().take(TITLE_TRUNCATED_LEN).collect();
        Some(format!("{truncated}..."))
    } else {
        Some(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_price() {
        let html = r#"<html><body><div class="price">$19.99</div></body></html>"#;
        assert_eq!(extract_price(html, ".price").unwrap(), 19.99);
    }

    #[test]
    fn test_extract_strips_currency_and_separators() {
        let html = r#"<div id="total">Now only 1,299.99 EUR!</div>"#;
        assert_eq!(extract_price(html, "#total").unwrap(), 1299.99);
    }

    #[test]
    fn test_extract_uses_first_match() {
        let html = r#"<span class="p">$10.00</span><span class="p">$20.00</span>"#;
        assert_eq!(extract_price(html, ".p").unwrap(), 10.0);
    }

    #[test]
    fn test_trailing_zero_parses_to_same_float() {
        let a = extract_price(r#"<i class="p">9.99</i>"#, ".p").unwrap();
        let b = extract_price(r#"<i class="p">9.990</i>"#, ".p").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_selector_miss() {
        let html = "<html><body><p>no price here</p></body></html>";
        let err = extract_price(html, ".price").unwrap_err();
        assert!(matches!(err, Error::ElementNotFound { .. }));
    }

    #[test]
    fn test_non_numeric_text() {
        let html = r#"<div class="price">Sold out</div>"#;
        let err = extract_price(html, ".price").unwrap_err();
        assert!(matches!(err, Error::ParsePrice { .. }));
    }

    #[test]
    fn test_multiple_decimal_points_fail() {
        let html = r#"<div class="price">v1.2.3</div>"#;
        assert!(matches!(
            extract_price(html, ".price"),
            Err(Error::ParsePrice { .. })
        ));
    }

    #[test]
    fn test_invalid_selector() {
        let err = extract_price("<div/>", ">>>").unwrap_err();
        assert!(matches!(err, Error::InvalidSelector { .. }));
    }

    #[test]
    fn test_page_title_basic() {
        let html = "<html><head><title>  Acme Widget \n Store </title></head></html>";
        assert_eq!(page_title(html).unwrap(), "Acme Widget   Store");
    }

    #[test]
    fn test_page_title_truncation() {
        let long = "X".repeat(60);
        let html = format!("<title>{long}</title>");
        let title = page_title(&html).unwrap();
        assert_eq!(title.chars().count(), 50);
        assert!(title.ends_with("..."));
        assert!(title.starts_with(&"X".repeat(47)));
    }

    #[test]
    fn test_page_title_exactly_fifty_chars_kept() {
        let exact = "Y".repeat(50);
        let html = format!("<title>{exact}</title>");
        assert_eq!(page_title(&html).unwrap(), exact);
    }

    #[test]
    fn test_missing_or_empty_title() {
        assert!(page_title("<html><body>no title</body></html>").is_none());
        assert!(page_title("<title>   </title>").is_none());
    }
}
