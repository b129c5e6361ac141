//! Locating the data table in an HTML document.

use scraper::{ElementRef, Html, Selector};

use crate::error::{ExtractError, ExtractResult};

/// Which element holds the data: the first match in document order wins.
#[derive(Debug, Clone)]
pub struct TableSelector {
    source: String,
    selector: Selector,
}

impl TableSelector {
    /// Parse a CSS selector such as `table.wikitable`.
    pub fn parse(css: &str) -> ExtractResult<Self> {
        let selector = Selector::parse(css).map_err(|e| ExtractError::InvalidSelector {
            selector: css.to_string(),
            message: format!("{:?}", e),
        })?;
        Ok(Self {
            source: css.to_string(),
            selector,
        })
    }

    /// Build a selector from a tag and attribute constraints.
    ///
    /// `class` matches a single whitespace-separated token, every other
    /// attribute must match exactly:
    ///
    /// ```
    /// use gdp_etl::parser::table::TableSelector;
    ///
    /// let sel = TableSelector::from_attributes("table", [("class", "wikitable")]).unwrap();
    /// assert_eq!(sel.as_str(), r#"table[class~="wikitable"]"#);
    /// ```
    pub fn from_attributes<'a, I>(tag: &str, attributes: I) -> ExtractResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut css = tag.to_string();
        for (name, value) in attributes {
            let op = if name == "class" { "~=" } else { "=" };
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            css.push_str(&format!("[{}{}\"{}\"]", name, op, escaped));
        }
        Self::parse(&css)
    }

    /// The CSS text this selector was built from.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Find the first element matching `selector`.
pub fn locate_table<'a>(document: &'a Html, selector: &TableSelector) -> ExtractResult<ElementRef<'a>> {
    document
        .select(&selector.selector)
        .next()
        .ok_or_else(|| ExtractError::TableNotFound {
            selector: selector.source.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <table class="infobox"><tr><td>not this</td></tr></table>
          <table class="wikitable sortable" id="first"><tr><td>a</td></tr></table>
          <table class="wikitable" id="second"><tr><td>b</td></tr></table>
        </body></html>
    "#;

    #[test]
    fn test_first_match_wins() {
        let doc = Html::parse_document(PAGE);
        let sel = TableSelector::parse("table.wikitable").unwrap();
        let table = locate_table(&doc, &sel).unwrap();
        assert_eq!(table.value().attr("id"), Some("first"));
    }

    #[test]
    fn test_class_attribute_matches_token() {
        let doc = Html::parse_document(PAGE);
        let sel = TableSelector::from_attributes("table", [("class", "wikitable")]).unwrap();
        let table = locate_table(&doc, &sel).unwrap();
        assert_eq!(table.value().attr("id"), Some("first"));
    }

    #[test]
    fn test_exact_attribute_match() {
        let doc = Html::parse_document(PAGE);
        let sel = TableSelector::from_attributes("table", [("id", "second")]).unwrap();
        let table = locate_table(&doc, &sel).unwrap();
        assert_eq!(table.value().attr("class"), Some("wikitable"));
    }

    #[test]
    fn test_table_not_found() {
        let doc = Html::parse_document("<html><body><p>no tables</p></body></html>");
        let sel = TableSelector::parse("table.wikitable").unwrap();
        let err = locate_table(&doc, &sel).unwrap_err();
        assert!(matches!(err, ExtractError::TableNotFound { ref selector } if selector == "table.wikitable"));
    }

    #[test]
    fn test_invalid_selector() {
        let err = TableSelector::parse("table[").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidSelector { .. }));
    }
}
