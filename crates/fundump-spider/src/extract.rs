use crate::{Result, SpiderError};
use scraper::{ElementRef, Html};
use tracing::trace;

/// Presentation class Finviz puts on every value cell of the snapshot table.
pub const VALUE_CLASS: &str = "snapshot-td2";

/// A parsed quote page.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Whether the page carries any snapshot value cells at all; unknown symbols
    /// return a page without them.
    pub fn has_snapshot(&self) -> bool {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(|node| node.value().as_element())
            .any(|element| element.classes().any(|class| class == VALUE_CLASS))
    }

    /// Text of the first value cell following the label `name`.
    ///
    /// The label is the first text node (trimmed) equal to `name`; the value is the next
    /// element, in document order, carrying [VALUE_CLASS]. This is positional: if the
    /// markup changes, the lookup fails with [SpiderError::NotFound].
    ///
    /// ```rust
    /// use fundump_spider::extract::Document;
    ///
    /// let doc = Document::parse(
    ///     r#"<table><tr>
    ///         <td class="snapshot-td2-cp">P/E</td><td class="snapshot-td2"><b>31.20</b></td>
    ///         <td class="snapshot-td2-cp">Forward P/E</td><td class="snapshot-td2"><b>25.01</b></td>
    ///     </tr></table>"#,
    /// );
    /// assert_eq!(doc.field("P/E").unwrap(), "31.20");
    /// assert_eq!(doc.field("Forward P/E").unwrap(), "25.01");
    /// assert!(doc.field("PEG").is_err());
    /// ```
    pub fn field(&self, name: &str) -> Result<String> {
        let mut nodes = self.html.tree.root().descendants();

        // find the label
        nodes
            .by_ref()
            .find(|node| {
                node.value()
                    .as_text()
                    .is_some_and(|text| text.trim() == name)
            })
            .ok_or_else(|| SpiderError::not_found(format!("field \"{name}\"")))?;

        // the value cell comes after it
        let value = nodes
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().classes().any(|class| class == VALUE_CLASS))
            .ok_or_else(|| SpiderError::not_found(format!("value of field \"{name}\"")))?;

        let text: String = value.text().collect();
        trace!("extracted field \"{name}\": {text}");
        Ok(text.trim().to_string())
    }
}

/// Free-standing form of [Document::field].
pub fn extract_field(document: &Document, name: &str) -> Result<String> {
    document.field(name)
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"
        <html><body>
        <table class="snapshot-table2">
          <tr>
            <td class="snapshot-td2-cp">Dividend %</td>
            <td class="snapshot-td2" align="left"><b><span style="color:#aa0000;">0.55%</span></b></td>
            <td class="snapshot-td2-cp">P/B</td>
            <td class="snapshot-td2"><b>12.30</b></td>
          </tr>
          <tr>
            <td class="snapshot-td2-cp">EPS Q/Q</td>
            <td class="snapshot-td2"><b>-</b></td>
          </tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn finds_value_after_label() {
        let doc = Document::parse(SNAPSHOT);
        assert!(doc.has_snapshot());
        assert_eq!(doc.field("P/B").unwrap(), "12.30");
        assert_eq!(extract_field(&doc, "Dividend %").unwrap(), "0.55%");
        assert_eq!(doc.field("EPS Q/Q").unwrap(), "-");
    }

    #[test]
    fn label_must_match_whole_text() {
        let doc = Document::parse(SNAPSHOT);
        let err = doc.field("P/").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn label_without_value_cell() {
        let doc = Document::parse(
            r#"<table><tr><td class="snapshot-td2">1.0</td><td>ROE</td></tr></table>"#,
        );
        assert!(doc.has_snapshot());
        assert!(doc.field("ROE").unwrap_err().is_not_found());
    }

    #[test]
    fn unknown_symbol_page() {
        let doc = Document::parse("<html><body><h1>Ticker not found</h1></body></html>");
        assert!(!doc.has_snapshot());
        assert!(doc.field("P/B").is_err());
    }
}
