//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! results pages and walking them with CSS selectors.
//!
//! # Example
//!
//! ```rust
//! use peloton_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><title>Stage 1 results</title></head>
//!         <body>
//!             <div class="result-cont"><table class="results"></table></div>
//!             <div class="result-cont"><table class="results"></table></div>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! assert_eq!(doc.title().as_deref(), Some("Stage 1 results"));
//! assert!(doc.select_nth("div.result-cont", 1).unwrap().is_some());
//! assert!(doc.select_nth("div.result-cont", 5).unwrap().is_none());
//! ```

use scraper::{ElementRef, Html, Node, Selector};

use crate::{PelotonError, Result};

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| PelotonError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// Represents a parsed HTML document.
///
/// A Document wraps an HTML page and provides methods for querying elements
/// using CSS selectors.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// The html5ever parser recovers from malformed markup, so this only
    /// fails on conditions the parser itself cannot represent.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html })
    }

    /// Selects elements using a CSS selector, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`PelotonError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use peloton_core::parse::Document;
    ///
    /// let html = r#"<ul><li class="rider">A</li><li class="rider">B</li></ul>"#;
    /// let doc = Document::parse(html).unwrap();
    /// let riders = doc.select("li.rider").unwrap();
    /// assert_eq!(riders.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the `n`-th (zero-based) element matching a selector.
    ///
    /// Matches are produced lazily and an out-of-range index yields `None`.
    pub fn select_nth(&'_ self, selector: &str, n: usize) -> Result<Option<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).nth(n).map(|el| Element { element: el }))
    }

    /// Gets the trimmed text of the `<title>` element if present.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
    }
}

/// A wrapper around scraper's ElementRef.
///
/// Element represents a single node in the HTML document tree and provides
/// methods for accessing its attributes, classes, text content and
/// descendants.
///
/// # Example
///
/// ```rust
/// use peloton_core::parse::Document;
///
/// let html = r#"<a class="team" href="team/uae-team-emirates-2024">UAE Team Emirates</a>"#;
/// let doc = Document::parse(html).unwrap();
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "UAE Team Emirates");
/// assert_eq!(link.attr("href"), Some("team/uae-team-emirates-2024"));
/// assert!(link.has_class("team"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the text content of this element.
    ///
    /// Returns the concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the text content while skipping subtrees that match `selector`.
    ///
    /// Used for cells that carry a hidden duplicate of their value.
    pub fn text_excluding(&self, selector: &str) -> Result<String> {
        let sel = compile(selector)?;
        let mut out = String::new();
        collect_text(self.element, &sel, &mut out);
        Ok(out)
    }

    /// Gets the value of an attribute.
    ///
    /// Returns `None` if the attribute is not present.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Tests whether this element itself (not an ancestor) carries a class.
    pub fn has_class(&self, name: &str) -> bool {
        self.element.value().classes().any(|class| class == name)
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`PelotonError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first descendant matching a selector.
    pub fn select_first(&self, selector: &str) -> Result<Option<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).next().map(|el| Element { element: el }))
    }
}

fn collect_text(element: ElementRef<'_>, skip: &Selector, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child)
                    && !skip.matches(&child)
                {
                    collect_text(child, skip, out);
                }
            }
            _ => {}
        }
    }
}
