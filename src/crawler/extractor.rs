//! Field extraction from the parsed listing page
//!
//! Each field list is built by one flat selector scan in document order.
//! This is a deliberate choice over structural (parent/child) matching: the
//! target markup's DOM nesting is unreliable across page variants, while the
//! per-article emission order of the flat fragments is stable. The
//! correlator pairs the lists up positionally.

use scraper::{ElementRef, Html, Selector};

/// The six ordered fragment lists extracted from one listing page
///
/// Consumed once by the correlator. Apart from `topics`, lists keep their
/// raw document order including empty entries, so positions stay aligned.
#[derive(Debug, Default)]
pub struct FieldLists {
    /// Article titles; empty fragments are dropped
    pub topics: Vec<String>,

    /// Article type labels ("Original Research", "Review", ...)
    pub article_types: Vec<String>,

    /// Page ranges as printed
    pub page_ranges: Vec<String>,

    /// Author lines as printed
    pub authors: Vec<String>,

    /// Raw download hrefs; empty string when a container has no usable link
    pub downloads: Vec<String>,

    /// Cleaned abstract texts from hidden input payloads
    pub abstracts: Vec<String>,
}

impl FieldLists {
    /// One-line count summary for progress logging
    pub fn summary(&self) -> String {
        format!(
            "{} topics, {} article types, {} page ranges, {} author lines, {} downloads, {} abstracts",
            self.topics.len(),
            self.article_types.len(),
            self.page_ranges.len(),
            self.authors.len(),
            self.downloads.len(),
            self.abstracts.len()
        )
    }
}

struct Selectors {
    topic: Selector,
    article_type: Selector,
    pages: Selector,
    authors: Selector,
    download: Selector,
    anchor: Selector,
    hidden_input: Selector,
}

impl Selectors {
    fn new() -> Self {
        let parse = |css: &str| Selector::parse(css).expect("static selector is valid");
        Self {
            topic: parse("div.topic"),
            article_type: parse("div.article_type"),
            pages: parse("div.pages"),
            authors: parse("div.authors"),
            download: parse("div.download"),
            anchor: parse("a[href]"),
            hidden_input: parse(r#"input[type="hidden"]"#),
        }
    }
}

/// Extracts the six field lists from a parsed listing page
pub fn extract_fields(document: &Html) -> FieldLists {
    let selectors = Selectors::new();
    let mut fields = FieldLists::default();

    for div in document.select(&selectors.topic) {
        let text = element_text(div);
        // Decorative empty containers appear on some page variants
        if !text.is_empty() {
            fields.topics.push(text);
        }
    }

    for div in document.select(&selectors.article_type) {
        fields.article_types.push(element_text(div));
    }

    for div in document.select(&selectors.pages) {
        fields.page_ranges.push(element_text(div));
    }

    for div in document.select(&selectors.authors) {
        fields.authors.push(element_text(div));
    }

    for div in document.select(&selectors.download) {
        let href = div
            .select(&selectors.anchor)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .find(|href| is_fetchable_href(href))
            .unwrap_or("");
        fields.downloads.push(href.to_string());
    }

    for input in document.select(&selectors.hidden_input) {
        let id = input.value().attr("id").unwrap_or("");
        let value = input.value().attr("value").unwrap_or("");
        if !id.is_empty() && !value.is_empty() {
            fields.abstracts.push(clean_abstract(value));
        }
    }

    fields
}

/// Strips markup from a hidden-input abstract payload and collapses
/// whitespace runs to single spaces
///
/// The payload is HTML-escaped attribute text; parsing it as a fragment both
/// decodes entities and drops any embedded tags.
pub fn clean_abstract(value: &str) -> String {
    let fragment = Html::parse_fragment(value);
    let text: String = fragment.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// A href worth submitting for download: non-empty and not a special scheme
/// or same-page anchor
fn is_fetchable_href(href: &str) -> bool {
    !href.is_empty()
        && !href.starts_with('#')
        && !href.starts_with("javascript:")
        && !href.starts_with("mailto:")
        && !href.starts_with("tel:")
        && !href.starts_with("data:")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> FieldLists {
        let document = Html::parse_document(html);
        extract_fields(&document)
    }

    #[test]
    fn test_topics_in_document_order() {
        let fields = extract(
            r#"<div class="topic">First Article</div>
               <div class="topic">Second Article</div>
               <div class="topic">Third Article</div>"#,
        );
        assert_eq!(fields.topics, vec!["First Article", "Second Article", "Third Article"]);
    }

    #[test]
    fn test_empty_topics_dropped() {
        let fields = extract(
            r#"<div class="topic"></div>
               <div class="topic">Real Article</div>
               <div class="topic">   </div>"#,
        );
        assert_eq!(fields.topics, vec!["Real Article"]);
    }

    #[test]
    fn test_other_lists_keep_empties() {
        let fields = extract(
            r#"<div class="authors">A. Author</div>
               <div class="authors"></div>
               <div class="authors">B. Author</div>"#,
        );
        assert_eq!(fields.authors, vec!["A. Author", "", "B. Author"]);
    }

    #[test]
    fn test_extraction_ignores_nesting() {
        // Fragments are collected flat even when the wrapping structure varies
        let fields = extract(
            r#"<section><div class="topic">Wrapped</div></section>
               <div><div><div class="topic">Deeply Wrapped</div></div></div>"#,
        );
        assert_eq!(fields.topics, vec!["Wrapped", "Deeply Wrapped"]);
    }

    #[test]
    fn test_download_takes_first_href() {
        let fields = extract(
            r#"<div class="download">
                 <a href="files/a.pdf">Download</a>
                 <a href="files/other.pdf">Mirror</a>
               </div>"#,
        );
        assert_eq!(fields.downloads, vec!["files/a.pdf"]);
    }

    #[test]
    fn test_download_without_link_yields_empty_entry() {
        let fields = extract(
            r#"<div class="download"><span>Coming soon</span></div>
               <div class="download"><a href="files/b.pdf">Download</a></div>"#,
        );
        assert_eq!(fields.downloads, vec!["", "files/b.pdf"]);
    }

    #[test]
    fn test_download_skips_unfetchable_hrefs() {
        let fields = extract(
            r##"<div class="download">
                 <a href="javascript:void(0)">Preview</a>
                 <a href="#top">Top</a>
                 <a href="files/c.pdf">Download</a>
               </div>"##,
        );
        assert_eq!(fields.downloads, vec!["files/c.pdf"]);
    }

    #[test]
    fn test_abstract_requires_id_and_value() {
        let fields = extract(
            r#"<input type="hidden" id="abs1" value="Kept abstract">
               <input type="hidden" id="" value="No id">
               <input type="hidden" id="abs2" value="">
               <input type="hidden" id="abs3" value="Also kept">"#,
        );
        assert_eq!(fields.abstracts, vec!["Kept abstract", "Also kept"]);
    }

    #[test]
    fn test_abstract_is_stripped_and_collapsed() {
        let fields = extract(
            r#"<input type="hidden" id="abs1"
                 value="&lt;p&gt;Soil   acidity&lt;/p&gt;  affects&#10;  yield">"#,
        );
        assert_eq!(fields.abstracts, vec!["Soil acidity affects yield"]);
    }

    #[test]
    fn test_clean_abstract_decodes_entities() {
        assert_eq!(
            clean_abstract("Nitrogen &amp; phosphorus &lt;b&gt;uptake&lt;/b&gt;"),
            "Nitrogen & phosphorus uptake"
        );
    }

    #[test]
    fn test_full_page_counts() {
        let fields = extract(
            r#"<div class="topic">A</div><div class="article_type">Original Research</div>
               <div class="pages">1-10</div><div class="authors">X</div>
               <div class="download"><a href="a.pdf">D</a></div>
               <input type="hidden" id="abs1" value="Abs A">
               <div class="topic">B</div><div class="article_type">Review</div>
               <div class="pages">11-20</div><div class="authors">Y</div>
               <div class="download"><a href="b.pdf">D</a></div>
               <input type="hidden" id="abs2" value="Abs B">"#,
        );
        assert_eq!(fields.topics.len(), 2);
        assert_eq!(fields.article_types, vec!["Original Research", "Review"]);
        assert_eq!(fields.page_ranges, vec!["1-10", "11-20"]);
        assert_eq!(fields.authors, vec!["X", "Y"]);
        assert_eq!(fields.downloads, vec!["a.pdf", "b.pdf"]);
        assert_eq!(fields.abstracts, vec!["Abs A", "Abs B"]);
    }
}
