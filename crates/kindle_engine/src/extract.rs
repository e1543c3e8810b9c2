use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text forms one paragraph when they hold no nested block.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "pre", "dd",
    "dt", "td", "th", "figcaption",
];

/// Page chrome and non-text elements that never contribute article text.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "iframe", "svg", "canvas", "form", "button",
    "nav", "header", "footer", "aside", "select", "textarea",
];

/// Candidate content roots, most specific first.
const ROOT_SELECTORS: &[&str] = &["article", "main", "[role=main]", "body"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedContent {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub publish_date: Option<String>,
    pub top_image: Option<String>,
    pub paragraphs: Vec<String>,
}

pub trait Extractor: Send + Sync {
    /// `base_url` resolves relative references such as the lead image.
    fn extract(&self, html: &str, base_url: Option<&str>) -> ExtractedContent;
}

/// Lightweight "readability-like" extractor:
/// - title from `og:title`, then `<title>`, then the first `<h1>`
/// - authors and publish date from common meta tags
/// - text from `<article>`, else `<main>`, else `<body>`, one paragraph per
///   innermost block element
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadabilityLikeExtractor;

impl Extractor for ReadabilityLikeExtractor {
    fn extract(&self, html: &str, base_url: Option<&str>) -> ExtractedContent {
        let doc = Html::parse_document(html);
        let base = base_url.and_then(|raw| Url::parse(raw).ok());

        let title = meta_content(&doc, "meta[property='og:title']")
            .or_else(|| first_text(&doc, "title"))
            .or_else(|| first_text(&doc, "h1"));

        let top_image = meta_content(&doc, "meta[property='og:image']")
            .or_else(|| meta_content(&doc, "meta[name='twitter:image']"))
            .and_then(|raw| resolve(&raw, base.as_ref()));

        let publish_date = meta_content(&doc, "meta[property='article:published_time']")
            .or_else(|| meta_content(&doc, "meta[name='date']"))
            .or_else(|| first_attr(&doc, "time[datetime]", "datetime"));

        let mut paragraphs = Vec::new();
        if let Some(root) = content_root(&doc) {
            collect_blocks(root, &mut paragraphs);
        }

        ExtractedContent {
            title,
            authors: authors(&doc),
            publish_date,
            top_image,
            paragraphs,
        }
    }
}

fn content_root(doc: &Html) -> Option<ElementRef<'_>> {
    ROOT_SELECTORS.iter().find_map(|raw| {
        let selector = Selector::parse(raw).ok()?;
        doc.select(&selector).next()
    })
}

fn collect_blocks(element: ElementRef<'_>, out: &mut Vec<String>) {
    for child in element.children() {
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let tag = child.value().name();
        if SKIPPED_TAGS.contains(&tag) {
            continue;
        }
        if BLOCK_TAGS.contains(&tag) && !has_block_descendant(child) {
            let text = visible_text(child);
            if !text.is_empty() {
                out.push(text);
            }
        } else {
            collect_blocks(child, out);
        }
    }
}

fn has_block_descendant(element: ElementRef<'_>) -> bool {
    element.descendants().skip(1).any(|node| {
        node.value()
            .as_element()
            .is_some_and(|el| BLOCK_TAGS.contains(&el.name()))
    })
}

/// Text of an element with whitespace collapsed, skipping scripts and styles.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in element.descendants() {
        if let Some(text) = node.value().as_text() {
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| matches!(el.name(), "script" | "style" | "noscript"))
            });
            if !hidden {
                raw.push_str(text);
            }
        }
    }
    collapse_whitespace(&raw)
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn authors(doc: &Html) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let candidates = meta_contents(doc, "meta[name='author']")
        .into_iter()
        .chain(meta_contents(doc, "meta[property='article:author']"))
        .chain(texts(doc, "[rel='author']"));
    for candidate in candidates {
        // `article:author` often holds a profile URL rather than a name.
        if candidate.starts_with("http://") || candidate.starts_with("https://") {
            continue;
        }
        if !found.iter().any(|known| known.eq_ignore_ascii_case(&candidate)) {
            found.push(candidate);
        }
    }
    found
}

fn meta_content(doc: &Html, selector: &str) -> Option<String> {
    meta_contents(doc, selector).into_iter().next()
}

fn meta_contents(doc: &Html, selector: &str) -> Vec<String> {
    let Ok(sel) = Selector::parse(selector) else {
        return Vec::new();
    };
    doc.select(&sel)
        .filter_map(|el| el.value().attr("content"))
        .map(collapse_whitespace)
        .filter(|value| !value.is_empty())
        .collect()
}

fn first_text(doc: &Html, selector: &str) -> Option<String> {
    texts(doc, selector).into_iter().next()
}

fn texts(doc: &Html, selector: &str) -> Vec<String> {
    let Ok(sel) = Selector::parse(selector) else {
        return Vec::new();
    };
    doc.select(&sel)
        .map(visible_text)
        .filter(|text| !text.is_empty())
        .collect()
}

fn first_attr(doc: &Html, selector: &str, attr: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel)
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

fn resolve(reference: &str, base: Option<&Url>) -> Option<String> {
    if let Ok(url) = Url::parse(reference) {
        return Some(url.into());
    }
    base.and_then(|base| base.join(reference).ok())
        .map(Into::into)
}
