use scraper::{ElementRef, Html, Selector};
use tabmate_core::NO_TITLE_SENTINEL;
use url::Url;

pub const DEFAULT_SNIPPET_CHARS: usize = 1000;

/// What the classifier gets to see of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub title: String,
    pub snippet: String,
    pub favicon: Option<String>,
}

pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str, base_url: Option<&str>) -> PageSummary;
}

/// Title plus the text of every `<p>`, truncated to `snippet_chars` characters.
#[derive(Debug, Clone)]
pub struct ParagraphExtractor {
    snippet_chars: usize,
}

impl Default for ParagraphExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_SNIPPET_CHARS)
    }
}

impl ParagraphExtractor {
    pub fn new(snippet_chars: usize) -> Self {
        Self { snippet_chars }
    }
}

impl Extractor for ParagraphExtractor {
    fn extract(&self, html: &str, base_url: Option<&str>) -> PageSummary {
        let doc = Html::parse_document(html);
        let base_url = base_url.and_then(|b| Url::parse(b).ok());

        let title = select_first(&doc, "title")
            .map(|node| collapse_whitespace(&node.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_TITLE_SENTINEL.to_string());

        let paragraphs = Selector::parse("p")
            .map(|sel| {
                doc.select(&sel)
                    .map(|p| collapse_whitespace(&p.text().collect::<String>()))
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        PageSummary {
            title,
            snippet: truncate_chars(&paragraphs, self.snippet_chars),
            favicon: find_favicon(&doc, base_url.as_ref()),
        }
    }
}

fn select_first<'a>(doc: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel).next()
}

fn find_favicon(doc: &Html, base_url: Option<&Url>) -> Option<String> {
    let declared = Selector::parse("link[rel][href]").ok().and_then(|sel| {
        doc.select(&sel).find_map(|link| {
            let rel = link.value().attr("rel")?;
            let is_icon = rel
                .split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("icon"));
            if !is_icon {
                return None;
            }
            let href = link.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            match base_url {
                Some(base) => base.join(href).ok().map(String::from),
                None => Url::parse(href).ok().map(String::from),
            }
        })
    });

    declared.or_else(|| {
        let base = base_url?;
        if !matches!(base.scheme(), "http" | "https") {
            return None;
        }
        base.join("/favicon.ico").ok().map(String::from)
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::{collapse_whitespace, truncate_chars};

    #[test]
    fn truncation_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
    }
}
