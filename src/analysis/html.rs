//! HTML page analyzer
//!
//! Parses a fetched document with `scraper` and extracts:
//! - Title, description, keywords and headings
//! - Canonical link, language, robots directives and Open Graph tags
//! - Image alt coverage, word count and a readability estimate
//! - Link, resource and accessibility counts
//! - Raw `<a href>` values for the crawler to follow

use crate::analysis::metrics::{
    AccessibilityInfo, ContentAnalysis, ImageAltInfo, PageMetrics, PageType, PerformanceInfo,
};
use crate::analysis::{AnalyzeOptions, PageAnalyzer};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Default [`PageAnalyzer`] backed by `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlAnalyzer;

impl HtmlAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl PageAnalyzer for HtmlAnalyzer {
    fn analyze_page(&self, html: &str, url: &Url, options: AnalyzeOptions) -> PageMetrics {
        let document = Html::parse_document(html);
        let page_type = PageType::from_url(url);

        let body_text = body_text(&document);
        let words: Vec<&str> = body_text.split_whitespace().collect();
        let image_alt = image_alt_info(&document);
        let (internal_links, external_links) = count_links(&document, url);

        let title = extract_title(&document).unwrap_or_else(|| title_from_url(url));
        let description = first_attr(&document, r#"meta[name="description"]"#, "content")
            .or_else(|| first_attr(&document, r#"meta[property="og:description"]"#, "content"));
        let keywords: Vec<String> = first_attr(&document, r#"meta[name="keywords"]"#, "content")
            .map(|content| {
                content
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        PageMetrics {
            summary: description
                .clone()
                .unwrap_or_else(|| format!("Page {}", title)),
            tags: if keywords.is_empty() {
                tags_from_url(url)
            } else {
                keywords.clone()
            },
            title,
            description,
            keywords,
            h1: first_text(&document, "h1"),
            lang: document
                .root_element()
                .value()
                .attr("lang")
                .map(str::trim)
                .filter(|lang| !lang.is_empty())
                .map(str::to_string),
            canonical: first_attr(&document, r#"link[rel="canonical"]"#, "href"),
            image_alt,
            load_time_ms: options.elapsed_ms,
            is_noindex: first_attr(&document, r#"meta[name="robots"]"#, "content")
                .map(|content| content.to_lowercase().contains("noindex"))
                .unwrap_or(false),
            og_title: first_attr(&document, r#"meta[property="og:title"]"#, "content"),
            og_image: first_attr(&document, r#"meta[property="og:image"]"#, "content"),
            has_structured_data: count(&document, r#"script[type="application/ld+json"]"#) > 0,
            word_count: words.len(),
            page_type,
            content: ContentAnalysis {
                internal_links,
                external_links,
                readability_score: readability_score(&body_text, &words),
            },
            performance: PerformanceInfo {
                page_size_kb: round_one_decimal(html.len() as f64 / 1024.0),
                scripts: count(&document, "script"),
                stylesheets: count(&document, r#"link[rel="stylesheet"]"#),
                images: image_alt.total,
            },
            accessibility: accessibility_info(&document),
        }
    }

    fn extract_links(&self, html: &str, _base_url: &Url) -> Vec<String> {
        let document = Html::parse_document(html);
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect()
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    first_text(document, "title")
}

/// Derives a readable title from the URL's file name
///
/// `/getting-started.html` becomes `Getting Started`; the root becomes `Index`.
fn title_from_url(url: &Url) -> String {
    let file_name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .unwrap_or("index.html");

    let stem = strip_suffix_ignore_case(file_name, ".html")
        .or_else(|| strip_suffix_ignore_case(file_name, ".htm"))
        .unwrap_or(file_name);

    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercased words of at least three characters from the URL path
///
/// Extensions are dropped and segments split on `-`, `_` and whitespace.
fn tags_from_url(url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    url.path_segments()
        .into_iter()
        .flatten()
        .filter(|segment| !segment.is_empty())
        .flat_map(|segment| {
            let stem = match segment.rsplit_once('.') {
                Some((stem, _)) if !stem.is_empty() => stem,
                _ => segment,
            };
            stem.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        })
        .filter(|word| word.chars().count() > 2)
        .map(str::to_lowercase)
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    if !s.is_char_boundary(split) {
        return None;
    }
    let (stem, tail) = s.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(stem)
}

fn select_all<'a>(document: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn count(document: &Html, selector: &str) -> usize {
    select_all(document, selector).len()
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    select_all(document, selector)
        .first()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn first_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    select_all(document, selector)
        .first()
        .and_then(|element| element.value().attr(attr))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn body_text(document: &Html) -> String {
    select_all(document, "body")
        .first()
        .map(|body| body.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

fn image_alt_info(document: &Html) -> ImageAltInfo {
    let images = select_all(document, "img");
    let missing = images
        .iter()
        .filter(|img| img.value().attr("alt").map_or(true, |alt| alt.trim().is_empty()))
        .count();

    ImageAltInfo {
        total: images.len(),
        missing,
    }
}

/// Counts internal and external anchors relative to the page host
fn count_links(document: &Html, page_url: &Url) -> (usize, usize) {
    let mut internal = 0;
    let mut external = 0;

    for element in select_all(document, "a[href]") {
        let Some(href) = element.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty() || href.starts_with('#') || href.starts_with("mailto:") || href.starts_with("tel:") {
            continue;
        }

        match page_url.join(href) {
            Ok(link) if link.host_str() == page_url.host_str() => internal += 1,
            Ok(link) if link.scheme().starts_with("http") => external += 1,
            Ok(_) => {}
            Err(_) => {
                let lowered = href.to_lowercase();
                if !(lowered.starts_with("//") || lowered.starts_with("http://") || lowered.starts_with("https://")) {
                    internal += 1;
                }
            }
        }
    }

    (internal, external)
}

fn accessibility_info(document: &Html) -> AccessibilityInfo {
    let labelled: HashSet<&str> = select_all(document, "label[for]")
        .iter()
        .filter_map(|label| label.value().attr("for"))
        .collect();

    let unlabeled_fields = select_all(document, r#"input:not([type="hidden"]), textarea, select"#)
        .iter()
        .filter(|field| match field.value().attr("id") {
            Some(id) if !id.is_empty() => !labelled.contains(id),
            _ => true,
        })
        .count();

    AccessibilityInfo {
        form_fields: count(document, "input, textarea, select"),
        unlabeled_fields,
        has_header: count(document, "header") > 0,
        has_nav: count(document, "nav") > 0,
        has_main: count(document, "main") > 0,
    }
}

/// Flesch reading-ease approximation, clamped at zero
fn readability_score(text: &str, words: &[&str]) -> Option<f64> {
    let sentences = count_sentences(text);
    if sentences == 0 || words.is_empty() {
        return None;
    }

    let syllables: usize = words.iter().map(|word| approximate_syllables(word)).sum();
    let words_per_sentence = words.len() as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;
    let score = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;

    Some(round_one_decimal(score.max(0.0)))
}

/// Counts runs of text terminated by `.`, `!` or `?`
fn count_sentences(text: &str) -> usize {
    let mut sentences = 0;
    let mut has_content = false;

    for c in text.chars() {
        if matches!(c, '.' | '!' | '?') {
            if has_content {
                sentences += 1;
                has_content = false;
            }
        } else if !c.is_whitespace() {
            has_content = true;
        }
    }

    sentences
}

/// Counts vowel groups, two vowels per syllable at most
fn approximate_syllables(word: &str) -> usize {
    let mut syllables = 0;
    let mut run: usize = 0;

    for c in word.chars().map(|c| c.to_ascii_lowercase()) {
        if matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y') {
            run += 1;
        } else if run > 0 {
            syllables += run.div_ceil(2);
            run = 0;
        }
    }

    syllables + run.div_ceil(2)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
