//! Builds the ordered line list of a statement from the extractor's two views of
//! each page: the native text and the positioned words.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::models::{Anchor, Line, Page, SourceDocument, Word};

pub const DEFAULT_BAND_TOLERANCE: f64 = 2.0;

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// View (a): the page text split into lines, whitespace collapsed.
pub fn lines_from_text(text: &str) -> Vec<String> {
    text.lines().map(collapse_whitespace).collect()
}

fn band(word: &Word, tolerance: f64) -> i64 {
    (word.top / tolerance).round_ties_even() as i64
}

/// View (b): words grouped into horizontal bands, left to right within a band.
///
/// Each line comes with the anchor of every word it was built from.
pub fn lines_from_words(words: &[Word], tolerance: f64) -> Vec<(String, Vec<Anchor>)> {
    let tolerance = if tolerance > 0.0 {
        tolerance
    } else {
        DEFAULT_BAND_TOLERANCE
    };
    let mut sorted: Vec<(&Word, String)> = words
        .iter()
        .map(|w| (w, collapse_whitespace(&w.text)))
        .filter(|(_, text)| !text.is_empty())
        .collect();
    sorted.sort_by(|(a, _), (b, _)| {
        band(a, tolerance)
            .cmp(&band(b, tolerance))
            .then(a.x0.total_cmp(&b.x0))
    });

    let mut lines = Vec::new();
    let mut text = String::new();
    let mut anchors = Vec::new();
    let mut current: Option<i64> = None;
    for (word, word_text) in sorted {
        let b = band(word, tolerance);
        if current.is_some_and(|c| c != b) {
            lines.push((std::mem::take(&mut text), std::mem::take(&mut anchors)));
        }
        current = Some(b);
        if !text.is_empty() {
            text.push(' ');
        }
        anchors.push(Anchor {
            offset: text.len(),
            x: word.anchor(),
        });
        text.push_str(&word_text);
    }
    if !text.is_empty() {
        lines.push((text, anchors));
    }
    lines
}

/// Text-view lines first, then word-view lines the text view did not produce.
pub fn merge_page(
    page: usize,
    text_lines: Vec<String>,
    word_lines: Vec<(String, Vec<Anchor>)>,
) -> Vec<Line> {
    let mut anchors_by_text: HashMap<&str, &[Anchor]> = HashMap::new();
    for (text, anchors) in &word_lines {
        anchors_by_text.entry(text.as_str()).or_insert(anchors.as_slice());
    }
    let seen: HashSet<&str> = text_lines.iter().map(String::as_str).collect();

    let mut out: Vec<Line> = text_lines
        .iter()
        .map(|text| Line {
            page,
            text: text.clone(),
            anchors: anchors_by_text.get(text.as_str()).map(|a| a.to_vec()).unwrap_or_default(),
        })
        .collect();
    out.extend(
        word_lines
            .iter()
            .filter(|(text, _)| !seen.contains(text.as_str()))
            .map(|(text, anchors)| Line {
                page,
                text: text.clone(),
                anchors: anchors.clone(),
            }),
    );
    out.retain(|l| !l.text.is_empty());
    out
}

pub fn page_lines(number: usize, page: &Page, tolerance: f64) -> Vec<Line> {
    merge_page(
        number,
        lines_from_text(&page.text),
        lines_from_words(&page.words, tolerance),
    )
}

/// All lines of the document, page by page. Pages are numbered from 1.
pub fn extract_all_lines(doc: &SourceDocument, tolerance: f64) -> Vec<Line> {
    let lines: Vec<Line> = doc
        .pages
        .iter()
        .enumerate()
        .flat_map(|(i, page)| page_lines(i + 1, page, tolerance))
        .collect();
    debug!("{} lines from {} pages", lines.len(), doc.pages.len());
    lines
}
