//! Highlight fragment selection and context extraction.
//!
//! Every matched occurrence anchors a candidate window of `fragment_chars` characters.
//! The window holding the most distinct matched terms wins (the earliest on ties), and the
//! occurrences fully inside it are wrapped in the configured delimiters. The text on either
//! side of the window supplies up to `context_chars` characters of context.

use std::{collections::HashMap, ops::Range};

use folio_config::HighlightSettings;

use crate::search::MatchSpan;

/// The highlighted excerpt for one hit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Window text with matches wrapped in delimiters.
    pub text: String,
    /// Trimmed text preceding the window.
    pub context_before: String,
    /// Trimmed text following the window.
    pub context_after: String,
}

/// Selects the best fragment of `raw` for the given spans.
///
/// Spans that fall outside `raw`, off character boundaries, or overlap an earlier span are
/// ignored. Without spans the leading window is returned unmarked with its trailing
/// context; when spans were given but none is usable the leading window is returned with
/// empty contexts.
pub fn highlight(raw: &str, spans: &[MatchSpan], settings: &HighlightSettings) -> Fragment {
    let window_chars = settings.fragment_chars.max(1);

    if spans.is_empty() {
        let window = 0..byte_after_chars(raw, 0, window_chars);
        return Fragment {
            text: raw[window.clone()].to_string(),
            context_before: String::new(),
            context_after: context_after(raw, window.end, settings),
        };
    }

    let usable = usable_spans(raw, spans);
    if usable.is_empty() {
        return Fragment {
            text: raw[..byte_after_chars(raw, 0, window_chars)].to_string(),
            ..Fragment::default()
        };
    }

    let (window, inside) = best_window(raw, &usable, window_chars);

    Fragment {
        text: mark(raw, &window, &inside, settings),
        context_before: context_before(raw, window.start, settings),
        context_after: context_after(raw, window.end, settings),
    }
}

/// Filters spans to valid, non-overlapping ones sorted by position.
fn usable_spans<'a>(raw: &str, spans: &'a [MatchSpan]) -> Vec<&'a MatchSpan> {
    let mut valid: Vec<&MatchSpan> = spans
        .iter()
        .filter(|s| {
            let Range { start, end } = s.range;
            start < end
                && end <= raw.len()
                && raw.is_char_boundary(start)
                && raw.is_char_boundary(end)
        })
        .collect();
    valid.sort_by_key(|s| (s.range.start, s.range.end));

    let mut out: Vec<&MatchSpan> = Vec::with_capacity(valid.len());
    for span in valid {
        if out.last().is_none_or(|prev| span.range.start >= prev.range.end) {
            out.push(span);
        }
    }
    out
}

/// Finds the window with the most distinct terms; returns it with the spans it contains.
///
/// `spans` must be sorted and non-overlapping, so both the window ends and the index of
/// the first span past each window only move forward. A single sweep keeps per-term
/// counts for the spans between the anchor and that index.
fn best_window<'a>(
    raw: &str,
    spans: &[&'a MatchSpan],
    window_chars: usize,
) -> (Range<usize>, Vec<&'a MatchSpan>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut best: Option<(usize, Range<usize>, Range<usize>)> = None;
    let mut next = 0;

    for (first, anchor) in spans.iter().enumerate() {
        let start = anchor.range.start;
        let end = byte_after_chars(raw, start, window_chars).max(anchor.range.end);

        while let Some(span) = spans.get(next).filter(|s| s.range.end <= end) {
            *counts.entry(span.term.as_str()).or_default() += 1;
            next += 1;
        }

        let distinct = counts.len();
        if best.as_ref().is_none_or(|(count, _, _)| distinct > *count) {
            best = Some((distinct, start..end, first..next));
        }

        if let Some(count) = counts.get_mut(anchor.term.as_str()) {
            *count -= 1;
            if *count == 0 {
                counts.remove(anchor.term.as_str());
            }
        }
    }

    match best {
        Some((_, window, inside)) => (window, spans[inside].to_vec()),
        None => (0..0, Vec::new()),
    }
}

/// Renders the window, wrapping each contained span in delimiters.
fn mark(
    raw: &str,
    window: &Range<usize>,
    inside: &[&MatchSpan],
    settings: &HighlightSettings,
) -> String {
    let mut out = String::with_capacity(
        window.len() + inside.len() * (settings.pre_tag.len() + settings.post_tag.len()),
    );
    let mut cursor = window.start;

    for span in inside {
        out.push_str(&raw[cursor..span.range.start]);
        out.push_str(&settings.pre_tag);
        out.push_str(&raw[span.range.clone()]);
        out.push_str(&settings.post_tag);
        cursor = span.range.end;
    }
    out.push_str(&raw[cursor..window.end]);

    out
}

/// Up to `context_chars` characters before `start`, ellipsis-prefixed when truncated.
fn context_before(raw: &str, start: usize, settings: &HighlightSettings) -> String {
    let preceding = &raw[..start];
    let total = preceding.chars().count();
    let skip = total.saturating_sub(settings.context_chars);
    let from = byte_after_chars(preceding, 0, skip);
    let text = preceding[from..].trim();

    if skip > 0 && !text.is_empty() {
        format!("{}{text}", settings.ellipsis)
    } else {
        text.to_string()
    }
}

/// Up to `context_chars` characters after `end`, ellipsis-suffixed when truncated.
fn context_after(raw: &str, end: usize, settings: &HighlightSettings) -> String {
    let following = &raw[end..];
    let to = byte_after_chars(following, 0, settings.context_chars);
    let text = following[..to].trim();

    if to < following.len() && !text.is_empty() {
        format!("{text}{}", settings.ellipsis)
    } else {
        text.to_string()
    }
}

/// Byte offset reached by advancing `count` characters from byte `start`, clamped to the end.
fn byte_after_chars(text: &str, start: usize, count: usize) -> usize {
    text[start..]
        .char_indices()
        .nth(count)
        .map_or(text.len(), |(offset, _)| start + offset)
}
