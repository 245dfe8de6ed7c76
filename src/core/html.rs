// src/core/html.rs
// Low-level markup scanning helpers.
// Deliberately naive: they assume the source never nests same-named tags and
// never self-closes them. Matching is literal (case-sensitive).

use crate::error::{Error, Result};

/// One element's text, opening tag through closing tag inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagRegion<'a> {
    /// Byte offset of `<tag` in the scanned text.
    pub start: usize,
    /// Byte offset just past `</tag>`.
    pub end: usize,
    pub text: &'a str,
}

impl<'a> TagRegion<'a> {
    /// Value of `name="..."` anywhere in the region.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        read_attr(self.text, name)
    }
}

/// Lazy scan over `<tag ...>...</tag>` regions in document order.
/// See [`scan_tags`].
pub struct Tags<'a> {
    text: &'a str,
    open: String,
    close: String,
    pos: usize,
    done: bool,
}

/// Optimistic tag matching: next literal `<tag`, then the next literal
/// `</tag>` after it. An opener with no closer yields one
/// `MalformedMarkup` error and ends the scan.
///
/// Example:
/// ```
/// use price_watch::core::html::scan_tags;
/// let doc = r#"<optgroup label="A"><option>x</option></optgroup>"#;
/// let groups: Vec<_> = scan_tags(doc, "optgroup").collect::<Result<_, _>>().unwrap();
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].attr("label"), Some("A"));
/// ```
pub fn scan_tags<'a>(text: &'a str, tag: &str) -> Tags<'a> {
    Tags {
        text,
        open: format!("<{tag}"),
        close: format!("</{tag}>"),
        pos: 0,
        done: false,
    }
}

impl<'a> Iterator for Tags<'a> {
    type Item = Result<TagRegion<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done { return None; }

        let start = match self.text[self.pos..].find(&self.open) {
            Some(rel) => self.pos + rel,
            None => { self.done = true; return None; }
        };
        let Some(close_rel) = self.text[start..].find(&self.close) else {
            self.done = true;
            let tag = s!(&self.open[1..]);
            return Some(Err(Error::MalformedMarkup { tag, offset: start }));
        };
        let end = start + close_rel + self.close.len();

        // `end` is always past `start`, so the cursor strictly advances
        self.pos = end;
        Some(Ok(TagRegion { start, end, text: &self.text[start..end] }))
    }
}

impl std::iter::FusedIterator for Tags<'_> {}

/// Find the value of `attr` in `s`, assuming the form `attr="value"`.
/// Absent attribute (or an unterminated value) is `None`, not an error.
/// No entity decoding.
pub fn read_attr<'a>(s: &'a str, attr: &str) -> Option<&'a str> {
    let needle = format!("{attr}=\"");
    let begin = s.find(&needle)? + needle.len();
    let len = s[begin..].find('"')?;
    Some(&s[begin..begin + len])
}

/// Text after the end of the opening tag (after the first `>`).
pub fn after_open_tag(block: &str) -> Option<&str> {
    block.find('>').map(|i| &block[i + 1..])
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = concat!(
        r#"<select><optgroup label="NVIDIA RTX">"#,
        r#"<option value="1">A</option><option value="2">B</option>"#,
        r#"</optgroup><optgroup label="Cases"><option>C</option></optgroup></select>"#,
    );

    #[test]
    fn scans_groups_in_document_order() {
        let groups: Vec<_> = scan_tags(DOC, "optgroup").map(|r| r.unwrap()).collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].attr("label"), Some("NVIDIA RTX"));
        assert_eq!(groups[1].attr("label"), Some("Cases"));
        assert!(groups[0].end <= groups[1].start);
        assert!(groups[0].text.starts_with("<optgroup"));
        assert!(groups[0].text.ends_with("</optgroup>"));
        assert_eq!(&DOC[groups[1].start..groups[1].end], groups[1].text);
    }

    #[test]
    fn scans_items_within_a_region() {
        let group = scan_tags(DOC, "optgroup").next().unwrap().unwrap();
        let items: Vec<_> = scan_tags(group.text, "option").map(|r| r.unwrap().text).collect();
        assert_eq!(items, vec![r#"<option value="1">A</option>"#, r#"<option value="2">B</option>"#]);
    }

    #[test]
    fn optgroup_scan_does_not_match_option() {
        let n = scan_tags("<option>x</option>", "optgroup").count();
        assert_eq!(n, 0);
    }

    #[test]
    fn missing_closer_is_an_error_and_fuses() {
        let mut it = scan_tags("<option>A</option><option>B", "option");
        assert!(it.next().unwrap().is_ok());
        match it.next() {
            Some(Err(Error::MalformedMarkup { tag, offset })) => {
                assert_eq!(tag, "option");
                assert_eq!(offset, 18);
            }
            other => panic!("expected MalformedMarkup, got {other:?}"),
        }
        assert!(it.next().is_none());
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(scan_tags("", "option").count(), 0);
        assert_eq!(scan_tags("no tags here", "option").count(), 0);
    }

    #[test]
    fn read_attr_variants() {
        let tag = r#"<optgroup label="AMD RX 7000" class="g">"#;
        assert_eq!(read_attr(tag, "label"), Some("AMD RX 7000"));
        assert_eq!(read_attr(tag, "class"), Some("g"));
        assert_eq!(read_attr(tag, "title"), None);
        assert_eq!(read_attr(r#"<x label="open"#, "label"), None);
        assert_eq!(read_attr(r#"<x label="">"#, "label"), Some(""));
        // literal, no decoding
        assert_eq!(read_attr(r#"<x label="a &amp; b">"#, "label"), Some("a &amp; b"));
    }

    #[test]
    fn after_open_tag_skips_first_gt() {
        assert_eq!(after_open_tag("<option a=1>Text</option>"), Some("Text</option>"));
        assert_eq!(after_open_tag("no tag"), None);
    }
}
