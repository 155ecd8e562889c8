//! Line tokenizer.
//!
//! Every physical line of a GEDCOM document is tokenized on its own into
//! `<level> [@xref@] <TAG> [value]`. Continuation tags (`CONT`/`CONC`) are not
//! joined onto the previous line; they tokenize like any other tag.

/// Byte order mark some exporters put in front of the first line.
const BOM: char = '\u{feff}';

/// One tokenized GEDCOM line, borrowing from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GedcomLine<'a> {
    /// Nesting level (`0` starts a new top-level record).
    pub level: u32,
    /// Cross-reference identifier, without its `@` delimiters.
    pub xref: Option<&'a str>,
    /// The tag, e.g. `INDI`, `NAME`, `DATE`.
    pub tag: &'a str,
    /// Everything after the tag, trimmed. Empty when the line has no value.
    pub value: &'a str,
}

impl<'a> GedcomLine<'a> {
    /// Tokenizes a single raw line.
    ///
    /// Leading and trailing whitespace, a trailing `\r` and a leading BOM are
    /// ignored. Returns `None` for blank lines and for lines that do not match
    /// the grammar; use [`is_blank`] to tell the two apart.
    ///
    /// # Examples
    ///
    /// ```
    /// use lineage_gedcom::line::GedcomLine;
    ///
    /// let line = GedcomLine::parse("0 @I1@ INDI").unwrap();
    /// assert_eq!(line.level, 0);
    /// assert_eq!(line.xref, Some("I1"));
    /// assert_eq!(line.tag, "INDI");
    /// assert_eq!(line.value, "");
    ///
    /// let line = GedcomLine::parse("1 NAME John /Smith/\r").unwrap();
    /// assert_eq!(line.value, "John /Smith/");
    ///
    /// assert!(GedcomLine::parse("NAME John").is_none());
    /// ```
    #[must_use]
    pub fn parse(raw: &'a str) -> Option<Self> {
        let line = raw.trim_start_matches(BOM).trim();

        let (level, rest) = next_token(line)?;
        if !level.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let level: u32 = level.parse().ok()?;

        let (first, rest) = next_token(rest)?;
        let (xref, tag, rest) = match xref_identifier(first) {
            Some(id) => {
                let (tag, rest) = next_token(rest)?;
                (Some(id), tag, rest)
            }
            None => (None, first, rest),
        };

        if !is_word(tag) {
            return None;
        }

        Some(Self {
            level,
            xref,
            tag,
            value: rest.trim(),
        })
    }

    /// Returns `true` for level-0 lines, which delimit top-level records.
    #[must_use]
    pub fn is_record_start(&self) -> bool {
        self.level == 0
    }
}

/// Returns `true` if the line holds nothing but whitespace (or a lone BOM).
#[must_use]
pub fn is_blank(raw: &str) -> bool {
    raw.trim_start_matches(BOM).trim().is_empty()
}

/// Whether a raw line starts with level `0`, even if the rest of it is
/// malformed.
///
/// # Examples
///
/// ```
/// use lineage_gedcom::line::is_level_zero;
///
/// assert!(is_level_zero("0 @I-2@ INDI"));
/// assert!(!is_level_zero("1 NAME @bad"));
/// assert!(!is_level_zero("this line is not gedcom"));
/// ```
#[must_use]
pub fn is_level_zero(raw: &str) -> bool {
    raw.trim_start_matches(BOM)
        .split_whitespace()
        .next()
        .is_some_and(|level| {
            level.bytes().all(|b| b.is_ascii_digit()) && level.parse::<u32>() == Ok(0)
        })
}

/// Strips `@` delimiters from a pointer value such as `@I1@`.
///
/// # Examples
///
/// ```
/// assert_eq!(lineage_gedcom::line::strip_pointer("@F2@"), "F2");
/// assert_eq!(lineage_gedcom::line::strip_pointer("I3"), "I3");
/// ```
#[must_use]
pub fn strip_pointer(value: &str) -> &str {
    value.trim().trim_matches('@')
}

/// Splits off the next whitespace-delimited token.
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    Some(match s.find(char::is_whitespace) {
        Some(end) => s.split_at(end),
        None => (s, ""),
    })
}

/// Returns the identifier inside an `@xref@` token.
fn xref_identifier(token: &str) -> Option<&str> {
    let inner = token.strip_prefix('@')?.strip_suffix('@')?;
    is_word(inner).then_some(inner)
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_level_tag_and_value() {
        let line = GedcomLine::parse("2 DATE 12 JAN 1980").unwrap();
        assert_eq!(
            line,
            GedcomLine {
                level: 2,
                xref: None,
                tag: "DATE",
                value: "12 JAN 1980",
            }
        );
    }

    #[test]
    fn xref_is_returned_without_delimiters() {
        let line = GedcomLine::parse("0 @F1@ FAM").unwrap();
        assert_eq!(line.xref, Some("F1"));
        assert_eq!(line.tag, "FAM");
        assert!(line.is_record_start());
    }

    #[rstest]
    #[case("0 @I-2@ INDI", true)]
    #[case("  00 garbage", true)]
    #[case("\u{feff}0 @bad xref@ FAM", true)]
    #[case("1 @I-2@ INDI", false)]
    #[case("01x INDI", false)]
    #[case("NAME", false)]
    #[case("", false)]
    fn level_zero_is_detected_on_malformed_lines(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(is_level_zero(raw), expected);
    }

    #[test]
    fn pointer_values_are_left_in_the_value() {
        let line = GedcomLine::parse("1 HUSB @I1@").unwrap();
        assert_eq!(line.xref, None);
        assert_eq!(line.value, "@I1@");
    }

    #[test]
    fn value_keeps_inner_whitespace_but_is_trimmed() {
        let line = GedcomLine::parse("1 NAME   Mary  Ann /Jones/   ").unwrap();
        assert_eq!(line.value, "Mary  Ann /Jones/");
    }

    #[test]
    fn tolerates_crlf_and_leading_indent() {
        let line = GedcomLine::parse("   1 SEX F\r").unwrap();
        assert_eq!(line.level, 1);
        assert_eq!(line.value, "F");
    }

    #[test]
    fn tolerates_byte_order_mark() {
        let line = GedcomLine::parse("\u{feff}0 HEAD").unwrap();
        assert_eq!(line.tag, "HEAD");
    }

    #[test]
    fn underscore_extension_tags_are_words() {
        let line = GedcomLine::parse("1 _MILT served 1942").unwrap();
        assert_eq!(line.tag, "_MILT");
    }

    #[rstest]
    #[case::single_token("0")]
    #[case::missing_level("NAME John")]
    #[case::negative_level("-1 NAME John")]
    #[case::xref_without_tag("0 @I1@")]
    #[case::bad_xref("0 @I-1@ INDI")]
    #[case::punctuation_tag("1 NA.ME John")]
    #[case::level_overflow("99999999999 NAME John")]
    fn rejects_malformed_lines(#[case] raw: &str) {
        assert!(GedcomLine::parse(raw).is_none(), "{raw:?} should not parse");
        assert!(!is_blank(raw));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\r")]
    #[case("\u{feff}")]
    fn blank_lines_are_blank(#[case] raw: &str) {
        assert!(is_blank(raw));
        assert!(GedcomLine::parse(raw).is_none());
    }

    #[test]
    fn strip_pointer_trims_whitespace_and_delimiters() {
        assert_eq!(strip_pointer(" @I12@ "), "I12");
        assert_eq!(strip_pointer(""), "");
    }
}
