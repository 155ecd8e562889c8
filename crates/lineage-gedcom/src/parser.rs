//! Single-pass GEDCOM scanner.
//!
//! The scanner walks the document line by line and keeps three pieces of
//! state: which kind of record is being built, the record itself, and (for
//! individuals) the `BIRT`/`DEAT` event whose `DATE` lines it is expecting.
//! Records are only flushed to the output when the next level-0 line starts or
//! the input ends, so every record is emitted exactly once.

use std::collections::HashSet;
use std::mem;

use crate::date::normalize_date;
use crate::error::{Error, Result};
use crate::line::{self, GedcomLine};
use crate::record::{Family, Individual, Sex};
use crate::warning::Warning;

/// Parsed GEDCOM document.
///
/// Construction parses the whole input eagerly; afterwards the parser only
/// offers read access to its results.
///
/// # Examples
///
/// ```
/// use lineage_gedcom::GedcomParser;
///
/// let text = "\
/// 0 @F1@ FAM
/// 1 HUSB @I1@
/// 1 WIFE @I2@
/// 1 CHIL @I3@
/// 1 CHIL @I4@
/// ";
/// let parser = GedcomParser::new(text);
/// let family = &parser.families()[0];
/// assert_eq!(family.husband_id.as_deref(), Some("I1"));
/// assert_eq!(family.children, vec!["I3", "I4"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GedcomParser {
    individuals: Vec<Individual>,
    families: Vec<Family>,
    warnings: Vec<Warning>,
}

impl GedcomParser {
    /// Parses a document, skipping anything that cannot be understood.
    ///
    /// Lines that do not match the line grammar, unknown tags and unknown
    /// top-level records are ignored; the ones worth reporting end up in
    /// [`warnings`](Self::warnings).
    ///
    /// A malformed line at level 0, such as `0 @I-2@ INDI`, still closes the
    /// record before it. The lines under it are dropped rather than applied
    /// to that earlier record.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut scanner = Scanner::default();
        for (line_number, raw) in numbered_lines(text) {
            match GedcomLine::parse(raw) {
                Some(line) => scanner.accept(line_number, &line),
                None => scanner.skip(line_number, raw),
            }
        }
        scanner.finish()
    }

    /// Parses a document, failing on the first malformed line.
    ///
    /// Everything else (unknown tags, unknown records, unparsable dates) is
    /// handled exactly as in [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedLine`] for the first non-blank line that does
    /// not match `<level> [@xref@] <TAG> [value]`.
    pub fn strict(text: &str) -> Result<Self> {
        let mut scanner = Scanner::default();
        for (line_number, raw) in numbered_lines(text) {
            let line = GedcomLine::parse(raw).ok_or_else(|| Error::MalformedLine {
                line_number,
                line: raw.trim().to_string(),
            })?;
            scanner.accept(line_number, &line);
        }
        Ok(scanner.finish())
    }

    /// All `INDI` records, in source order.
    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// All `FAM` records, in source order.
    #[must_use]
    pub fn families(&self) -> &[Family] {
        &self.families
    }

    /// Diagnostics for everything that was skipped or could not be normalized.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Consumes the parser, returning individuals, families and warnings.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Individual>, Vec<Family>, Vec<Warning>) {
        (self.individuals, self.families, self.warnings)
    }
}

/// Non-blank lines with their 1-based line numbers.
fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(index, raw)| (index + 1, raw))
        .filter(|(_, raw)| !line::is_blank(raw))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Birth,
    Death,
}

/// The event whose nested `DATE` line is expected next.
#[derive(Debug, Clone, Copy)]
struct EventScope {
    event: Event,
    level: u32,
}

#[derive(Debug)]
struct IndividualBuilder {
    record: Individual,
    event: Option<EventScope>,
    named: bool,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Individual(IndividualBuilder),
    Family(Family),
}

#[derive(Debug, Default)]
struct Scanner {
    state: State,
    individuals: Vec<Individual>,
    families: Vec<Family>,
    warnings: Vec<Warning>,
    individual_ids: HashSet<String>,
    family_ids: HashSet<String>,
}

impl Scanner {
    fn accept(&mut self, line_number: usize, line: &GedcomLine<'_>) {
        if line.is_record_start() {
            self.flush();
            self.state = self.start_record(line_number, line);
            return;
        }

        match &mut self.state {
            State::Idle => {}
            State::Individual(builder) => builder.apply(line_number, line, &mut self.warnings),
            State::Family(family) => apply_family_line(family, line),
        }
    }

    fn skip(&mut self, line_number: usize, raw: &str) {
        tracing::debug!(line = line_number, "Skipping malformed GEDCOM line");
        self.warnings.push(Warning::MalformedLine {
            line_number,
            content: raw.trim().to_string(),
        });
        if line::is_level_zero(raw) {
            self.flush();
        }
    }

    fn start_record(&mut self, line_number: usize, line: &GedcomLine<'_>) -> State {
        let seen = match line.tag {
            "INDI" => &mut self.individual_ids,
            "FAM" => &mut self.family_ids,
            tag => {
                tracing::trace!(line = line_number, tag, "Ignoring top-level record");
                return State::Idle;
            }
        };

        let id = line.xref.unwrap_or_default();
        if line.xref.is_none() {
            self.warnings.push(Warning::MissingXref {
                line_number,
                tag: line.tag.to_string(),
            });
        } else if !seen.insert(id.to_string()) {
            self.warnings.push(Warning::DuplicateId {
                line_number,
                id: id.to_string(),
            });
        }

        if line.tag == "INDI" {
            State::Individual(IndividualBuilder {
                record: Individual::new(id),
                event: None,
                named: false,
            })
        } else {
            State::Family(Family::new(id))
        }
    }

    fn flush(&mut self) {
        match mem::take(&mut self.state) {
            State::Idle => {}
            State::Individual(builder) => self.individuals.push(builder.record),
            State::Family(family) => self.families.push(family),
        }
    }

    fn finish(mut self) -> GedcomParser {
        self.flush();
        tracing::debug!(
            individuals = self.individuals.len(),
            families = self.families.len(),
            warnings = self.warnings.len(),
            "Parsed GEDCOM document"
        );
        GedcomParser {
            individuals: self.individuals,
            families: self.families,
            warnings: self.warnings,
        }
    }
}

impl IndividualBuilder {
    fn apply(&mut self, line_number: usize, line: &GedcomLine<'_>, warnings: &mut Vec<Warning>) {
        // A sibling or shallower line closes the event's sub-structure.
        if self.event.is_some_and(|scope| line.level <= scope.level) {
            self.event = None;
        }

        match line.tag {
            "NAME" if !self.named => {
                self.record.set_name(line.value);
                self.named = true;
            }
            "SEX" => {
                self.record.sex = Sex::from_gedcom(line.value).unwrap_or_else(|| {
                    if !line.value.is_empty() {
                        warnings.push(Warning::UnrecognizedSex {
                            line_number,
                            value: line.value.to_string(),
                        });
                    }
                    Sex::Unknown
                });
            }
            "BIRT" => self.open_event(Event::Birth, line.level),
            "DEAT" => self.open_event(Event::Death, line.level),
            "DATE" => self.apply_date(line_number, line, warnings),
            _ => {}
        }
    }

    fn open_event(&mut self, event: Event, level: u32) {
        self.event = Some(EventScope { event, level });
    }

    fn apply_date(&mut self, line_number: usize, line: &GedcomLine<'_>, warnings: &mut Vec<Warning>) {
        let Some(scope) = self.event else {
            return;
        };
        if line.level != scope.level.saturating_add(1) {
            return;
        }

        let slot = match scope.event {
            Event::Birth => &mut self.record.birth_date,
            Event::Death => &mut self.record.death_date,
        };
        if slot.is_some() {
            tracing::trace!(line = line_number, id = %self.record.id, "Ignoring repeated event date");
            return;
        }

        match normalize_date(line.value) {
            Some(date) => *slot = Some(date),
            None => {
                tracing::warn!(
                    line = line_number,
                    id = %self.record.id,
                    value = line.value,
                    "Failed to parse date"
                );
                warnings.push(Warning::UnparsableDate {
                    line_number,
                    value: line.value.to_string(),
                });
            }
        }
    }
}

fn apply_family_line(family: &mut Family, line: &GedcomLine<'_>) {
    let pointer = line::strip_pointer(line.value);
    if pointer.is_empty() {
        return;
    }
    match line.tag {
        "HUSB" => family.husband_id = Some(pointer.to_string()),
        "WIFE" => family.wife_id = Some(pointer.to_string()),
        "CHIL" => family.children.push(pointer.to_string()),
        _ => {}
    }
}
