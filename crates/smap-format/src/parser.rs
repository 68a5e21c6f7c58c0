//! Strict parser for the two-stratum SMAP text format.
//!
//! Inlining reads the mapping table of an already-compiled function back out
//! of its class file's debug attribute; this parser turns that text blob into
//! the same [`FileMapping`]/[`Smap`] model the writer started from.

use indexmap::IndexMap;
use line_map::{FileMapping, RangeMapping, Smap, SmapError};

use crate::error::{ParseError, ParseErrorKind};
use crate::{END, FILE_SECTION, LINE_SECTION, SMAP_HEADER};

/// One `*S` stratum: a name plus the file mappings its `*F`/`*L` sections
/// declared, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stratum {
    /// Stratum name, e.g. `Kotlin`.
    pub name: String,
    file_mappings: Vec<FileMapping>,
}

impl Stratum {
    /// The stratum's file mappings in declaration order.
    #[inline]
    pub fn file_mappings(&self) -> &[FileMapping] {
        &self.file_mappings
    }
}

/// A fully parsed SMAP blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSmap {
    /// Source file name from the header.
    pub source: String,
    /// Default stratum name from the header.
    pub default_stratum_name: String,
    /// All strata in input order.
    pub strata: Vec<Stratum>,
}

impl ParsedSmap {
    /// The stratum named by the header, if present.
    pub fn default_stratum(&self) -> Option<&Stratum> {
        self.strata.iter().find(|s| s.name == self.default_stratum_name)
    }

    /// Rebuilds the mapping table from the default stratum.
    pub fn to_smap(&self) -> Result<Smap, SmapError> {
        let mappings = self
            .default_stratum()
            .map(|s| s.file_mappings.clone())
            .unwrap_or_default();
        Smap::new(mappings)
    }
}

/// Parses an SMAP text blob.
pub fn parse(text: &str) -> Result<ParsedSmap, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut pos = 0;

    let header = next_line(&lines, &mut pos, "SMAP header")?;
    if header != SMAP_HEADER {
        return Err(ParseError::new(ParseErrorKind::MissingHeader, 1));
    }
    let source = next_line(&lines, &mut pos, "source file name")?.to_string();
    let default_stratum_name = next_line(&lines, &mut pos, "default stratum name")?.to_string();

    let mut strata = Vec::new();
    let mut current: Option<StratumState> = None;
    let mut section = Section::None;

    while pos < lines.len() {
        let line_no = pos + 1;
        let line = lines[pos];
        pos += 1;

        if let Some(name) = line.strip_prefix("*S ") {
            if let Some(state) = current.take() {
                strata.push(state.finish());
            }
            current = Some(StratumState::new(name));
            section = Section::None;
        } else if line == FILE_SECTION {
            require_stratum(&current, line_no)?;
            section = Section::Files;
        } else if line == LINE_SECTION {
            require_stratum(&current, line_no)?;
            section = Section::Lines;
        } else if line == END {
            if let Some(state) = current.take() {
                strata.push(state.finish());
            }
            section = Section::None;
        } else if line.is_empty() {
            continue;
        } else {
            let state = match current.as_mut() {
                Some(state) => state,
                None => return Err(ParseError::new(ParseErrorKind::ContentOutsideSection, line_no)),
            };
            match section {
                Section::Files => state.add_file_entry(line, &lines, &mut pos, line_no)?,
                Section::Lines => state.add_line_entry(line, line_no)?,
                Section::None => {
                    return Err(ParseError::new(ParseErrorKind::ContentOutsideSection, line_no))
                }
            }
        }
    }
    if let Some(state) = current.take() {
        strata.push(state.finish());
    }

    Ok(ParsedSmap {
        source,
        default_stratum_name,
        strata,
    })
}

#[derive(Clone, Copy)]
enum Section {
    None,
    Files,
    Lines,
}

struct StratumState {
    name: String,
    files: IndexMap<i32, FileMapping>,
}

impl StratumState {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            files: IndexMap::new(),
        }
    }

    /// Parses a `*F` entry. The `+ id name` form consumes the following line
    /// as the file path; the plain `id name` form reuses the name as path.
    fn add_file_entry(
        &mut self,
        entry: &str,
        lines: &[&str],
        pos: &mut usize,
        line_no: usize,
    ) -> Result<(), ParseError> {
        let malformed = || ParseError::new(
            ParseErrorKind::MalformedFileEntry { entry: entry.to_string() },
            line_no,
        );

        let (body, has_path) = match entry.strip_prefix("+ ") {
            Some(rest) => (rest, true),
            None => (entry, false),
        };
        let (id_text, name) = body.split_once(' ').ok_or_else(malformed)?;
        let id: i32 = id_text.parse().map_err(|_| malformed())?;
        if self.files.contains_key(&id) {
            return Err(ParseError::new(
                ParseErrorKind::DuplicateFileId { file_id: id },
                line_no,
            ));
        }

        let path = if has_path {
            next_line(lines, pos, "file path")?.to_string()
        } else {
            name.to_string()
        };
        self.files.insert(id, FileMapping::new(name, path.as_str()));
        Ok(())
    }

    /// Parses a `*L` entry of the form `source#fileId[,range]:dest`.
    fn add_line_entry(&mut self, entry: &str, line_no: usize) -> Result<(), ParseError> {
        let malformed = || ParseError::new(
            ParseErrorKind::MalformedLineEntry { entry: entry.to_string() },
            line_no,
        );

        let (source_text, rest) = entry.split_once('#').ok_or_else(malformed)?;
        let (file_part, dest_text) = rest.split_once(':').ok_or_else(malformed)?;
        let (id_text, range_text) = match file_part.split_once(',') {
            Some((id, range)) => (id, Some(range)),
            None => (file_part, None),
        };

        let source: i32 = source_text.parse().map_err(|_| malformed())?;
        let file_id: i32 = id_text.parse().map_err(|_| malformed())?;
        let range: i32 = match range_text {
            Some(text) => text.parse().map_err(|_| malformed())?,
            None => 1,
        };
        let dest: i32 = dest_text.parse().map_err(|_| malformed())?;

        let file = self.files.get_mut(&file_id).ok_or_else(|| {
            ParseError::new(ParseErrorKind::UnknownFileId { file_id }, line_no)
        })?;
        file.add_range_mapping(RangeMapping::new(source, dest, range));
        Ok(())
    }

    fn finish(self) -> Stratum {
        Stratum {
            name: self.name,
            file_mappings: self.files.into_values().collect(),
        }
    }
}

fn next_line<'a>(lines: &[&'a str], pos: &mut usize, expected: &str) -> Result<&'a str, ParseError> {
    let line = lines.get(*pos).copied().ok_or_else(|| {
        ParseError::new(
            ParseErrorKind::UnexpectedEof { expected: expected.to_string() },
            lines.len() + 1,
        )
    })?;
    *pos += 1;
    Ok(line)
}

fn require_stratum(current: &Option<StratumState>, line_no: usize) -> Result<(), ParseError> {
    if current.is_none() {
        return Err(ParseError::new(ParseErrorKind::ContentOutsideSection, line_no));
    }
    Ok(())
}
