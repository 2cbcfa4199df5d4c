//! Line-oriented parser for the plain-text note format.
//!
//! A note file starts with the `#!refnote` magic, carries a header block
//! (`BIBREF:`, `ABOUT:`, `CONCLUSION:`, `REFERENCES:`, `TAGS:`) and then
//! repeated entry blocks introduced by `TAG:`. Header values continue on
//! following lines until the next known keyword.

use crate::error::{IngestError, Result};
use refnote_core::domain::{BibRef, Source, TagName};
use refnote_core::dto::{EntryDraft, SourceImport};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const MAGIC: &str = "#!refnote";

#[derive(Debug, Serialize)]
pub struct ParsedSource {
    pub origin: PathBuf,
    pub import: SourceImport,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HarvestReport {
    pub sources: Vec<ParsedSource>,
    pub skipped: usize,
}

/// Parses every note file in a directory (one level deep). Files whose
/// name carries editor droppings (`~`, `#`) and files without the magic
/// line are counted as skipped rather than failing the run.
pub fn harvest_dir(dir: &Path) -> Result<HarvestReport> {
    let mut sources = Vec::new();
    let mut skipped = 0;

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    paths.sort();

    for path in paths {
        if !path.is_file() {
            skipped += 1;
            continue;
        }
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if name.contains('~') || name.contains('#') {
            skipped += 1;
            continue;
        }
        let data = fs::read_to_string(&path)?;
        if !has_magic(&data) {
            skipped += 1;
            continue;
        }
        sources.push(parse_named(&data, &path)?);
    }

    Ok(HarvestReport { sources, skipped })
}

/// Parses a single note file, failing if the magic line is absent.
pub fn parse_file(path: &Path) -> Result<ParsedSource> {
    let data = fs::read_to_string(path)?;
    parse_named(&data, path)
}

pub fn parse_str(input: &str) -> Result<ParsedSource> {
    parse_named(input, Path::new("<input>"))
}

fn has_magic(data: &str) -> bool {
    data.lines().next().is_some_and(|first| first.contains(MAGIC))
}

fn parse_named(input: &str, origin: &Path) -> Result<ParsedSource> {
    if !has_magic(input) {
        return Err(IngestError::MissingMagic {
            path: origin.to_path_buf(),
        });
    }

    let mut headers = Headers::default();
    let mut entries: Vec<RawEntry> = Vec::new();
    let mut warnings = Vec::new();
    let mut cursor = Cursor::Preamble;

    for (index, line) in input.lines().enumerate().skip(1) {
        let line_no = index + 1;
        match keyword(line) {
            Some(("BIBREF:", rest)) => {
                headers.bib_ref = rest.trim().to_string();
                cursor = Cursor::Header(HeaderField::BibRef);
            }
            Some(("ABOUT:", rest)) => {
                headers.about = rest.trim().to_string();
                cursor = Cursor::Header(HeaderField::About);
            }
            Some(("CONCLUSION:", rest)) => {
                headers.conclusion = rest.trim().to_string();
                cursor = Cursor::Header(HeaderField::Conclusion);
            }
            Some(("REFERENCES:", rest)) => {
                headers.references = rest.trim().to_string();
                cursor = Cursor::Header(HeaderField::References);
            }
            Some(("TAGS:", rest)) => {
                headers.general_tags = rest.trim().to_string();
                cursor = Cursor::Header(HeaderField::GeneralTags);
            }
            Some(("TAG:", rest)) => {
                entries.push(RawEntry::new(rest.trim().to_string(), line_no));
                cursor = Cursor::Entry;
            }
            Some(("AT:", rest)) => match (cursor, entries.last_mut()) {
                (Cursor::Entry, Some(entry)) if entry.at.is_none() => {
                    entry.at = Some(rest.trim().to_string());
                }
                _ => warnings.push(format!("line {}: stray `AT:` ignored", line_no)),
            },
            Some(("LABEL:", rest)) => match (cursor, entries.last_mut()) {
                (Cursor::Entry, Some(entry)) if entry.label.is_none() => {
                    entry.label = Some(rest.trim().to_string());
                }
                _ => warnings.push(format!("line {}: stray `LABEL:` ignored", line_no)),
            },
            Some(_) | None => match cursor {
                Cursor::Preamble => {
                    if !line.trim().is_empty() {
                        warnings.push(format!(
                            "line {}: text before the first header ignored",
                            line_no
                        ));
                    }
                }
                Cursor::Header(field) => headers.extend(field, line.trim()),
                Cursor::Entry => {
                    if let Some(entry) = entries.last_mut() {
                        entry.body.push(line.to_string());
                    }
                }
            },
        }
    }

    let import = build_import(headers, entries, origin)?;
    Ok(ParsedSource {
        origin: origin.to_path_buf(),
        import,
        warnings,
    })
}

#[derive(Clone, Copy)]
enum Cursor {
    Preamble,
    Header(HeaderField),
    Entry,
}

#[derive(Clone, Copy)]
enum HeaderField {
    BibRef,
    About,
    Conclusion,
    References,
    GeneralTags,
}

#[derive(Default)]
struct Headers {
    bib_ref: String,
    about: String,
    conclusion: String,
    references: String,
    general_tags: String,
}

impl Headers {
    fn extend(&mut self, field: HeaderField, text: &str) {
        let target = match field {
            HeaderField::BibRef => &mut self.bib_ref,
            HeaderField::About => &mut self.about,
            HeaderField::Conclusion => &mut self.conclusion,
            HeaderField::References => &mut self.references,
            HeaderField::GeneralTags => &mut self.general_tags,
        };
        if text.is_empty() {
            return;
        }
        if !target.is_empty() {
            target.push(' ');
        }
        target.push_str(text);
    }
}

struct RawEntry {
    tags_line: String,
    line: usize,
    at: Option<String>,
    label: Option<String>,
    body: Vec<String>,
}

impl RawEntry {
    fn new(tags_line: String, line: usize) -> Self {
        Self {
            tags_line,
            line,
            at: None,
            label: None,
            body: Vec::new(),
        }
    }
}

const KEYWORDS: &[&str] = &[
    "BIBREF:",
    "ABOUT:",
    "CONCLUSION:",
    "REFERENCES:",
    // TAGS: must precede TAG: so the longer keyword wins.
    "TAGS:",
    "TAG:",
    "AT:",
    "LABEL:",
];

fn keyword(line: &str) -> Option<(&'static str, &str)> {
    let trimmed = line.trim_start();
    KEYWORDS
        .iter()
        .find(|kw| trimmed.starts_with(**kw))
        .map(|kw| (*kw, &trimmed[kw.len()..]))
}

fn build_import(headers: Headers, raw: Vec<RawEntry>, origin: &Path) -> Result<SourceImport> {
    if headers.bib_ref.is_empty() {
        return Err(IngestError::MissingHeader {
            path: origin.to_path_buf(),
            header: "BIBREF:",
        });
    }
    let bib_ref = core_in(origin, BibRef::new(&headers.bib_ref))?;

    let references = split_list(&headers.references)
        .into_iter()
        .map(|raw| core_in(origin, BibRef::new(raw)))
        .collect::<Result<Vec<_>>>()?;
    let general_tags = split_list(&headers.general_tags)
        .into_iter()
        .map(|raw| core_in(origin, TagName::new(raw)))
        .collect::<Result<Vec<_>>>()?;

    let mut entries = Vec::with_capacity(raw.len());
    for entry in raw {
        entries.push(build_entry(entry, origin)?);
    }

    Ok(SourceImport {
        source: Source {
            bib_ref,
            about: non_empty(headers.about),
            conclusion: non_empty(headers.conclusion),
        },
        references,
        general_tags,
        entries,
    })
}

fn build_entry(raw: RawEntry, origin: &Path) -> Result<EntryDraft> {
    let tag_names = split_list(&raw.tags_line);
    if tag_names.is_empty() {
        return Err(IngestError::MalformedEntry {
            path: origin.to_path_buf(),
            line: raw.line,
            message: "entry block lists no tags".to_string(),
        });
    }
    let tags = tag_names
        .into_iter()
        .map(|name| core_in(origin, TagName::new(name)))
        .collect::<Result<Vec<_>>>()?;

    let info = raw.body.join("\n").trim().to_string();
    if info.is_empty() {
        return Err(IngestError::MalformedEntry {
            path: origin.to_path_buf(),
            line: raw.line,
            message: "entry block has no body text".to_string(),
        });
    }

    let inline_refs = inline_refs(&info)
        .into_iter()
        .map(|raw| core_in(origin, BibRef::new(raw)))
        .collect::<Result<Vec<_>>>()?;

    Ok(EntryDraft {
        at: raw.at.and_then(non_empty),
        info,
        label: raw.label.and_then(non_empty),
        tags,
        inline_refs,
    })
}

/// Finds `[[Ref:key]]` markers in an entry body.
fn inline_refs(text: &str) -> Vec<&str> {
    let mut refs = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("[[") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("]]") else {
            break;
        };
        if let Some(key) = after[..end].strip_prefix("Ref:") {
            let key = key.trim();
            if !key.is_empty() {
                refs.push(key);
            }
        }
        rest = &after[end + 2..];
    }
    refs
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn core_in<T>(origin: &Path, result: std::result::Result<T, refnote_core::CoreError>) -> Result<T> {
    result.map_err(|source| IngestError::Core {
        path: origin.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
#!refnote
BIBREF: Dean04
ABOUT: MapReduce programming model
 and its runtime.
CONCLUSION: Worth re-reading.
REFERENCES: Ghemawat03, Lamport98
TAGS: distributed, systems

TAG: scheduling
AT: p. 3
LABEL: mr-sched
The master assigns map and reduce
tasks to idle workers.

TAG: storage
Compare the shuffle format with [[Ref:Ghemawat03]].
";

    #[test]
    fn parses_headers_and_entries() {
        let parsed = parse_str(SAMPLE).expect("parse");
        let import = parsed.import;

        assert_eq!(import.source.bib_ref.as_str(), "Dean04");
        assert_eq!(
            import.source.about.as_deref(),
            Some("MapReduce programming model and its runtime.")
        );
        assert_eq!(import.source.conclusion.as_deref(), Some("Worth re-reading."));
        assert_eq!(import.references.len(), 2);
        assert_eq!(import.references[1].as_str(), "Lamport98");
        assert_eq!(import.general_tags.len(), 2);

        assert_eq!(import.entries.len(), 2);
        let first = &import.entries[0];
        assert_eq!(first.at.as_deref(), Some("p. 3"));
        assert_eq!(first.label.as_deref(), Some("mr-sched"));
        assert_eq!(
            first.info,
            "The master assigns map and reduce\ntasks to idle workers."
        );
        assert_eq!(first.tags[0].as_str(), "scheduling");
        assert!(first.inline_refs.is_empty());

        let second = &import.entries[1];
        assert_eq!(second.inline_refs.len(), 1);
        assert_eq!(second.inline_refs[0].as_str(), "Ghemawat03");
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn rejects_missing_magic() {
        let err = parse_str("BIBREF: Dean04\n").unwrap_err();
        assert!(matches!(err, IngestError::MissingMagic { .. }));
    }

    #[test]
    fn rejects_missing_bib_ref() {
        let err = parse_str("#!refnote\nABOUT: something\n").unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingHeader {
                header: "BIBREF:",
                ..
            }
        ));
    }

    #[test]
    fn rejects_entry_without_body() {
        let input = "#!refnote\nBIBREF: Dean04\nTAG: fpga\nAT: p. 9\n";
        let err = parse_str(input).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MalformedEntry { line: 3, .. }
        ));
    }

    #[test]
    fn rejects_entry_without_tags() {
        let input = "#!refnote\nBIBREF: Dean04\nTAG:\nsome body\n";
        let err = parse_str(input).unwrap_err();
        assert!(matches!(err, IngestError::MalformedEntry { .. }));
    }

    #[test]
    fn invalid_tag_is_a_core_error() {
        let input = "#!refnote\nBIBREF: Dean04\nTAGS: ok, not ok\n";
        let err = parse_str(input).unwrap_err();
        assert!(matches!(err, IngestError::Core { .. }));
    }

    #[test]
    fn stray_field_lines_become_warnings() {
        let input = "#!refnote\nBIBREF: Dean04\nAT: p. 1\n";
        let parsed = parse_str(input).expect("parse");
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].contains("stray `AT:`"));
    }

    #[test]
    fn empty_header_values_map_to_none() {
        let input = "#!refnote\nBIBREF: Dean04\nABOUT:\nCONCLUSION:\n";
        let parsed = parse_str(input).expect("parse");
        assert!(parsed.import.source.about.is_none());
        assert!(parsed.import.source.conclusion.is_none());
        assert!(parsed.import.entries.is_empty());
    }

    #[test]
    fn harvest_skips_droppings_and_foreign_files() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("a.txt"), SAMPLE).expect("write");
        fs::write(dir.path().join("b.txt~"), SAMPLE).expect("write");
        fs::write(dir.path().join("#c.txt#"), SAMPLE).expect("write");
        fs::write(dir.path().join("notes.md"), "just prose\n").expect("write");

        let report = harvest_dir(dir.path()).expect("harvest");
        assert_eq!(report.sources.len(), 1);
        assert_eq!(report.skipped, 3);
        assert_eq!(
            report.sources[0].import.source.bib_ref.as_str(),
            "Dean04"
        );
    }

    #[test]
    fn parse_file_reports_path_in_errors() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("plain.txt");
        fs::write(&path, "no magic here\n").expect("write");

        let err = parse_file(&path).unwrap_err();
        assert!(err.to_string().contains("plain.txt"));
    }
}
