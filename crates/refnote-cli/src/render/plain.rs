//! Plain-text rendering in the same keyword format the importer reads,
//! so a dumped file can be ingested again unchanged.

use refnote_core::domain::Entry;
use refnote_ingest::MAGIC;
use refnote_store::repo::SourceOverview;
use std::fmt::Write;

pub fn render_source(overview: &SourceOverview, entries: &[Entry]) -> String {
    let mut out = String::new();
    out.push_str(MAGIC);
    out.push_str("\n\n");

    let _ = writeln!(out, "BIBREF: {}", overview.source.bib_ref.as_str());
    if let Some(about) = overview.source.about.as_deref() {
        let _ = writeln!(out, "ABOUT: {}", about);
    }
    if let Some(conclusion) = overview.source.conclusion.as_deref() {
        let _ = writeln!(out, "CONCLUSION: {}", conclusion);
    }
    if !overview.refs.is_empty() {
        let refs: Vec<&str> = overview.refs.iter().map(|r| r.as_str()).collect();
        let _ = writeln!(out, "REFERENCES: {}", refs.join(", "));
    }

    for entry in entries {
        out.push('\n');
        let tags: Vec<&str> = entry.tags.iter().map(|t| t.as_str()).collect();
        let _ = writeln!(out, "TAG: {}", tags.join(", "));
        if let Some(at) = entry.at.as_deref() {
            let _ = writeln!(out, "AT: {}", at);
        }
        if let Some(label) = entry.label.as_deref() {
            let _ = writeln!(out, "LABEL: {}", label);
        }
        out.push_str(&entry.info);
        out.push('\n');
    }
    out
}
