//! LaTeX export: one section per source, entries as an itemize block.
//! Inline `[[Ref:key]]` markers become `\cite{key}` commands.

use refnote_core::domain::Entry;
use refnote_store::repo::SourceOverview;
use std::fmt::Write;

const PREAMBLE: &str = "\
% Generated by refnote. Modify as you see fit.
\\documentclass{article}

\\usepackage{booktabs}
\\usepackage{longtable}
\\usepackage{hyperref}

\\begin{document}

";

pub fn render_document(sections: &[(SourceOverview, Vec<Entry>)]) -> String {
    let mut out = String::from(PREAMBLE);
    for (overview, entries) in sections {
        render_section(&mut out, overview, entries);
    }
    out.push_str("\\end{document}\n");
    out
}

fn render_section(out: &mut String, overview: &SourceOverview, entries: &[Entry]) {
    let bib = overview.source.bib_ref.as_str();
    let _ = writeln!(out, "\\section{{{} \\cite{{{}}}}}\n", escape(bib), bib);

    if let Some(about) = overview.source.about.as_deref() {
        let _ = writeln!(out, "{}\n", escape(about));
    }
    if let Some(conclusion) = overview.source.conclusion.as_deref() {
        let _ = writeln!(out, "\\emph{{{}}}\n", escape(conclusion));
    }

    if entries.is_empty() {
        return;
    }
    out.push_str("\\begin{itemize}\n");
    for entry in entries {
        let mut item = String::from("\\item ");
        if let Some(at) = entry.at.as_deref() {
            let _ = write!(item, "\\textbf{{{}}} ", escape(at));
        }
        item.push_str(&cite_markers(&entry.info));
        if let Some(label) = entry.label.as_deref() {
            let _ = write!(item, " \\label{{{}}}", escape(label));
        }
        if !entry.tags.is_empty() {
            let tags: Vec<String> = entry
                .tags
                .iter()
                .map(|tag| escape(tag.as_str()))
                .collect();
            let _ = write!(item, " \\hfill {{\\small {}}}", tags.join(", "));
        }
        out.push_str(&item);
        out.push('\n');
    }
    out.push_str("\\end{itemize}\n\n");
}

/// Escapes LaTeX special characters in free-form text.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '$' => out.push_str("\\$"),
            '&' => out.push_str("\\&"),
            '#' => out.push_str("\\#"),
            '^' => out.push_str("\\textasciicircum{}"),
            '_' => out.push_str("\\_"),
            '%' => out.push_str("\\%"),
            '~' => out.push_str("\\textasciitilde{}"),
            other => out.push(other),
        }
    }
    out
}

/// Escapes entry text while turning `[[Ref:key]]` markers into `\cite`.
fn cite_markers(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;
    loop {
        let Some(start) = rest.find("[[Ref:") else {
            out.push_str(&escape(rest));
            break;
        };
        let after = &rest[start + 6..];
        let Some(end) = after.find("]]") else {
            out.push_str(&escape(rest));
            break;
        };
        out.push_str(&escape(&rest[..start]));
        let key = after[..end].trim();
        let _ = write!(out, "\\cite{{{}}}", key);
        rest = &after[end + 2..];
    }
    out
}
