use crate::error::{Result, StoreError};
use refnote_core::domain::{BibRef, Source, TagName};
use refnote_core::dto::SourceImport;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;

/// A source together with its aggregated cross-references and the tags
/// used by its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOverview {
    pub source: Source,
    pub refs: Vec<BibRef>,
    pub tags: Vec<TagName>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub entries: usize,
    pub references: usize,
}

pub struct SourcesRepo<'a> {
    conn: &'a Connection,
}

impl<'a> SourcesRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Inserts or updates the descriptive fields of a source.
    pub fn upsert(&self, source: &Source) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sources (bib_ref, about, conclusion) VALUES (?1, ?2, ?3)
             ON CONFLICT(bib_ref) DO UPDATE
             SET about = excluded.about, conclusion = excluded.conclusion;",
            params![source.bib_ref.as_str(), source.about, source.conclusion],
        )?;
        Ok(())
    }

    /// Registers a bare citation key if it is not known yet.
    pub fn ensure(&self, bib_ref: &BibRef) -> Result<()> {
        ensure_inner(self.conn, bib_ref)
    }

    pub fn add_xref(&self, ref_by: &BibRef, ref_to: &BibRef) -> Result<()> {
        add_xref_inner(self.conn, ref_by, ref_to)
    }

    pub fn get(&self, bib_ref: &BibRef) -> Result<Option<SourceOverview>> {
        let mut stmt = self.conn.prepare(&overview_sql("WHERE s.bib_ref = ?1"))?;
        let mut rows = stmt.query([bib_ref.as_str()])?;
        match rows.next()? {
            Some(row) => Ok(Some(overview_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn list(&self) -> Result<Vec<SourceOverview>> {
        let mut stmt = self.conn.prepare(&overview_sql(""))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(overview_from_row(row)?);
        }
        Ok(items)
    }

    pub fn exists(&self, bib_ref: &BibRef) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM sources WHERE bib_ref = ?1;",
                [bib_ref.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Applies one parsed note file in a single transaction: source info,
    /// header references, general tags, and all entries with their tag
    /// links and inline references.
    pub fn import(&self, import: &SourceImport) -> Result<ImportSummary> {
        let tx = self.conn.unchecked_transaction()?;
        let mut summary = ImportSummary::default();
        let bib_ref = &import.source.bib_ref;

        tx.execute(
            "INSERT INTO sources (bib_ref, about, conclusion) VALUES (?1, ?2, ?3)
             ON CONFLICT(bib_ref) DO UPDATE
             SET about = excluded.about, conclusion = excluded.conclusion;",
            params![
                bib_ref.as_str(),
                import.source.about,
                import.source.conclusion
            ],
        )?;

        for reference in &import.references {
            ensure_inner(&tx, reference)?;
            add_xref_inner(&tx, bib_ref, reference)?;
            summary.references += 1;
        }

        for tag in &import.general_tags {
            ensure_tag(&tx, tag)?;
        }

        for draft in &import.entries {
            tx.execute(
                "INSERT INTO entries (source, at, info, label) VALUES (?1, ?2, ?3, ?4);",
                params![bib_ref.as_str(), draft.at, draft.info, draft.label],
            )?;
            let entry_id = tx.last_insert_rowid();

            let tags: BTreeSet<&TagName> =
                draft.tags.iter().chain(import.general_tags.iter()).collect();
            for tag in tags {
                ensure_tag(&tx, tag)?;
                tx.execute(
                    "INSERT OR IGNORE INTO entry_tags (entry_id, tag) VALUES (?1, ?2);",
                    params![entry_id, tag.as_str()],
                )?;
            }

            for reference in &draft.inline_refs {
                ensure_inner(&tx, reference)?;
                add_xref_inner(&tx, bib_ref, reference)?;
                summary.references += 1;
            }

            summary.entries += 1;
        }

        tx.commit()?;
        Ok(summary)
    }
}

fn ensure_inner(conn: &Connection, bib_ref: &BibRef) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO sources (bib_ref) VALUES (?1);",
        [bib_ref.as_str()],
    )?;
    Ok(())
}

fn add_xref_inner(conn: &Connection, ref_by: &BibRef, ref_to: &BibRef) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO xrefs (ref_by, ref_to) VALUES (?1, ?2);",
        params![ref_by.as_str(), ref_to.as_str()],
    )?;
    Ok(())
}

fn ensure_tag(conn: &Connection, tag: &TagName) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
        [tag.as_str()],
    )?;
    Ok(())
}

fn overview_sql(where_clause: &str) -> String {
    format!(
        "SELECT s.bib_ref, s.about, s.conclusion, \
         (SELECT GROUP_CONCAT(DISTINCT x.ref_to) FROM xrefs x WHERE x.ref_by = s.bib_ref) AS refs, \
         (SELECT GROUP_CONCAT(DISTINCT et.tag) FROM entry_tags et \
          INNER JOIN entries e ON e.id = et.entry_id WHERE e.source = s.bib_ref) AS tags \
         FROM sources s {} ORDER BY s.bib_ref ASC;",
        where_clause
    )
}

fn overview_from_row(row: &rusqlite::Row<'_>) -> Result<SourceOverview> {
    let bib_raw: String = row.get(0)?;
    let bib_ref = BibRef::new(&bib_raw).map_err(StoreError::Core)?;
    let about: Option<String> = row.get(1)?;
    let conclusion: Option<String> = row.get(2)?;

    let refs_concat: Option<String> = row.get(3)?;
    let mut refs = Vec::new();
    if let Some(concat) = refs_concat {
        for part in concat.split(',') {
            refs.push(BibRef::new(part).map_err(StoreError::Core)?);
        }
    }
    refs.sort();

    let tags_concat: Option<String> = row.get(4)?;
    let mut tags = Vec::new();
    if let Some(concat) = tags_concat {
        for part in concat.split(',') {
            tags.push(TagName::new(part).map_err(StoreError::Core)?);
        }
    }
    tags.sort();

    Ok(SourceOverview {
        source: Source {
            bib_ref,
            about,
            conclusion,
        },
        refs,
        tags,
    })
}
