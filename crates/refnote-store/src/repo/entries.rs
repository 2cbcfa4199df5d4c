use crate::error::{Result, StoreError};
use crate::query::EntryQuery;
use refnote_core::domain::{BibRef, Entry, EntryId, TagName};
use rusqlite::{params, params_from_iter, Connection};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct EntryNew {
    pub source: BibRef,
    pub at: Option<String>,
    pub info: String,
    pub label: Option<String>,
    pub tags: Vec<TagName>,
}

pub struct EntriesRepo<'a> {
    conn: &'a Connection,
}

impl<'a> EntriesRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Inserts an entry and its tag links. The source must already exist.
    pub fn create(&self, input: EntryNew) -> Result<Entry> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO entries (source, at, info, label) VALUES (?1, ?2, ?3, ?4);",
            params![input.source.as_str(), input.at, input.info, input.label],
        )?;
        let id = tx.last_insert_rowid();

        let tags: BTreeSet<TagName> = input.tags.into_iter().collect();
        for tag in &tags {
            tx.execute(
                "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
                [tag.as_str()],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO entry_tags (entry_id, tag) VALUES (?1, ?2);",
                params![id, tag.as_str()],
            )?;
        }
        tx.commit()?;

        Ok(Entry {
            id: EntryId(id),
            source: input.source,
            at: input.at,
            info: input.info,
            label: input.label,
            tags: tags.into_iter().collect(),
        })
    }

    pub fn list(&self, query: &EntryQuery) -> Result<Vec<Entry>> {
        let sql_query = query.to_sql();
        let mut stmt = self.conn.prepare(&sql_query.sql)?;
        let mut rows = stmt.query(params_from_iter(sql_query.params))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(entry_from_row(row)?);
        }
        Ok(items)
    }

    /// Entries anchored at any of the given labels, for resolving
    /// cross-entry references.
    pub fn by_labels(&self, labels: &[String]) -> Result<Vec<Entry>> {
        if labels.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; labels.len()].join(", ");
        let sql = format!(
            "SELECT entries.id, entries.source, entries.at, entries.info, entries.label, \
             (SELECT GROUP_CONCAT(tag) FROM \
                (SELECT tag FROM entry_tags \
                 WHERE entry_tags.entry_id = entries.id ORDER BY tag)) AS tags \
             FROM entries WHERE entries.label IN ({}) ORDER BY entries.id ASC;",
            placeholders
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(labels.iter()))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(entry_from_row(row)?);
        }
        Ok(items)
    }
}

fn entry_from_row(row: &rusqlite::Row<'_>) -> Result<Entry> {
    let id: i64 = row.get(0)?;
    let source_raw: String = row.get(1)?;
    let source = BibRef::new(&source_raw).map_err(StoreError::Core)?;
    let at: Option<String> = row.get(2)?;
    let info: String = row.get(3)?;
    let label: Option<String> = row.get(4)?;

    let tags_concat: Option<String> = row.get(5)?;
    let mut tags = Vec::new();
    if let Some(concat) = tags_concat {
        for part in concat.split(',') {
            tags.push(TagName::new(part).map_err(StoreError::Core)?);
        }
    }

    Ok(Entry {
        id: EntryId(id),
        source,
        at,
        info,
        label,
        tags,
    })
}
