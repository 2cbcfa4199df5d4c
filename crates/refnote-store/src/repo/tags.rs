use crate::error::{Result, StoreError};
use crate::query::compile_predicate;
use refnote_core::domain::TagName;
use refnote_core::filter::FilterExpr;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

pub struct TagsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> TagsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn ensure(&self, tag: &TagName) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
            [tag.as_str()],
        )?;
        Ok(())
    }

    pub fn list_with_counts(&self) -> Result<Vec<(TagName, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT tags.name, COUNT(entry_tags.entry_id) AS cnt
             FROM tags
             LEFT JOIN entry_tags ON tags.name = entry_tags.tag
             GROUP BY tags.name
             ORDER BY tags.name ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let name_raw: String = row.get(0)?;
            let name = TagName::new(&name_raw).map_err(StoreError::Core)?;
            let count: i64 = row.get(1)?;
            items.push((name, count));
        }
        Ok(items)
    }

    /// Deletes every tag whose name satisfies the filter expression,
    /// together with its entry links. Returns the number of tags removed.
    pub fn delete_matching(&self, expr: &FilterExpr) -> Result<usize> {
        let predicate = compile_predicate(expr, "name")?;
        let tx = self.conn.unchecked_transaction()?;

        let link_sql = format!(
            "DELETE FROM entry_tags WHERE tag IN (SELECT name FROM tags WHERE {});",
            predicate.sql
        );
        tx.execute(&link_sql, params_from_iter(predicate.params.clone()))?;

        let tag_sql = format!("DELETE FROM tags WHERE {};", predicate.sql);
        let deleted = tx.execute(&tag_sql, params_from_iter(predicate.params))?;

        tx.commit()?;
        Ok(deleted)
    }

    /// Renames a tag, relinking all tagged entries. A collision with an
    /// existing tag merges the two.
    pub fn rename(&self, old: &TagName, new: &TagName) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        let exists: Option<i64> = tx
            .query_row(
                "SELECT 1 FROM tags WHERE name = ?1;",
                [old.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::NotFound(format!("tag {}", old)));
        }

        tx.execute(
            "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
            [new.as_str()],
        )?;
        tx.execute(
            "INSERT OR IGNORE INTO entry_tags (entry_id, tag)
             SELECT entry_id, ?1 FROM entry_tags WHERE tag = ?2;",
            params![new.as_str(), old.as_str()],
        )?;
        tx.execute("DELETE FROM entry_tags WHERE tag = ?1;", [old.as_str()])?;
        tx.execute("DELETE FROM tags WHERE name = ?1;", [old.as_str()])?;

        tx.commit()?;
        Ok(())
    }
}
