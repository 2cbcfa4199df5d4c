//! Fixed-width table rendering for query results.

pub struct Column {
    pub header: &'static str,
    pub width: usize,
}

impl Column {
    pub const fn new(header: &'static str, width: usize) -> Self {
        Self { header, width }
    }
}

/// Renders rows as a bordered table, wrapping cell text on whitespace
/// to each column's width. Rows are separated so multi-line cells stay
/// readable.
pub fn render_table(columns: &[Column], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    let separator = separator_line(columns);

    out.push_str(&separator);
    let headers: Vec<String> = columns.iter().map(|c| c.header.to_string()).collect();
    render_row(&mut out, columns, &headers);
    out.push_str(&separator);

    for row in rows {
        render_row(&mut out, columns, row);
        out.push_str(&separator);
    }
    out
}

fn separator_line(columns: &[Column]) -> String {
    let mut line = String::from("+");
    for column in columns {
        line.push_str(&"-".repeat(column.width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn render_row(out: &mut String, columns: &[Column], cells: &[String]) {
    let wrapped: Vec<Vec<String>> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let text = cells.get(i).map(String::as_str).unwrap_or("");
            wrap_cell(text, column.width)
        })
        .collect();
    let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);

    for line_no in 0..height {
        out.push('|');
        for (column, lines) in columns.iter().zip(&wrapped) {
            let text = lines.get(line_no).map(String::as_str).unwrap_or("");
            out.push(' ');
            out.push_str(text);
            out.push_str(&" ".repeat(column.width.saturating_sub(text.chars().count())));
            out.push_str(" |");
        }
        out.push('\n');
    }
}

/// Greedy word wrap; words longer than the width are hard-broken.
fn wrap_cell(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.lines() {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            for piece in break_word(word, width) {
                let needed = if current.is_empty() {
                    piece.chars().count()
                } else {
                    current.chars().count() + 1 + piece.chars().count()
                };
                if needed > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(&piece);
            }
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn break_word(word: &str, width: usize) -> Vec<String> {
    if width == 0 || word.chars().count() <= width {
        return vec![word.to_string()];
    }
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_padded_bordered_rows() {
        let columns = [Column::new("Tag", 6), Column::new("Count", 5)];
        let rows = vec![vec!["fpga".to_string(), "3".to_string()]];
        let table = render_table(&columns, &rows);
        let expected = "\
+--------+-------+
| Tag    | Count |
+--------+-------+
| fpga   | 3     |
+--------+-------+
";
        assert_eq!(table, expected);
    }

    #[test]
    fn wraps_long_cells_on_whitespace() {
        let columns = [Column::new("Info", 10)];
        let rows = vec![vec!["alpha beta gamma".to_string()]];
        let table = render_table(&columns, &rows);
        assert!(table.contains("| alpha beta |") || table.contains("| alpha      |"));
        assert!(table.contains("gamma"));
    }

    #[test]
    fn hard_breaks_oversized_words() {
        let lines = wrap_cell("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn missing_cells_render_empty() {
        let columns = [Column::new("A", 3), Column::new("B", 3)];
        let rows = vec![vec!["x".to_string()]];
        let table = render_table(&columns, &rows);
        assert!(table.contains("| x   |     |"));
    }
}
