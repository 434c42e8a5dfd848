//! Aligned plain-text tables.

const MIN_WIDTH: usize = 4;
const SEPARATOR: &str = "  ";

#[derive(Clone, Copy, Debug, Default)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Rows of string cells under a header line.
#[derive(Clone, Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing cells render as `-`, extra cells are dropped.
    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    #[must_use]
    pub fn render(&self, options: TableOptions) -> String {
        let mut widths = self.natural_widths();
        self.fit(&mut widths, options.max_width);

        let header = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(header, width)| pad(&truncate(header, *width), *width, false))
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        let divider = "-".repeat(header.chars().count());

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(header.trim_end().to_string());
        lines.push(divider);
        for row in &self.rows {
            let line = widths
                .iter()
                .enumerate()
                .map(|(index, width)| {
                    let cell = truncate(row.get(index).map_or("-", String::as_str), *width);
                    let padded = pad(&cell, *width, looks_numeric(&cell));
                    if options.color {
                        paint(&cell, padded)
                    } else {
                        padded
                    }
                })
                .collect::<Vec<_>>()
                .join(SEPARATOR);
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }

    fn natural_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.chars().count())
                    .chain([header.chars().count(), MIN_WIDTH])
                    .max()
                    .unwrap_or(MIN_WIDTH)
            })
            .collect()
    }

    /// Shrink the widest column one character at a time until the table fits
    /// or every column is down to its header.
    fn fit(&self, widths: &mut [usize], max_width: Option<usize>) {
        let Some(max_width) = max_width else {
            return;
        };
        let separators = widths.len().saturating_sub(1) * SEPARATOR.len();
        while widths.iter().sum::<usize>() + separators > max_width {
            let widest = widths
                .iter()
                .enumerate()
                .filter(|(index, width)| **width > self.headers[*index].chars().count().max(MIN_WIDTH))
                .max_by_key(|(_, width)| **width)
                .map(|(index, _)| index);
            let Some(index) = widest else {
                break;
            };
            widths[index] -= 1;
        }
    }
}

fn truncate(value: &str, width: usize) -> String {
    let flat = value.replace('\n', " ");
    if flat.chars().count() <= width {
        return flat;
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = flat.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | '%'))
}

/// ANSI color for cells naming a severity or an outcome.
fn paint(cell: &str, padded: String) -> String {
    let code = match cell.to_ascii_lowercase().as_str() {
        "critical" | "high" | "error" | "failed" | "crashed" | "disconnected" => "31",
        "medium" | "low" | "pending" | "waiting" | "dry run" | "stuck" => "33",
        "info" | "ok" | "success" | "applied" | "queued" | "active" => "32",
        _ => return padded,
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Table, TableOptions};

    fn sample() -> Table {
        let mut table = Table::new(["severity", "code", "count"]);
        table.row(["high", "queue_sent_prospect_not_contacted", "3"]);
        table.row(["info", "contacted_without_queue_item", "12"]);
        table
    }

    #[test]
    fn aligns_columns_and_right_aligns_numbers() {
        let rendered = sample().render(TableOptions::default());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("severity  code"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].ends_with("    3"));
        assert!(lines[3].ends_with("   12"));
        assert_eq!(lines[2].find("queue"), lines[0].find("code"));
    }

    #[test]
    fn shrinks_wide_columns_to_fit() {
        let rendered = sample().render(TableOptions {
            max_width: Some(40),
            color: false,
        });
        assert!(rendered.lines().all(|line| line.chars().count() <= 40));
        assert!(rendered.contains('…'));
    }

    #[test]
    fn short_rows_are_padded_with_dashes() {
        let mut table = Table::new(["id", "status"]);
        table.row(["p1"]);
        let rendered = table.render(TableOptions::default());
        assert!(rendered.lines().nth(2).is_some_and(|line| line.ends_with('-')));
    }

    #[test]
    fn color_wraps_known_words_only() {
        let rendered = sample().render(TableOptions {
            max_width: None,
            color: true,
        });
        assert!(rendered.contains("\u{1b}[31mhigh"));
        assert!(rendered.contains("\u{1b}[32minfo"));
        assert!(!rendered.contains("\u{1b}[31mqueue"));
    }
}
