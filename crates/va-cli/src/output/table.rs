#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render a simple aligned table for string rows.
#[must_use]
pub fn render_entity_table(
    headers: &[&str],
    rows: &[Vec<String>],
    options: TableOptions,
) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(std::string::String::len)
                .max()
                .unwrap_or(0)
                .max(header.len())
                .max(6)
        })
        .collect();

    fit_widths(&mut widths, headers, options.max_width);

    let header_line = headers
        .iter()
        .zip(widths.iter())
        .map(|(header, width)| {
            let text = truncate_text(header, *width);
            format_cell(&text, *width, false, false)
        })
        .collect::<Vec<_>>()
        .join("  ");

    let divider = "-".repeat(strip_ansi(&header_line).len());

    let row_lines = rows
        .iter()
        .map(|row| {
            widths
                .iter()
                .enumerate()
                .map(|(index, width)| {
                    let value = row.get(index).cloned().unwrap_or_else(|| "-".to_string());
                    let truncated = truncate_text(&value, *width);
                    let numeric = looks_numeric(&truncated);
                    let colored = if options.color {
                        colorize_status(&truncated)
                    } else {
                        truncated
                    };
                    format_cell(&colored, *width, numeric, options.color)
                })
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>();

    let mut lines = Vec::with_capacity(2 + row_lines.len());
    lines.push(header_line);
    lines.push(divider);
    lines.extend(row_lines);
    lines.join("\n")
}

fn fit_widths(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };

    if widths.is_empty() {
        return;
    }

    let separators = widths.len().saturating_sub(1) * 2;
    let mut total = widths.iter().sum::<usize>() + separators;
    if total <= max_width {
        return;
    }

    loop {
        if total <= max_width {
            break;
        }

        let mut candidate_idx = None;
        let mut candidate_width = 0usize;
        for (idx, width) in widths.iter().enumerate() {
            let min_width = headers[idx].len().max(6);
            if *width > min_width && *width > candidate_width {
                candidate_idx = Some(idx);
                candidate_width = *width;
            }
        }

        let Some(idx) = candidate_idx else {
            break;
        };

        widths[idx] = widths[idx].saturating_sub(1);
        total = widths.iter().sum::<usize>() + separators;
    }
}

fn truncate_text(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }

    let mut out = String::new();
    for ch in value.chars().take(width - 1) {
        out.push(ch);
    }
    out.push('…');
    out
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | ','))
}

fn format_cell(value: &str, width: usize, numeric: bool, has_ansi: bool) -> String {
    let plain_len = if has_ansi {
        strip_ansi(value).len()
    } else {
        value.len()
    };
    let pad = width.saturating_sub(plain_len);
    if numeric {
        format!("{}{}", " ".repeat(pad), value)
    } else {
        format!("{}{}", value, " ".repeat(pad))
    }
}

/// Color workflow states: done in green, in flight in yellow, broken in red.
fn colorize_status(value: &str) -> String {
    let code = match value.to_ascii_lowercase().as_str() {
        "completed" | "true" | "ready" => Some("32"),
        "pending" | "processing" | "queued" | "skipped" | "idle" | "speaking" | "listening" => Some("33"),
        "failed" | "false" | "error" | "blocked" => Some("31"),
        _ => None,
    };

    match code {
        Some(code) => format!("\u{1b}[{code}m{value}\u{1b}[0m"),
        None => value.to_string(),
    }
}

fn strip_ansi(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' && chars.peek() == Some(&'[') {
            let _ = chars.next();
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
            continue;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{TableOptions, colorize_status, render_entity_table, strip_ansi, truncate_text};

    #[test]
    fn statuses_are_colored_by_outcome() {
        assert_eq!(colorize_status("completed"), "\u{1b}[32mcompleted\u{1b}[0m");
        assert_eq!(colorize_status("Processing"), "\u{1b}[33mProcessing\u{1b}[0m");
        assert_eq!(colorize_status("failed"), "\u{1b}[31mfailed\u{1b}[0m");
        assert_eq!(colorize_status("Acme Robotics"), "Acme Robotics");
    }

    #[test]
    fn colored_cells_keep_alignment() {
        let rows = vec![
            vec!["completed".to_string(), "a".to_string()],
            vec!["deck.pdf".to_string(), "b".to_string()],
        ];
        let table = render_entity_table(
            &["status", "x"],
            &rows,
            TableOptions {
                max_width: None,
                color: true,
            },
        );
        let widths: Vec<usize> = table.lines().map(|line| strip_ansi(line).len()).collect();
        assert_eq!(widths[2], widths[3]);
    }

    #[test]
    fn narrow_terminals_truncate_long_names() {
        let rows = vec![vec!["Founder Voice Interview Transcript".to_string()]];
        let table = render_entity_table(
            &["name"],
            &rows,
            TableOptions {
                max_width: Some(12),
                color: false,
            },
        );
        assert!(table.lines().nth(2).is_some_and(|line| line.ends_with('…')));
        assert_eq!(truncate_text("Acme", 10), "Acme");
    }
}
