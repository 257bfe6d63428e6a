use comfy_table::{ContentArrangement, Table, presets};

use crate::config::OutputFormat;
use crate::db::types::{ResultSet, Value};

const ELLIPSIS: &str = "…";
const DEFAULT_MAX_CELL_WIDTH: usize = 140;
const DEFAULT_MAX_OUTPUT_CHARS: usize = 250_000;

#[derive(Debug, Clone)]
pub struct TableOptions {
    pub max_cell_width: usize,
    pub max_output_chars: usize,
    pub footer: Option<String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            max_cell_width: DEFAULT_MAX_CELL_WIDTH,
            max_output_chars: DEFAULT_MAX_OUTPUT_CHARS,
            footer: None,
        }
    }
}

fn new_table(format: OutputFormat) -> Table {
    let mut table = Table::new();
    match format {
        OutputFormat::Markdown => {
            table.load_preset(presets::ASCII_MARKDOWN);
        }
        _ => {
            table.load_preset(presets::UTF8_FULL);
        }
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn render_result_set_table(
    result_set: &ResultSet,
    format: OutputFormat,
    options: &TableOptions,
) -> String {
    let mut table = new_table(format);

    let headers = result_set
        .columns
        .iter()
        .map(|col| col.name.clone())
        .collect::<Vec<_>>();
    table.set_header(headers);

    for row in &result_set.rows {
        let cells = row
            .iter()
            .map(|value| format_cell(value, options.max_cell_width))
            .collect::<Vec<_>>();
        table.add_row(cells);
    }

    let mut output = table.to_string();
    if let Some(footer) = &options.footer {
        output.push('\n');
        output.push_str(footer);
    }

    truncate_output(output, options.max_output_chars)
}

pub fn render_key_value_table(
    title: &str,
    rows: &[(String, String)],
    format: OutputFormat,
    options: &TableOptions,
) -> String {
    let mut table = new_table(format);
    table.set_header(vec![title.to_string(), "Value".to_string()]);

    for (key, value) in rows {
        let key = truncate_string(key, options.max_cell_width);
        let value = truncate_string(value, options.max_cell_width);
        table.add_row(vec![key, value]);
    }

    truncate_output(table.to_string(), options.max_output_chars)
}

fn format_cell(value: &Value, max_cell_width: usize) -> String {
    truncate_string(&value.as_display(), max_cell_width)
}

fn truncate_string(input: &str, max_len: usize) -> String {
    let len = input.chars().count();
    if len <= max_len {
        return input.to_string();
    }
    if max_len <= 1 {
        return ELLIPSIS.to_string();
    }
    let truncated: String = input.chars().take(max_len - 1).collect();
    format!("{}{}", truncated, ELLIPSIS)
}

fn truncate_output(output: String, max_len: usize) -> String {
    if output.len() <= max_len {
        return output;
    }
    let mut truncated = output.chars().take(max_len).collect::<String>();
    truncated.push_str("\n[output truncated]");
    truncated
}
