//! Quick profiling of a raw CSV file.
//!
//! Used while writing a contract: detects the delimiter, lists the header,
//! counts rows, and reports null counts over a leading sample so cleaning
//! rules can be designed before the pipeline ever runs.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::csv::{DEFAULT_NULL_TOKENS, dedupe_headers};
use crate::error::{IngestError, Result, open_error};

/// Rows inspected for null counts.
pub const PROFILE_SAMPLE_ROWS: usize = 5000;
/// Rows shown in the preview.
pub const PREVIEW_ROWS: usize = 10;

const SNIFF_BYTES: u64 = 64 * 1024;
const SNIFF_LINES: usize = 20;
const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Summary of one CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvProfile {
    pub delimiter: char,
    pub headers: Vec<String>,
    /// Total data rows in the file.
    pub row_count: usize,
    /// Rows the null counts were computed over.
    pub sampled_rows: usize,
    /// Null cells per column within the sample, in header order.
    pub null_counts: Vec<(String, usize)>,
    pub preview: Vec<Vec<Option<String>>>,
}

/// Guess the delimiter from a text sample.
///
/// Prefers a candidate that appears the same non-zero number of times on
/// every line (outside quotes); falls back to the most frequent candidate on
/// the first line, then to `,`.
pub fn sniff_delimiter(sample: &str) -> char {
    let lines: Vec<&str> = sample
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    let Some(first) = lines.first() else {
        return ',';
    };

    let mut best: Option<(char, usize)> = None;
    for candidate in CANDIDATE_DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_unquoted(line, candidate))
            .collect();
        let consistent = counts[0] > 0 && counts.iter().all(|count| *count == counts[0]);
        if consistent && best.is_none_or(|(_, count)| counts[0] > count) {
            best = Some((candidate, counts[0]));
        }
    }
    if let Some((delimiter, _)) = best {
        return delimiter;
    }

    CANDIDATE_DELIMITERS
        .iter()
        .map(|candidate| (*candidate, count_unquoted(first, *candidate)))
        .filter(|(_, count)| *count > 0)
        .max_by_key(|(_, count)| *count)
        .map_or(',', |(delimiter, _)| delimiter)
}

fn count_unquoted(line: &str, delimiter: char) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

fn read_prefix(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut bytes = Vec::new();
    file.take(SNIFF_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    if bytes.len() as u64 == SNIFF_BYTES {
        // Drop the partial last line.
        if let Some(end) = text.rfind('\n') {
            return Ok(text[..end].to_string());
        }
    }
    Ok(text)
}

/// Profile a CSV file, sniffing the delimiter unless one is given.
pub fn profile_csv(path: &Path, delimiter: Option<char>) -> Result<CsvProfile> {
    let delimiter = match delimiter {
        Some(delimiter) => delimiter,
        None => sniff_delimiter(&read_prefix(path)?),
    };
    if !delimiter.is_ascii() {
        return Err(IngestError::UnsupportedDelimiter { delimiter });
    }

    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(file);
    let csv_error = |source| IngestError::CsvParse {
        path: path.to_path_buf(),
        source,
    };

    let raw_headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();
    if raw_headers.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    let headers = dedupe_headers(&raw_headers);

    let mut nulls = vec![0usize; headers.len()];
    let mut preview = Vec::new();
    let mut row_count = 0usize;
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        row_count += 1;
        if row_count <= PROFILE_SAMPLE_ROWS {
            for (idx, count) in nulls.iter_mut().enumerate() {
                let is_null = record
                    .get(idx)
                    .is_none_or(|value| DEFAULT_NULL_TOKENS.contains(&value));
                if is_null {
                    *count += 1;
                }
            }
        }
        if preview.len() < PREVIEW_ROWS {
            preview.push(
                (0..headers.len())
                    .map(|idx| {
                        record
                            .get(idx)
                            .filter(|value| !DEFAULT_NULL_TOKENS.contains(value))
                            .map(str::to_string)
                    })
                    .collect(),
            );
        }
    }
    debug!(path = %path.display(), rows = row_count, "profiled csv");

    Ok(CsvProfile {
        delimiter,
        null_counts: headers.iter().cloned().zip(nulls).collect(),
        headers,
        row_count,
        sampled_rows: row_count.min(PROFILE_SAMPLE_ROWS),
        preview,
    })
}

/// Render a profile as a Markdown report.
pub fn render_markdown(profile: &CsvProfile, source: &Path) -> String {
    let delimiter = match profile.delimiter {
        '\t' => "\\t".to_string(),
        other => other.to_string(),
    };
    let mut lines = vec![
        "# CSV Profile".to_string(),
        format!("- **Path:** `{}`", source.display()),
        format!("- **Delimiter:** `{delimiter}`"),
        format!("- **Rows:** {}", profile.row_count),
        format!("- **Columns ({}):**", profile.headers.len()),
        String::new(),
    ];
    lines.extend(profile.headers.iter().map(|header| format!("  - `{header}`")));

    lines.push(String::new());
    lines.push(format!("## Sample (first {PREVIEW_ROWS} rows)"));
    lines.push(String::new());
    lines.push(format!(
        "| {} |",
        escape_row(profile.headers.iter().map(String::as_str))
    ));
    lines.push(format!("|{}|", vec!["---"; profile.headers.len()].join("|")));
    lines.extend(profile.preview.iter().map(|row| {
        let cells = row.iter().map(|cell| cell.as_deref().unwrap_or(""));
        format!("| {} |", escape_row(cells))
    }));

    lines.push(String::new());
    lines.push(format!(
        "## Null count (in first {} rows)",
        profile.sampled_rows
    ));
    lines.push(String::new());
    lines.push("| column | nulls |".to_string());
    lines.push("|---|---:|".to_string());
    lines.extend(
        profile
            .null_counts
            .iter()
            .map(|(column, count)| format!("| {} | {count} |", escape_cell(column))),
    );

    let mut md = lines.join("\n");
    md.push('\n');
    md
}

fn escape_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    cells.map(escape_cell).collect::<Vec<_>>().join(" | ")
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

/// Write the Markdown report to `<out_dir>/<source stem>.md`.
pub fn write_profile_report(profile: &CsvProfile, source: &Path, out_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).map_err(|source| IngestError::FileWrite {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let stem = source
        .file_stem()
        .map_or_else(|| "profile".to_string(), |stem| stem.to_string_lossy().into_owned());
    let out_path = out_dir.join(format!("{stem}.md"));
    fs::write(&out_path, render_markdown(profile, source)).map_err(|source| {
        IngestError::FileWrite {
            path: out_path.clone(),
            source,
        }
    })?;
    info!(path = %out_path.display(), "wrote profile report");
    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_consistent_delimiter() {
        assert_eq!(sniff_delimiter("a;b;c\n1;2;3\n4;5;6\n"), ';');
        assert_eq!(sniff_delimiter("a\tb\n1\t2\n"), '\t');
        assert_eq!(sniff_delimiter("a|b\n1|2\n"), '|');
    }

    #[test]
    fn quoted_commas_do_not_confuse_sniffing() {
        let sample = "name;amount\n\"Smith, J\";\"1,000\"\n\"Doe, A\";\"2,500\"\n";
        assert_eq!(sniff_delimiter(sample), ';');
    }

    #[test]
    fn sniff_falls_back_to_comma() {
        assert_eq!(sniff_delimiter(""), ',');
        assert_eq!(sniff_delimiter("single\nvalue\n"), ',');
    }

    #[test]
    fn escapes_pipes_in_cells() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
    }
}
