// CSV loading with delimiter sniffing

use crate::data::Table;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Bytes inspected when guessing the delimiter
pub const SNIFF_SAMPLE_BYTES: usize = 128 * 1024;
pub const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Fixed delimiter; sniffed from the input when `None`
    pub delimiter: Option<u8>,
    /// Stop after this many data rows
    pub max_rows: Option<usize>,
    /// Keep records whose field count differs from the header instead of skipping them
    pub keep_ragged: bool,
}

/// Read CSV data from stdin
pub fn read_csv_from_stdin(options: &ReadOptions) -> Result<Table> {
    read_csv(std::io::stdin().lock(), options)
}

/// Read CSV data from a file on disk
pub fn read_csv_file(path: &Path, options: &ReadOptions) -> Result<Table> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("CSV not found on disk: {}", path.display()))?;
    read_csv(file, options)
}

/// Read CSV data into a Table.
///
/// Invalid UTF-8 is replaced, a leading BOM is dropped and leading spaces after
/// a delimiter are trimmed. Records that cannot be parsed, or whose width
/// differs from the header (unless `keep_ragged`), are skipped.
pub fn read_csv<R: Read>(mut reader: R, options: &ReadOptions) -> Result<Table> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .context("Failed to read CSV input")?;

    let text = String::from_utf8_lossy(&bytes);
    let text: &str = text.strip_prefix('\u{feff}').unwrap_or(&*text);

    let delimiter = options.delimiter.unwrap_or_else(|| sniff_delimiter(text));
    debug!(delimiter = %(delimiter as char).escape_default(), "csv delimiter");

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.trim_start().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        anyhow::bail!("CSV input has no header row");
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut skipped = 0usize;
    for (idx, record) in csv_reader.records().enumerate() {
        if options.max_rows.is_some_and(|max| rows.len() >= max) {
            break;
        }
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!(row = idx + 1, error = %e, "skipping unreadable CSV record");
                skipped += 1;
                continue;
            }
        };
        if !options.keep_ragged && record.len() != headers.len() {
            debug!(
                row = idx + 1,
                fields = record.len(),
                expected = headers.len(),
                "skipping ragged CSV record"
            );
            skipped += 1;
            continue;
        }
        rows.push(record.iter().map(|f| f.trim_start().to_string()).collect());
    }

    if skipped > 0 {
        warn!(skipped, "skipped bad CSV lines");
    }

    Ok(Table::new(headers, rows))
}

/// Guess the delimiter from the start of the input.
///
/// Each candidate is scored by how many sampled lines share the most common
/// field count, then by that field count. Candidates that never split a line
/// are ignored; `,` wins when nothing qualifies.
pub fn sniff_delimiter(text: &str) -> u8 {
    let sample = sample_lines(text);
    if sample.is_empty() {
        return b',';
    }

    let mut best: Option<(usize, usize, u8)> = None;
    for &delim in &DELIMITER_CANDIDATES {
        let Some((consistent, width)) = modal_width(sample, delim) else {
            continue;
        };
        if width < 2 {
            continue;
        }
        let better = match best {
            None => true,
            Some((c, w, _)) => (consistent, width) > (c, w),
        };
        if better {
            best = Some((consistent, width, delim));
        }
    }

    best.map(|(_, _, d)| d).unwrap_or(b',')
}

/// Sample prefix cut back to the last complete line
fn sample_lines(text: &str) -> &str {
    if text.len() <= SNIFF_SAMPLE_BYTES {
        return text;
    }
    let mut end = SNIFF_SAMPLE_BYTES;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let prefix = &text[..end];
    match prefix.rfind('\n') {
        Some(pos) => &prefix[..pos],
        None => prefix,
    }
}

/// (lines with the modal width, modal width)
fn modal_width(sample: &str, delimiter: u8) -> Option<(usize, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(sample.as_bytes());

    let mut widths: std::collections::HashMap<usize, usize> = std::collections::HashMap::new();
    for record in reader.records().flatten() {
        *widths.entry(record.len()).or_insert(0) += 1;
    }

    widths
        .into_iter()
        .map(|(width, lines)| (lines, width))
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> Table {
        read_csv(text.as_bytes(), &ReadOptions::default()).unwrap()
    }

    #[test]
    fn test_reads_comma_csv() {
        let t = read("x,y\n1,10\n2,20\n");
        assert_eq!(t.headers, vec!["x", "y"]);
        assert_eq!(t.rows, vec![vec!["1", "10"], vec!["2", "20"]]);
    }

    #[test]
    fn test_sniffs_semicolon() {
        let t = read("name; score\nAlice; 1,5\nBob; 2,0\n");
        assert_eq!(t.headers, vec!["name", "score"]);
        assert_eq!(t.rows[0], vec!["Alice", "1,5"]);
    }

    #[test]
    fn test_sniffs_tab_and_pipe() {
        assert_eq!(sniff_delimiter("a\tb\tc\n1\t2\t3\n"), b'\t');
        assert_eq!(sniff_delimiter("a|b\n1|2\n"), b'|');
        assert_eq!(sniff_delimiter("single\nvalue\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn test_quoted_delimiters_do_not_confuse_sniffing() {
        let text = "city,note\n\"Paris; FR\",ok\n\"Rome; IT\",ok\n";
        assert_eq!(sniff_delimiter(text), b',');
    }

    #[test]
    fn test_strips_bom() {
        let t = read("\u{feff}id,val\n1,2\n");
        assert_eq!(t.headers[0], "id");
    }

    #[test]
    fn test_skips_ragged_lines() {
        let t = read("a,b\n1,2\n3\n4,5,6\n7,8\n");
        assert_eq!(t.rows, vec![vec!["1", "2"], vec!["7", "8"]]);

        let opts = ReadOptions { keep_ragged: true, ..ReadOptions::default() };
        let t = read_csv("a,b\n1,2\n3\n".as_bytes(), &opts).unwrap();
        assert_eq!(t.rows[1], vec!["3"]);
    }

    #[test]
    fn test_max_rows() {
        let opts = ReadOptions { max_rows: Some(2), ..ReadOptions::default() };
        let t = read_csv("n\n1\n2\n3\n".as_bytes(), &opts).unwrap();
        assert_eq!(t.rows.len(), 2);
    }

    #[test]
    fn test_header_only() {
        let t = read("x,y\n");
        assert_eq!(t.headers.len(), 2);
        assert!(t.rows.is_empty());
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(read_csv("".as_bytes(), &ReadOptions::default()).is_err());
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let bytes = b"name\ncaf\xe9\n";
        let t = read_csv(&bytes[..], &ReadOptions::default()).unwrap();
        assert_eq!(t.rows[0][0], "caf\u{fffd}");
    }
}
