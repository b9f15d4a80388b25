//! Minimal FASTA input adapter.
//!
//! Reads multi-record FASTA (or headerless plain text, treated as a single
//! record named after the file). Whitespace inside sequence lines is
//! stripped; everything else is passed through untouched. Alphabet
//! validation and normalization belong to the engine, which knows how to
//! report them per sequence instead of aborting the file.

use anyhow::{Context, Result, bail};
use std::path::Path;

/// Parse a file into `(seq_id, raw bytes)` records, input order preserved.
pub fn read_fasta(path: &Path) -> Result<Vec<(String, Vec<u8>)>> {
    let data = std::fs::read(path)
        .with_context(|| format!("reading sequence file {}", path.display()))?;
    let fallback_id = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "seq".to_string());
    parse(&data, &fallback_id)
}

fn parse(data: &[u8], fallback_id: &str) -> Result<Vec<(String, Vec<u8>)>> {
    let mut records: Vec<(String, Vec<u8>)> = Vec::new();
    let mut current: Option<(String, Vec<u8>)> = None;

    for line in data.split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        if line[0] == b'>' {
            if let Some(done) = current.take() {
                records.push(done);
            }
            let header = String::from_utf8_lossy(&line[1..]);
            let id = header
                .split_whitespace()
                .next()
                .unwrap_or(fallback_id)
                .to_string();
            if id.is_empty() {
                bail!("empty FASTA header");
            }
            current = Some((id, Vec::new()));
        } else {
            if current.is_none() {
                // Headerless input: one implicit record.
                current = Some((fallback_id.to_string(), Vec::new()));
            }
            if let Some((_, bytes)) = current.as_mut() {
                bytes.extend(line.iter().filter(|b| !b.is_ascii_whitespace()));
            }
        }
    }
    if let Some(done) = current.take() {
        records.push(done);
    }
    if records.is_empty() {
        bail!("no sequences found");
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_record_fasta() {
        let recs = parse(b">chr1 human\nACGT\nACGT\n>chr2\nTTTT\n", "f").unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0], ("chr1".to_string(), b"ACGTACGT".to_vec()));
        assert_eq!(recs[1], ("chr2".to_string(), b"TTTT".to_vec()));
    }

    #[test]
    fn headerless_plain_text() {
        let recs = parse(b"ACGTACGT\nACGT\n", "myfile").unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].0, "myfile");
        assert_eq!(recs[0].1, b"ACGTACGTACGT");
    }

    #[test]
    fn crlf_and_blank_lines() {
        let recs = parse(b">a\r\nAC GT\r\n\r\nACGT\r\n", "f").unwrap();
        assert_eq!(recs[0].1, b"ACGTACGT");
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(parse(b"", "f").is_err());
        assert!(parse(b"\n\n", "f").is_err());
    }
}
