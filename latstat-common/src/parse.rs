use std::io::BufRead;

use crate::{LatStatError, Measurement, Result};

/// Parse one `"<ttc_ns> <ttfb_ns>"` line. `line_no` is 1-based and only used in errors.
///
/// Blank lines yield `Ok(None)`. Anything other than exactly two integer
/// tokens is a [`LatStatError::MalformedLine`].
pub fn parse_line(line_no: usize, text: &str) -> Result<Option<Measurement>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let &[ttc, ttfb] = tokens.as_slice() else {
        return Err(malformed(
            line_no,
            text,
            format!("expected 2 fields, found {}", tokens.len()),
        ));
    };

    Ok(Some(Measurement {
        ttc_ns: parse_nanos(line_no, text, ttc)?,
        ttfb_ns: parse_nanos(line_no, text, ttfb)?,
    }))
}

/// Read every measurement from `reader`, preserving input order.
///
/// Stops at the first malformed line, including one that is not valid UTF-8;
/// nothing read so far is returned.
pub fn read_measurements<R: BufRead>(reader: R) -> Result<Vec<Measurement>> {
    let mut measurements = Vec::new();
    for (idx, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes.map_err(|e| LatStatError::Io {
            path: "<input>".to_string(),
            message: e.to_string(),
        })?;
        let line = String::from_utf8(bytes).map_err(|e| {
            malformed(
                idx + 1,
                &String::from_utf8_lossy(e.as_bytes()),
                format!("invalid UTF-8 ({})", e.utf8_error()),
            )
        })?;
        let text = line.strip_suffix('\r').unwrap_or(&line);
        if let Some(m) = parse_line(idx + 1, text)? {
            measurements.push(m);
        }
    }
    Ok(measurements)
}

fn parse_nanos(line_no: usize, text: &str, token: &str) -> Result<i64> {
    token
        .parse::<i64>()
        .map_err(|e| malformed(line_no, text, format!("invalid integer {token:?} ({e})")))
}

fn malformed(line_no: usize, text: &str, reason: String) -> LatStatError {
    LatStatError::MalformedLine {
        line: line_no,
        content: text.to_string(),
        reason,
    }
}
