use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::EvalError;
use crate::types::AlignedPair;

/// Write the gold and prediction files, one entry per block, blocks separated
/// by a single blank line, in identical order across both files. The scorer
/// re-parses both files independently and assumes entry `i` in one file is
/// entry `i` in the other, so no reordering or filtering happens here.
pub fn write_pairs(
    pairs: &[AlignedPair],
    gold_path: &Path,
    pred_path: &Path,
) -> Result<(), EvalError> {
    let mut gold = fs::File::create(gold_path).map_err(|e| EvalError::io("create gold file", e))?;
    let mut pred = fs::File::create(pred_path).map_err(|e| EvalError::io("create pred file", e))?;
    for pair in pairs {
        gold.write_all(pair.reference.as_bytes())
            .and_then(|_| gold.write_all(b"\n\n"))
            .map_err(|e| EvalError::io("write gold entry", e))?;
        pred.write_all(pair.generated.as_bytes())
            .and_then(|_| pred.write_all(b"\n\n"))
            .map_err(|e| EvalError::io("write pred entry", e))?;
    }
    Ok(())
}

/// Re-read a blank-line-delimited entry file as written by [`write_pairs`].
pub fn read_entries(path: &Path) -> Result<Vec<String>, EvalError> {
    let data = fs::read_to_string(path).map_err(|e| EvalError::io("read entry file", e))?;
    let mut entries = Vec::new();
    let mut current = String::new();
    for line in data.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                entries.push(std::mem::take(&mut current));
            }
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        entries.push(current);
    }
    Ok(entries)
}
