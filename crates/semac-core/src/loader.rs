use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::CoreError;
use crate::state::{DurationType, StateId};
use crate::table::{TransitionRecord, TransitionTable};

/// Reserved output key; a state may not carry this name.
const TOTAL_NAME: &str = "Total";

const SEPARATOR: char = ';';

impl TransitionTable {
    /// Load a transition table from a `;`-separated UTF-8 file: three
    /// header rows (from-state, to-state, duration type) followed by one
    /// row of probabilities per duration index.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CoreError::FileUnopenable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(BufReader::new(file))
    }

    /// Parse the transition file format from any buffered reader.
    pub fn parse(reader: impl BufRead) -> Result<Self, CoreError> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|source| CoreError::FileUnopenable {
                path: Default::default(),
                source,
            })?;
            lines.push(line.trim_end_matches('\r').to_string());
        }
        parse_lines(&lines)
    }
}

fn split(line: &str) -> Vec<&str> {
    line.split(SEPARATOR).collect()
}

fn intern(
    name: &str,
    names: &mut Vec<String>,
    index: &mut HashMap<String, StateId>,
) -> Result<StateId, CoreError> {
    if name == TOTAL_NAME {
        return Err(CoreError::ReservedStateName {
            name: name.to_string(),
        });
    }
    if let Some(&id) = index.get(name) {
        return Ok(id);
    }
    let id = names.len() as StateId;
    names.push(name.to_string());
    index.insert(name.to_string(), id);
    Ok(id)
}

fn parse_lines(lines: &[String]) -> Result<TransitionTable, CoreError> {
    if lines.len() < 3 {
        return Err(CoreError::MalformedHeader {
            detail: format!("expected 3 header rows, found {}", lines.len()),
        });
    }

    let from_names = split(&lines[0]);
    let to_names = split(&lines[1]);
    let dtype_tokens = split(&lines[2]);

    let cols = from_names.len();
    if to_names.len() != cols || dtype_tokens.len() != cols {
        return Err(CoreError::MalformedHeader {
            detail: format!(
                "column counts disagree: {} from, {} to, {} duration",
                cols,
                to_names.len(),
                dtype_tokens.len()
            ),
        });
    }

    // Assign dense ids in order of first appearance, walking the from/to
    // pair column by column.
    let mut names: Vec<String> = Vec::new();
    let mut index: HashMap<String, StateId> = HashMap::new();
    let mut froms = Vec::with_capacity(cols);
    let mut tos = Vec::with_capacity(cols);
    for i in 0..cols {
        froms.push(intern(from_names[i], &mut names, &mut index)?);
        tos.push(intern(to_names[i], &mut names, &mut index)?);
    }

    let mut dtypes = Vec::with_capacity(cols);
    for (i, token) in dtype_tokens.iter().enumerate() {
        let dt = DurationType::parse(token).ok_or_else(|| CoreError::UnknownDurationType {
            token: token.to_string(),
            column: i + 1,
        })?;
        dtypes.push(dt);
    }

    // Column-major probability collection; row count defines every
    // column's length.
    let mut prob_cols: Vec<Vec<f64>> = vec![Vec::new(); cols];
    let mut data_row = 0usize;
    for line in &lines[3..] {
        if line.trim().is_empty() {
            continue;
        }
        data_row += 1;
        let fields = split(line);
        if fields.len() != cols {
            return Err(CoreError::MalformedRow {
                row: data_row,
                found: fields.len(),
                expected: cols,
            });
        }
        for (i, field) in fields.iter().enumerate() {
            let value: f64 = field
                .trim()
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite())
                .ok_or_else(|| CoreError::NonNumericProbability {
                    token: field.to_string(),
                    row: data_row,
                    column: i + 1,
                })?;
            if value < 0.0 {
                return Err(CoreError::NegativeProbability {
                    value,
                    row: data_row,
                    column: i + 1,
                });
            }
            prob_cols[i].push(value);
        }
    }

    // Pack probabilities into one flat buffer; each record keeps its
    // (offset, length) window.
    let mut all_probs = Vec::with_capacity(cols * data_row);
    let mut records = Vec::with_capacity(cols);
    for i in 0..cols {
        let offset = all_probs.len() as u32;
        let length = prob_cols[i].len() as u32;
        all_probs.extend_from_slice(&prob_cols[i]);
        records.push(TransitionRecord {
            from: froms[i],
            to: tos[i],
            dtype: dtypes[i],
            offset,
            length,
        });
    }

    // Stable sort keeps input column order within a state; that order is
    // the cumulative-walk tie-break.
    records.sort_by_key(|r| r.from);

    let n_states = names.len();
    let mut state_begin = vec![0u32; n_states];
    let mut state_end = vec![0u32; n_states];
    let mut i = 0;
    while i < records.len() {
        let s = records[i].from;
        let mut j = i;
        while j < records.len() && records[j].from == s {
            if records[j].dtype != records[i].dtype {
                return Err(CoreError::MixedDurationTypes {
                    name: names[s as usize].clone(),
                });
            }
            j += 1;
        }
        state_begin[s as usize] = i as u32;
        state_end[s as usize] = j as u32;
        i = j;
    }

    let b_id = index.get("B").copied();

    Ok(TransitionTable {
        names,
        index,
        records,
        all_probs,
        state_begin,
        state_end,
        b_id,
    })
}
