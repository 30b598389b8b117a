use tracing::debug;

use crate::InterpreterError;

/// Marks table slots that do not hold a bracket.
const NO_PARTNER: usize = usize::MAX;

/// Position-indexed loop correspondence.
///
/// For every `[` or `]` in the source, `partners[i]` holds the position of the
/// matching bracket. Built by [`match_brackets`]; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopTable {
    partners: Vec<usize>,
    loops: usize,
    deepest: usize,
}

impl LoopTable {
    /// Position of the bracket matching the one at `pos`, or `None` if `pos`
    /// is not a bracket.
    pub fn partner(&self, pos: usize) -> Option<usize> {
        match self.partners.get(pos) {
            Some(&p) if p != NO_PARTNER => Some(p),
            _ => None,
        }
    }

    /// Jump target for a bracket the matcher has already seen.
    pub(crate) fn jump(&self, pos: usize) -> usize {
        self.partners[pos]
    }

    /// Number of `[`/`]` pairs.
    pub fn loop_count(&self) -> usize {
        self.loops
    }

    /// Deepest nesting reached anywhere in the program.
    pub fn deepest(&self) -> usize {
        self.deepest
    }

    /// Length of the source this table was built from.
    pub fn source_len(&self) -> usize {
        self.partners.len()
    }

    /// `(open, close)` pairs in order of their opening bracket.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.partners
            .iter()
            .enumerate()
            .filter(|&(open, &close)| close != NO_PARTNER && open < close)
            .map(|(open, &close)| (open, close))
    }
}

/// Match every `[` with its `]` in a single left-to-right scan.
///
/// Nesting is capped at `max_depth`; a `[` that would go deeper fails with
/// [`InterpreterError::LoopOverflow`]. A `]` with nothing open fails with
/// [`InterpreterError::LoopUnderflow`], and a `[` still open at the end of the
/// source fails with [`InterpreterError::UnmatchedOpen`] (the innermost one is
/// reported). Bytes other than brackets are ignored.
pub fn match_brackets(source: &[u8], max_depth: usize) -> Result<LoopTable, InterpreterError> {
    let mut partners: Vec<usize> = Vec::new();
    partners
        .try_reserve_exact(source.len())
        .map_err(|source| InterpreterError::OutOfMemory { what: "loop table", source })?;
    partners.resize(source.len(), NO_PARTNER);

    // Pending opens; the stack length is the current depth. It never holds
    // more entries than the source has `[` bytes.
    let opens = source.iter().filter(|&&b| b == b'[').count();
    let mut pending: Vec<usize> = Vec::new();
    pending
        .try_reserve_exact(max_depth.min(opens))
        .map_err(|source| InterpreterError::OutOfMemory { what: "loop stack", source })?;

    let mut loops = 0;
    let mut deepest = 0;

    for (ip, &byte) in source.iter().enumerate() {
        match byte {
            b'[' => {
                if pending.len() == max_depth {
                    return Err(InterpreterError::LoopOverflow { ip, limit: max_depth });
                }
                pending.push(ip);
                deepest = deepest.max(pending.len());
            }
            b']' => {
                let Some(open) = pending.pop() else {
                    return Err(InterpreterError::LoopUnderflow { ip });
                };
                partners[open] = ip;
                partners[ip] = open;
                loops += 1;
            }
            _ => {}
        }
    }

    if let Some(&ip) = pending.last() {
        return Err(InterpreterError::UnmatchedOpen { ip });
    }

    debug!(loops, deepest, len = source.len(), "matched brackets");
    Ok(LoopTable { partners, loops, deepest })
}
