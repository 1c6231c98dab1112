//! UCSC chain file parser.
//!
//! A chain aligns a region of the source assembly (the chain "target") to the
//! destination assembly (the chain "query"):
//!
//! ```text
//! chain score tName tSize tStrand tStart tEnd qName qSize qStrand qStart qEnd id
//! size dt dq
//! ...
//! size
//! ```
//!
//! Chain coordinates are 0-based half-open. [`ChainLookup`] works in 1-based
//! positions, so [`ChainFile`] converts on the way in and out.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use tracing::info;

use crate::liftover::ChainLookup;
use crate::parsing::{open_input, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    fn parse(s: &str, line_num: usize) -> Result<Self, ParseError> {
        match s {
            "+" => Ok(Strand::Plus),
            "-" => Ok(Strand::Minus),
            _ => Err(ParseError::InvalidFormat(format!(
                "Invalid strand '{s}' at line {line_num}"
            ))),
        }
    }
}

/// A single chain (alignment between two sequences).
#[derive(Debug, Clone)]
pub struct Chain {
    pub id: u64,
    pub score: u64,
    /// Source contig
    pub target_name: String,
    pub target_start: u64,
    pub target_end: u64,
    /// Destination contig
    pub query_name: String,
    pub query_size: u64,
    pub query_strand: Strand,
    pub query_start: u64,
    pub blocks: Vec<ChainBlock>,
}

/// An ungapped alignment block followed by the gaps before the next one.
#[derive(Debug, Clone, Copy)]
pub struct ChainBlock {
    pub size: u64,
    pub target_gap: u64,
    pub query_gap: u64,
}

impl Chain {
    pub fn contains_target_pos(&self, pos: u64) -> bool {
        pos >= self.target_start && pos < self.target_end
    }

    /// Lift a 0-based source position to a 0-based destination position.
    ///
    /// Returns None if the position falls in a gap or outside the chain, or if a
    /// minus-strand position would land before the start of the destination contig.
    pub fn lift_position(&self, target_pos: u64) -> Option<u64> {
        if !self.contains_target_pos(target_pos) {
            return None;
        }

        let mut t_pos = self.target_start;
        let mut q_pos = self.query_start;

        for block in &self.blocks {
            let block_end = t_pos + block.size;

            if target_pos < block_end {
                let offset = target_pos - t_pos;
                return match self.query_strand {
                    Strand::Plus => Some(q_pos + offset),
                    Strand::Minus => self.query_size.checked_sub(q_pos + offset + 1),
                };
            }

            t_pos = block_end + block.target_gap;
            q_pos += block.size + block.query_gap;

            if target_pos < t_pos {
                return None;
            }
        }

        None
    }
}

/// Chains indexed by source contig
#[derive(Debug, Clone, Default)]
pub struct ChainFile {
    chains: HashMap<String, Vec<Chain>>,
}

impl ChainFile {
    /// Load a chain file (plain or `.gz`).
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the file cannot be read and
    /// `ParseError::InvalidFormat` for malformed header or block lines.
    pub fn from_file(path: &Path) -> Result<Self, ParseError> {
        let chains = Self::parse(open_input(path)?)?;
        info!(
            path = %path.display(),
            chains = chains.chain_count(),
            "loaded chain file"
        );
        Ok(chains)
    }

    /// Parse chains from a reader.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidFormat` for malformed header or block lines.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, ParseError> {
        let mut chains = ChainFile::default();
        let mut current: Option<Chain> = None;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_num = i + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with("chain") {
                if let Some(chain) = current.take() {
                    chains.add_chain(chain);
                }
                current = Some(parse_chain_header(line, line_num)?);
            } else if let Some(chain) = current.as_mut() {
                chain.blocks.push(parse_block(line, line_num)?);
            } else {
                return Err(ParseError::InvalidFormat(format!(
                    "Alignment block before any chain header at line {line_num}"
                )));
            }
        }

        if let Some(chain) = current {
            chains.add_chain(chain);
        }

        // Lookup order: best score first, then chain id
        for list in chains.chains.values_mut() {
            list.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
        }

        Ok(chains)
    }

    pub fn add_chain(&mut self, chain: Chain) {
        self.chains
            .entry(chain.target_name.clone())
            .or_default()
            .push(chain);
    }

    pub fn chain_count(&self) -> usize {
        self.chains.values().map(Vec::len).sum()
    }
}

impl ChainLookup for ChainFile {
    fn lookup(&self, contig: &str, position: u64) -> Vec<(String, u64)> {
        let Some(target_pos) = position.checked_sub(1) else {
            return Vec::new();
        };
        self.chains
            .get(contig)
            .map(|chains| {
                chains
                    .iter()
                    .filter_map(|chain| {
                        chain
                            .lift_position(target_pos)
                            .map(|q| (chain.query_name.clone(), q + 1))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn parse_u64(value: &str, what: &str, line_num: usize) -> Result<u64, ParseError> {
    value
        .parse::<u64>()
        .map_err(|_| ParseError::InvalidFormat(format!("Invalid {what} '{value}' at line {line_num}")))
}

fn parse_chain_header(line: &str, line_num: usize) -> Result<Chain, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 12 {
        return Err(ParseError::InvalidFormat(format!(
            "Invalid chain header at line {line_num}: expected 12+ fields, got {}",
            parts.len()
        )));
    }

    // Source coordinates are always given on the plus strand
    if Strand::parse(parts[4], line_num)? != Strand::Plus {
        return Err(ParseError::InvalidFormat(format!(
            "Source strand must be '+' at line {line_num}"
        )));
    }

    let target_size = parse_u64(parts[3], "source size", line_num)?;
    let target_start = parse_u64(parts[5], "source start", line_num)?;
    let target_end = parse_u64(parts[6], "source end", line_num)?;
    let query_size = parse_u64(parts[8], "destination size", line_num)?;
    let query_start = parse_u64(parts[10], "destination start", line_num)?;
    let query_end = parse_u64(parts[11], "destination end", line_num)?;
    check_span("source", target_start, target_end, target_size, line_num)?;
    check_span("destination", query_start, query_end, query_size, line_num)?;

    Ok(Chain {
        id: parts
            .get(12)
            .map(|id| parse_u64(id, "chain id", line_num))
            .transpose()?
            .unwrap_or(0),
        score: parse_u64(parts[1], "score", line_num)?,
        target_name: parts[2].to_string(),
        target_start,
        target_end,
        query_name: parts[7].to_string(),
        query_size,
        query_strand: Strand::parse(parts[9], line_num)?,
        query_start,
        blocks: Vec::new(),
    })
}

/// `start <= end <= size`
fn check_span(
    side: &str,
    start: u64,
    end: u64,
    size: u64,
    line_num: usize,
) -> Result<(), ParseError> {
    if start > end || end > size {
        return Err(ParseError::InvalidFormat(format!(
            "Invalid {side} span {start}-{end} for size {size} at line {line_num}"
        )));
    }
    Ok(())
}

fn parse_block(line: &str, line_num: usize) -> Result<ChainBlock, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let size = parse_u64(parts[0], "block size", line_num)?;

    // Last block only has size
    let (target_gap, query_gap) = match parts.len() {
        1 => (0, 0),
        3 => (
            parse_u64(parts[1], "source gap", line_num)?,
            parse_u64(parts[2], "destination gap", line_num)?,
        ),
        n => {
            return Err(ParseError::InvalidFormat(format!(
                "Alignment block at line {line_num} has {n} fields, expected 1 or 3"
            )))
        }
    };

    Ok(ChainBlock {
        size,
        target_gap,
        query_gap,
    })
}
