//! Batched, order-preserving parallel line processing.
//!
//! Lines are read in fixed-size batches in file order. Each batch is decoded and
//! transformed on the run's worker pool, then handed to the sink on the calling
//! thread in input order before the next batch is read.

use std::io::BufRead;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::validation::{validate_batch_size, validate_threads, DEFAULT_BATCH_SIZE};

/// Worker pool and batch sizing for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Lines per batch
    pub batch_size: usize,
    /// Worker threads; `None` for one per logical CPU
    pub threads: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            threads: None,
        }
    }
}

/// Counters reported by [`BatchPipeline::run`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Non-blank lines transformed
    pub lines: u64,
    pub batches: u64,
}

pub struct BatchPipeline {
    batch_size: usize,
    pool: ThreadPool,
}

impl BatchPipeline {
    /// Build a pipeline with its own worker pool.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for a zero batch size or thread count, or if the
    /// pool cannot be started.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let batch_size = validate_batch_size(config.batch_size)?;
        let mut builder = ThreadPoolBuilder::new();
        if let Some(threads) = validate_threads(config.threads)? {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| Error::Configuration(format!("failed to start worker pool: {e}")))?;
        Ok(Self { batch_size, pool })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Stream the remaining lines of `reader` through `transform` into `sink`.
    ///
    /// `lines_before` is the number of physical lines already consumed (the header),
    /// so the line numbers passed to `transform` are 1-based positions in the file.
    /// Blank lines are skipped. The first error from any line, or from the sink,
    /// stops the run; results of the failing batch are not handed to the sink.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` on read failure, `Error::MalformedRecord` for a line that
    /// is not valid UTF-8, and any error from `transform` or `sink`.
    pub fn run<R, T, F, S>(
        &self,
        reader: &mut R,
        lines_before: usize,
        transform: F,
        mut sink: S,
    ) -> Result<BatchStats>
    where
        R: BufRead,
        T: Send,
        F: Fn(&str, usize) -> Result<T> + Sync,
        S: FnMut(T) -> Result<()>,
    {
        let mut stats = BatchStats::default();
        let mut line_num = lines_before;

        loop {
            let batch = read_batch(reader, self.batch_size, &mut line_num)?;
            if batch.is_empty() {
                break;
            }

            let results: Vec<Option<T>> = self.pool.install(|| {
                batch
                    .par_iter()
                    .map(|(num, bytes)| decode_and_transform(bytes, *num, &transform))
                    .collect::<Result<Vec<_>>>()
            })?;

            stats.batches += 1;
            for item in results.into_iter().flatten() {
                stats.lines += 1;
                sink(item)?;
            }
            debug!(
                batch = stats.batches,
                last_line = line_num,
                records = stats.lines,
                "processed batch"
            );
        }

        Ok(stats)
    }
}

fn read_batch<R: BufRead>(
    reader: &mut R,
    batch_size: usize,
    line_num: &mut usize,
) -> Result<Vec<(usize, Vec<u8>)>> {
    let mut batch = Vec::with_capacity(batch_size);
    while batch.len() < batch_size {
        let mut buf = Vec::new();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        *line_num += 1;
        batch.push((*line_num, buf));
    }
    Ok(batch)
}

fn decode_and_transform<T, F>(bytes: &[u8], line_num: usize, transform: &F) -> Result<Option<T>>
where
    F: Fn(&str, usize) -> Result<T>,
{
    let line = std::str::from_utf8(bytes).map_err(|e| {
        Error::malformed(
            line_num,
            "line",
            String::from_utf8_lossy(bytes).trim_end(),
            format!("is not valid UTF-8: {e}"),
        )
    })?;
    let line = line.trim_end_matches(['\n', '\r']);
    if line.trim().is_empty() {
        return Ok(None);
    }
    transform(line, line_num).map(Some)
}
