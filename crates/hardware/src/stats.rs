//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters a cache hierarchy run produces. It provides:
//! 1. **Per-level counters:** Reads, writes, their misses, writebacks and back-invalidations.
//! 2. **Miss rate:** Derived per level, with the forced-zero rule described on [`LevelStats::miss_rate`].
//! 3. **Memory traffic:** Fetches from and writebacks to the backing store.
//! 4. **Reports:** A sectioned text report and a JSON document.

use std::io::{self, Write};

use serde::Serialize;

/// Counters for one cache level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    /// Read accesses that reached this level.
    pub reads: u64,
    /// Reads not satisfied by this level.
    pub read_misses: u64,
    /// Write accesses that reached this level, including writebacks from above.
    pub writes: u64,
    /// Writes not satisfied by this level.
    pub write_misses: u64,
    /// Dirty blocks evicted from this level.
    pub writebacks: u64,
    /// Blocks invalidated here to keep an inclusive hierarchy consistent.
    pub invalidations: u64,
}

impl LevelStats {
    /// Reads plus writes.
    pub const fn accesses(&self) -> u64 {
        self.reads + self.writes
    }

    /// Read misses plus write misses.
    pub const fn misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    /// Accesses satisfied by this level.
    pub const fn hits(&self) -> u64 {
        self.accesses().saturating_sub(self.misses())
    }

    /// Miss rate of the level.
    ///
    /// `(read_misses + write_misses) / (reads + writes)`, except that the rate
    /// is reported as exactly 0 when there were no accesses, or when either
    /// miss counter is 0. Report consumers depend on this rule, so a level
    /// with only read misses reports 0.
    pub fn miss_rate(&self) -> f64 {
        if self.accesses() == 0 || self.read_misses == 0 || self.write_misses == 0 {
            return 0.0;
        }
        self.misses() as f64 / self.accesses() as f64
    }
}

/// Statistics for a whole run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    /// One entry per present level, L1 first.
    pub levels: Vec<LevelStats>,
    /// Blocks fetched from or written back to memory.
    pub memory_traffic: u64,
    /// Trace accesses simulated.
    pub accesses: u64,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"levels"`, `"memory"`.
/// Pass an empty slice to `write_sections` to write all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "levels", "memory"];

const RULE: &str = "==========================================================";
const THIN_RULE: &str = "----------------------------------------------------------";

#[derive(Serialize)]
struct LevelReport<'a> {
    level: usize,
    #[serde(flatten)]
    counters: &'a LevelStats,
    miss_rate: f64,
}

#[derive(Serialize)]
struct Report<'a> {
    accesses: u64,
    memory_traffic: u64,
    levels: Vec<LevelReport<'a>>,
}

impl SimStats {
    /// Creates zeroed statistics for `levels` cache levels.
    pub fn new(levels: usize) -> Self {
        Self {
            levels: vec![LevelStats::default(); levels],
            memory_traffic: 0,
            accesses: 0,
        }
    }

    /// Counters of the 0-based level `index`, if present.
    pub fn level(&self, index: usize) -> Option<&LevelStats> {
        self.levels.get(index)
    }

    /// Writes the requested report sections.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to write every section.
    ///
    /// # Errors
    ///
    /// Propagates failures of `out`.
    pub fn write_sections<W: Write>(&self, out: &mut W, sections: &[String]) -> io::Result<()> {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        writeln!(out, "{RULE}")?;
        writeln!(out, "CACHE HIERARCHY SIMULATION STATISTICS")?;
        writeln!(out, "{RULE}")?;
        if want("summary") {
            let l1_hits = self.levels.first().map_or(0, LevelStats::hits);
            writeln!(out, "accesses                 {}", self.accesses)?;
            writeln!(out, "levels                   {}", self.levels.len())?;
            writeln!(out, "l1_hits                  {l1_hits}")?;
            writeln!(out, "{THIN_RULE}")?;
        }
        if want("levels") {
            for (i, s) in self.levels.iter().enumerate() {
                let n = i + 1;
                writeln!(out, "L{n} CACHE")?;
                writeln!(out, "  l{n}.reads              {}", s.reads)?;
                writeln!(out, "  l{n}.read_misses        {}", s.read_misses)?;
                writeln!(out, "  l{n}.writes             {}", s.writes)?;
                writeln!(out, "  l{n}.write_misses       {}", s.write_misses)?;
                writeln!(out, "  l{n}.miss_rate          {:.6}", s.miss_rate())?;
                writeln!(out, "  l{n}.writebacks         {}", s.writebacks)?;
                writeln!(out, "  l{n}.invalidations      {}", s.invalidations)?;
                writeln!(out, "{THIN_RULE}")?;
            }
        }
        if want("memory") {
            writeln!(out, "MEMORY")?;
            writeln!(out, "  memory_traffic         {}", self.memory_traffic)?;
        }
        writeln!(out, "{RULE}")
    }

    /// Prints only the requested statistics sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        let stdout = io::stdout();
        if let Err(e) = self.write_sections(&mut stdout.lock(), sections) {
            tracing::warn!(error = %e, "failed to write statistics report");
        }
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }

    /// Serializes the statistics, including derived miss rates, as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let report = Report {
            accesses: self.accesses,
            memory_traffic: self.memory_traffic,
            levels: self
                .levels
                .iter()
                .enumerate()
                .map(|(i, counters)| LevelReport {
                    level: i + 1,
                    counters,
                    miss_rate: counters.miss_rate(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&report)
    }
}
