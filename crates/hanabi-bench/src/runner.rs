use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use hanabi_bot::{DecisionError, RulePolicy};
use hanabi_core::model::action::Action;
use hanabi_core::model::deck::Deck;
use hanabi_core::model::observation::Observation;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchmarkConfig, ResolvedOutputs};
use crate::deals::{DealError, opening_observation};

/// Feeds observations to the configured agent and records each decision.
pub struct DecisionRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    policy: RulePolicy,
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub observations: usize,
    pub decisions: usize,
    pub hints: usize,
    pub idle: usize,
    pub rule_counts: BTreeMap<String, usize>,
    pub avg_us_per_decision: f64,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

/// Where an observation came from, for error reports and output rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservationSource {
    File { line: usize },
    Deal { index: usize, seed: u64 },
}

impl std::fmt::Display for ObservationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObservationSource::File { line } => write!(f, "file:{line}"),
            ObservationSource::Deal { index, .. } => write!(f, "deal:{index}"),
        }
    }
}

#[derive(Debug, Serialize)]
struct DecisionRow<'a> {
    run_id: &'a str,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    deal_seed: Option<u64>,
    action: Option<Action>,
    rule: Option<&'static str>,
    code: Option<i32>,
    position: Option<usize>,
}

impl DecisionRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        config.agent.chromosome.validate()?;
        if !config.agent.chromosome.has_fallback() {
            event!(
                target: "hanabi_bench::config",
                Level::WARN,
                run_id = %config.run_id,
                chromosome = %config.agent.chromosome,
                "chromosome has no unconditional play; some turns may find no rule"
            );
        }
        let policy = RulePolicy::new(config.agent.clone());
        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            policy,
        })
    }

    pub fn policy(&self) -> &RulePolicy {
        &self.policy
    }

    /// Every configured observation: recorded ones first, then dealt ones.
    pub fn collect_observations(&self) -> Result<Vec<(ObservationSource, Observation)>, RunnerError> {
        let mut observations = Vec::new();

        if let Some(input) = self.config.input.as_ref() {
            observations.extend(read_observations(&input.observations)?);
        }

        if let Some(deals) = self.config.deals.as_ref() {
            let mut rng = StdRng::seed_from_u64(deals.seed.unwrap_or(0));
            for index in 0..deals.count {
                let seed = rng.next_u64();
                let mut deck = Deck::shuffled_with_seed(seed);
                let observation = opening_observation(
                    &mut deck,
                    deals.players,
                    self.policy.information_token_cap(),
                )?;
                observations.push((ObservationSource::Deal { index, seed }, observation));
            }
        }

        Ok(observations)
    }

    /// Decide on every observation and write the JSONL rows.
    ///
    /// Stops at the first decision error: all of them point at a broken
    /// chromosome or input rather than something worth retrying. Rows are
    /// buffered so a failed run leaves no partial output behind.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        let observations = self.collect_observations()?;

        let mut rows: Vec<u8> = Vec::new();
        let mut rule_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut decisions = 0usize;
        let mut hints = 0usize;
        let mut idle = 0usize;
        let mut elapsed = Duration::ZERO;

        for (source, observation) in &observations {
            let start = Instant::now();
            let decision =
                self.policy
                    .decide(observation)
                    .map_err(|err| RunnerError::Decision {
                        source_label: source.to_string(),
                        source: err,
                    })?;
            elapsed += start.elapsed();

            let row = DecisionRow {
                run_id: &self.config.run_id,
                source: source.to_string(),
                deal_seed: match source {
                    ObservationSource::Deal { seed, .. } => Some(*seed),
                    ObservationSource::File { .. } => None,
                },
                action: decision.map(|d| d.action),
                rule: decision.map(|d| d.rule.label()),
                code: decision.map(|d| d.code),
                position: decision.map(|d| d.position),
            };
            serde_json::to_writer(&mut rows, &row)?;
            rows.write_all(b"\n")?;

            match decision {
                Some(decision) => {
                    decisions += 1;
                    if decision.action.is_hint() {
                        hints += 1;
                    }
                    *rule_counts
                        .entry(decision.rule.label().to_string())
                        .or_default() += 1;
                    if self.logging_enabled && tracing::enabled!(Level::INFO) {
                        event!(
                            target: "hanabi_bench::decision",
                            Level::INFO,
                            run_id = %self.config.run_id,
                            source = %source,
                            rule = decision.rule.label(),
                            action = %decision.action,
                        );
                    }
                }
                None => idle += 1,
            }
        }

        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;
        fs::write(&self.outputs.jsonl, rows)?;

        let avg_us_per_decision = if observations.is_empty() {
            0.0
        } else {
            elapsed.as_secs_f64() * 1_000_000.0 / observations.len() as f64
        };

        let summary = RunSummary {
            observations: observations.len(),
            decisions,
            hints,
            idle,
            rule_counts,
            avg_us_per_decision,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        };
        write_markdown(&summary, &self.config, &self.outputs.summary_md)?;
        Ok(summary)
    }
}

fn read_observations(path: &Path) -> Result<Vec<(ObservationSource, Observation)>, RunnerError> {
    let file = File::open(path).map_err(|source| RunnerError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    let mut observations = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let number = index + 1;
        let observation =
            Observation::from_json(&line).map_err(|source| RunnerError::Observation {
                path: path.to_path_buf(),
                line: number,
                source,
            })?;
        observations.push((ObservationSource::File { line: number }, observation));
    }
    Ok(observations)
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_markdown(
    summary: &RunSummary,
    config: &BenchmarkConfig,
    path: &Path,
) -> Result<(), RunnerError> {
    let mut out = String::new();
    out.push_str(&format!("# Decision run `{}`\n\n", config.run_id));
    out.push_str(&format!(
        "- Chromosome: `{}`\n- Information token cap: {}\n- Observations: {}\n- Decisions: {}\n- Hints: {}\n- Not to move: {}\n- Avg decision time: {:.1} µs\n\n",
        config.agent.chromosome,
        config.agent.information_tokens,
        summary.observations,
        summary.decisions,
        summary.hints,
        summary.idle,
        summary.avg_us_per_decision,
    ));
    out.push_str("| Rule | Fired |\n|---|---|\n");
    for (rule, count) in &summary.rule_counts {
        out.push_str(&format!("| {rule} | {count} |\n"));
    }
    fs::write(path, out)?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Deal(#[from] DealError),
    #[error("chromosome rejected: {0}")]
    Chromosome(#[from] DecisionError),
    #[error("failed to open observations {path:?}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid observation at {path:?} line {line}: {source}")]
    Observation {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("decision failed for {source_label}: {source}")]
    Decision {
        source_label: String,
        #[source]
        source: DecisionError,
    },
}
