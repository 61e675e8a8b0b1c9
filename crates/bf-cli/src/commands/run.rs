//! Run command implementation
//!
//! Executes the stage graph wave by wave. Stages within a wave run
//! concurrently; a stage whose dependency failed is not run. Errors are
//! caught at the stage boundary so the summary always covers every stage.

use anyhow::Result;
use async_trait::async_trait;
use bf_core::{Stage, StageGraph, StageStatus};
use futures::future::join_all;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common::{load_context_for, ExitCode, PipelineContext};
use crate::commands::{extract_api, extract_sql, load, transform};

/// Executes individual stages for the orchestrator
#[async_trait]
pub(crate) trait StageRunner: Send + Sync {
    /// True when every staging artifact is already present
    async fn staging_complete(&self) -> Result<bool>;

    /// Run one work stage
    async fn run(&self, stage: Stage) -> Result<()>;
}

/// Runs stages against the configured databases and API
pub(crate) struct PipelineRunner {
    ctx: PipelineContext,
}

#[async_trait]
impl StageRunner for PipelineRunner {
    async fn staging_complete(&self) -> Result<bool> {
        Ok(self.ctx.layout().check().is_complete())
    }

    async fn run(&self, stage: Stage) -> Result<()> {
        match stage {
            Stage::CheckStaging => {
                self.staging_complete().await?;
            }
            Stage::ExtractSql => {
                extract_sql::run_stage(&self.ctx).await?;
            }
            Stage::ExtractApi => {
                extract_api::run_stage(&self.ctx).await?;
            }
            Stage::Transform => {
                transform::run_stage(&self.ctx).await?;
            }
            Stage::Load => {
                load::run_stage(&self.ctx).await?;
            }
        }
        Ok(())
    }
}

/// Final state of one stage
#[derive(Debug, Clone)]
pub(crate) struct StageRecord {
    pub(crate) stage: Stage,
    pub(crate) status: StageStatus,
    pub(crate) duration: Duration,
}

/// Outcome of a whole run
#[derive(Debug, Clone)]
pub(crate) struct RunSummary {
    pub(crate) run_id: Uuid,
    pub(crate) records: Vec<StageRecord>,
    pub(crate) duration: Duration,
}

impl RunSummary {
    pub(crate) fn has_failures(&self) -> bool {
        self.records.iter().any(|r| r.status.is_failure())
    }

    fn print(&self) {
        println!();
        println!("Run {} finished in {:.2}s", self.run_id, self.duration.as_secs_f64());
        for record in &self.records {
            println!(
                "  {:<14} {:<8.2}s {}",
                record.stage.name(),
                record.duration.as_secs_f64(),
                record.status
            );
        }
    }
}

/// Execute the stage graph
///
/// With `force` the staging decision is skipped and both extractions run.
pub(crate) async fn orchestrate<R: StageRunner>(
    runner: &R,
    graph: &StageGraph,
    force: bool,
) -> Result<RunSummary> {
    let run_id = Uuid::new_v4();
    let started = Instant::now();
    log::info!("Starting run {}", run_id);

    let mut statuses: HashMap<Stage, StageStatus> = HashMap::new();
    let mut records = Vec::new();
    let mut skip_extraction = false;

    for wave in graph.waves()? {
        let mut runnable = Vec::new();
        for stage in wave {
            let status = if graph
                .dependencies(stage)
                .iter()
                .any(|dep| !statuses.get(dep).is_some_and(StageStatus::satisfies_dependents))
            {
                Some(StageStatus::UpstreamFailed)
            } else if stage == Stage::CheckStaging && force {
                log::info!("Forced run; skipping staging check");
                Some(StageStatus::Skipped)
            } else if stage.is_extraction() && skip_extraction {
                Some(StageStatus::Skipped)
            } else {
                None
            };

            match status {
                Some(status) => {
                    if status == StageStatus::UpstreamFailed {
                        log::warn!("Not running {}: an upstream stage failed", stage);
                    }
                    statuses.insert(stage, status.clone());
                    records.push(StageRecord {
                        stage,
                        status,
                        duration: Duration::ZERO,
                    });
                }
                None => runnable.push(stage),
            }
        }

        let results = join_all(runnable.into_iter().map(|stage| async move {
            let started = Instant::now();
            log::info!("Running {}", stage);
            let result = if stage == Stage::CheckStaging {
                runner.staging_complete().await.map(Some)
            } else {
                runner.run(stage).await.map(|()| None)
            };
            (stage, result, started.elapsed())
        }))
        .await;

        for (stage, result, duration) in results {
            let status = match result {
                Ok(decision) => {
                    if let Some(complete) = decision {
                        skip_extraction = complete;
                    }
                    StageStatus::Succeeded
                }
                Err(e) => {
                    log::error!("Stage {} failed: {:#}", stage, e);
                    StageStatus::Failed(format!("{:#}", e))
                }
            };
            statuses.insert(stage, status.clone());
            records.push(StageRecord {
                stage,
                status,
                duration,
            });
        }
    }

    records.sort_by_key(|r| r.stage);
    Ok(RunSummary {
        run_id,
        records,
        duration: started.elapsed(),
    })
}

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = load_context_for(global, &Stage::ALL)?;
    let runner = PipelineRunner { ctx };
    let summary = orchestrate(&runner, &StageGraph::standard(), args.force).await?;
    summary.print();

    if summary.has_failures() {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
