use super::*;
use std::sync::Mutex;

/// Records the stages it is asked to run and fails the listed ones
struct FakeRunner {
    staging_complete: bool,
    failing: Vec<Stage>,
    ran: Mutex<Vec<Stage>>,
}

impl FakeRunner {
    fn new(staging_complete: bool, failing: &[Stage]) -> Self {
        Self {
            staging_complete,
            failing: failing.to_vec(),
            ran: Mutex::new(Vec::new()),
        }
    }

    fn ran(&self) -> Vec<Stage> {
        self.ran.lock().unwrap().clone()
    }
}

#[async_trait]
impl StageRunner for FakeRunner {
    async fn staging_complete(&self) -> Result<bool> {
        self.ran.lock().unwrap().push(Stage::CheckStaging);
        Ok(self.staging_complete)
    }

    async fn run(&self, stage: Stage) -> Result<()> {
        self.ran.lock().unwrap().push(stage);
        if self.failing.contains(&stage) {
            anyhow::bail!("{} exploded", stage);
        }
        Ok(())
    }
}

fn status(summary: &RunSummary, stage: Stage) -> Option<&StageStatus> {
    summary
        .records
        .iter()
        .find(|r| r.stage == stage)
        .map(|r| &r.status)
}

#[tokio::test]
async fn test_missing_staging_runs_every_stage() {
    let runner = FakeRunner::new(false, &[]);

    let summary = orchestrate(&runner, &StageGraph::standard(), false)
        .await
        .unwrap();

    assert!(!summary.has_failures());
    for stage in Stage::ALL {
        assert_eq!(status(&summary, stage), Some(&StageStatus::Succeeded), "{}", stage);
    }
    let ran = runner.ran();
    assert_eq!(ran.len(), 5);
    assert_eq!(ran[0], Stage::CheckStaging);
    assert_eq!(&ran[3..], &[Stage::Transform, Stage::Load]);
}

#[tokio::test]
async fn test_complete_staging_skips_extraction() {
    let runner = FakeRunner::new(true, &[]);

    let summary = orchestrate(&runner, &StageGraph::standard(), false)
        .await
        .unwrap();

    assert_eq!(status(&summary, Stage::ExtractSql), Some(&StageStatus::Skipped));
    assert_eq!(status(&summary, Stage::ExtractApi), Some(&StageStatus::Skipped));
    assert_eq!(status(&summary, Stage::Transform), Some(&StageStatus::Succeeded));
    assert_eq!(status(&summary, Stage::Load), Some(&StageStatus::Succeeded));
    assert_eq!(
        runner.ran(),
        vec![Stage::CheckStaging, Stage::Transform, Stage::Load]
    );
}

#[tokio::test]
async fn test_force_runs_extraction_without_checking() {
    let runner = FakeRunner::new(true, &[]);

    let summary = orchestrate(&runner, &StageGraph::standard(), true)
        .await
        .unwrap();

    assert_eq!(status(&summary, Stage::CheckStaging), Some(&StageStatus::Skipped));
    assert_eq!(status(&summary, Stage::ExtractSql), Some(&StageStatus::Succeeded));
    assert_eq!(status(&summary, Stage::ExtractApi), Some(&StageStatus::Succeeded));
    assert!(!runner.ran().contains(&Stage::CheckStaging));
}

#[tokio::test]
async fn test_failed_extraction_blocks_downstream() {
    let runner = FakeRunner::new(false, &[Stage::ExtractApi]);

    let summary = orchestrate(&runner, &StageGraph::standard(), false)
        .await
        .unwrap();

    assert!(summary.has_failures());
    assert!(matches!(
        status(&summary, Stage::ExtractApi),
        Some(StageStatus::Failed(msg)) if msg.contains("extract-api exploded")
    ));
    // the sibling extraction still ran to completion
    assert_eq!(status(&summary, Stage::ExtractSql), Some(&StageStatus::Succeeded));
    assert_eq!(status(&summary, Stage::Transform), Some(&StageStatus::UpstreamFailed));
    assert_eq!(status(&summary, Stage::Load), Some(&StageStatus::UpstreamFailed));
    assert!(!runner.ran().contains(&Stage::Transform));
}

#[tokio::test]
async fn test_failed_load_is_reported() {
    let runner = FakeRunner::new(true, &[Stage::Load]);

    let summary = orchestrate(&runner, &StageGraph::standard(), false)
        .await
        .unwrap();

    assert!(summary.has_failures());
    assert_eq!(status(&summary, Stage::Transform), Some(&StageStatus::Succeeded));
    assert!(matches!(status(&summary, Stage::Load), Some(StageStatus::Failed(_))));
}

#[tokio::test]
async fn test_summary_lists_stages_in_order() {
    let runner = FakeRunner::new(false, &[]);
    let summary = orchestrate(&runner, &StageGraph::standard(), false)
        .await
        .unwrap();
    let stages: Vec<Stage> = summary.records.iter().map(|r| r.stage).collect();
    assert_eq!(stages, Stage::ALL.to_vec());
    assert!(!summary.run_id.is_nil());
}
