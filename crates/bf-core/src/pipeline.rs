//! Pipeline stages and their dependency graph

use crate::error::{CoreError, CoreResult};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt;

/// One invokable unit of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Decision unit: are all staging artifacts already present?
    CheckStaging,
    /// Dump categorized source tables into staging
    ExtractSql,
    /// Fetch the paginated API into staging
    ExtractApi,
    /// Build the dimensional model from staging
    Transform,
    /// Replace warehouse tables with the transformed artifacts
    Load,
}

impl Stage {
    /// Every stage, in declaration order
    pub const ALL: [Stage; 5] = [
        Stage::CheckStaging,
        Stage::ExtractSql,
        Stage::ExtractApi,
        Stage::Transform,
        Stage::Load,
    ];

    /// Stable identifier used in logs and the CLI
    pub fn name(self) -> &'static str {
        match self {
            Stage::CheckStaging => "check-staging",
            Stage::ExtractSql => "extract-sql",
            Stage::ExtractApi => "extract-api",
            Stage::Transform => "transform",
            Stage::Load => "load",
        }
    }

    /// Whether the staging decision may skip this stage
    pub fn is_extraction(self) -> bool {
        matches!(self, Stage::ExtractSql | Stage::ExtractApi)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a single stage within one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    /// Stage ran to completion
    Succeeded,
    /// The staging decision chose not to run this stage
    Skipped,
    /// Stage raised an error, caught at the stage boundary
    Failed(String),
    /// A dependency failed, so the stage never ran
    UpstreamFailed,
}

impl StageStatus {
    /// Whether dependents may run after this status
    pub fn satisfies_dependents(&self) -> bool {
        matches!(self, StageStatus::Succeeded | StageStatus::Skipped)
    }

    /// Whether this status counts as a run failure
    pub fn is_failure(&self) -> bool {
        matches!(self, StageStatus::Failed(_) | StageStatus::UpstreamFailed)
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageStatus::Succeeded => write!(f, "succeeded"),
            StageStatus::Skipped => write!(f, "skipped"),
            StageStatus::Failed(msg) => write!(f, "failed: {}", msg),
            StageStatus::UpstreamFailed => write!(f, "upstream failed"),
        }
    }
}

/// A directed acyclic graph of stage dependencies
#[derive(Debug)]
pub struct StageGraph {
    graph: DiGraph<Stage, ()>,
    node_map: HashMap<Stage, NodeIndex>,
}

impl StageGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// The full pipeline: the decision gates both extractions and the
    /// transform; the transform waits for both extractions; load follows
    /// the transform.
    pub fn standard() -> Self {
        let mut graph = Self::new();
        graph.add_dependency(Stage::ExtractSql, Stage::CheckStaging);
        graph.add_dependency(Stage::ExtractApi, Stage::CheckStaging);
        graph.add_dependency(Stage::Transform, Stage::CheckStaging);
        graph.add_dependency(Stage::Transform, Stage::ExtractSql);
        graph.add_dependency(Stage::Transform, Stage::ExtractApi);
        graph.add_dependency(Stage::Load, Stage::Transform);
        graph
    }

    /// Add a stage to the graph
    pub fn add_stage(&mut self, stage: Stage) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&stage) {
            return idx;
        }
        let idx = self.graph.add_node(stage);
        self.node_map.insert(stage, idx);
        idx
    }

    /// Add a dependency edge (`stage` depends on `on`)
    pub fn add_dependency(&mut self, stage: Stage, on: Stage) {
        let from = self.add_stage(on);
        let to = self.add_stage(stage);
        self.graph.update_edge(from, to, ());
    }

    /// Stages grouped into waves; every stage in a wave depends only on
    /// stages from earlier waves, so a wave may run concurrently
    pub fn waves(&self) -> CoreResult<Vec<Vec<Stage>>> {
        let depth = self.depths()?;
        let max = depth.values().copied().max().map_or(0, |d| d + 1);
        let mut waves = vec![Vec::new(); max];
        for (stage, d) in depth {
            waves[d].push(stage);
        }
        for wave in &mut waves {
            wave.sort();
        }
        Ok(waves)
    }

    /// Direct dependencies of a stage, sorted
    pub fn dependencies(&self, stage: Stage) -> Vec<Stage> {
        let Some(&idx) = self.node_map.get(&stage) else {
            return Vec::new();
        };
        let mut deps: Vec<Stage> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| self.graph[e.source()])
            .collect();
        deps.sort();
        deps
    }

    /// Longest-path depth of every stage from the roots
    fn depths(&self) -> CoreResult<HashMap<Stage, usize>> {
        let order = toposort(&self.graph, None).map_err(|cycle| CoreError::CircularDependency {
            cycle: self.graph[cycle.node_id()].to_string(),
        })?;
        let mut depth: HashMap<Stage, usize> = HashMap::new();
        for idx in order {
            let d = self
                .graph
                .edges_directed(idx, Direction::Incoming)
                .map(|e| depth[&self.graph[e.source()]] + 1)
                .max()
                .unwrap_or(0);
            depth.insert(self.graph[idx], d);
        }
        Ok(depth)
    }
}

impl Default for StageGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
