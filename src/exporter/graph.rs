//! The target graph.
//!
//! Built fresh for every export from the project's declared formats and
//! read-only afterwards. Edges run from a wrapper target to the shared-code
//! target it links against.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::core::target::{OutputFormat, Target, TargetKind};
use crate::exporter::error::ExportError;

/// Targets of one export and their dependencies.
#[derive(Debug, Clone)]
pub struct TargetGraph {
    graph: DiGraph<Target, ()>,
    /// Declaration order; shared code first when present
    order: Vec<NodeIndex>,
    shared: Option<NodeIndex>,
}

impl TargetGraph {
    /// Build the graph for `formats`.
    ///
    /// A shared-code target is synthesized when at least two declared formats
    /// link against shared code. Formats the exporter cannot build are
    /// skipped with a warning; if none remain the export cannot proceed.
    pub fn build(project_id: &str, formats: &[OutputFormat]) -> Result<Self, ExportError> {
        let mut kinds: Vec<TargetKind> = Vec::new();

        for format in formats {
            match format.target_kind() {
                Some(kind) if !kinds.contains(&kind) => kinds.push(kind),
                Some(_) => {}
                None => tracing::warn!(
                    "format `{}` is not supported by the Visual Studio exporter, skipping",
                    format
                ),
            }
        }

        if kinds.is_empty() {
            let declared = formats
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ExportError::configuration(if declared.is_empty() {
                "the project declares no output formats".to_string()
            } else {
                format!("none of the declared formats can be exported: {}", declared)
            }));
        }

        let sharing = formats
            .iter()
            .filter(|f| f.target_kind().is_some() && f.needs_shared_code())
            .count();

        let mut graph = DiGraph::new();
        let mut order = Vec::new();

        let shared = if sharing >= 2 {
            let node = graph.add_node(Target::new(project_id, TargetKind::SharedCode));
            order.push(node);
            Some(node)
        } else {
            None
        };

        for kind in kinds {
            let node = graph.add_node(Target::new(project_id, kind));
            order.push(node);

            if let Some(shared) = shared {
                graph.add_edge(node, shared, ());
            }
        }

        tracing::debug!(
            "target graph: {} target(s), {} edge(s)",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(TargetGraph {
            graph,
            order,
            shared,
        })
    }

    /// Targets in emission order.
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.order.iter().map(move |&node| &self.graph[node])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The shared-code target, if the graph has one.
    pub fn shared_code(&self) -> Option<&Target> {
        self.shared.map(|node| &self.graph[node])
    }

    /// True when exactly one target is emitted.
    pub fn is_single_target(&self) -> bool {
        self.order.len() == 1
    }

    pub fn has_kind(&self, kind: TargetKind) -> bool {
        self.targets().any(|t| t.kind == kind)
    }

    /// Targets `target` depends on.
    pub fn dependencies(&self, target: &Target) -> Vec<&Target> {
        match self.node_of(target) {
            Some(node) => self
                .graph
                .neighbors_directed(node, Direction::Outgoing)
                .map(|n| &self.graph[n])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Targets that depend on `target`.
    pub fn dependents(&self, target: &Target) -> Vec<&Target> {
        match self.node_of(target) {
            Some(node) => self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .map(|n| &self.graph[n])
                .collect(),
            None => Vec::new(),
        }
    }

    /// The shared-code target `target` links against, if any.
    pub fn shared_dependency(&self, target: &Target) -> Option<&Target> {
        self.dependencies(target)
            .into_iter()
            .find(|t| t.is_shared_code())
    }

    fn node_of(&self, target: &Target) -> Option<NodeIndex> {
        self.order
            .iter()
            .copied()
            .find(|&node| self.graph[node].guid == target.guid)
    }
}
