//! Short human-readable summaries of a component's constrained specs.

use arcstr::ArcStr;
use itertools::Itertools;

use crate::graph::{self, Graph, ParamId};

/// An ordered chain of specs, each printed as `{value} {suffix}`.
#[derive(Debug, Clone, Default)]
pub struct SimpleValueRepresentation {
    specs: Vec<(ParamId, ArcStr)>,
}

impl SimpleValueRepresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spec(mut self, param: ParamId, suffix: impl Into<ArcStr>) -> Self {
        self.specs.push((param, suffix.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Unconstrained specs are left out.
    pub fn render(&self, graph: &Graph) -> graph::Result<String> {
        let mut parts = Vec::with_capacity(self.specs.len());
        for (param, suffix) in self.specs.iter() {
            if let Some(value) = graph.resolve(*param)? {
                parts.push(format!("{value} {suffix}"));
            }
        }
        Ok(parts.iter().join(" "))
    }
}
