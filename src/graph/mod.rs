//! Connection and constraint graph shared by the components of a design.
//!
//! A [`Graph`] is an arena. Electrical nodes and parametric specs live in it
//! and are referred to by [`NodeId`] and [`ParamId`]. Both ids carry the id of
//! the graph that created them, so handles from another graph are rejected
//! instead of silently aliasing an unrelated entry.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};

use arcstr::ArcStr;
use itertools::Itertools;

use crate::bus_bit;
use crate::units::{Quantity, Unit};

mod error;

pub use error::{GraphError, Result};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId {
    graph: u64,
    id: usize,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ParamId {
    graph: u64,
    id: usize,
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "node{}@graph{}", self.id, self.graph)
    }
}

impl Display for ParamId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "param{}@graph{}", self.id, self.graph)
    }
}

/// A directed equality edge: `from` is declared equal to `to`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Alias {
    pub from: ParamId,
    pub to: ParamId,
}

#[derive(Debug, Clone)]
struct Param {
    name: ArcStr,
    unit: Unit,
    literal: Option<Quantity>,
}

#[derive(Debug)]
pub struct Graph {
    id: u64,
    node_names: Vec<ArcStr>,
    /// Direct connections, in registration order.
    edges: Vec<(usize, usize)>,
    /// Maps a merged net to the net it was merged into.
    remap: HashMap<usize, usize>,
    params: Vec<Param>,
    aliases: Vec<Alias>,
    scope: Vec<ArcStr>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            node_names: Vec::new(),
            edges: Vec::new(),
            remap: HashMap::new(),
            params: Vec::new(),
            aliases: Vec::new(),
            scope: Vec::new(),
        }
    }

    fn qualify(&self, name: &str) -> ArcStr {
        if self.scope.is_empty() {
            ArcStr::from(name)
        } else {
            arcstr::format!("{}.{}", self.scope.iter().join("."), name)
        }
    }

    pub(crate) fn push_scope(&mut self, name: ArcStr) {
        self.scope.push(name);
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scope.pop();
    }

    /// Creates a fresh, unconnected electrical node.
    pub fn node(&mut self, name: impl AsRef<str>) -> NodeId {
        let name = self.qualify(name.as_ref());
        self.node_names.push(name);
        NodeId {
            graph: self.id,
            id: self.node_names.len() - 1,
        }
    }

    /// Creates `width` fresh nodes named `name[0]`, `name[1]`, ...
    pub fn bus(&mut self, name: &str, width: usize) -> Vec<NodeId> {
        (0..width).map(|i| self.node(bus_bit(name, i))).collect()
    }

    fn check_node(&self, node: NodeId) -> Result<usize> {
        if node.graph != self.id || node.id >= self.node_names.len() {
            return Err(GraphError::ForeignNode(arcstr::format!("{node}")));
        }
        Ok(node.id)
    }

    pub fn node_name(&self, node: NodeId) -> Result<&ArcStr> {
        let id = self.check_node(node)?;
        Ok(&self.node_names[id])
    }

    pub fn num_nodes(&self) -> usize {
        self.node_names.len()
    }

    fn root(&self, mut id: usize) -> usize {
        while let Some(&tmp) = self.remap.get(&id) {
            id = tmp;
        }
        id
    }

    /// Connects two nodes, merging their nets. Connecting a node to itself is a no-op.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        let a = self.check_node(a)?;
        let b = self.check_node(b)?;
        if a == b {
            return Ok(());
        }
        self.edges.push((a, b));

        let (ra, rb) = (self.root(a), self.root(b));
        if ra != rb {
            // The lower id survives as the net root.
            let (keep, merge) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.remap.insert(merge, keep);
        }
        Ok(())
    }

    /// Whether two nodes belong to the same net.
    pub fn is_connected(&self, a: NodeId, b: NodeId) -> Result<bool> {
        let a = self.check_node(a)?;
        let b = self.check_node(b)?;
        Ok(self.root(a) == self.root(b))
    }

    /// Nodes directly connected to `node`, in registration order.
    pub fn connections_of(&self, node: NodeId) -> Result<Vec<NodeId>> {
        let id = self.check_node(node)?;
        Ok(self
            .edges
            .iter()
            .filter_map(|&(a, b)| match (a == id, b == id) {
                (true, _) => Some(b),
                (_, true) => Some(a),
                _ => None,
            })
            .map(|id| NodeId { graph: self.id, id })
            .collect())
    }

    pub fn num_connections(&self) -> usize {
        self.edges.len()
    }

    /// Creates a fresh, unconstrained parametric spec.
    pub fn param(&mut self, name: impl AsRef<str>, unit: Unit) -> ParamId {
        let name = self.qualify(name.as_ref());
        self.params.push(Param {
            name,
            unit,
            literal: None,
        });
        ParamId {
            graph: self.id,
            id: self.params.len() - 1,
        }
    }

    fn check_param(&self, param: ParamId) -> Result<usize> {
        if param.graph != self.id || param.id >= self.params.len() {
            return Err(GraphError::ForeignParam(arcstr::format!("{param}")));
        }
        Ok(param.id)
    }

    pub fn param_name(&self, param: ParamId) -> Result<&ArcStr> {
        let id = self.check_param(param)?;
        Ok(&self.params[id].name)
    }

    pub fn param_unit(&self, param: ParamId) -> Result<Unit> {
        let id = self.check_param(param)?;
        Ok(self.params[id].unit)
    }

    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    /// Declares `a == b`. The declaration is permanent.
    pub fn alias_is(&mut self, a: ParamId, b: ParamId) -> Result<()> {
        let ia = self.check_param(a)?;
        let ib = self.check_param(b)?;
        let (pa, pb) = (&self.params[ia], &self.params[ib]);
        if pa.unit != pb.unit {
            return Err(GraphError::UnitMismatch {
                name: pa.name.clone(),
                expected: pa.unit,
                other: pb.name.clone(),
                found: pb.unit,
            });
        }
        self.aliases.push(Alias { from: a, to: b });
        Ok(())
    }

    /// Specs sharing a direct alias edge with `param`, in declaration order.
    pub fn aliases_of(&self, param: ParamId) -> Result<Vec<ParamId>> {
        self.check_param(param)?;
        Ok(self
            .aliases
            .iter()
            .filter_map(|alias| {
                if alias.from == param {
                    Some(alias.to)
                } else if alias.to == param {
                    Some(alias.from)
                } else {
                    None
                }
            })
            .collect())
    }

    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    pub fn num_aliases(&self) -> usize {
        self.aliases.len()
    }

    /// All specs reachable from `param` through alias edges, including `param`.
    fn alias_class(&self, param: ParamId) -> HashSet<ParamId> {
        let mut seen = HashSet::from([param]);
        let mut queue = VecDeque::from([param]);
        while let Some(p) = queue.pop_front() {
            for alias in self.aliases.iter() {
                let next = if alias.from == p {
                    alias.to
                } else if alias.to == p {
                    alias.from
                } else {
                    continue;
                };
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Whether `a` and `b` are constrained equal through any chain of aliases.
    pub fn is_alias_equal(&self, a: ParamId, b: ParamId) -> Result<bool> {
        self.check_param(a)?;
        self.check_param(b)?;
        Ok(self.alias_class(a).contains(&b))
    }

    /// Constrains `param` to a literal value.
    pub fn constrain(&mut self, param: ParamId, value: Quantity) -> Result<()> {
        let id = self.check_param(param)?;
        let p = &mut self.params[id];
        if p.unit != value.unit {
            return Err(GraphError::UnitMismatch {
                name: p.name.clone(),
                expected: p.unit,
                other: arcstr::format!("{value}"),
                found: value.unit,
            });
        }
        match p.literal {
            Some(existing) if !existing.approx_eq(&value) => {
                Err(GraphError::ConflictingConstraint {
                    name: p.name.clone(),
                    a: existing,
                    b: value,
                })
            }
            _ => {
                p.literal = Some(value);
                Ok(())
            }
        }
    }

    /// Resolves the value `param` is constrained to, following alias edges.
    ///
    /// Returns `Ok(None)` if no spec in the alias class carries a literal.
    pub fn resolve(&self, param: ParamId) -> Result<Option<Quantity>> {
        let id = self.check_param(param)?;
        let mut class = self.alias_class(param).into_iter().collect::<Vec<_>>();
        class.sort();

        let mut resolved: Option<Quantity> = None;
        for p in class {
            let Some(value) = self.params[p.id].literal else {
                continue;
            };
            match resolved {
                Some(prev) if !prev.approx_eq(&value) => {
                    return Err(GraphError::ConflictingConstraint {
                        name: self.params[id].name.clone(),
                        a: prev,
                        b: value,
                    });
                }
                _ => resolved = Some(value),
            }
        }
        Ok(resolved)
    }
}
