//! Pin association heuristics.
//!
//! A [`PinAssociationTable`] maps each electrical node of a component to the
//! physical pin names it may appear under on a footprint. Footprint matching
//! reads the table through [`HasPinAssociationHeuristic`].

use std::collections::HashMap;

use arcstr::ArcStr;
use itertools::Itertools;
use thiserror::Error;

use crate::graph::NodeId;

#[derive(Debug, Error)]
pub enum PinMatchError {
    #[error("{0} appears more than once in the lookup table")]
    DuplicateNode(NodeId),

    #[error("no pin matches {node} (candidates: {candidates})")]
    Unmatched { node: NodeId, candidates: String },

    #[error("pin {pin} matches both {first} and {second}")]
    Ambiguous {
        pin: ArcStr,
        first: NodeId,
        second: NodeId,
    },
}

/// A physical pin on a footprint or symbol.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Pin {
    pub number: ArcStr,
    pub name: ArcStr,
}

impl Pin {
    pub fn new(number: impl Into<ArcStr>, name: impl Into<ArcStr>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PinAssociationTable {
    entries: Vec<(NodeId, Vec<ArcStr>)>,
    index: HashMap<NodeId, usize>,
    accept_prefix: bool,
    case_sensitive: bool,
}

impl PinAssociationTable {
    pub fn new(accept_prefix: bool, case_sensitive: bool) -> Self {
        Self {
            accept_prefix,
            case_sensitive,
            ..Default::default()
        }
    }

    /// Adds the candidate pin names for `node`. Each node may be added once.
    pub fn insert<I, S>(&mut self, node: NodeId, labels: I) -> Result<(), PinMatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<ArcStr>,
    {
        if self.index.contains_key(&node) {
            return Err(PinMatchError::DuplicateNode(node));
        }
        self.index.insert(node, self.entries.len());
        self.entries
            .push((node, labels.into_iter().map(Into::into).collect()));
        Ok(())
    }

    pub fn labels_for(&self, node: NodeId) -> Option<&[ArcStr]> {
        self.index
            .get(&node)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn accept_prefix(&self) -> bool {
        self.accept_prefix
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|(node, _)| *node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[ArcStr])> + '_ {
        self.entries
            .iter()
            .map(|(node, labels)| (*node, labels.as_slice()))
    }

    fn label_matches(&self, label: &str, pin_name: &str) -> bool {
        match (self.case_sensitive, self.accept_prefix) {
            (true, true) => pin_name.starts_with(label),
            (true, false) => pin_name == label,
            (false, true) => {
                let mut pin_name = lowercase_chars(pin_name);
                lowercase_chars(label).all(|c| pin_name.next() == Some(c))
            }
            (false, false) => lowercase_chars(label).eq(lowercase_chars(pin_name)),
        }
    }

    /// Whether a pin called `pin_name` is acceptable for `node`.
    pub fn matches(&self, node: NodeId, pin_name: &str) -> bool {
        self.labels_for(node)
            .map(|labels| labels.iter().any(|l| self.label_matches(l, pin_name)))
            .unwrap_or(false)
    }

    /// The first node, in table order, that accepts a pin called `pin_name`.
    pub fn find(&self, pin_name: &str) -> Option<NodeId> {
        self.nodes().find(|&node| self.matches(node, pin_name))
    }

    /// Assigns a pin from `pins` to every node in the table.
    ///
    /// Nodes are visited in table order and each takes the first pin whose
    /// name it accepts. Every node must find a pin, and no pin may serve two
    /// nodes.
    pub fn associate(&self, pins: &[Pin]) -> Result<Vec<(NodeId, Pin)>, PinMatchError> {
        let mut claimed: HashMap<usize, NodeId> = HashMap::new();
        let mut out = Vec::with_capacity(self.entries.len());

        for (node, labels) in self.entries.iter() {
            let Some(i) = pins.iter().position(|pin| self.matches(*node, &pin.name)) else {
                return Err(PinMatchError::Unmatched {
                    node: *node,
                    candidates: labels.iter().join(", "),
                });
            };
            if let Some(&first) = claimed.get(&i) {
                return Err(PinMatchError::Ambiguous {
                    pin: pins[i].name.clone(),
                    first,
                    second: *node,
                });
            }
            claimed.insert(i, *node);
            out.push((*node, pins[i].clone()));
        }

        Ok(out)
    }
}

fn lowercase_chars(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

/// Exposes a lookup table from nodes to acceptable pin names.
pub trait HasPinAssociationHeuristic {
    fn pin_association_heuristic(&self) -> &PinAssociationTable;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn table(accept_prefix: bool, case_sensitive: bool) -> (PinAssociationTable, [NodeId; 2]) {
        let mut g = Graph::new();
        let [out, vdd] = ["out", "vdd"].map(|n| g.node(n));
        let mut t = PinAssociationTable::new(accept_prefix, case_sensitive);
        t.insert(out, ["OUT1"]).unwrap();
        t.insert(vdd, ["V+", "Vdd"]).unwrap();
        (t, [out, vdd])
    }

    #[test]
    fn test_case_insensitive_exact() {
        let (t, [out, vdd]) = table(false, false);
        assert!(t.matches(out, "out1"));
        assert!(t.matches(vdd, "VDD"));
        assert!(!t.matches(out, "OUT10"));
        assert!(!t.matches(out, "OUT"));
        assert_eq!(t.find("vdd"), Some(vdd));
        assert_eq!(t.find("GND"), None);
    }

    #[test]
    fn test_prefix_and_case_sensitive() {
        let (t, [out, _]) = table(true, true);
        assert!(t.matches(out, "OUT1_A"));
        assert!(!t.matches(out, "out1"));
    }

    #[test]
    fn test_prefix_case_insensitive() {
        let (t, [out, vdd]) = table(true, false);
        assert!(t.matches(out, "out1_a"));
        assert!(t.matches(out, "Out1"));
        assert!(t.matches(vdd, "VDDA"));
        assert!(!t.matches(out, "OUT"));
        assert!(!t.matches(vdd, "V"));
    }

    #[test]
    fn test_case_insensitive_beyond_ascii() {
        let mut g = Graph::new();
        let n = g.node("n");
        let mut t = PinAssociationTable::new(false, false);
        t.insert(n, ["ÄUX"]).unwrap();
        assert!(t.matches(n, "äux"));
        assert!(!t.matches(n, "äu"));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let (mut t, [out, _]) = table(false, false);
        assert!(matches!(
            t.insert(out, ["X"]),
            Err(PinMatchError::DuplicateNode(_))
        ));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_associate() {
        let (t, [out, vdd]) = table(false, false);
        let pins = [Pin::new("1", "OUT1"), Pin::new("8", "VDD")];
        let assoc = t.associate(&pins).unwrap();
        assert_eq!(assoc, vec![(out, pins[0].clone()), (vdd, pins[1].clone())]);

        let missing = t.associate(&pins[..1]);
        assert!(matches!(missing, Err(PinMatchError::Unmatched { node, .. }) if node == vdd));
    }

    #[test]
    fn test_associate_ambiguous() {
        let mut g = Graph::new();
        let [a, b] = ["a", "b"].map(|n| g.node(n));
        let mut t = PinAssociationTable::new(false, false);
        t.insert(a, ["GND"]).unwrap();
        t.insert(b, ["Vss", "GND"]).unwrap();
        let pins = [Pin::new("4", "GND")];
        assert!(matches!(
            t.associate(&pins),
            Err(PinMatchError::Ambiguous { .. })
        ));
    }
}
