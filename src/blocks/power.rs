//! Two-rail power interface.

use arcstr::ArcStr;

use crate::component::Component;
use crate::graph::{self, Graph, NodeId};
use crate::heuristic::{PinAssociationTable, PinMatchError};
use crate::Result;

/// Pin names accepted for the high-voltage rail.
pub const HV_LABELS: [&str; 4] = ["V+", "Vcc", "Vdd", "Vcc+"];
/// Pin names accepted for the low-voltage rail.
pub const LV_LABELS: [&str; 6] = ["V-", "Vee", "Vss", "GND", "Vcc-", "Vcc-/GND"];

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ElectricPower {
    pub hv: NodeId,
    pub lv: NodeId,
}

impl Component for ElectricPower {
    type Params = ();

    fn new(_params: &Self::Params, graph: &mut Graph) -> Result<Self> {
        Ok(Self {
            hv: graph.node("hv"),
            lv: graph.node("lv"),
        })
    }

    fn name(&self) -> ArcStr {
        arcstr::literal!("electric_power")
    }
}

impl ElectricPower {
    /// Connects both rails to the matching rails of `other`.
    pub fn connect(&self, other: &ElectricPower, graph: &mut Graph) -> graph::Result<()> {
        graph.connect(self.hv, other.hv)?;
        graph.connect(self.lv, other.lv)?;
        Ok(())
    }

    /// Adds the rail pin names to `table`.
    pub fn add_pin_heuristics(
        &self,
        table: &mut PinAssociationTable,
    ) -> std::result::Result<(), PinMatchError> {
        table.insert(self.hv, HV_LABELS)?;
        table.insert(self.lv, LV_LABELS)?;
        Ok(())
    }
}
