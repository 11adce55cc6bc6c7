//! Single operational amplifier.

use arcstr::ArcStr;

use crate::component::Component;
use crate::designator::{DesignatorPrefix, HasDesignatorPrefix};
use crate::graph::{Graph, NodeId};
use crate::heuristic::{HasPinAssociationHeuristic, PinAssociationTable};
use crate::Result;

use super::power::ElectricPower;

pub mod specs;

pub use specs::{AmplifierSpecs, SpecKind, SpecValues};

#[derive(Debug, Clone)]
pub struct OpAmp {
    pub power: ElectricPower,
    pub inverting_input: NodeId,
    pub non_inverting_input: NodeId,
    pub output: NodeId,
    pub specs: AmplifierSpecs,
    pin_heuristic: PinAssociationTable,
}

impl Component for OpAmp {
    type Params = SpecValues;

    fn new(params: &Self::Params, graph: &mut Graph) -> Result<Self> {
        params.validate()?;

        let power = graph.instantiate::<ElectricPower>("power", &())?;
        let inverting_input = graph.node("inverting_input");
        let non_inverting_input = graph.node("non_inverting_input");
        let output = graph.node("output");

        let specs = AmplifierSpecs::new(graph);
        specs.constrain(params, graph)?;

        let mut pin_heuristic = PinAssociationTable::new(false, false);
        power.add_pin_heuristics(&mut pin_heuristic)?;
        pin_heuristic.insert(inverting_input, ["-", "IN-"])?;
        pin_heuristic.insert(non_inverting_input, ["+", "IN+"])?;
        pin_heuristic.insert(output, ["OUT"])?;

        Ok(Self {
            power,
            inverting_input,
            non_inverting_input,
            output,
            specs,
            pin_heuristic,
        })
    }

    fn name(&self) -> ArcStr {
        arcstr::literal!("opamp")
    }
}

impl HasDesignatorPrefix for OpAmp {
    fn designator_prefix(&self) -> DesignatorPrefix {
        DesignatorPrefix::U
    }
}

impl HasPinAssociationHeuristic for OpAmp {
    fn pin_association_heuristic(&self) -> &PinAssociationTable {
        &self.pin_heuristic
    }
}

#[cfg(test)]
mod tests {
    use crate::heuristic::Pin;
    use crate::units::Quantity;

    use super::*;

    #[test]
    fn test_opamp() {
        let mut g = Graph::new();
        let params = SpecValues {
            gain_bandwidth_product: Some(3e6),
            ..Default::default()
        };
        let opamp = g.instantiate::<OpAmp>("u1", &params).unwrap();

        assert_eq!(g.num_nodes(), 5);
        assert_eq!(g.num_connections(), 0);
        assert_eq!(g.node_name(opamp.power.hv).unwrap(), "u1.power.hv");
        assert_eq!(g.node_name(opamp.output).unwrap(), "u1.output");
        assert_eq!(
            g.resolve(opamp.specs.gain_bandwidth_product).unwrap(),
            Some(Quantity::hertz(3e6))
        );
        assert_eq!(g.resolve(opamp.specs.bandwidth).unwrap(), None);
        assert_eq!(opamp.designator_prefix(), DesignatorPrefix::U);
    }

    #[test]
    fn test_opamp_pin_heuristic() {
        let mut g = Graph::new();
        let opamp = g.instantiate::<OpAmp>("u1", &SpecValues::default()).unwrap();
        let table = opamp.pin_association_heuristic();

        assert_eq!(table.len(), 5);
        let pins = [
            Pin::new("1", "OUT"),
            Pin::new("2", "-IN"),
            Pin::new("3", "in+"),
            Pin::new("4", "V-"),
            Pin::new("5", "IN-"),
            Pin::new("8", "vcc"),
        ];
        let assoc = table.associate(&pins).unwrap();
        let number = |node| {
            assoc
                .iter()
                .find(|(n, _)| *n == node)
                .map(|(_, pin)| pin.number.to_string())
                .unwrap()
        };
        assert_eq!(number(opamp.inverting_input), "5");
        assert_eq!(number(opamp.non_inverting_input), "3");
        assert_eq!(number(opamp.output), "1");
        assert_eq!(number(opamp.power.hv), "8");
        assert_eq!(number(opamp.power.lv), "4");
    }
}
