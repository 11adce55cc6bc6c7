use crate::blocks::opamp::{AmplifierSpecs, OpAmp, SpecValues};
use crate::blocks::power::ElectricPower;
use crate::bus_bit;
use crate::graph::{Graph, NodeId};
use crate::Result;

use super::channels;

/// The package-level ports, indexed by channel.
#[derive(Debug, Clone)]
pub(super) struct Ports {
    pub(super) power: ElectricPower,
    pub(super) inverting_input: Vec<NodeId>,
    pub(super) non_inverting_input: Vec<NodeId>,
    pub(super) output: Vec<NodeId>,
}

impl Ports {
    /// Creates the shared power interface and one fresh node triple per channel.
    pub(super) fn replicate(graph: &mut Graph, num_amplifiers: usize) -> Result<Self> {
        let power = graph.instantiate::<ElectricPower>("power", &())?;

        let mut inverting_input = Vec::with_capacity(num_amplifiers);
        let mut non_inverting_input = Vec::with_capacity(num_amplifiers);
        let mut output = Vec::with_capacity(num_amplifiers);
        for ch in channels(num_amplifiers) {
            inverting_input.push(graph.node(bus_bit("inverting_input", ch.index)));
            non_inverting_input.push(graph.node(bus_bit("non_inverting_input", ch.index)));
            output.push(graph.node(bus_bit("output", ch.index)));
        }

        Ok(Self {
            power,
            inverting_input,
            non_inverting_input,
            output,
        })
    }

    pub(super) fn num_channels(&self) -> usize {
        self.output.len()
    }

    /// Instantiates one [`OpAmp`] per channel, wires it to that channel's
    /// nodes and the shared power, and aliases its specs to `specs`.
    pub(super) fn bind(&self, graph: &mut Graph, specs: &AmplifierSpecs) -> Result<Vec<OpAmp>> {
        let mut opamps = Vec::with_capacity(self.num_channels());
        for ch in channels(self.num_channels()) {
            let opamp =
                graph.instantiate::<OpAmp>(bus_bit("opamps", ch.index), &SpecValues::default())?;

            opamp.power.connect(&self.power, graph)?;
            graph.connect(opamp.inverting_input, self.inverting_input[ch.index])?;
            graph.connect(opamp.non_inverting_input, self.non_inverting_input[ch.index])?;
            graph.connect(opamp.output, self.output[ch.index])?;

            specs.propagate_to(&opamp.specs, graph)?;
            opamps.push(opamp);
        }
        Ok(opamps)
    }
}
