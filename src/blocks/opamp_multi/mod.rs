//! Multi-channel op-amp package.
//!
//! An [`OpAmpMulti`] holds `num_amplifiers` identical [`OpAmp`] channels that
//! share one power interface. Each channel gets its own inverting input,
//! non-inverting input, and output node, and its specs are aliased to the
//! package-level specs.
//!
//! Node replication, channel binding, and the pin heuristic all walk the same
//! [`channels`] sequence, so channel `i` always maps to pin number `i + 1`.

use arcstr::ArcStr;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::designator::{DesignatorPrefix, HasDesignatorPrefix};
use crate::graph::{Graph, NodeId, ParamId};
use crate::heuristic::{HasPinAssociationHeuristic, PinAssociationTable};
use crate::repr::SimpleValueRepresentation;
use crate::units::{Quantity, Unit};
use crate::{Error, Result};

use super::opamp::{AmplifierSpecs, OpAmp, SpecValues};
use super::power::ElectricPower;

mod pins;
mod schematic;

use schematic::Ports;

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(derive(Debug))]
pub struct OpAmpMultiParams {
    pub num_amplifiers: usize,
    /// Package-level spec values; unset specs stay unconstrained.
    #[builder(default)]
    #[serde(default)]
    pub specs: SpecValues,
}

impl OpAmpMultiParams {
    #[inline]
    pub fn builder() -> OpAmpMultiParamsBuilder {
        OpAmpMultiParamsBuilder::default()
    }

    pub fn new(num_amplifiers: usize) -> Self {
        Self {
            num_amplifiers,
            specs: SpecValues::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_amplifiers < 1 {
            return Err(Error::InvalidConfiguration(format!(
                "num_amplifiers must be at least 1, got {}",
                self.num_amplifiers
            )));
        }
        self.specs.validate()
    }
}

/// One amplifier channel: its zero-based index and one-based pin number.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Channel {
    pub index: usize,
    pub pin: usize,
}

/// The channels of a package with `num_amplifiers` amplifiers, in order.
pub fn channels(num_amplifiers: usize) -> impl Iterator<Item = Channel> {
    (0..num_amplifiers).map(|index| Channel {
        index,
        pin: index + 1,
    })
}

#[derive(Debug, Clone)]
pub struct OpAmpMulti {
    num_amplifiers: usize,
    num_amplifiers_param: ParamId,
    specs: AmplifierSpecs,
    ports: Ports,
    opamps: Vec<OpAmp>,
    pin_heuristic: PinAssociationTable,
}

impl Component for OpAmpMulti {
    type Params = OpAmpMultiParams;

    fn new(params: &Self::Params, graph: &mut Graph) -> Result<Self> {
        params.validate()?;
        let num_amplifiers = params.num_amplifiers;
        log::info!("building op-amp package with {num_amplifiers} amplifiers");

        let ports = Ports::replicate(graph, num_amplifiers)?;

        let specs = AmplifierSpecs::new(graph);
        let num_amplifiers_param = graph.param("num_amplifiers", Unit::Count);
        graph.constrain(num_amplifiers_param, Quantity::count(num_amplifiers))?;

        let opamps = ports.bind(graph, &specs)?;
        specs.constrain(&params.specs, graph)?;

        let pin_heuristic = ports.pin_association_heuristic()?;
        log::debug!(
            "pin heuristic has {} entries for {num_amplifiers} amplifiers",
            pin_heuristic.len()
        );

        Ok(Self {
            num_amplifiers,
            num_amplifiers_param,
            specs,
            ports,
            opamps,
            pin_heuristic,
        })
    }

    fn name(&self) -> ArcStr {
        arcstr::format!("opamp_multi_{}", self.num_amplifiers)
    }
}

impl OpAmpMulti {
    /// Builds a package of `num_amplifiers` channels at the top level of `graph`.
    pub fn construct(graph: &mut Graph, num_amplifiers: usize) -> Result<Self> {
        Self::from_params(graph, &OpAmpMultiParams::new(num_amplifiers))
    }

    pub fn from_params(graph: &mut Graph, params: &OpAmpMultiParams) -> Result<Self> {
        graph.instantiate::<Self>("opamp_multi", params)
    }

    pub fn num_amplifiers(&self) -> usize {
        self.num_amplifiers
    }

    /// The count spec, constrained to [`OpAmpMulti::num_amplifiers`].
    pub fn num_amplifiers_param(&self) -> ParamId {
        self.num_amplifiers_param
    }

    pub fn specs(&self) -> &AmplifierSpecs {
        &self.specs
    }

    pub fn power(&self) -> &ElectricPower {
        &self.ports.power
    }

    pub fn inverting_input(&self) -> &[NodeId] {
        &self.ports.inverting_input
    }

    pub fn non_inverting_input(&self) -> &[NodeId] {
        &self.ports.non_inverting_input
    }

    pub fn output(&self) -> &[NodeId] {
        &self.ports.output
    }

    #[inline]
    pub fn inverting(&self) -> &[NodeId] {
        self.inverting_input()
    }

    #[inline]
    pub fn non_inverting(&self) -> &[NodeId] {
        self.non_inverting_input()
    }

    pub fn opamps(&self) -> &[OpAmp] {
        &self.opamps
    }

    pub fn simple_value_representation(&self) -> SimpleValueRepresentation {
        self.specs
            .iter()
            .fold(SimpleValueRepresentation::new(), |repr, (kind, param)| {
                repr.with_spec(param, kind.suffix())
            })
    }

    /// Renders the constrained package specs, e.g. `10MHz BW 90dB CMRR`.
    pub fn value_representation(&self, graph: &Graph) -> Result<String> {
        Ok(self.simple_value_representation().render(graph)?)
    }
}

impl HasDesignatorPrefix for OpAmpMulti {
    fn designator_prefix(&self) -> DesignatorPrefix {
        DesignatorPrefix::U
    }
}

impl HasPinAssociationHeuristic for OpAmpMulti {
    fn pin_association_heuristic(&self) -> &PinAssociationTable {
        &self.pin_heuristic
    }
}

#[cfg(test)]
mod tests {
    use crate::blocks::opamp::SpecKind;

    use super::*;

    #[test]
    fn test_channels() {
        let chs = channels(3).collect::<Vec<_>>();
        assert_eq!(chs.len(), 3);
        assert_eq!(chs[0], Channel { index: 0, pin: 1 });
        assert_eq!(chs[2], Channel { index: 2, pin: 3 });
        assert_eq!(channels(0).count(), 0);
    }

    #[test]
    fn test_params_builder() {
        let params = OpAmpMultiParams::builder()
            .num_amplifiers(4)
            .build()
            .unwrap();
        assert_eq!(params, OpAmpMultiParams::new(4));
        assert!(OpAmpMultiParams::builder().build().is_err());
    }

    #[test]
    fn test_zero_amplifiers_rejected() {
        let mut g = Graph::new();
        let res = OpAmpMulti::construct(&mut g, 0);
        assert!(matches!(res, Err(Error::InvalidConfiguration(_))));
        assert_eq!(g.num_nodes(), 0);
        assert_eq!(g.num_params(), 0);
        assert_eq!(g.num_connections(), 0);
        assert_eq!(g.num_aliases(), 0);
    }

    #[test]
    fn test_construct_counts() {
        let mut g = Graph::new();
        let pkg = OpAmpMulti::construct(&mut g, 3).unwrap();

        // package: 2 rails + 3 * 3 ports; each opamp: 2 rails + 3 ports
        assert_eq!(g.num_nodes(), 11 + 3 * 5);
        assert_eq!(g.num_connections(), 3 * 5);
        assert_eq!(g.num_aliases(), 3 * 7);
        assert_eq!(g.num_params(), 8 + 3 * 7);
        assert_eq!(pkg.name().as_str(), "opamp_multi_3");
        assert_eq!(pkg.designator_prefix(), DesignatorPrefix::U);
        assert_eq!(
            g.resolve(pkg.num_amplifiers_param()).unwrap(),
            Some(Quantity::count(3))
        );
    }

    #[test]
    fn test_node_names() {
        let mut g = Graph::new();
        let pkg = OpAmpMulti::construct(&mut g, 2).unwrap();
        assert_eq!(
            g.node_name(pkg.inverting_input()[1]).unwrap(),
            "opamp_multi.inverting_input[1]"
        );
        assert_eq!(
            g.node_name(pkg.opamps()[1].output).unwrap(),
            "opamp_multi.opamps[1].output"
        );
        assert_eq!(
            g.node_name(pkg.power().lv).unwrap(),
            "opamp_multi.power.lv"
        );
    }

    #[test]
    fn test_port_aliases() {
        let mut g = Graph::new();
        let pkg = OpAmpMulti::construct(&mut g, 2).unwrap();
        assert_eq!(pkg.inverting(), pkg.inverting_input());
        assert_eq!(pkg.non_inverting(), pkg.non_inverting_input());
    }

    #[test]
    fn test_value_representation() {
        let mut g = Graph::new();
        let mut specs = SpecValues::default();
        specs.set(SpecKind::Bandwidth, 10e6);
        specs.set(SpecKind::CommonModeRejectionRatio, 90.0);
        specs.set(SpecKind::SlewRate, 13e6);
        let params = OpAmpMultiParams {
            num_amplifiers: 2,
            specs,
        };
        let pkg = OpAmpMulti::from_params(&mut g, &params).unwrap();

        assert_eq!(
            pkg.value_representation(&g).unwrap(),
            "10MHz BW 90dB CMRR 13MV/s SR"
        );
    }

    #[test]
    fn test_value_representation_empty() {
        let mut g = Graph::new();
        let pkg = OpAmpMulti::construct(&mut g, 1).unwrap();
        assert_eq!(pkg.value_representation(&g).unwrap(), "");
    }
}
