use serde::{Deserialize, Serialize};

use crate::graph::{self, Graph, ParamId};
use crate::units::{Quantity, Unit};
use crate::{Error, Result};

/// The parametric specs shared by every amplifier channel.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SpecKind {
    Bandwidth,
    CommonModeRejectionRatio,
    InputBiasCurrent,
    InputOffsetVoltage,
    GainBandwidthProduct,
    OutputCurrent,
    SlewRate,
}

impl SpecKind {
    pub const ALL: [SpecKind; 7] = [
        SpecKind::Bandwidth,
        SpecKind::CommonModeRejectionRatio,
        SpecKind::InputBiasCurrent,
        SpecKind::InputOffsetVoltage,
        SpecKind::GainBandwidthProduct,
        SpecKind::OutputCurrent,
        SpecKind::SlewRate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpecKind::Bandwidth => "bandwidth",
            SpecKind::CommonModeRejectionRatio => "common_mode_rejection_ratio",
            SpecKind::InputBiasCurrent => "input_bias_current",
            SpecKind::InputOffsetVoltage => "input_offset_voltage",
            SpecKind::GainBandwidthProduct => "gain_bandwidth_product",
            SpecKind::OutputCurrent => "output_current",
            SpecKind::SlewRate => "slew_rate",
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            SpecKind::Bandwidth | SpecKind::GainBandwidthProduct => Unit::Hertz,
            SpecKind::CommonModeRejectionRatio => Unit::Decibel,
            SpecKind::InputBiasCurrent | SpecKind::OutputCurrent => Unit::Ampere,
            SpecKind::InputOffsetVoltage => Unit::Volt,
            SpecKind::SlewRate => Unit::VoltPerSecond,
        }
    }

    /// Short label used in value representations.
    pub fn suffix(&self) -> &'static str {
        match self {
            SpecKind::Bandwidth => "BW",
            SpecKind::CommonModeRejectionRatio => "CMRR",
            SpecKind::InputBiasCurrent => "Ib",
            SpecKind::InputOffsetVoltage => "Vos",
            SpecKind::GainBandwidthProduct => "GBW",
            SpecKind::OutputCurrent => "Iout",
            SpecKind::SlewRate => "SR",
        }
    }
}

/// Handles to the seven specs of one amplifier (or one package).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AmplifierSpecs {
    pub bandwidth: ParamId,
    pub common_mode_rejection_ratio: ParamId,
    pub input_bias_current: ParamId,
    pub input_offset_voltage: ParamId,
    pub gain_bandwidth_product: ParamId,
    pub output_current: ParamId,
    pub slew_rate: ParamId,
}

impl AmplifierSpecs {
    pub fn new(graph: &mut Graph) -> Self {
        let mut p = |kind: SpecKind| graph.param(kind.name(), kind.unit());
        Self {
            bandwidth: p(SpecKind::Bandwidth),
            common_mode_rejection_ratio: p(SpecKind::CommonModeRejectionRatio),
            input_bias_current: p(SpecKind::InputBiasCurrent),
            input_offset_voltage: p(SpecKind::InputOffsetVoltage),
            gain_bandwidth_product: p(SpecKind::GainBandwidthProduct),
            output_current: p(SpecKind::OutputCurrent),
            slew_rate: p(SpecKind::SlewRate),
        }
    }

    pub fn get(&self, kind: SpecKind) -> ParamId {
        match kind {
            SpecKind::Bandwidth => self.bandwidth,
            SpecKind::CommonModeRejectionRatio => self.common_mode_rejection_ratio,
            SpecKind::InputBiasCurrent => self.input_bias_current,
            SpecKind::InputOffsetVoltage => self.input_offset_voltage,
            SpecKind::GainBandwidthProduct => self.gain_bandwidth_product,
            SpecKind::OutputCurrent => self.output_current,
            SpecKind::SlewRate => self.slew_rate,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpecKind, ParamId)> + '_ {
        SpecKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    /// Declares each spec of `sub` equal to the matching spec of `self`.
    pub fn propagate_to(&self, sub: &AmplifierSpecs, graph: &mut Graph) -> graph::Result<()> {
        for (kind, param) in self.iter() {
            graph.alias_is(sub.get(kind), param)?;
        }
        Ok(())
    }

    /// Constrains every spec that has a value in `values`.
    pub fn constrain(&self, values: &SpecValues, graph: &mut Graph) -> graph::Result<()> {
        for (kind, param) in self.iter() {
            if let Some(value) = values.get(kind) {
                graph.constrain(param, Quantity::new(value, kind.unit()))?;
            }
        }
        Ok(())
    }
}

/// Optional literal values for each spec, in base units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpecValues {
    pub bandwidth: Option<f64>,
    pub common_mode_rejection_ratio: Option<f64>,
    pub input_bias_current: Option<f64>,
    pub input_offset_voltage: Option<f64>,
    pub gain_bandwidth_product: Option<f64>,
    pub output_current: Option<f64>,
    pub slew_rate: Option<f64>,
}

impl SpecValues {
    pub fn get(&self, kind: SpecKind) -> Option<f64> {
        match kind {
            SpecKind::Bandwidth => self.bandwidth,
            SpecKind::CommonModeRejectionRatio => self.common_mode_rejection_ratio,
            SpecKind::InputBiasCurrent => self.input_bias_current,
            SpecKind::InputOffsetVoltage => self.input_offset_voltage,
            SpecKind::GainBandwidthProduct => self.gain_bandwidth_product,
            SpecKind::OutputCurrent => self.output_current,
            SpecKind::SlewRate => self.slew_rate,
        }
    }

    pub fn set(&mut self, kind: SpecKind, value: f64) {
        let slot = match kind {
            SpecKind::Bandwidth => &mut self.bandwidth,
            SpecKind::CommonModeRejectionRatio => &mut self.common_mode_rejection_ratio,
            SpecKind::InputBiasCurrent => &mut self.input_bias_current,
            SpecKind::InputOffsetVoltage => &mut self.input_offset_voltage,
            SpecKind::GainBandwidthProduct => &mut self.gain_bandwidth_product,
            SpecKind::OutputCurrent => &mut self.output_current,
            SpecKind::SlewRate => &mut self.slew_rate,
        };
        *slot = Some(value);
    }

    /// Rejects non-finite values.
    pub fn validate(&self) -> Result<()> {
        for kind in SpecKind::ALL {
            if let Some(value) = self.get(kind) {
                if !value.is_finite() {
                    return Err(Error::InvalidConfiguration(format!(
                        "{} must be finite, got {value}",
                        kind.name()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specs_have_declared_units() {
        let mut g = Graph::new();
        let specs = AmplifierSpecs::new(&mut g);
        assert_eq!(g.num_params(), SpecKind::ALL.len());
        for (kind, param) in specs.iter() {
            assert_eq!(g.param_unit(param).unwrap(), kind.unit());
            assert_eq!(g.param_name(param).unwrap(), kind.name());
        }
    }

    #[test]
    fn test_propagate_to() {
        let mut g = Graph::new();
        let pkg = AmplifierSpecs::new(&mut g);
        let sub = AmplifierSpecs::new(&mut g);
        pkg.propagate_to(&sub, &mut g).unwrap();

        assert_eq!(g.num_aliases(), 7);
        for kind in SpecKind::ALL {
            assert!(g.is_alias_equal(pkg.get(kind), sub.get(kind)).unwrap());
        }
        assert!(!g.is_alias_equal(pkg.bandwidth, sub.gain_bandwidth_product).unwrap());
    }

    #[test]
    fn test_spec_values_validate() {
        let mut values = SpecValues::default();
        values.set(SpecKind::SlewRate, 13e6);
        assert!(values.validate().is_ok());
        assert_eq!(values.get(SpecKind::SlewRate), Some(13e6));

        values.set(SpecKind::Bandwidth, f64::NAN);
        assert!(matches!(
            values.validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
