use crate::heuristic::PinAssociationTable;
use crate::Result;

use super::channels;
use super::schematic::Ports;

impl Ports {
    /// Candidate pin names for every package node.
    ///
    /// Amplifier pin numbers start at 1 and do not reserve slots for the
    /// power rails. Matching is case-insensitive and exact.
    pub(super) fn pin_association_heuristic(&self) -> Result<PinAssociationTable> {
        let mut table = PinAssociationTable::new(false, false);
        self.power.add_pin_heuristics(&mut table)?;

        for ch in channels(self.num_channels()) {
            let n = ch.pin;
            table.insert(
                self.inverting_input[ch.index],
                [arcstr::format!("{n}-"), arcstr::format!("IN{n}-")],
            )?;
            table.insert(
                self.non_inverting_input[ch.index],
                [arcstr::format!("{n}+"), arcstr::format!("IN{n}+")],
            )?;
            table.insert(self.output[ch.index], [arcstr::format!("OUT{n}")])?;
        }

        Ok(table)
    }
}
