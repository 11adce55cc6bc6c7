use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Reference designator prefixes, following IEEE 315.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DesignatorPrefix {
    /// Integrated circuit.
    U,
    R,
    C,
    L,
    D,
    Q,
    /// Connector.
    J,
    /// Crystal.
    Y,
}

impl Display for DesignatorPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            DesignatorPrefix::U => "U",
            DesignatorPrefix::R => "R",
            DesignatorPrefix::C => "C",
            DesignatorPrefix::L => "L",
            DesignatorPrefix::D => "D",
            DesignatorPrefix::Q => "Q",
            DesignatorPrefix::J => "J",
            DesignatorPrefix::Y => "Y",
        };
        write!(f, "{s}")
    }
}

pub trait HasDesignatorPrefix {
    fn designator_prefix(&self) -> DesignatorPrefix;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(DesignatorPrefix::U.to_string(), "U");
        assert_eq!(format!("{}1", DesignatorPrefix::J), "J1");
    }
}
