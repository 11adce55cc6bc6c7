pub mod opamp;
pub mod opamp_multi;
pub mod power;
