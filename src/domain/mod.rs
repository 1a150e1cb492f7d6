// Domain layer: card models and the ports the issuance core depends on.

pub mod model;
pub mod ports;
