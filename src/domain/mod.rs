// Domain layer: request-scoped models and the ports the lookup pipeline depends on.

pub mod model;
pub mod ports;
