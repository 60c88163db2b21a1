// Domain layer: catalog models and the ports the audit stages depend on.

pub mod model;
pub mod ports;
