// Domain layer: entities, the teaching rule, and the ports the core talks through.

pub mod model;
pub mod ports;
pub mod session;
