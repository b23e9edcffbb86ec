// Domain layer: book records, run reports and the ports the pipeline talks through.

pub mod model;
pub mod ports;
