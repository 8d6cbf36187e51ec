// Domain layer: lead models and the submitter port. No I/O here.

pub mod model;
pub mod ports;
