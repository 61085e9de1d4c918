// Domain layer: models and ports. No network or runtime code here.

pub mod model;
pub mod ports;
