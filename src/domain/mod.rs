// Domain layer: document models, schema declaration and ports (interfaces).

pub mod model;
pub mod ports;
pub mod schema;
