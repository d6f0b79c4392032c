// Domain layer: the hospital record and the ports stores and file storage implement.

pub mod model;
pub mod ports;
