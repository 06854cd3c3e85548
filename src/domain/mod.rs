// Domain layer: deck and plate models plus the ports the engine is generic over.

pub mod model;
pub mod ports;
