use serde::{Deserialize, Serialize};

/// Name and z-index of a layer to create up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDef {
    pub name: String,
    pub z_index: i32,
}

impl LayerDef {
    pub fn new(name: impl Into<String>, z_index: i32) -> Self {
        Self { name: name.into(), z_index }
    }
}

/// The shipped layer set. Other subsystems address these by name.
pub const DEFAULT_LAYERS: [(&str, i32); 7] = [
    ("background", 0),
    ("ground", 1),
    ("tiles", 2),
    ("environment", 3),
    ("entities", 4),
    ("effects", 5),
    ("ui", 6),
];

pub fn default_layer_defs() -> Vec<LayerDef> {
    DEFAULT_LAYERS
        .iter()
        .map(|&(name, z)| LayerDef::new(name, z))
        .collect()
}
