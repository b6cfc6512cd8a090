//! Serde structs for content files.
//!
//! These define the on-disk format. Everything that refers to another
//! definition does so by name; the loader resolves names into ids.

use serde::Deserialize;
use tileflow_core::config::FlowConfig;
use tileflow_core::fixed::fixed64_to_f64;

/// Top level of a content file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentFile {
    #[serde(default)]
    pub items: Vec<ItemData>,
    #[serde(default)]
    pub liquids: Vec<LiquidData>,
    #[serde(default)]
    pub blocks: Vec<BlockData>,
    #[serde(default)]
    pub flow: Option<FlowConfigData>,
}

// ===========================================================================
// Items and liquids
// ===========================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiquidData {
    pub name: String,
    #[serde(default)]
    pub flammability: f64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_temperature() -> f64 {
    0.5
}

// ===========================================================================
// Blocks
// ===========================================================================

/// A block descriptor. Unset capacities fall back to the kind's defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockData {
    pub name: String,
    pub kind: BlockKindData,
    #[serde(default = "default_size")]
    pub size: u8,
    #[serde(default)]
    pub item_capacity: Option<u32>,
    #[serde(default)]
    pub liquid_capacity: Option<f64>,
    #[serde(default)]
    pub power_capacity: Option<f64>,
    #[serde(default)]
    pub health: Option<f64>,
    #[serde(default)]
    pub solid: Option<bool>,
    #[serde(default)]
    pub has_items: Option<bool>,
    #[serde(default)]
    pub has_liquids: Option<bool>,
    #[serde(default)]
    pub has_power: Option<bool>,
    #[serde(default)]
    pub liquid_flow_factor: Option<f64>,
}

fn default_size() -> u8 {
    1
}

/// Block behavior family, with item parameters given by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKindData {
    Wall,
    Container,
    Router,
    Sorter { item: String },
    Conveyor,
    ItemSource { item: String },
    ItemVoid,
    Conduit,
    LiquidRouter,
    Battery,
}

// ===========================================================================
// Flow tunables
// ===========================================================================

/// Liquid flow settings. Any field left out keeps its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlowConfigData {
    pub flow_epsilon: f64,
    pub contact_threshold: f64,
    pub flammability_threshold: f64,
    pub hot_threshold: f64,
    pub cold_threshold: f64,
    pub fire_damage: f64,
    pub fire_chance: f64,
    pub steam_chance: f64,
    pub evaporation_rate: f64,
    pub leak_divisor: f64,
}

impl Default for FlowConfigData {
    fn default() -> Self {
        let c = FlowConfig::default();
        Self {
            flow_epsilon: fixed64_to_f64(c.flow_epsilon),
            contact_threshold: fixed64_to_f64(c.contact_threshold),
            flammability_threshold: fixed64_to_f64(c.flammability_threshold),
            hot_threshold: fixed64_to_f64(c.hot_threshold),
            cold_threshold: fixed64_to_f64(c.cold_threshold),
            fire_damage: fixed64_to_f64(c.fire_damage),
            fire_chance: fixed64_to_f64(c.fire_chance),
            steam_chance: fixed64_to_f64(c.steam_chance),
            evaporation_rate: fixed64_to_f64(c.evaporation_rate),
            leak_divisor: fixed64_to_f64(c.leak_divisor),
        }
    }
}
