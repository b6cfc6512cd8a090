use crate::fixed::Fixed64;

/// Tunables for liquid flow, leaks, and liquid reactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowConfig {
    /// Headroom always left free in a receiving tile.
    pub flow_epsilon: Fixed64,
    /// Both tiles must be fuller than this for their liquids to react.
    pub contact_threshold: Fixed64,
    /// A liquid above this flammability ignites against a hot liquid.
    pub flammability_threshold: Fixed64,
    /// Temperature above which a liquid counts as hot.
    pub hot_threshold: Fixed64,
    /// Temperature below which a liquid counts as cold.
    pub cold_threshold: Fixed64,
    /// Damage per unit of elapsed time dealt to both tiles on ignition.
    pub fire_damage: Fixed64,
    /// Fire effect probability per unit of elapsed time.
    pub fire_chance: Fixed64,
    /// Steam effect probability per unit of elapsed time.
    pub steam_chance: Fixed64,
    /// Hot liquid boiled off per unit of elapsed time.
    pub evaporation_rate: Fixed64,
    /// A leak moves `amount / leak_divisor` onto the ground, capped at
    /// everything the tile holds.
    pub leak_divisor: Fixed64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            flow_epsilon: Fixed64::from_num(0.001),
            contact_threshold: Fixed64::from_num(0.1),
            flammability_threshold: Fixed64::from_num(0.3),
            hot_threshold: Fixed64::from_num(0.7),
            cold_threshold: Fixed64::from_num(0.55),
            fire_damage: Fixed64::ONE,
            fire_chance: Fixed64::from_num(0.1),
            steam_chance: Fixed64::from_num(0.2),
            evaporation_rate: Fixed64::from_num(0.7),
            leak_divisor: Fixed64::from_num(1.5),
        }
    }
}
