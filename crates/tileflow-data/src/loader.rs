//! Resolution pipeline: parse a content file, resolve names, build content.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use tileflow_core::block::{Block, BlockKind};
use tileflow_core::config::FlowConfig;
use tileflow_core::content::{Content, ContentBuilder, ContentError};
use tileflow_core::fixed::Fixed64;
use tileflow_core::id::ItemId;

use crate::schema::{BlockData, BlockKindData, ContentFile, FlowConfigData};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading content.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: String },

    /// A deserialization error occurred.
    #[error("parse error in {origin}: {detail}")]
    Parse { origin: String, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in block '{block}'")]
    UnresolvedRef {
        block: String,
        name: String,
        expected_kind: &'static str,
    },

    /// Two definitions of the same kind share a name.
    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    /// A number that does not fit the simulation's fixed-point range, or
    /// is out of range for its field.
    #[error("invalid value {value} for {field}")]
    InvalidValue { field: String, value: f64 },

    /// The resolved content failed validation.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported content file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.display().to_string(),
        }),
    }
}

fn parse<T: DeserializeOwned>(src: &str, format: Format, origin: &str) -> Result<T, DataLoadError> {
    let parsed = match format {
        Format::Ron => ron::from_str(src).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str(src).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str(src).map_err(|e| e.to_string()),
    };
    parsed.map_err(|detail| DataLoadError::Parse {
        origin: origin.to_string(),
        detail,
    })
}

// ===========================================================================
// Loading
// ===========================================================================

/// Frozen content plus the flow tunables that came with it.
#[derive(Debug, Clone)]
pub struct LoadedContent {
    pub content: Content,
    pub config: FlowConfig,
}

/// Load content from a string in the given format.
pub fn load_content_str(src: &str, format: Format) -> Result<LoadedContent, DataLoadError> {
    let file: ContentFile = parse(src, format, &format!("inline {format:?}"))?;
    resolve(file)
}

/// Load content from a file, picking the format from its extension.
pub fn load_content_file(path: &Path) -> Result<LoadedContent, DataLoadError> {
    let format = detect_format(path)?;
    let src = std::fs::read_to_string(path)?;
    let file: ContentFile = parse(&src, format, &path.display().to_string())?;
    let loaded = resolve(file)?;
    tracing::debug!(path = %path.display(), "loaded content file");
    Ok(loaded)
}

fn resolve(file: ContentFile) -> Result<LoadedContent, DataLoadError> {
    let mut builder = ContentBuilder::new();

    let mut items: HashMap<String, ItemId> = HashMap::new();
    for item in &file.items {
        check_duplicate(&items, &item.name, "item")?;
        items.insert(item.name.clone(), builder.register_item(&item.name));
    }

    let mut liquids = HashMap::new();
    for liquid in &file.liquids {
        check_duplicate(&liquids, &liquid.name, "liquid")?;
        let flammability = to_fixed(liquid.flammability, &liquid.name, "flammability")?;
        let temperature = to_fixed(liquid.temperature, &liquid.name, "temperature")?;
        liquids.insert(
            liquid.name.clone(),
            builder.register_liquid(&liquid.name, flammability, temperature),
        );
    }

    let mut blocks = HashMap::new();
    for data in &file.blocks {
        check_duplicate(&blocks, &data.name, "block")?;
        let block = build_block(data, &items)?;
        blocks.insert(data.name.clone(), builder.register_block(block));
    }

    let content = builder.build()?;
    let config = match &file.flow {
        Some(flow) => flow_config(flow)?,
        None => FlowConfig::default(),
    };

    tracing::debug!(
        items = content.item_count(),
        liquids = content.liquid_count(),
        blocks = content.block_count(),
        "resolved content"
    );
    Ok(LoadedContent { content, config })
}

fn build_block(data: &BlockData, items: &HashMap<String, ItemId>) -> Result<Block, DataLoadError> {
    let item_ref = |name: &str| {
        items.get(name).copied().ok_or_else(|| DataLoadError::UnresolvedRef {
            block: data.name.clone(),
            name: name.to_string(),
            expected_kind: "item",
        })
    };
    let kind = match &data.kind {
        BlockKindData::Wall => BlockKind::Wall,
        BlockKindData::Container => BlockKind::Container,
        BlockKindData::Router => BlockKind::Router,
        BlockKindData::Sorter { item } => BlockKind::Sorter { item: item_ref(item)? },
        BlockKindData::Conveyor => BlockKind::Conveyor,
        BlockKindData::ItemSource { item } => BlockKind::ItemSource { item: item_ref(item)? },
        BlockKindData::ItemVoid => BlockKind::ItemVoid,
        BlockKindData::Conduit => BlockKind::Conduit,
        BlockKindData::LiquidRouter => BlockKind::LiquidRouter,
        BlockKindData::Battery => BlockKind::Battery,
    };

    let mut block = Block::new(&data.name, kind).with_size(data.size);
    if let Some(capacity) = data.item_capacity {
        block = block.with_item_capacity(capacity);
    }
    if let Some(capacity) = data.liquid_capacity {
        block = block.with_liquid_capacity(to_fixed(capacity, &data.name, "liquid_capacity")?);
    }
    if let Some(capacity) = data.power_capacity {
        block = block.with_power_capacity(to_fixed(capacity, &data.name, "power_capacity")?);
    }
    if let Some(health) = data.health {
        block.health = to_fixed(health, &data.name, "health")?;
    }
    if let Some(solid) = data.solid {
        block.solid = solid;
    }
    block.has_items = data.has_items.unwrap_or(block.has_items);
    block.has_liquids = data.has_liquids.unwrap_or(block.has_liquids);
    block.has_power = data.has_power.unwrap_or(block.has_power);
    if let Some(factor) = data.liquid_flow_factor {
        block.liquid_flow_factor = to_fixed(factor, &data.name, "liquid_flow_factor")?;
    }
    Ok(block)
}

fn flow_config(data: &FlowConfigData) -> Result<FlowConfig, DataLoadError> {
    let f = |value: f64, field: &str| to_fixed(value, "flow", field);
    let config = FlowConfig {
        flow_epsilon: f(data.flow_epsilon, "flow_epsilon")?,
        contact_threshold: f(data.contact_threshold, "contact_threshold")?,
        flammability_threshold: f(data.flammability_threshold, "flammability_threshold")?,
        hot_threshold: f(data.hot_threshold, "hot_threshold")?,
        cold_threshold: f(data.cold_threshold, "cold_threshold")?,
        fire_damage: f(data.fire_damage, "fire_damage")?,
        fire_chance: f(data.fire_chance, "fire_chance")?,
        steam_chance: f(data.steam_chance, "steam_chance")?,
        evaporation_rate: f(data.evaporation_rate, "evaporation_rate")?,
        leak_divisor: f(data.leak_divisor, "leak_divisor")?,
    };
    // A divisor below one would spill more than the tile holds.
    if config.leak_divisor < Fixed64::ONE {
        return Err(DataLoadError::InvalidValue {
            field: "flow.leak_divisor".to_string(),
            value: data.leak_divisor,
        });
    }
    Ok(config)
}

// ===========================================================================
// Helpers
// ===========================================================================

fn to_fixed(value: f64, owner: &str, field: &str) -> Result<Fixed64, DataLoadError> {
    Fixed64::checked_from_num(value).ok_or_else(|| DataLoadError::InvalidValue {
        field: format!("{owner}.{field}"),
        value,
    })
}

fn check_duplicate<V>(map: &HashMap<String, V>, name: &str, kind: &'static str) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            kind,
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tileflow_core::test_utils::fixed;

    const RON_SRC: &str = r#"(
        items: [(name: "copper"), (name: "lead")],
        liquids: [
            (name: "water"),
            (name: "oil", flammability: 1.2),
        ],
        blocks: [
            (name: "vault", kind: container, item_capacity: Some(300)),
            (name: "copper-sorter", kind: sorter(item: "copper")),
            (name: "tank", kind: liquid_router, size: 2, liquid_capacity: Some(40.0)),
        ],
    )"#;

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("content.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("content.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("content.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        assert!(matches!(
            detect_format(Path::new("content.yaml")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            detect_format(Path::new("content")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn ron_resolves_names_and_overrides() {
        let loaded = load_content_str(RON_SRC, Format::Ron).unwrap();
        let content = &loaded.content;
        let copper = content.item_by_name("copper").unwrap();

        let sorter = content.block(content.block_by_name("copper-sorter").unwrap()).unwrap();
        assert_eq!(sorter.kind, BlockKind::Sorter { item: copper });

        let vault = content.block(content.block_by_name("vault").unwrap()).unwrap();
        assert_eq!(vault.item_capacity, 300);

        let tank = content.block(content.block_by_name("tank").unwrap()).unwrap();
        assert_eq!((tank.size, tank.liquid_capacity), (2, fixed(40.0)));

        let water = content.liquid(content.liquid_by_name("water").unwrap()).unwrap();
        assert_eq!(water.temperature, fixed(0.5));
        assert_eq!(loaded.config, FlowConfig::default());
    }

    #[test]
    fn unknown_item_reference_is_reported() {
        let src = r#"(blocks: [(name: "s", kind: sorter(item: "gold"))])"#;
        let err = load_content_str(src, Format::Ron).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::UnresolvedRef { ref name, expected_kind: "item", .. } if name == "gold"
        ));
    }

    #[test]
    fn duplicate_names_are_reported() {
        let src = r#"(items: [(name: "copper"), (name: "copper")])"#;
        assert!(matches!(
            load_content_str(src, Format::Ron),
            Err(DataLoadError::DuplicateName { kind: "item", .. })
        ));
    }

    #[test]
    fn invalid_block_size_surfaces_content_error() {
        let src = r#"(blocks: [(name: "huge", kind: wall, size: 40)])"#;
        assert!(matches!(
            load_content_str(src, Format::Ron),
            Err(DataLoadError::Content(ContentError::InvalidSize { size: 40, .. }))
        ));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let src = r#"{"liquids": [{"name": "x", "temperature": 1e300}]}"#;
        assert!(matches!(
            load_content_str(src, Format::Json),
            Err(DataLoadError::InvalidValue { .. })
        ));
    }

    #[test]
    fn capability_overrides_apply() {
        let src = r#"(blocks: [
            (name: "sealed-belt", kind: conveyor, has_items: Some(false), has_liquids: Some(true)),
            (name: "charged-wall", kind: wall, has_power: Some(true), liquid_flow_factor: Some(2.5)),
        ])"#;
        let loaded = load_content_str(src, Format::Ron).unwrap();
        let content = &loaded.content;

        let belt = content.block(content.block_by_name("sealed-belt").unwrap()).unwrap();
        assert!(!belt.has_items);
        assert!(belt.has_liquids);
        assert!(!belt.has_power);

        let wall = content.block(content.block_by_name("charged-wall").unwrap()).unwrap();
        assert!(wall.has_power);
        assert!(!wall.has_items);
        assert_eq!(wall.liquid_flow_factor, fixed(2.5));
    }

    #[test]
    fn fractional_leak_divisor_is_rejected() {
        let src = "[flow]\nleak_divisor = 0.5\n";
        assert!(matches!(
            load_content_str(src, Format::Toml),
            Err(DataLoadError::InvalidValue { ref field, .. }) if field == "flow.leak_divisor"
        ));
    }

    #[test]
    fn zero_leak_divisor_is_rejected() {
        let src = "[flow]\nleak_divisor = 0.0\n";
        assert!(matches!(
            load_content_str(src, Format::Toml),
            Err(DataLoadError::InvalidValue { .. })
        ));
    }

    #[test]
    fn parse_errors_name_their_origin() {
        let err = load_content_str("{ not json", Format::Json).unwrap_err();
        assert!(err.to_string().contains("inline Json"));
    }
}
