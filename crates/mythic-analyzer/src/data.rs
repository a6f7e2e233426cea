//! Game data the bundled schemas consult.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

/// Game data: registries, limits, and per-mechanic capabilities.
///
/// Every field has a default, so a JSON file only needs the fields it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MythicData {
    /// Duration of one server tick in seconds.
    pub tick_duration: f64,
    /// Upper bound of the armor attribute.
    pub attribute_max_armor: f64,
    pub entity_types: Vec<String>,
    pub materials: Vec<String>,
    /// Materials that accept potion effects.
    pub potion_materials: Vec<String>,
    pub boss_bar_colors: Vec<String>,
    pub boss_bar_styles: Vec<String>,
    pub enchantments: Vec<String>,
    pub hide_flags: Vec<String>,
    /// Mechanics whose first numeric component is a positional argument
    /// rather than a chance.
    pub positional_argument_mechanics: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for MythicData {
    fn default() -> Self {
        Self {
            tick_duration: 0.05,
            attribute_max_armor: 30.0,
            entity_types: strings(&[
                "ARMOR_STAND", "BAT", "BEE", "BLAZE", "CAT", "CAVE_SPIDER", "CHICKEN", "COW",
                "CREEPER", "DOLPHIN", "DROWNED", "ELDER_GUARDIAN", "ENDER_DRAGON", "ENDERMAN",
                "ENDERMITE", "EVOKER", "FOX", "GHAST", "GIANT", "GOAT", "GUARDIAN", "HOGLIN",
                "HORSE", "HUSK", "ILLUSIONER", "IRON_GOLEM", "LLAMA", "MAGMA_CUBE", "MUSHROOM_COW",
                "OCELOT", "PANDA", "PARROT", "PHANTOM", "PIG", "PIGLIN", "PIGLIN_BRUTE",
                "PILLAGER", "POLAR_BEAR", "RABBIT", "RAVAGER", "SHEEP", "SHULKER", "SILVERFISH",
                "SKELETON", "SKELETON_HORSE", "SLIME", "SNOWMAN", "SPIDER", "SQUID", "STRAY",
                "STRIDER", "TURTLE", "VEX", "VILLAGER", "VINDICATOR", "WANDERING_TRADER", "WARDEN",
                "WITCH", "WITHER", "WITHER_SKELETON", "WOLF", "ZOGLIN", "ZOMBIE", "ZOMBIE_HORSE",
                "ZOMBIE_VILLAGER", "ZOMBIFIED_PIGLIN",
            ]),
            materials: strings(&[
                "AIR", "APPLE", "ARROW", "BONE", "BOW", "BREAD", "CARROT", "COAL", "COBBLESTONE",
                "CROSSBOW", "DIAMOND", "DIAMOND_AXE", "DIAMOND_BOOTS", "DIAMOND_CHESTPLATE",
                "DIAMOND_HELMET", "DIAMOND_LEGGINGS", "DIAMOND_SWORD", "DIRT", "EMERALD",
                "ENCHANTED_BOOK", "FEATHER", "GOLD_INGOT", "GOLDEN_APPLE", "GOLDEN_SWORD",
                "IRON_AXE", "IRON_INGOT", "IRON_SWORD", "LEATHER", "LEATHER_BOOTS",
                "LEATHER_CHESTPLATE", "LEATHER_HELMET", "LEATHER_LEGGINGS", "LINGERING_POTION",
                "NETHERITE_SWORD", "PAPER", "PLAYER_HEAD", "POTION", "ROTTEN_FLESH", "SHIELD",
                "SPLASH_POTION", "STICK", "STONE", "STONE_SWORD", "STRING", "TIPPED_ARROW",
                "TOTEM_OF_UNDYING", "TRIDENT", "WOODEN_SWORD",
            ]),
            potion_materials: strings(&[
                "POTION",
                "SPLASH_POTION",
                "LINGERING_POTION",
                "TIPPED_ARROW",
            ]),
            boss_bar_colors: strings(&["PINK", "BLUE", "RED", "GREEN", "YELLOW", "PURPLE", "WHITE"]),
            boss_bar_styles: strings(&[
                "SOLID",
                "SEGMENTED_6",
                "SEGMENTED_10",
                "SEGMENTED_12",
                "SEGMENTED_20",
            ]),
            enchantments: strings(&[
                "AQUA_AFFINITY", "BANE_OF_ARTHROPODS", "BLAST_PROTECTION", "CHANNELING",
                "DEPTH_STRIDER", "EFFICIENCY", "FEATHER_FALLING", "FIRE_ASPECT", "FIRE_PROTECTION",
                "FLAME", "FORTUNE", "FROST_WALKER", "IMPALING", "INFINITY", "KNOCKBACK", "LOOTING",
                "LOYALTY", "LUCK_OF_THE_SEA", "LURE", "MENDING", "MULTISHOT", "PIERCING", "POWER",
                "PROJECTILE_PROTECTION", "PROTECTION", "PUNCH", "QUICK_CHARGE", "RESPIRATION",
                "RIPTIDE", "SHARPNESS", "SILK_TOUCH", "SMITE", "SOUL_SPEED", "SWEEPING_EDGE",
                "SWIFT_SNEAK", "THORNS", "UNBREAKING",
            ]),
            hide_flags: strings(&[
                "HIDE_ENCHANTS",
                "HIDE_ATTRIBUTES",
                "HIDE_UNBREAKABLE",
                "HIDE_DESTROYS",
                "HIDE_PLACED_ON",
                "HIDE_POTION_EFFECTS",
                "HIDE_DYE",
                "HIDE_ARMOR_TRIM",
            ]),
            positional_argument_mechanics: strings(&["delay"]),
        }
    }
}

impl MythicData {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load data overrides from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadDataError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LoadDataError::Io {
            path: path.to_path_buf(),
            error: e,
        })?;
        let data = Self::from_json(&content).map_err(|e| LoadDataError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        info!(?path, materials = data.materials.len(), "Loaded game data");
        Ok(data)
    }

    /// Whether `mechanic`'s leading numeric component is a positional
    /// argument. Compared case-insensitively.
    pub fn takes_positional_argument(&self, mechanic: &str) -> bool {
        self.positional_argument_mechanics
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mechanic))
    }

    pub fn is_potion_material(&self, material: &str) -> bool {
        self.potion_materials
            .iter()
            .any(|m| m.eq_ignore_ascii_case(material))
    }
}

/// Error loading a game data file.
#[derive(Debug)]
pub enum LoadDataError {
    Io { path: PathBuf, error: std::io::Error },
    Parse { path: PathBuf, error: String },
}

impl std::fmt::Display for LoadDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadDataError::Io { path, error } => {
                write!(f, "Failed to read game data at {}: {}", path.display(), error)
            }
            LoadDataError::Parse { path, error } => {
                write!(f, "Failed to parse game data at {}: {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for LoadDataError {}
