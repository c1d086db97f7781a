//! Weapon definitions and the registry that maps weapon types to them.
//!
//! The registry is built once per session from the configured list and is
//! never mutated afterwards. A miss is not an error: `lookup` hands back the
//! sentinel definition so weapon-equipping code can degrade gracefully.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::WEAPON_DEFAULT_VELOCITY;
use crate::enums::WeaponType;

/// RGB color, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 3]);

impl Color {
    pub const WHITE: Color = Color([1.0, 1.0, 1.0]);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Configuration record describing one weapon.
///
/// `WeaponDefinition::default()` is the "not found" sentinel: its
/// `weapon_type` is `WeaponType::None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeaponDefinition {
    #[serde(rename = "type")]
    pub weapon_type: WeaponType,
    /// Letter to show on a power-up of this type.
    pub letter: String,
    pub power_up_color: Color,
    pub projectile_color: Color,
    /// Prefab used for projectiles, if any.
    pub projectile_prefab: Option<String>,
    /// Damage dealt by a single shot.
    pub damage_on_hit: f64,
    /// Continuous damage (laser).
    pub damage_per_sec: f64,
    pub delay_between_shots: f64,
    /// Projectile speed.
    pub velocity: f64,
}

impl Default for WeaponDefinition {
    fn default() -> Self {
        Self {
            weapon_type: WeaponType::None,
            letter: String::new(),
            power_up_color: Color::WHITE,
            projectile_color: Color::WHITE,
            projectile_prefab: None,
            damage_on_hit: 0.0,
            damage_per_sec: 0.0,
            delay_between_shots: 0.0,
            velocity: WEAPON_DEFAULT_VELOCITY,
        }
    }
}

impl WeaponDefinition {
    /// Whether this is the sentinel returned on a registry miss.
    pub fn is_none(&self) -> bool {
        self.weapon_type == WeaponType::None
    }
}

/// Immutable mapping from weapon type to definition.
#[derive(Debug, Clone, Default)]
pub struct WeaponRegistry {
    definitions: HashMap<WeaponType, WeaponDefinition>,
}

impl WeaponRegistry {
    /// Build the registry from an ordered list. Later entries with a
    /// duplicate type replace earlier ones.
    pub fn build<'a>(definitions: impl IntoIterator<Item = &'a WeaponDefinition>) -> Self {
        let mut map = HashMap::new();
        for def in definitions {
            map.insert(def.weapon_type, def.clone());
        }
        Self { definitions: map }
    }

    /// The definition for `weapon_type`, or the sentinel if none is registered.
    pub fn lookup(&self, weapon_type: WeaponType) -> WeaponDefinition {
        self.get(weapon_type).cloned().unwrap_or_default()
    }

    /// The stored definition, if any.
    pub fn get(&self, weapon_type: WeaponType) -> Option<&WeaponDefinition> {
        self.definitions.get(&weapon_type)
    }

    pub fn contains(&self, weapon_type: WeaponType) -> bool {
        self.definitions.contains_key(&weapon_type)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
