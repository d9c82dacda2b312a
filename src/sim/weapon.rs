//! Weapon catalog
//!
//! The session owns the catalog and the unlocked set; the simulation only ever
//! sees the equipped weapon's [`WeaponLoadout`].

use serde::{Deserialize, Serialize};

/// How a weapon lays out its shots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirePattern {
    /// One centred shot
    Single,
    /// Two shots near the hull edges
    Double,
    /// Centre shot plus two angled side shots
    Triple,
    /// One wide, slow, heavy shot
    Plasma,
}

impl FirePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            FirePattern::Single => "single",
            FirePattern::Double => "double",
            FirePattern::Triple => "triple",
            FirePattern::Plasma => "plasma",
        }
    }
}

/// The subset of a weapon the simulation reads each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponLoadout {
    /// Ticks between shots
    pub fire_rate: u32,
    pub damage: i32,
    pub pattern: FirePattern,
}

impl WeaponLoadout {
    /// Fire cadence guarded against zero
    #[inline]
    pub fn cadence(&self) -> u64 {
        self.fire_rate.max(1) as u64
    }
}

impl Default for WeaponLoadout {
    fn default() -> Self {
        CATALOG[0].loadout()
    }
}

/// A catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weapon {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u64,
    pub fire_rate: u32,
    pub damage: i32,
    pub pattern: FirePattern,
}

impl Weapon {
    pub fn loadout(&self) -> WeaponLoadout {
        WeaponLoadout {
            fire_rate: self.fire_rate,
            damage: self.damage,
            pattern: self.pattern,
        }
    }
}

/// Weapon every profile starts with
pub const STARTER_WEAPON_ID: &str = "w1";

pub const CATALOG: [Weapon; 4] = [
    Weapon {
        id: "w1",
        name: "Pulse Blaster",
        price: 0,
        fire_rate: 20,
        damage: 1,
        pattern: FirePattern::Single,
    },
    Weapon {
        id: "w2",
        name: "Twin Lancer",
        price: 150,
        fire_rate: 18,
        damage: 1,
        pattern: FirePattern::Double,
    },
    Weapon {
        id: "w3",
        name: "Trident Array",
        price: 400,
        fire_rate: 16,
        damage: 1,
        pattern: FirePattern::Triple,
    },
    Weapon {
        id: "w4",
        name: "Plasma Cannon",
        price: 800,
        fire_rate: 30,
        damage: 3,
        pattern: FirePattern::Plasma,
    },
];

/// Look up a catalog entry by id
pub fn find_weapon(id: &str) -> Option<&'static Weapon> {
    CATALOG.iter().find(|w| w.id == id)
}
