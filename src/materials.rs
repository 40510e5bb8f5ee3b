use crate::error::{DashboardError, DashboardResult};
use crate::validation::{validate_factor, validate_material_name, validate_quantity};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    Paper,
    Plastic,
    Glass,
    Metal,
    Aluminium,
    Organic,
    Electronics,
}

pub struct MaterialInfo {
    pub kind: MaterialKind,
    pub key: &'static str,
    pub label: &'static str,
    /// kg of CO2 avoided per kg recycled
    pub factor: f64,
    pub icon: &'static str,
}

pub const BUILTIN_MATERIALS: [MaterialInfo; 7] = [
    MaterialInfo {
        kind: MaterialKind::Paper,
        key: "papel",
        label: "Paper",
        factor: 1.1,
        icon: "📄",
    },
    MaterialInfo {
        kind: MaterialKind::Plastic,
        key: "plastico",
        label: "Plastic",
        factor: 1.5,
        icon: "🧴",
    },
    MaterialInfo {
        kind: MaterialKind::Glass,
        key: "vidro",
        label: "Glass",
        factor: 0.3,
        icon: "🍾",
    },
    MaterialInfo {
        kind: MaterialKind::Metal,
        key: "metal",
        label: "Metal",
        factor: 4.0,
        icon: "🔩",
    },
    MaterialInfo {
        kind: MaterialKind::Aluminium,
        key: "aluminio",
        label: "Aluminium",
        factor: 9.0,
        icon: "🥫",
    },
    MaterialInfo {
        kind: MaterialKind::Organic,
        key: "organico",
        label: "Organic",
        factor: 0.5,
        icon: "🍂",
    },
    MaterialInfo {
        kind: MaterialKind::Electronics,
        key: "eletronicos",
        label: "Electronics",
        factor: 2.0,
        icon: "🔌",
    },
];

const CUSTOM_ICON: &str = "♻";

pub fn normalize_key(material: &str) -> String {
    material.trim().to_lowercase()
}

impl MaterialKind {
    pub fn info(&self) -> &'static MaterialInfo {
        BUILTIN_MATERIALS
            .iter()
            .find(|info| info.kind == *self)
            .unwrap_or(&BUILTIN_MATERIALS[0])
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = normalize_key(key);
        BUILTIN_MATERIALS
            .iter()
            .find(|info| info.key == key)
            .map(|info| info.kind)
    }
}

/// Display label for a stored material key; custom materials show their key
pub fn material_label(key: &str) -> String {
    match MaterialKind::from_key(key) {
        Some(kind) => kind.info().label.to_string(),
        None => key.trim().to_string(),
    }
}

pub fn material_icon(key: &str) -> &'static str {
    MaterialKind::from_key(key)
        .map(|kind| kind.info().icon)
        .unwrap_or(CUSTOM_ICON)
}

/// Pure CO2 equivalence: quantity × factor
pub fn co2_equivalent(quantity: f64, factor: f64) -> f64 {
    quantity * factor
}

/// Factor table: the built-in materials plus user-defined entries.
///
/// A custom entry with the same key as a built-in one overrides it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialFactors {
    custom: BTreeMap<String, f64>,
}

impl MaterialFactors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_custom(custom: &BTreeMap<String, f64>) -> DashboardResult<Self> {
        let mut factors = Self::new();
        for (key, factor) in custom {
            factors.add_custom(key, *factor)?;
        }
        Ok(factors)
    }

    pub fn add_custom(&mut self, material: &str, factor: f64) -> DashboardResult<()> {
        let name = validate_material_name(material)?;
        let factor = validate_factor(factor)?;
        self.custom.insert(normalize_key(&name), factor);
        Ok(())
    }

    pub fn custom(&self) -> &BTreeMap<String, f64> {
        &self.custom
    }

    pub fn factor_for(&self, material: &str) -> DashboardResult<f64> {
        let key = normalize_key(material);
        if let Some(factor) = self.custom.get(&key) {
            return Ok(*factor);
        }
        MaterialKind::from_key(&key)
            .map(|kind| kind.info().factor)
            .ok_or_else(|| DashboardError::UnknownMaterial(material.trim().to_string()))
    }

    /// CO2 avoided for a recycled quantity; rejects non-positive quantities
    pub fn co2_saved(&self, material: &str, quantity: f64) -> DashboardResult<f64> {
        let quantity = validate_quantity(quantity)?;
        let factor = self.factor_for(material)?;
        Ok(co2_equivalent(quantity, factor))
    }

    /// Every known material key with its effective factor, sorted by key
    pub fn all(&self) -> Vec<(String, f64)> {
        let mut merged: BTreeMap<String, f64> = BUILTIN_MATERIALS
            .iter()
            .map(|info| (info.key.to_string(), info.factor))
            .collect();
        for (key, factor) in &self.custom {
            merged.insert(key.clone(), *factor);
        }
        merged.into_iter().collect()
    }
}
