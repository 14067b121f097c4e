//! Element registry: the single owner of every [`ElementDefinition`].
//!
//! Cells refer to definitions through [`ElementHandle`]s, which are indices
//! into the registry's definition table in registration order.

use std::collections::HashMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::element::{ElementDefinition, ElementHandle, ElementKind, Rgba};
use crate::error::RegistryError;

/// Id of the sentinel definition used for unoccupied cells.
pub const EMPTY_ID: &str = "EMPTY";

/// External element record, as supplied by a definition file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: String,
    pub name: String,
    pub kind: ElementKind,
    #[serde(default)]
    pub density: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "color")]
    pub colors: Vec<Rgba>,
}

impl From<ElementRecord> for ElementDefinition {
    fn from(record: ElementRecord) -> Self {
        ElementDefinition {
            id: record.id,
            name: record.name,
            description: record.description,
            density: record.density,
            kind: record.kind,
            color_variants: record.colors,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ElementRegistry {
    definitions: Vec<ElementDefinition>,
    by_id: HashMap<String, ElementHandle>,
    empty: Option<ElementHandle>,
}

impl ElementRegistry {
    /// An uninitialized registry. Call [`ElementRegistry::initialize`] before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry populated with the built-in element set.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.initialize();
        registry
    }

    /// Populate the built-in element set, discarding anything already registered.
    pub fn initialize(&mut self) {
        if self.is_initialized() {
            debug!("re-initializing element registry");
        }
        self.clear();
        for definition in builtin_definitions() {
            debug_assert!(!self.by_id.contains_key(&definition.id));
            self.push(definition);
        }
        info!("element registry initialized with {} built-in elements", self.definitions.len());
    }

    /// Build a registry from external records, keeping their order.
    pub fn from_records(
        records: impl IntoIterator<Item = ElementRecord>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for record in records {
            if registry.by_id.contains_key(&record.id) {
                return Err(RegistryError::DuplicateId(record.id));
            }
            if registry.definitions.len() > u16::MAX as usize {
                return Err(RegistryError::TooManyElements(registry.definitions.len() + 1));
            }
            if record.colors.is_empty() && record.kind != ElementKind::Empty {
                warn!("element `{}` has no color variants and will render transparent", record.id);
            }
            registry.push(record.into());
        }

        let empty = registry.empty.ok_or(RegistryError::MissingEmpty)?;
        let kind = registry.get(empty).kind;
        if kind != ElementKind::Empty {
            return Err(RegistryError::EmptyKindMismatch(kind));
        }
        info!("element registry loaded with {} elements", registry.definitions.len());
        Ok(registry)
    }

    /// Build a registry from a JSON array of [`ElementRecord`]s.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let records: Vec<ElementRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    fn clear(&mut self) {
        self.definitions.clear();
        self.by_id.clear();
        self.empty = None;
    }

    fn push(&mut self, definition: ElementDefinition) {
        let handle = ElementHandle(self.definitions.len() as u16);
        if definition.id == EMPTY_ID {
            self.empty = Some(handle);
        }
        self.by_id.insert(definition.id.clone(), handle);
        self.definitions.push(definition);
    }

    pub fn is_initialized(&self) -> bool {
        self.empty.is_some()
    }

    /// Handle of the `EMPTY` sentinel, once initialized.
    pub fn empty_handle(&self) -> Option<ElementHandle> {
        self.empty
    }

    /// Case-sensitive lookup by id.
    pub fn get_by_id(&self, id: &str) -> Option<&ElementDefinition> {
        self.handle_of(id).map(|handle| self.get(handle))
    }

    pub fn handle_of(&self, id: &str) -> Option<ElementHandle> {
        self.by_id.get(id).copied()
    }

    /// Resolve a handle issued by this registry.
    ///
    /// # Panics
    ///
    /// Panics if `handle` did not come from this registry.
    #[inline]
    pub fn get(&self, handle: ElementHandle) -> &ElementDefinition {
        &self.definitions[handle.index()]
    }

    /// All definitions in registration order.
    pub fn get_all(&self) -> &[ElementDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn builtin_definitions() -> Vec<ElementDefinition> {
    use ElementKind::*;

    vec![
        ElementDefinition::new(EMPTY_ID, "Empty", Empty, 5)
            .with_description("Nothing at all.")
            .with_color(Rgba::TRANSPARENT),
        ElementDefinition::new("SAND", "Sand", MovableSolid, 100)
            .with_description("Fine grains that pile up and sink through liquids.")
            .with_color(Rgba::opaque(238, 221, 126))
            .with_color(Rgba::opaque(222, 205, 111))
            .with_color(Rgba::opaque(232, 215, 121))
            .with_color(Rgba::opaque(230, 213, 119))
            .with_color(Rgba::opaque(221, 204, 110))
            .with_color(Rgba::opaque(241, 224, 129)),
        ElementDefinition::new("GRAVEL", "Gravel", MovableSolid, 120)
            .with_description("Small stones, heavier than sand.")
            .with_color(Rgba::opaque(130, 120, 110))
            .with_color(Rgba::opaque(110, 100, 90))
            .with_color(Rgba::opaque(140, 130, 120)),
        ElementDefinition::new("STONE", "Stone", ImmovableSolid, 1000)
            .with_description("Solid rock. Never moves.")
            .with_color(Rgba::opaque(130, 130, 130))
            .with_color(Rgba::opaque(104, 104, 104))
            .with_color(Rgba::opaque(156, 156, 156)),
        ElementDefinition::new("METAL", "Metal", ImmovableSolid, 3000)
            .with_description("Heavy, immovable block.")
            .with_color(Rgba::opaque(180, 180, 190))
            .with_color(Rgba::opaque(160, 160, 170)),
        ElementDefinition::new("WATER", "Water", Liquid, 50)
            .with_description("Flows and spreads to fill its container.")
            .with_color(Rgba::opaque(15, 93, 226)),
        ElementDefinition::new("OIL", "Oil", Liquid, 30)
            .with_description("Viscous liquid lighter than water.")
            .with_color(Rgba::opaque(60, 50, 20))
            .with_color(Rgba::opaque(70, 55, 25)),
        ElementDefinition::new("STEAM", "Steam", Gas, 1)
            .with_description("Hot vapour that bubbles up through anything denser.")
            .with_color(Rgba::opaque(127, 127, 127)),
        ElementDefinition::new("CHLORINE", "Chlorine", Gas, 8)
            .with_description("Heavier-than-air gas that tends to sink.")
            .with_color(Rgba::new(120, 200, 80, 200)),
    ]
}
