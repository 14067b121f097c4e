use serde::{Deserialize, Serialize};

/// Coarse movement policy of an element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Empty,
    Liquid,
    Gas,
    MovableSolid,
    ImmovableSolid,
}

/// 8-bit RGBA color. Alpha defaults to opaque when deserialized.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }
}

/// Stable index of a definition inside its registry.
///
/// Handles stay valid for the registry's lifetime; definitions are never
/// removed or reordered once the registry is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(pub(crate) u16);

impl ElementHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Immutable description of one element.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Higher is heavier. Only compared pairwise when a move is attempted.
    pub density: i32,
    pub kind: ElementKind,
    pub color_variants: Vec<Rgba>,
}

impl ElementDefinition {
    pub fn new(id: &str, name: &str, kind: ElementKind, density: i32) -> Self {
        ElementDefinition {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            density,
            kind,
            color_variants: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color_variants.push(color);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.kind == ElementKind::Empty
    }

    /// Palette lookup. Out-of-range indices fall back to the first variant,
    /// and an element without a palette renders transparent.
    pub fn color(&self, variant: u8) -> Rgba {
        self.color_variants
            .get(variant as usize)
            .or_else(|| self.color_variants.first())
            .copied()
            .unwrap_or(Rgba::TRANSPARENT)
    }

    pub fn random_color_variant(&self) -> u8 {
        crate::random::index(self.color_variants.len()).min(u8::MAX as usize) as u8
    }
}
