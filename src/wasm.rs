use wasm_bindgen::prelude::*;

use crate::{random, ElementRegistry, Simulation};

const BYTES_PER_PIXEL: usize = 4;

/// Browser-facing handle around a [`Simulation`] with the built-in elements.
#[wasm_bindgen]
pub struct World {
    sim: Simulation,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl World {
    #[wasm_bindgen(constructor)]
    pub fn new(width: usize, height: usize) -> Result<World, JsValue> {
        let sim = Simulation::new(width, height, ElementRegistry::builtin())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(World {
            sim,
            pixels: vec![0; width * height * BYTES_PER_PIXEL],
        })
    }

    pub fn width(&self) -> usize {
        self.sim.width()
    }

    pub fn height(&self) -> usize {
        self.sim.height()
    }

    pub fn tick(&mut self) {
        self.sim.step();
    }

    /// Paint `id` at `(x, y)`. Returns false for an unknown id.
    pub fn set_cell(&mut self, x: i32, y: i32, id: &str) -> bool {
        self.sim
            .set_type_by_id(x as isize, y as isize, id, None)
            .is_ok()
    }

    pub fn clear(&mut self) {
        self.sim.clear();
    }

    /// Refresh the RGBA pixel buffer and return a pointer into wasm memory.
    pub fn pixels_ptr(&mut self) -> *const u8 {
        self.sim.fill_rgba_bytes(&mut self.pixels);
        self.pixels.as_ptr()
    }

    /// Element ids in palette order.
    pub fn element_ids(&self) -> js_sys::Array {
        self.sim
            .get_all_element_types()
            .iter()
            .map(|def| JsValue::from_str(&def.id))
            .collect()
    }

    pub fn reseed(seed: u32) {
        random::reseed(seed as u64);
    }
}
