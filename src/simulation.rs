//! Double-buffered tick scheduler and the simulation's public surface.

use log::{debug, info, trace, warn};

use crate::behavior;
use crate::config::{ScanOrder, SimulationConfig};
use crate::element::{ElementDefinition, ElementHandle, Rgba};
use crate::error::SimulationError;
use crate::grid::{Cell, CellGrid};
use crate::movement::MoveContext;
use crate::random;
use crate::registry::ElementRegistry;

pub struct Simulation {
    registry: ElementRegistry,
    config: SimulationConfig,
    current: CellGrid,
    next: CellGrid,
    tick: u64,
}

impl Simulation {
    /// Allocate both buffers, filled with the registry's `EMPTY` element.
    pub fn new(
        width: usize,
        height: usize,
        registry: ElementRegistry,
    ) -> Result<Self, SimulationError> {
        if width == 0 || height == 0 {
            return Err(SimulationError::ZeroSize { width, height });
        }
        let empty = registry
            .empty_handle()
            .ok_or(SimulationError::RegistryNotInitialized)?;
        info!(
            "simulation created: {}x{} cells, {} element types",
            width,
            height,
            registry.len()
        );
        Ok(Simulation {
            registry,
            config: SimulationConfig::default(),
            current: CellGrid::new(width, height, empty),
            next: CellGrid::new(width, height, empty),
            tick: 0,
        })
    }

    pub fn with_config(mut self, config: SimulationConfig) -> Result<Self, SimulationError> {
        self.set_config(config)?;
        Ok(self)
    }

    pub fn set_config(&mut self, config: SimulationConfig) -> Result<(), SimulationError> {
        config.validate()?;
        debug!("simulation config updated: {:?}", config);
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn width(&self) -> usize {
        self.current.width()
    }

    pub fn height(&self) -> usize {
        self.current.height()
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance the whole grid by one tick.
    ///
    /// `next` starts as a copy of `current`, so any cell nobody claims carries
    /// over unchanged. Rows are resolved bottom to top so falling content sees
    /// the settled row beneath it.
    pub fn step(&mut self) {
        self.next.copy_cells_from(&self.current);
        self.next.begin_tick();

        let width = self.current.width() as isize;
        let height = self.current.height() as isize;
        let even_tick = self.tick % 2 == 0;
        let scan_order = self.config.scan_order;
        let mut moved = 0usize;

        let mut ctx = MoveContext {
            registry: &self.registry,
            current: &self.current,
            next: &mut self.next,
            config: &self.config,
        };
        for y in (0..height).rev() {
            let left_to_right = match scan_order {
                ScanOrder::Alternating => even_tick,
                ScanOrder::RandomPerRow => random::coin_flip(),
            };
            for step in 0..width {
                let x = if left_to_right { step } else { width - 1 - step };
                if ctx.current.is_empty(x, y) {
                    continue;
                }
                if behavior::step_cell(&mut ctx, x, y) {
                    moved += 1;
                }
            }
        }

        std::mem::swap(&mut self.current, &mut self.next);
        self.tick += 1;
        trace!("tick {} committed, {} cells moved", self.tick, moved);
    }

    #[inline]
    pub fn within_bounds(&self, x: isize, y: isize) -> bool {
        self.current.within_bounds(x, y)
    }

    /// Row-major index of `(x, y)`. The position must be in bounds.
    pub fn flatten_coords(&self, x: isize, y: isize) -> usize {
        self.current.flatten_coords(x, y)
    }

    /// Place `element` at `(x, y)`. Out-of-range positions are ignored.
    /// Without an explicit `color_variant` a random palette entry is used.
    pub fn set_type_at(
        &mut self,
        x: isize,
        y: isize,
        element: ElementHandle,
        color_variant: Option<u8>,
    ) {
        if !self.within_bounds(x, y) {
            trace!("ignoring placement outside the grid at ({}, {})", x, y);
            return;
        }
        if element.index() >= self.registry.len() {
            warn!("ignoring placement of unregistered element handle {:?}", element);
            return;
        }
        let variant =
            color_variant.unwrap_or_else(|| self.registry.get(element).random_color_variant());
        self.current.set(x, y, Cell::new(element, variant));
    }

    /// Resolve `id` and place it at `(x, y)`.
    pub fn set_type_by_id(
        &mut self,
        x: isize,
        y: isize,
        id: &str,
        color_variant: Option<u8>,
    ) -> Result<(), SimulationError> {
        let handle = self
            .registry
            .handle_of(id)
            .ok_or_else(|| SimulationError::UnknownElement(id.to_string()))?;
        self.set_type_at(x, y, handle, color_variant);
        Ok(())
    }

    /// Definition at `(x, y)`, or `EMPTY` outside the grid.
    pub fn get_type_at(&self, x: isize, y: isize) -> &ElementDefinition {
        let handle = if self.within_bounds(x, y) {
            self.current.get_type(x, y)
        } else {
            self.current.empty_cell().element
        };
        self.registry.get(handle)
    }

    pub fn cell_at(&self, x: isize, y: isize) -> Option<Cell> {
        self.within_bounds(x, y).then(|| self.current.get(x, y))
    }

    /// False for occupied and for out-of-range positions.
    pub fn is_pos_empty(&self, x: isize, y: isize) -> bool {
        self.within_bounds(x, y) && self.get_type_at(x, y).is_empty()
    }

    pub fn get_type_by_id(&self, id: &str) -> Option<&ElementDefinition> {
        self.registry.get_by_id(id)
    }

    pub fn handle_of(&self, id: &str) -> Option<ElementHandle> {
        self.registry.handle_of(id)
    }

    pub fn get_all_element_types(&self) -> &[ElementDefinition] {
        self.registry.get_all()
    }

    /// Committed grid, row-major.
    pub fn cells(&self) -> &[Cell] {
        self.current.cells()
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.current.clear();
    }

    /// Count of cells per element, indexed by [`ElementHandle::index`].
    pub fn census(&self) -> Vec<usize> {
        let mut counts = vec![0; self.registry.len()];
        for cell in self.current.cells() {
            counts[cell.element.index()] += 1;
        }
        counts
    }

    fn cell_color(&self, cell: Cell) -> Rgba {
        let definition = self.registry.get(cell.element);
        if definition.is_empty() {
            Rgba::TRANSPARENT
        } else {
            definition.color(cell.color_variant)
        }
    }

    /// Write one color per cell into `dst`, row-major. Empty cells are
    /// transparent. `dst` should hold `width * height` entries; any excess is
    /// left untouched.
    pub fn fill_color_buffer(&self, dst: &mut [Rgba]) {
        debug_assert_eq!(dst.len(), self.current.cells().len());
        for (slot, cell) in dst.iter_mut().zip(self.current.cells()) {
            *slot = self.cell_color(*cell);
        }
    }

    /// As [`Simulation::fill_color_buffer`], packed as `r, g, b, a` bytes.
    pub fn fill_rgba_bytes(&self, dst: &mut [u8]) {
        debug_assert_eq!(dst.len(), self.current.cells().len() * 4);
        for (pixel, cell) in dst.chunks_exact_mut(4).zip(self.current.cells()) {
            let c = self.cell_color(*cell);
            pixel.copy_from_slice(&[c.r, c.g, c.b, c.a]);
        }
    }
}
