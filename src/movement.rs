//! Movement primitives shared by every element behaviour.
//!
//! All primitives read the moving cell from `current` and read/write
//! destinations in `next`. A destination already claimed this tick (stamped in
//! `next`'s write mask) is never written again; that is treated as a normal
//! "try the next rule" outcome, not an error.

use std::cmp::Ordering;

use crate::config::SimulationConfig;
use crate::element::{ElementDefinition, ElementKind};
use crate::grid::CellGrid;
use crate::registry::ElementRegistry;

/// Everything a behaviour needs to resolve one cell.
pub struct MoveContext<'a> {
    pub registry: &'a ElementRegistry,
    pub current: &'a CellGrid,
    pub next: &'a mut CellGrid,
    pub config: &'a SimulationConfig,
}

impl MoveContext<'_> {
    #[inline]
    pub fn source(&self, x: isize, y: isize) -> &ElementDefinition {
        self.registry.get(self.current.get_type(x, y))
    }

    #[inline]
    pub fn pending(&self, x: isize, y: isize) -> &ElementDefinition {
        self.registry.get(self.next.get_type(x, y))
    }
}

/// Density rule for moving `source` onto `dest`, `dy` rows away.
///
/// Immovable solids never take part. Downward moves need a denser source,
/// upward moves a lighter one, and lateral moves need an empty destination or
/// a denser source.
pub fn displacement_allowed(
    source: &ElementDefinition,
    dest: &ElementDefinition,
    dy: isize,
) -> bool {
    if source.kind == ElementKind::ImmovableSolid || dest.kind == ElementKind::ImmovableSolid {
        return false;
    }
    match dy.cmp(&0) {
        Ordering::Greater => source.density > dest.density,
        Ordering::Less => source.density < dest.density,
        Ordering::Equal => dest.is_empty() || source.density > dest.density,
    }
}

/// Whether the cell at `(x, y)` may displace whatever `next` holds at `(nx, ny)`.
/// Both positions must be in bounds.
pub fn can_displace(ctx: &MoveContext<'_>, x: isize, y: isize, nx: isize, ny: isize) -> bool {
    displacement_allowed(ctx.source(x, y), ctx.pending(nx, ny), ny - y)
}

/// Move `(x, y)` onto `(nx, ny)`, or swap the two if the destination is occupied.
///
/// Returns `false` without touching anything if the destination was already
/// claimed this tick. The destination is always stamped; the source is
/// stamped only on a swap, so a vacated cell can still be filled this tick.
pub fn swap_or_move(ctx: &mut MoveContext<'_>, x: isize, y: isize, nx: isize, ny: isize) -> bool {
    if ctx.next.is_written(nx, ny) {
        return false;
    }
    let moving = ctx.current.get(x, y);
    let displaced = ctx.next.get(nx, ny);
    let displaced_is_empty = ctx.registry.get(displaced.element).is_empty();

    ctx.next.set(nx, ny, moving);
    ctx.next.mark_written(nx, ny);
    if displaced_is_empty {
        let empty = ctx.next.empty_cell();
        ctx.next.set(x, y, empty);
    } else {
        ctx.next.set(x, y, displaced);
        ctx.next.mark_written(x, y);
    }
    true
}

/// Single step by `(dx, dy)`, gated by bounds, the write mask and density.
pub fn try_move(ctx: &mut MoveContext<'_>, x: isize, y: isize, dx: isize, dy: isize) -> bool {
    let (nx, ny) = (x + dx, y + dy);
    if !ctx.next.within_bounds(nx, ny) || ctx.next.is_written(nx, ny) {
        return false;
    }
    if !can_displace(ctx, x, y, nx, ny) {
        return false;
    }
    swap_or_move(ctx, x, y, nx, ny)
}

/// True if the `distance` cells after `start_x` in `direction` along row `y`
/// are all empty in `next`. A zero distance is trivially clear.
pub fn is_horizontal_path_clear(
    next: &CellGrid,
    registry: &ElementRegistry,
    start_x: isize,
    y: isize,
    direction: isize,
    distance: isize,
) -> bool {
    (1..=distance).all(|j| {
        let check_x = start_x + direction * j;
        next.within_bounds(check_x, y) && registry.get(next.get_type(check_x, y)).is_empty()
    })
}

/// Outward search for a destination on row `y + dy`, up to `max_distance`
/// columns away, alternating between `dirs` at each distance.
///
/// Every cell crossed on the source row must be empty. For diagonal slides
/// that includes the cell directly beside the destination; for same-row
/// slides only the cells strictly between source and destination. The search
/// never reaches further than the grid is wide and stops once both directions
/// have left the grid.
pub fn try_slide_movement(
    ctx: &mut MoveContext<'_>,
    x: isize,
    y: isize,
    dy: isize,
    max_distance: u32,
    dirs: [isize; 2],
) -> bool {
    let reach = (max_distance as usize).min(ctx.next.width()) as isize;
    for i in 1..=reach {
        let mut on_grid = false;
        for dir in dirs {
            let (nx, ny) = (x + dir * i, y + dy);
            if !ctx.next.within_bounds(nx, ny) {
                continue;
            }
            on_grid = true;
            if ctx.next.is_written(nx, ny) {
                continue;
            }
            let path = if dy == 0 { i - 1 } else { i };
            if !is_horizontal_path_clear(ctx.next, ctx.registry, x, y, dir, path) {
                continue;
            }
            if can_displace(ctx, x, y, nx, ny) {
                return swap_or_move(ctx, x, y, nx, ny);
            }
        }
        if !on_grid {
            break;
        }
    }
    false
}

/// Roll down one of the two lower diagonals. The cell beside the source on
/// that side must be empty or liquid; any solid there, immovable included,
/// or a gas blocks the roll even when the diagonal itself is open.
pub fn try_solid_diagonal_movement(
    ctx: &mut MoveContext<'_>,
    x: isize,
    y: isize,
    dirs: [isize; 2],
) -> bool {
    for dir in dirs {
        let (nx, ny) = (x + dir, y + 1);
        if !ctx.next.within_bounds(nx, ny) || ctx.next.is_written(nx, ny) {
            continue;
        }
        if !matches!(ctx.pending(nx, y).kind, ElementKind::Empty | ElementKind::Liquid) {
            continue;
        }
        if can_displace(ctx, x, y, nx, ny) {
            return swap_or_move(ctx, x, y, nx, ny);
        }
    }
    false
}

/// One-cell sideways nudge in either direction, density-aware.
pub fn try_lateral_wiggle(
    ctx: &mut MoveContext<'_>,
    x: isize,
    y: isize,
    dirs: [isize; 2],
) -> bool {
    dirs.into_iter().any(|dir| try_move(ctx, x, y, dir, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    struct Fixture {
        registry: ElementRegistry,
        config: SimulationConfig,
        current: CellGrid,
        next: CellGrid,
    }

    impl Fixture {
        fn new(width: usize, height: usize) -> Self {
            let registry = ElementRegistry::builtin();
            let empty = registry.empty_handle().unwrap();
            let mut next = CellGrid::new(width, height, empty);
            next.begin_tick();
            Fixture {
                config: SimulationConfig::default(),
                current: CellGrid::new(width, height, empty),
                next,
                registry,
            }
        }

        fn put(&mut self, x: isize, y: isize, id: &str) {
            let cell = Cell::new(self.registry.handle_of(id).unwrap(), 0);
            self.current.set(x, y, cell);
            self.next.set(x, y, cell);
        }

        fn ctx(&mut self) -> MoveContext<'_> {
            MoveContext {
                registry: &self.registry,
                current: &self.current,
                next: &mut self.next,
                config: &self.config,
            }
        }

        fn id_at(&self, x: isize, y: isize) -> &str {
            &self.registry.get(self.next.get_type(x, y)).id
        }
    }

    fn def(registry: &ElementRegistry, id: &str) -> ElementDefinition {
        registry.get_by_id(id).unwrap().clone()
    }

    #[test]
    fn density_rules_by_direction() {
        let r = ElementRegistry::builtin();
        let (sand, water, steam, stone, empty) = (
            def(&r, "SAND"),
            def(&r, "WATER"),
            def(&r, "STEAM"),
            def(&r, "STONE"),
            def(&r, "EMPTY"),
        );
        assert!(displacement_allowed(&sand, &water, 1));
        assert!(!displacement_allowed(&water, &sand, 1));
        assert!(displacement_allowed(&steam, &water, -1));
        assert!(!displacement_allowed(&water, &empty, -1));
        assert!(displacement_allowed(&water, &empty, 0));
        assert!(displacement_allowed(&sand, &steam, 0));
        assert!(!displacement_allowed(&steam, &water, 0));
        assert!(!displacement_allowed(&sand, &stone, 1));
        assert!(!displacement_allowed(&stone, &empty, 1));
    }

    #[test]
    fn move_into_empty_leaves_source_unclaimed() {
        let mut f = Fixture::new(3, 3);
        f.put(1, 0, "SAND");
        assert!(try_move(&mut f.ctx(), 1, 0, 0, 1));
        assert_eq!(f.id_at(1, 1), "SAND");
        assert_eq!(f.id_at(1, 0), "EMPTY");
        assert!(f.next.is_written(1, 1));
        assert!(!f.next.is_written(1, 0));
    }

    #[test]
    fn swap_claims_both_cells() {
        let mut f = Fixture::new(3, 3);
        f.put(1, 0, "SAND");
        f.put(1, 1, "WATER");
        assert!(try_move(&mut f.ctx(), 1, 0, 0, 1));
        assert_eq!(f.id_at(1, 1), "SAND");
        assert_eq!(f.id_at(1, 0), "WATER");
        assert!(f.next.is_written(1, 0));
        assert!(f.next.is_written(1, 1));
    }

    #[test]
    fn claimed_destination_is_refused() {
        let mut f = Fixture::new(3, 3);
        f.put(1, 0, "SAND");
        f.next.mark_written(1, 1);
        let before = f.next.clone();
        assert!(!try_move(&mut f.ctx(), 1, 0, 0, 1));
        assert!(!swap_or_move(&mut f.ctx(), 1, 0, 1, 1));
        assert_eq!(f.next.cells(), before.cells());
    }

    #[test]
    fn out_of_bounds_is_no_move() {
        let mut f = Fixture::new(2, 2);
        f.put(0, 1, "SAND");
        assert!(!try_move(&mut f.ctx(), 0, 1, 0, 1));
        assert!(!try_move(&mut f.ctx(), 0, 1, -1, 0));
    }

    #[test]
    fn path_clear_stops_at_obstruction() {
        let mut f = Fixture::new(6, 1);
        f.put(3, 0, "STONE");
        assert!(is_horizontal_path_clear(&f.next, &f.registry, 0, 0, 1, 2));
        assert!(!is_horizontal_path_clear(&f.next, &f.registry, 0, 0, 1, 3));
        assert!(!is_horizontal_path_clear(&f.next, &f.registry, 0, 0, -1, 1));
        assert!(is_horizontal_path_clear(&f.next, &f.registry, 0, 0, -1, 0));
    }

    #[test]
    fn slide_does_not_tunnel() {
        // W S . . on top of a full water floor: the sand blocks the row.
        let mut f = Fixture::new(4, 2);
        for x in 0..4 {
            f.put(x, 1, "STONE");
        }
        f.put(0, 0, "WATER");
        f.put(1, 0, "SAND");
        assert!(!try_slide_movement(&mut f.ctx(), 0, 0, 0, 4, [1, -1]));
        assert_eq!(f.id_at(0, 0), "WATER");
    }

    #[test]
    fn slide_takes_nearest_destination() {
        let mut f = Fixture::new(7, 1);
        f.put(3, 0, "WATER");
        assert!(try_slide_movement(&mut f.ctx(), 3, 0, 0, 3, [-1, 1]));
        assert_eq!(f.id_at(2, 0), "WATER");
        assert_eq!(f.id_at(3, 0), "EMPTY");
    }

    #[test]
    fn solid_diagonal_blocked_by_side_solid() {
        let mut f = Fixture::new(3, 2);
        f.put(1, 0, "SAND");
        f.put(1, 1, "STONE");
        f.put(0, 0, "GRAVEL");
        assert!(try_solid_diagonal_movement(&mut f.ctx(), 1, 0, [-1, 1]));
        assert_eq!(f.id_at(2, 1), "SAND");
        assert_eq!(f.id_at(0, 1), "EMPTY");
    }

    #[test]
    fn solid_diagonal_blocked_by_side_immovable() {
        let mut f = Fixture::new(2, 2);
        f.put(0, 0, "SAND");
        f.put(0, 1, "STONE");
        f.put(1, 0, "METAL");
        assert!(!try_solid_diagonal_movement(&mut f.ctx(), 0, 0, [1, -1]));
        assert_eq!(f.id_at(1, 1), "EMPTY");
    }

    #[test]
    fn solid_diagonal_blocked_by_side_gas() {
        let mut f = Fixture::new(3, 2);
        f.put(1, 0, "SAND");
        f.put(1, 1, "STONE");
        f.put(0, 0, "STEAM");
        f.put(2, 0, "STEAM");
        assert!(!try_solid_diagonal_movement(&mut f.ctx(), 1, 0, [-1, 1]));
        assert!(!try_solid_diagonal_movement(&mut f.ctx(), 1, 0, [1, -1]));
        assert_eq!(f.id_at(1, 0), "SAND");
        assert_eq!(f.id_at(0, 1), "EMPTY");
        assert_eq!(f.id_at(2, 1), "EMPTY");
    }

    #[test]
    fn solid_diagonal_passes_side_liquid() {
        let mut f = Fixture::new(2, 2);
        f.put(0, 0, "SAND");
        f.put(0, 1, "STONE");
        f.put(1, 0, "WATER");
        assert!(try_solid_diagonal_movement(&mut f.ctx(), 0, 0, [-1, 1]));
        assert_eq!(f.id_at(1, 1), "SAND");
    }

    #[test]
    fn slide_reach_is_bounded_by_grid_width() {
        // An unbounded reach must finish after a handful of columns.
        let mut f = Fixture::new(1, 2);
        f.put(0, 1, "STONE");
        f.put(0, 0, "WATER");
        assert!(!try_slide_movement(&mut f.ctx(), 0, 0, 1, u32::MAX, [-1, 1]));
        assert!(!try_slide_movement(&mut f.ctx(), 0, 0, 0, u32::MAX, [1, -1]));

        let mut f = Fixture::new(5, 1);
        f.put(0, 0, "WATER");
        for x in 1..4 {
            f.put(x, 0, "STEAM");
        }
        assert!(try_slide_movement(&mut f.ctx(), 0, 0, 0, u32::MAX, [-1, 1]));
        assert_eq!(f.id_at(1, 0), "WATER");
    }

    #[test]
    fn wiggle_pushes_lighter_neighbour() {
        let mut f = Fixture::new(2, 1);
        f.put(0, 0, "WATER");
        f.put(1, 0, "STEAM");
        assert!(try_lateral_wiggle(&mut f.ctx(), 0, 0, [-1, 1]));
        assert_eq!(f.id_at(1, 0), "WATER");
        assert_eq!(f.id_at(0, 0), "STEAM");
    }
}
