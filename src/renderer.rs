use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use crate::classes::Barrels;
use crate::constants::*;
use crate::state::{Camera, Orb, Player, Projectile, Viewport, World};
use crate::upgrades;

/// Paints one frame: background, grid, orbs, projectiles, player, minimap.
pub fn render(ctx: &CanvasRenderingContext2d, world: &World, viewport: Viewport) {
    let zoom = upgrades::render_zoom(&world.player.upgrades);
    let cam = Camera::follow(&world.player, viewport, zoom);
    let vw = viewport.width / cam.zoom;
    let vh = viewport.height / cam.zoom;

    ctx.set_fill_style_str(BACKGROUND_COLOR);
    ctx.fill_rect(0.0, 0.0, viewport.width, viewport.height);

    ctx.save();
    ctx.scale(cam.zoom, cam.zoom).unwrap_or(());

    draw_grid(ctx, world.map_size, &cam, vw, vh);
    draw_orbs(ctx, &world.orbs, &cam, vw, vh);
    draw_projectiles(ctx, &world.projectiles, &cam, vw, vh);
    draw_player(ctx, &world.player, &cam);

    ctx.restore();

    draw_minimap(ctx, &world.player, world.map_size, viewport);
}

/// World coordinates of the grid lines inside `[lo, hi]`, never past the map edge.
pub fn grid_lines(map_size: f64, spacing: f64, lo: f64, hi: f64) -> Vec<f64> {
    if spacing <= 0.0 || map_size <= 0.0 {
        return Vec::new();
    }
    let first = (lo.max(0.0) / spacing).ceil() as i64;
    let mut lines = Vec::new();
    let mut i = first;
    loop {
        let pos = i as f64 * spacing;
        if pos >= map_size || pos > hi {
            break;
        }
        lines.push(pos);
        i += 1;
    }
    lines
}

/// Screen-space check with a margin so shapes don't pop at the edges.
pub fn on_screen(sx: f64, sy: f64, vw: f64, vh: f64) -> bool {
    sx >= -CULL_MARGIN && sx <= vw + CULL_MARGIN && sy >= -CULL_MARGIN && sy <= vh + CULL_MARGIN
}

/// Top-left corner of the minimap square.
pub fn minimap_origin(viewport: Viewport) -> (f64, f64) {
    (
        viewport.width - MINIMAP_SIZE - MINIMAP_PAD,
        viewport.height - MINIMAP_SIZE - MINIMAP_PAD,
    )
}

pub fn minimap_dot(player: &Player, map_size: f64, viewport: Viewport) -> (f64, f64) {
    let (mx, my) = minimap_origin(viewport);
    (
        mx + player.x / map_size * MINIMAP_SIZE,
        my + player.y / map_size * MINIMAP_SIZE,
    )
}

fn draw_grid(ctx: &CanvasRenderingContext2d, map_size: f64, cam: &Camera, vw: f64, vh: f64) {
    ctx.set_stroke_style_str(GRID_COLOR);
    ctx.set_line_width(1.0);
    ctx.begin_path();
    for x in grid_lines(map_size, GRID_SPACING, cam.x, cam.x + vw) {
        ctx.move_to(x - cam.x, -cam.y);
        ctx.line_to(x - cam.x, map_size - cam.y);
    }
    for y in grid_lines(map_size, GRID_SPACING, cam.y, cam.y + vh) {
        ctx.move_to(-cam.x, y - cam.y);
        ctx.line_to(map_size - cam.x, y - cam.y);
    }
    ctx.stroke();
}

fn draw_orbs(ctx: &CanvasRenderingContext2d, orbs: &[Orb], cam: &Camera, vw: f64, vh: f64) {
    for orb in orbs {
        let sx = orb.x - cam.x;
        let sy = orb.y - cam.y;
        if !on_screen(sx, sy, vw, vh) { continue; }

        ctx.begin_path();
        let _ = ctx.arc(sx, sy, orb.radius, 0.0, PI * 2.0);
        ctx.set_fill_style_str(&orb.color);
        ctx.fill();
    }
}

fn draw_projectiles(ctx: &CanvasRenderingContext2d, projectiles: &[Projectile], cam: &Camera, vw: f64, vh: f64) {
    ctx.set_fill_style_str(PROJECTILE_COLOR);
    for p in projectiles {
        let sx = p.x - cam.x;
        let sy = p.y - cam.y;
        if !on_screen(sx, sy, vw, vh) { continue; }

        ctx.begin_path();
        let _ = ctx.arc(sx, sy, p.radius, 0.0, PI * 2.0);
        ctx.fill();
    }
}

fn draw_player(ctx: &CanvasRenderingContext2d, player: &Player, cam: &Camera) {
    let profile = player.class.profile();

    ctx.save();
    ctx.translate(player.x - cam.x, player.y - cam.y).unwrap_or(());
    ctx.rotate(player.angle).unwrap_or(());

    // Barrels sit under the body
    ctx.set_fill_style_str(BARREL_COLOR);
    match (profile.barrels)(&player.upgrades) {
        Barrels::Standard => ctx.fill_rect(0.0, -10.0, 30.0, 20.0),
        Barrels::Ring(n) => {
            let step = PI * 2.0 / n.max(1) as f64;
            for _ in 0..n {
                ctx.fill_rect(10.0, -5.0, 25.0, 10.0);
                ctx.rotate(step).unwrap_or(());
            }
        }
    }

    ctx.begin_path();
    let _ = ctx.arc(0.0, 0.0, player.radius, 0.0, PI * 2.0);
    ctx.set_fill_style_str(profile.color);
    ctx.fill();
    ctx.set_stroke_style_str("#fff");
    ctx.set_line_width(2.0);
    ctx.stroke();

    ctx.restore();
}

fn draw_minimap(ctx: &CanvasRenderingContext2d, player: &Player, map_size: f64, viewport: Viewport) {
    let (x, y) = minimap_origin(viewport);

    ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
    ctx.fill_rect(x, y, MINIMAP_SIZE, MINIMAP_SIZE);
    ctx.set_stroke_style_str("#fff");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(x, y, MINIMAP_SIZE, MINIMAP_SIZE);

    let (dot_x, dot_y) = minimap_dot(player, map_size, viewport);
    ctx.begin_path();
    let _ = ctx.arc(dot_x, dot_y, MINIMAP_DOT_RADIUS, 0.0, PI * 2.0);
    ctx.set_fill_style_str("#fff");
    ctx.fill();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::ClassKind;

    const VIEW: Viewport = Viewport { width: 800.0, height: 600.0 };

    #[test]
    fn minimap_sits_bottom_right() {
        assert_eq!(minimap_origin(VIEW), (630.0, 430.0));
    }

    #[test]
    fn minimap_dot_scales_world_position() {
        let mut player = Player::new(ClassKind::Fighter);
        player.x = 1000.0;
        player.y = 500.0;
        assert_eq!(minimap_dot(&player, 2000.0, VIEW), (705.0, 467.5));
    }

    #[test]
    fn grid_lines_cover_visible_range_only() {
        assert_eq!(grid_lines(2000.0, 100.0, 150.0, 420.0), vec![200.0, 300.0, 400.0]);
        assert_eq!(grid_lines(2000.0, 100.0, -300.0, 150.0), vec![0.0, 100.0]);
        // map edge itself gets no line
        assert_eq!(grid_lines(2000.0, 100.0, 1850.0, 2300.0), vec![1900.0]);
        assert!(grid_lines(2000.0, 0.0, 0.0, 100.0).is_empty());
    }

    #[test]
    fn culling_keeps_a_margin() {
        assert!(on_screen(-40.0, 300.0, 800.0, 600.0));
        assert!(!on_screen(-60.0, 300.0, 800.0, 600.0));
        assert!(on_screen(845.0, 645.0, 800.0, 600.0));
        assert!(!on_screen(400.0, 660.0, 800.0, 600.0));
    }
}
