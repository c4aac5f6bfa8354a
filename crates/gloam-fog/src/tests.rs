use super::*;
use gloam_map::WallId;

fn v(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

fn wall(id: u64, vertices: Vec<Vec2>) -> Wall {
    Wall {
        id: WallId(id),
        vertices,
    }
}

fn is_superset(big: &FogBuffer, small: &FogBuffer) -> bool {
    for y in 0..small.height() as i32 {
        for x in 0..small.width() as i32 {
            if small.revealed(x, y) && !big.revealed(x, y) {
                return false;
            }
        }
    }
    true
}

#[test]
fn reveal_is_idempotent() {
    let mut a = FogBuffer::new(256, 256);
    let walls = [wall(1, vec![v(120.0, 60.0), v(120.0, 140.0)])];
    reveal(&mut a, &walls, v(100.0, 100.0), 40.0);
    let once = a.clone();
    reveal(&mut a, &walls, v(100.0, 100.0), 40.0);
    assert_eq!(a, once);
}

#[test]
fn reveal_never_rehides_cells() {
    let mut field = FogField::new(256, 256);
    let walls = [wall(1, vec![v(150.0, 0.0), v(150.0, 256.0)])];
    field.initialize(&walls, &[v(100.0, 100.0)], 30.0);
    let before = field.base().clone();
    field.reveal_permanent(&walls, v(60.0, 60.0), 30.0);
    assert!(is_superset(field.base(), &before));
    assert!(field.base().count_revealed() >= before.count_revealed());
}

#[test]
fn open_field_reveal_is_a_disc() {
    let mut buf = FogBuffer::new(256, 256);
    reveal(&mut buf, &[], v(100.0, 100.0), 30.0);

    // The zero-degree ray lands exactly on integer cells.
    for k in 0..=30 {
        assert!(buf.revealed(100 + k, 100), "cell ({},100) hidden", 100 + k);
    }
    // Nothing can be marked beyond the radius plus one cell of flooring slack.
    let limit_sq = 31.5f32 * 31.5;
    for y in 0..256 {
        for x in 0..256 {
            if buf.revealed(x, y) {
                let dx = x as f32 - 100.0;
                let dy = y as f32 - 100.0;
                assert!(
                    dx * dx + dy * dy <= limit_sq,
                    "cell ({},{}) outside the sight disc",
                    x,
                    y
                );
            }
        }
    }
    // Ray coverage fills the bulk of the disc (area ~2827 cells).
    let n = buf.count_revealed();
    assert!((2300..=3100).contains(&n), "revealed {} cells", n);
}

#[test]
fn clear_ray_reveals_the_cell_at_exact_radius() {
    let mut open = FogBuffer::new(256, 256);
    reveal(&mut open, &[], v(100.0, 100.0), 30.0);
    assert!(open.revealed(130, 100), "boundary cell on a clear ray hidden");

    // A wall sitting exactly at the radius still blocks that cell.
    let mut walled = FogBuffer::new(256, 256);
    let walls = [wall(1, vec![v(130.0, 80.0), v(130.0, 120.0)])];
    reveal(&mut walled, &walls, v(100.0, 100.0), 30.0);
    assert!(!walled.revealed(130, 100));
    assert!(walled.revealed(129, 100));
}

#[test]
fn wall_casts_a_shadow() {
    let mut buf = FogBuffer::new(256, 256);
    let walls = [wall(1, vec![v(130.0, 80.0), v(130.0, 120.0)])];
    reveal(&mut buf, &walls, v(100.0, 100.0), 50.0);

    // Near side of the wall is visible.
    assert!(buf.revealed(115, 100));
    // Beyond the wall stays hidden, as does everything past it on that ray.
    assert!(!buf.revealed(160, 100));
    for x in 132..=150 {
        assert!(!buf.revealed(x, 100), "cell ({},100) leaked past wall", x);
    }
}

#[test]
fn degenerate_wall_does_not_occlude_reveal() {
    let mut with_point = FogBuffer::new(256, 256);
    let mut without = FogBuffer::new(256, 256);
    // One-vertex wall sitting right on the ray between origin and target.
    let walls = [wall(1, vec![v(115.0, 100.0)])];
    reveal(&mut with_point, &walls, v(100.0, 100.0), 40.0);
    reveal(&mut without, &[], v(100.0, 100.0), 40.0);
    assert_eq!(with_point, without);
    assert!(with_point.revealed(130, 100));
}

#[test]
fn origin_cell_is_revealed_even_on_a_wall() {
    let mut buf = FogBuffer::new(64, 64);
    let walls = [wall(1, vec![v(0.0, 32.0), v(63.0, 32.0)])];
    reveal(&mut buf, &walls, v(32.0, 32.0), 10.0);
    assert!(buf.revealed(32, 32));
}

#[test]
fn compose_unions_base_and_overlay() {
    let mut base = FogBuffer::new(8, 8);
    let mut overlay = FogBuffer::new(8, 8);
    let mut out = FogBuffer::new(8, 8);
    base.reveal_cell(1, 1);
    overlay.reveal_cell(6, 6);
    compose(&base, &overlay, &mut out);
    assert!(out.revealed(1, 1));
    assert!(out.revealed(6, 6));
    assert!(!out.revealed(3, 3));
    // Composition leaves the inputs untouched.
    assert!(!base.revealed(6, 6));
    assert!(!overlay.revealed(1, 1));
}

#[test]
fn begin_frame_discards_overlay_but_not_base() {
    let mut field = FogField::new(64, 64);
    field.initialize(&[], &[v(10.0, 10.0)], 5.0);
    field.reveal_ephemeral(&[], v(50.0, 50.0), 5.0);
    field.refresh_live();
    assert!(field.live().revealed(50, 50));

    field.begin_frame();
    field.refresh_live();
    assert!(!field.live().revealed(50, 50), "overlay survived begin_frame");
    assert!(field.live().revealed(10, 10), "base leaked out of the live frame");
}

#[test]
fn reset_keeps_only_current_pcs() {
    let mut field = FogField::new(256, 256);
    field.initialize(&[], &[v(40.0, 40.0)], 20.0);
    // Exploration: a permanent reveal far from any PC's final position.
    field.reveal_permanent(&[], v(200.0, 200.0), 20.0);
    assert!(field.base().revealed(200, 200));

    field.reset_to_current_pcs(&[], &[v(40.0, 40.0)], 20.0);
    assert!(field.base().revealed(40, 40));
    assert!(!field.base().revealed(200, 200));
}

#[test]
fn out_of_bounds_cells_read_hidden_and_ignore_marks() {
    let mut buf = FogBuffer::new(16, 16);
    assert!(!buf.revealed(-1, 0));
    assert!(!buf.revealed(0, 16));
    buf.reveal_cell(-5, -5);
    buf.reveal_cell(99, 2);
    assert_eq!(buf.count_revealed(), 0);
    // Reveal near the edge clips instead of panicking.
    reveal(&mut buf, &[], v(1.0, 1.0), 10.0);
    assert!(buf.revealed(1, 1));
}
