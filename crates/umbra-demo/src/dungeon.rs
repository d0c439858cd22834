//! Tiny rooms-and-corridors generator for the demo.

use rand::Rng;
use umbra_engine::DungeonLayout;

/// An axis-aligned room in tile coordinates (inclusive floor bounds).
#[derive(Clone, Copy, Debug)]
pub struct Room {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Room {
    pub fn center(&self) -> (i32, i32) {
        ((self.x0 + self.x1) / 2, (self.y0 + self.y1) / 2)
    }

    fn overlaps(&self, other: &Room) -> bool {
        self.x0 - 1 <= other.x1
            && other.x0 - 1 <= self.x1
            && self.y0 - 1 <= other.y1
            && other.y0 - 1 <= self.y1
    }
}

/// Solid rock with up to `attempts` rooms carved out and chained by L-shaped
/// corridors. Every third room gets its own translucency region.
pub fn generate(
    width: usize,
    height: usize,
    attempts: usize,
    rng: &mut impl Rng,
) -> (DungeonLayout, Vec<Room>) {
    let mut layout = DungeonLayout::open(width, height);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            layout.set_opaque(x, y, true);
        }
    }

    let (w, h) = (width as i32, height as i32);
    let mut rooms: Vec<Room> = Vec::new();
    for _ in 0..attempts {
        if w < 12 || h < 12 {
            break;
        }
        let rw = rng.gen_range(4..10);
        let rh = rng.gen_range(4..8);
        let x0 = rng.gen_range(1..w - rw - 1);
        let y0 = rng.gen_range(1..h - rh - 1);
        let room = Room {
            x0,
            y0,
            x1: x0 + rw - 1,
            y1: y0 + rh - 1,
        };
        if rooms.iter().any(|r| r.overlaps(&room)) {
            continue;
        }

        let region = if rooms.len() % 3 == 2 {
            (rooms.len() / 3 + 1) as u8
        } else {
            0
        };
        for y in room.y0..=room.y1 {
            for x in room.x0..=room.x1 {
                layout.set_opaque(x, y, false);
                layout.set_region(x, y, region);
            }
        }
        if let Some(prev) = rooms.last() {
            carve_corridor(&mut layout, prev.center(), room.center());
        }
        rooms.push(room);
    }

    (layout, rooms)
}

fn carve_corridor(layout: &mut DungeonLayout, from: (i32, i32), to: (i32, i32)) {
    let (mut x, mut y) = from;
    while x != to.0 {
        layout.set_opaque(x, y, false);
        x += (to.0 - x).signum();
    }
    while y != to.1 {
        layout.set_opaque(x, y, false);
        y += (to.1 - y).signum();
    }
    layout.set_opaque(x, y, false);
}
