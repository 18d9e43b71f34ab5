use crate::error::PackOverflow;

// ── Placement ────────────────────────────────────────────────────────────────

/// Top-left corner and size of one packed rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Placement {
    pub fn x1(&self) -> u32 {
        self.x + self.w
    }

    pub fn y1(&self) -> u32 {
        self.y + self.h
    }

    /// True when the two rectangles share interior area. Zero-area
    /// rectangles never overlap anything.
    pub fn overlaps(&self, other: &Placement) -> bool {
        self.x < other.x1() && other.x < self.x1() && self.y < other.y1() && other.y < self.y1()
    }
}

// ── Shelf packing ────────────────────────────────────────────────────────────

/// Shelf-pack `rects` (`(w, h)` pairs) into a `canvas_w × canvas_h` canvas.
///
/// Rectangles are placed left to right in caller order; a rectangle that
/// does not fit the rest of the current shelf opens a new shelf below the
/// tallest rectangle so far. The first rectangle that cannot be placed
/// fails the whole pack. Identical input always gives identical output.
pub fn pack(canvas_w: u32, canvas_h: u32, rects: &[(u32, u32)]) -> Result<Vec<Placement>, PackOverflow> {
    let mut placements: Vec<Placement> = Vec::with_capacity(rects.len());
    let mut cur_x = 0u32;
    let mut cur_y = 0u32;
    let mut shelf_h = 0u32;

    for (index, &(w, h)) in rects.iter().enumerate() {
        let overflow = PackOverflow { index, w, h, canvas_w, canvas_h };

        if w > canvas_w - cur_x {
            // Start a new shelf.
            cur_y += shelf_h;
            cur_x = 0;
            shelf_h = 0;
        }
        if w > canvas_w || h > canvas_h - cur_y {
            return Err(overflow);
        }

        placements.push(Placement { x: cur_x, y: cur_y, w, h });
        cur_x += w;
        shelf_h = shelf_h.max(h);
    }

    debug_assert!(
        placements.iter().enumerate().all(|(i, a)| {
            a.x1() <= canvas_w
                && a.y1() <= canvas_h
                && placements[i + 1..].iter().all(|b| !a.overlaps(b))
        }),
        "shelf packer produced an out-of-bounds or overlapping placement"
    );
    Ok(placements)
}
