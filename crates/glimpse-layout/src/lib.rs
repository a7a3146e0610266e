#![forbid(unsafe_code)]

//! Layout engine: canvas partitioning into widget slots.
//!
//! [`compute_slots`] is a pure function of (layout, canvas size). The
//! same inputs always yield bit-identical slot rectangles; there is no
//! hidden state and nothing is persisted. Odd-pixel remainders go to
//! the trailing row/column so slots always tile the canvas exactly.

use std::fmt;

use glimpse_core::{Rect, Size};

/// A rectangle on the canvas assigned to one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Slot index, 0-based, matching `WidgetConfig::slot`.
    pub index: usize,
    /// The slot's rectangle in logical pixels.
    pub rect: Rect,
}

/// The closed set of supported layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    /// Four equal quadrants.
    Grid2x2,
    /// Six cells, 2 rows by 3 columns.
    Grid2x3,
    /// One large top slot plus three equal footer slots.
    Hero,
    /// Two equal halves, side by side.
    SplitHorizontal,
    /// Two equal halves, stacked.
    SplitVertical,
    /// Three equal vertical strips.
    ThreeColumn,
    /// One slot covering the whole canvas.
    Fullscreen,
}

impl LayoutKind {
    /// All layouts, for config UIs and exhaustive tests.
    pub const ALL: [LayoutKind; 7] = [
        LayoutKind::Grid2x2,
        LayoutKind::Grid2x3,
        LayoutKind::Hero,
        LayoutKind::SplitHorizontal,
        LayoutKind::SplitVertical,
        LayoutKind::ThreeColumn,
        LayoutKind::Fullscreen,
    ];

    /// Parse a layout identifier.
    pub fn from_id(id: &str) -> Result<Self, UnknownLayout> {
        match id {
            "grid_2x2" => Ok(Self::Grid2x2),
            "grid_2x3" => Ok(Self::Grid2x3),
            "hero" => Ok(Self::Hero),
            "split_horizontal" | "split" => Ok(Self::SplitHorizontal),
            "split_vertical" => Ok(Self::SplitVertical),
            "three_column" => Ok(Self::ThreeColumn),
            "fullscreen" => Ok(Self::Fullscreen),
            other => Err(UnknownLayout {
                id: other.to_string(),
            }),
        }
    }

    /// The layout identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Grid2x2 => "grid_2x2",
            Self::Grid2x3 => "grid_2x3",
            Self::Hero => "hero",
            Self::SplitHorizontal => "split_horizontal",
            Self::SplitVertical => "split_vertical",
            Self::ThreeColumn => "three_column",
            Self::Fullscreen => "fullscreen",
        }
    }

    /// Number of slots this layout produces. Fixed per layout.
    #[must_use]
    pub const fn slot_count(self) -> usize {
        match self {
            Self::Grid2x2 => 4,
            Self::Grid2x3 => 6,
            Self::Hero => 4,
            Self::SplitHorizontal | Self::SplitVertical => 2,
            Self::ThreeColumn => 3,
            Self::Fullscreen => 1,
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Lookup failure for a layout identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLayout {
    /// The identifier that failed to resolve.
    pub id: String,
}

impl fmt::Display for UnknownLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown layout '{}'", self.id)
    }
}

impl std::error::Error for UnknownLayout {}

/// Split a span into `parts` cells; the last cell absorbs the remainder.
fn split_even(start: u16, total: u16, parts: u16) -> Vec<(u16, u16)> {
    debug_assert!(parts > 0);
    let base = total / parts;
    let mut out = Vec::with_capacity(parts as usize);
    let mut pos = start;
    for i in 0..parts {
        let size = if i == parts - 1 {
            total - base * (parts - 1)
        } else {
            base
        };
        out.push((pos, size));
        pos += size;
    }
    out
}

/// Compute the slot rectangles for a layout on a canvas.
///
/// Deterministic: same `(layout, canvas)` in, bit-identical slots out.
/// Slot order is row-major, top-left first; for `hero` the large slot
/// is index 0.
#[must_use]
pub fn compute_slots(layout: LayoutKind, canvas: Size) -> Vec<Slot> {
    let area = Rect::from_size(canvas);
    let rects: Vec<Rect> = match layout {
        LayoutKind::Grid2x2 => grid(area, 2, 2),
        LayoutKind::Grid2x3 => grid(area, 2, 3),
        LayoutKind::Hero => {
            // Hero row takes 60% of the height; three footer cells share
            // the rest.
            let hero_h = (canvas.height as u32 * 60 / 100) as u16;
            let footer = Rect::new(0, hero_h, canvas.width, canvas.height - hero_h);
            let mut rects = vec![Rect::new(0, 0, canvas.width, hero_h)];
            for (x, w) in split_even(footer.x, footer.width, 3) {
                rects.push(Rect::new(x, footer.y, w, footer.height));
            }
            rects
        }
        LayoutKind::SplitHorizontal => grid(area, 1, 2),
        LayoutKind::SplitVertical => grid(area, 2, 1),
        LayoutKind::ThreeColumn => grid(area, 1, 3),
        LayoutKind::Fullscreen => vec![area],
    };

    rects
        .into_iter()
        .enumerate()
        .map(|(index, rect)| Slot { index, rect })
        .collect()
}

/// Row-major grid of `rows` × `cols` cells.
fn grid(area: Rect, rows: u16, cols: u16) -> Vec<Rect> {
    let mut rects = Vec::with_capacity(rows as usize * cols as usize);
    for (y, h) in split_even(area.y, area.height, rows) {
        for (x, w) in split_even(area.x, area.width, cols) {
            rects.push(Rect::new(x, y, w, h));
        }
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CANVAS: Size = Size::new(240, 240);

    #[test]
    fn grid_2x2_on_240_is_four_equal_quadrants() {
        let slots = compute_slots(LayoutKind::Grid2x2, CANVAS);
        let rects: Vec<Rect> = slots.iter().map(|s| s.rect).collect();
        assert_eq!(rects, vec![
            Rect::new(0, 0, 120, 120),
            Rect::new(120, 0, 120, 120),
            Rect::new(0, 120, 120, 120),
            Rect::new(120, 120, 120, 120),
        ]);
    }

    #[test]
    fn grid_2x3_is_two_rows_of_three() {
        let slots = compute_slots(LayoutKind::Grid2x3, CANVAS);
        assert_eq!(slots.len(), 6);
        assert_eq!(slots[0].rect, Rect::new(0, 0, 80, 120));
        assert_eq!(slots[2].rect, Rect::new(160, 0, 80, 120));
        assert_eq!(slots[5].rect, Rect::new(160, 120, 80, 120));
    }

    #[test]
    fn hero_slot_zero_is_the_large_one() {
        let slots = compute_slots(LayoutKind::Hero, CANVAS);
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0].rect, Rect::new(0, 0, 240, 144));
        for slot in &slots[1..] {
            assert_eq!(slot.rect.y, 144);
            assert_eq!(slot.rect.height, 96);
            assert_eq!(slot.rect.width, 80);
        }
    }

    #[test]
    fn splits_are_equal_halves() {
        let h = compute_slots(LayoutKind::SplitHorizontal, CANVAS);
        assert_eq!(h[0].rect, Rect::new(0, 0, 120, 240));
        assert_eq!(h[1].rect, Rect::new(120, 0, 120, 240));

        let v = compute_slots(LayoutKind::SplitVertical, CANVAS);
        assert_eq!(v[0].rect, Rect::new(0, 0, 240, 120));
        assert_eq!(v[1].rect, Rect::new(0, 120, 240, 120));
    }

    #[test]
    fn unknown_id_is_an_explicit_outcome() {
        let err = LayoutKind::from_id("grid_9x9").unwrap_err();
        assert_eq!(err.to_string(), "unknown layout 'grid_9x9'");
    }

    #[test]
    fn ids_round_trip() {
        for layout in LayoutKind::ALL {
            assert_eq!(LayoutKind::from_id(layout.id()).unwrap(), layout);
        }
    }

    #[test]
    fn legacy_split_id_maps_to_horizontal() {
        assert_eq!(
            LayoutKind::from_id("split").unwrap(),
            LayoutKind::SplitHorizontal
        );
    }

    proptest! {
        #[test]
        fn slot_count_matches_documentation(
            layout_idx in 0usize..LayoutKind::ALL.len(),
            w in 16u16..512,
            h in 16u16..512,
        ) {
            let layout = LayoutKind::ALL[layout_idx];
            let slots = compute_slots(layout, Size::new(w, h));
            prop_assert_eq!(slots.len(), layout.slot_count());
        }

        #[test]
        fn slots_are_deterministic(
            layout_idx in 0usize..LayoutKind::ALL.len(),
            w in 16u16..512,
            h in 16u16..512,
        ) {
            let layout = LayoutKind::ALL[layout_idx];
            let size = Size::new(w, h);
            prop_assert_eq!(compute_slots(layout, size), compute_slots(layout, size));
        }

        #[test]
        fn slots_tile_the_canvas(
            layout_idx in 0usize..LayoutKind::ALL.len(),
            w in 16u16..512,
            h in 16u16..512,
        ) {
            let layout = LayoutKind::ALL[layout_idx];
            let canvas = Rect::from_size(Size::new(w, h));
            let slots = compute_slots(layout, Size::new(w, h));
            // Every slot stays inside the canvas and the areas sum to it.
            let mut total_area = 0u32;
            for slot in &slots {
                prop_assert_eq!(slot.rect.intersection(&canvas), slot.rect);
                total_area += slot.rect.area();
            }
            prop_assert_eq!(total_area, canvas.area());
        }

        #[test]
        fn slot_indices_are_sequential(
            layout_idx in 0usize..LayoutKind::ALL.len(),
        ) {
            let layout = LayoutKind::ALL[layout_idx];
            let slots = compute_slots(layout, Size::new(240, 240));
            for (i, slot) in slots.iter().enumerate() {
                prop_assert_eq!(slot.index, i);
            }
        }
    }
}
