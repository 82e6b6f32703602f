//! Pointer and layout arithmetic, kept free of DOM types.

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// Whether the pointer moved far enough from the press point to start a drag
pub fn exceeds_threshold(start: (i32, i32), current: (i32, i32)) -> bool {
    let dx = (current.0 - start.0).abs();
    let dy = (current.1 - start.1).abs();
    dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX
}

/// Side of a hovered item the dragged item is inserted on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertSide {
    Before,
    After,
}

/// Upper half of the hovered box inserts before it, lower half after
pub fn insert_side(pointer_y: f64, top: f64, height: f64) -> InsertSide {
    if pointer_y < top + height / 2.0 {
        InsertSide::Before
    } else {
        InsertSide::After
    }
}

/// Translation that puts an element back at its old box (FLIP "invert" step).
/// None when it did not move.
pub fn flip_offset(old: (f64, f64), new: (f64, f64)) -> Option<(f64, f64)> {
    let dx = old.0 - new.0;
    let dy = old.1 - new.1;
    if dx.abs() < 0.5 && dy.abs() < 0.5 {
        None
    } else {
        Some((dx, dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_exclusive() {
        assert!(!exceeds_threshold((10, 10), (10, 10)));
        assert!(!exceeds_threshold((10, 10), (15, 5)));
        assert!(exceeds_threshold((10, 10), (16, 10)));
        assert!(exceeds_threshold((10, 10), (10, 4)));
    }

    #[test]
    fn test_insert_side_by_midpoint() {
        // Box spans 100..140, midpoint 120
        assert_eq!(insert_side(101.0, 100.0, 40.0), InsertSide::Before);
        assert_eq!(insert_side(119.9, 100.0, 40.0), InsertSide::Before);
        assert_eq!(insert_side(120.0, 100.0, 40.0), InsertSide::After);
        assert_eq!(insert_side(139.0, 100.0, 40.0), InsertSide::After);
    }

    #[test]
    fn test_flip_offset() {
        assert_eq!(flip_offset((0.0, 100.0), (0.0, 100.2)), None);
        assert_eq!(flip_offset((0.0, 100.0), (0.0, 60.0)), Some((0.0, 40.0)));
        assert_eq!(flip_offset((300.0, 20.0), (10.0, 20.0)), Some((290.0, 0.0)));
    }
}
