//! Back-to-front ordering of objects within one object layer.
//!
//! Objects lower on screen are drawn later, so they overlap objects that
//! stand further back. The primary key is the footprint bottom `y`
//! (ascending), ties are broken by `x` (ascending), and objects with equal
//! coordinates keep their document order.

use std::cmp::Ordering;

use crate::model::MapObject;

/// Stable sort with an injected "less than" predicate.
///
/// Elements for which neither `less(a, b)` nor `less(b, a)` holds keep their
/// relative order.
pub fn sort_by_less<T, F>(items: &mut [T], mut less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    items.sort_by(|a, b| {
        if less(a, b) {
            Ordering::Less
        } else if less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    });
}

/// Painter's order predicate: smaller `y` first, then smaller `x`.
///
/// `0.0` and `-0.0` compare equal.
#[inline]
pub fn draws_before(a: &MapObject, b: &MapObject) -> bool {
    match coordinate_cmp(a.y, b.y) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => coordinate_cmp(a.x, b.x) == Ordering::Less,
    }
}

/// Total order on coordinates with signed zeros folded together.
#[inline]
fn coordinate_cmp(a: f64, b: f64) -> Ordering {
    // Adding +0.0 maps -0.0 to 0.0 and leaves every other value unchanged
    (a + 0.0).total_cmp(&(b + 0.0))
}

/// Drawable objects of a layer in compositing order.
///
/// Invisible objects and objects without a tile are dropped *before*
/// sorting, so toggling visibility never reorders the remaining objects.
pub fn depth_order(objects: &[MapObject]) -> Vec<&MapObject> {
    let mut drawable: Vec<&MapObject> = objects.iter().filter(|o| o.is_drawable()).collect();
    sort_by_less(&mut drawable, |a, b| draws_before(a, b));
    drawable
}


// ============================================================================
// Property-Based Tests
// ============================================================================
