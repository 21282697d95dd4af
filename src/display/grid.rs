//! Candidate item locations for the search display

use std::f64::consts::PI;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::config::{DisplayConfig, GridLayout};
use crate::core::types::Point;

/// All candidate locations for `display`, in generation order
pub fn candidate_locations(display: &DisplayConfig) -> Vec<Point> {
    match display.layout {
        GridLayout::Cartesian => cartesian_locations(display),
        GridLayout::Polar => polar_locations(display, false),
        GridLayout::PolarDense => polar_locations(display, true),
    }
}

/// How many items the display can hold
pub fn capacity(display: &DisplayConfig) -> usize {
    candidate_locations(display).len()
}

/// Candidate locations in random order
pub fn shuffled_locations<R: Rng + ?Sized>(display: &DisplayConfig, rng: &mut R) -> Vec<Point> {
    let mut locations = candidate_locations(display);
    locations.shuffle(rng);
    locations
}

/// Square grid filling the display; locations are item upper-left corners
pub fn cartesian_locations(display: &DisplayConfig) -> Vec<Point> {
    let min_x = display.center.x - display.radius;
    let max_x = min_x + 2.0 * display.radius - 2.0 * display.item_radius;
    let min_y = display.center.y - display.radius;
    let max_y = min_y + 2.0 * display.radius - 2.0 * display.item_radius;

    let mut locations = Vec::new();
    let mut x = min_x;
    while x + display.item_radius <= max_x {
        let mut y = min_y;
        while y + display.item_radius <= max_y {
            locations.push(Point::new(x, y));
            y += display.item_distance;
        }
        x += display.item_distance;
    }
    locations
}

/// Concentric rings around the center
///
/// Sparse rings place eight items per ring and grow the radius by half each
/// ring. Dense rings pack as many items as the circumference allows and grow
/// by one item spacing.
pub fn polar_locations(display: &DisplayConfig, dense: bool) -> Vec<Point> {
    let mut locations = Vec::new();
    let mut radius = display.item_distance * 2.0;

    while radius + display.item_radius < display.radius {
        let angle_step = if dense { display.item_distance / radius } else { PI / 4.0 };
        // every multiple of the step below a full turn
        let count = (2.0 * PI / angle_step).ceil() as usize;
        for k in 0..count {
            let p = Point::from_polar(display.center, radius, k as f64 * angle_step);
            locations.push(Point::new(
                p.x.round() - display.item_radius,
                p.y.round() - display.item_radius,
            ));
        }

        if dense {
            radius += display.item_distance;
        } else {
            radius *= 1.5;
        }
    }
    locations
}
