// src/engine/planner.rs
//
// Dimension planning: fit a bitmap under the output cap while keeping
// its aspect ratio.

/// Compute target dimensions for re-encoding.
///
/// Only the strictly longer axis triggers scaling: a landscape image wider
/// than the cap is bound to `max_dimension` on width, a portrait image taller
/// than the cap is bound on height, and everything else passes through
/// unchanged. Square images therefore never scale, even above the cap -
/// callers depend on that pass-through, so it must not be "fixed" here
/// without also changing the regression tests that pin it.
pub fn plan_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let aspect_ratio = width as f64 / height as f64;

    if width > height && width > max_dimension {
        let target_width = max_dimension;
        let target_height = ((target_width as f64 / aspect_ratio).round() as u32).max(1);
        (target_width, target_height)
    } else if height > width && height > max_dimension {
        let target_height = max_dimension;
        let target_width = ((target_height as f64 * aspect_ratio).round() as u32).max(1);
        (target_width, target_height)
    } else {
        (width, height)
    }
}
