//! Per-frame animation parameters for the banner
//!
//! Every function here is a pure function of the animation progress (and an
//! element index where relevant), so any frame can be recomputed on its own.

use std::f64::consts::PI;

use crate::models::{Hexagon, Particle, ShieldGlow};

pub const PARTICLE_COUNT: u32 = 20;
pub const CIRCUIT_LINE_COUNT: i32 = 5;
/// Size multipliers of the three hexagon rings, innermost first
pub const HEXAGON_RINGS: [f64; 3] = [1.0, 1.3, 1.6];
pub const SHIELD_SIZE: f64 = 35.0;

const ORBIT_RADIUS_X: f64 = 80.0;
const ORBIT_RADIUS_Y: f64 = 40.0;
const HEXAGON_BASE_SIZE: f64 = 40.0;

/// Normalized position of `frame` in the animation, in [0, 1)
pub fn progress(frame: u32, total_frames: u32) -> f64 {
    if total_frames == 0 {
        return 0.0;
    }
    frame as f64 / total_frames as f64
}

/// One full sine period over the animation
fn wave(progress: f64) -> f64 {
    (progress * 2.0 * PI).sin()
}

fn saturate(value: u32) -> u8 {
    value.min(255) as u8
}

/// Center of the hexagons, shield and particle orbit
pub fn focal_point(width: u32, height: u32) -> (f64, f64) {
    (width as f64 * 0.75, height as f64 * 0.5)
}

/// Place particle `index` for this frame
///
/// Particles that land outside the canvas are dropped, not clamped.
pub fn particle(progress: f64, index: u32, width: u32, height: u32) -> Option<Particle> {
    let i = index as f64;
    let angle = progress * 2.0 * PI + i * PI / 10.0;
    let (cx, cy) = focal_point(width, height);

    let x = (cx + ORBIT_RADIUS_X * (angle + i).cos()) as i32;
    let y = (cy + ORBIT_RADIUS_Y * (angle * 1.5 + i).sin()) as i32;
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return None;
    }

    let radius = (2 + (2.0 * angle.sin()) as i32).max(0) as u32;
    let alpha = (100.0 + 155.0 * angle.sin().abs()) as u32;

    Some(Particle {
        x,
        y,
        radius,
        color: (saturate(100 + alpha / 2), saturate(150 + alpha / 3), 255),
    })
}

/// All particles visible in this frame
pub fn particles(progress: f64, width: u32, height: u32) -> Vec<Particle> {
    (0..PARTICLE_COUNT)
        .filter_map(|index| particle(progress, index, width, height))
        .collect()
}

/// Rows of the scrolling circuit lines
pub fn circuit_line_rows(progress: f64) -> Vec<i32> {
    let offset = (progress * 50.0) as i32;
    (0..CIRCUIT_LINE_COUNT)
        .map(|k| 50 + k * 40 + offset % 20)
        .collect()
}

pub fn hexagon_pulse(progress: f64) -> f64 {
    0.9 + 0.1 * wave(progress)
}

/// The three concentric hexagon rings; outer rings are fainter
pub fn hexagons(progress: f64, width: u32, height: u32) -> [Hexagon; 3] {
    let (cx, cy) = focal_point(width, height);
    let center = (cx as i32, cy as i32);
    let base = (HEXAGON_BASE_SIZE * hexagon_pulse(progress)) as i32;

    HEXAGON_RINGS.map(|mult| Hexagon {
        center,
        radius: (base as f64 * mult) as i32,
        opacity: (150.0 / mult).trunc() / 255.0,
    })
}

/// Closed outline of a hexagon, starting from the rightmost vertex
pub fn hexagon_vertices(hex: &Hexagon) -> Vec<(i32, i32)> {
    let (cx, cy) = (hex.center.0 as f64, hex.center.1 as f64);
    let r = hex.radius as f64;
    let mut points: Vec<(i32, i32)> = (0..6)
        .map(|k| {
            let angle = PI / 3.0 * k as f64;
            ((cx + r * angle.cos()).round() as i32, (cy + r * angle.sin()).round() as i32)
        })
        .collect();
    points.push(points[0]);
    points
}

/// Brightness of the shield glow, in [100, 200]
pub fn glow_intensity(progress: f64) -> u32 {
    (100.0 + 100.0 * wave(progress).abs()) as u32
}

pub fn shield_glow(progress: f64) -> ShieldGlow {
    let glow = glow_intensity(progress);
    ShieldGlow {
        outline: (saturate(150 + glow / 2), saturate(180 + glow / 3), 255),
        check: (saturate(100 + glow), saturate(200 + glow / 2), 255),
    }
}

/// Closed six-point shield outline around `center`
pub fn shield_outline(center: (f64, f64)) -> Vec<(i32, i32)> {
    let (x, y) = center;
    let s = SHIELD_SIZE;
    let points = [
        (x, y - s),
        (x + s * 0.6, y - s * 0.7),
        (x + s * 0.6, y + s * 0.3),
        (x, y + s),
        (x - s * 0.6, y + s * 0.3),
        (x - s * 0.6, y - s * 0.7),
        (x, y - s),
    ];
    points
        .iter()
        .map(|&(px, py)| (px.round() as i32, py.round() as i32))
        .collect()
}

/// Checkmark stroke inside the shield
pub fn checkmark(center: (f64, f64)) -> [(i32, i32); 3] {
    let (x, y) = (center.0.round() as i32, center.1.round() as i32);
    [(x - 15, y), (x - 5, y + 12), (x + 15, y - 15)]
}

/// Gold title color, shimmering with the glow
pub fn title_color(progress: f64) -> (u8, u8, u8) {
    let text_glow = (50.0 + 50.0 * wave(progress).abs()) as u32;
    (255, saturate(215 - text_glow), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_starts_at_zero_and_increases() {
        assert_eq!(progress(0, 30), 0.0);
        assert_eq!(progress(15, 30), 0.5);
        assert_eq!(progress(3, 0), 0.0);

        let values: Vec<f64> = (0..30).map(|i| progress(i, 30)).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(values.iter().all(|&p| (0.0..1.0).contains(&p)));
    }

    #[test]
    fn test_particle_is_deterministic() {
        for frame in 0..30 {
            let p = progress(frame, 30);
            for index in 0..PARTICLE_COUNT {
                assert_eq!(particle(p, index, 600, 240), particle(p, index, 600, 240));
            }
        }
    }

    #[test]
    fn test_first_particle_of_first_frame() {
        // angle = 0: x = 450 + 80, y = 120, sin(0) = 0
        let p = particle(0.0, 0, 600, 240).unwrap();
        assert_eq!((p.x, p.y), (530, 120));
        assert_eq!(p.radius, 2);
        assert_eq!(p.color, (150, 183, 255));
    }

    #[test]
    fn test_particles_outside_canvas_are_skipped() {
        // On a 100x100 canvas the orbit (radius 80 around x = 75) leaves the right edge
        let all = particles(0.0, 100, 100);
        assert!(all.len() < PARTICLE_COUNT as usize);
        assert!(all.iter().all(|p| (0..100).contains(&p.x) && (0..100).contains(&p.y)));
        assert!(particle(0.0, 0, 100, 100).is_none());
    }

    #[test]
    fn test_particle_radius_and_color_ranges() {
        for frame in 0..30 {
            for p in particles(progress(frame, 30), 600, 240) {
                assert!(p.radius <= 4);
                assert!(p.color.0 >= 150 && p.color.1 >= 183);
                assert_eq!(p.color.2, 255);
            }
        }
    }

    #[test]
    fn test_circuit_lines_scroll() {
        assert_eq!(circuit_line_rows(0.0), vec![50, 90, 130, 170, 210]);
        // offset 25 -> 5 pixels down
        assert_eq!(circuit_line_rows(0.5)[0], 55);
        // offset 48 -> 8 pixels down
        assert_eq!(circuit_line_rows(29.0 / 30.0)[4], 218);
    }

    #[test]
    fn test_hexagon_rings() {
        let rings = hexagons(0.0, 600, 240);
        assert_eq!(rings.map(|h| h.radius), [36, 46, 57]);
        assert!(rings.iter().all(|h| h.center == (450, 120)));
        assert!(rings[0].opacity > rings[1].opacity && rings[1].opacity > rings[2].opacity);
        assert!((rings[0].opacity - 150.0 / 255.0).abs() < 1e-9);

        // Peak of the pulse at a quarter turn
        assert_eq!(hexagons(0.25, 600, 240)[0].radius, 40);
    }

    #[test]
    fn test_hexagon_vertices_closed() {
        let hex = Hexagon { center: (100, 100), radius: 40, opacity: 1.0 };
        let points = hexagon_vertices(&hex);
        assert_eq!(points.len(), 7);
        assert_eq!(points[0], (140, 100));
        assert_eq!(points[0], points[6]);
        assert_eq!(points[3], (60, 100));
    }

    #[test]
    fn test_glow_oscillates() {
        assert_eq!(glow_intensity(0.0), 100);
        assert_eq!(glow_intensity(0.25), 200);
        let glow = shield_glow(0.25);
        assert_eq!(glow.outline, (250, 246, 255));
        // 100 + 200 saturates
        assert_eq!(glow.check, (255, 255, 255));
        assert_eq!(shield_glow(0.0).check, (200, 250, 255));
    }

    #[test]
    fn test_shield_geometry() {
        let outline = shield_outline((450.0, 120.0));
        assert_eq!(outline.len(), 7);
        assert_eq!(outline[0], (450, 85));
        assert_eq!(outline[3], (450, 155));
        assert_eq!(checkmark((450.0, 120.0)), [(435, 120), (445, 132), (465, 105)]);
    }

    #[test]
    fn test_title_shimmer() {
        assert_eq!(title_color(0.0), (255, 165, 0));
        assert_eq!(title_color(0.25), (255, 115, 0));
    }
}
