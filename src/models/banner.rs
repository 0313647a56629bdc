//! Per-frame banner parameters

/// One orbiting particle, already placed on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Particle {
    pub x: i32,
    pub y: i32,
    pub radius: u32,
    pub color: (u8, u8, u8),
}

/// One ring of the pulsing hexagon cluster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hexagon {
    pub center: (i32, i32),
    pub radius: i32,
    /// Opacity in [0, 1]
    pub opacity: f64,
}

/// Shield outline and checkmark colors for one glow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShieldGlow {
    pub outline: (u8, u8, u8),
    pub check: (u8, u8, u8),
}
