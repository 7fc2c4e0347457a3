use std::path::PathBuf;

use bon::Builder;

use crate::animator::SpinPhysics;

/// Color representation for wheel elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_hex(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// Sector fill colors, assigned by sector index modulo the palette length.
pub const PALETTE: [Color; 8] = [
    Color::from_hex(0xef4444), // red
    Color::from_hex(0x3b82f6), // blue
    Color::from_hex(0x22c55e), // green
    Color::from_hex(0xeab308), // yellow
    Color::from_hex(0xa855f7), // purple
    Color::from_hex(0xec4899), // pink
    Color::from_hex(0x6366f1), // indigo
    Color::from_hex(0xf97316), // orange
];

pub const POINTER_COLOR: Color = Color::from_hex(0x4f46e5);

/// Where the binary looks for a font when none is given.
pub const FALLBACK_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

#[derive(Debug, Clone, Builder)]
pub struct WheelConfig {
    #[builder(default = "Moderator Wheel".to_string())]
    pub title: String,

    // Window configuration
    #[builder(default = 400)]
    pub canvas_size: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    // Wheel geometry
    #[builder(default = 40)]
    pub wheel_margin: i32,
    #[builder(default = 18)]
    pub hub_radius: i32,
    #[builder(default = 1.5)]
    pub divider_thickness: f32,
    #[builder(default = 14)]
    pub pointer_half_width: i32,
    #[builder(default = 28)]
    pub pointer_height: i32,

    // Text
    #[builder(default = 16.0)]
    pub label_font_size: f32,
    #[builder(default = 0.62)]
    pub label_radius_factor: f64,
    #[builder(default = 20.0)]
    pub caption_font_size: f32,

    // Colors
    #[builder(default = Color::new(0xff, 0xff, 0xff))]
    pub background_color: Color,
    #[builder(default = Color::new(0xff, 0xff, 0xff))]
    pub text_color: Color,
    #[builder(default = Color::from_hex(0x111827))]
    pub caption_color: Color,

    pub font_path: Option<PathBuf>,

    #[builder(default)]
    pub physics: SpinPhysics,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WheelConfig {
    pub fn wheel_radius(&self) -> i32 {
        (self.canvas_size as i32) / 2 - self.wheel_margin
    }
}
