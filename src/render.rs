// ============================================================================
// RENDER ADAPTER
// ============================================================================
//
// Builds a retained scene for one frame of the wheel and paints it onto an
// RGBA8 frame. Wheel-local angle θ is drawn at screen angle θ + angle - π/2,
// with screen angles measured clockwise from +x (y grows downwards), so the
// pointer at the top sits at -π/2.

use std::f64::consts::{FRAC_PI_2, TAU};

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::{WheelConfig, PALETTE, POINTER_COLOR};
use crate::layout::WheelLayout;

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Clone, Debug)]
enum DrawCommand {
    Clear((u8, u8, u8)),
    Disc {
        cx: i32,
        cy: i32,
        radius: i32,
        color: (u8, u8, u8),
    },
    Wedge {
        cx: i32,
        cy: i32,
        r: i32,
        start_angle: f64,
        arc_span: f64,
        color: (u8, u8, u8),
    },
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        thickness: f32,
        color: (u8, u8, u8),
    },
    Triangle {
        points: [(f64, f64); 3],
        color: (u8, u8, u8),
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        font_size: f32,
        color: (u8, u8, u8),
    },
    RadialText {
        x: f64,
        y: f64,
        text: String,
        font_size: f32,
        rotation: f64,
        color: (u8, u8, u8),
    },
}

struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn render(&self, canvas: &mut Canvas, font: Option<&Font<'static>>) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Disc {
                    cx,
                    cy,
                    radius,
                    color,
                } => draw_circle(canvas, *cx, *cy, *radius, *color),
                DrawCommand::Wedge {
                    cx,
                    cy,
                    r,
                    start_angle,
                    arc_span,
                    color,
                } => render_wedge_immediate(canvas, *cx, *cy, *r, *start_angle, *arc_span, *color),
                DrawCommand::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    thickness,
                    color,
                } => draw_thick_line_aa(canvas, *x0, *y0, *x1, *y1, *thickness, *color),
                DrawCommand::Triangle { points, color } => {
                    draw_filled_triangle(canvas, *points, *color)
                }
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    color,
                } => {
                    if let Some(font) = font {
                        draw_text(canvas, *x, *y, text, font, Scale::uniform(*font_size), *color);
                    }
                }
                DrawCommand::RadialText {
                    x,
                    y,
                    text,
                    font_size,
                    rotation,
                    color,
                } => {
                    if let Some(font) = font {
                        draw_text_rotated(
                            canvas,
                            *x,
                            *y,
                            text,
                            font,
                            Scale::uniform(*font_size),
                            *rotation,
                            *color,
                        );
                    }
                }
            }
        }
    }
}

// ============================================================================
// CANVAS
// ============================================================================

/// An RGBA8 frame of `width * height` pixels.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        debug_assert!(frame.len() >= width * height * 4);
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some((self.frame[idx], self.frame[idx + 1], self.frame[idx + 2]))
    }

    fn clear(&mut self, color: (u8, u8, u8)) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.0, color.1, color.2, 0xff]);
        }
    }
}

/// Wheel centre and radius for a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    pub cx: i32,
    pub cy: i32,
    pub r: i32,
}

impl WheelGeometry {
    pub fn new(width: usize, height: usize, config: &WheelConfig) -> Self {
        Self {
            cx: width as i32 / 2,
            cy: height as i32 / 2,
            r: (width.min(height) as i32) / 2 - config.wheel_margin,
        }
    }

    /// Screen position of a wheel-local angle at `radius`, for a wheel turned to `angle`.
    pub fn project(&self, local_angle: f64, angle: f64, radius: f64) -> (f64, f64) {
        let screen = screen_angle(local_angle, angle);
        (
            self.cx as f64 + screen.cos() * radius,
            self.cy as f64 + screen.sin() * radius,
        )
    }
}

pub fn screen_angle(local_angle: f64, angle: f64) -> f64 {
    local_angle + angle - FRAC_PI_2
}

// ============================================================================
// WHEEL RENDERING
// ============================================================================

/// Paints one frame: sectors turned by `angle`, labels, hub, pointer and an
/// optional caption underneath.
pub fn render_wheel(
    canvas: &mut Canvas,
    layout: &WheelLayout,
    angle: f64,
    caption: Option<&str>,
    config: &WheelConfig,
    font: Option<&Font<'static>>,
) {
    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(config.background_color.as_tuple()));

    let wheel = WheelGeometry::new(canvas.width, canvas.height, config);
    add_wheel(&mut scene, &wheel, layout, angle, config);
    add_pointer(&mut scene, &wheel, config);

    if let Some(text) = caption {
        scene.add_command(DrawCommand::Text {
            x: wheel.cx,
            y: canvas.height as i32 - config.wheel_margin / 2,
            text: text.to_string(),
            font_size: config.caption_font_size,
            color: config.caption_color.as_tuple(),
        });
    }

    scene.render(canvas, font);
}

fn add_wheel(
    scene: &mut Scene,
    wheel: &WheelGeometry,
    layout: &WheelLayout,
    angle: f64,
    config: &WheelConfig,
) {
    // rim
    scene.add_command(DrawCommand::Disc {
        cx: wheel.cx,
        cy: wheel.cy,
        radius: wheel.r + 3,
        color: (0x37, 0x41, 0x51),
    });

    for (sector, participant) in layout.iter() {
        scene.add_command(DrawCommand::Wedge {
            cx: wheel.cx,
            cy: wheel.cy,
            r: wheel.r,
            start_angle: screen_angle(sector.start_angle, angle),
            arc_span: sector.arc(),
            color: PALETTE[sector.color_index].as_tuple(),
        });

        let (label_x, label_y) = wheel.project(
            sector.center_angle(),
            angle,
            wheel.r as f64 * config.label_radius_factor,
        );
        scene.add_command(DrawCommand::RadialText {
            x: label_x,
            y: label_y,
            text: participant.name.clone(),
            font_size: config.label_font_size,
            rotation: screen_angle(sector.center_angle(), angle),
            color: config.text_color.as_tuple(),
        });
    }

    if layout.sector_count() > 1 {
        for sector in layout.sectors() {
            let (x, y) = wheel.project(sector.start_angle, angle, wheel.r as f64);
            scene.add_command(DrawCommand::Line {
                x0: wheel.cx,
                y0: wheel.cy,
                x1: x.round() as i32,
                y1: y.round() as i32,
                thickness: config.divider_thickness,
                color: config.background_color.as_tuple(),
            });
        }
    }

    // hub
    scene.add_command(DrawCommand::Disc {
        cx: wheel.cx,
        cy: wheel.cy,
        radius: config.hub_radius,
        color: config.background_color.as_tuple(),
    });
    scene.add_command(DrawCommand::Disc {
        cx: wheel.cx,
        cy: wheel.cy,
        radius: config.hub_radius / 3,
        color: POINTER_COLOR.as_tuple(),
    });
}

fn add_pointer(scene: &mut Scene, wheel: &WheelGeometry, config: &WheelConfig) {
    let tip_y = (wheel.cy - wheel.r) as f64 + config.pointer_height as f64 * 0.5;
    let base_y = tip_y - config.pointer_height as f64;
    let cx = wheel.cx as f64;
    let half = config.pointer_half_width as f64;
    scene.add_command(DrawCommand::Triangle {
        points: [(cx - half, base_y), (cx + half, base_y), (cx, tip_y)],
        color: POINTER_COLOR.as_tuple(),
    });
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn text_bounds(glyphs: &[PositionedGlyph]) -> (i32, i32, i32, i32) {
    glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    )
}

fn normalize(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn set_pixel(canvas: &mut Canvas, x: usize, y: usize, color: (u8, u8, u8), alpha: f32) {
    if x < canvas.width && y < canvas.height {
        let idx = (y * canvas.width + x) * 4;
        let frame = &mut *canvas.frame;
        let src = [color.0 as f32, color.1 as f32, color.2 as f32];
        let dst = [frame[idx] as f32, frame[idx + 1] as f32, frame[idx + 2] as f32];
        let a = alpha.clamp(0.0, 1.0);
        let out = [
            (src[0] * a + dst[0] * (1.0 - a)).round() as u8,
            (src[1] * a + dst[1] * (1.0 - a)).round() as u8,
            (src[2] * a + dst[2] * (1.0 - a)).round() as u8,
            0xff,
        ];
        frame[idx..idx + 4].copy_from_slice(&out);
    }
}

fn draw_thick_line_aa(
    canvas: &mut Canvas,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    thickness: f32,
    color: (u8, u8, u8),
) {
    let min_x = x0.min(x1) - thickness.ceil() as i32 - 1;
    let max_x = x0.max(x1) + thickness.ceil() as i32 + 1;
    let min_y = y0.min(y1) - thickness.ceil() as i32 - 1;
    let max_y = y0.max(y1) + thickness.ceil() as i32 + 1;
    let dx = (x1 - x0) as f32;
    let dy = (y1 - y0) as f32;
    let len_sq = (dx * dx + dy * dy).max(f32::EPSILON);
    for y in min_y.max(0)..=max_y {
        for x in min_x.max(0)..=max_x {
            let px = x as f32 - x0 as f32;
            let py = y as f32 - y0 as f32;
            let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
            let lx = x0 as f32 + t * dx;
            let ly = y0 as f32 + t * dy;
            let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
            let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 {
                set_pixel(canvas, x as usize, y as usize, color, aa);
            }
        }
    }
}

fn draw_circle(canvas: &mut Canvas, cx: i32, cy: i32, radius: i32, color: (u8, u8, u8)) {
    for y in -radius - 1..=radius + 1 {
        for x in -radius - 1..=radius + 1 {
            let dist = ((x * x + y * y) as f64).sqrt();
            let aa = if dist > radius as f64 {
                1.0 - (dist - radius as f64).min(1.0)
            } else {
                1.0
            };
            let (px, py) = (cx + x, cy + y);
            if aa > 0.0 && px >= 0 && py >= 0 {
                set_pixel(canvas, px as usize, py as usize, color, aa as f32);
            }
        }
    }
}

fn render_wedge_immediate(
    canvas: &mut Canvas,
    cx: i32,
    cy: i32,
    r: i32,
    start_angle: f64,
    arc_span: f64,
    color: (u8, u8, u8),
) {
    let start = normalize(start_angle);
    let full_circle = arc_span >= TAU - 1e-9;
    for y in (cy - r - 1).max(0)..=(cy + r + 1).min(canvas.height as i32 - 1) {
        for x in (cx - r - 1).max(0)..=(cx + r + 1).min(canvas.width as i32 - 1) {
            let dx = (x - cx) as f64;
            let dy = (y - cy) as f64;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > r as f64 + 1.0 {
                continue;
            }
            let in_arc = full_circle || normalize(dy.atan2(dx) - start) < arc_span;
            if in_arc {
                let aa = if dist > r as f64 {
                    1.0 - (dist - r as f64).min(1.0)
                } else {
                    1.0
                };
                if aa > 0.0 {
                    set_pixel(canvas, x as usize, y as usize, color, aa as f32);
                }
            }
        }
    }
}

fn draw_filled_triangle(canvas: &mut Canvas, points: [(f64, f64); 3], color: (u8, u8, u8)) {
    let [(x0, y0), (x1, y1), (x2, y2)] = points;
    let area = (x1 - x0) * (y2 - y0) - (x2 - x0) * (y1 - y0);
    if area.abs() < f64::EPSILON {
        return;
    }
    let edge = |ax: f64, ay: f64, bx: f64, by: f64, px: f64, py: f64| {
        ((bx - ax) * (py - ay) - (by - ay) * (px - ax)) / area
    };
    let min_x = x0.min(x1).min(x2).floor().max(0.0) as i32;
    let max_x = x0.max(x1).max(x2).ceil() as i32;
    let min_y = y0.min(y1).min(y2).floor().max(0.0) as i32;
    let max_y = y0.max(y1).max(y2).ceil() as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
            let w0 = edge(x1, y1, x2, y2, px, py);
            let w1 = edge(x2, y2, x0, y0, px, py);
            let w2 = edge(x0, y0, x1, y1, px, py);
            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                set_pixel(canvas, x as usize, y as usize, color, 1.0);
            }
        }
    }
}

fn draw_text(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    text: &str,
    font: &Font,
    scale: Scale,
    color: (u8, u8, u8),
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();
    let (min_x, max_x, min_y, max_y) = text_bounds(&glyphs);
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = x - width_px / 2;
    let offset_y = y - height_px / 2;
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                if px >= 0 && py >= 0 {
                    set_pixel(canvas, px as usize, py as usize, color, v);
                }
            });
        }
    }
}

/// Draws `text` centred on `(x, y)`, its baseline turned to `rotation`.
fn draw_text_rotated(
    canvas: &mut Canvas,
    x: f64,
    y: f64,
    text: &str,
    font: &Font,
    scale: Scale,
    rotation: f64,
    color: (u8, u8, u8),
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();
    let (min_x, max_x, min_y, max_y) = text_bounds(&glyphs);
    if min_x >= max_x || min_y >= max_y {
        return;
    }
    let center_x = (min_x + max_x) as f64 / 2.0;
    let center_y = (min_y + max_y) as f64 / 2.0;
    let (sin_r, cos_r) = rotation.sin_cos();

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                if v > 0.001 {
                    let local_x = (gx as i32 + bb.min.x) as f64 - center_x;
                    let local_y = (gy as i32 + bb.min.y) as f64 - center_y;
                    let rotated_x = local_x * cos_r - local_y * sin_r;
                    let rotated_y = local_x * sin_r + local_y * cos_r;
                    draw_antialiased_pixel(canvas, x + rotated_x, y + rotated_y, color, v);
                }
            });
        }
    }
}

fn draw_antialiased_pixel(canvas: &mut Canvas, x: f64, y: f64, color: (u8, u8, u8), alpha: f32) {
    let x_floor = x.floor() as i32;
    let y_floor = y.floor() as i32;
    let x_frac = x - x_floor as f64;
    let y_frac = y - y_floor as f64;

    let samples = [
        (x_floor, y_floor, (1.0 - x_frac) * (1.0 - y_frac)),
        (x_floor + 1, y_floor, x_frac * (1.0 - y_frac)),
        (x_floor, y_floor + 1, (1.0 - x_frac) * y_frac),
        (x_floor + 1, y_floor + 1, x_frac * y_frac),
    ];

    for (px, py, weight) in samples {
        let final_alpha = alpha * weight as f32;
        if px >= 0 && py >= 0 && final_alpha > 0.001 {
            set_pixel(canvas, px as usize, py as usize, color, final_alpha);
        }
    }
}
