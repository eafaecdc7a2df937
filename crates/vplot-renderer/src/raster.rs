//! Software rasterizer.
//!
//! Draws a [`Scene`] into an RGBA buffer with a depth buffer, flat Lambert
//! shading from a headlight and straight alpha blending. Text is not
//! rasterized; see [`crate::overlay`].

use glam::{DMat4, DVec3, DVec4};
use image::RgbaImage;
use vplot_core::PolyData;

use crate::actor::{Actor, ActorKind, ImageActor, LegendActor, ScalarBarActor};
use crate::scene::Scene;

const AMBIENT: f64 = 0.25;

/// Color and depth targets
pub struct Framebuffer {
    width: u32,
    height: u32,
    color: Vec<[u8; 4]>,
    depth: Vec<f64>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, clear: [u8; 4]) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            color: vec![clear; len],
            depth: vec![f64::INFINITY; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.index(x as i64, y as i64).map(|i| self.color[i])
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Blend `rgba` over the pixel if `depth` passes the depth test.
    fn plot(&mut self, x: i64, y: i64, depth: f64, rgba: [f64; 4]) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if depth > self.depth[i] {
            return;
        }
        if rgba[3] >= 1.0 {
            self.depth[i] = depth;
        }
        self.color[i] = blend(self.color[i], rgba);
    }

    /// Blend without depth testing.
    fn overlay(&mut self, x: i64, y: i64, rgba: [f64; 4]) {
        if let Some(i) = self.index(x, y) {
            self.color[i] = blend(self.color[i], rgba);
        }
    }

    pub fn into_image(self) -> RgbaImage {
        let bytes: Vec<u8> = bytemuck::cast_slice(&self.color).to_vec();
        RgbaImage::from_raw(self.width, self.height, bytes)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }
}

fn to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn blend(dst: [u8; 4], src: [f64; 4]) -> [u8; 4] {
    let a = src[3].clamp(0.0, 1.0);
    let mix = |d: u8, s: f64| to_u8(s * a + d as f64 / 255.0 * (1.0 - a));
    let out_alpha = a + dst[3] as f64 / 255.0 * (1.0 - a);
    [
        mix(dst[0], src[0]),
        mix(dst[1], src[1]),
        mix(dst[2], src[2]),
        to_u8(out_alpha),
    ]
}

/// A vertex after projection: pixel x/y (origin top-left) and NDC depth
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f64,
    y: f64,
    z: f64,
}

fn project(mvp: &DMat4, p: DVec3, width: u32, height: u32) -> Option<ScreenVertex> {
    let clip: DVec4 = *mvp * p.extend(1.0);
    if clip.w <= 1e-12 || !clip.is_finite() {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(ScreenVertex {
        x: (ndc.x + 1.0) * 0.5 * width as f64,
        y: (1.0 - ndc.y) * 0.5 * height as f64,
        z: ndc.z,
    })
}

/// Render `scene` into a new `width` x `height` buffer.
pub fn rasterize(scene: &Scene, width: u32, height: u32) -> Framebuffer {
    let [r, g, b] = scene.background();
    let clear = [to_u8(r), to_u8(g), to_u8(b), to_u8(scene.background_alpha())];
    let mut fb = Framebuffer::new(width.max(1), height.max(1), clear);
    let aspect = fb.width as f64 / fb.height as f64;
    let view_proj = scene.camera().view_projection(aspect);

    for actor in scene.actors().filter(|a| a.visible) {
        match &actor.kind {
            ActorKind::Geometry(_) | ActorKind::Follower(_) => {
                draw_geometry(&mut fb, scene, actor, &view_proj);
            }
            ActorKind::ScalarBar(bar) => draw_scalar_bar(&mut fb, bar),
            ActorKind::Legend(legend) => draw_legend(&mut fb, legend),
            ActorKind::Image(image) => draw_image(&mut fb, image, actor.property.opacity),
            ActorKind::Text(_) => {}
        }
    }
    fb
}

fn draw_geometry(fb: &mut Framebuffer, scene: &Scene, actor: &Actor, view_proj: &DMat4) {
    let (Some(mapper), Some(model)) = (actor.mapper(), actor.model_matrix(scene.camera())) else {
        return;
    };
    let output = mapper.output();
    if let Err(e) = output.validate() {
        scene.report_error(&format!("actor {} skipped: {e}", actor.id().raw()));
        return;
    }

    let mvp = *view_proj * model;
    let opacity = actor.property.opacity;
    let colors: Vec<[f64; 4]> = match mapper.point_colors(&output) {
        Some(colors) => colors
            .into_iter()
            .map(|[r, g, b, a]| [r, g, b, a * opacity])
            .collect(),
        None => vec![actor.property.rgba(); output.points.len()],
    };
    let screen: Vec<Option<ScreenVertex>> = output
        .points
        .iter()
        .map(|p| project(&mvp, *p, fb.width, fb.height))
        .collect();

    let geometry = Geometry {
        polydata: &output,
        screen: &screen,
        colors: &colors,
    };
    let headlight = scene.camera().direction_of_projection();
    geometry.draw_polys(fb, &model, headlight, actor.property.lighting);
    geometry.draw_lines(fb, actor.property.line_width);
    geometry.draw_verts(fb, actor.property.point_size);
}

struct Geometry<'a> {
    polydata: &'a PolyData,
    screen: &'a [Option<ScreenVertex>],
    colors: &'a [[f64; 4]],
}

impl Geometry<'_> {
    fn draw_polys(&self, fb: &mut Framebuffer, model: &DMat4, headlight: DVec3, lighting: bool) {
        for cell in self.polydata.polys.iter() {
            if cell.len() < 3 {
                continue;
            }
            for k in 1..cell.len() - 1 {
                let ids = [cell[0], cell[k], cell[k + 1]];
                let (Some(a), Some(b), Some(c)) =
                    (self.screen[ids[0]], self.screen[ids[1]], self.screen[ids[2]])
                else {
                    continue;
                };

                let intensity = if lighting {
                    let [p0, p1, p2] = ids.map(|i| model.transform_point3(self.polydata.points[i]));
                    let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
                    AMBIENT + (1.0 - AMBIENT) * normal.dot(headlight).abs()
                } else {
                    1.0
                };
                let shade = |c: [f64; 4]| [c[0] * intensity, c[1] * intensity, c[2] * intensity, c[3]];
                let colors = ids.map(|i| shade(self.colors[i]));
                fill_triangle(fb, [a, b, c], colors);
            }
        }
    }

    fn draw_lines(&self, fb: &mut Framebuffer, width: f64) {
        for cell in self.polydata.lines.iter() {
            for pair in cell.windows(2) {
                if let (Some(a), Some(b)) = (self.screen[pair[0]], self.screen[pair[1]]) {
                    draw_line(fb, a, b, self.colors[pair[0]], self.colors[pair[1]], width);
                }
            }
        }
    }

    fn draw_verts(&self, fb: &mut Framebuffer, size: f64) {
        for cell in self.polydata.verts.iter() {
            for &i in cell {
                if let Some(v) = self.screen[i] {
                    draw_point(fb, v.x, v.y, v.z, self.colors[i], size);
                }
            }
        }
    }
}

fn edge(a: ScreenVertex, b: ScreenVertex, x: f64, y: f64) -> f64 {
    (b.x - a.x) * (y - a.y) - (b.y - a.y) * (x - a.x)
}

fn fill_triangle(fb: &mut Framebuffer, v: [ScreenVertex; 3], colors: [[f64; 4]; 3]) {
    let area = edge(v[0], v[1], v[2].x, v[2].y);
    if area.abs() < 1e-12 {
        return;
    }
    let min_x = v.iter().map(|p| p.x).fold(f64::INFINITY, f64::min).floor().max(0.0) as i64;
    let max_x = v.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max).ceil().min(fb.width as f64) as i64;
    let min_y = v.iter().map(|p| p.y).fold(f64::INFINITY, f64::min).floor().max(0.0) as i64;
    let max_y = v.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max).ceil().min(fb.height as f64) as i64;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
            let w0 = edge(v[1], v[2], px, py) / area;
            let w1 = edge(v[2], v[0], px, py) / area;
            let w2 = edge(v[0], v[1], px, py) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }
            let z = w0 * v[0].z + w1 * v[1].z + w2 * v[2].z;
            if !(-1.0..=1.0).contains(&z) {
                continue;
            }
            let rgba = std::array::from_fn(|c| w0 * colors[0][c] + w1 * colors[1][c] + w2 * colors[2][c]);
            fb.plot(x, y, z, rgba);
        }
    }
}

fn draw_line(fb: &mut Framebuffer, a: ScreenVertex, b: ScreenVertex, ca: [f64; 4], cb: [f64; 4], width: f64) {
    let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as usize;
    for step in 0..=steps {
        let t = step as f64 / steps as f64;
        let z = a.z + (b.z - a.z) * t;
        if !(-1.0..=1.0).contains(&z) {
            continue;
        }
        let rgba = std::array::from_fn(|c| ca[c] + (cb[c] - ca[c]) * t);
        draw_point(fb, a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t, z, rgba, width);
    }
}

fn draw_point(fb: &mut Framebuffer, x: f64, y: f64, z: f64, rgba: [f64; 4], size: f64) {
    let half = ((size.max(1.0) - 1.0) * 0.5).round() as i64;
    let (cx, cy) = (x.floor() as i64, y.floor() as i64);
    for dy in -half..=half {
        for dx in -half..=half {
            fb.plot(cx + dx, cy + dy, z, rgba);
        }
    }
}

/// Vertical ramp on the right of the viewport, low values at the bottom.
pub(crate) fn scalar_bar_rect(width: u32, height: u32) -> [i64; 4] {
    let (w, h) = (width as f64, height as f64);
    [
        (w * 0.88) as i64,
        (h * 0.15) as i64,
        (w * 0.93) as i64,
        (h * 0.85) as i64,
    ]
}

fn draw_scalar_bar(fb: &mut Framebuffer, bar: &ScalarBarActor) {
    let table = bar.lookup_table.read();
    if table.is_empty() {
        return;
    }
    let [x0, y0, x1, y1] = scalar_bar_rect(fb.width, fb.height);
    let rows = (y1 - y0).max(1);
    for y in y0..y1 {
        let t = (y1 - 1 - y) as f64 / (rows - 1).max(1) as f64;
        let index = ((t * (table.len() - 1) as f64).round() as usize).min(table.len() - 1);
        let color = table.colors()[index];
        for x in x0..x1 {
            fb.overlay(x, y, color);
        }
    }
}

/// Pixel rectangle `[x0, y0, x1, y1]` (origin top-left) of a legend box.
pub(crate) fn legend_rect(legend: &LegendActor, width: u32, height: u32) -> [i64; 4] {
    let (w, h) = (width as f64, height as f64);
    let x0 = legend.position.x * w;
    let y1 = (1.0 - legend.position.y) * h;
    [
        x0 as i64,
        (y1 - legend.size.y * h) as i64,
        (x0 + legend.size.x * w) as i64,
        y1 as i64,
    ]
}

fn draw_legend(fb: &mut Framebuffer, legend: &LegendActor) {
    if legend.entries.is_empty() {
        return;
    }
    let [x0, y0, x1, y1] = legend_rect(legend, fb.width, fb.height);
    for y in y0..y1 {
        for x in x0..x1 {
            fb.overlay(x, y, [1.0, 1.0, 1.0, 0.6]);
        }
    }
    let row = (y1 - y0) / legend.entries.len() as i64;
    let swatch = (row * 6 / 10).max(1);
    for (i, entry) in legend.entries.iter().enumerate() {
        let top = y0 + row * i as i64 + (row - swatch) / 2;
        let [r, g, b] = entry.color;
        for y in top..top + swatch {
            for x in x0 + 4..x0 + 4 + swatch {
                fb.overlay(x, y, [r, g, b, 1.0]);
            }
        }
    }
}

fn draw_image(fb: &mut Framebuffer, actor: &ImageActor, opacity: f64) {
    let h = actor.image.height();
    let left = actor.position.x.round() as i64;
    let top = fb.height as i64 - actor.position.y.round() as i64 - h as i64;
    for (x, y, pixel) in actor.image.enumerate_pixels() {
        let [r, g, b, a] = pixel.0.map(|c| c as f64 / 255.0);
        fb.overlay(left + x as i64, top + y as i64, [r, g, b, a * opacity]);
    }
}

#[cfg(test)]
mod tests {
    use glam::{DVec2, DVec3};
    use vplot_core::{CellArray, LookupTable};

    use super::*;
    use crate::actor::{Actor, Follower, LegendEntry, LegendSymbol};
    use crate::mapper::{Mapper, shared_lookup_table};
    use crate::source::{Source, SphereSource, VectorTextSource};

    fn count(fb: &Framebuffer, rgba: [u8; 4]) -> usize {
        fb.color.iter().filter(|c| **c == rgba).count()
    }

    #[test]
    fn test_empty_scene_is_background() {
        let mut scene = Scene::new();
        scene.set_background([1.0, 0.0, 0.0]);
        let fb = rasterize(&scene, 8, 4);
        assert_eq!(count(&fb, [255, 0, 0, 255]), 32);
    }

    #[test]
    fn test_vector_text_reaches_frame() {
        let mut scene = Scene::new();
        scene.add_actor(
            Actor::new(ActorKind::Follower(Follower {
                mapper: Mapper::from_source(Source::VectorText(VectorTextSource::new("HI"))),
                position: DVec3::new(-0.6, -0.5, 0.0),
                scale: 1.0,
                follow_camera: true,
            }))
            .with_color([1.0, 1.0, 1.0]),
        );
        scene.camera_mut().set_position(DVec3::new(0.0, 0.0, 5.0));

        let fb = rasterize(&scene, 64, 64);
        let drawn = fb.color.iter().filter(|c| **c != [0, 0, 0, 255]).count();
        assert!(drawn > 20, "{drawn} text pixels");
    }

    #[test]
    fn test_unlit_sphere_covers_center() {
        let mut scene = Scene::new();
        let mut actor = Actor::geometry(Mapper::from_source(Source::Sphere(SphereSource::default())))
            .with_color([0.0, 1.0, 0.0]);
        actor.property.lighting = false;
        scene.add_actor(actor);
        scene.reset_camera();

        let fb = rasterize(&scene, 64, 64);
        assert_eq!(fb.pixel(32, 32), Some([0, 255, 0, 255]));
        assert_eq!(fb.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_nearer_triangle_wins() {
        let quad = |z: f64| {
            let mut p = PolyData::with_points(vec![
                DVec3::new(-1.0, -1.0, z),
                DVec3::new(1.0, -1.0, z),
                DVec3::new(1.0, 1.0, z),
                DVec3::new(-1.0, 1.0, z),
            ]);
            p.polys = CellArray::from_cells([&[0usize, 1, 2, 3][..]]);
            p
        };
        let mut scene = Scene::new();
        let mut near = Actor::geometry(Mapper::from_polydata(quad(0.5))).with_color([1.0, 0.0, 0.0]);
        let mut far = Actor::geometry(Mapper::from_polydata(quad(-0.5))).with_color([0.0, 0.0, 1.0]);
        near.property.lighting = false;
        far.property.lighting = false;
        // Far one drawn last must still lose the depth test.
        scene.add_actor(near);
        scene.add_actor(far);
        scene.camera_mut().set_position(DVec3::new(0.0, 0.0, 10.0));
        scene.reset_camera();

        let fb = rasterize(&scene, 32, 32);
        assert_eq!(fb.pixel(16, 16), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_invalid_polydata_is_reported_not_drawn() {
        let observer = std::sync::Arc::new(crate::observer::testing::RecordingObserver::default());
        let mut scene = Scene::new();
        scene.set_observer(observer.clone());
        let mut bad = PolyData::with_points(vec![DVec3::ZERO]);
        bad.polys = CellArray::from_cells([&[0usize, 1, 2][..]]);
        scene.add_actor(Actor::geometry(Mapper::from_polydata(bad)));

        rasterize(&scene, 4, 4);
        assert_eq!(observer.errors.lock().len(), 1);
    }

    #[test]
    fn test_scalar_bar_and_legend_draw_over_background() {
        let mut scene = Scene::new();
        scene.add_actor(Actor::new(ActorKind::ScalarBar(ScalarBarActor {
            lookup_table: shared_lookup_table(LookupTable::grayscale(2)),
            title: String::new(),
            label_count: 5,
        })));
        scene.add_actor(Actor::new(ActorKind::Legend(LegendActor {
            entries: vec![LegendEntry {
                label: "a".into(),
                color: [1.0, 0.0, 0.0],
                symbol: LegendSymbol::Square,
            }],
            position: DVec2::new(0.0, 0.0),
            size: DVec2::new(0.5, 0.5),
        })));
        let fb = rasterize(&scene, 100, 100);
        let [x0, _, _, y1] = scalar_bar_rect(100, 100);
        // Top of the bar is white, bottom black.
        assert_eq!(fb.pixel(x0 as u32, 15), Some([255, 255, 255, 255]));
        assert_eq!(fb.pixel(x0 as u32, y1 as u32 - 1), Some([0, 0, 0, 255]));
        assert!(count(&fb, [255, 0, 0, 255]) > 0);
    }

    #[test]
    fn test_image_overlay_position() {
        let mut scene = Scene::new();
        let image = RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 255, 255]));
        scene.add_actor(Actor::new(ActorKind::Image(ImageActor {
            image,
            position: DVec2::ZERO,
        })));
        let fb = rasterize(&scene, 4, 4);
        // Lower-left corner in display coordinates is the bottom rows.
        assert_eq!(fb.pixel(0, 3), Some([0, 0, 255, 255]));
        assert_eq!(fb.pixel(0, 0), Some([0, 0, 0, 255]));
    }
}
