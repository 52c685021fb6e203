//! Vello-based renderer implementation.
//!
//! Frame structure, back to front: background fill, grid, images, an
//! isolated ink layer (erase strokes cut ink only), text, then the
//! selection overlay. Layer separation is what keeps destination-out
//! erasing away from the grid, images, and text.

use crate::renderer::{RenderContext, Renderer, GRID_SIZE};
use inkboard_core::entity::{
    Corner, Entity, FontFamily, ImageEntity, Stroke, TextAlign, TextEntity, LINE_HEIGHT,
};
use inkboard_core::text_edit::TextEditSession;
use inkboard_core::theme::{InkColor, ThemeColors};
use inkboard_core::view::ViewTransform;
use inkboard_core::EntityId;
use kurbo::{Affine, BezPath, Cap, Join, Line, Point, Rect};
use parley::layout::PositionedLayoutItem;
use parley::{
    Alignment, AlignmentOptions, FontContext, FontStack, GenericFamily, LayoutContext,
    StyleProperty,
};
use peniko::{BlendMode, Brush, Color, Compose, Fill, Mix};
use std::collections::HashMap;
use vello::Scene;

/// Selection overlay color (dashed rect and handle fill).
const SELECTION_COLOR: Color = Color::from_rgb8(59, 130, 246);
/// Selection handle edge length in screen pixels.
const HANDLE_SIZE: f64 = 10.0;

/// Multiply a color's alpha channel.
fn color_with_alpha(color: Color, alpha: f64) -> Color {
    let rgba = color.to_rgba8();
    Color::from_rgba8(rgba.r, rgba.g, rgba.b, (rgba.a as f64 * alpha) as u8)
}

/// A text block to paint: either a committed entity or the live session.
struct TextPaint<'a> {
    anchor: Point,
    content: &'a str,
    size: f64,
    align: TextAlign,
    font: FontFamily,
    bold: bool,
    italic: bool,
    underline: bool,
    strikethrough: bool,
    fill: InkColor,
    highlight: Option<Color>,
}

impl<'a> TextPaint<'a> {
    fn from_entity(text: &'a TextEntity) -> Self {
        Self {
            anchor: text.anchor,
            content: &text.content,
            size: text.size,
            align: text.align,
            font: text.font,
            bold: text.bold,
            italic: text.italic,
            underline: text.underline,
            strikethrough: text.strikethrough,
            fill: text.fill,
            highlight: text.highlight,
        }
    }

    fn from_session(session: &'a TextEditSession) -> Self {
        Self {
            anchor: session.anchor,
            content: &session.content,
            size: session.size,
            align: session.align,
            font: session.font,
            bold: session.bold,
            italic: session.italic,
            underline: session.underline,
            strikethrough: session.strikethrough,
            fill: session.fill,
            highlight: session.highlight,
        }
    }
}

/// Vello renderer for the whiteboard scene.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Font context for text layout (system font collection).
    font_cx: FontContext,
    /// Layout context for text layout.
    layout_cx: LayoutContext<Brush>,
    /// Current zoom, for zoom-independent overlay sizing.
    zoom: f64,
    /// Decoded bitmaps keyed by entity id, so images decode once, not per
    /// frame. Pruned every frame against the live scene so deleted entities
    /// release their pixels.
    image_cache: HashMap<EntityId, peniko::ImageData>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            zoom: 1.0,
            image_cache: HashMap::new(),
        }
    }

    /// The built scene for this frame.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets the internal one).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Font and layout contexts, shared with the live text editor.
    pub fn contexts_mut(&mut self) -> (&mut FontContext, &mut LayoutContext<Brush>) {
        (&mut self.font_cx, &mut self.layout_cx)
    }

    /// Build a frame without selection or caret overlays, for screenshot
    /// capture of the current view.
    pub fn build_export_scene(&mut self, ctx: &RenderContext<'_>) -> Scene {
        self.build(ctx, false);
        std::mem::take(&mut self.scene)
    }

    fn world_transform(view: &ViewTransform) -> Affine {
        Affine::new([view.scale, 0.0, 0.0, view.scale, view.pan_x, view.pan_y])
    }

    fn build(&mut self, ctx: &RenderContext<'_>, with_overlays: bool) {
        self.scene.reset();
        self.zoom = ctx.view.scale;
        self.prune_image_cache(ctx);

        let transform = Self::world_transform(ctx.view);
        let viewport = Rect::new(0.0, 0.0, ctx.viewport_size.width, ctx.viewport_size.height);

        // Background and grid go down first so ink never has to punch
        // through them.
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, ctx.colors.background, None, &viewport);
        self.draw_grid(ctx, transform, viewport);

        // Images compose below all path strokes.
        for entity in ctx.scene.entities() {
            if let Entity::Image(image) = entity {
                self.draw_image(image, transform);
            }
        }

        // Ink layer: erase strokes cut through everything painted so far on
        // this layer and nothing outside it.
        self.scene.push_layer(
            BlendMode::new(Mix::Normal, Compose::SrcOver),
            1.0,
            Affine::IDENTITY,
            &viewport,
        );
        for entity in ctx.scene.entities() {
            if let Entity::Stroke(stroke) = entity {
                self.draw_stroke(stroke, &ctx.colors, transform, viewport);
            }
        }
        self.scene.pop_layer();

        // Text renders above ink and is never erased.
        for (index, entity) in ctx.scene.entities().iter().enumerate() {
            if let Entity::Text(text) = entity {
                let being_edited = ctx
                    .editing
                    .and_then(|session| session.existing)
                    .is_some_and(|edit_index| edit_index == index);
                if with_overlays && being_edited {
                    continue;
                }
                self.draw_text(&TextPaint::from_entity(text), &ctx.colors, transform);
            }
        }

        if !with_overlays {
            return;
        }

        if let Some(session) = ctx.editing {
            self.draw_text_session(session, ctx, transform);
        }
        if let Some(index) = ctx.selected_image {
            if let Some(image) = ctx.scene.get(index).and_then(Entity::as_image) {
                self.draw_selection(image, transform);
            }
        }
    }

    /// Grid lines at fixed world pitch over the visible world rectangle,
    /// snapped to the pitch and stroked as screen hairlines.
    fn draw_grid(&mut self, ctx: &RenderContext<'_>, transform: Affine, viewport: Rect) {
        let visible = ctx.view.visible_world_rect(viewport.size());
        let start_x = (visible.x0 / GRID_SIZE).floor() * GRID_SIZE;
        let end_x = (visible.x1 / GRID_SIZE).ceil() * GRID_SIZE;
        let start_y = (visible.y0 / GRID_SIZE).floor() * GRID_SIZE;
        let end_y = (visible.y1 / GRID_SIZE).ceil() * GRID_SIZE;

        let mut path = BezPath::new();
        let mut x = start_x;
        while x <= end_x {
            path.move_to(Point::new(x, start_y));
            path.line_to(Point::new(x, end_y));
            x += GRID_SIZE;
        }
        let mut y = start_y;
        while y <= end_y {
            path.move_to(Point::new(start_x, y));
            path.line_to(Point::new(end_x, y));
            y += GRID_SIZE;
        }

        let hairline = ctx.scale_factor.max(1.0) / self.zoom.max(1e-4);
        let stroke = kurbo::Stroke::new(hairline);
        self.scene
            .stroke(&stroke, transform, ctx.colors.grid, None, &path);
    }

    fn draw_image(&mut self, image: &ImageEntity, transform: Affine) {
        use std::sync::Arc;

        let image_data = if let Some(cached) = self.image_cache.get(&image.id()) {
            cached.clone()
        } else {
            match ::image::load_from_memory(&image.data) {
                Ok(decoded) => {
                    let rgba = decoded.to_rgba8();
                    let (width, height) = rgba.dimensions();
                    let blob = peniko::Blob::new(Arc::new(rgba.into_vec()));
                    let data = peniko::ImageData {
                        data: blob,
                        format: peniko::ImageFormat::Rgba8,
                        width,
                        height,
                        alpha_type: peniko::ImageAlphaType::Alpha,
                    };
                    self.image_cache.insert(image.id(), data.clone());
                    data
                }
                Err(err) => {
                    log::warn!("image decode failed: {err}");
                    self.draw_image_placeholder(image, transform);
                    return;
                }
            }
        };

        let rect = image.rect();
        let scale_x = rect.width() / image_data.width as f64;
        let scale_y = rect.height() / image_data.height as f64;
        let image_transform = transform
            * Affine::translate((rect.x0, rect.y0))
            * Affine::scale_non_uniform(scale_x, scale_y);
        self.scene.draw_image(&image_data.into(), image_transform);
    }

    /// Gray crossed-out box for bitmaps that failed to decode.
    fn draw_image_placeholder(&mut self, image: &ImageEntity, transform: Affine) {
        let rect = image.rect();
        self.scene.fill(
            Fill::NonZero,
            transform,
            Color::from_rgba8(200, 200, 200, 255),
            None,
            &rect,
        );
        let mut cross = BezPath::new();
        cross.move_to(Point::new(rect.x0, rect.y0));
        cross.line_to(Point::new(rect.x1, rect.y1));
        cross.move_to(Point::new(rect.x1, rect.y0));
        cross.line_to(Point::new(rect.x0, rect.y1));
        let stroke = kurbo::Stroke::new(2.0 / self.zoom.max(1e-4));
        self.scene.stroke(
            &stroke,
            transform,
            Color::from_rgba8(150, 150, 150, 255),
            None,
            &cross,
        );
    }

    fn draw_stroke(
        &mut self,
        stroke: &Stroke,
        colors: &ThemeColors,
        transform: Affine,
        viewport: Rect,
    ) {
        if stroke.is_empty() {
            return;
        }
        let path = stroke.to_path();
        let style = kurbo::Stroke::new(stroke.width)
            .with_caps(Cap::Round)
            .with_join(Join::Round);

        if stroke.erase {
            // Destination-out against the ink painted so far on this layer.
            self.scene.push_layer(
                BlendMode::new(Mix::Normal, Compose::DestOut),
                1.0,
                Affine::IDENTITY,
                &viewport,
            );
            self.scene
                .stroke(&style, transform, colors.ink, None, &path);
            self.scene.pop_layer();
        } else {
            let color = color_with_alpha(stroke.color.resolve(colors), stroke.alpha);
            self.scene.stroke(&style, transform, color, None, &path);
        }
    }

    /// Lay out one line of text and return its glyph layout.
    fn layout_line(&mut self, line: &str, paint: &TextPaint<'_>, brush: &Brush) -> parley::Layout<Brush> {
        let family = match paint.font {
            FontFamily::SansSerif => GenericFamily::SansSerif,
            FontFamily::Serif => GenericFamily::Serif,
            FontFamily::Monospace => GenericFamily::Monospace,
        };
        let weight = if paint.bold {
            parley::FontWeight::BOLD
        } else {
            parley::FontWeight::NORMAL
        };
        let style = if paint.italic {
            parley::FontStyle::Italic
        } else {
            parley::FontStyle::Normal
        };

        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, line, 1.0, false);
        builder.push_default(StyleProperty::FontSize(paint.size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontStack(FontStack::Single(
            parley::FontFamily::Generic(family),
        )));
        builder.push_default(StyleProperty::FontWeight(weight));
        builder.push_default(StyleProperty::FontStyle(style));
        let mut layout = builder.build(line);
        layout.break_all_lines(None);
        layout.align(None, Alignment::Start, AlignmentOptions::default());
        layout
    }

    /// Draw a text block with manual line splitting, alignment, highlight,
    /// and underline/strikethrough rules.
    fn draw_text(&mut self, paint: &TextPaint<'_>, colors: &ThemeColors, transform: Affine) {
        let fill = paint.fill.resolve(colors);
        let brush = Brush::Solid(fill);
        let line_height = paint.size * LINE_HEIGHT;

        for (line_index, line) in paint.content.split('\n').enumerate() {
            let line_y = paint.anchor.y + line_index as f64 * line_height;
            if line.is_empty() {
                continue;
            }
            let layout = self.layout_line(line, paint, &brush);
            let width = layout.width() as f64;

            // Alignment shifts the draw origin; the anchor itself is what
            // the entity stores.
            let start_x = match paint.align {
                TextAlign::Left => paint.anchor.x,
                TextAlign::Center => paint.anchor.x - width / 2.0,
                TextAlign::Right => paint.anchor.x - width,
            };

            if let Some(highlight) = paint.highlight {
                let pad = paint.size * 0.08;
                let rect = Rect::new(
                    start_x - pad,
                    line_y - pad,
                    start_x + width + pad,
                    line_y + paint.size + pad,
                );
                self.scene
                    .fill(Fill::NonZero, transform, highlight, None, &rect);
            }

            let line_transform = transform * Affine::translate((start_x, line_y));
            for layout_line in layout.lines() {
                for item in layout_line.items() {
                    let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                        continue;
                    };
                    let mut x = glyph_run.offset();
                    let y = glyph_run.baseline();
                    let run = glyph_run.run();
                    let font = run.font();
                    let font_size = run.font_size();
                    let synthesis = run.synthesis();
                    let glyph_xform = synthesis
                        .skew()
                        .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                    let glyphs: Vec<vello::Glyph> = glyph_run
                        .glyphs()
                        .map(|glyph| {
                            let gx = x + glyph.x;
                            let gy = y - glyph.y;
                            x += glyph.advance;
                            vello::Glyph {
                                id: glyph.id,
                                x: gx,
                                y: gy,
                            }
                        })
                        .collect();

                    if !glyphs.is_empty() {
                        self.scene
                            .draw_glyphs(font)
                            .brush(&brush)
                            .hint(true)
                            .transform(line_transform)
                            .glyph_transform(glyph_xform)
                            .font_size(font_size)
                            .normalized_coords(run.normalized_coords())
                            .draw(Fill::NonZero, glyphs.into_iter());
                    }
                }
            }

            // Canvas text APIs don't draw these decorations; rule them in
            // manually at fixed fractions of the font size.
            let rule_width = (paint.size * 0.05).max(1.0);
            if paint.underline {
                let rule_y = line_y + paint.size * 0.9;
                let rule = Line::new(
                    Point::new(start_x, rule_y),
                    Point::new(start_x + width, rule_y),
                );
                self.scene.stroke(
                    &kurbo::Stroke::new(rule_width),
                    transform,
                    fill,
                    None,
                    &rule,
                );
            }
            if paint.strikethrough {
                let rule_y = line_y + paint.size * 0.5;
                let rule = Line::new(
                    Point::new(start_x, rule_y),
                    Point::new(start_x + width, rule_y),
                );
                self.scene.stroke(
                    &kurbo::Stroke::new(rule_width),
                    transform,
                    fill,
                    None,
                    &rule,
                );
            }
        }
    }

    /// The live session buffer plus a blinking caret at the end of the text.
    fn draw_text_session(
        &mut self,
        session: &TextEditSession,
        ctx: &RenderContext<'_>,
        transform: Affine,
    ) {
        let paint = TextPaint::from_session(session);
        self.draw_text(&paint, &ctx.colors, transform);

        if !ctx.caret_visible {
            return;
        }
        let fill = paint.fill.resolve(&ctx.colors);
        let line_height = paint.size * LINE_HEIGHT;
        let lines: Vec<&str> = paint.content.split('\n').collect();
        let last_index = lines.len().saturating_sub(1);
        let last_line = lines.last().copied().unwrap_or("");

        let brush = Brush::Solid(fill);
        let width = if last_line.is_empty() {
            0.0
        } else {
            self.layout_line(last_line, &paint, &brush).width() as f64
        };
        let caret_x = match paint.align {
            TextAlign::Left => paint.anchor.x + width,
            TextAlign::Center => paint.anchor.x + width / 2.0,
            TextAlign::Right => paint.anchor.x,
        };
        let caret_y = paint.anchor.y + last_index as f64 * line_height;
        let caret = Line::new(
            Point::new(caret_x, caret_y),
            Point::new(caret_x, caret_y + line_height),
        );
        let stroke = kurbo::Stroke::new(2.0 / self.zoom.max(1e-4));
        self.scene.stroke(&stroke, transform, fill, None, &caret);
    }

    /// Dashed selection rectangle plus four square corner handles, both
    /// sized in screen pixels so they don't scale with zoom.
    fn draw_selection(&mut self, image: &ImageEntity, transform: Affine) {
        let zoom = self.zoom.max(1e-4);
        let rect = image.rect();

        let dash = 5.0 / zoom;
        let outline = kurbo::Stroke::new(2.0 / zoom).with_dashes(0.0, [dash, dash]);
        self.scene
            .stroke(&outline, transform, SELECTION_COLOR, None, &rect);

        let half = HANDLE_SIZE / zoom / 2.0;
        let handle_outline = kurbo::Stroke::new(1.0 / zoom);
        for corner in Corner::all() {
            let center = corner.position(rect);
            let handle = Rect::new(
                center.x - half,
                center.y - half,
                center.x + half,
                center.y + half,
            );
            self.scene
                .fill(Fill::NonZero, transform, SELECTION_COLOR, None, &handle);
            self.scene
                .stroke(&handle_outline, transform, Color::WHITE, None, &handle);
        }
    }

    /// Drop cached bitmaps whose entities are no longer in the scene.
    fn prune_image_cache(&mut self, ctx: &RenderContext<'_>) {
        if self.image_cache.is_empty() {
            return;
        }
        let live: std::collections::HashSet<EntityId> = ctx
            .scene
            .entities()
            .iter()
            .filter(|e| e.is_image())
            .map(Entity::id)
            .collect();
        self.image_cache.retain(|id, _| live.contains(id));
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext<'_>) {
        self.build(ctx, true);
    }
}
