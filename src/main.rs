// src/main.rs
use nannou::image::{DynamicImage, RgbaImage};
use nannou::prelude::*;

use brushwork::{
    config::Config,
    fill::{BleedDirection, HatchOptions},
    logging::init_logging,
    models::Color,
    path::PlotKind,
    services::{OutputFormat, Snapshot},
    Painter, Raster, RectMode,
};

struct Model {
    painter: Painter<Raster>,
    background: Color,
    stroke_color: Color,

    // Rendering components:
    texture: wgpu::Texture,
    dirty: bool,

    // Painting state
    seed: u64,
    field_index: usize,

    // Frame capture
    snapshot: Snapshot,
}

fn main() {
    nannou::app(model).update(update).run();
}

fn model(app: &App) -> Model {
    // Load config
    let config = Config::load().expect("Failed to load config file");
    init_logging(config.logging.clone());

    let background = config
        .canvas
        .background_color()
        .expect("Invalid canvas background");
    let stroke_color = config
        .painter
        .stroke_color()
        .expect("Invalid painter color");

    // Create window
    app.new_window()
        .title("brushwork 0.1.0")
        .size(config.canvas.width, config.canvas.height)
        .view(view)
        .key_pressed(key_pressed)
        .build()
        .unwrap();

    // Set up the painter
    let mut canvas = Raster::new(config.canvas.width, config.canvas.height).expect("Invalid canvas size");
    canvas.background(background);
    let mut painter = Painter::load(canvas).expect("Failed to allocate painter masks");
    painter.color_cache(config.painter.color_cache);
    if let Some(path) = config.resolve_brushes_path() {
        match painter.load_brushes(&path) {
            Ok(names) => log::info!("loaded brushes {:?}", names),
            Err(e) => log::warn!("{}", e),
        }
    }
    if let Err(e) = painter.load_tip_images(config.resolve_tip_dir()) {
        log::warn!("{}", e);
    }
    painter.set(&config.painter.brush, stroke_color, config.painter.weight);

    let fields: Vec<String> = painter.list_fields().iter().map(|s| s.to_string()).collect();
    let field_index = config
        .painter
        .field
        .as_ref()
        .and_then(|name| fields.iter().position(|f| f == name))
        .unwrap_or(0);

    let seed = config.painter.seed.unwrap_or_else(random);

    let texture = upload(app, painter.canvas());
    let snapshot = Snapshot::new(config.resolve_output_dir(), OutputFormat::Png);

    Model {
        painter,
        background,
        stroke_color,
        texture,
        dirty: true,
        seed,
        field_index,
        snapshot,
    }
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    match key {
        // new painting
        Key::Space => {
            model.seed = random();
            model.dirty = true;
        }
        // next field
        Key::F => {
            let count = model.painter.list_fields().len().max(1);
            model.field_index = (model.field_index + 1) % count;
            model.dirty = true;
        }
        // regenerate the field for the current time
        Key::R => {
            model.painter.refresh_field(app.time);
            model.dirty = true;
        }
        // save a frame
        Key::S => {
            if let Err(e) = model.snapshot.save(model.painter.canvas()) {
                log::error!("{}", e);
            }
        }
        _ => (),
    }
}

fn update(app: &App, model: &mut Model, _update: Update) {
    if !model.dirty {
        return;
    }
    model.dirty = false;

    let background = model.background;
    model.painter.flush();
    model.painter.canvas_mut().background(background);
    model.painter.seed(model.seed);
    paint_scene(model);
    model.painter.flush();

    model.texture = upload(app, model.painter.canvas());
}

// Draw the state of Model into the given Frame
fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let win = app.window_rect();
    draw.background().color(BLACK);
    draw.texture(&model.texture).w_h(win.w(), win.h());
    draw.to_frame(app, &frame).unwrap();
}

fn upload(app: &App, raster: &Raster) -> wgpu::Texture {
    let image = RgbaImage::from_raw(raster.width(), raster.height(), raster.to_rgba8())
        .unwrap_or_else(|| RgbaImage::new(raster.width(), raster.height()));
    wgpu::Texture::from_image(app, &DynamicImage::ImageRgba8(image))
}

// ************************ Demo painting  *****************************

fn paint_scene(model: &mut Model) {
    let fields: Vec<String> = model.painter.list_fields().iter().map(|s| s.to_string()).collect();
    let (w, h) = {
        let canvas = model.painter.canvas();
        (canvas.width() as f32, canvas.height() as f32)
    };
    let ink = model.stroke_color;
    let painter = &mut model.painter;

    // Field-following pencil strokes across the sheet
    if let Some(name) = fields.get(model.field_index) {
        painter.select_field(name);
    }
    painter.set("2B", ink, 1.0);
    for i in 0..40 {
        let y = h * (i as f32 + 0.5) / 40.0;
        painter.flow_line(w * 0.05, y, w * 0.5, 0.0);
    }
    painter.disable_field();

    // Watercolor rectangle with a charcoal outline
    painter.push();
    painter.fill(Color::hex("#d94f30").unwrap_or(ink), 90.0);
    painter.bleed(0.2, BleedDirection::Out);
    painter.fill_texture(0.6, 0.4);
    painter.set("charcoal", ink, 1.0);
    painter.rect(w * 0.3, h * 0.35, w * 0.25, h * 0.25, RectMode::Center);
    painter.pop();

    // Hatched irregular circle
    painter.push();
    painter.no_stroke();
    painter.hatch(
        6.0,
        30.0,
        HatchOptions {
            rand: Some(0.1),
            continuous: false,
            gradient: Some(0.05),
        },
    );
    painter.set_hatch("HB", ink, 1.0);
    painter.circle(w * 0.72, h * 0.3, h * 0.15, true);
    painter.pop();

    // Marker spline and a rotated square
    painter.push();
    painter.set("marker", Color::hex("#2c6e9b").unwrap_or(ink), 2.0);
    painter.spline(
        &[
            [w * 0.1, h * 0.8, 0.4],
            [w * 0.35, h * 0.65, 1.2],
            [w * 0.6, h * 0.85, 1.0],
            [w * 0.9, h * 0.7, 0.5],
        ],
        0.6,
    );
    painter.translate(w * 0.75, h * 0.72);
    painter.rotate(15.0);
    painter.set("pen", ink, 1.0);
    painter.rect(0.0, 0.0, w * 0.12, w * 0.12, RectMode::Center);
    painter.pop();

    // Explicit stroke and a spray arc
    painter.set("rotring", ink, 1.0);
    painter.begin_stroke(PlotKind::Curved, w * 0.1, h * 0.95);
    painter.segment(10.0, w * 0.3, 0.6);
    painter.segment(-10.0, w * 0.3, 1.2);
    painter.end_stroke(0.0, 0.4);

    painter.set("spray", Color::hex("#3d8c40").unwrap_or(ink), 1.0);
    painter.arc(w * 0.72, h * 0.3, h * 0.22, 200.0, 340.0);
}
