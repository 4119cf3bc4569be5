//! Simple Rasterizer demo
//!
//! Spins a textured cube through the software pipeline and presents the
//! framebuffer in a macroquad window.
//!
//! Usage: `simple-rasterizer [config.ron]` (defaults to `rasterizer.ron`)
//! Keys: P saves a PNG screenshot, Escape quits.

use std::path::{Path, PathBuf};

use macroquad::prelude::{
    clear_background, draw_text, draw_texture_ex, get_frame_time, is_key_pressed, next_frame,
    screen_height, screen_width, vec2, Conf, DrawTextureParams, FilterMode, KeyCode, Texture2D,
};
use simple_rasterizer::rasterizer::{
    create_test_cube, render_mesh, Color, Framebuffer, Mat4, ScreenOrigin, Texture, Transforms,
    HEIGHT, WIDTH,
};
use simple_rasterizer::{load_config, RenderConfig, VERSION};

const DEFAULT_CONFIG: &str = "rasterizer.ron";

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Simple Rasterizer v{}", VERSION),
        window_width: WIDTH as i32 * 3,
        window_height: HEIGHT as i32 * 3,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Config from the given path, or defaults when it is missing or broken
fn read_config(path: &Path, explicit: bool) -> RenderConfig {
    if !explicit && !path.exists() {
        log::info!("No {} found, using defaults", path.display());
        return RenderConfig::default();
    }
    match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load {}: {}, using defaults", path.display(), e);
            RenderConfig::default()
        }
    }
}

fn read_texture(config: &RenderConfig) -> Texture {
    let fallback = || Texture::checkerboard(32, 32, Color::WHITE, Color::new(0.35, 0.35, 0.35, 1.0));
    match &config.texture {
        Some(path) => Texture::from_file(path).unwrap_or_else(|e| {
            log::warn!("Failed to load texture {}: {}, using checkerboard", path.display(), e);
            fallback()
        }),
        None => fallback(),
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let arg = std::env::args().nth(1);
    let explicit = arg.is_some();
    let config_path = arg.map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = read_config(&config_path, explicit);

    let texture = read_texture(&config);
    let cube = create_test_cube();
    let mut fb = Framebuffer::new(config.width, config.height);

    let aspect = config.width as f32 / config.height as f32;
    let proj = Mat4::perspective(std::f32::consts::FRAC_PI_3, aspect, 0.1, 100.0);
    let view = Mat4::translation(0.0, 0.0, -5.0);

    let mut angle = 0.0f32;
    let mut shots = 0u32;

    log::info!("=== Simple Rasterizer v{} ({}x{}) ===", VERSION, config.width, config.height);

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        angle += get_frame_time();
        let model = Mat4::rotation_y(angle) * Mat4::rotation_x(angle * 0.5);
        let transforms = Transforms::new(proj * view * model, Mat4::IDENTITY);

        fb.clear(config.clear_color);
        render_mesh(&mut fb, &cube, &transforms, &texture, &config.raster);

        if is_key_pressed(KeyCode::P) {
            shots += 1;
            let name = format!("screenshot_{:03}.png", shots);
            if let Err(e) = fb.save_png(&name) {
                log::warn!("Screenshot failed: {}", e);
            }
        }

        // Convert framebuffer to texture and draw it letterboxed
        let frame = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        frame.set_filter(FilterMode::Nearest);

        let scale = (screen_width() / fb.width as f32).min(screen_height() / fb.height as f32);
        let (draw_w, draw_h) = (fb.width as f32 * scale, fb.height as f32 * scale);

        clear_background(macroquad::color::BLACK);
        draw_texture_ex(
            &frame,
            (screen_width() - draw_w) * 0.5,
            (screen_height() - draw_h) * 0.5,
            macroquad::color::WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(draw_w, draw_h)),
                // Row 0 is the bottom edge unless the viewport was flipped
                flip_y: config.raster.origin == ScreenOrigin::BottomLeft,
                ..Default::default()
            },
        );

        draw_text("P: screenshot  Esc: quit", 8.0, 20.0, 20.0, macroquad::color::GRAY);

        next_frame().await
    }
}
