// main.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use raylib::prelude::*;

use glade_runner::GameConfig;
use glade_runner::config::CorridorStyle;
use glade_runner::core::controller::{Outcome, PlayerController};
use glade_runner::core::entity::EntityKind;
use glade_runner::core::maze::load_level;
use glade_runner::core::player::MAX_HEALTH;
use glade_runner::core::world::WorldState;
use glade_runner::host::audio::AudioManager;
use glade_runner::host::input::process_events;
use glade_runner::host::upload_to_texture;
use glade_runner::render::{Framebuffer, RaycastRenderer};

#[derive(Debug, Parser)]
#[command(name = "glade-runner", about = "First-person maze runner")]
struct Args {
    /// TOML file overriding the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Hand-authored map instead of a generated maze
    #[arg(long)]
    map: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    size: Option<usize>,
    /// Three-cell-wide corridors
    #[arg(long)]
    wide: bool,
    /// Window pixels per framebuffer pixel
    #[arg(long, default_value_t = 2)]
    scale: i32,
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.maze.seed = seed;
    }
    if let Some(size) = args.size {
        config.maze.size = size;
    }
    if args.wide {
        config.maze.corridor = CorridorStyle::Wide;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// On a map, the key count comes from the map so the controller can declare victory.
fn new_world(config: &mut GameConfig, map: Option<&PathBuf>) -> Result<WorldState> {
    let world = match map {
        Some(path) => {
            let level = load_level(path).with_context(|| format!("loading map {}", path.display()))?;
            config.maze.total_keys = level.key_count();
            WorldState::from_level(level, config)
        }
        None => WorldState::generate(config).context("generating maze")?,
    };
    log::info!(
        "new run: {}x{} grid, {} keys, seed {}",
        world.grid.size(),
        world.grid.size(),
        world.count_live(EntityKind::Key),
        config.maze.seed
    );
    Ok(world)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let mut config = load_config(&args)?;

    let mut world = new_world(&mut config, args.map.as_ref())?;
    let mut controller = PlayerController::new(&config);
    let mut renderer = RaycastRenderer::new(config.render.clone());
    let mut framebuffer = Framebuffer::new(config.screen.width, config.screen.height);

    let scale = args.scale.max(1);
    let (mut window, raylib_thread) = raylib::init()
        .size(config.screen.width as i32 * scale, config.screen.height as i32 * scale)
        .title("Glade Runner")
        .build();
    window.set_target_fps(60);
    window.disable_cursor();

    let blank = Image::gen_image_color(config.screen.width as i32, config.screen.height as i32, Color::BLACK);
    let mut texture = window
        .load_texture_from_image(&raylib_thread, &blank)
        .map_err(|err| anyhow::anyhow!("could not create frame texture: {err:?}"))?;

    let mut audio = AudioManager::new();
    match audio.as_mut() {
        Some(audio) => audio.load_sfx_auto(),
        None => log::warn!("no audio output device, running silent"),
    }

    let mut animation_time = 0.0;
    let mut outcome: Option<Outcome> = None;

    while !window.window_should_close() {
        let dt = window.get_frame_time() as f64;
        animation_time += dt;
        let input = process_events(&mut window);

        match outcome {
            Some(_) => {
                if window.is_key_pressed(KeyboardKey::KEY_R) {
                    if args.map.is_none() {
                        config.maze.seed = config.maze.seed.wrapping_add(1);
                    }
                    world = new_world(&mut config, args.map.as_ref())?;
                    controller = PlayerController::new(&config);
                    outcome = None;
                }
            }
            None => {
                let before = world.player.position();
                outcome = controller.update(&mut world, &input, dt);
                if let Some(audio) = audio.as_mut() {
                    audio.footsteps(world.player.noise_level, world.player.position() != before);
                    audio.on_events(controller.events());
                }
            }
        }

        renderer.render(&world, &mut framebuffer, animation_time);
        upload_to_texture(&framebuffer, &mut texture);

        let fps_now = window.get_fps();
        let mut d = window.begin_drawing(&raylib_thread);
        d.clear_background(Color::BLACK);
        d.draw_texture_ex(&texture, Vector2::zero(), 0.0, scale as f32, Color::WHITE);

        // ---- HUD ----
        let player = &world.player;
        d.draw_text(
            &format!(
                "HP {:.0}/{:.0}   KEYS {}/{}   NOISE {:.2}   FPS {}",
                player.health,
                MAX_HEALTH,
                player.keys_found,
                controller.total_keys(),
                player.noise_level,
                fps_now
            ),
            10,
            10,
            20,
            Color::WHITE,
        );
        if let Some(text) = controller.message() {
            d.draw_text(text, 10, 40, 20, Color::YELLOW);
        }
        match outcome {
            Some(Outcome::Victory) => d.draw_text("YOU ESCAPED // R FOR A NEW MAZE", 10, 70, 30, Color::GREEN),
            Some(Outcome::Defeat) => d.draw_text("YOU DIED // R TO TRY AGAIN", 10, 70, 30, Color::RED),
            None => {}
        }
    }
    Ok(())
}
