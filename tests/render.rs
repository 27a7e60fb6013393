use glade_runner::GameConfig;
use glade_runner::core::maze::parse_level;
use glade_runner::core::world::WorldState;
use glade_runner::render::casters::{camera_ray, cast_ray};
use glade_runner::render::{Color, Framebuffer, RaycastRenderer};

const W: u32 = 640;
const H: u32 = 480;

fn world(map: &str) -> WorldState {
    WorldState::from_level(parse_level(map).unwrap(), &GameConfig::default())
}

fn frame(world: &WorldState, t: f64) -> (Vec<Color>, Vec<f64>) {
    let mut renderer = RaycastRenderer::new(GameConfig::default().render);
    let mut fb = Framebuffer::new(W, H);
    renderer.render(world, &mut fb, t);
    (fb.color_buffer, renderer.depth_buffer().to_vec())
}

const CORRIDOR: &str = "\
#####
#####
#L  #
#####
#####
";

#[test]
fn facing_wall_has_the_same_depth_in_every_central_column() {
    let mut w = world(CORRIDOR);
    w.player.x = 1.0;
    assert_eq!(w.player.y, 2.5);

    let (_, depth) = frame(&w, 0.0);
    for column in [300, 320, 340] {
        assert!((depth[column] - 3.0).abs() < 1e-9, "column {column}: {}", depth[column]);
    }

    for column in [300, 340] {
        let (rx, ry) = camera_ray(&w.player, column, W);
        let hit = cast_ray(&w.grid, w.player.x, w.player.y, rx, ry, 150).unwrap();
        assert_eq!((hit.map_x, hit.map_y, hit.side), (4, 2, 0));
        assert!((hit.perp_distance - 3.0).abs() < 1e-9);
    }
}

#[test]
fn every_pixel_is_written() {
    let w = world(CORRIDOR);
    let sentinel = Color::rgb(255, 0, 255);
    let mut fb = Framebuffer::new(W, H);
    fb.clear(sentinel);
    RaycastRenderer::new(GameConfig::default().render).render(&w, &mut fb, 1.25);
    assert!(fb.color_buffer.iter().all(|&c| c != sentinel));
}

#[test]
fn same_world_same_time_same_frame() {
    let mut config = GameConfig::default();
    config.maze.size = 31;
    config.maze.seed = 77;
    let mut w = WorldState::generate(&config).unwrap();
    w.player.rotate(0.7);
    w.player.pitch = 35.0;
    assert_eq!(frame(&w, 2.5), frame(&w, 2.5));
}

#[test]
fn sprite_in_the_open_is_drawn() {
    let with_key = world("#######\n#L K  #\n#######\n");
    let mut without_key = with_key.clone();
    without_key.entities.clear();
    assert_ne!(frame(&with_key, 0.0).0, frame(&without_key, 0.0).0);
}

#[test]
fn sprite_behind_a_wall_is_hidden() {
    let with_key = world("#######\n#L #K #\n#######\n");
    let mut without_key = with_key.clone();
    without_key.entities.clear();
    assert_eq!(frame(&with_key, 0.0).0, frame(&without_key, 0.0).0);
}

#[test]
fn sprite_behind_the_camera_is_culled() {
    let with_key = world("#######\n#K L  #\n#######\n");
    let mut without_key = with_key.clone();
    without_key.entities.clear();
    assert_eq!(frame(&with_key, 0.0).0, frame(&without_key, 0.0).0);
}

#[test]
fn picked_up_keys_disappear() {
    let with_key = world("#######\n#L K  #\n#######\n");
    let mut picked = with_key.clone();
    picked.entities[0].remove();
    let mut empty = with_key.clone();
    empty.entities.clear();
    assert_eq!(frame(&picked, 0.0).0, frame(&empty, 0.0).0);
}
