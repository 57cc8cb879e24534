use serde::Deserialize;
use std::fs;
use std::path::Path;
use volt_core::input::FrameInput;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayScript {
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(flatten)]
    pub input: FrameInput,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplayScript {
    /// One input per fixed step. Edges fire on the first step of a repeated
    /// frame only.
    pub fn expanded_inputs(&self) -> Vec<FrameInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for i in 0..frame.repeat.max(1) {
                out.push(if i == 0 {
                    frame.input
                } else {
                    frame.input.without_edges()
                });
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplayScript, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplayScript = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(replay)
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::{Game, GameFlow};
    use crate::registry::LevelRegistry;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    const STEP: Duration = Duration::from_nanos(16_666_667);

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "volt_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn bundled_game() -> Game {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..");
        let paths: Vec<PathBuf> = GameConfig::default()
            .levels
            .iter()
            .map(|path| root.join(path))
            .collect();
        let registry = LevelRegistry::load_from_paths(&paths).expect("bundled levels");
        Game::new(registry, GameConfig::default()).expect("game")
    }

    fn run(game: &mut Game, inputs: &[FrameInput]) {
        for (i, input) in inputs.iter().enumerate() {
            let flow = game.step(input, STEP * i as u32);
            assert_eq!(flow, GameFlow::Continue);
        }
    }

    fn load(name_hint: &str, body: &str) -> ReplayScript {
        let path = temp_file_path(name_hint);
        fs::write(&path, body).expect("write replay file");
        let replay = load_replay_from_path(&path).expect("replay should load");
        let _ = fs::remove_file(path);
        replay
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let replay = load(
            "parse",
            r#"{
              "frames": [
                { "move_right": true, "repeat": 3 },
                { "jump_pressed": true, "jump_held": true, "repeat": 2 }
              ]
            }"#,
        );
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 5);
        assert!(expanded[2].move_right);
        assert!(expanded[3].jump_pressed);
        assert!(!expanded[4].jump_pressed);
        assert!(expanded[4].jump_held);
    }

    #[test]
    fn empty_replay_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        assert!(load_replay_from_path(&path).is_err());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = load(
            "deterministic",
            r#"{
              "frames": [
                { "move_right": true, "repeat": 40 },
                { "move_right": true, "jump_pressed": true, "jump_held": true, "repeat": 20 },
                { "repeat": 30 },
                { "move_left": true, "repeat": 25 }
              ]
            }"#,
        );
        let inputs = replay.expanded_inputs();

        let mut run_a = bundled_game();
        let mut run_b = bundled_game();
        run(&mut run_a, &inputs);
        run(&mut run_b, &inputs);

        let a = &run_a.level().player;
        let b = &run_b.level().player;
        assert_eq!(a.rect, b.rect);
        assert_eq!(a.velocity, b.velocity);
        assert_eq!(a.jumping, b.jumping);
    }

    #[test]
    fn holding_right_runs_into_the_east_wall() {
        let replay = load("east", r#"{ "frames": [{ "move_right": true, "repeat": 150 }] }"#);
        let mut game = bundled_game();
        run(&mut game, &replay.expanded_inputs());

        let player = &game.level().player;
        assert_eq!(player.rect.right(), 24.0 * 32.0);
        assert_eq!(player.rect.bottom(), 19.0 * 32.0);
        assert!(!player.jumping);
    }

    #[test]
    fn bolt_on_generator_opens_both_doors() {
        let replay = load(
            "doors",
            r#"{
              "frames": [
                { "attack_pressed": true, "cursor_x": 624.0 },
                { "repeat": 60 }
              ]
            }"#,
        );
        let mut game = bundled_game();

        // Walk out of level_1 through its exit.
        game.level_mut().player.rect.x = 18.0 * 32.0;
        game.level_mut().player.rect.y = 4.0 * 32.0;
        game.step(&FrameInput::default(), Duration::ZERO);
        let enter = FrameInput {
            enter_pressed: true,
            ..FrameInput::default()
        };
        assert_eq!(game.step(&enter, Duration::ZERO), GameFlow::Continue);
        assert_eq!(game.level().id, "level_2");

        run(&mut game, &replay.expanded_inputs());
        let level = game.level();
        assert!(level.entities.generators().all(|g| g.is_powered()));
        let door_ys: Vec<f32> = level.entities.doors().map(|door| door.rect.y).collect();
        assert_eq!(door_ys, vec![0.0, 0.0]);
    }
}
