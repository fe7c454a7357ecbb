use std::{env, fs, path::{Path, PathBuf}};

use serde::Deserialize;

use crate::error::{GameError, Result};

pub const CONFIG_ENV_VAR: &str = "SNAKE_CONFIG";
const MAX_ARENA_HALF_EXTENT: f32 = 1000.0;

/// Gameplay and engine tunables. Every field falls back to its default when
/// missing from the TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub frame_interval_ms: u64,
    pub max_frame_dt: f32,
    pub move_speed: f32,
    pub arena_half_extent: f32,
    pub fruit_half_extent: f32,
    pub body_half_extent: f32,
    pub fruit_grid_min: i32,
    pub fruit_grid_max: i32,
    pub initial_length: usize,
    pub score_per_fruit: u32,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            frame_interval_ms: 16,
            max_frame_dt: 0.1,
            move_speed: 5.0,
            arena_half_extent: 10.0,
            fruit_half_extent: 0.75,
            body_half_extent: 0.5,
            fruit_grid_min: 1,
            fruit_grid_max: 9,
            initial_length: 3,
            score_per_fruit: 10,
            log_file: None,
        }
    }
}

impl Config {
    /// Loads the config from `path`, or from `$SNAKE_CONFIG` when no path is
    /// given. With neither, the defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
        };

        let config = match path {
            Some(p) => Self::from_toml(&fs::read_to_string(p)?)?,
            None => Config::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        let floats = [
            ("max_frame_dt", self.max_frame_dt),
            ("move_speed", self.move_speed),
            ("arena_half_extent", self.arena_half_extent),
            ("fruit_half_extent", self.fruit_half_extent),
            ("body_half_extent", self.body_half_extent),
        ];
        if let Some((name, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(GameError::InvalidConfig(format!("{} must be a finite number", name)));
        }

        if self.move_speed <= 0.0 {
            return Err(invalid("move_speed must be positive"));
        }
        if self.max_frame_dt <= 0.0 {
            return Err(invalid("max_frame_dt must be positive"));
        }
        // At most one cell step per frame, so no cell escapes the collision checks
        if self.move_speed * self.max_frame_dt > 1.0 {
            return Err(invalid("move_speed * max_frame_dt must not exceed 1"));
        }
        if self.arena_half_extent < 1.0 || self.arena_half_extent > MAX_ARENA_HALF_EXTENT {
            return Err(GameError::InvalidConfig(format!(
                "arena_half_extent must be between 1 and {}",
                MAX_ARENA_HALF_EXTENT
            )));
        }
        if self.fruit_grid_min > self.fruit_grid_max {
            return Err(invalid("fruit_grid_min is greater than fruit_grid_max"));
        }
        let extent = self.arena_half_extent as i32;
        if self.fruit_grid_min < -extent || self.fruit_grid_max > extent {
            return Err(invalid("fruit grid reaches outside the arena"));
        }
        if self.initial_length < 1 {
            return Err(invalid("initial_length must be at least 1"));
        }
        if self.initial_length as f32 > self.arena_half_extent {
            return Err(invalid("initial_length does not fit in the arena"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> GameError {
    GameError::InvalidConfig(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.score_per_fruit, 10);
        assert_eq!((config.fruit_grid_min, config.fruit_grid_max), (1, 9));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = Config::from_toml("move_speed = 8.5\nlog_file = \"snake.log\"").unwrap();
        assert_eq!(config.move_speed, 8.5);
        assert_eq!(config.log_file, Some(PathBuf::from("snake.log")));
        assert_eq!(config.arena_half_extent, 10.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            Config::from_toml("speed = 3.0"),
            Err(GameError::ConfigParse(_))
        ));
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut config = Config::default();
        config.move_speed = 0.0;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let mut config = Config::default();
        config.fruit_grid_max = 11;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.fruit_grid_min = 5;
        config.fruit_grid_max = 4;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.initial_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn runaway_speeds_are_rejected() {
        let config = Config::from_toml("move_speed = 1e30").unwrap();
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let config = Config::from_toml("move_speed = inf").unwrap();
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let config = Config::from_toml("move_speed = nan").unwrap();
        assert!(config.validate().is_err());

        // One cell per frame at the longest frame is still fine
        let config = Config { move_speed: 4.0, max_frame_dt: 0.25, ..Config::default() };
        assert!(config.validate().is_ok());
        let config = Config { move_speed: 4.5, max_frame_dt: 0.25, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_finite_extents_are_rejected() {
        let config = Config { fruit_half_extent: f32::NAN, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config { body_half_extent: f32::INFINITY, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config { max_frame_dt: f32::INFINITY, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn huge_arena_is_rejected() {
        let config = Config::from_toml("arena_half_extent = 40000.0").unwrap();
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let config = Config { arena_half_extent: 1000.0, ..Config::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_reads_file() {
        let path = env::temp_dir().join(format!("cube-snake-config-{}.toml", std::process::id()));
        fs::write(&path, "initial_length = 5\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.initial_length, 5);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let path = Path::new("/definitely/not/here/snake.toml");
        assert!(matches!(Config::load(Some(path)), Err(GameError::Io(_))));
    }
}
