use anyhow::{Context, Result, bail};
use log::{debug, warn};
use once_cell::sync::Lazy;
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::default()));

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(skip)]
    pub is_first_run: bool,

    #[serde(default)]
    pub filter: Filter,

    #[serde(default)]
    pub pipeline: Pipeline,

    #[serde(default)]
    pub export: Export,
}

/// Starting filter and slider positions, all in `[0, 1]`.
#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Filter {
    #[derivative(Default(value = "\"sepia-tone\".to_string()"))]
    pub default: String,

    #[derivative(Default(value = "0.5"))]
    pub intensity: f32,

    #[derivative(Default(value = "0.5"))]
    pub radius: f32,

    #[derivative(Default(value = "0.5"))]
    pub scale: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Pipeline {
    pub render_on_scale_change: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Export {
    #[derivative(Default(value = "PathBuf::from(\".\")"))]
    pub output_dir: PathBuf,

    #[derivative(Default(value = "\"png\".to_string()"))]
    pub format: String,
}

impl Config {
    /// Resolves the platform config file and loads it.
    pub fn init(&mut self) -> Result<()> {
        let app_dirs = AppDirs::new(Some(env!("CARGO_PKG_NAME")), true)
            .context("no config directory on this platform")?;

        let path = app_dirs
            .config_dir
            .join(format!("{}.toml", env!("CARGO_PKG_NAME")));
        self.init_at(path)
    }

    /// Loads the config file at `path`, creating it with defaults when missing.
    pub fn init_at(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        self.config_path = path.into();

        if let Some(dir) = self.config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("create config dir {} failed", dir.display()))?;
        }

        self.load().with_context(|| "load config file failed")?;
        debug!("{:?}", self);
        Ok(())
    }

    fn load(&mut self) -> Result<()> {
        match fs::read_to_string(&self.config_path) {
            Ok(text) => match toml::from_str::<Config>(&text) {
                Ok(mut c) => {
                    c.config_path = self.config_path.clone();
                    c.is_first_run = self.is_first_run;
                    *self = c;
                    Ok(())
                }
                Err(e) => {
                    warn!("parse {} failed: {e}", self.config_path.display());
                    self.is_first_run = true;
                    _ = fs::copy(&self.config_path, backup_path(&self.config_path));
                    self.save()
                }
            },
            Err(_) => {
                self.is_first_run = true;
                self.save()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        match toml::to_string_pretty(self) {
            Ok(text) => Ok(fs::write(&self.config_path, text)
                .with_context(|| "save config failed".to_string())?),
            Err(e) => bail!(format!("convert config to toml format failed. {e:?}")),
        }
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

fn lock() -> MutexGuard<'static, Config> {
    CONFIG.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Loads the global configuration, from `path` when given.
///
/// This should be called once at application startup.
pub fn init(path: Option<PathBuf>) -> Result<()> {
    let mut config = lock();
    match path {
        Some(path) => config.init_at(path),
        None => config.init(),
    }
}

pub fn all() -> Config {
    lock().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("instafilter.toml");

        let mut config = Config::default();
        config.init_at(&path)?;

        assert!(config.is_first_run);
        assert!(path.exists());
        assert_eq!(config.filter.default, "sepia-tone");
        assert_eq!(config.filter.intensity, 0.5);
        assert!(!config.pipeline.render_on_scale_change);
        assert_eq!(config.export.format, "png");
        Ok(())
    }

    #[test]
    fn test_saved_values_reload() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("instafilter.toml");

        let mut config = Config::default();
        config.init_at(&path)?;
        config.filter.default = "gaussian-blur".to_string();
        config.filter.radius = 0.1;
        config.pipeline.render_on_scale_change = true;
        config.save()?;

        let mut reloaded = Config::default();
        reloaded.init_at(&path)?;
        assert!(!reloaded.is_first_run);
        assert_eq!(reloaded.filter.default, "gaussian-blur");
        assert_eq!(reloaded.filter.radius, 0.1);
        assert!(reloaded.pipeline.render_on_scale_change);
        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("instafilter.toml");
        fs::write(&path, "[filter]\nintensity = 0.9\n")?;

        let mut config = Config::default();
        config.init_at(&path)?;
        assert_eq!(config.filter.intensity, 0.9);
        assert_eq!(config.filter.scale, 0.5);
        assert_eq!(config.filter.default, "sepia-tone");
        assert_eq!(config.export.output_dir, PathBuf::from("."));
        Ok(())
    }

    #[test]
    fn test_unparsable_file_is_backed_up() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("instafilter.toml");
        fs::write(&path, "this is = = not toml")?;

        let mut config = Config::default();
        config.init_at(&path)?;

        assert!(config.is_first_run);
        let backup = dir.path().join("instafilter.toml.bak");
        assert_eq!(fs::read_to_string(backup)?, "this is = = not toml");
        assert!(toml::from_str::<Config>(&fs::read_to_string(&path)?).is_ok());
        Ok(())
    }
}
