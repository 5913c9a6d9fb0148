//! gamix settings handling
//!
//! ## Application settings
//!
//! - Slider layout (pan or dual sliders)
//! - Toggle style (toggle buttons or check buttons)
//! - Window geometry, saved when the window closes
//!
//! ## Sound card storage
//!
//! - A display name for each card's tab
//! - Which controls are hidden on a card
//!
//! Cards and controls are keyed by their [config name](crate::mixer::config_name).
//!
//! ## Usage
//!
//! First initialise the settings tree by calling
//! `Settings::init(...)`, giving it a path under which the
//! configurations are stored.  Afterwards you can access settings via
//! [`Settings::r()`](Settings::r()) and
//! [`Settings::w()`](Settings::w()).
//!
//! After applying changes to the settings, don't forget to call
//! [`sync()`](Settings::sync)!

mod app;
pub use app::{AppSettings, SliderStyle, ToggleStyle, WindowGeometry};

mod cards;
pub use cards::{CardPrefs, CardSettings};

use crate::error::SettingsError;
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use std::{
    fs::{self, File, OpenOptions},
    io::{Read, Write},
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::{debug, warn};

/// Create the configuration directory and return its path
pub fn scaffold() -> Result<PathBuf, SettingsError> {
    let dir = ProjectDirs::from("org", "gamix", "gamix").ok_or(SettingsError::NoHome)?;
    let path = dir.config_dir().to_path_buf();
    fs::create_dir_all(&path)?;
    Ok(path)
}

/// Main settings tree
#[derive(Default, Debug)]
pub struct Settings {
    base: PathBuf,
    app: RwLock<AppSettings>,
    cards: RwLock<CardSettings>,
}

impl Settings {
    /// Create a new settings tree from a config path
    pub fn init<'p>(path: impl Into<&'p Path>) -> Result<Arc<Settings>, SettingsError> {
        let base = path.into().to_path_buf();
        debug!("Loading settings from {}", base.display());

        let this = Arc::new(Self {
            app: RwLock::new(load_path(base.join("app.json"))),
            cards: RwLock::new(load_path(base.join("cards.json"))),
            base,
        });
        this.sync()?;
        Ok(this)
    }

    /// Sync any changes back to disk
    pub fn sync(self: &Arc<Self>) -> Result<(), SettingsError> {
        vec![
            ("app.json", serde_json::to_string_pretty(&self.app)?),
            ("cards.json", serde_json::to_string_pretty(&self.cards)?),
        ]
        .into_iter()
        .map(|(path, json)| {
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(self.base.join(path))
                .and_then(|mut f| f.write_all(json.as_bytes()))
                .map_err(Into::into)
        })
        .collect::<Result<Vec<_>, SettingsError>>()
        .map(|_| ())
    }

    /// Get read access to any stored setting
    pub fn r<'this>(self: &'this Arc<Self>) -> ReadSettings<'this> {
        ReadSettings { inner: self }
    }

    /// Wait to get exclusive write access to any settings
    pub fn w<'this>(self: &'this Arc<Self>) -> WriteSettings<'this> {
        WriteSettings { inner: self }
    }
}

fn load_path<T: Default + DeserializeOwned>(path: PathBuf) -> T {
    File::open(&path)
        .and_then(|mut f| {
            let mut c = String::new();
            f.read_to_string(&mut c).map(|_| c)
        })
        .and_then(|s| serde_json::from_str(&s).map_err(Into::into))
        .unwrap_or_else(|e| {
            if path.exists() {
                warn!("Ignoring unreadable {}: {}", path.display(), e);
            }
            T::default()
        })
}

pub struct ReadSettings<'settings> {
    inner: &'settings Arc<Settings>,
}

impl<'s> ReadSettings<'s> {
    /// Get read access to the `app` settings
    pub fn app(self) -> RwLockReadGuard<'s, AppSettings> {
        self.inner.app.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get read access to the `cards` settings
    pub fn cards(self) -> RwLockReadGuard<'s, CardSettings> {
        self.inner.cards.read().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct WriteSettings<'settings> {
    inner: &'settings Arc<Settings>,
}

impl<'s> WriteSettings<'s> {
    /// Get write access to the `app` settings
    pub fn app(self) -> RwLockWriteGuard<'s, AppSettings> {
        self.inner.app.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get write access to the `cards` settings
    pub fn cards(self) -> RwLockWriteGuard<'s, CardSettings> {
        self.inner.cards.write().unwrap_or_else(PoisonError::into_inner)
    }
}
