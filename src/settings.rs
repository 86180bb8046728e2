//! Skill-check settings and preferences
//!
//! Read from LocalStorage on the web; natively the defaults are used unless
//! a JSON document is supplied.

use serde::{Deserialize, Serialize};

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Width of the target arc (degrees)
    pub fn area_size(&self) -> f64 {
        match self {
            Difficulty::Easy => 50.0,
            Difficulty::Medium => 40.0,
            Difficulty::Hard => 25.0,
        }
    }

    /// Sweep speed multiplier
    pub fn speed_multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 1.75,
        }
    }
}

/// Skill-check settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Preset used when no override is given
    pub difficulty: Difficulty,
    /// Custom target arc width (degrees), overrides the preset
    #[serde(default)]
    pub area_size: Option<f64>,
    /// Custom speed multiplier, overrides the preset
    #[serde(default)]
    pub speed_multiplier: Option<f64>,
    /// Keys a check may ask for
    #[serde(default = "default_input_keys")]
    pub input_keys: Vec<char>,
}

fn default_input_keys() -> Vec<char> {
    vec!['e']
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            area_size: None,
            speed_multiplier: None,
            input_keys: default_input_keys(),
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset
    pub fn from_preset(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Effective target arc width (override, else preset)
    pub fn area_size(&self) -> f64 {
        self.area_size.unwrap_or_else(|| self.difficulty.area_size())
    }

    /// Effective speed multiplier (override, else preset)
    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
            .unwrap_or_else(|| self.difficulty.speed_multiplier())
    }

    /// Keys to pick from; never empty
    pub fn input_keys(&self) -> Vec<char> {
        if self.input_keys.is_empty() {
            default_input_keys()
        } else {
            self.input_keys.iter().flat_map(|c| c.to_lowercase()).collect()
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "skill_check_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring corrupt settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
