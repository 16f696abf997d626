/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Everything configurable is carried in an explicit `GameConfig` handed
/// to the pieces that need it; there is no process-wide state.

use std::path::PathBuf;

use serde::Deserialize;

// ── Public config structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub limits: Limits,
    /// On-disk level file to play; None means the bundled levels.
    pub level_file: Option<PathBuf>,
    pub scores_file: PathBuf,
}

/// Level-file limits enforced by the parser.
#[derive(Clone, Debug)]
pub struct Limits {
    pub max_level_name_len: usize,
    pub max_levels_per_file: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_level_name_len: default_name_len(),
            max_levels_per_file: default_levels_per_file(),
        }
    }
}

// ── TOML schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    limits: TomlLimits,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlLimits {
    #[serde(default = "default_name_len")]
    max_level_name_len: usize,
    #[serde(default = "default_levels_per_file")]
    max_levels_per_file: usize,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    level_file: Option<String>,
    #[serde(default = "default_scores_file")]
    scores_file: String,
}

fn default_name_len() -> usize {
    50
}
fn default_levels_per_file() -> usize {
    25
}
fn default_scores_file() -> String {
    "scores.toml".into()
}

impl Default for TomlLimits {
    fn default() -> Self {
        TomlLimits {
            max_level_name_len: default_name_len(),
            max_levels_per_file: default_levels_per_file(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            level_file: None,
            scores_file: default_scores_file(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig {
            limits: Limits {
                max_level_name_len: toml_cfg.limits.max_level_name_len,
                max_levels_per_file: toml_cfg.limits.max_levels_per_file,
            },
            level_file: toml_cfg.general.level_file.map(PathBuf::from),
            scores_file: PathBuf::from(toml_cfg.general.scores_file),
        }
    }
}

/// Candidate directories to search: exe dir, then CWD.
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        log::warn!("config.toml parse error: {e}; using defaults");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    log::warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
