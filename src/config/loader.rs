use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::types::AppConfig;

const LOCAL_FILE_NAME: &str = ".qa-board.toml";
const ENV_VAR: &str = "QA_BOARD_CONFIG";
const APP_DIR: &str = "qa-board";

/// Discover and load the app config.
///
/// Priority:
/// 1. `--config` flag (explicit path)
/// 2. `.qa-board.toml` between the current directory and the Git root
/// 3. `$QA_BOARD_CONFIG`
/// 4. `$XDG_CONFIG_HOME/qa-board/config.toml`
/// 5. `~/.config/qa-board/config.toml`
///
/// When both a repo-local and a global file exist, the local one is layered
/// on top (see [`merge_configs`]).
pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit_path {
        return read_config(path);
    }

    let cwd = std::env::current_dir().context("resolving current directory")?;
    let local = find_repo_local_config(&cwd);
    let global = find_global_config();

    let config = match (global, local) {
        (Some(global), Some(local)) => {
            tracing::debug!(
                global = %global.display(),
                local = %local.display(),
                "merging configs"
            );
            merge_configs(read_config(&global)?, read_config(&local)?)
        }
        (Some(path), None) | (None, Some(path)) => {
            tracing::debug!(path = %path.display(), "loading config");
            read_config(&path)?
        }
        (None, None) => AppConfig::default(),
    };
    Ok(config)
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("parsing TOML from {}", path.display()))
}

/// Layer a repo-local config over a global one.
///
/// Sections come wholesale from the local file; the permission table is
/// replaced only when the local file defines one, and the data fixture falls
/// back to the global path when the local file has none. Failure injection
/// stays on when either file enables it.
pub fn merge_configs(global: AppConfig, local: AppConfig) -> AppConfig {
    AppConfig {
        defaults: local.defaults,
        data: crate::config::types::DataConfig {
            fixture: local.data.fixture.or(global.data.fixture),
            fail_commands: local.data.fail_commands || global.data.fail_commands,
        },
        theme: local.theme,
        keybindings: local.keybindings,
        evaluation: local.evaluation,
        export: local.export,
        permissions: if local.permissions.is_empty() {
            global.permissions
        } else {
            local.permissions
        },
        account: local.account,
    }
}

/// Walk up from `start` looking for `.qa-board.toml`, stopping at the Git root.
pub fn find_repo_local_config(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(LOCAL_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".git").exists() || !dir.pop() {
            return None;
        }
    }
}

fn find_global_config() -> Option<PathBuf> {
    let from_env = std::env::var_os(ENV_VAR).map(PathBuf::from);
    let from_xdg = std::env::var_os("XDG_CONFIG_HOME")
        .map(|xdg| PathBuf::from(xdg).join(APP_DIR).join("config.toml"));
    let from_home = std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".config").join(APP_DIR).join("config.toml"));

    [from_env, from_xdg, from_home]
        .into_iter()
        .flatten()
        .find(|p| p.is_file())
}
