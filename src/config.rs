use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlocksConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub watcher: WatcherConfig,
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Seconds between pull-request refreshes
    #[serde(default = "default_pr_poll_secs")]
    pub pr_poll_secs: u64,
    /// Quiet period before a burst of filesystem events triggers a reload
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Below this many columns the panels stack vertically
    #[serde(default = "default_breakpoint")]
    pub breakpoint: u16,
    /// Width of the left column in percent (side-by-side layout)
    #[serde(default = "default_left_ratio")]
    pub left_ratio: u16,
}

/// [watcher] section configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatcherConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Glob patterns matched against directory names skipped by the tree walk
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitConfig {
    /// How many commits to request from `git log`
    #[serde(default = "default_recent_commits")]
    pub recent_commits: usize,
    /// Base branch candidates, in order of preference
    #[serde(default = "default_branches")]
    pub default_branches: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_true() -> bool {
    true
}

fn default_pr_poll_secs() -> u64 {
    60
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_breakpoint() -> u16 {
    80
}

fn default_left_ratio() -> u16 {
    30
}

fn default_exclude() -> Vec<String> {
    vec!["node_modules".into(), "vendor".into(), "__pycache__".into()]
}

fn default_recent_commits() -> usize {
    20
}

fn default_branches() -> Vec<String> {
    vec!["main".into(), "master".into(), "develop".into(), "dev".into()]
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            pr_poll_secs: default_pr_poll_secs(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            breakpoint: default_breakpoint(),
            left_ratio: default_left_ratio(),
        }
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            exclude: default_exclude(),
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            recent_commits: default_recent_commits(),
            default_branches: default_branches(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl TimingConfig {
    pub fn pr_poll_interval(&self) -> Duration {
        Duration::from_secs(self.pr_poll_secs.max(1))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl EditorConfig {
    /// Configured command, then `$EDITOR`, then vim
    pub fn resolve(&self) -> String {
        self.command
            .clone()
            .filter(|c| !c.trim().is_empty())
            .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| "vim".to_string())
    }
}

/// Load config by merging global defaults with per-repo overrides.
/// Priority: per-repo `.blocks.toml` > global `~/.config/blocks/config.toml` > built-in defaults.
/// Merging is deep: individual fields within sections (e.g. `[timing]`) override independently.
/// Files that cannot be parsed are skipped; each one adds a line to the
/// returned problem list so the caller can log it once logging is up.
pub fn load_config(repo_root: &str) -> (BlocksConfig, Vec<String>) {
    let local_path = Path::new(repo_root).join(".blocks.toml");
    let global_path = dirs::config_dir().map(|d| d.join("blocks").join("config.toml"));

    let mut problems = Vec::new();
    let global_table = global_path.and_then(|p| read_table(&p, &mut problems));
    let local_table = read_table(&local_path, &mut problems);

    let config = merge_layers(global_table, local_table).unwrap_or_else(|e| {
        problems.push(format!("ignoring config with invalid values: {}", e));
        BlocksConfig::default()
    });
    (config, problems)
}

fn read_table(path: &Path, problems: &mut Vec<String>) -> Option<toml::Table> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<toml::Table>(&content) {
        Ok(table) => Some(table),
        Err(e) => {
            problems.push(format!("ignoring unparsable {}: {}", path.display(), e));
            None
        }
    }
}

fn merge_layers(
    global: Option<toml::Table>,
    local: Option<toml::Table>,
) -> Result<BlocksConfig, toml::de::Error> {
    let merged = match (global, local) {
        (Some(mut global), Some(local)) => {
            deep_merge(&mut global, local);
            global
        }
        (Some(global), None) => global,
        (None, Some(local)) => local,
        (None, None) => return Ok(BlocksConfig::default()),
    };

    toml::Value::Table(merged).try_into()
}

/// Recursively merge `overlay` into `base`. Overlay values win; nested tables are merged recursively.
fn deep_merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), &value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table.clone());
            }
            _ => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(s: &str) -> toml::Table {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn defaults_match_documented_values() {
        let c = BlocksConfig::default();
        assert_eq!(c.timing.pr_poll_secs, 60);
        assert_eq!(c.timing.debounce_ms, 500);
        assert_eq!(c.layout.breakpoint, 80);
        assert_eq!(c.layout.left_ratio, 30);
        assert!(c.watcher.enabled);
        assert_eq!(c.watcher.exclude, vec!["node_modules", "vendor", "__pycache__"]);
        assert_eq!(c.git.recent_commits, 20);
        assert_eq!(c.log.level, "info");
    }

    #[test]
    fn no_layers_gives_defaults() {
        assert_eq!(merge_layers(None, None).unwrap(), BlocksConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let c = merge_layers(None, Some(table("[timing]\ndebounce_ms = 100\n"))).unwrap();
        assert_eq!(c.timing.debounce_ms, 100);
        assert_eq!(c.timing.pr_poll_secs, 60);
    }

    #[test]
    fn local_overrides_global_field_by_field() {
        let global = table("[layout]\nbreakpoint = 120\nleft_ratio = 40\n");
        let local = table("[layout]\nbreakpoint = 100\n");
        let c = merge_layers(Some(global), Some(local)).unwrap();
        assert_eq!(c.layout.breakpoint, 100);
        assert_eq!(c.layout.left_ratio, 40);
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(merge_layers(None, Some(table("[timing]\ndebounce_ms = \"soon\"\n"))).is_err());
    }

    #[test]
    fn bad_local_file_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".blocks.toml"), "[timing\n").unwrap();
        let (_, problems) = load_config(dir.path().to_str().unwrap());
        assert!(problems.iter().any(|p| p.contains(".blocks.toml")));
    }

    #[test]
    fn local_file_is_read_from_repo_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".blocks.toml"),
            "[watcher]\nexclude = [\"target\"]\n",
        )
        .unwrap();
        let (c, _) = load_config(dir.path().to_str().unwrap());
        assert_eq!(c.watcher.exclude, vec!["target"]);
    }

    #[test]
    fn poll_interval_never_zero() {
        let t = TimingConfig {
            pr_poll_secs: 0,
            debounce_ms: 10,
        };
        assert_eq!(t.pr_poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn editor_prefers_configured_command() {
        let e = EditorConfig {
            command: Some("hx".to_string()),
        };
        assert_eq!(e.resolve(), "hx");
    }
}
