use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_encore_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", "/tmp/encore-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/encore-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_repeat_mode_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
archives_dir = "/srv/archive"
backfill_durations = false

[playback]
shuffle = true
repeat_mode = "repeat-one"
autoplay = true

[audio]
progress_tick_ms = 250
quit_fade_out_ms = 123
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ENCORE__AUDIO__PROGRESS_TICK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.catalog.archives_dir, "/srv/archive");
    assert!(!s.catalog.backfill_durations);
    assert!(s.playback.shuffle);
    assert!(matches!(s.playback.repeat_mode, RepeatModeSetting::One));
    assert!(s.playback.autoplay);
    assert_eq!(s.audio.progress_tick_ms, 250);
    assert_eq!(s.audio.quit_fade_out_ms, 123);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
quit_fade_out_ms = 500
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ENCORE__AUDIO__QUIT_FADE_OUT_MS", "0");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.quit_fade_out_ms, 0);
}

#[test]
fn validate_rejects_a_zero_progress_tick() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.audio.progress_tick_ms = 0;
    assert!(s.validate().is_err());
}

#[test]
fn validate_rejects_an_empty_archives_dir() {
    let mut s = Settings::default();
    s.catalog.archives_dir = "  ".to_string();
    assert!(s.validate().is_err());
}
