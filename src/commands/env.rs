//! The `env` command: bootstrap the project config file and rotate the
//! session keys stored in it.
//!
//! The config file doubles as the application's runtime configuration, so
//! key rotation edits the JSON tree in place (`auth_key`, `encrypt_key`,
//! `csrf_key`) and leaves every other field untouched.

use crate::context::{self, ProjectContext};
use crate::error::{Result, SproutError};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use serde_json::Value;
use std::path::Path;

/// Config file created in the current directory by `env make`.
pub const CONFIG_FILE: &str = "sprout.json";

/// Example file `env make` starts from.
pub const EXAMPLE_FILE: &str = "sprout.json.example";

/// Byte length of the authentication key.
const AUTH_KEY_LEN: usize = 64;

/// Byte length of the encryption and CSRF keys.
const SHORT_KEY_LEN: usize = 32;

pub fn cmd_make() -> Result<()> {
    crate::fs::copy_new(EXAMPLE_FILE, CONFIG_FILE)?;
    update_file_keys(Path::new(CONFIG_FILE))?;

    let path = std::env::current_dir()
        .map_err(|e| SproutError::Io(format!("failed to get current directory: {}", e)))?
        .join(CONFIG_FILE);

    println!("File, {}, created successfully with new session keys.", CONFIG_FILE);
    println!("Set your environment variable, {}, to:", context::CONFIG_ENV);
    println!("{}", path.display());
    Ok(())
}

pub fn cmd_keyshow() -> Result<()> {
    println!("Paste these into your {} file:", CONFIG_FILE);
    println!(r#"    "auth_key": "{}","#, encoded_key(AUTH_KEY_LEN));
    println!(r#"    "encrypt_key": "{}","#, encoded_key(SHORT_KEY_LEN));
    println!(r#"    "csrf_key": "{}","#, encoded_key(SHORT_KEY_LEN));
    Ok(())
}

pub fn cmd_keyupdate() -> Result<()> {
    let ctx = ProjectContext::resolve()?;
    update_file_keys(&ctx.config_path)?;

    println!("Session keys updated in {}.", ctx.config_path.display());
    Ok(())
}

/// Returns a base64 encoded random key of `len` bytes.
fn encoded_key(len: usize) -> String {
    let mut buf = vec![0u8; len];
    rand::rng().fill_bytes(&mut buf);
    STANDARD.encode(buf)
}

/// Rewrite the session key fields of a config file with fresh keys.
fn update_file_keys(path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SproutError::NotFound(path.to_path_buf()),
        _ => SproutError::Io(format!("failed to read '{}': {}", path.display(), e)),
    })?;

    let mut value: Value = serde_json::from_str(&raw).map_err(|e| SproutError::MalformedDocument {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let Some(table) = value.as_object_mut() else {
        return Err(SproutError::MalformedDocument {
            path: path.to_path_buf(),
            detail: "expected an object at the top level".to_string(),
        });
    };

    table.insert("auth_key".to_string(), Value::String(encoded_key(AUTH_KEY_LEN)));
    table.insert(
        "encrypt_key".to_string(),
        Value::String(encoded_key(SHORT_KEY_LEN)),
    );
    table.insert(
        "csrf_key".to_string(),
        Value::String(encoded_key(SHORT_KEY_LEN)),
    );

    let pretty = serde_json::to_string_pretty(&value)
        .map_err(|e| SproutError::Io(format!("failed to serialize config: {}", e)))?;

    crate::fs::atomic_overwrite(path, format!("{}\n", pretty).as_bytes())
}
