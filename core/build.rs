use std::env;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MessagesFile {
    sending: String,
    success: String,
    failure: String,
    connection_error: String,
}

fn main() {
    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("missing CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir.parent().unwrap_or(&manifest_dir);
    let env_path = workspace_root.join(".env");
    let env_local_path = workspace_root.join(".env.local");

    let _ = dotenvy::from_filename(&env_local_path);
    let _ = dotenvy::from_filename(&env_path);

    println!("cargo:rerun-if-env-changed=SITE_MESSAGES_PATH");
    println!("cargo:rerun-if-changed={}", env_path.display());
    println!("cargo:rerun-if-changed={}", env_local_path.display());

    let messages_path = resolve_messages_path(workspace_root);
    println!("cargo:rerun-if-changed={}", messages_path.display());

    let contents = fs::read_to_string(&messages_path).unwrap_or_else(|err| {
        panic!(
            "failed to read status messages at {}: {err}",
            messages_path.display()
        )
    });

    let messages: MessagesFile = toml::from_str(&contents).unwrap_or_else(|err| {
        panic!(
            "failed to parse status messages at {}: {err}",
            messages_path.display()
        )
    });

    let entries = [
        ("SENDING_MESSAGE", "sending", messages.sending.as_str()),
        ("SUCCESS_MESSAGE", "success", messages.success.as_str()),
        ("FAILURE_MESSAGE", "failure", messages.failure.as_str()),
        (
            "CONNECTION_ERROR_MESSAGE",
            "connection_error",
            messages.connection_error.as_str(),
        ),
    ];

    let mut output = String::new();
    for (const_name, key, value) in entries {
        if value.trim().is_empty() {
            panic!(
                "status message '{key}' cannot be empty in {}",
                messages_path.display()
            );
        }
        writeln!(
            &mut output,
            "pub const {const_name}: &str = {};",
            rust_string(value.trim())
        )
        .unwrap();
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("missing OUT_DIR"));
    let out_path = out_dir.join("status_messages.rs");
    fs::write(&out_path, output).unwrap_or_else(|err| {
        panic!("failed to write {}: {err}", out_path.display())
    });
}

fn resolve_messages_path(workspace_root: &Path) -> PathBuf {
    let env_value = env::var("SITE_MESSAGES_PATH").ok();
    let raw_path = match env_value {
        Some(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => workspace_root.join("site/messages.toml"),
    };
    if raw_path.is_relative() {
        workspace_root.join(raw_path)
    } else {
        raw_path
    }
}

fn rust_string(value: &str) -> String {
    format!("{:?}", value)
}
