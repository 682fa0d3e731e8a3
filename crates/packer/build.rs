//! Кладёт `config.toml` из корня workspace рядом с бинарником `packer`,
//! где его ищет `load_config`. Сборка не падает: при любой проблеме
//! выводится предупреждение, а `packer` работает со встроенной конфигурацией.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.toml";
const SECTIONS: [&str; 3] = ["[server]", "[upload]", "[download]"];

fn main() {
    let source = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(CONFIG_FILE);
    println!("cargo:rerun-if-changed={}", source.display());
    println!("cargo:rerun-if-changed=build.rs");

    if let Err(reason) = copy_config(&source) {
        println!("cargo:warning={reason}; packer will use the embedded configuration");
    }
}

fn copy_config(source: &Path) -> Result<(), String> {
    let contents = fs::read_to_string(source)
        .map_err(|e| format!("{CONFIG_FILE} not read from {}: {e}", source.display()))?;

    let missing: Vec<&str> = SECTIONS
        .iter()
        .copied()
        .filter(|s| !contents.lines().any(|l| l.trim() == *s))
        .collect();
    if !missing.is_empty() {
        return Err(format!("{CONFIG_FILE} lacks sections {}", missing.join(", ")));
    }

    let dest = binary_dir()?.join(CONFIG_FILE);
    fs::write(&dest, contents).map_err(|e| format!("{CONFIG_FILE} not copied to {}: {e}", dest.display()))
}

/// `target/<profile>` из `OUT_DIR` вида `target/<profile>/build/packer-*/out`
fn binary_dir() -> Result<PathBuf, String> {
    let out_dir = env::var("OUT_DIR").map_err(|_| "OUT_DIR is not set".to_string())?;
    let profile = env::var("PROFILE").map_err(|_| "PROFILE is not set".to_string())?;
    Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
        .ok_or_else(|| format!("no {profile} directory above {out_dir}"))
}
