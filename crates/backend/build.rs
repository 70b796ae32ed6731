use std::env;
use std::fs;
use std::path::Path;

/// Кладет config.toml и шаблон дашборда рядом с собранным бинарником
fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");
    println!("cargo:rerun-if-changed=templates");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let profile = env::var("PROFILE").expect("PROFILE is set by cargo");

    // OUT_DIR: target/<profile>/build/backend-xxx/out
    let target_dir = match Path::new(&out_dir).ancestors().find(|p| p.ends_with(&profile)) {
        Some(dir) => dir.to_path_buf(),
        None => {
            println!("cargo:warning=Could not find target profile directory, skipping copy");
            return;
        }
    };

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("Could not find workspace root");

    let source_config = workspace_root.join("config.toml");
    if source_config.exists() {
        fs::copy(&source_config, target_dir.join("config.toml"))
            .unwrap_or_else(|e| panic!("Failed to copy config.toml: {}", e));
    }

    let templates_dir = target_dir.join("templates");
    fs::create_dir_all(&templates_dir)
        .unwrap_or_else(|e| panic!("Failed to create {:?}: {}", templates_dir, e));
    let template = manifest_dir.join("templates").join("latest_orders.html");
    fs::copy(&template, templates_dir.join("latest_orders.html"))
        .unwrap_or_else(|e| panic!("Failed to copy dashboard template: {}", e));
}
