// build.rs

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

const FALLBACK_LANG: &str = "en";
const LOCALES_DIR: &str = "locales";

fn main() {
    let lang = select_language();
    println!("cargo:rustc-env=MENUTREE_LANG_EFFECTIVE={}", lang);

    println!("cargo:rerun-if-env-changed=MENUTREE_LANG");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}/", LOCALES_DIR);

    // English is always loaded first so every key has a value.
    let mut messages = read_catalog(FALLBACK_LANG)
        .unwrap_or_else(|| panic!("Missing fallback catalog {}/{}.toml", LOCALES_DIR, FALLBACK_LANG));

    if lang != FALLBACK_LANG {
        match read_catalog(&lang) {
            Some(overrides) => messages.extend(overrides),
            None => println!(
                "cargo:warning=Catalog '{}/{}.toml' not found. Falling back to '{}'.",
                LOCALES_DIR, lang, FALLBACK_LANG
            ),
        }
    }

    let out_dir = env::var("OUT_DIR").expect("cargo always sets OUT_DIR for build scripts");
    let dest_path = Path::new(&out_dir).join("translations.rs");
    fs::write(&dest_path, render_macro(&messages)).expect("Failed to write translations.rs");
}

/// `lang_*` features win over the `MENUTREE_LANG` variable; English is the default.
fn select_language() -> String {
    let mut from_features: Vec<String> = env::vars()
        .filter_map(|(key, _)| {
            key.strip_prefix("CARGO_FEATURE_LANG_")
                .map(str::to_lowercase)
        })
        .collect();
    from_features.sort();

    if let Some(first) = from_features.first() {
        if from_features.len() > 1 {
            println!(
                "cargo:warning=Multiple language features enabled ({:?}). Using '{}'.",
                from_features, first
            );
        }
        return first.clone();
    }

    env::var("MENUTREE_LANG").unwrap_or_else(|_| FALLBACK_LANG.to_string())
}

fn read_catalog(lang: &str) -> Option<HashMap<String, String>> {
    let path = format!("{}/{}.toml", LOCALES_DIR, lang);
    let content = fs::read_to_string(&path).ok()?;
    let catalog = toml::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e));
    Some(catalog)
}

/// Emits the `t!` macro: one arm per key, plus a compile-time error for unknown keys.
fn render_macro(messages: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = messages.keys().collect();
    keys.sort();

    let mut code = String::from("/// Looks up a localized CLI message by key.\n#[macro_export]\nmacro_rules! t {\n");
    for key in keys {
        let value = &messages[key];
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        code.push_str(&format!("    (\"{}\") => {{ \"{}\" }};\n", key, escaped));
    }
    code.push_str(
        "    ($key:expr) => {{ compile_error!(concat!(\"Missing translation key: \", $key)) }};\n",
    );
    code.push('}');
    code
}
