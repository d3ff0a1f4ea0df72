use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const GRID_COLUMNS: u32 = 16;
const GRID_ROWS: u32 = 32;
const RECYCLE_BIN_SOURCE_ID: &str = "desktop.recycle-bin";

#[derive(Debug, Clone, Deserialize)]
struct IconCatalogFile {
    schema_version: u32,
    icons: Vec<IconEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum IconKind {
    App,
    Terminal,
    RecycleBin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IconEntry {
    source_id: String,
    label: String,
    glyph: String,
    kind: IconKind,
    column: u32,
    row: u32,
    width: Option<i32>,
    height: Option<i32>,
}

fn validate(path: &str, catalog: &IconCatalogFile) {
    if catalog.schema_version != 1 {
        panic!(
            "icon catalog schema mismatch in {path}: expected 1 found {}",
            catalog.schema_version
        );
    }

    let mut ids = BTreeSet::new();
    let mut cells = BTreeSet::new();
    let mut bins = 0usize;
    for icon in &catalog.icons {
        if !ids.insert(icon.source_id.as_str()) {
            panic!("duplicate icon source_id `{}` in {path}", icon.source_id);
        }
        if !icon.source_id.contains('.') {
            panic!(
                "icon source_id `{}` in {path} must be namespaced (e.g. desktop.word)",
                icon.source_id
            );
        }
        if icon.label.trim().is_empty() {
            panic!("icon `{}` in {path} has an empty label", icon.source_id);
        }
        if !(1..=GRID_COLUMNS).contains(&icon.column) || !(1..=GRID_ROWS).contains(&icon.row) {
            panic!(
                "icon `{}` in {path} sits outside the {GRID_COLUMNS}x{GRID_ROWS} grid",
                icon.source_id
            );
        }
        if !cells.insert((icon.column, icon.row)) {
            panic!(
                "icon `{}` in {path} shares cell {}x{} with another icon",
                icon.source_id, icon.column, icon.row
            );
        }
        if icon.width.is_some() != icon.height.is_some() {
            panic!(
                "icon `{}` in {path} must set both width and height or neither",
                icon.source_id
            );
        }
        if matches!(icon.kind, IconKind::RecycleBin) {
            bins += 1;
            if icon.source_id != RECYCLE_BIN_SOURCE_ID {
                panic!("recycle bin icon in {path} must use source_id `{RECYCLE_BIN_SOURCE_ID}`");
            }
        }
    }
    if bins != 1 {
        panic!("icon catalog {path} must contain exactly one recycle-bin icon, found {bins}");
    }
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let path = crate_root.join("desktop.icons.toml");
    println!("cargo:rerun-if-changed={}", path.display());

    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    let catalog: IconCatalogFile = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
    validate(&path.display().to_string(), &catalog);

    let mut icons = catalog.icons;
    icons.sort_by_key(|icon| (icon.column, icon.row));
    let json = serde_json::to_string_pretty(&icons).expect("serialize icon catalog");
    let generated = format!(
        "/// Build-time generated desktop icon catalog JSON.\n\
pub const DESKTOP_ICON_CATALOG_JSON: &str = r##\"{}\"##;\n",
        json
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("icon_catalog_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
