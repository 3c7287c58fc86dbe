use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{self, CONFIG_FILE};
use crate::io::map_io;

const CONFIG_TEMPLATE: &str = r##"# mindmap settings for the map files in this directory.
# Every table is optional; delete a line to fall back to the default.

[layout]
# Box size and spacing, in layout units (the terminal view draws 10 units per cell)
node_width = 180.0
node_height = 40.0
level_gap = 80.0
sibling_gap = 20.0
root_gap = 60.0
# left-right, right-left, top-bottom or bottom-top
direction = "left-right"

[history]
# Undo steps kept in memory
capacity = 50

[nodes]
# Text given to freshly created nodes
placeholder = "New node"

# --- UI Customization ---
# Uncomment and edit to override defaults.
#
# [ui.colors]
# background = "#0C001B"
# text = "#A09BFE"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#5A5580"
#
# [ui.node_colors]
# red = "#FF4444"
# yellow = "#FFD700"
# green = "#44FF88"
# cyan = "#44DDFF"
"##;

/// Infer a map name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + chars.as_str()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn default_name(map_path: &Path) -> String {
    let dir = config_io::map_dir(map_path);
    fs::canonicalize(dir)
        .ok()
        .as_deref()
        .and_then(|d| d.file_name())
        .and_then(|n| n.to_str())
        .map(infer_name)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Untitled".to_string())
}

pub fn cmd_init(args: InitArgs, map_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let name = args.name.unwrap_or_else(|| default_name(map_path));
    map_io::init_map(map_path, &name, args.force)?;

    // Leave an existing config alone, even with --force
    let config_path = config_io::map_dir(map_path).join(CONFIG_FILE);
    let wrote_config = if config_path.exists() {
        false
    } else {
        fs::write(&config_path, CONFIG_TEMPLATE)?;
        true
    };

    tracing::info!(path = %map_path.display(), %name, "initialized map");
    println!("Initialized map: {}", name);
    println!("  file: {}", map_path.display());
    if wrote_config {
        println!("  config: {}", config_path.display());
    }
    Ok(())
}
