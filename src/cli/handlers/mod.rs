mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::map_io::{self, FileStore};
use crate::io::state;
use crate::io::store::NodeStore;
use crate::model::config::MapConfig;
use crate::ops::actions::{self, Imported};
use crate::ops::clipboard::Clipboard;
use crate::ops::layout;
use crate::ops::tree::TreeIndex;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let path = map_path(cli.file.as_deref())?;

    match cli.command {
        None => Err("no command given (run `mm` without arguments for the TUI)".into()),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(args, &path),

            // Read commands
            Commands::Show(args) => cmd_show(&path, args, json),
            Commands::Layout(args) => cmd_layout(&path, args, json),

            // Write commands
            Commands::Add(args) => cmd_add(&path, args, json),
            Commands::Sibling(args) => cmd_sibling(&path, args, json),
            Commands::Wrap(args) => cmd_wrap(&path, args, json),
            Commands::Edit(args) => cmd_edit(&path, args, json),
            Commands::Rm(args) => cmd_rm(&path, args, json),
            Commands::Mv(args) => cmd_mv(&path, args, json),
            Commands::Fold(args) => cmd_fold(&path, args, json),
            Commands::Style(args) => cmd_style(&path, args, json),
            Commands::Import(args) => cmd_import(&path, args, json),
            Commands::Dup(args) => cmd_dup(&path, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve `--file` against the working directory
pub fn map_path(file: Option<&str>) -> Result<PathBuf, std::io::Error> {
    let cwd = std::env::current_dir()?;
    Ok(map_io::resolve_map_path(file, &cwd))
}

/// Open the map file and the config that sits beside it
fn open_map(path: &Path) -> Result<(FileStore, MapConfig), Box<dyn std::error::Error>> {
    let store = FileStore::open(path)?;
    let config = config_io::read_config(config_io::map_dir(path))?;
    Ok((store, config))
}

/// Print the ids a write command touched: plain ids, one per line, or JSON
fn report(action: &'static str, ids: Vec<String>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&ChangeJson { action, ids })?);
    } else {
        for id in ids {
            println!("{}", id);
        }
    }
    Ok(())
}

fn text_or_placeholder(text: Option<String>, config: &MapConfig) -> Result<String, String> {
    match text {
        Some(t) if t.trim().is_empty() => Err("node text cannot be empty".to_string()),
        Some(t) => Ok(t.trim().to_string()),
        None => Ok(config.nodes.placeholder.clone()),
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_show(path: &Path, args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = map_io::load_map(path)?;

    if let Some(id) = args.id {
        let index = TreeIndex::new(&doc.nodes);
        if !index.contains(&id) {
            return Err(format!("node not found: {}", id).into());
        }
        if json {
            println!("{}", serde_json::to_string_pretty(&node_to_json(&index, &id))?);
        } else {
            for line in format_outline(&index, &id, 0, args.ids) {
                println!("{}", line);
            }
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&map_to_json(&doc.name, &doc.nodes))?);
    } else {
        println!("# {}", doc.name);
        if doc.nodes.is_empty() {
            println!("(empty map)");
        }
        for line in format_map(&doc.nodes, args.ids) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_layout(path: &Path, args: LayoutArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = map_io::load_map(path)?;
    let dir = config_io::map_dir(path);
    let config = config_io::read_config(dir)?;

    // --direction wins, then the direction last used in the TUI, then config
    let direction = match args.direction {
        Some(d) => parse_direction(&d)?,
        None => state::read_ui_state(dir)
            .and_then(|s| s.direction)
            .unwrap_or(config.layout.direction),
    };
    let result = layout::layout(&doc.nodes, direction, &config.layout);

    if json {
        let out = LayoutJson {
            direction,
            layout: &result,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("direction: {}", direction);
        for line in format_layout(&result) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(path: &Path, args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, config) = open_map(path)?;
    let text = text_or_placeholder(Some(args.text), &config)?;
    let id = actions::add_child(&mut store, args.parent.as_deref(), &text)?;
    report("add", vec![id], json)
}

fn cmd_sibling(path: &Path, args: NodeTextArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, config) = open_map(path)?;
    let text = text_or_placeholder(args.text, &config)?;
    let id = actions::add_sibling(&mut store, &args.id, &text)?;
    report("sibling", vec![id], json)
}

fn cmd_wrap(path: &Path, args: NodeTextArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, config) = open_map(path)?;
    let text = text_or_placeholder(args.text, &config)?;
    let id = actions::add_parent(&mut store, &args.id, &text)?;
    report("wrap", vec![id], json)
}

fn cmd_edit(path: &Path, args: EditArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, config) = open_map(path)?;
    let text = text_or_placeholder(Some(args.text), &config)?;
    actions::edit_content(&mut store, &args.id, &text)?;
    report("edit", vec![args.id], json)
}

fn cmd_rm(path: &Path, args: IdArg, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, _) = open_map(path)?;
    let removed = actions::delete_subtree(&mut store, &args.id)?;
    if json {
        return report("rm", removed, json);
    }
    let others = removed.len() - 1;
    match others {
        0 => println!("{} removed", args.id),
        1 => println!("{} removed (and 1 descendant)", args.id),
        n => println!("{} removed (and {} descendants)", args.id, n),
    }
    Ok(())
}

fn cmd_mv(path: &Path, args: MvArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, _) = open_map(path)?;
    actions::reparent(&mut store, &args.id, args.to.as_deref())?;
    if json {
        return report("mv", vec![args.id], json);
    }
    match args.to {
        Some(parent) => println!("{} moved under {}", args.id, parent),
        None => println!("{} is now a root", args.id),
    }
    Ok(())
}

fn cmd_fold(path: &Path, args: IdArg, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, _) = open_map(path)?;
    let collapsed = actions::toggle_collapse(&mut store, &args.id)?;
    let action = if collapsed { "collapse" } else { "expand" };
    if json {
        return report(action, vec![args.id], json);
    }
    println!("{} {}", args.id, if collapsed { "collapsed" } else { "expanded" });
    Ok(())
}

fn cmd_style(path: &Path, args: StyleArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let style = args.style.as_deref().map(parse_style).transpose()?;
    let color = match (args.color, args.no_color) {
        (_, true) => Some(None),
        (Some(c), false) => Some(Some(c)),
        (None, false) => None,
    };
    let icon = match (args.icon, args.no_icon) {
        (_, true) => Some(None),
        (Some(i), false) => Some(Some(i)),
        (None, false) => None,
    };
    if style.is_none() && color.is_none() && icon.is_none() {
        return Err("nothing to change (use --color, --icon or --style)".into());
    }

    let (mut store, _) = open_map(path)?;
    if let Some(color) = color {
        actions::set_color(&mut store, &args.id, color)?;
    }
    if let Some(icon) = icon {
        actions::set_icon(&mut store, &args.id, icon)?;
    }
    if let Some(style) = style {
        actions::set_style(&mut store, &args.id, style)?;
    }
    report("style", vec![args.id], json)
}

fn cmd_import(path: &Path, args: ImportArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, config) = open_map(path)?;
    let text = text_or_placeholder(Some(args.text), &config)?;
    match actions::import_external(&mut store, &args.source_id, &text)? {
        Imported::Created(id) => report("import", vec![id], json),
        Imported::Existing(id) => {
            if !json {
                eprintln!("{} is already on the map", args.source_id);
            }
            report("existing", vec![id], json)
        }
    }
}

fn cmd_dup(path: &Path, args: MvArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, _) = open_map(path)?;
    let clipboard = Clipboard::copy_subtree(store.nodes(), &args.id)
        .ok_or_else(|| format!("node not found: {}", args.id))?;
    let ids = actions::paste(&mut store, &clipboard, args.to.as_deref())?;
    if json {
        return report("dup", ids, json);
    }
    if let Some(first) = ids.first() {
        println!("{}", first);
    }
    Ok(())
}
