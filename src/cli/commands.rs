use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mm", about = concat!("mindmap v", env!("CARGO_PKG_VERSION"), " - trees of ideas in a plain JSON file"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Map file to use (default: ./mindmap.json)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new, empty map file
    Init(InitArgs),
    /// Print the map as an indented outline
    Show(ShowArgs),
    /// Print computed node positions and edges
    Layout(LayoutArgs),
    /// Add a node (a new root unless --parent is given)
    Add(AddArgs),
    /// Add a node next to an existing one
    Sibling(NodeTextArgs),
    /// Insert a new parent above a node
    Wrap(NodeTextArgs),
    /// Change a node's text
    Edit(EditArgs),
    /// Delete a node and its subtree
    Rm(IdArg),
    /// Move a node under another node (or make it a root)
    Mv(MvArgs),
    /// Collapse or expand a node
    Fold(IdArg),
    /// Set a node's color, icon or style
    Style(StyleArgs),
    /// Bind an external record as a root node (once)
    Import(ImportArgs),
    /// Duplicate a subtree with fresh ids
    Dup(MvArgs),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Map name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Overwrite an existing map file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Show only this node's subtree
    pub id: Option<String>,
    /// Include node ids in the outline
    #[arg(long)]
    pub ids: bool,
}

#[derive(Args)]
pub struct LayoutArgs {
    /// Growth direction: left-right, right-left, top-bottom, bottom-top (or lr/rl/tb/bt)
    #[arg(long, short = 'd')]
    pub direction: Option<String>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Node text
    pub text: String,
    /// Parent node id
    #[arg(long, short = 'p')]
    pub parent: Option<String>,
}

#[derive(Args)]
pub struct NodeTextArgs {
    /// Existing node id
    pub id: String,
    /// Node text (default: the configured placeholder)
    pub text: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Node id
    pub id: String,
    /// New text
    pub text: String,
}

#[derive(Args)]
pub struct IdArg {
    /// Node id
    pub id: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Node id
    pub id: String,
    /// New parent id (omit to make a root)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Args)]
pub struct StyleArgs {
    /// Node id
    pub id: String,
    /// Color name or #RRGGBB
    #[arg(long, conflicts_with = "no_color")]
    pub color: Option<String>,
    /// Clear the color
    #[arg(long)]
    pub no_color: bool,
    /// Icon (any short string, typically one emoji)
    #[arg(long, conflicts_with = "no_icon")]
    pub icon: Option<String>,
    /// Clear the icon
    #[arg(long)]
    pub no_icon: bool,
    /// Box style: dot, card or text
    #[arg(long)]
    pub style: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Id of the external record
    pub source_id: String,
    /// Node text
    pub text: String,
}
