use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "wst",
    about = "World-State Trees: aggregate, diff, merge, and query nested state",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Config file; defaults to ./wst.toml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Sequence kind that JSON arrays are read as
    #[arg(long, global = true, default_value = "list")]
    pub arrays: ArrayKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ArrayKind {
    List,
    Tuple,
    Set,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a state tree from a file of encoded atoms
    Aggregate(AggregateArgs),
    /// Show what changed from one tree to another
    Diff(DiffArgs),
    /// Keep the entries two trees agree on
    Intersect(IntersectArgs),
    /// Merge new values into a main tree
    Merge(MergeArgs),
    /// Remove one tree's contents from another
    Subtract(SubtractArgs),
    /// Show elements lost between two trees
    Dropped(DroppedArgs),
    /// List keys at a nesting depth
    Keys(DepthArgs),
    /// List values at a nesting depth
    Values(DepthArgs),
    /// Prune empty branches
    Filter(FilterArgs),
    /// Render a tree for reading
    Print(PrintArgs),
    /// Write or read snapshot files
    Snapshot(SnapshotArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    Set,
    DedupList,
    List,
    LastWrite,
}

#[derive(Args)]
pub struct AggregateArgs {
    /// File with one encoded atom per line
    pub atoms: PathBuf,
    #[arg(short, long)]
    pub separator: Option<String>,
    #[arg(short, long)]
    pub policy: Option<PolicyArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DiffModeArg {
    Additions,
    Dropped,
}

#[derive(Args)]
pub struct DiffArgs {
    pub before: PathBuf,
    pub after: PathBuf,
    /// Force one mapping policy instead of choosing by mapping flavor
    #[arg(long)]
    pub mode: Option<DiffModeArg>,
}

#[derive(Args)]
pub struct IntersectArgs {
    pub source: PathBuf,
    pub compare: PathBuf,
    #[arg(long)]
    pub allow_missing: bool,
    /// Restrict the top level to these keys
    #[arg(long, value_delimiter = ',')]
    pub keys: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ListModeArg {
    Add,
    Replace,
    Intersect,
}

#[derive(Args)]
pub struct MergeArgs {
    pub main: PathBuf,
    pub new: PathBuf,
    /// Keep main's scalar on conflict instead of overwriting it
    #[arg(long)]
    pub keep_conflicts: bool,
    #[arg(long)]
    pub list_mode: Option<ListModeArg>,
}

#[derive(Args)]
pub struct SubtractArgs {
    pub a: PathBuf,
    pub b: PathBuf,
    /// Drop keys of A that B lacks instead of keeping them
    #[arg(long)]
    pub strict: bool,
    #[arg(long, value_delimiter = ',')]
    pub keys: Vec<String>,
}

#[derive(Args)]
pub struct DroppedArgs {
    pub from: PathBuf,
    pub result: PathBuf,
    #[arg(long)]
    pub check_single_values: bool,
}

#[derive(Args)]
pub struct DepthArgs {
    pub tree: PathBuf,
    #[arg(short, long, default_value = "1")]
    pub depth: usize,
}

#[derive(Args)]
pub struct FilterArgs {
    pub tree: PathBuf,
    #[arg(long, value_delimiter = ',')]
    pub keys: Vec<String>,
    /// Keep null and empty-string scalars
    #[arg(long)]
    pub keep_blank: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PrintStyle {
    Layered,
    Indented,
    Compact,
    SingleLine,
    Log,
}

#[derive(Args)]
pub struct PrintArgs {
    pub tree: PathBuf,
    #[arg(short, long, default_value = "indented")]
    pub style: PrintStyle,
    /// Separator for layered and compact styles, indent unit otherwise
    #[arg(long, default_value = " ")]
    pub spacer: String,
}

#[derive(Args)]
pub struct SnapshotArgs {
    #[command(subcommand)]
    pub action: SnapshotAction,
}

#[derive(Subcommand)]
pub enum SnapshotAction {
    /// Write trees to FOLDER/NAME, replacing any existing file
    Write {
        folder: PathBuf,
        name: String,
        #[arg(required = true)]
        trees: Vec<PathBuf>,
    },
    /// Print the trees stored in a snapshot file
    Read { file: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_aggregate() {
        let cli = Cli::try_parse_from(["wst", "aggregate", "atoms.txt", "-p", "dedup-list"]).unwrap();
        if let Command::Aggregate(args) = cli.command {
            assert_eq!(args.atoms, PathBuf::from("atoms.txt"));
            assert_eq!(args.policy, Some(PolicyArg::DedupList));
            assert!(args.separator.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_diff_mode() {
        let cli = Cli::try_parse_from(["wst", "diff", "a.json", "b.json", "--mode", "dropped"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.mode, Some(DiffModeArg::Dropped));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_merge_flags() {
        let cli = Cli::try_parse_from([
            "wst", "merge", "main.json", "new.json", "--keep-conflicts", "--list-mode", "replace",
        ])
        .unwrap();
        if let Command::Merge(args) = cli.command {
            assert!(args.keep_conflicts);
            assert_eq!(args.list_mode, Some(ListModeArg::Replace));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_key_allowlist() {
        let cli = Cli::try_parse_from(["wst", "subtract", "a.json", "b.json", "--keys", "x,y"]).unwrap();
        if let Command::Subtract(args) = cli.command {
            assert_eq!(args.keys, vec!["x", "y"]);
            assert!(!args.strict);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_depth() {
        let cli = Cli::try_parse_from(["wst", "values", "t.json", "-d", "2"]).unwrap();
        if let Command::Values(args) = cli.command {
            assert_eq!(args.depth, 2);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_print_style() {
        let cli = Cli::try_parse_from(["wst", "print", "t.json", "--style", "single-line"]).unwrap();
        if let Command::Print(args) = cli.command {
            assert_eq!(args.style, PrintStyle::SingleLine);
            assert_eq!(args.spacer, " ");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_snapshot_write() {
        let cli = Cli::try_parse_from(["wst", "snapshot", "write", "out", "s.wst", "a.json", "b.json"]).unwrap();
        if let Command::Snapshot(SnapshotArgs { action: SnapshotAction::Write { name, trees, .. } }) = cli.command {
            assert_eq!(name, "s.wst");
            assert_eq!(trees.len(), 2);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn snapshot_write_needs_trees() {
        assert!(Cli::try_parse_from(["wst", "snapshot", "write", "out", "s.wst"]).is_err());
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "wst", "keys", "t.json", "--verbose", "--format", "json", "--config", "my.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("my.toml")));
        assert_eq!(cli.arrays, ArrayKind::List);
    }

    #[test]
    fn parse_arrays_kind() {
        let cli = Cli::try_parse_from(["wst", "--arrays", "set", "filter", "t.json"]).unwrap();
        assert_eq!(cli.arrays, ArrayKind::Set);
    }
}
