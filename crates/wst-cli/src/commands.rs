use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde_json::{json, Value};
use tracing::debug;
use wst_atoms::{aggregate, AggregatePolicy};
use wst_diff::{compare_with, dropped, subtract, CompareOptions, DroppedOptions, MappingDiffMode, SubtractOptions};
use wst_merge::{intersect, merge, IntersectOptions};
use wst_pack::{SnapshotReader, SnapshotWriter};
use wst_query::{filter_empty, keys_at_depth, values_at_depth, FilterOptions, ScalarRetention};
use wst_types::render::{compact_lines, indented_lines, layered_lines, log_tree, single_line};
use wst_types::{Diagnostic, Mapping, Node, SeqKind, Sequence};

use crate::cli::*;
use crate::config::WstConfig;

/// What a command produced, ready to print in either output format.
#[derive(Debug)]
pub struct Report {
    pub json: Value,
    pub text: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    fn tree(tree: &Mapping, diagnostics: Vec<Diagnostic>) -> Self {
        let node = Node::Map(tree.clone());
        Self {
            json: node.to_json(),
            text: indented_lines(&node, "  "),
            diagnostics,
        }
    }

    fn nodes(nodes: &[Node]) -> Self {
        Self {
            json: Value::Array(nodes.iter().map(Node::to_json).collect()),
            text: nodes.iter().map(ToString::to_string).collect(),
            diagnostics: Vec::new(),
        }
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = WstConfig::discover(cli.config.as_deref(), &cwd)?;
    debug!(?config, "loaded config");
    let report = execute(cli.command, cli.arrays.into(), &config)?;
    emit(&report, cli.format)
}

pub fn execute(command: Command, arrays: SeqKind, config: &WstConfig) -> anyhow::Result<Report> {
    let loader = Loader { arrays };
    match command {
        Command::Aggregate(args) => cmd_aggregate(args, config),
        Command::Diff(args) => cmd_diff(args, &loader, config),
        Command::Intersect(args) => cmd_intersect(args, &loader, config),
        Command::Merge(args) => cmd_merge(args, &loader, config),
        Command::Subtract(args) => cmd_subtract(args, &loader, config),
        Command::Dropped(args) => cmd_dropped(args, &loader, config),
        Command::Keys(args) => {
            let tree = loader.mapping(&args.tree)?;
            Ok(Report::nodes(&keys_at_depth(&tree, args.depth)?))
        }
        Command::Values(args) => {
            let tree = loader.mapping(&args.tree)?;
            Ok(Report::nodes(&values_at_depth(&tree, args.depth)?))
        }
        Command::Filter(args) => cmd_filter(args, &loader, config),
        Command::Print(args) => cmd_print(args, &loader),
        Command::Snapshot(args) => cmd_snapshot(args, &loader),
    }
}

fn emit(report: &Report, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.json)?),
        OutputFormat::Text => {
            for line in &report.text {
                println!("{line}");
            }
        }
    }
    for diagnostic in &report.diagnostics {
        eprintln!("{} {}", "warning:".yellow().bold(), diagnostic);
    }
    Ok(())
}

/// Reads JSON trees, turning arrays into the configured sequence kind.
struct Loader {
    arrays: SeqKind,
}

impl Loader {
    fn node(&self, path: &Path) -> anyhow::Result<Node> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let value: Value =
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        let node = Node::from_json(&value);
        Ok(match self.arrays {
            SeqKind::List => node,
            kind => recast_arrays(node, kind),
        })
    }

    fn mapping(&self, path: &Path) -> anyhow::Result<Mapping> {
        self.node(path)?
            .into_mapping()
            .with_context(|| format!("loading {}", path.display()))
    }
}

fn recast_arrays(node: Node, kind: SeqKind) -> Node {
    match node {
        Node::Map(m) => Node::Map(m.into_iter().map(|(k, v)| (k, recast_arrays(v, kind))).collect()),
        Node::Seq(s) => Node::Seq(Sequence::with_kind(
            kind,
            s.into_items().into_iter().map(|item| recast_arrays(item, kind)).collect(),
        )),
        scalar => scalar,
    }
}

fn allowlist(keys: Vec<String>) -> Option<Vec<String>> {
    (!keys.is_empty()).then_some(keys)
}

impl From<PolicyArg> for AggregatePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Set => Self::Set,
            PolicyArg::DedupList => Self::DedupList,
            PolicyArg::List => Self::List,
            PolicyArg::LastWrite => Self::LastWrite,
        }
    }
}

impl From<DiffModeArg> for MappingDiffMode {
    fn from(arg: DiffModeArg) -> Self {
        match arg {
            DiffModeArg::Additions => Self::Additions,
            DiffModeArg::Dropped => Self::Dropped,
        }
    }
}

impl From<ArrayKind> for SeqKind {
    fn from(arg: ArrayKind) -> Self {
        match arg {
            ArrayKind::List => Self::List,
            ArrayKind::Tuple => Self::Tuple,
            ArrayKind::Set => Self::Set,
        }
    }
}

fn cmd_aggregate(args: AggregateArgs, config: &WstConfig) -> anyhow::Result<Report> {
    let text = std::fs::read_to_string(&args.atoms)
        .with_context(|| format!("reading {}", args.atoms.display()))?;
    let separator = args.separator.as_deref().unwrap_or(&config.separator);
    let policy = args.policy.map(AggregatePolicy::from).unwrap_or(config.policy);
    let atoms = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let tree = aggregate(atoms, separator, policy)
        .with_context(|| format!("aggregating {}", args.atoms.display()))?;
    Ok(Report::tree(&tree, Vec::new()))
}

fn cmd_diff(args: DiffArgs, loader: &Loader, config: &WstConfig) -> anyhow::Result<Report> {
    let before = loader.node(&args.before)?;
    let after = loader.node(&args.after)?;
    let options = CompareOptions {
        mode: args.mode.map(Into::into),
        max_depth: config.max_depth,
    };
    let outcome = compare_with(&before, &after, &options)?;
    let report = match outcome.value.filter(|d| !d.is_blank()) {
        Some(diff) => Report {
            json: diff.to_json(),
            text: indented_lines(&diff, "  "),
            diagnostics: outcome.diagnostics,
        },
        None => Report {
            json: Value::Null,
            text: vec![format!("{} no differences", "✓".green())],
            diagnostics: outcome.diagnostics,
        },
    };
    Ok(report)
}

fn cmd_intersect(args: IntersectArgs, loader: &Loader, config: &WstConfig) -> anyhow::Result<Report> {
    let source = loader.mapping(&args.source)?;
    let compare = loader.mapping(&args.compare)?;
    let options = IntersectOptions {
        allow_missing: args.allow_missing,
        allowed_keys: allowlist(args.keys),
        max_depth: config.max_depth,
    };
    let outcome = intersect(&source, &compare, &options)?;
    Ok(Report::tree(&outcome.value, outcome.diagnostics))
}

fn cmd_merge(args: MergeArgs, loader: &Loader, config: &WstConfig) -> anyhow::Result<Report> {
    let main = loader.mapping(&args.main)?;
    let new = loader.mapping(&args.new)?;
    let mut options = config.merge_options();
    if args.keep_conflicts {
        options.update_conflicts = false;
    }
    match args.list_mode {
        Some(ListModeArg::Add) => {
            options.lists_add = true;
            options.list_replace = false;
        }
        Some(ListModeArg::Replace) => {
            options.lists_add = false;
            options.list_replace = true;
        }
        Some(ListModeArg::Intersect) => {
            options.lists_add = false;
            options.list_replace = false;
        }
        None => {}
    }

    let outcome = merge(&main, &new, &options)?;
    let node = Node::Map(outcome.tree.clone());
    let mut text = indented_lines(&node, "  ");
    text.push(if outcome.aborted {
        format!("{} merge aborted, main tree returned unchanged", "✗".red().bold())
    } else if outcome.has_conflicts {
        format!("{} merged with unresolved conflicts", "!".yellow().bold())
    } else {
        format!("{} merged", "✓".green().bold())
    });
    Ok(Report {
        json: json!({
            "tree": node.to_json(),
            "has_conflicts": outcome.has_conflicts,
            "aborted": outcome.aborted,
        }),
        text,
        diagnostics: outcome.diagnostics,
    })
}

fn cmd_subtract(args: SubtractArgs, loader: &Loader, config: &WstConfig) -> anyhow::Result<Report> {
    let a = loader.mapping(&args.a)?;
    let b = loader.mapping(&args.b)?;
    let options = SubtractOptions {
        allow_missing: !args.strict,
        allowed_keys: allowlist(args.keys),
        max_depth: config.max_depth,
    };
    let outcome = subtract(&a, &b, &options)?;
    Ok(Report::tree(&outcome.value, outcome.diagnostics))
}

fn cmd_dropped(args: DroppedArgs, loader: &Loader, config: &WstConfig) -> anyhow::Result<Report> {
    let from = loader.mapping(&args.from)?;
    let result = loader.mapping(&args.result)?;
    let options = DroppedOptions {
        check_single_values: args.check_single_values,
        max_depth: config.max_depth,
    };
    let outcome = dropped(&from, &result, &options)?;
    Ok(Report::tree(&outcome.value, outcome.diagnostics))
}

fn cmd_filter(args: FilterArgs, loader: &Loader, config: &WstConfig) -> anyhow::Result<Report> {
    let tree = loader.mapping(&args.tree)?;
    let options = FilterOptions {
        allowed_keys: allowlist(args.keys),
        scalar_retention: if args.keep_blank {
            ScalarRetention::KeepAll
        } else {
            config.scalar_retention
        },
        max_depth: config.max_depth,
    };
    let outcome = filter_empty(&tree, &options)?;
    Ok(Report::tree(&outcome.value, outcome.diagnostics))
}

fn cmd_print(args: PrintArgs, loader: &Loader) -> anyhow::Result<Report> {
    let node = loader.node(&args.tree)?;
    let lines = match args.style {
        PrintStyle::Layered => layered_lines(&node, &args.spacer),
        PrintStyle::Indented => indented_lines(&node, &args.spacer),
        PrintStyle::Compact => compact_lines(&node, &args.spacer, ""),
        PrintStyle::SingleLine => match &node {
            Node::Map(state) => vec![single_line(state)],
            other => vec![other.to_string()],
        },
        PrintStyle::Log => {
            log_tree(&node, &args.spacer);
            Vec::new()
        }
    };
    Ok(Report {
        json: json!(lines),
        text: lines,
        diagnostics: Vec::new(),
    })
}

fn cmd_snapshot(args: SnapshotArgs, loader: &Loader) -> anyhow::Result<Report> {
    match args.action {
        SnapshotAction::Write { folder, name, trees } => {
            let states = trees
                .iter()
                .map(|path| loader.mapping(path))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let file = SnapshotWriter::write(&folder, &name, &states)
                .with_context(|| format!("writing snapshot {name} in {}", folder.display()))?;
            Ok(Report {
                json: json!({
                    "path": file.path.display().to_string(),
                    "items": file.item_count,
                    "bytes": file.bytes_written,
                }),
                text: vec![format!(
                    "{} wrote {} trees to {}",
                    "✓".green().bold(),
                    file.item_count,
                    file.path.display().to_string().bold()
                )],
                diagnostics: Vec::new(),
            })
        }
        SnapshotAction::Read { file } => {
            let states: Vec<Mapping> = SnapshotReader::open(&file)
                .and_then(|reader| reader.read_all())
                .with_context(|| format!("reading snapshot {}", file.display()))?;
            let mut text = Vec::new();
            for (i, state) in states.iter().enumerate() {
                text.push(format!("[{i}]").cyan().to_string());
                text.extend(indented_lines(&Node::Map(state.clone()), "  "));
            }
            Ok(Report {
                json: Value::Array(states.iter().map(|s| Node::Map(s.clone()).to_json()).collect()),
                text,
                diagnostics: Vec::new(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;
    use wst_types::{DiagnosticKind, NodeKind};

    struct Workspace {
        dir: tempfile::TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            Self { dir: tempfile::tempdir().unwrap() }
        }

        fn file(&self, name: &str, contents: &str) -> String {
            let path = self.dir.path().join(name);
            std::fs::write(&path, contents).unwrap();
            path.display().to_string()
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }
    }

    fn run(args: &[&str]) -> Report {
        let cli = Cli::try_parse_from(std::iter::once("wst").chain(args.iter().copied())).unwrap();
        execute(cli.command, cli.arrays.into(), &WstConfig::default()).unwrap()
    }

    #[test]
    fn aggregate_atoms_file() {
        let ws = Workspace::new();
        let atoms = ws.file("atoms.txt", "o1+colour+red\n\no1+colour+blue\no1+colour+red\no2+size+3\n");
        let report = run(&["aggregate", atoms.as_str()]);
        assert_eq!(
            report.json,
            json!({"o1": {"colour": ["blue", "red"]}, "o2": {"size": ["3"]}})
        );
    }

    #[test]
    fn aggregate_reports_malformed_atom() {
        let ws = Workspace::new();
        let atoms = ws.file("atoms.txt", "o1+colour\n");
        let cli = Cli::try_parse_from(["wst", "aggregate", atoms.as_str()]).unwrap();
        assert!(execute(cli.command, SeqKind::List, &WstConfig::default()).is_err());
    }

    #[test]
    fn diff_shows_additions() {
        let ws = Workspace::new();
        let before = ws.file("before.json", r#"{"o": {"p": 1}}"#);
        let after = ws.file("after.json", r#"{"o": {"p": 1, "q": 2}}"#);
        assert_eq!(run(&["diff", before.as_str(), after.as_str()]).json, json!({"o": {"q": 2}}));
        assert_eq!(run(&["diff", before.as_str(), before.as_str()]).json, Value::Null);
    }

    #[test]
    fn merge_abort_is_reported() {
        let ws = Workspace::new();
        let main = ws.file("main.json", r#"{"a": [1, 2]}"#);
        let new = ws.file("new.json", r#"{"a": {"x": 1}}"#);
        let report = run(&["merge", main.as_str(), new.as_str()]);
        assert_eq!(report.json["aborted"], json!(true));
        assert_eq!(report.json["tree"], json!({"a": [1, 2]}));
        assert_eq!(
            report.diagnostics[0].kind,
            DiagnosticKind::TypeMismatch { left: NodeKind::List, right: NodeKind::Mapping }
        );
    }

    #[test]
    fn merge_keeps_conflicts_when_asked() {
        let ws = Workspace::new();
        let main = ws.file("main.json", r#"{"a": 1}"#);
        let new = ws.file("new.json", r#"{"a": 2}"#);
        let report = run(&["merge", main.as_str(), new.as_str(), "--keep-conflicts"]);
        assert_eq!(report.json["tree"], json!({"a": 1}));
        assert_eq!(report.json["has_conflicts"], json!(true));
    }

    #[test]
    fn arrays_as_sets_change_subtraction() {
        let ws = Workspace::new();
        let a = ws.file("a.json", r#"{"p": [1, 1, 2]}"#);
        let b = ws.file("b.json", r#"{"p": [1]}"#);
        assert_eq!(run(&["subtract", a.as_str(), b.as_str()]).json, json!({"p": [1, 2]}));
        assert_eq!(run(&["--arrays", "set", "subtract", a.as_str(), b.as_str()]).json, json!({"p": [2]}));
    }

    #[test]
    fn values_at_depth_two() {
        let ws = Workspace::new();
        let tree = ws.file("t.json", r#"{"a": {"x": 1}, "b": {"y": 2}}"#);
        assert_eq!(run(&["values", tree.as_str(), "--depth", "2"]).json, json!([1, 2]));
        assert_eq!(run(&["keys", tree.as_str(), "--depth", "2"]).json, json!(["x", "y"]));
    }

    #[test]
    fn filter_reports_missing_keys() {
        let ws = Workspace::new();
        let tree = ws.file("t.json", r#"{"a": {"p": []}, "b": {"q": 1}}"#);
        let report = run(&["filter", tree.as_str(), "--keys", "b,zz"]);
        assert_eq!(report.json, json!({"b": {"q": 1}}));
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::MissingKey);
    }

    #[test]
    fn print_layered() {
        let ws = Workspace::new();
        let tree = ws.file("t.json", r#"{"o": {"p": ["x", "y"]}}"#);
        let report = run(&["print", tree.as_str(), "--style", "layered", "--spacer", "/"]);
        assert_eq!(report.text, vec!["o/p/x", "o/p/y"]);
    }

    #[test]
    fn top_level_must_be_object() {
        let ws = Workspace::new();
        let tree = ws.file("t.json", "[1, 2]");
        let cli = Cli::try_parse_from(["wst", "keys", tree.as_str()]).unwrap();
        let err = execute(cli.command, SeqKind::List, &WstConfig::default()).unwrap_err();
        let cause = err.downcast_ref::<wst_types::TreeError>();
        assert!(matches!(
            cause,
            Some(wst_types::TreeError::NotAMapping { kind: wst_types::NodeKind::List })
        ));
    }

    #[test]
    fn snapshot_write_then_read() {
        let ws = Workspace::new();
        let a = ws.file("a.json", r#"{"o": {"p": ["x"]}}"#);
        let b = ws.file("b.json", r#"{"o": {"q": 1}}"#);
        let folder = ws.path("snaps").display().to_string();

        let written = run(&["snapshot", "write", folder.as_str(), "s.wst", a.as_str(), b.as_str()]);
        assert_eq!(written.json["items"], json!(2));

        let file = ws.path("snaps").join("s.wst").display().to_string();
        let read = run(&["snapshot", "read", file.as_str()]);
        assert_eq!(read.json, json!([{"o": {"p": ["x"]}}, {"o": {"q": 1}}]));
    }
}
