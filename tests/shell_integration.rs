//! Integration tests driving the registry the way a shell does
//!
//! Each test plays one shell session: load the project configuration, build
//! a registry, add the generated switches to a command, parse a command line
//! and act on the environment.

use std::fs;
use std::io::Write;
use std::path::Path;

use clap::{Arg, Command};
use predicates::prelude::*;
use tempfile::TempDir;

use stowage::storage::PROJECT_DIR;
use stowage::{
    CommandContext, Config, ConversionGraph, ConvertFrom, Environment, FormatTag, GraphError,
    ReadFormat, RegistryBuilder, StoreError, StoreInfo, StoreRegistry, StoreType, WriteFormat,
};

// =============================================================================
// Store types of a small logic shell
// =============================================================================

/// Directed graph as an edge list
#[derive(Debug, Clone, PartialEq)]
struct Graph {
    name: String,
    edges: Vec<(u32, u32)>,
}

/// Adjacency table derived from a graph
#[derive(Debug, Clone, PartialEq)]
struct Table {
    rows: Vec<String>,
}

/// Degree summary derived from a table
#[derive(Debug, Clone, PartialEq)]
struct Summary {
    rows: usize,
}

struct Edges;
struct Bench;

impl StoreType for Graph {
    const INFO: StoreInfo = StoreInfo::new("graph", "graph", 'g', "graph", "graphs");

    fn describe(&self) -> String {
        format!("{} ({} edges)", self.name, self.edges.len())
    }

    fn print(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for (from, to) in &self.edges {
            writeln!(out, "{} -> {}", from, to)?;
        }
        Ok(())
    }

    fn print_statistics(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "{}: edges = {}", self.name, self.edges.len())
    }

    fn log_statistics(&self) -> serde_json::Value {
        serde_json::json!({ "name": self.name, "edges": self.edges.len() })
    }
}

impl StoreType for Table {
    const INFO: StoreInfo = StoreInfo::new("table", "table", 't', "table", "tables");

    fn describe(&self) -> String {
        format!("{} rows", self.rows.len())
    }
}

impl StoreType for Summary {
    const INFO: StoreInfo = StoreInfo::new("summary", "summary", 's', "summary", "summaries");
}

impl FormatTag for Edges {
    const NAME: &'static str = "edges";
    const EXTENSIONS: &'static [&'static str] = &["edges"];
    const DESCRIPTION: &'static str = "read or write an edge list";
}

impl FormatTag for Bench {
    const NAME: &'static str = "bench";
    const EXTENSIONS: &'static [&'static str] = &["bench"];
}

impl ReadFormat<Edges> for Graph {
    fn can_read(cmd: &mut CommandContext) -> bool {
        cmd.add_option("name", "name of the graph", Some("g"));
        true
    }

    fn read(path: &Path, cmd: &CommandContext) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut edges = Vec::new();
        for line in content.lines().filter(|line| !line.trim().is_empty()) {
            let (from, to) = line
                .split_once(' ')
                .ok_or_else(|| anyhow::anyhow!("malformed edge: {}", line))?;
            edges.push((from.trim().parse()?, to.trim().parse()?));
        }
        Ok(Graph {
            name: cmd.value("name").unwrap_or("g").to_string(),
            edges,
        })
    }
}

impl WriteFormat<Edges> for Graph {
    fn write(&self, path: &Path, _cmd: &CommandContext) -> anyhow::Result<()> {
        let content: String = self
            .edges
            .iter()
            .map(|(from, to)| format!("{} {}\n", from, to))
            .collect();
        fs::write(path, content)?;
        Ok(())
    }
}

// Declared but switched off by configuration in some sessions
impl ReadFormat<Bench> for Graph {
    fn read(_path: &Path, _cmd: &CommandContext) -> anyhow::Result<Self> {
        Ok(Graph {
            name: "bench".to_string(),
            edges: Vec::new(),
        })
    }
}

impl ConvertFrom<Graph> for Table {
    fn convert_from(source: &Graph) -> anyhow::Result<Self> {
        Ok(Table {
            rows: source
                .edges
                .iter()
                .map(|(from, to)| format!("{}:{}", from, to))
                .collect(),
        })
    }
}

impl ConvertFrom<Table> for Summary {
    fn convert_from(source: &Table) -> anyhow::Result<Self> {
        Ok(Summary {
            rows: source.rows.len(),
        })
    }
}

// =============================================================================
// Session helpers
// =============================================================================

fn project(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let project_dir = dir.path().join(PROJECT_DIR);
    fs::create_dir_all(&project_dir).unwrap();
    fs::write(project_dir.join("config.toml"), config).unwrap();
    dir
}

fn registry(config: &Config) -> StoreRegistry {
    RegistryBuilder::new()
        .reader::<Graph, Edges>()
        .writer::<Graph, Edges>()
        .reader::<Graph, Bench>()
        .conversion::<Graph, Table>()
        .conversion::<Table, Summary>()
        .config(&config.project)
        .output(config.output())
        .build()
        .unwrap()
}

/// A `read` command with store switches, format switches and a filename
fn read_command(registry: &StoreRegistry) -> CommandContext {
    let command = Command::new("read")
        .arg(Arg::new("filename").required(true))
        .args(registry.store_args())
        .args(registry.format_args());
    CommandContext::from_command(command)
}

/// Runs `read` like a shell would; returns the index of the new value
fn run_read(
    registry: &StoreRegistry,
    env: &mut Environment,
    args: &[&str],
) -> Result<usize, StoreError> {
    let mut cmd = read_command(registry);
    for info in registry.stores() {
        registry.readable_formats(info.key, &mut cmd);
    }
    cmd.parse_from(args).unwrap();

    let matches = cmd.matches().unwrap();
    let filename = matches.get_one::<String>("filename").unwrap();
    let path = Path::new(filename);
    let store = registry.selected_stores(matches)[0].key;
    let format = registry
        .resolve_format(matches, path)
        .ok_or_else(|| StoreError::UnknownFormat(filename.clone()))?
        .name;

    registry.read_into(env, store, format, path, &cmd)
}

// =============================================================================
// Sessions
// =============================================================================

#[test]
fn read_list_and_print_session() {
    let dir = project("");
    let config = Config::for_project(dir.path()).unwrap();
    let registry = registry(&config);
    let mut env = Environment::new();

    let input = dir.path().join("ring.edges");
    fs::write(&input, "0 1\n1 2\n2 0\n").unwrap();
    let input = input.to_str().unwrap();

    run_read(&registry, &mut env, &["read", "--graph", input, "--name", "ring"]).unwrap();
    run_read(&registry, &mut env, &["read", "-g", input]).unwrap();

    let lines = registry.list(&env, "graph").unwrap();
    assert_eq!(lines, vec!["  0: ring (3 edges)", "* 1: g (3 edges)"]);

    env.set_current("graph", 0).unwrap();
    let mut out = Vec::new();
    registry.print_current(&env, "graph", &mut out).unwrap();
    let printed = String::from_utf8(out).unwrap();
    assert!(predicate::str::contains("2 -> 0").eval(&printed));
    assert_eq!(env.current_as::<Graph>().unwrap().name, "ring");
}

#[test]
fn configured_extension_selects_format() {
    let dir = project(
        r#"
[extensions]
edges = [".el"]
"#,
    );
    let config = Config::for_project(dir.path()).unwrap();
    let registry = registry(&config);
    let mut env = Environment::new();

    let input = dir.path().join("small.el");
    fs::write(&input, "4 5\n").unwrap();

    run_read(&registry, &mut env, &["read", "-g", input.to_str().unwrap()]).unwrap();
    assert_eq!(
        env.current_as::<Graph>().unwrap().edges,
        vec![(4, 5)]
    );
}

#[test]
fn unknown_extension_needs_explicit_switch() {
    let dir = project("");
    let config = Config::for_project(dir.path()).unwrap();
    let registry = registry(&config);
    let mut env = Environment::new();

    let input = dir.path().join("small.txt");
    fs::write(&input, "4 5\n").unwrap();
    let input = input.to_str().unwrap();

    let err = run_read(&registry, &mut env, &["read", "-g", input]).unwrap_err();
    assert!(matches!(err, StoreError::UnknownFormat(_)));

    run_read(&registry, &mut env, &["read", "-g", "--edges", input]).unwrap();
    assert_eq!(env.len("graph"), 1);
}

#[test]
fn disabled_format_is_unsupported() {
    let dir = project(r#"disabled_formats = ["bench"]"#);
    let config = Config::for_project(dir.path()).unwrap();
    let registry = registry(&config);

    let mut cmd = CommandContext::new("read");
    assert!(!registry.can_read::<Graph, Bench>(&mut cmd));
    assert!(registry.can_read::<Graph, Edges>(&mut cmd));

    let readable: Vec<_> = registry
        .readable_formats("graph", &mut cmd)
        .iter()
        .map(|info| info.name)
        .collect();
    assert_eq!(readable, vec!["edges"]);

    let command = read_command(&registry);
    assert!(command.has_arg("format-edges"));
    assert!(!command.has_arg("format-bench"));
}

#[test]
fn write_round_trips_through_file() {
    let dir = project("");
    let config = Config::for_project(dir.path()).unwrap();
    let registry = registry(&config);
    let mut env = Environment::new();

    env.push(Graph {
        name: "pair".to_string(),
        edges: vec![(1, 2), (2, 3)],
    });

    let output = dir.path().join("out.edges");
    let mut cmd = CommandContext::new("write");
    assert!(registry.can_write_key("graph", "edges", &mut cmd));
    assert!(!registry.can_write_key("graph", "bench", &mut cmd));
    cmd.parse_from(["write"]).unwrap();

    registry
        .write_current(&env, "graph", "edges", &output, &cmd)
        .unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "1 2\n2 3\n");

    let err = registry
        .write_current(&env, "graph", "bench", &dir.path().join("out.bench"), &cmd)
        .unwrap_err();
    assert!(err.is_unimplemented());
}

#[test]
fn convert_along_graph_path() {
    let config = Config::default();
    let registry = registry(&config);
    let mut env = Environment::new();
    env.push(Graph {
        name: "tri".to_string(),
        edges: vec![(0, 1), (1, 2), (2, 0)],
    });

    assert_eq!(registry.conversions_from("graph"), vec!["table"]);
    assert!(registry.can_convert_key("graph", "table"));
    assert!(!registry.can_convert_key("graph", "summary"));

    let graph = ConversionGraph::from_registry(&registry);
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.reachable("graph").unwrap(), vec!["summary", "table"]);

    let path = graph.path("graph", "summary").unwrap();
    assert_eq!(path, vec!["graph", "table", "summary"]);

    let value = registry
        .convert_path(&path, env.current("graph").unwrap())
        .unwrap();
    env.push_any("summary", value);
    assert_eq!(env.current_as::<Summary>(), Some(&Summary { rows: 3 }));

    assert!(matches!(
        graph.path("summary", "graph"),
        Err(GraphError::NoPath(_, _))
    ));

    let index = registry.convert_current(&mut env, "graph", "table").unwrap();
    assert_eq!(index, 0);
    assert_eq!(registry.describe_current(&env, "table").unwrap(), "3 rows");
}

#[test]
fn statistics_are_logged_per_command() {
    let dir = project("log_statistics = true");
    let config = Config::for_project(dir.path()).unwrap();
    let registry = registry(&config);
    let mut env = Environment::new();

    env.push(Graph {
        name: "first".to_string(),
        edges: vec![(0, 1)],
    });
    env.push(Graph {
        name: "second".to_string(),
        edges: vec![(0, 1), (1, 0)],
    });

    let mut text = Vec::new();
    registry
        .print_statistics_current(&env, "graph", &mut text)
        .unwrap();
    assert_eq!(String::from_utf8(text).unwrap(), "second: edges = 2\n");

    let log = config.statistics_log().unwrap();
    log.append(&registry.statistics_entry(&env, "ps", "graph").unwrap())
        .unwrap();
    env.set_current("graph", 0).unwrap();
    log.append(&registry.statistics_entry(&env, "ps", "graph").unwrap())
        .unwrap();

    assert!(predicate::path::exists().eval(log.path()));
    let entries = log.read_all().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].statistics["name"], "second");
    assert_eq!(entries[1].statistics["edges"], 1);
    assert!(entries.iter().all(|entry| entry.command == "ps"));

    let raw = fs::read_to_string(log.path()).unwrap();
    assert!(predicate::str::contains("\"store\":\"graph\"").eval(&raw));
}

#[test]
fn empty_environment_reports_store() {
    let registry = registry(&Config::default());
    let env = Environment::new();

    let err = registry.describe_current(&env, "graph").unwrap_err();
    assert!(matches!(err, StoreError::EmptyStore(ref key) if key == "graph"));

    // Summary has no presentation hooks; its statistics record is empty
    let mut env = Environment::new();
    env.push(Summary { rows: 0 });
    assert_eq!(
        registry.log_statistics_current(&env, "summary").unwrap(),
        serde_json::json!({})
    );
    assert_eq!(registry.list(&env, "summary").unwrap(), vec!["* 0:"]);
}
