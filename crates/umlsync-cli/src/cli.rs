//! Command-line interface for the umlsync utility
//!
//! Reads workspace fact files, imports their types into a class diagram and
//! resynchronizes single entities against changed facts.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info};

use umlsync::core::logging::init_logging;
use umlsync::core::{
    collect_types, CommandStack, Diagram, Member, Position, ResolverConfig, TypeHandle, TypeIndex,
    Workspace,
};
use umlsync::plugins::java::{import_types, MemoryIndex, MemoryWorkspace};
use umlsync::plugins::synchronizer::Synchronizer;

/// umlsync - Keep class diagrams in step with source types
#[derive(Parser)]
#[command(name = "umlsync")]
#[command(about = "Import source type facts into a class diagram and resynchronize entities")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Resolver configuration file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import types from a fact file into an empty diagram
    Import {
        /// Workspace fact file (JSON)
        #[arg(short, long)]
        facts: PathBuf,

        /// Project to import from (defaults to the active project)
        #[arg(short, long)]
        project: Option<String>,

        /// Qualified type names to import (defaults to every type)
        #[arg(short, long, value_delimiter = ',')]
        types: Vec<String>,

        /// Print the diagram as JSON
        #[arg(long)]
        json: bool,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resynchronize one entity against changed facts, then undo
    Resync {
        /// Fact file the diagram is imported from
        #[arg(long)]
        before: PathBuf,

        /// Fact file the entity is resynchronized against
        #[arg(long)]
        after: PathBuf,

        /// Qualified name of the entity to resynchronize
        #[arg(short, long)]
        entity: String,

        /// Project to import from (defaults to the active project)
        #[arg(short, long)]
        project: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Serializable listing of a diagram
#[derive(Debug, Serialize)]
pub struct DiagramView {
    pub entities: Vec<EntityView>,
    pub connections: Vec<ConnectionView>,
}

#[derive(Debug, Serialize)]
pub struct EntityView {
    pub id: String,
    pub kind: String,
    pub name: String,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_path: Option<String>,
    pub members: Vec<Member>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionView {
    pub id: String,
    pub kind: String,
    pub source: String,
    pub target: String,
}

impl DiagramView {
    pub fn new(diagram: &Diagram) -> Self {
        let name_of = |id| {
            diagram
                .entity(id)
                .map(|e| e.name.clone())
                .unwrap_or_else(|| id.to_string())
        };
        Self {
            entities: diagram
                .entities()
                .map(|(id, e)| EntityView {
                    id: id.to_string(),
                    kind: e.kind.to_string(),
                    name: e.name.clone(),
                    position: e.position,
                    origin_path: e.origin_path.clone(),
                    members: e.members.clone(),
                })
                .collect(),
            connections: diagram
                .connections()
                .map(|(id, c)| ConnectionView {
                    id: id.to_string(),
                    kind: c.kind.to_string(),
                    source: name_of(c.source),
                    target: name_of(c.target),
                })
                .collect(),
        }
    }
}

/// Outcome of the resync command
#[derive(Debug, Serialize)]
pub struct ResyncReport {
    pub entity: String,
    pub replaced: usize,
    pub diagram: DiagramView,
    pub round_trip: bool,
}

/// Main CLI application
pub struct UmlsyncApp {
    config: ResolverConfig,
}

impl UmlsyncApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    /// Create a new application instance with a resolver config
    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("UMLSYNC_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("UMLSYNC_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("umlsync v{}", env!("CARGO_PKG_VERSION"));
        }

        if let Some(path) = &cli.config {
            self.config = Self::load_config(path)?;
            if cli.verbose {
                eprintln!("Loaded resolver config from {}", path.display());
            }
        }

        match cli.command {
            Commands::Import {
                facts,
                project,
                types,
                json,
                output,
            } => {
                let diagram = self.import_command(&facts, project.as_deref(), &types)?;
                if cli.verbose {
                    eprintln!(
                        "Imported {} entities with {} connections",
                        diagram.entity_count(),
                        diagram.connection_count()
                    );
                }
                let rendered = if json {
                    serde_json::to_string_pretty(&DiagramView::new(&diagram))?
                } else {
                    render_text(&diagram)
                };
                self.write_output(output, &rendered)
            }
            Commands::Resync {
                before,
                after,
                entity,
                project,
                json,
                output,
            } => {
                let report = self.resync_command(&before, &after, &entity, project.as_deref())?;
                let rendered = if json {
                    serde_json::to_string_pretty(&report)?
                } else {
                    render_report(&report)
                };
                self.write_output(output, &rendered)
            }
        }
    }

    /// Read a resolver configuration file
    pub fn load_config(path: &Path) -> Result<ResolverConfig> {
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        ResolverConfig::from_json(&text)
            .with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    /// Read a workspace fact file
    pub fn read_workspace(&self, path: &Path) -> Result<MemoryWorkspace> {
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read fact file '{}': {}", path.display(), e))?;
        MemoryWorkspace::from_json(&text)
            .with_context(|| format!("Invalid fact file '{}'", path.display()))
    }

    /// Import the named types (or all types) of one project into a new diagram
    pub fn import_command(
        &self,
        facts: &Path,
        project: Option<&str>,
        types: &[String],
    ) -> Result<Diagram> {
        let workspace = self.read_workspace(facts)?;
        let (name, index) = open_project(&workspace, project)?;
        info!(project = %name, "Importing from project");

        let handles = select_types(&index, types)?;
        let mut diagram = Diagram::new();
        import_types(
            &mut diagram,
            &*index,
            &self.config,
            &handles,
            Position::default(),
        );
        Ok(diagram)
    }

    /// Import everything from `before`, resync `entity` against `after`, undo
    pub fn resync_command(
        &self,
        before: &Path,
        after: &Path,
        entity: &str,
        project: Option<&str>,
    ) -> Result<ResyncReport> {
        let mut diagram = self.import_command(before, project, &[])?;
        let original = diagram.clone();

        let id = diagram
            .entity_by_identity(entity)
            .ok_or_else(|| anyhow!("Entity '{}' is not on the diagram", entity))?;

        let workspace = self.read_workspace(after)?;
        let sync = Synchronizer::new(&workspace, Rc::new(self.config.clone()));
        let mut stack = CommandStack::new();
        let replaced = sync.synchronize(&mut stack, &mut diagram, &[id])?;
        let view = DiagramView::new(&diagram);

        if stack.can_undo() {
            stack.undo(&mut diagram)?;
        }
        let round_trip = diagram == original;
        debug!(replaced, round_trip, "Resync finished");

        Ok(ResyncReport {
            entity: entity.to_string(),
            replaced,
            diagram: view,
            round_trip,
        })
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for UmlsyncApp {
    fn default() -> Self {
        Self::new()
    }
}

/// The named project, or the active one; it must be open
fn open_project(
    workspace: &MemoryWorkspace,
    project: Option<&str>,
) -> Result<(String, Rc<MemoryIndex>)> {
    let name = match project.or_else(|| workspace.active_project_name()) {
        Some(name) => name.to_string(),
        None => match workspace.project_names().as_slice() {
            [only] => only.clone(),
            _ => return Err(anyhow!("No project given and no active project set")),
        },
    };
    if workspace.project(&name).is_none() {
        return Err(anyhow!("Project '{}' is unknown or closed", name));
    }
    let index = workspace
        .index(&name)
        .ok_or_else(|| anyhow!("Project '{}' is unknown", name))?;
    Ok((name, index))
}

/// Handles for the requested names with their nested types, or every type
fn select_types(index: &MemoryIndex, names: &[String]) -> Result<Vec<Rc<dyn TypeHandle>>> {
    if names.is_empty() {
        let mut handles = Vec::new();
        for name in index.type_names() {
            if let Some(handle) = index.find_type(&name)? {
                handles.push(handle);
            }
        }
        return Ok(handles);
    }

    let mut seen = HashSet::new();
    let mut handles = Vec::new();
    for name in names {
        let handle = index
            .find_type(name)?
            .ok_or_else(|| anyhow!("Type '{}' not found", name))?;
        for t in collect_types(handle) {
            if seen.insert(t.qualified_name().to_string()) {
                handles.push(t);
            }
        }
    }
    Ok(handles)
}

/// Plain-text listing: entities with members, then connections
pub fn render_text(diagram: &Diagram) -> String {
    let view = DiagramView::new(diagram);
    let mut out = String::new();

    for entity in &view.entities {
        out.push_str(&format!("{} {}\n", entity.kind, entity.name));
        for member in &entity.members {
            let line = match member {
                Member::Attribute(attr) => format!(
                    "  {}{}: {}{}",
                    attr.visibility.to_char(),
                    attr.name,
                    attr.type_ref,
                    if attr.is_static { " {static}" } else { "" }
                ),
                Member::Operation(op) => {
                    let params: Vec<String> = op
                        .params
                        .iter()
                        .map(|p| format!("{}: {}", p.name, p.type_ref))
                        .collect();
                    format!(
                        "  {}{}({}): {}{}",
                        op.visibility.to_char(),
                        op.name,
                        params.join(", "),
                        op.return_type,
                        if op.is_abstract { " {abstract}" } else { "" }
                    )
                }
            };
            out.push_str(&line);
            out.push('\n');
        }
    }

    if diagram.connection_count() > 0 {
        out.push('\n');
    }
    for (_, connection) in diagram.connections() {
        let name_of = |id| {
            diagram
                .entity(id)
                .map(|e| e.name.as_str())
                .unwrap_or("?")
        };
        out.push_str(&format!(
            "{} {} {}\n",
            name_of(connection.source),
            connection.kind.arrow(),
            name_of(connection.target)
        ));
    }
    out
}

fn render_report(report: &ResyncReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Synchronized {} ({} replaced)\n\n",
        report.entity, report.replaced
    ));
    for entity in &report.diagram.entities {
        out.push_str(&format!("{} {}\n", entity.kind, entity.name));
    }
    if !report.diagram.connections.is_empty() {
        out.push('\n');
    }
    for connection in &report.diagram.connections {
        out.push_str(&format!(
            "{} {} {}\n",
            connection.source, connection.kind, connection.target
        ));
    }
    out.push_str(&format!(
        "\nUndo round-trip: {}\n",
        if report.round_trip { "ok" } else { "differs" }
    ));
    out
}
