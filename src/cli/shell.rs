//! Line-oriented editing session used by `shell` and `run`.

use std::io::BufRead;
use std::path::PathBuf;

use clap::error::ErrorKind;
use itertools::Itertools;
use tracing::{debug, info, instrument};

use crate::application::services::{ExportService, NodeDetails, TreeSession};
use crate::application::ApplicationError;
use crate::cli::args::{ShellCommand, ShellLine};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::domain::{Node, NodeId, NodeTypeRegistry, TopologyChange};
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;

/// Whether the session keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Outcome of a script run with `--keep-going`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    pub executed: usize,
    /// Line numbers (1-based) that failed
    pub failed: Vec<usize>,
}

pub struct ShellSession {
    session: TreeSession,
    exports: ExportService,
}

impl ShellSession {
    pub fn new(mut session: TreeSession, exports: ExportService) -> Self {
        session.subscribe(Box::new(|change: &TopologyChange| {
            info!(
                "topology {} -> {} nodes, {} -> {} edges",
                change.before.nodes, change.after.nodes, change.before.edges, change.after.edges
            );
        }));
        Self { session, exports }
    }

    pub fn session(&self) -> &TreeSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TreeSession {
        &mut self.session
    }

    /// Execute one parsed command.
    #[instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, command: ShellCommand) -> CliResult<Flow> {
        match command {
            ShellCommand::Root { node_type } => {
                let id = self.session.add_root(&node_type)?;
                output::action("Added", &format!("{} {}", node_type, id));
            }
            ShellCommand::Child { node_type, parent } => {
                let parent = self.session.resolve_target(parent.map(NodeId::from).as_ref())?;
                let id = self.session.add_child(Some(&parent), &node_type)?;
                output::action("Added", &format!("{} {} under {}", node_type, id, parent));
            }
            ShellCommand::Delete { id } => {
                let id = id.map(NodeId::from);
                let removed = self.session.delete(id.as_ref())?;
                if let Some(first) = removed.first() {
                    output::action(
                        "Deleted",
                        &format!("{} (& {} children)", first, removed.len() - 1),
                    );
                }
            }
            ShellCommand::Select { id } => {
                let node = self.session.select(&NodeId::from(id))?;
                output::action("Selected", &label(node));
            }
            ShellCommand::Clear => {
                self.session.clear_selection();
                output::success("Selection cleared");
            }
            ShellCommand::Show { id } => {
                let target = self.session.resolve_target(id.map(NodeId::from).as_ref())?;
                let details = self.session.inspect(&target)?;
                print_details(&details);
            }
            ShellCommand::Children { id } => {
                let id = NodeId::from(id);
                let store = self.session.store();
                store.node(&id).map_err(ApplicationError::from)?;
                let children = store.children_of(&id);
                if children.is_empty() {
                    output::detail("no children");
                }
                for child in children {
                    output::info(&label(child));
                }
            }
            ShellCommand::Tree => {
                output::info(&self.session.store().to_tree_string());
            }
            ShellCommand::Types => print_types(self.session.store().registry()),
            ShellCommand::Layout => {
                output::header(&format!("Layout ({})", self.session.direction()));
                for node in self.session.store().nodes() {
                    output::detail(&format!(
                        "{:<12} {:<12} ({:.1}, {:.1})",
                        node.id.as_str(),
                        node.node_type,
                        node.position.x,
                        node.position.y
                    ));
                }
            }
            ShellCommand::Status => {
                let (_, summary) = self.exports.preview(self.session.store())?;
                let selected = self
                    .session
                    .selected()
                    .map(label)
                    .unwrap_or_else(|| "none".to_string());
                output::header("Status");
                output::detail(&format!("nodes:    {}", summary.total_nodes));
                output::detail(&format!("edges:    {}", summary.total_edges));
                output::detail(&format!("selected: {}", selected));
                output::detail(&format!("export:   {:.1} KB", summary.size_kb()));
            }
            ShellCommand::Json => {
                let (json, _) = self.exports.preview(self.session.store())?;
                output::info(&json);
            }
            ShellCommand::Export { path } => {
                let summary = self.exports.write(self.session.store(), path.as_deref())?;
                let path = summary.path.clone().unwrap_or_else(PathBuf::new);
                output::action("Exported", &path.display());
                output::detail(&format!(
                    "{} nodes, {} edges, {:.1} KB",
                    summary.total_nodes,
                    summary.total_edges,
                    summary.size_kb()
                ));
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Read commands until end of input or `quit`. Failing commands are
    /// reported and the session continues.
    pub fn run_interactive(&mut self, input: impl BufRead) -> CliResult<()> {
        output::prompt("loantree>");
        for line in input.lines() {
            let line = line.map_err(|e| InfraError::io("read session input", e))?;
            match ShellLine::parse_line(&line) {
                Ok(None) => {}
                Ok(Some(command)) => match self.execute(command) {
                    Ok(Flow::Quit) => return Ok(()),
                    Ok(Flow::Continue) => {}
                    Err(e) => output::error(&e),
                },
                Err(e) => {
                    let _ = e.print();
                }
            }
            output::prompt("loantree>");
        }
        println!();
        Ok(())
    }

    /// Execute a script. Stops at the first failing line unless `keep_going`.
    #[instrument(level = "debug", skip(self, input))]
    pub fn run_script(&mut self, input: impl BufRead, keep_going: bool) -> CliResult<ScriptReport> {
        let mut report = ScriptReport::default();
        for (index, line) in input.lines().enumerate() {
            let line_no = index + 1;
            let line =
                line.map_err(|e| InfraError::io(format!("read script line {line_no}"), e))?;

            let result = match ShellLine::parse_line(&line) {
                Ok(None) => continue,
                Ok(Some(command)) => self.execute(command),
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::DisplayHelp
                            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                    ) =>
                {
                    let _ = e.print();
                    continue;
                }
                Err(e) => Err(CliError::Usage(first_line(&e.to_string()))),
            };
            report.executed += 1;

            match result {
                Ok(Flow::Quit) => {
                    debug!("quit at line {}", line_no);
                    break;
                }
                Ok(Flow::Continue) => {}
                Err(e) if keep_going => {
                    output::error(&format!("line {}: {}", line_no, e));
                    report.failed.push(line_no);
                }
                Err(e) => {
                    return Err(CliError::Script {
                        line: line_no,
                        message: e.to_string(),
                    })
                }
            }
        }
        Ok(report)
    }
}

fn first_line(message: &str) -> String {
    message
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_string()
}

fn label(node: &Node) -> String {
    format!("{} {}", node.node_type, node.id)
}

fn print_details(details: &NodeDetails) {
    output::header(&label(&details.node));
    if details.ancestors.is_empty() {
        output::detail("path:        root");
    } else {
        output::detail(&format!(
            "path:        {} > {}",
            details.ancestors.iter().rev().join(" > "),
            details.node.id
        ));
    }
    output::detail(&format!(
        "children:    {} direct, {} descendants",
        details.children.len(),
        details.descendant_count
    ));
    for child in &details.children {
        output::detail(&format!("  - {}", label(child)));
    }
    if details.can_have_children() {
        output::detail(&format!(
            "can add:     {}",
            details.node_type.allowed_children.iter().join(", ")
        ));
    } else {
        output::detail("can add:     no children allowed");
    }
    output::detail(&format!(
        "can be root: {}",
        if details.node_type.can_be_root { "yes" } else { "no" }
    ));
    if !details.node_type.description.is_empty() {
        output::detail(&details.node_type.description);
    }
}

/// Print every registered type with its containment rules.
pub fn print_types(registry: &NodeTypeRegistry) {
    for node_type in registry.types() {
        output::header(&node_type.name);
        let children = if node_type.allowed_children.is_empty() {
            "none".to_string()
        } else {
            node_type.allowed_children.iter().join(", ")
        };
        output::detail(&format!("children: {}", children));
        output::detail(&format!(
            "root:     {}",
            if node_type.can_be_root { "yes" } else { "no" }
        ));
        if !node_type.description.is_empty() {
            output::detail(&node_type.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_clap_error_text_when_taking_first_line_then_prefix_stripped() {
        let text = "error: unrecognized subcommand 'frob'\n\nUsage: loantree <COMMAND>";
        assert_eq!(first_line(text), "unrecognized subcommand 'frob'");
    }
}
