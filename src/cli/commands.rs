//! Command dispatch for the top-level subcommands

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::shell::{print_types, ShellSession};
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::SequentialIdGenerator;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Shell { sequential_ids }) => {
            let mut shell = open_session(cli, *sequential_ids)?;
            shell.run_interactive(io::stdin().lock())
        }
        Some(Commands::Run {
            script,
            sequential_ids,
            keep_going,
        }) => {
            let mut shell = open_session(cli, *sequential_ids)?;
            cmd_run(&mut shell, script, *keep_going)
        }
        Some(Commands::Types) => {
            let container = create_container(cli)?;
            print_types(&container.registry);
            Ok(())
        }
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| InfraError::io("print help", e))?;
            Ok(())
        }
    }
}

fn create_container(cli: &Cli) -> CliResult<ServiceContainer> {
    let settings = Settings::load(cli.config.as_deref())?;
    Ok(ServiceContainer::new(settings)?)
}

fn open_session(cli: &Cli, sequential_ids: bool) -> CliResult<ShellSession> {
    let container = create_container(cli)?;
    let session = if sequential_ids {
        container.session_with_ids(Box::new(SequentialIdGenerator::new(
            container.settings.ids.prefix.clone(),
        )))
    } else {
        container.session()
    };
    Ok(ShellSession::new(session, container.export_service()))
}

#[instrument(level = "debug", skip(shell))]
fn cmd_run(shell: &mut ShellSession, script: &Path, keep_going: bool) -> CliResult<()> {
    let report = if script == Path::new("-") {
        shell.run_script(io::stdin().lock(), keep_going)?
    } else {
        let file = File::open(script)
            .map_err(|e| InfraError::io(format!("open script {}", script.display()), e))?;
        shell.run_script(BufReader::new(file), keep_going)?
    };
    debug!("executed {} command(s)", report.executed);

    match report.failed.as_slice() {
        [] => Ok(()),
        [line, ..] => Err(CliError::Script {
            line: *line,
            message: format!("{} of {} command(s) failed", report.failed.len(), report.executed),
        }),
    }
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path()
                .ok_or_else(|| CliError::Usage("cannot determine config directory".into()))?;
            let fs = RealFileSystem;
            if fs.exists(&path) && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }
            fs.ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            fs.write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "exists" } else { "not found" };
                    output::info(&format!("global: {} ({})", path.display(), state));
                }
                None => output::warning("cannot determine config directory"),
            }
            if let Some(path) = &cli.config {
                output::info(&format!("explicit: {}", path.display()));
            }
            Ok(())
        }
    }
}
