//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{directory_node, load_document, IoResultExt, TreeController, TreeOptions};
use crate::cli::args::{Cli, Commands, ConfigCommands, NodePath, Script};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render::{node_label, TreeNodeConvert};
use crate::config::{global_config_path, Settings};
use crate::domain::{NodeId, NodeRef};

/// Origin of a scripted interaction, forwarded to callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEvent {
    Flag(&'static str, NodePath),
    ExpandAll,
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show { file, script }) => cmd_show(cli, file, script),
        Some(Commands::Browse { dir, script }) => cmd_browse(cli, dir.as_deref(), script),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "yatree", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage("no command given, see --help".into())),
    }
}

/// Layered settings plus command line overrides.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(key) = &cli.children_key {
        settings.children_key = key.clone();
    }
    if cli.expanded {
        settings.collapse_by_default = false;
    }
    settings.validate()?;
    debug!(?settings, "effective settings");
    Ok(settings)
}

#[instrument(skip(cli, script))]
fn cmd_show(cli: &Cli, file: &Path, script: &Script) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let root = load_document(file)?;
    present(root, settings, script)
}

#[instrument(skip(cli, script))]
fn cmd_browse(cli: &Cli, dir: Option<&Path>, script: &Script) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().with_path_context("resolve cwd", Path::new("."))?,
    };
    if !dir.is_dir() {
        return Err(CliError::InvalidArgs(format!(
            "not a directory: {}",
            dir.display()
        )));
    }
    let root = directory_node(&dir, &settings);
    present(root, settings, script)
}

fn present(root: NodeRef, settings: Settings, script: &Script) -> CliResult<()> {
    for row in render(root, settings, script)? {
        output::info(&row);
    }
    Ok(())
}

/// Build the view for `root`, apply `script` and render one text block per root.
pub fn render(root: NodeRef, settings: Settings, script: &Script) -> CliResult<Vec<String>> {
    let mut ctl = TreeController::new(&root, reporting_options(settings))?;
    run_script(&mut ctl, script)?;
    Ok(ctl
        .to_tree_strings()
        .iter()
        .map(|tree| tree.to_string().trim_end().to_string())
        .collect())
}

/// Options whose callbacks report each transition on stderr.
pub fn reporting_options(settings: Settings) -> TreeOptions<ScriptEvent> {
    TreeOptions::<ScriptEvent>::new(settings)
        .on_expand(|ctl, event, id| report(ctl, "expanded", event, id))
        .on_collapse(|ctl, event, id| report(ctl, "collapsed", event, id))
        .on_select(|ctl, event, id| report(ctl, "selected", event, id))
        .on_dbl_click(|ctl, event, id| report(ctl, "double-clicked", event, id))
}

fn report(ctl: &mut TreeController<ScriptEvent>, verb: &str, event: &ScriptEvent, id: NodeId) {
    debug!(?event, verb, "callback");
    if let Some(node) = ctl.node(id) {
        output::action(verb, &node_label(ctl.settings(), node));
    }
}

/// Apply `script` in order: expand-all, expand, collapse, double-click, select.
pub fn run_script(ctl: &mut TreeController<ScriptEvent>, script: &Script) -> CliResult<()> {
    if script.all {
        ctl.expand_all(&ScriptEvent::ExpandAll)?;
    }
    for path in &script.expand {
        let id = lookup(ctl, path)?;
        ctl.expand(&ScriptEvent::Flag("expand", path.clone()), id)?;
    }
    for path in &script.collapse {
        let id = lookup(ctl, path)?;
        ctl.collapse(&ScriptEvent::Flag("collapse", path.clone()), id);
    }
    for path in &script.dbl_click {
        let id = lookup(ctl, path)?;
        ctl.dbl_click(&ScriptEvent::Flag("dbl-click", path.clone()), id);
    }
    if let Some(path) = &script.select {
        let id = lookup(ctl, path)?;
        ctl.select_node(&ScriptEvent::Flag("select", path.clone()), id);
    }
    Ok(())
}

fn lookup<E>(ctl: &TreeController<E>, path: &NodePath) -> CliResult<NodeId> {
    ctl.find_by_path(&path.0).ok_or_else(|| {
        CliError::InvalidArgs(format!(
            "no node at path {path} (expand its ancestors first)"
        ))
    })
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::header("Effective settings");
            output::info(settings.to_toml()?.trim_end());
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available on this platform"),
        },
    }
    Ok(())
}
