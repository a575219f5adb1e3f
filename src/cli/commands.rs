//! Command dispatch: loads the lineage and answers one query

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{Lineage, LineageBuilder};
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli, settings: &Settings) -> CliResult<()> {
    match &cli.command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { template } => {
            if *template {
                output::info(&Settings::template());
            } else {
                output::header("# effective settings");
                output::info(&settings.to_toml()?);
            }
            Ok(())
        }
        command => {
            let lineage = load_lineage(cli, settings)?;
            output::info(&evaluate(command, &lineage, settings)?);
            Ok(())
        }
    }
}

#[instrument(level = "debug", skip(settings))]
fn load_lineage(cli: &Cli, settings: &Settings) -> CliResult<Lineage> {
    let path = cli
        .file
        .clone()
        .or_else(|| settings.lineage_file.clone())
        .ok_or_else(|| {
            CliError::Usage("no lineage file: pass --file or set lineage_file".to_string())
        })?;
    debug!("lineage file: {}", path.display());
    Ok(LineageBuilder::from_path(&path)?)
}

/// Answers a query command against a loaded lineage.
#[instrument(level = "debug", skip(lineage, settings))]
pub fn evaluate(command: &Commands, lineage: &Lineage, settings: &Settings) -> CliResult<String> {
    let tree = lineage.tree();
    let answer = match command {
        Commands::Tree => lineage.render(),
        Commands::Depth { name } => tree.depth_from_root(lineage.require(name)?)?.to_string(),
        Commands::Senior { first, second } => tree
            .is_more_senior_than(lineage.require(first)?, lineage.require(second)?)?
            .to_string(),
        Commands::Find { name } => match lineage.find(name)? {
            Some(idx) => tree.node(idx)?.vampire.to_string(),
            None => format!("{name}: not found"),
        },
        Commands::Descendants { name } => tree
            .total_descendant_count(lineage.require(name)?)?
            .to_string(),
        Commands::Offspring { name } => tree
            .number_of_offspring(lineage.require(name)?)?
            .to_string(),
        Commands::ConvertedAfter { name, year } => {
            let start = match name {
                Some(name) => lineage.require(name)?,
                None => lineage.root(),
            };
            let year = year.unwrap_or(settings.millennial_year);
            tree.collect_converted_after(start, year)?
                .into_iter()
                .filter_map(|idx| tree.get(idx))
                .map(|node| node.vampire.to_string())
                .join("\n")
        }
        Commands::Ancestor { candidate, name } => tree
            .is_ancestor_of(lineage.require(candidate)?, lineage.require(name)?)?
            .to_string(),
        Commands::CommonAncestor { first, second } => {
            let ancestor = tree
                .closest_common_ancestor(lineage.require(first)?, lineage.require(second)?)?;
            lineage.name_of(ancestor).to_string()
        }
        Commands::Config { .. } | Commands::Completion { .. } => {
            return Err(CliError::Usage(
                "command does not query a lineage".to_string(),
            ))
        }
    };
    Ok(answer)
}
