//! Command-line interface for wirecfg.

use clap::{Parser, Subcommand, ValueEnum};
use console::style;

use crate::env::Environment;
use crate::error::{LoaderError, Result};
use crate::reader::{CollectingEventListener, DefinitionLoader};
use crate::resource::FsResourceLoader;

/// wirecfg - Load and inspect declarative wiring configuration.
#[derive(Parser)]
#[command(name = "wirecfg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load wiring documents and report the resulting registry.
    Load {
        /// Document locations (relative to the current directory).
        #[arg(required = true)]
        files: Vec<String>,

        /// Activate a profile (repeatable).
        #[arg(short, long = "profile")]
        profiles: Vec<String>,

        /// Set a placeholder property as key=value (repeatable).
        #[arg(short, long = "define", value_parser = parse_define)]
        defines: Vec<(String, String)>,

        /// Dump the registry after loading.
        #[arg(long, value_enum)]
        dump: Option<DumpFormat>,

        /// Treat any reported problem as a failure.
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DumpFormat {
    /// Definition names with their aliases, in registration order.
    Names,
    /// Full registry as YAML.
    Yaml,
}

/// Parse a `key=value` property definition.
fn parse_define(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Load {
            files,
            profiles,
            defines,
            dump,
            strict,
        } => load_command(&files, &profiles, &defines, dump, strict),
    }
}

/// Execute the load command.
fn load_command(
    files: &[String],
    profiles: &[String],
    defines: &[(String, String)],
    dump: Option<DumpFormat>,
    strict: bool,
) -> Result<()> {
    let mut environment = Environment::new();
    for profile in profiles {
        environment.add_active_profile(profile);
    }
    for (key, value) in defines {
        environment.set_property(key, value);
    }

    let mut loader =
        DefinitionLoader::new(FsResourceLoader::current_dir()?).with_environment(environment);
    let events = CollectingEventListener::new();
    loader.add_listener(events.clone());

    for file in files {
        let count = loader.load(file)?;
        println!(
            "{} {} ({} definition(s))",
            style("Loaded").bold(),
            style(file).cyan(),
            style(count).green()
        );
    }

    println!();
    println!(
        "Registry: {} definition(s), {} import(s) processed",
        style(loader.registry().len()).green().bold(),
        events.import_count()
    );

    let problem_count = loader.problems().len();
    if problem_count > 0 {
        println!(
            "{} {} problem(s) reported:",
            style("Warning:").yellow().bold(),
            problem_count
        );
        for problem in loader.problems() {
            println!("  {} {problem}", style("-").yellow());
        }
    }

    match dump {
        Some(DumpFormat::Names) => dump_names(&loader),
        Some(DumpFormat::Yaml) => dump_yaml(&loader)?,
        None => {}
    }

    if strict && problem_count > 0 {
        return Err(LoaderError::ProblemsReported {
            count: problem_count,
        });
    }
    Ok(())
}

fn dump_names(loader: &DefinitionLoader<FsResourceLoader>) {
    println!();
    for name in loader.registry().definition_names() {
        let aliases = loader.registry().aliases_of(name);
        if aliases.is_empty() {
            println!("{name}");
        } else {
            println!("{name} ({})", aliases.join(", "));
        }
    }
}

fn dump_yaml(loader: &DefinitionLoader<FsResourceLoader>) -> Result<()> {
    let mut mapping = serde_yaml_ng::Mapping::new();
    for name in loader.registry().definition_names() {
        if let Some(definition) = loader.registry().definition(name) {
            mapping.insert(
                serde_yaml_ng::Value::String(name.clone()),
                serde_yaml_ng::to_value(definition)?,
            );
        }
    }

    println!();
    print!("{}", serde_yaml_ng::to_string(&mapping)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_load() {
        let cli = Cli::parse_from(["wirecfg", "load", "app.xml"]);

        let Commands::Load {
            files,
            profiles,
            defines,
            dump,
            strict,
        } = cli.command;
        assert_eq!(files, vec!["app.xml"]);
        assert!(profiles.is_empty());
        assert!(defines.is_empty());
        assert!(dump.is_none());
        assert!(!strict);
    }

    #[test]
    fn test_cli_parse_load_with_options() {
        let cli = Cli::parse_from([
            "wirecfg",
            "load",
            "app.xml",
            "extra.xml",
            "--profile",
            "prod",
            "--define",
            "env=prod",
            "--dump",
            "names",
            "--strict",
        ]);

        let Commands::Load {
            files,
            profiles,
            defines,
            strict,
            ..
        } = cli.command;
        assert_eq!(files, vec!["app.xml", "extra.xml"]);
        assert_eq!(profiles, vec!["prod"]);
        assert_eq!(defines, vec![("env".to_string(), "prod".to_string())]);
        assert!(strict);
    }

    #[test]
    fn test_parse_define_rejects_missing_separator() {
        assert!(parse_define("env=prod").is_ok());
        assert!(parse_define("env").is_err());
    }
}
