/*
 * api-boundary CLI
 *
 * Diagnostic front end over the boundary resolution policy.
 *
 * Usage:
 *   api-boundary describe lib-1.0.jar lib-2.0.jar
 *   api-boundary --mode platform-only check lib.jar org.foo.A 'org.foo.A$Inner'
 *   api-boundary --config boundary.yaml --format json describe lib.jar
 *
 * Exit code is non-zero on any resolution error.
 */

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use api_boundary::features::module_descriptor::JarReader;
use api_boundary::{
    ApiBoundary, ApiBoundaryConfig, ApiBoundaryExt, Archive, BoundaryError,
    BoundaryResolutionPolicy, ElementKind, ElementNode, ModuleSystemMode, TypeKind, Visibility,
};

#[derive(Parser, Debug)]
#[command(name = "api-boundary", version, about = "Resolve the API surface of jars")]
struct Cli {
    /// Module system mode (mixed, platform-only, proprietary-only)
    #[arg(long, global = true)]
    mode: Option<ModuleSystemMode>,

    /// Regex of directed-export target modules to ignore (repeatable)
    #[arg(long = "exclude-target", global = true)]
    exclude_targets: Vec<String>,

    /// YAML configuration file (version 1)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log every resolution step
    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved boundary of each jar
    Describe {
        #[arg(required = true)]
        jars: Vec<PathBuf>,
    },
    /// Print whether each type is API
    Check {
        jar: PathBuf,
        /// Fully-qualified type names; nested types as `Outer$Inner` or `Outer.Inner`
        #[arg(required = true)]
        types: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<BoundaryError>() {
                Some(boundary_err) => eprintln!("error[{}]: {:#}", boundary_err.kind(), err),
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<ApiBoundaryConfig> {
    let mut config = match &cli.config {
        Some(path) => ApiBoundaryConfig::from_yaml(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ApiBoundaryConfig::default(),
    };
    if let Some(mode) = cli.mode {
        config.module_system_mode = mode;
    }
    config
        .excluded_platform_export_targets
        .extend(cli.exclude_targets.iter().cloned());
    config.verbose_logging |= cli.verbose;
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let policy = BoundaryResolutionPolicy::from_config(&config)?;

    match &cli.command {
        Command::Describe { jars } => {
            for jar in jars {
                let archive = Archive::from_path(jar);
                let boundary = policy.resolve_archive_boundary(&archive)?;
                print_description(cli.format, &archive, boundary.as_ref());
            }
        }
        Command::Check { jar, types } => {
            let archive = Archive::from_path(jar);
            let boundary = policy.resolve_archive_boundary(&archive)?;
            let classes = class_entries(&archive)?;
            for name in types {
                let element = type_element(&archive, &binary_name(name, &classes));
                let is_api = boundary.is_api_element(element.as_ref())?;
                print_verdict(cli.format, name, is_api);
            }
        }
    }
    Ok(())
}

/// Class entry names of the jar (`org/foo/A$Inner.class`)
fn class_entries(archive: &Archive) -> anyhow::Result<HashSet<String>> {
    let jar = JarReader::open(archive)?;
    Ok(jar
        .entry_names()
        .into_iter()
        .filter(|entry| entry.ends_with(".class"))
        .collect())
}

/// Rewrite a `.`-nested name (`org.foo.A.Inner`) into its binary form
/// (`org.foo.A$Inner`) when the jar has a matching class entry.
///
/// The longest package split is tried first, so a real top-level type wins.
/// Names already using `$`, or without any match, are returned unchanged.
fn binary_name(name: &str, classes: &HashSet<String>) -> String {
    if name.contains('$') {
        return name.to_string();
    }
    let segments: Vec<&str> = name.split('.').collect();
    for package_len in (0..segments.len()).rev() {
        let (package, types) = segments.split_at(package_len);
        let entry = match package {
            [] => format!("{}.class", types.join("$")),
            _ => format!("{}/{}.class", package.join("/"), types.join("$")),
        };
        if classes.contains(&entry) {
            let nested = types.join("$");
            return match package {
                [] => nested,
                _ => format!("{}.{}", package.join("."), nested),
            };
        }
    }
    name.to_string()
}

/// `org.foo.A$Inner$Deep` as a nested element chain under `org.foo.A`
fn type_element(archive: &Archive, name: &str) -> std::sync::Arc<ElementNode> {
    let mut segments = name.split('$');
    let top_level = segments.next().unwrap_or(name);
    let mut node = ElementNode::top_level_type(Some(archive.name()), top_level, TypeKind::Class);
    for nested in segments.filter(|s| !s.is_empty()) {
        node = ElementNode::child(&node, ElementKind::Type(TypeKind::Class), nested, Visibility::Public);
    }
    node
}

fn print_description(format: OutputFormat, archive: &Archive, boundary: &dyn ApiBoundary) {
    match format {
        OutputFormat::Text => println!("{}: {}", archive.name(), boundary),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "archive": archive.name(),
                "kind": boundary.kind().as_str(),
                "module": boundary.module_name(),
                "empty": boundary.is_empty(),
                "description": boundary.to_string(),
            })
        ),
    }
}

fn print_verdict(format: OutputFormat, type_name: &str, is_api: bool) {
    let verdict = if is_api { "api" } else { "internal" };
    match format {
        OutputFormat::Text => println!("{}\t{}", type_name, verdict),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "type": type_name, "verdict": verdict })
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_boundary::testing::{JarBuilder, ModuleInfoBuilder};
    use api_boundary::Element;

    fn classes(entries: &[&str]) -> HashSet<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_dotted_nested_name_uses_class_entries() {
        let classes = classes(&["org/foo/A.class", "org/foo/A$Inner.class", "org/foo/A$Inner$Deep.class"]);
        assert_eq!(binary_name("org.foo.A.Inner", &classes), "org.foo.A$Inner");
        assert_eq!(binary_name("org.foo.A.Inner.Deep", &classes), "org.foo.A$Inner$Deep");
        assert_eq!(binary_name("org.foo.A", &classes), "org.foo.A");
        assert_eq!(binary_name("org.foo.A$Inner", &classes), "org.foo.A$Inner");
    }

    #[test]
    fn test_top_level_type_wins_over_nested_reading() {
        let classes = classes(&["org/foo/A/Inner.class", "org/foo/A$Inner.class"]);
        assert_eq!(binary_name("org.foo.A.Inner", &classes), "org.foo.A.Inner");
    }

    #[test]
    fn test_unknown_name_is_unchanged() {
        assert_eq!(binary_name("org.foo.Missing.Inner", &classes(&[])), "org.foo.Missing.Inner");
        assert_eq!(binary_name("Main", &classes(&["Main.class"])), "Main");
    }

    #[test]
    fn test_dotted_nested_type_shares_outer_verdict() {
        let archive = JarBuilder::new()
            .module_info(ModuleInfoBuilder::new("org.foo").exports("org.foo"))
            .class("org.foo.A")
            .entry("org/foo/A$Inner.class", vec![0xCA, 0xFE, 0xBA, 0xBE])
            .to_archive("foo.jar")
            .unwrap();
        let policy = BoundaryResolutionPolicy::from_config(&ApiBoundaryConfig::default()).unwrap();
        let boundary = policy.resolve_archive_boundary(&archive).unwrap();

        let classes = class_entries(&archive).unwrap();
        let element = type_element(&archive, &binary_name("org.foo.A.Inner", &classes));
        assert_eq!(element.canonical_name(), "org.foo.A.Inner");
        assert!(element.parent().unwrap().is_declared_type());
        assert!(boundary.is_api_element(element.as_ref()).unwrap());
    }
}
