//! `phasenav` command line
//!
//! Offline access to the pure layers: print the default navigation of a
//! phase, merge a stored navigation document onto it, or classify a raw
//! document tree exported as JSON.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use phasenav_core::EngineConfig;
use phasenav_hierarchy::{adapt_tree, AdaptedTree, RawNode};
use phasenav_merge::NavigationMergeEngine;
use phasenav_model::{NavigationDocument, Phase, StructureVersion};
use phasenav_structure::StructureDefinition;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

fn cli() -> Command {
    let phase = Arg::new("phase")
        .long("phase")
        .value_parser(value_parser!(Phase))
        .help("Phase id, title or folder name (defaults to the configured phase)");
    let structure = Arg::new("structure")
        .long("structure")
        .help("Structure version: v1 or v2 (defaults to the configured version)");

    Command::new("phasenav")
        .version(phasenav_core::VERSION)
        .about("Phase navigation defaults, merges and document-tree classification")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("defaults")
                .about("Print the default navigation of a phase")
                .arg(phase.clone())
                .arg(structure.clone())
                .arg(
                    Arg::new("locked")
                        .long("locked")
                        .action(ArgAction::SetTrue)
                        .help("Print the locked folder names instead"),
                ),
        )
        .subcommand(
            Command::new("merge")
                .about("Merge a stored navigation document onto the defaults")
                .arg(
                    Arg::new("stored")
                        .long("stored")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Stored navigation document (JSON)"),
                )
                .arg(phase)
                .arg(structure),
        )
        .subcommand(
            Command::new("classify")
                .about("Classify a raw document tree")
                .arg(
                    Arg::new("tree")
                        .long("tree")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Raw tree (JSON node or array of nodes)"),
                )
                .arg(Arg::new("site").long("site").help("Site node name")),
        )
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    setup_tracing(matches.get_flag("json-logs"));

    let config = load_config(matches.get_one::<PathBuf>("config"))?;
    debug!(?config, "configuration loaded");

    let output = match matches.subcommand() {
        Some(("defaults", args)) => {
            let definition = definition(&config, args);
            if args.get_flag("locked") {
                serde_json::to_value(definition.locked_folder_names())?
            } else {
                serde_json::to_value(definition.navigation())?
            }
        }
        Some(("merge", args)) => {
            let stored = read_json(required_path(args, "stored")?)?;
            serde_json::to_value(merge_stored(stored, definition(&config, args))?)?
        }
        Some(("classify", args)) => {
            let raw = read_json(required_path(args, "tree")?)?;
            let site = args
                .get_one::<String>("site")
                .map_or(config.site_name.as_str(), String::as_str);
            let tree = classify_tree(raw, site, &config)?;
            for diagnostic in &tree.diagnostics {
                warn!(?diagnostic, "tree diagnostic");
            }
            serde_json::to_value(tree)?
        }
        _ => return Ok(()),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn setup_tracing(json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let config = EngineConfig::load(path).with_context(|| format!("loading {}", path.display()))?;
            info!(path = %path.display(), "configuration file loaded");
            Ok(config)
        }
        None => Ok(EngineConfig::new().with_env_overrides()?),
    }
}

fn definition(config: &EngineConfig, args: &ArgMatches) -> StructureDefinition {
    let phase = args.get_one::<Phase>("phase").copied().unwrap_or(config.default_phase);
    let version = args
        .get_one::<String>("structure")
        .map_or(config.default_version, |s| StructureVersion::parse_lenient(s));
    StructureDefinition::new(phase, version)
}

fn required_path<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a Path> {
    args.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .with_context(|| format!("--{name} is required"))
}

fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Merge a stored document, phase taken from the definition
fn merge_stored(stored: Value, definition: StructureDefinition) -> Result<NavigationDocument> {
    let mut doc: NavigationDocument = serde_json::from_value(stored).context("stored navigation document")?;
    doc.phase = definition.phase();
    Ok(NavigationMergeEngine::new().get_navigation(Some(&doc), definition))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTree {
    Forest(Vec<RawNode>),
    Node(Box<RawNode>),
}

fn classify_tree(raw: Value, site: &str, config: &EngineConfig) -> Result<AdaptedTree> {
    let roots = match serde_json::from_value(raw).context("raw document tree")? {
        RawTree::Forest(roots) => roots,
        RawTree::Node(node) => vec![*node],
    };
    Ok(adapt_tree(site, &roots, &config.classify_options()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasenav_hierarchy::NodeKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn phase_and_structure_flags_override_config() {
        let matches = cli().get_matches_from(["phasenav", "defaults", "--phase", "02 - Produktion", "--structure", "2"]);
        let (_, args) = matches.subcommand().unwrap();
        let def = definition(&EngineConfig::new(), args);
        assert_eq!(def.phase(), Phase::Produktion);
        assert_eq!(def.version(), StructureVersion::V2);
    }

    #[test]
    fn missing_flags_fall_back_to_config() {
        let config = EngineConfig::new().with_default_phase(Phase::Avslut);
        let matches = cli().get_matches_from(["phasenav", "defaults"]);
        let (_, args) = matches.subcommand().unwrap();
        let def = definition(&config, args);
        assert_eq!(def.phase(), Phase::Avslut);
        assert_eq!(def.version(), config.default_version);
    }

    #[test]
    fn unknown_phase_is_rejected() {
        let result = cli().try_get_matches_from(["phasenav", "defaults", "--phase", "nope"]);
        assert!(result.is_err());
    }

    #[test]
    fn merge_keeps_stored_extras() {
        let stored = json!({
            "sections": [{"id": "kalkyl", "name": "stale", "order": 99, "color": "teal", "items": []}],
            "version": 3
        });
        let def = StructureDefinition::new(Phase::Kalkylskede, StructureVersion::V1);
        let merged = merge_stored(stored, def).unwrap();

        assert!(!merged.is_default);
        assert_eq!(merged.sections.len(), def.section_ids().len());
        let kalkyl = merged.section("kalkyl").unwrap();
        assert_eq!(kalkyl.extra.get("color"), Some(&json!("teal")));
        assert_eq!(kalkyl.name, def.section("kalkyl").unwrap().name);
    }

    #[test]
    fn classify_accepts_single_node_or_forest() {
        let node = json!({"name": "01 - Kalkylskede", "type": "folder", "children": [
            {"name": "825-10 Projektnamn", "type": "folder"}
        ]});
        let config = EngineConfig::new();

        let single = classify_tree(node.clone(), "Site", &config).unwrap();
        let forest = classify_tree(json!([node]), "Site", &config).unwrap();
        assert_eq!(single, forest);
        assert_eq!(single.root.name, "Site");
        assert_eq!(single.root.children[0].kind, NodeKind::Main);
    }

    #[test]
    fn config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phasenav.toml");
        std::fs::write(&path, "site_name = \"Bygg\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.site_name, "Bygg");
    }
}
