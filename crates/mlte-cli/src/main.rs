//! MLTE artifact store CLI.
//!
//! Provides the `mlte` binary for structural and artifact operations against
//! any store URI (`--store`, or `MLTE_STORE_URI`). Results are printed as
//! pretty JSON on stdout; errors go to stderr with exit code 1.
//!
//! Goes through the same `create_store` factory and session contract as the
//! HTTP server, so both entry points see identical store behavior.

use std::fs;
use std::process;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use mlte_core::{
    Artifact, ArtifactType, Context, CoreError, ModelCreate, NamespaceCreate, Query,
    VersionCreate, DEFAULT_LIMIT,
};
use mlte_store::{create_store, StoreError, StoreSession};

/// MLTE artifact store client.
#[derive(Debug, Parser)]
#[command(name = "mlte", about = "Manage artifacts in an MLTE store")]
struct Cli {
    /// Store URI: memory://, local://<dir>, sqlite://<file> or http(s)://<host>.
    #[arg(long, global = true, env = "MLTE_STORE_URI", default_value = "memory://")]
    store: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Namespace operations.
    #[command(subcommand)]
    Namespace(NamespaceCommand),

    /// Model operations within a namespace.
    #[command(subcommand)]
    Model(ModelCommand),

    /// Version operations within a model.
    #[command(subcommand)]
    Version(VersionCommand),

    /// Artifact operations within a version.
    #[command(subcommand)]
    Artifact(ArtifactCommand),
}

#[derive(Debug, Subcommand)]
enum NamespaceCommand {
    Create { namespace: String },
    Read { namespace: String },
    List,
    Delete { namespace: String },
}

#[derive(Debug, Subcommand)]
enum ModelCommand {
    Create { namespace: String, model: String },
    Read { namespace: String, model: String },
    List { namespace: String },
    Delete { namespace: String, model: String },
}

#[derive(Debug, Subcommand)]
enum VersionCommand {
    Create {
        namespace: String,
        model: String,
        version: String,
    },
    Read {
        namespace: String,
        model: String,
        version: String,
    },
    List {
        namespace: String,
        model: String,
    },
    Delete {
        namespace: String,
        model: String,
        version: String,
    },
}

/// The namespace/model/version triple of an artifact command.
#[derive(Debug, Args)]
struct ContextArgs {
    namespace: String,
    model: String,
    version: String,
}

impl ContextArgs {
    fn context(&self) -> Result<Context, CoreError> {
        Context::new(&self.namespace, &self.model, &self.version)
    }
}

#[derive(Debug, Subcommand)]
enum ArtifactCommand {
    /// Write an artifact, creating it or appending a version.
    Write {
        #[command(flatten)]
        context: ContextArgs,

        /// Artifact identifier.
        #[arg(long)]
        id: String,

        /// Artifact type tag (negotiation_card, value, spec, validated_spec, report).
        #[arg(long = "type")]
        kind: ArtifactType,

        /// JSON body, or @path to read it from a file.
        #[arg(long)]
        body: String,
    },

    /// Read one artifact version (the latest by default).
    Read {
        #[command(flatten)]
        context: ContextArgs,

        id: String,

        /// Artifact version to read.
        #[arg(long = "version")]
        artifact_version: Option<u64>,
    },

    /// List the latest version of every artifact.
    List {
        #[command(flatten)]
        context: ContextArgs,

        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Search artifacts with a JSON query.
    Search {
        #[command(flatten)]
        context: ContextArgs,

        /// JSON query, or @path to read it from a file.
        #[arg(long)]
        query: String,
    },

    /// Delete every version of an artifact.
    Delete {
        #[command(flatten)]
        context: ContextArgs,

        id: String,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("cannot read {path}: {source}")]
    ReadInput {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid JSON in {what}: {source}")]
    Json {
        what: &'static str,
        source: serde_json::Error,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value, CliError> {
    serde_json::to_value(value).map_err(|source| CliError::Json {
        what: "output",
        source,
    })
}

/// Inline JSON, or the contents of a file when prefixed with `@`.
fn read_json(argument: &str, what: &'static str) -> Result<Value, CliError> {
    let text = match argument.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).map_err(|source| CliError::ReadInput {
            path: path.to_string(),
            source,
        })?,
        None => argument.to_string(),
    };
    serde_json::from_str(&text).map_err(|source| CliError::Json { what, source })
}

fn run(cli: &Cli) -> Result<Value, CliError> {
    let store = create_store(&cli.store)?;
    let mut session = store.session()?;
    execute(session.as_mut(), &cli.command)
}

fn execute(session: &mut dyn StoreSession, command: &Commands) -> Result<Value, CliError> {
    match command {
        Commands::Namespace(cmd) => match cmd {
            NamespaceCommand::Create { namespace } => {
                to_value(session.create_namespace(&NamespaceCreate::new(namespace))?)
            }
            NamespaceCommand::Read { namespace } => to_value(session.read_namespace(namespace)?),
            NamespaceCommand::List => to_value(session.list_namespaces()?),
            NamespaceCommand::Delete { namespace } => {
                to_value(session.delete_namespace(namespace)?)
            }
        },
        Commands::Model(cmd) => match cmd {
            ModelCommand::Create { namespace, model } => {
                to_value(session.create_model(namespace, &ModelCreate::new(model))?)
            }
            ModelCommand::Read { namespace, model } => {
                to_value(session.read_model(namespace, model)?)
            }
            ModelCommand::List { namespace } => to_value(session.list_models(namespace)?),
            ModelCommand::Delete { namespace, model } => {
                to_value(session.delete_model(namespace, model)?)
            }
        },
        Commands::Version(cmd) => match cmd {
            VersionCommand::Create {
                namespace,
                model,
                version,
            } => to_value(session.create_version(namespace, model, &VersionCreate::new(version))?),
            VersionCommand::Read {
                namespace,
                model,
                version,
            } => to_value(session.read_version(namespace, model, version)?),
            VersionCommand::List { namespace, model } => {
                to_value(session.list_versions(namespace, model)?)
            }
            VersionCommand::Delete {
                namespace,
                model,
                version,
            } => to_value(session.delete_version(namespace, model, version)?),
        },
        Commands::Artifact(cmd) => execute_artifact(session, cmd),
    }
}

fn execute_artifact(
    session: &mut dyn StoreSession,
    command: &ArtifactCommand,
) -> Result<Value, CliError> {
    match command {
        ArtifactCommand::Write {
            context,
            id,
            kind,
            body,
        } => {
            let body = read_json(body, "--body")?;
            let artifact = Artifact::new(id.as_str(), *kind, body);
            to_value(session.write_artifact(&context.context()?, &artifact)?)
        }
        ArtifactCommand::Read {
            context,
            id,
            artifact_version,
        } => to_value(session.read_artifact(&context.context()?, id, *artifact_version)?),
        ArtifactCommand::List {
            context,
            limit,
            offset,
        } => to_value(session.read_artifacts(&context.context()?, *limit, *offset)?),
        ArtifactCommand::Search { context, query } => {
            let query: Query = serde_json::from_value(read_json(query, "--query")?)
                .map_err(|source| CliError::Json {
                    what: "--query",
                    source,
                })?;
            to_value(session.search_artifacts(&context.context()?, &query)?)
        }
        ArtifactCommand::Delete { context, id } => {
            to_value(session.delete_artifact(&context.context()?, id)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mlte").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_artifact_write() {
        let cli = parse(&[
            "--store", "sqlite:///tmp/x.db", "artifact", "write", "ns", "m", "v", "--id", "acc",
            "--type", "value", "--body", "{\"x\": 1}",
        ]);
        assert_eq!(cli.store, "sqlite:///tmp/x.db");
        match cli.command {
            Commands::Artifact(ArtifactCommand::Write { context, kind, .. }) => {
                assert_eq!(context.model, "m");
                assert_eq!(kind, ArtifactType::Value);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_type_tag() {
        let result = Cli::try_parse_from([
            "mlte", "artifact", "write", "ns", "m", "v", "--id", "a", "--type", "pickle",
            "--body", "{}",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn list_defaults_to_first_page() {
        let cli = parse(&["artifact", "list", "ns", "m", "v"]);
        match cli.command {
            Commands::Artifact(ArtifactCommand::List { limit, offset, .. }) => {
                assert_eq!((limit, offset), (DEFAULT_LIMIT, 0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn commands_share_one_local_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = format!("local://{}", dir.path().display());
        let body_file = dir.path().join("body.json");
        fs::write(&body_file, r#"{"score": 0.9}"#).unwrap();
        let body_arg = format!("@{}", body_file.display());

        let write = ["artifact", "write", "ns", "m", "v", "--id", "a", "--type", "value"];
        let steps: Vec<Vec<&str>> = vec![
            vec!["namespace", "create", "ns"],
            vec!["model", "create", "ns", "m"],
            vec!["version", "create", "ns", "m", "v"],
            [&write[..], &["--body", body_arg.as_str()][..]].concat(),
            [&write[..], &["--body", "{\"score\": 0.1}"][..]].concat(),
        ];
        for step in steps {
            let mut args = vec!["--store", store.as_str()];
            args.extend(step);
            run(&parse(&args)).unwrap();
        }

        let read = run(&parse(&[
            "--store", store.as_str(), "artifact", "read", "ns", "m", "v", "a", "--version", "0",
        ]))
        .unwrap();
        assert_eq!(read["body"], json!({"score": 0.9}));

        let found = run(&parse(&[
            "--store",
            store.as_str(),
            "artifact",
            "search",
            "ns",
            "m",
            "v",
            "--query",
            r#"{"filter": {"type": "field", "path": "score",
                "condition": {"op": "less_than", "value": 0.5}}}"#,
        ]))
        .unwrap();
        assert_eq!(found[0]["version"], 1);

        let err = run(&parse(&["--store", store.as_str(), "namespace", "read", "missing"]))
            .unwrap_err();
        assert!(matches!(err, CliError::Store(StoreError::NotFound { .. })));
    }

    #[test]
    fn malformed_body_is_reported() {
        let err = read_json("{nope", "--body").unwrap_err();
        assert!(err.to_string().starts_with("invalid JSON in --body"));
        let err = read_json("@/definitely/not/here.json", "--body").unwrap_err();
        assert!(matches!(err, CliError::ReadInput { .. }));
    }
}
