//! Backoffice CLI — inspect the cached login payload and resolve module
//! permissions from it.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use backoffice_access::{AccessContext, AccessQuery};
use backoffice_auth::{AuthConfig, AuthPayload, AuthService, FilePayloadStore};
use backoffice_core::models::module::{ModuleId, ModuleNode, PreOrder};
use backoffice_core::models::permission::Action;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "backoffice")]
#[command(about = "Backoffice console session and module access tool")]
#[command(version)]
struct Cli {
    /// Directory holding the cached payload
    #[arg(long, global = true, default_value = ".backoffice")]
    store_dir: PathBuf,

    /// Storage key of the cached payload
    #[arg(long, global = true, default_value = "gn_auth")]
    key: String,

    /// Application id sent as X-APP-ID
    #[arg(long, global = true, env = "BACKOFFICE_APP_ID")]
    app_id: Option<String>,

    /// Accept cached payloads whose token has expired
    #[arg(long, global = true)]
    ignore_expiry: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cache a login response (JSON file with `user` and `token`)
    Login {
        response: PathBuf,
    },
    /// Drop the cached payload
    Logout,
    /// Print the logged-in user and the modules they can act on
    Whoami,
    /// Print the module tree of a payload
    Tree {
        /// Read this payload file instead of the cache
        #[arg(long)]
        payload: Option<PathBuf>,
    },
    /// Print the permission record for a path or module id
    Resolve {
        #[arg(long)]
        payload: Option<PathBuf>,
        /// Navigation path; query string allowed
        #[arg(long)]
        path: Option<String>,
        #[arg(long)]
        module_id: Option<ModuleId>,
    },
    /// Print the headers an API request would carry
    Headers,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("backoffice=info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = AuthConfig {
        storage_key: cli.key,
        app_id: cli.app_id,
        enforce_token_expiry: !cli.ignore_expiry,
        ..AuthConfig::default()
    };
    let service = AuthService::new(FilePayloadStore::new(&cli.store_dir), config);

    match cli.command {
        Commands::Login { response } => {
            let raw = fs::read_to_string(&response)
                .with_context(|| format!("reading {}", response.display()))?;
            let payload = service.login(&raw)?;
            tracing::info!(store = %cli.store_dir.display(), "logged in");
            println!(
                "cached session for {}",
                payload.user.username.as_deref().unwrap_or("<unknown>")
            );
        }
        Commands::Logout => {
            service.clear()?;
        }
        Commands::Whoami => {
            let payload = service.require()?;
            println!(
                "{}",
                payload.user.username.as_deref().unwrap_or("<unknown>")
            );
            let ctx = payload.access_context();
            print!("{}", render_actionable(ctx.forest()));
        }
        Commands::Tree { payload } => {
            let ctx = access_context(&service, payload)?;
            print!("{}", render_forest(ctx.forest()));
        }
        Commands::Resolve {
            payload,
            path,
            module_id,
        } => {
            let ctx = access_context(&service, payload)?;
            let query = AccessQuery {
                path: path.as_deref(),
                module_id,
            };
            let Some(perms) = ctx.resolve(query) else {
                bail!("pass --path or --module-id");
            };
            println!("{}", serde_json::to_string_pretty(&perms)?);
        }
        Commands::Headers => {
            for (name, value) in service.request_headers() {
                println!("{name}: {value}");
            }
        }
    }
    Ok(())
}

/// Context from an explicit payload file (strict: bad module data is an
/// error) or from the cached session (lenient).
fn access_context(
    service: &AuthService<FilePayloadStore>,
    payload: Option<PathBuf>,
) -> anyhow::Result<AccessContext> {
    match payload {
        Some(file) => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let payload = AuthPayload::from_json(&raw)?;
            Ok(payload.try_access_context()?)
        }
        None => Ok(service.access_context()),
    }
}

fn render_forest(forest: &[ModuleNode]) -> String {
    let mut out = String::new();
    let mut stack: Vec<(&ModuleNode, usize)> = forest.iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        let record = &node.record;
        let routes: Vec<&str> = record.urls.candidates().collect();
        let granted = record
            .permissions
            .map(|p| format!("{:?}", p.granted()))
            .unwrap_or_else(|| "-".into());
        let _ = writeln!(
            out,
            "{:indent$}{} [{}] {} {}",
            "",
            record.name,
            record.id,
            routes.join(","),
            granted,
            indent = depth * 2
        );
        stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
    }
    out
}

/// One line per module granting more than view, pre-order.
fn render_actionable(forest: &[ModuleNode]) -> String {
    let mut out = String::new();
    for node in PreOrder::forest(forest) {
        let Some(perms) = node.record.permissions else {
            continue;
        };
        let actions: Vec<Action> = perms
            .granted()
            .into_iter()
            .filter(|a| *a != Action::View)
            .collect();
        if !actions.is_empty() {
            let _ = writeln!(out, "  {} {:?}", node.record.name, actions);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::models::module::{ModuleRecord, ModuleUrls};
    use backoffice_core::models::permission::PermissionRecord;

    #[test]
    fn forest_renders_indented_in_pre_order() {
        let forest = vec![ModuleNode {
            record: ModuleRecord::new(1, "Master"),
            children: vec![ModuleNode::leaf(
                ModuleRecord::new(2, "Documents")
                    .with_parent(1)
                    .with_urls(ModuleUrls::view("/master/documents"))
                    .with_permissions(PermissionRecord::FALLBACK),
            )],
        }];

        let text = render_forest(&forest);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Master [1]  -");
        assert_eq!(lines[1], "  Documents [2] /master/documents [View]");
    }

    #[test]
    fn actionable_listing_skips_view_only_modules() {
        let forest = vec![ModuleNode {
            record: ModuleRecord::new(1, "Settings"),
            children: vec![
                ModuleNode::leaf(
                    ModuleRecord::new(2, "Roles")
                        .with_parent(1)
                        .with_permissions(PermissionRecord {
                            can_view: true,
                            can_add: true,
                            can_delete: true,
                            ..PermissionRecord::NONE
                        }),
                ),
                ModuleNode::leaf(
                    ModuleRecord::new(3, "Users")
                        .with_parent(1)
                        .with_permissions(PermissionRecord::FALLBACK),
                ),
            ],
        }];

        assert_eq!(render_actionable(&forest), "  Roles [Add, Delete]\n");
    }

    #[test]
    fn cli_parses_resolve_arguments() {
        let cli = Cli::try_parse_from([
            "backoffice",
            "resolve",
            "--path",
            "/settings/role-management/edit/5",
            "--store-dir",
            "/tmp/bo",
        ])
        .unwrap();
        assert_eq!(cli.store_dir, PathBuf::from("/tmp/bo"));
        match cli.command {
            Commands::Resolve { path, module_id, .. } => {
                assert_eq!(path.as_deref(), Some("/settings/role-management/edit/5"));
                assert_eq!(module_id, None);
            }
            _ => panic!("expected resolve"),
        }
    }
}
