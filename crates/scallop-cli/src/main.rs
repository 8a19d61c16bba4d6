//! Scallop Playground CLI
//!
//! Command-line front end for the playground libraries:
//! - Managing stored projects (`project new|list|show|delete|publish`)
//! - Checking a project's relation tables against their schemas (`check`)
//! - Running a project against a reasoning backend over HTTP (`run`)
//! - Exporting/importing the program source as a `.scl` file

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use scallop_backend::{build_run_request, EditorSession, HttpBackend};
use scallop_relations::Relation;
use scallop_store::{export, JsonFileStore, Project, ProjectPatch, ProjectStore};

#[derive(Parser)]
#[command(name = "scallop-play")]
#[command(author, version, about = "Scallop Playground: relation editor and runner")]
struct Cli {
    /// Project store file (JSON)
    #[arg(long, global = true, default_value = "./projects.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage stored projects.
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Validate a project's relation tables against their declared schemas.
    ///
    /// Reports, per input relation, whether every cell coerces to its
    /// column type; stale cells left behind by a type change show up here.
    Check {
        /// Project id
        project: Uuid,
    },

    /// Run a project against the reasoning backend and store the outputs.
    Run {
        /// Project id
        project: Uuid,
        /// Reasoning backend endpoint
        #[arg(long, default_value = "http://localhost:8000")]
        endpoint: String,
    },

    /// Write a project's program source to a `.scl` file.
    Export {
        /// Project id
        project: Uuid,
        /// Output path (must end in `.scl`)
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Replace a project's program source with the contents of a `.scl` file.
    Import {
        /// Project id
        project: Uuid,
        /// Input path (must end in `.scl`)
        input: PathBuf,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Create an empty project.
    New {
        /// Project title
        #[arg(long)]
        title: Option<String>,
        /// Author reference
        #[arg(long)]
        author: Option<String>,
    },

    /// List published projects, or one author's projects.
    List {
        /// List this author's projects instead of the published ones
        #[arg(long)]
        author: Option<String>,
    },

    /// Print one project in full.
    Show {
        /// Project id
        project: Uuid,
    },

    /// Delete a project.
    Delete {
        /// Project id
        project: Uuid,
    },

    /// Set or clear a project's published flag.
    Publish {
        /// Project id
        project: Uuid,
        /// Clear the flag instead of setting it
        #[arg(long)]
        unpublish: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = JsonFileStore::open(&cli.store)
        .with_context(|| format!("failed to open store {}", cli.store.display()))?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| anyhow!("failed to initialize tokio runtime: {e}"))?;

    rt.block_on(async {
        match cli.command {
            Commands::Project { command } => match command {
                ProjectCommands::New { title, author } => cmd_new(&store, title, author).await,
                ProjectCommands::List { author } => cmd_list(&store, author.as_deref()).await,
                ProjectCommands::Show { project } => cmd_show(&store, project).await,
                ProjectCommands::Delete { project } => cmd_delete(&store, project).await,
                ProjectCommands::Publish { project, unpublish } => {
                    cmd_publish(&store, project, !unpublish).await
                }
            },
            Commands::Check { project } => cmd_check(&store, project).await,
            Commands::Run { project, endpoint } => cmd_run(&store, project, &endpoint).await,
            Commands::Export { project, out } => cmd_export(&store, project, &out).await,
            Commands::Import { project, input } => cmd_import(&store, project, &input).await,
        }
    })
}

async fn cmd_new(
    store: &JsonFileStore,
    title: Option<String>,
    author: Option<String>,
) -> Result<()> {
    let mut project = Project::new(author);
    if let Some(title) = title {
        project.title = title;
    }
    let created = store.create(project).await?;
    eprintln!("{} {} ({})", "created".green().bold(), created.title.bold(), created.id);
    Ok(())
}

async fn cmd_list(store: &JsonFileStore, author: Option<&str>) -> Result<()> {
    let projects = match author {
        Some(author) => store.list_by_author(author).await?,
        None => store.list_published().await?,
    };
    if projects.is_empty() {
        eprintln!("{}", "no projects".yellow());
        return Ok(());
    }
    for project in projects {
        let flag = if project.published { "published".green() } else { "draft".yellow() };
        println!(
            "{}  {}  {}  {}",
            project.id,
            project.created_at.format("%Y-%m-%d"),
            flag,
            project.title
        );
    }
    Ok(())
}

async fn cmd_show(store: &JsonFileStore, id: Uuid) -> Result<()> {
    let project = store.get(id).await?;
    let session = EditorSession::from_project(&project)
        .with_context(|| format!("project {id} has a corrupt relation collection"))?;

    println!("{} {}", "title:".bold(), project.title);
    if let Some(description) = &project.description {
        println!("{} {}", "description:".bold(), description);
    }
    if let Some(author) = &project.author {
        println!("{} {}", "author:".bold(), author);
    }
    println!("{} {}", "published:".bold(), project.published);
    println!("{} {}", "created:".bold(), project.created_at.to_rfc3339());

    println!("\n{}", "relations:".bold());
    for relation in session.relations().iter() {
        println!("  {}", describe(relation));
    }

    println!("\n{}", "program:".bold());
    println!("{}", project.program);
    Ok(())
}

async fn cmd_delete(store: &JsonFileStore, id: Uuid) -> Result<()> {
    let removed = store.delete(id).await?;
    eprintln!("{} {} ({})", "deleted".green().bold(), removed.title.bold(), removed.id);
    Ok(())
}

async fn cmd_publish(store: &JsonFileStore, id: Uuid, published: bool) -> Result<()> {
    let patch = ProjectPatch {
        published: Some(published),
        ..Default::default()
    };
    let updated = store.update(id, patch).await?;
    let verb = if published { "published" } else { "unpublished" };
    eprintln!("{} {} ({})", verb.green().bold(), updated.title.bold(), updated.id);
    Ok(())
}

async fn cmd_check(store: &JsonFileStore, id: Uuid) -> Result<()> {
    let project = store.get(id).await?;
    let session = EditorSession::from_project(&project)?;

    let mut bad = 0usize;
    for relation in session.relations().iter() {
        if !relation.is_input() {
            continue;
        }
        match scallop_relations::codec::encode_relation(relation) {
            Ok(facts) => {
                println!(
                    "{} {} ({} facts)",
                    "ok".green().bold(),
                    relation.name,
                    facts.len()
                );
            }
            Err(err) => {
                bad += 1;
                println!("{} {}: {}", "error".red().bold(), relation.name, err);
            }
        }
    }
    if bad > 0 {
        return Err(anyhow!("{bad} relation(s) failed validation"));
    }
    Ok(())
}

async fn cmd_run(store: &JsonFileStore, id: Uuid, endpoint: &str) -> Result<()> {
    let mut session = EditorSession::load(store, id).await?;

    // Surface schema errors before touching the network.
    build_run_request(session.program(), session.relations())
        .context("inputs failed schema validation")?;

    let backend = HttpBackend::new(endpoint)?;
    session
        .run(&backend)
        .await
        .with_context(|| format!("run against {endpoint} failed"))?;

    for relation in session.relations().iter() {
        if relation.is_input() {
            continue;
        }
        println!("{} ({} facts)", relation.name.bold(), relation.facts.len());
        for fact in &relation.facts {
            println!("  {}  ({})", fact.weight, fact.values.join(", "));
        }
    }

    session.save_into(store, id).await?;
    eprintln!("{} outputs stored", "ok".green().bold());
    Ok(())
}

async fn cmd_export(store: &JsonFileStore, id: Uuid, out: &Path) -> Result<()> {
    let project = store.get(id).await?;
    export::export_program(&project.program, out)?;
    eprintln!("{} {}", "wrote".green().bold(), out.display().to_string().bold());
    Ok(())
}

async fn cmd_import(store: &JsonFileStore, id: Uuid, input: &Path) -> Result<()> {
    let program = export::import_program(input)?;
    let patch = ProjectPatch {
        program: Some(program),
        ..Default::default()
    };
    let updated = store.update(id, patch).await?;
    eprintln!(
        "{} program into {} ({})",
        "imported".green().bold(),
        updated.title.bold(),
        updated.id
    );
    Ok(())
}

fn describe(relation: &Relation) -> String {
    let direction = if relation.is_input() { "input" } else { "output" };
    let args: Vec<String> = relation.args.iter().map(|arg| arg.label()).collect();
    format!(
        "{} {}({}) [{} facts{}]",
        direction,
        relation.name,
        args.join(", "),
        relation.facts.len(),
        if relation.has_probability { ", probabilistic" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults_to_localhost() {
        let cli = Cli::parse_from(["scallop-play", "run", &Uuid::new_v4().to_string()]);
        match cli.command {
            Commands::Run { endpoint, .. } => assert_eq!(endpoint, "http://localhost:8000"),
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn store_flag_is_global() {
        let cli = Cli::parse_from([
            "scallop-play",
            "project",
            "list",
            "--store",
            "/tmp/p.json",
        ]);
        assert_eq!(cli.store, PathBuf::from("/tmp/p.json"));
    }
}
