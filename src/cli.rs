// src/cli.rs
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::router::{route_for_session, Route, RouteDecision};
use crate::types::Application;
use crate::utils::format_optional_date_es;
use crate::views::job_details::MSG_UNAVAILABLE;
use crate::views::{
    AppContext, ApplicationsBoard, ApplyOutcome, HomeView, JobBoardView, JobDetailsView,
    LoginOutcome, LoginView, PostJobOutcome, PostJobView, ProfileView, RegisterOutcome,
    RegisterView, StatusChange,
};

#[derive(Parser)]
#[command(name = "empleos")]
#[command(about = "Browse, post and apply to jobs on EmpleosNG")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// API base URL, overrides the configuration file
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in and keep the session token
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a new account
    Register {
        full_name: String,
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show the signed-in user and where they land
    Whoami,
    /// Latest job postings
    Home,
    /// Job listings
    #[command(subcommand)]
    Jobs(JobsCommand),
    /// Apply to a job as the signed-in worker
    Apply { job_id: i64 },
    /// Your profile and applications
    Profile,
    /// Review applications (employers)
    #[command(subcommand)]
    Applications(ApplicationsCommand),
}

#[derive(Subcommand)]
pub enum JobsCommand {
    /// List every job
    List,
    /// Show one job
    Show { id: i64 },
    /// Publish a job (employers)
    Post {
        title: String,
        description: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ApplicationsCommand {
    /// List every application
    List,
    /// Approve an application
    Approve { id: i64 },
    /// Reject an application
    Reject { id: i64 },
}

pub async fn handle_command(command: Command, ctx: &AppContext) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let view = LoginView::mount(ctx);
            view.set_email(email);
            view.set_password(password);
            match view.submit().await {
                LoginOutcome::SignedIn(route) => println!("✅ Sesión iniciada ({})", route),
                LoginOutcome::InvalidRole | LoginOutcome::Failed(_) => {
                    let error = view.snapshot().error.unwrap_or_default();
                    bail!("❌ {}", error);
                }
                LoginOutcome::InProgress | LoginOutcome::Cancelled => {}
            }
        }

        Command::Register {
            full_name,
            email,
            password,
        } => {
            let view = RegisterView::mount(ctx);
            view.set_full_name(full_name);
            view.set_email(email);
            view.set_password(password);
            match view.submit().await {
                RegisterOutcome::Registered => {
                    println!("✅ {}", view.snapshot().success.unwrap_or_default())
                }
                RegisterOutcome::Invalid(message) | RegisterOutcome::Failed(message) => {
                    bail!("❌ {}", message)
                }
                RegisterOutcome::InProgress | RegisterOutcome::Cancelled => {}
            }
        }

        Command::Logout => {
            ctx.session.sign_out()?;
            ctx.navigator.push(Route::Login);
            println!("👋 Sesión cerrada");
        }

        Command::Whoami => {
            if !ctx.session.is_authenticated() {
                println!("No hay sesión activa.");
                return Ok(());
            }
            match ctx.session.current_user() {
                Some(user) => {
                    println!("{} <{}> (#{})", user.name, user.email, user.id);
                }
                None => println!("Token inválido."),
            }
            if let Some(claims) = ctx.session.claims() {
                println!("Roles: {}", claims.roles().names().join(", "));
            }
            match route_for_session(&ctx.session) {
                RouteDecision::Navigate(route) => println!("Inicio: {}", route),
                RouteDecision::InvalidRole => println!("Rol de usuario no válido"),
            }
        }

        Command::Home => {
            let view = HomeView::mount(ctx, Route::Home);
            view.check_auth();
            view.load().await;

            let state = view.snapshot();
            if let Some(message) = state.empty_message() {
                println!("{}", message);
            }
            for job in &state.jobs {
                println!(
                    "#{:<5} {}  ({})",
                    job.id,
                    job.title,
                    format_optional_date_es(job.created_at.as_ref())
                );
            }
            println!("→ {}", view.account_route());
        }

        Command::Jobs(JobsCommand::List) => {
            let view = JobBoardView::mount(ctx);
            view.load().await;

            let state = view.snapshot();
            if state.jobs.is_empty() {
                println!("No hay trabajos disponibles.");
            }
            for job in &state.jobs {
                println!("#{:<5} {}", job.id, job.title);
                if let Some(url) = view.image_url(job) {
                    println!("       🖼️  {}", url);
                }
            }
        }

        Command::Jobs(JobsCommand::Show { id }) => {
            let view = JobDetailsView::mount(ctx, id);
            view.load().await;

            let state = view.snapshot();
            let Some(job) = state.job else {
                bail!("❌ {}", state.message.unwrap_or_default());
            };
            println!("{}", job.title);
            println!("Publicado: {}", format_optional_date_es(job.created_at.as_ref()));
            if let Some(path) = job.image_url.as_deref() {
                println!("Imagen: {}", ctx.api.asset_url(path));
            }
            println!();
            println!("{}", job.description_or("Sin descripción."));
            if let Some(message) = state.message {
                println!();
                println!("{}", message);
            }
        }

        Command::Jobs(JobsCommand::Post {
            title,
            description,
            image,
        }) => {
            let view = PostJobView::mount(ctx);
            view.set_title(title);
            view.set_description(description);
            if let Some(path) = image {
                view.attach_image(&path).await?;
            }
            match view.submit().await {
                PostJobOutcome::Created(job) => {
                    println!("{} (#{})", view.snapshot().success.unwrap_or_default(), job.id)
                }
                PostJobOutcome::Invalid(message) | PostJobOutcome::Failed(message) => {
                    bail!("{}", message)
                }
                PostJobOutcome::InProgress | PostJobOutcome::Cancelled => {}
            }
        }

        Command::Apply { job_id } => {
            let view = JobDetailsView::mount(ctx, job_id);
            view.load().await;
            match view.apply().await {
                ApplyOutcome::Applied(application) => {
                    info!("Created application {}", application.id);
                    println!("✅ {}", view.snapshot().message.unwrap_or_default());
                }
                ApplyOutcome::AlreadyApplied | ApplyOutcome::NotSignedIn => {
                    println!("{}", view.snapshot().message.unwrap_or_default());
                }
                ApplyOutcome::Unavailable => bail!("❌ {}", MSG_UNAVAILABLE),
                ApplyOutcome::Failed(message) => bail!("❌ {}", message),
                ApplyOutcome::InProgress | ApplyOutcome::Cancelled => {}
            }
        }

        Command::Profile => {
            let view = ProfileView::mount(ctx);
            view.load().await;

            let state = view.snapshot();
            if let Some(error) = state.error {
                bail!("❌ {}", error);
            }
            if let Some(user) = &state.user {
                println!("{} <{}>", user.name, user.email);
            }
            if state.applications.is_empty() {
                println!("No has aplicado a ningún trabajo.");
            }
            for application in &state.applications {
                println!(
                    "  {}  [{}]  {}",
                    application.job_title(),
                    application.status.label(),
                    format_optional_date_es(application.created_at.as_ref())
                );
            }
        }

        Command::Applications(command) => {
            let board = ApplicationsBoard::mount(ctx);
            board.load().await;
            if let Some(error) = board.snapshot().error {
                bail!("❌ {}", error);
            }

            let change = match command {
                ApplicationsCommand::List => {
                    for application in &board.snapshot().applications {
                        print_application(application);
                    }
                    return Ok(());
                }
                ApplicationsCommand::Approve { id } => board.approve(id).await,
                ApplicationsCommand::Reject { id } => board.reject(id).await,
            };

            match change {
                StatusChange::Updated(application) => print_application(&application),
                StatusChange::Disabled => println!("Acción no disponible para esta aplicación."),
                StatusChange::Failed(message) => bail!("❌ {}", message),
                StatusChange::InProgress | StatusChange::Cancelled => {}
            }
        }
    }

    Ok(())
}

fn print_application(application: &Application) {
    println!(
        "#{:<5} {:<30} {:<20} {:<30} {}",
        application.id,
        application.job_title(),
        application.worker_name(),
        application.worker_email(),
        application.status.label()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["empleos", "jobs", "post", "Chef", "Cocina", "--image", "a.png"]);
        match cli.command {
            Command::Jobs(JobsCommand::Post { title, image, .. }) => {
                assert_eq!(title, "Chef");
                assert_eq!(image, Some(PathBuf::from("a.png")));
            }
            _ => panic!("expected jobs post"),
        }

        let cli = Cli::parse_from([
            "empleos",
            "applications",
            "approve",
            "4",
            "--api-url",
            "http://api.test",
        ]);
        assert_eq!(cli.api_url.as_deref(), Some("http://api.test"));
        assert!(matches!(
            cli.command,
            Command::Applications(ApplicationsCommand::Approve { id: 4 })
        ));
    }
}
