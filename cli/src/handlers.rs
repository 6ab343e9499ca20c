//! Command handlers

use anyhow::{bail, Context};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use docsentry_core::{
    AnalysisType, App, DocumentError, DocumentId, LlmProvider, RegistrationForm, SessionStatus,
};

use crate::commands::Commands;
use crate::display;

/// The failure was already shown to the user as a notification
#[derive(Debug, thiserror::Error)]
#[error("operation failed")]
pub struct AlreadyReported;

pub async fn run(app: &App, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => login(app, email, password).await,
        Commands::Register {
            first_name,
            last_name,
            email,
            organization,
            password,
        } => {
            let password = match password {
                Some(password) => password,
                None => rpassword::prompt_password("Password: ")?,
            };
            let form = RegistrationForm {
                first_name,
                last_name,
                email,
                password,
                organization,
            };
            let user = app
                .session()
                .register(&form)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e.reason()))?;
            display::print_user(&user);
            Ok(())
        }
        Commands::Logout => {
            app.session().logout();
            Ok(())
        }
        Commands::Whoami => {
            match app.initialize().await {
                SessionStatus::Authenticated => {
                    if let Some(user) = app.session().current_user() {
                        display::print_user(&user);
                    }
                }
                _ => println!("Not logged in"),
            }
            Ok(())
        }
        Commands::Documents => {
            require_session(app).await?;
            let dashboard = app.documents().dashboard().await;
            display::print_dashboard(&dashboard);
            Ok(())
        }
        Commands::Analyze {
            file,
            provider,
            analysis_type,
        } => analyze(app, file, provider, analysis_type).await,
        Commands::Download { id, output, url } => {
            let id = DocumentId::from(id.as_str());
            if url {
                println!("{}", app.documents().download_url(&id)?);
                return Ok(());
            }

            require_session(app).await?;
            let file = app
                .documents()
                .download(&id)
                .await
                .map_err(reported)?;
            let path = file
                .save_to(&output)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "Saved {} ({}) to {}",
                file.file_name,
                display::format_file_size(file.size()),
                path.display()
            );
            println!("sha256: {}", file.sha256_hex());
            Ok(())
        }
        Commands::Options => {
            println!("Providers:");
            for provider in LlmProvider::ALL {
                println!("  {:<8}  {}", provider, provider.description());
            }
            println!("Analysis types:");
            for analysis_type in AnalysisType::ALL {
                println!("  {:<12}  {}", analysis_type, analysis_type.description());
            }
            Ok(())
        }
    }
}

async fn login(
    app: &App,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")?,
    };

    let user = app
        .session()
        .login(&email, &password)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.reason()))?;

    tracing::debug!(user_id = %user.id, "Login complete");
    Ok(())
}

async fn analyze(
    app: &App,
    file: Option<PathBuf>,
    provider: LlmProvider,
    analysis_type: AnalysisType,
) -> anyhow::Result<()> {
    require_session(app).await?;

    if let Some(path) = &file {
        if let Ok(metadata) = std::fs::metadata(path) {
            println!(
                "Uploading {} ({}) for {} with {}",
                path.display(),
                display::format_file_size(metadata.len()),
                analysis_type.description(),
                provider.description()
            );
        }
    }

    let id = app
        .documents()
        .analyze_file(file.as_deref(), provider, analysis_type)
        .await
        .map_err(reported)?;

    println!("Document {} is processing. Check `docsentry documents` for status.", id);
    Ok(())
}

/// Restore the stored session, failing if there is none
async fn require_session(app: &App) -> anyhow::Result<()> {
    if app.initialize().await != SessionStatus::Authenticated {
        bail!("Not logged in. Run `docsentry login` first.");
    }
    Ok(())
}

fn reported(e: DocumentError) -> anyhow::Error {
    tracing::debug!(error = %e, "Reported failure");
    AlreadyReported.into()
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
