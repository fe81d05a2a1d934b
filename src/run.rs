use crate::cli;
use crate::config::Config;
use crate::editor::Editor;
use crate::github::client::IssueClient;
use crate::output;
use crate::text::{self, IssueText};
use anyhow::Context;
use thiserror::Error;

/// Bad command line; reported with the usage text.
#[derive(Debug, Error)]
#[error("{reason}\n\n{}", cli::parser::USAGE)]
pub struct UsageError {
    pub reason: String,
}

/// Executes one command.
///
/// Everything printed to stdout is also written to `stdout_additional` when given.
pub async fn run(
    args: Vec<String>,
    config: Config,
    mut stdout_additional: Option<&mut dyn std::io::Write>,
) -> anyhow::Result<()> {
    let command = cli::parser::parse_args(&args);
    let client = IssueClient::new(&config).context("Failed to create HTTP client")?;
    let editor = Editor::new(config.editor.clone());

    match command {
        cli::parser::Command::Create { owner, repo } => {
            let IssueText { title, body } = compose(&editor, String::new()).await?;
            let number = client
                .create_issue(&owner, &repo, &title, &body)
                .await
                .context("Failed to create issue")?;
            let message = match number {
                Some(number) => format!("Created issue #{number} in {owner}/{repo}"),
                None => format!("Created issue in {owner}/{repo}"),
            };
            tracing::info!(%owner, %repo, ?number, "issue created");
            output::println(&message, &mut stdout_additional)?;
        }
        cli::parser::Command::Update {
            owner,
            repo,
            number,
        } => {
            let issue = client
                .get_issue(&owner, &repo, number)
                .await
                .with_context(|| format!("Failed to get issue #{number}"))?;
            let seed = text::compose_text(&issue.title, &issue.body);
            let IssueText { title, body } = compose(&editor, seed).await?;
            client
                .update_issue(&owner, &repo, number, &title, &body)
                .await
                .with_context(|| format!("Failed to update issue #{number}"))?;
            tracing::info!(%owner, %repo, number, "issue updated");
            output::println(&format!("Updated issue #{number}"), &mut stdout_additional)?;
        }
        cli::parser::Command::Read {
            owner,
            repo,
            number,
        } => {
            let issue = client
                .get_issue(&owner, &repo, number)
                .await
                .with_context(|| format!("Failed to get issue #{number}"))?;
            output::println(&output::render_issue(&issue), &mut stdout_additional)?;
        }
        cli::parser::Command::Close {
            owner,
            repo,
            number,
        } => {
            client
                .close_issue(&owner, &repo, number)
                .await
                .with_context(|| format!("Failed to close issue #{number}"))?;
            tracing::info!(%owner, %repo, number, "issue closed");
            output::println(&format!("Closed issue #{number}"), &mut stdout_additional)?;
        }
        cli::parser::Command::Reopen {
            owner,
            repo,
            number,
        } => {
            client
                .reopen_issue(&owner, &repo, number)
                .await
                .with_context(|| format!("Failed to reopen issue #{number}"))?;
            tracing::info!(%owner, %repo, number, "issue reopened");
            output::println(&format!("Reopened issue #{number}"), &mut stdout_additional)?;
        }
        cli::parser::Command::Help => {
            output::println(cli::parser::USAGE, &mut stdout_additional)?;
        }
        cli::parser::Command::Invalid(reason) => {
            return Err(UsageError { reason }.into());
        }
    }
    Ok(())
}

/// Runs the editor off the async runtime and parses what it produced.
async fn compose(editor: &Editor, seed: String) -> anyhow::Result<IssueText> {
    let editor = editor.clone();
    let bytes = tokio::task::spawn_blocking(move || editor.edit(&seed))
        .await
        .context("Editor task failed")?
        .context("Failed to edit issue text")?;
    Ok(text::parse_text(&bytes))
}
