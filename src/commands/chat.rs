use std::io::{self, Read};

use clap::Args;

use crate::app::Runtime;
use crate::errors::CliError;
use crate::parse::reply::normalize_reply;
use crate::session::SessionId;

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Travel request text
    pub prompt: Option<String>,
    /// Read the request from stdin
    #[arg(long)]
    pub stdin: bool,
}

/// One-shot send: a single dispatch over the same wire contract the TUI
/// uses, printing the normalized reply.
pub async fn handle(runtime: &Runtime, args: ChatArgs) -> Result<(), CliError> {
    let prompt = resolve_prompt(&args)?;
    let client = runtime.webhook_client()?;
    let session = SessionId::generate();

    runtime
        .output
        .print_verbose(&format!("session={} url={}", session, client.url()));

    let reply = client.send_message(&session, &prompt).await?;
    runtime
        .output
        .print_verbose(&format!("elapsed_ms={}", reply.elapsed_ms));

    if runtime.output.json {
        runtime.output.print_json(&reply.json)?;
        return Ok(());
    }

    runtime.output.print_human(&normalize_reply(&reply.json));
    Ok(())
}

fn resolve_prompt(args: &ChatArgs) -> Result<String, CliError> {
    if args.stdin {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| CliError::Generic(format!("Failed reading stdin: {e}")))?;
        let trimmed = input.trim().to_string();
        if trimmed.is_empty() {
            return Err(CliError::Usage(
                "No request provided via stdin. Pipe text or pass a prompt argument.".to_string(),
            ));
        }
        return Ok(trimmed);
    }

    match &args.prompt {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(CliError::Usage(
            "Missing request. Use `tripchat chat \"...\"` or pass `--stdin`.".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_argument_is_trimmed() {
        let args = ChatArgs {
            prompt: Some("  a week in Bali  ".to_string()),
            stdin: false,
        };
        assert_eq!(resolve_prompt(&args).unwrap(), "a week in Bali");
    }

    #[test]
    fn blank_prompt_is_a_usage_error() {
        let args = ChatArgs {
            prompt: Some("   ".to_string()),
            stdin: false,
        };
        assert!(matches!(resolve_prompt(&args), Err(CliError::Usage(_))));
    }
}
