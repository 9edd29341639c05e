//! `ciam tokens view`: the only command that prints secrets.

use anyhow::Result;
use ciam_core::tokens::{UnmaskedToken, UnmaskedTokenView};
use ciam_domain::CredentialClass;

use crate::cli::TokensCommand;
use crate::context::{AppContext, CredentialCheck};
use crate::output;

pub async fn handle(ctx: &AppContext, command: TokensCommand) -> Result<()> {
    match command {
        TokensCommand::View => view(ctx).await,
    }
}

async fn view(ctx: &AppContext) -> Result<()> {
    println!("{}", output::start("view tokens"));
    let session = ctx.session(CredentialClass::ALL, CredentialCheck::Lenient)?;
    let view = UnmaskedTokenView::new(
        session.tokens.clone(),
        session.credentials.clone(),
        session.clock.clone(),
    );

    let mut all_ok = true;
    for (class, result) in view.reveal_all(session.target).await {
        println!("{}", output::step(&format!("Fetching {class} token...")));
        match result {
            Ok(token) => {
                println!("{}", output::step_at(4, &format!("✓ Retrieved {class} token")));
                println!("{}", render(&token));
            }
            Err(err) => {
                all_ok = false;
                println!("{}", output::step_at(4, &format!("✗ Error: {err}")));
            }
        }
        println!();
    }

    println!("{}", output::end("view tokens", all_ok));
    Ok(())
}

fn render(token: &UnmaskedToken) -> String {
    let heading = match token.class {
        CredentialClass::General => "GENERAL Token:",
        CredentialClass::ClientOps => "CLIENTOPS Token:",
    };
    [
        heading.to_string(),
        format!("  Access Token:  {}", token.access_token),
        format!("  Token Type:    {}", token.token_type.as_deref().unwrap_or("N/A")),
        format!("  Client ID:     {}", token.client_id),
        format!("  Client Secret: {}", token.client_secret),
        format!("  Expires At:    {}", token.expires_at.to_rfc3339()),
        format!("  Expires In:    {}s", token.seconds_remaining),
        format!("  Source:        {}", if token.from_cache { "cached" } else { "issued" }),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ciam_domain::{Environment, Region, Target};

    use super::*;

    #[test]
    fn render_shows_secrets_in_clear() {
        let token = UnmaskedToken {
            target: Target::new(Region::Us, Environment::Qa),
            class: CredentialClass::ClientOps,
            access_token: "tok-abc".into(),
            token_type: Some("Bearer".into()),
            client_id: "cid".into(),
            client_secret: "csecret".into(),
            expires_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            seconds_remaining: 3599,
            from_cache: false,
        };
        let text = render(&token);
        assert!(text.starts_with("CLIENTOPS Token:"));
        assert!(text.contains("tok-abc"));
        assert!(text.contains("csecret"));
        assert!(text.contains("3599s"));
        assert!(text.contains("Source:        issued"));
    }
}
