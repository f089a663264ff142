use {
    anyhow::{Context, Result},
    clap::Subcommand,
    narrator_studio::Studio,
};

#[derive(Subcommand)]
pub enum KeyAction {
    /// Seal a Gemini API key read from stdin.
    Set,
    /// Report whether a key is stored.
    Status,
    /// Delete the stored key.
    Clear,
}

pub async fn handle_key(action: &KeyAction, studio: &Studio) -> Result<()> {
    match action {
        KeyAction::Set => {
            eprintln!("Paste your Gemini API key and press Enter:");
            let mut line = String::new();
            std::io::stdin()
                .read_line(&mut line)
                .context("failed to read API key from stdin")?;
            studio
                .set_credential(&line)
                .await
                .map_err(|e| anyhow::anyhow!("{}: {e}", e.user_message()))?;
            println!("API key stored.");
        },
        KeyAction::Status => {
            if studio.has_credential().await? {
                println!("API key: stored");
            } else {
                println!("API key: not set (run `narrator key set`)");
            }
        },
        KeyAction::Clear => {
            studio.clear_credential().await?;
            println!("API key removed.");
        },
    }
    Ok(())
}
