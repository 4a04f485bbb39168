//! Usage: `describe_character <main image> [face image] [field=value ...]`
//!
//! Field values may be a preset label, a preset value or free text.
//! `extra=...` fills the additional detail text.

use prompt_studio::catalog::find_choice;
use prompt_studio::{Client, FormSession, ImageSlot, ImageUpload, PromptField};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> prompt_studio::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(main_image) = args.next() else {
        eprintln!("usage: describe_character <main image> [face image] [field=value ...]");
        std::process::exit(2);
    };

    let mut session = FormSession::new();
    session.set_image(
        ImageSlot::Primary,
        Some(ImageUpload::from_path(&main_image).await?),
    );

    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            session.set_image(ImageSlot::Face, Some(ImageUpload::from_path(&arg).await?));
            continue;
        };
        if key == "extra" {
            session.set_additional_text(value);
            continue;
        }
        let field: PromptField = key.parse()?;
        let value = find_choice(field, value).map_or(value, |choice| choice.value);
        session.set_option(field, value);
    }

    let client = Client::from_env()?;
    let result = session.submit(&client.prompts()).await;
    session.close();
    println!("{}", result?);
    Ok(())
}
