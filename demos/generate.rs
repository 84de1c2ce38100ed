//! Generate a retro sound effect from a prompt and write it next to the
//! current directory as `<slug>.wav`.
//!
//! ```text
//! OPENAI_API_KEY=sk-... cargo run --example generate -- coin pickup
//! ```

use ai_sfx::{ClientRegistry, SfxPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ai_sfx=info".into()),
        )
        .init();

    let prompt = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if prompt.trim().is_empty() {
        eprintln!("usage: generate <description of a sound effect>");
        std::process::exit(2);
    }

    let registry = ClientRegistry::from_env()?;
    let pipeline = SfxPipeline::new(registry);

    match pipeline.generate(&prompt).await {
        Ok(Some(generation)) => {
            generation.artifact.write_to(&generation.file_name)?;
            println!("wrote {}", generation.file_name);
        }
        Ok(None) => {}
        Err(_) => {
            // details are in the logs; the caller only sees one state
            eprintln!("generation failed");
            std::process::exit(1);
        }
    }

    Ok(())
}
