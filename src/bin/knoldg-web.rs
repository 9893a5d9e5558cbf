use anyhow::Result;
use knoldg_web::cli::{actions::Action, start};

#[tokio::main]
async fn main() -> Result<()> {
    let action = start()?;

    match action {
        Action::Server(args) => knoldg_web::cli::actions::server::execute(args).await?,
    }

    Ok(())
}
