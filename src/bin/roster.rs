use anyhow::Result;
use roster::cli::{actions, actions::Action, start};

#[tokio::main]
async fn main() -> Result<()> {
    let action = start()?;

    match action {
        Action::Console { .. } => actions::console::handle(action).await?,
    }

    Ok(())
}
