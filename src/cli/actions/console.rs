use crate::cli::{actions::Action, telemetry};
use crate::client::types::User;
use crate::client::UsersClient;
use crate::view::{DraftField, UsersView};
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, warn};

const HELP: &str = "commands:
  list              refetch and show all users
  user <id>         fetch a single user by id
  username <value>  set the username draft field
  email <value>     set the email draft field
  submit            send the draft to the service, then refetch
  ping              health-check the service
  help              show this help
  quit              leave the console";

/// Handle the console action
pub async fn handle(action: Action) -> Result<()> {
    let Action::Console { users_url } = action;

    let client = UsersClient::new(&users_url)?;
    let mut view = UsersView::new(client.clone());

    view.on_mount().await;
    println!("{}", render_users(view.users()));
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "list" => {
                view.refresh().await;
                println!("{}", render_users(view.users()));
            }
            "user" => match client.get(rest).await {
                Ok(user) => println!("{}", render_users(std::slice::from_ref(&user))),
                Err(err) => error!("get user failed: {err}"),
            },
            "submit" => match view.on_submit().await {
                Some(ack) => {
                    println!("{}", ack.message);
                    println!("{}", render_users(view.users()));
                }
                None => println!("submit failed, draft kept: {}", render_draft(&view)),
            },
            "ping" => match client.ping().await {
                Ok(message) => println!("{message}"),
                Err(err) => error!("ping failed: {err}"),
            },
            "help" => println!("{HELP}"),
            "quit" | "exit" => break,
            field => match field.parse::<DraftField>() {
                Ok(field) => {
                    view.on_field_change(field, rest);
                    println!("{}", render_draft(&view));
                }
                Err(err) => {
                    warn!("{err}");
                    println!("unknown command, try 'help'");
                }
            },
        }
    }

    telemetry::shutdown_tracer();

    Ok(())
}

fn render_users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users!".to_string();
    }

    let mut out = format!("{:<6} {:<24} {:<32}\n", "ID", "USERNAME", "EMAIL");
    for user in users {
        let id = user
            .id
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        out.push_str(&format!(
            "{:<6} {:<24} {:<32}\n",
            id, user.username, user.email
        ));
    }

    out.push_str(&format!("{} user(s)", users.len()));
    out
}

fn render_draft<C: crate::view::CollectionClient>(view: &UsersView<C>) -> String {
    let (username, email) = view.draft();
    format!("draft: username={username:?} email={email:?}")
}
