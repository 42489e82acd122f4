//! Admin command - account bootstrap without going through the API.

use std::sync::Arc;

use crate::cli::args::{AdminAction, AdminArgs};
use crate::config::Config;
use crate::domain::Actor;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence};
use crate::services::{NewUser, UserManager, UserService};

/// Audit actor for accounts created from the command line
const CLI_ACTOR: &str = "cli";

/// Execute the admin command
pub async fn execute(args: AdminArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let users = UserManager::new(Arc::new(Persistence::new(db.connection().clone())));

    match args.action {
        AdminAction::Create {
            email,
            password,
            name,
            role,
        } => {
            let user = users
                .create_user(
                    NewUser {
                        email,
                        password,
                        display_name: name,
                        role,
                    },
                    Actor::new(None, CLI_ACTOR),
                )
                .await?;
            tracing::info!(user_id = %user.id, email = %user.email, role = %user.role, "Account created");
            println!("{} ({}) created with id {}", user.email, user.role, user.id);
        }
    }

    Ok(())
}
