//! Token command - signs a bearer token with the configured secret

use clap::{Args, ValueEnum};

use crate::config::AppConfig;
use crate::domain::{User, UserRole};
use crate::infrastructure::auth::{JwtGenerator, JwtService};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    General,
    Guest,
}

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => UserRole::Admin,
            RoleArg::General => UserRole::General,
            RoleArg::Guest => UserRole::Guest,
        }
    }
}

#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Username embedded in the token
    pub username: String,

    #[arg(long, value_enum, default_value = "admin")]
    pub role: RoleArg,

    /// Subtree a non-admin may manage
    #[arg(long, default_value = "/")]
    pub base_path: String,
}

/// Print a token for the requested user
pub async fn run(args: TokenArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let jwt_service = JwtService::new(crate::jwt_config(&config.auth, false)?);

    let user = User::new(args.username, args.role.into(), &args.base_path);
    println!("{}", jwt_service.generate(&user)?);

    Ok(())
}
