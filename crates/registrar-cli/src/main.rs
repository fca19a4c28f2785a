use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;
use registrar_auth::{TokenCodec, TokenIntrospector, TokenIssuer, TokenKind, TokenPayload};
use registrar_cache::connect_revocation_store;
use registrar_config::{JwtConfig, RevocationBackend, RevocationConfig};
use registrar_core::{Role, SubjectId};
use serde_json::json;

#[derive(Parser)]
#[command(name = "registrar-cli")]
#[command(about = "Registrar CLI - Token administration tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue an access and refresh token pair for a subject
    IssueToken {
        /// Subject id
        #[arg(short = 's', long)]
        subject: SubjectId,

        /// Role: student, lecturer or admin
        #[arg(short = 'r', long)]
        role: Role,
    },
    /// Invalidate every refresh token issued to a subject
    Revoke {
        /// Subject id
        #[arg(short = 's', long)]
        subject: SubjectId,
    },
    /// Verify a token and print its payload or the failure reason
    Introspect {
        /// Which key and checks to apply
        #[arg(short = 'k', long, value_enum, default_value = "access")]
        kind: KindArg,

        /// The encoded token
        token: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Access,
    Refresh,
}

impl From<KindArg> for TokenKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Access => TokenKind::Access,
            KindArg::Refresh => TokenKind::Refresh,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("\n❌ {e:#}");
        std::process::exit(1);
    }
}

impl Commands {
    /// Whether the command reads or advances revocation generations.
    fn uses_revocation_store(&self) -> bool {
        match self {
            Commands::IssueToken { .. } | Commands::Revoke { .. } => true,
            Commands::Introspect { kind, .. } => matches!(kind, KindArg::Refresh),
        }
    }
}

/// Refuses commands that would act on a store private to this process.
///
/// An in-memory store lives inside the server; a CLI process would only see
/// and advance its own empty copy.
fn ensure_shared_store(command: &Commands, config: &RevocationConfig) -> anyhow::Result<()> {
    if command.uses_revocation_store() && config.backend == RevocationBackend::Memory {
        bail!(
            "this command needs the server's revocation store; \
             set REVOCATION_BACKEND=redis and REDIS_URL"
        );
    }
    Ok(())
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let jwt_config = JwtConfig::from_env().context("Invalid JWT configuration")?;
    let revocation_config =
        RevocationConfig::from_env().context("Invalid revocation store configuration")?;
    ensure_shared_store(&command, &revocation_config)?;
    let store = connect_revocation_store(&revocation_config)
        .await
        .context("Failed to connect revocation store")?;

    let codec = Arc::new(TokenCodec::new(&jwt_config));
    let timeout = revocation_config.timeout;

    match command {
        Commands::IssueToken { subject, role } => {
            let issuer = TokenIssuer::new(codec, store, timeout);
            let pair = issuer
                .issue_pair(TokenPayload::new(subject, role))
                .await
                .context("Failed to issue tokens")?;

            println!("{}", serde_json::to_string_pretty(&pair)?);
        }
        Commands::Revoke { subject } => {
            let issuer = TokenIssuer::new(codec, store, timeout);
            let generation = issuer
                .revoke(subject)
                .await
                .context("Failed to revoke tokens")?;

            println!("✅ Refresh tokens revoked for subject {subject} (generation {generation})");
        }
        Commands::Introspect { kind, token } => {
            let introspector = TokenIntrospector::new(codec, store, timeout);
            let result = match TokenKind::from(kind) {
                TokenKind::Access => introspector.introspect_access(&token),
                TokenKind::Refresh => introspector.introspect_refresh(&token).await,
            };

            let report = match (result.verified(), result.error()) {
                (Some(verified), _) => json!({
                    "active": true,
                    "subject_id": verified.payload().subject_id,
                    "role": verified.payload().role,
                    "kind": verified.kind(),
                    "issued_at": verified.issued_at(),
                    "expires_at": verified.expires_at(),
                    "jti": verified.token_id(),
                }),
                (None, failure) => json!({
                    "active": false,
                    "reason": failure.map(|f| f.reason()),
                }),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
