use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};

use lastresort::adapters::{GpgmeSignatureService, StdioPrompt};
use lastresort::locator::{find_signature_file, SIGNATURE_FILE_NAME};
use lastresort::model::{Challenge, Fingerprint, TrustConfig};
use lastresort::ports::MessageSigner;
use lastresort::state::ChallengeState;
use lastresort::UserContext;

#[derive(Parser, Debug)]
#[command(name = "lastresort")]
#[command(about = "Possession-factor authentication via rotating signed challenges", version)]
pub struct Cli {
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Home directory holding the config and state files (defaults to $HOME)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enroll this user: write the trust config and the initial challenge
    Enroll {
        /// Full fingerprint of the key authorized to sign challenges
        #[arg(long)]
        fingerprint: String,

        /// Mount point under which the removable medium is expected
        #[arg(long)]
        mount_point: PathBuf,

        /// Machine identifier bound to the installation (defaults to /etc/machine-id)
        #[arg(long)]
        machine_id: Option<String>,

        /// Overwrite an existing enrollment
        #[arg(long)]
        force: bool,
    },

    /// Show the enrolled configuration and the current challenge
    Status,

    /// Re-sign the current challenge onto the medium (resync a stale copy)
    Sign,

    /// Run one authentication attempt; exits 0 granted, 1 denied, 2 unavailable
    Authenticate,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    let home = match cli.home {
        Some(home) => home,
        None => env::var_os("HOME")
            .map(PathBuf::from)
            .context("HOME is not set; pass --home")?,
    };
    let mut ctx = UserContext::for_home(&home);
    if let Some(gnupg_home) = env::var_os("GNUPGHOME") {
        ctx.gnupg_home = PathBuf::from(gnupg_home);
    }

    match cli.command {
        Commands::Enroll {
            fingerprint,
            mount_point,
            machine_id,
            force,
        } => {
            let fingerprint = Fingerprint::new(&fingerprint)
                .map_err(|e| anyhow::anyhow!("invalid fingerprint: {e}"))?;
            if !force && (ctx.config_path.exists() || ctx.state_path.exists()) {
                anyhow::bail!(
                    "already enrolled at {} (use --force to overwrite)",
                    home.display()
                );
            }

            let machine_id = match machine_id {
                Some(id) => id,
                None => fs::read_to_string("/etc/machine-id")
                    .context("cannot read /etc/machine-id; pass --machine-id")?
                    .trim()
                    .to_string(),
            };
            let challenge = Challenge::initial(&machine_id)
                .map_err(|e| anyhow::anyhow!("invalid machine id: {e}"))?;

            fs::write(
                &ctx.config_path,
                format!("{} {}\n", fingerprint, mount_point.display()),
            )
            .with_context(|| format!("cannot write {}", ctx.config_path.display()))?;
            fs::write(&ctx.state_path, format!("{challenge}\n"))
                .with_context(|| format!("cannot write {}", ctx.state_path.display()))?;

            println!("enrolled machine {}", challenge.machine_id());
            println!("config: {}", ctx.config_path.display());
            println!("state:  {}", ctx.state_path.display());
        }

        Commands::Status => {
            let config = TrustConfig::load(&ctx.config_path)?;
            let state = ChallengeState::open(&ctx.state_path)?;
            println!("trusted fingerprint: {}", config.trusted_fingerprint());
            println!("mount point:         {}", config.mount_point().display());
            println!("current challenge:   {}", state.current());
        }

        Commands::Sign => {
            let config = TrustConfig::load(&ctx.config_path)?;
            let state = ChallengeState::open(&ctx.state_path)?;
            let mut service = GpgmeSignatureService::new(&ctx.gnupg_home)?;

            let blob = service.sign_message(
                state.current().to_string().as_bytes(),
                config.trusted_fingerprint(),
            )?;
            let target = find_signature_file(config.mount_point(), SIGNATURE_FILE_NAME)
                .unwrap_or_else(|| config.mount_point().join(SIGNATURE_FILE_NAME));
            fs::write(&target, &blob)
                .with_context(|| format!("cannot write {}", target.display()))?;

            println!("signed current challenge onto {}", target.display());
        }

        Commands::Authenticate => {
            let mut prompt = StdioPrompt;
            let outcome = lastresort::authenticate(&ctx, &mut prompt);
            println!("{outcome}");
            std::process::exit(outcome.exit_code());
        }
    }

    Ok(())
}
