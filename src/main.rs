// Registry node
// Replays contract call scripts against a fresh in-memory contract

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use civic_registry_contracts::{
    execute_script, load_call_script, smart_contracts::STATUS_INACTIVE, smart_contracts::STATUS_VERIFIED,
    Contract, ContractCall, OrganizationCall, OrganizationVerificationContract, Principal,
    RegistryConfig, VolunteerCall, VolunteerRegistrationContract,
};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "registry-node")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ContractArg {
    Organization,
    Volunteer,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON call script against a freshly deployed contract
    Run {
        /// Which contract to deploy
        #[arg(short, long, value_enum)]
        contract: ContractArg,
        /// JSON array of {"sender": ..., "call": {"method": ..., ...}}
        #[arg(short, long)]
        script: PathBuf,
        /// Deployment config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the admin principal from the config
        #[arg(long)]
        admin: Option<String>,
    },
    /// Run the built-in reference scenario (always uses the default admin; ignores config)
    Demo {
        #[arg(short, long, value_enum, default_value = "organization")]
        contract: ContractArg,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { contract, script, config, admin } => {
            let config = load_config(config, admin)?;
            match contract {
                ContractArg::Organization => {
                    let calls = load_call_script::<OrganizationCall>(&script)
                        .with_context(|| format!("reading call script {}", script.display()))?;
                    replay(&mut OrganizationVerificationContract::from_config(&config), calls)
                }
                ContractArg::Volunteer => {
                    let calls = load_call_script::<VolunteerCall>(&script)
                        .with_context(|| format!("reading call script {}", script.display()))?;
                    replay(&mut VolunteerRegistrationContract::from_config(&config), calls)
                }
            }
        }
        Commands::Demo { contract } => {
            let config = RegistryConfig::default();
            match contract {
                ContractArg::Organization => replay(
                    &mut OrganizationVerificationContract::from_config(&config),
                    organization_scenario(&config.admin),
                ),
                ContractArg::Volunteer => replay(
                    &mut VolunteerRegistrationContract::from_config(&config),
                    volunteer_scenario(&config.admin),
                ),
            }
        }
    }
}

fn load_config(path: Option<PathBuf>, admin: Option<String>) -> anyhow::Result<RegistryConfig> {
    let config = match path {
        Some(path) => RegistryConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RegistryConfig::default(),
    };
    match admin {
        Some(admin) => Ok(config.with_admin(Principal::from(admin))?),
        None => Ok(config),
    }
}

fn replay<C: Contract>(contract: &mut C, calls: Vec<ContractCall<C::Call>>) -> anyhow::Result<()> {
    info!("📋 Replaying {} calls", calls.len());
    let receipts = execute_script(contract, calls);

    let failed = receipts.iter().filter(|r| !r.result.is_ok()).count();
    for receipt in &receipts {
        println!("{}", serde_json::to_string(receipt)?);
    }

    info!("✅ {} calls executed, {} returned errors", receipts.len(), failed);
    println!("state-hash: {}", contract.commitment());
    Ok(())
}

fn organization_scenario(admin: &Principal) -> Vec<ContractCall<OrganizationCall>> {
    let org = "ST1SJ3DTE5DN7X54YDH5D64R3BCB6A2AG2ZQ8YPD5";
    let verifier = "ST3PF13W7Z0RRM42A8VZRVFQ75SV1K26RXEP8YGKJ";
    vec![
        ContractCall::new(org, OrganizationCall::RegisterOrganization {
            name: "Helping Hands".to_string(),
            description: "Community service organization".to_string(),
        }),
        ContractCall::new(org, OrganizationCall::AddVerifier { verifier: Principal::from(verifier) }),
        ContractCall::new(admin.clone(), OrganizationCall::AddVerifier { verifier: Principal::from(verifier) }),
        ContractCall::new(verifier, OrganizationCall::VerifyOrganization { id: 1, status: STATUS_VERIFIED }),
        ContractCall::new(verifier, OrganizationCall::GetOrganization { id: 1 }),
        ContractCall::new(verifier, OrganizationCall::IsVerified { id: 1 }),
    ]
}

fn volunteer_scenario(admin: &Principal) -> Vec<ContractCall<VolunteerCall>> {
    let volunteer = "ST3PF13W7Z0RRM42A8VZRVFQ75SV1K26RXEP8YGKJ";
    vec![
        ContractCall::new(volunteer, VolunteerCall::RegisterVolunteer {
            name: "John Doe".to_string(),
            skills: "Web Development, Graphic Design".to_string(),
        }),
        ContractCall::new(volunteer, VolunteerCall::RegisterVolunteer {
            name: "John Doe Again".to_string(),
            skills: "More Skills".to_string(),
        }),
        ContractCall::new(volunteer, VolunteerCall::UpdateSkills { skills: "Event Planning".to_string() }),
        ContractCall::new(admin.clone(), VolunteerCall::UpdateStatus { id: 1, status: STATUS_INACTIVE }),
        ContractCall::new(volunteer, VolunteerCall::GetVolunteer { id: 1 }),
        ContractCall::new(volunteer, VolunteerCall::IsActive { id: 1 }),
    ]
}
