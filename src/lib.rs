// Civic registry contracts
// In-memory models of the organization-verification and volunteer-registration contracts

pub mod primitives;
pub mod config;
pub mod smart_contracts;

// Re-export key types for easy access
pub use primitives::{
    primitives::*,
    error::*,
};

pub use config::RegistryConfig;

pub use smart_contracts::{
    OrganizationVerificationContract, OrganizationStatus, Organization,
    VolunteerRegistrationContract, VolunteerStatus, Volunteer,
    Registry, RegistryEvent, Record,
    Contract, ContractCall, ContractReceipt, CallResult,
    OrganizationCall, VolunteerCall,
    execute_script, load_call_script,
};
