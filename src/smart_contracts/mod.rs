// Registry smart contracts: organization verification and volunteer registration
pub mod registry;
pub mod organization_verification;
pub mod volunteer_registration;
pub mod dispatch;

pub use registry::{ContractKind, Record, Registry, RegistryEvent};
pub use organization_verification::{
    Organization,
    OrganizationFields,
    OrganizationStatus,
    OrganizationVerificationContract,
    STATUS_PENDING,
    STATUS_VERIFIED,
    STATUS_REJECTED,
};
pub use volunteer_registration::{
    Volunteer,
    VolunteerFields,
    VolunteerStatus,
    VolunteerRegistrationContract,
    STATUS_ACTIVE,
    STATUS_INACTIVE,
};
pub use dispatch::{
    execute_script, load_call_script,
    CallResult, Contract, ContractCall, ContractReceipt,
    OrganizationCall, VolunteerCall,
};
