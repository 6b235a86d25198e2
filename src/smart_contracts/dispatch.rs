// Contract call interface: serialized calls in, `{value}` / `{error}` results out
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Debug;
use std::path::Path;
use tracing::debug;
use crate::primitives::{ConfigError, Principal, RecordId, Result, StateHash};
use super::organization_verification::{Organization, OrganizationVerificationContract};
use super::volunteer_registration::{Volunteer, VolunteerRegistrationContract};

/// Outcome of a contract call. Serializes as `{"value": ...}` or `{"error": code}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallResult {
    Value(Value),
    Error(u8),
}

impl CallResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, CallResult::Value(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            CallResult::Value(value) => Some(value),
            CallResult::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<u8> {
        match self {
            CallResult::Value(_) => None,
            CallResult::Error(code) => Some(*code),
        }
    }
}

impl From<Result<Value>> for CallResult {
    fn from(result: Result<Value>) -> Self {
        match result {
            Ok(value) => CallResult::Value(value),
            Err(err) => CallResult::Error(err.code()),
        }
    }
}

/// A call together with the principal sending it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractCall<C> {
    pub sender: Principal,
    pub call: C,
}

impl<C> ContractCall<C> {
    pub fn new(sender: impl Into<Principal>, call: C) -> Self {
        Self { sender: sender.into(), call }
    }
}

/// Result of one replayed call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractReceipt {
    pub index: usize,
    pub sender: Principal,
    pub method: String,
    pub result: CallResult,
    pub state_hash: StateHash,
}

pub trait Contract {
    type Call: Debug + Serialize + DeserializeOwned;

    fn method_name(call: &Self::Call) -> &'static str;

    /// Execute one call. Never panics; every failure is an error code.
    fn execute(&mut self, sender: &Principal, call: Self::Call) -> CallResult;

    fn commitment(&self) -> StateHash;
}

/// Replay `calls` in order against `contract`, one receipt per call
pub fn execute_script<C, I>(contract: &mut C, calls: I) -> Vec<ContractReceipt>
where
    C: Contract,
    I: IntoIterator<Item = ContractCall<C::Call>>,
{
    calls
        .into_iter()
        .enumerate()
        .map(|(index, ContractCall { sender, call })| {
            let method = C::method_name(&call);
            let result = contract.execute(&sender, call);
            ContractReceipt {
                index,
                sender,
                method: method.to_string(),
                result,
                state_hash: contract.commitment(),
            }
        })
        .collect()
}

/// Read a JSON array of calls from disk
pub fn load_call_script<C: DeserializeOwned>(path: impl AsRef<Path>) -> std::result::Result<Vec<ContractCall<C>>, ConfigError> {
    let path = path.as_ref();
    debug!("Loading call script from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn optional_id(id: Option<RecordId>) -> Value {
    id.map_or(Value::Null, |id| json!(id))
}

fn organization_json(org: &Organization) -> Value {
    json!({
        "principal": org.owner,
        "name": org.fields.name,
        "description": org.fields.description,
        "status": u8::from(org.status),
    })
}

fn volunteer_json(volunteer: &Volunteer) -> Value {
    json!({
        "principal": volunteer.owner,
        "name": volunteer.fields.name,
        "skills": volunteer.fields.skills,
        "status": u8::from(volunteer.status),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum OrganizationCall {
    RegisterOrganization { name: String, description: String },
    AddVerifier { verifier: Principal },
    VerifyOrganization { id: RecordId, status: u8 },
    GetOrganization { id: RecordId },
    GetId { principal: Principal },
    IsVerified { id: RecordId },
}

impl OrganizationVerificationContract {
    fn dispatch(&mut self, sender: &Principal, call: OrganizationCall) -> Result<Value> {
        match call {
            OrganizationCall::RegisterOrganization { name, description } => {
                let id = self.register_organization(name, description, sender)?;
                Ok(json!(id))
            }
            OrganizationCall::AddVerifier { verifier } => {
                self.add_verifier(verifier, sender)?;
                Ok(json!(true))
            }
            OrganizationCall::VerifyOrganization { id, status } => {
                self.verify_organization_with_code(id, status, sender)?;
                Ok(json!(true))
            }
            OrganizationCall::GetOrganization { id } => {
                Ok(self.get_organization(id).map_or(Value::Null, organization_json))
            }
            OrganizationCall::GetId { principal } => Ok(optional_id(self.get_id(&principal))),
            OrganizationCall::IsVerified { id } => Ok(json!(self.is_verified(id))),
        }
    }
}

impl Contract for OrganizationVerificationContract {
    type Call = OrganizationCall;

    fn method_name(call: &OrganizationCall) -> &'static str {
        match call {
            OrganizationCall::RegisterOrganization { .. } => "register-organization",
            OrganizationCall::AddVerifier { .. } => "add-verifier",
            OrganizationCall::VerifyOrganization { .. } => "verify-organization",
            OrganizationCall::GetOrganization { .. } => "get-organization",
            OrganizationCall::GetId { .. } => "get-id",
            OrganizationCall::IsVerified { .. } => "is-verified",
        }
    }

    fn execute(&mut self, sender: &Principal, call: OrganizationCall) -> CallResult {
        debug!("organization-verification <- {} {:?}", sender, call);
        self.dispatch(sender, call).into()
    }

    fn commitment(&self) -> StateHash {
        self.state_hash()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum VolunteerCall {
    RegisterVolunteer { name: String, skills: String },
    UpdateStatus { id: RecordId, status: u8 },
    UpdateSkills { skills: String },
    GetVolunteer { id: RecordId },
    GetId { principal: Principal },
    IsActive { id: RecordId },
}

impl VolunteerRegistrationContract {
    fn dispatch(&mut self, sender: &Principal, call: VolunteerCall) -> Result<Value> {
        match call {
            VolunteerCall::RegisterVolunteer { name, skills } => {
                let id = self.register_volunteer(name, skills, sender)?;
                Ok(json!(id))
            }
            VolunteerCall::UpdateStatus { id, status } => {
                self.update_status_with_code(id, status, sender)?;
                Ok(json!(true))
            }
            VolunteerCall::UpdateSkills { skills } => {
                self.update_skills(skills, sender)?;
                Ok(json!(true))
            }
            VolunteerCall::GetVolunteer { id } => {
                Ok(self.get_volunteer(id).map_or(Value::Null, volunteer_json))
            }
            VolunteerCall::GetId { principal } => Ok(optional_id(self.get_id(&principal))),
            VolunteerCall::IsActive { id } => Ok(json!(self.is_active(id))),
        }
    }
}

impl Contract for VolunteerRegistrationContract {
    type Call = VolunteerCall;

    fn method_name(call: &VolunteerCall) -> &'static str {
        match call {
            VolunteerCall::RegisterVolunteer { .. } => "register-volunteer",
            VolunteerCall::UpdateStatus { .. } => "update-status",
            VolunteerCall::UpdateSkills { .. } => "update-skills",
            VolunteerCall::GetVolunteer { .. } => "get-volunteer",
            VolunteerCall::GetId { .. } => "get-id",
            VolunteerCall::IsActive { .. } => "is-active",
        }
    }

    fn execute(&mut self, sender: &Principal, call: VolunteerCall) -> CallResult {
        debug!("volunteer-registration <- {} {:?}", sender, call);
        self.dispatch(sender, call).into()
    }

    fn commitment(&self) -> StateHash {
        self.state_hash()
    }
}
