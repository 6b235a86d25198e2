// Organization verification contract: organizations self-register, the admin
// appoints verifiers, verifiers set organization status.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};
use crate::config::RegistryConfig;
use crate::primitives::{Principal, RecordId, RegistryError, Result, StateHash, StateHasher};
use super::registry::{ContractKind, Record, Registry, RegistryEvent};

pub const STATUS_PENDING: u8 = 1;
pub const STATUS_VERIFIED: u8 = 2;
pub const STATUS_REJECTED: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OrganizationStatus {
    Pending,
    Verified,
    Rejected,
}

impl From<OrganizationStatus> for u8 {
    fn from(status: OrganizationStatus) -> u8 {
        match status {
            OrganizationStatus::Pending => STATUS_PENDING,
            OrganizationStatus::Verified => STATUS_VERIFIED,
            OrganizationStatus::Rejected => STATUS_REJECTED,
        }
    }
}

impl TryFrom<u8> for OrganizationStatus {
    type Error = RegistryError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            STATUS_PENDING => Ok(OrganizationStatus::Pending),
            STATUS_VERIFIED => Ok(OrganizationStatus::Verified),
            STATUS_REJECTED => Ok(OrganizationStatus::Rejected),
            other => Err(RegistryError::InvalidStatus(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationFields {
    pub name: String,
    pub description: String,
}

pub type Organization = Record<OrganizationFields, OrganizationStatus>;

pub struct OrganizationKind;

impl ContractKind for OrganizationKind {
    const NAME: &'static str = "organization-verification";
    type Status = OrganizationStatus;
    type Fields = OrganizationFields;

    fn initial_status() -> OrganizationStatus {
        OrganizationStatus::Pending
    }

    fn commit_fields(fields: &OrganizationFields, hasher: &mut StateHasher) {
        hasher.str(&fields.name).str(&fields.description);
    }
}

/// Organization registry plus the admin-managed verifier set.
///
/// The admin is not implicitly a verifier; it has to add itself to change
/// organization status. Verifiers may move a record between any statuses.
pub struct OrganizationVerificationContract {
    registry: Registry<OrganizationKind>,
    verifiers: BTreeSet<Principal>,
}

impl OrganizationVerificationContract {
    pub fn new(admin: Principal) -> Self {
        Self {
            registry: Registry::new(admin),
            verifiers: BTreeSet::new(),
        }
    }

    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(config.admin.clone())
    }

    pub fn register_organization(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        sender: &Principal,
    ) -> Result<RecordId> {
        let fields = OrganizationFields {
            name: name.into(),
            description: description.into(),
        };
        self.registry.register(fields, sender)
    }

    /// Admin-only. Adding an existing verifier succeeds without changing state.
    pub fn add_verifier(&mut self, verifier: Principal, sender: &Principal) -> Result<()> {
        if !self.registry.is_admin(sender) {
            warn!("{} tried to add verifier {} without admin rights", sender, verifier);
            return Err(RegistryError::Unauthorized);
        }

        if self.verifiers.insert(verifier.clone()) {
            info!("🔑 Verifier added: {}", verifier);
            self.registry.emit(RegistryEvent::VerifierAdded { verifier });
        }
        Ok(())
    }

    /// Verifier-only. Role is checked before the record lookup.
    pub fn verify_organization(
        &mut self,
        id: RecordId,
        status: OrganizationStatus,
        sender: &Principal,
    ) -> Result<()> {
        self.require_verifier(id, sender)?;
        self.registry.set_status(id, status)
    }

    /// Same as `verify_organization` for a raw status code. The role check
    /// runs before the code is decoded.
    pub fn verify_organization_with_code(&mut self, id: RecordId, code: u8, sender: &Principal) -> Result<()> {
        self.require_verifier(id, sender)?;
        let status = OrganizationStatus::try_from(code)?;
        self.registry.set_status(id, status)
    }

    fn require_verifier(&self, id: RecordId, sender: &Principal) -> Result<()> {
        if !self.verifiers.contains(sender) {
            warn!("{} is not a verifier, refusing status change of #{}", sender, id);
            return Err(RegistryError::Unauthorized);
        }
        Ok(())
    }

    pub fn get_organization(&self, id: RecordId) -> Option<&Organization> {
        self.registry.get(id)
    }

    pub fn get_id(&self, principal: &Principal) -> Option<RecordId> {
        self.registry.get_id(principal)
    }

    pub fn is_verified(&self, id: RecordId) -> bool {
        self.registry.has_status(id, OrganizationStatus::Verified)
    }

    pub fn is_verifier(&self, principal: &Principal) -> bool {
        self.verifiers.contains(principal)
    }

    /// Verifiers in sorted order
    pub fn verifiers(&self) -> impl Iterator<Item = &Principal> {
        self.verifiers.iter()
    }

    pub fn admin(&self) -> &Principal {
        self.registry.admin()
    }

    pub fn organization_count(&self) -> u64 {
        self.registry.record_count()
    }

    pub fn organizations(&self) -> impl Iterator<Item = (RecordId, &Organization)> {
        self.registry.records()
    }

    pub fn events(&self) -> &[RegistryEvent] {
        self.registry.events()
    }

    pub fn state_hash(&self) -> StateHash {
        self.registry.state_hash_with(|hasher| {
            hasher.u64(self.verifiers.len() as u64);
            for verifier in &self.verifiers {
                hasher.str(verifier.as_str());
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_round_trip() {
        for code in [STATUS_PENDING, STATUS_VERIFIED, STATUS_REJECTED] {
            let status = OrganizationStatus::try_from(code).unwrap();
            assert_eq!(u8::from(status), code);
        }
        assert_eq!(OrganizationStatus::try_from(0), Err(RegistryError::InvalidStatus(0)));
        assert_eq!(OrganizationStatus::try_from(4), Err(RegistryError::InvalidStatus(4)));
    }

    #[test]
    fn test_organization_json_shape() {
        let mut contract = OrganizationVerificationContract::new(Principal::from("admin"));
        contract
            .register_organization("Helping Hands", "Community service organization", &Principal::from("org"))
            .unwrap();

        let json = serde_json::to_value(contract.get_organization(1).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({
            "principal": "org",
            "name": "Helping Hands",
            "description": "Community service organization",
            "status": 1,
        }));
    }

    #[test]
    fn test_admin_is_not_a_verifier() {
        let admin = Principal::from("admin");
        let mut contract = OrganizationVerificationContract::new(admin.clone());
        contract.register_organization("Org", "Desc", &Principal::from("org")).unwrap();

        let err = contract.verify_organization(1, OrganizationStatus::Verified, &admin).unwrap_err();
        assert_eq!(err, RegistryError::Unauthorized);

        contract.add_verifier(admin.clone(), &admin).unwrap();
        contract.verify_organization(1, OrganizationStatus::Verified, &admin).unwrap();
        assert!(contract.is_verified(1));
    }

    #[test]
    fn test_raw_status_code_checks_role_first() {
        let admin = Principal::from("admin");
        let verifier = Principal::from("v");
        let mut contract = OrganizationVerificationContract::new(admin.clone());
        contract.register_organization("Org", "Desc", &Principal::from("org")).unwrap();
        contract.add_verifier(verifier.clone(), &admin).unwrap();

        assert_eq!(
            contract.verify_organization_with_code(1, 9, &Principal::from("stranger")),
            Err(RegistryError::Unauthorized)
        );
        assert_eq!(
            contract.verify_organization_with_code(1, 9, &verifier),
            Err(RegistryError::InvalidStatus(9))
        );
        contract.verify_organization_with_code(1, STATUS_REJECTED, &verifier).unwrap();
        assert_eq!(contract.get_organization(1).unwrap().status, OrganizationStatus::Rejected);
    }

    #[test]
    fn test_verifier_re_add_emits_once() {
        let admin = Principal::from("admin");
        let mut contract = OrganizationVerificationContract::new(admin.clone());
        contract.add_verifier(Principal::from("v"), &admin).unwrap();
        let hash = contract.state_hash();
        contract.add_verifier(Principal::from("v"), &admin).unwrap();

        assert_eq!(contract.state_hash(), hash);
        assert_eq!(contract.events().len(), 1);
        assert_eq!(contract.verifiers().count(), 1);
    }
}
