// Volunteer registration contract
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use crate::config::RegistryConfig;
use crate::primitives::{Principal, RecordId, RegistryError, Result, StateHash, StateHasher};
use super::registry::{ContractKind, Record, Registry, RegistryEvent};

pub const STATUS_ACTIVE: u8 = 1;
pub const STATUS_INACTIVE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum VolunteerStatus {
    Active,
    Inactive,
}

impl From<VolunteerStatus> for u8 {
    fn from(status: VolunteerStatus) -> u8 {
        match status {
            VolunteerStatus::Active => STATUS_ACTIVE,
            VolunteerStatus::Inactive => STATUS_INACTIVE,
        }
    }
}

impl TryFrom<u8> for VolunteerStatus {
    type Error = RegistryError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            STATUS_ACTIVE => Ok(VolunteerStatus::Active),
            STATUS_INACTIVE => Ok(VolunteerStatus::Inactive),
            other => Err(RegistryError::InvalidStatus(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerFields {
    pub name: String,
    pub skills: String,
}

pub type Volunteer = Record<VolunteerFields, VolunteerStatus>;

pub struct VolunteerKind;

impl ContractKind for VolunteerKind {
    const NAME: &'static str = "volunteer-registration";
    type Status = VolunteerStatus;
    type Fields = VolunteerFields;

    fn initial_status() -> VolunteerStatus {
        VolunteerStatus::Active
    }

    fn commit_fields(fields: &VolunteerFields, hasher: &mut StateHasher) {
        hasher.str(&fields.name).str(&fields.skills);
    }
}

pub struct VolunteerRegistrationContract {
    registry: Registry<VolunteerKind>,
}

impl VolunteerRegistrationContract {
    pub fn new(admin: Principal) -> Self {
        Self {
            registry: Registry::new(admin),
        }
    }

    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(config.admin.clone())
    }

    pub fn register_volunteer(
        &mut self,
        name: impl Into<String>,
        skills: impl Into<String>,
        sender: &Principal,
    ) -> Result<RecordId> {
        let fields = VolunteerFields {
            name: name.into(),
            skills: skills.into(),
        };
        self.registry.register(fields, sender)
    }

    /// Admin-only. Volunteers move freely between active and inactive.
    pub fn update_status(&mut self, id: RecordId, status: VolunteerStatus, sender: &Principal) -> Result<()> {
        self.require_admin(id, sender)?;
        self.registry.set_status(id, status)
    }

    /// Raw-code variant of `update_status`; the code is decoded after the admin check
    pub fn update_status_with_code(&mut self, id: RecordId, code: u8, sender: &Principal) -> Result<()> {
        self.require_admin(id, sender)?;
        let status = VolunteerStatus::try_from(code)?;
        self.registry.set_status(id, status)
    }

    fn require_admin(&self, id: RecordId, sender: &Principal) -> Result<()> {
        if !self.registry.is_admin(sender) {
            warn!("{} is not the admin, refusing status change of volunteer #{}", sender, id);
            return Err(RegistryError::Unauthorized);
        }
        Ok(())
    }

    /// Replace the sender's own skill list. Any registered volunteer may do this.
    pub fn update_skills(&mut self, skills: impl Into<String>, sender: &Principal) -> Result<()> {
        let skills = skills.into();
        let id = self.registry.update_own_fields(sender, |fields| fields.skills = skills)?;
        info!("volunteer #{} updated skills", id);
        self.registry.emit(RegistryEvent::SkillsUpdated { id });
        Ok(())
    }

    pub fn get_volunteer(&self, id: RecordId) -> Option<&Volunteer> {
        self.registry.get(id)
    }

    pub fn get_id(&self, principal: &Principal) -> Option<RecordId> {
        self.registry.get_id(principal)
    }

    pub fn is_active(&self, id: RecordId) -> bool {
        self.registry.has_status(id, VolunteerStatus::Active)
    }

    pub fn admin(&self) -> &Principal {
        self.registry.admin()
    }

    pub fn volunteer_count(&self) -> u64 {
        self.registry.record_count()
    }

    pub fn volunteers(&self) -> impl Iterator<Item = (RecordId, &Volunteer)> {
        self.registry.records()
    }

    pub fn events(&self) -> &[RegistryEvent] {
        self.registry.events()
    }

    pub fn state_hash(&self) -> StateHash {
        self.registry.state_hash()
    }
}
