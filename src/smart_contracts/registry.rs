// Principal-keyed single-registration registry shared by both contracts
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::{debug, info, warn};
use crate::primitives::{Principal, RecordId, RegistryError, Result, StateHash, StateHasher};

/// Per-contract parameters of the registry: record fields, status codes and
/// the status every new record starts in.
pub trait ContractKind {
    /// Domain tag mixed into state commitments and used in log lines
    const NAME: &'static str;

    type Status: Copy + Eq + Debug + Into<u8> + TryFrom<u8, Error = RegistryError>;
    type Fields: Clone + Debug + PartialEq;

    fn initial_status() -> Self::Status;

    /// Feed the record fields into a state commitment in a fixed order
    fn commit_fields(fields: &Self::Fields, hasher: &mut StateHasher);
}

/// A registered record. Only `status` (and fields a contract explicitly
/// exposes for editing) change after registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<F, S> {
    #[serde(rename = "principal")]
    pub owner: Principal,
    #[serde(flatten)]
    pub fields: F,
    pub status: S,
}

/// Events emitted by successful state-changing calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum RegistryEvent {
    Registered { id: RecordId, owner: Principal },
    VerifierAdded { verifier: Principal },
    StatusUpdated { id: RecordId, status: u8 },
    SkillsUpdated { id: RecordId },
}

pub struct Registry<K: ContractKind> {
    admin: Principal,
    next_id: RecordId,
    records_by_id: BTreeMap<RecordId, Record<K::Fields, K::Status>>,
    id_by_principal: BTreeMap<Principal, RecordId>,
    events: Vec<RegistryEvent>,
}

impl<K: ContractKind> Registry<K> {
    pub fn new(admin: Principal) -> Self {
        debug!("Deploying {} registry with admin {}", K::NAME, admin);
        Self {
            admin,
            next_id: 0,
            records_by_id: BTreeMap::new(),
            id_by_principal: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    pub fn admin(&self) -> &Principal {
        &self.admin
    }

    pub fn is_admin(&self, principal: &Principal) -> bool {
        &self.admin == principal
    }

    /// Register `sender` with `fields`. A principal can register once, ever.
    pub fn register(&mut self, fields: K::Fields, sender: &Principal) -> Result<RecordId> {
        if self.id_by_principal.contains_key(sender) {
            warn!("{}: {} is already registered", K::NAME, sender);
            return Err(RegistryError::AlreadyRegistered);
        }

        let id = self.next_id + 1;
        self.records_by_id.insert(id, Record {
            owner: sender.clone(),
            fields,
            status: K::initial_status(),
        });
        self.id_by_principal.insert(sender.clone(), id);
        self.next_id = id;
        debug_assert!(self.is_consistent());

        info!("{}: registered {} as #{}", K::NAME, sender, id);
        self.emit(RegistryEvent::Registered { id, owner: sender.clone() });
        Ok(id)
    }

    /// Overwrite the status of record `id`. Callers perform role checks first.
    pub(crate) fn set_status(&mut self, id: RecordId, status: K::Status) -> Result<()> {
        let record = self.records_by_id.get_mut(&id).ok_or_else(|| {
            warn!("{}: status update for unknown record #{}", K::NAME, id);
            RegistryError::NotFound
        })?;
        record.status = status;

        info!("{}: record #{} status -> {:?}", K::NAME, id, status);
        self.emit(RegistryEvent::StatusUpdated { id, status: status.into() });
        Ok(())
    }

    /// Apply `update` to the fields of the record owned by `sender`
    pub(crate) fn update_own_fields<F>(&mut self, sender: &Principal, update: F) -> Result<RecordId>
    where
        F: FnOnce(&mut K::Fields),
    {
        let id = self.get_id(sender).ok_or_else(|| {
            warn!("{}: {} has no record to update", K::NAME, sender);
            RegistryError::NotFound
        })?;
        // Unreachable while both indexes agree; kept as an error rather than a panic.
        debug_assert!(self.records_by_id.contains_key(&id));
        let record = self.records_by_id.get_mut(&id).ok_or(RegistryError::NotFound)?;
        update(&mut record.fields);
        Ok(id)
    }

    pub(crate) fn emit(&mut self, event: RegistryEvent) {
        self.events.push(event);
    }

    pub fn get(&self, id: RecordId) -> Option<&Record<K::Fields, K::Status>> {
        self.records_by_id.get(&id)
    }

    pub fn get_id(&self, principal: &Principal) -> Option<RecordId> {
        self.id_by_principal.get(principal).copied()
    }

    /// `false` both when `id` is absent and when it is in another status
    pub fn has_status(&self, id: RecordId, status: K::Status) -> bool {
        self.get(id).map_or(false, |record| record.status == status)
    }

    /// Number of ids handed out so far (also the highest id)
    pub fn record_count(&self) -> u64 {
        self.next_id
    }

    /// Records in id order
    pub fn records(&self) -> impl Iterator<Item = (RecordId, &Record<K::Fields, K::Status>)> {
        self.records_by_id.iter().map(|(id, record)| (*id, record))
    }

    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    /// Commitment over admin, counter and records. Contracts with extra
    /// state continue hashing through `extend`.
    pub fn state_hash_with<F>(&self, extend: F) -> StateHash
    where
        F: FnOnce(&mut StateHasher),
    {
        let mut hasher = StateHasher::new(K::NAME);
        hasher.str(self.admin.as_str()).u64(self.next_id);
        for (id, record) in &self.records_by_id {
            hasher.u64(*id).str(record.owner.as_str());
            K::commit_fields(&record.fields, &mut hasher);
            let status: u8 = record.status.into();
            hasher.u64(status as u64);
        }
        extend(&mut hasher);
        hasher.finish()
    }

    pub fn state_hash(&self) -> StateHash {
        self.state_hash_with(|_| {})
    }

    /// Both indexes agree and ids are dense from 1
    pub fn is_consistent(&self) -> bool {
        self.records_by_id.len() == self.id_by_principal.len()
            && self.records_by_id.len() as u64 == self.next_id
            && self.id_by_principal.iter().all(|(principal, id)| {
                self.records_by_id
                    .get(id)
                    .map_or(false, |record| &record.owner == principal)
            })
            && self.records_by_id.keys().copied().eq(1..=self.next_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Flag {
        On = 1,
        Off = 2,
    }

    impl From<Flag> for u8 {
        fn from(flag: Flag) -> u8 {
            flag as u8
        }
    }

    impl TryFrom<u8> for Flag {
        type Error = RegistryError;

        fn try_from(code: u8) -> Result<Self> {
            match code {
                1 => Ok(Flag::On),
                2 => Ok(Flag::Off),
                other => Err(RegistryError::InvalidStatus(other)),
            }
        }
    }

    struct TestKind;

    impl ContractKind for TestKind {
        const NAME: &'static str = "test-registry";
        type Status = Flag;
        type Fields = String;

        fn initial_status() -> Flag {
            Flag::On
        }

        fn commit_fields(fields: &String, hasher: &mut StateHasher) {
            hasher.str(fields);
        }
    }

    fn registry() -> Registry<TestKind> {
        Registry::new(Principal::from("admin"))
    }

    #[test]
    fn test_ids_are_dense_and_sequential() {
        let mut reg = registry();
        for (n, name) in ["a", "b", "c", "d"].iter().enumerate() {
            let id = reg.register(name.to_string(), &Principal::from(*name)).unwrap();
            assert_eq!(id, n as u64 + 1);
            assert_eq!(reg.get_id(&Principal::from(*name)), Some(id));
        }
        assert_eq!(reg.record_count(), 4);
        assert!(reg.is_consistent());
    }

    #[test]
    fn test_second_registration_rejected_without_side_effects() {
        let mut reg = registry();
        let alice = Principal::from("alice");
        reg.register("first".to_string(), &alice).unwrap();
        let before = reg.state_hash();

        let err = reg.register("second".to_string(), &alice).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered);
        assert_eq!(reg.state_hash(), before);
        assert_eq!(reg.get(1).unwrap().fields, "first");
        assert_eq!(reg.events().len(), 1);
    }

    #[test]
    fn test_set_status_missing_record() {
        let mut reg = registry();
        assert_eq!(reg.set_status(42, Flag::Off), Err(RegistryError::NotFound));
        assert!(reg.events().is_empty());
    }

    #[test]
    fn test_has_status_absent_and_mismatched() {
        let mut reg = registry();
        assert!(!reg.has_status(1, Flag::On));
        reg.register("x".to_string(), &Principal::from("p")).unwrap();
        assert!(reg.has_status(1, Flag::On));
        reg.set_status(1, Flag::Off).unwrap();
        assert!(!reg.has_status(1, Flag::On));
    }

    #[test]
    fn test_update_own_fields_requires_registration() {
        let mut reg = registry();
        let bob = Principal::from("bob");
        let err = reg.update_own_fields(&bob, |f| f.push('!')).unwrap_err();
        assert_eq!(err, RegistryError::NotFound);

        reg.register("hi".to_string(), &bob).unwrap();
        assert_eq!(reg.update_own_fields(&bob, |f| f.push('!')), Ok(1));
        assert_eq!(reg.get(1).unwrap().fields, "hi!");
    }

    #[test]
    fn test_state_hash_tracks_status() {
        let mut reg = registry();
        reg.register("x".to_string(), &Principal::from("p")).unwrap();
        let active = reg.state_hash();
        reg.set_status(1, Flag::Off).unwrap();
        assert_ne!(reg.state_hash(), active);
        reg.set_status(1, Flag::On).unwrap();
        assert_eq!(reg.state_hash(), active);
    }
}
