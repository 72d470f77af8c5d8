//! Member service

use tracing::info;

use crate::audit::EntityType;
use crate::error::{FairshareError, FairshareResult};
use crate::models::Member;
use crate::storage::Storage;

/// Service for group membership
pub struct MemberService<'a> {
    storage: &'a Storage,
}

impl<'a> MemberService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a member to the group
    pub fn add(&self, display_name: &str) -> FairshareResult<Member> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(FairshareError::Validation(
                "Member name cannot be empty".into(),
            ));
        }

        let member = Member::new(display_name);
        self.storage.members.insert(member.clone())?;
        self.storage.members.save()?;

        self.storage.log_create(
            EntityType::Member,
            member.id.to_string(),
            Some(member.display_name.clone()),
            &member,
        );

        info!(member = %member.id, "member added");
        Ok(member)
    }

    /// Look a member up by name or ID
    pub fn resolve(&self, reference: &str) -> FairshareResult<Member> {
        self.storage
            .members
            .find(reference)?
            .ok_or_else(|| FairshareError::member_not_found(reference))
    }

    /// Resolve several references, failing on the first unknown one
    pub fn resolve_all(&self, references: &[String]) -> FairshareResult<Vec<Member>> {
        references.iter().map(|r| self.resolve(r)).collect()
    }

    pub fn list(&self) -> FairshareResult<Vec<Member>> {
        self.storage.members.get_all()
    }
}
