//! Membership entity <-> model mapper

use gather_core::entities::Membership;
use gather_core::error::DomainError;
use gather_core::value_objects::{MemberRole, Snowflake};

use super::stored_optional_code;
use crate::models::MembershipModel;

impl TryFrom<MembershipModel> for Membership {
    type Error = DomainError;

    fn try_from(model: MembershipModel) -> Result<Self, Self::Error> {
        let role = MemberRole::parse(&model.role)
            .map_err(|_| DomainError::DatabaseError(format!("unknown role {:?}", model.role)))?;

        Ok(Membership {
            id: Snowflake::new(model.id),
            event_id: model.event_id.map(Snowflake::new),
            user_email: model.user_email,
            role,
            organization: model.organization,
            delegate_org_code: stored_optional_code(
                "delegate_org_code",
                model.delegate_org_code.as_deref(),
            )?,
            delegate_email: model.delegate_email,
            notes: model.notes,
            joined_at: model.joined_at,
            updated_at: model.updated_at,
        })
    }
}
