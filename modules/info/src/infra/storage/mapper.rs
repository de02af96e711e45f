use sea_orm::ActiveValue;

use crate::contract::{Info, NewInfo};
use crate::infra::storage::entity::{ActiveModel, Model as InfoEntity};

impl From<InfoEntity> for Info {
    fn from(rhs: InfoEntity) -> Self {
        Self {
            id: rhs.id,
            name: rhs.name,
        }
    }
}

impl From<&InfoEntity> for Info {
    fn from(rhs: &InfoEntity) -> Self {
        Self {
            id: rhs.id,
            name: rhs.name.clone(),
        }
    }
}

/// Active model for a save; the id stays unset when the store assigns it
#[must_use]
pub fn new_info_to_active_model(new: NewInfo) -> ActiveModel {
    ActiveModel {
        id: new.id.map_or(ActiveValue::NotSet, ActiveValue::Set),
        name: ActiveValue::Set(new.name),
    }
}
