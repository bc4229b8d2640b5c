use crate::model::id::UserId;
use derive_new::new;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Mentor,
    Mentee,
}

// 上流の認証層で検証済みの呼び出し元
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn is_mentor(&self, mentor_id: UserId) -> bool {
        self.role == Role::Mentor && self.user_id == mentor_id
    }

    pub fn is_mentee(&self, mentee_id: UserId) -> bool {
        self.role == Role::Mentee && self.user_id == mentee_id
    }
}
