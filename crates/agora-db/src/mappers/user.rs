//! User entity <-> model mapper

use agora_core::{Snowflake, User};

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            profile_image_url: model.profile_image_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
