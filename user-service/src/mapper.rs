//! `User` <-> `UserDto` conversion.

use service_core::crud::{is_blank, Mapper};

use crate::dtos::UserDto;
use crate::models::User;

#[derive(Debug, Clone, Copy, Default)]
pub struct UserMapper;

impl UserMapper {
    /// Public view of a user: name and image only. Email and Google ID are
    /// left empty.
    pub fn to_basic_dto(&self, user: &User) -> UserDto {
        UserDto {
            name: user.name.clone(),
            image_url: user.image_url.clone(),
            ..UserDto::default()
        }
    }
}

impl Mapper<User, UserDto> for UserMapper {
    fn to_dto(&self, user: &User) -> UserDto {
        UserDto {
            name: user.name.clone(),
            email: user.email.clone(),
            google_id: user.google_id.clone(),
            image_url: user.image_url.clone(),
        }
    }

    fn to_entity(&self, dto: &UserDto) -> User {
        User {
            google_id: dto.google_id.clone(),
            image_url: dto.image_url.clone(),
            ..User::new(dto.name.clone(), dto.email.clone())
        }
    }

    fn update_entity_from_dto(&self, user: &mut User, dto: &UserDto) {
        if !is_blank(Some(dto.name.as_str())) {
            user.name = dto.name.clone();
        }
        if !is_blank(Some(dto.email.as_str())) {
            user.email = dto.email.clone();
        }
        // Nullable end-to-end: always overwritten so clients can clear them.
        user.google_id = dto.google_id.clone();
        user.image_url = dto.image_url.clone();
    }
}
