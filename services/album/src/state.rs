//! Application state shared across handlers

use crate::jwt::JwtService;
use crate::media::MediaStore;
use crate::repositories::UserRepository;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repository: UserRepository,
    pub jwt_service: JwtService,
    pub media_store: MediaStore,
}
