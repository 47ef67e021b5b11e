use std::sync::Arc;
use crate::domain::ports::{
    AddressRepository, AuthRepository, EventRepository, ParticipationRepository,
    ProfileRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub address_repo: Arc<dyn AddressRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub participation_repo: Arc<dyn ParticipationRepository>,
    pub auth_service: Arc<AuthService>,
}
