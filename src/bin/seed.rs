//! Populates a database with demo accounts, addresses, events and participations.

use chrono::{Duration, NaiveDate, Utc};
use simbora_backend::config::Config;
use simbora_backend::domain::models::{
    address::{Address, AddressInput},
    event::{Event, EventCategory, EventStatus, NewEventParams},
    participation::{Participation, ParticipationStatus},
    profile::{Gender, Profile},
    user::User,
};
use simbora_backend::domain::services::auth_service::AuthService;
use simbora_backend::error::AppError;
use simbora_backend::infra::factory::bootstrap_state;
use simbora_backend::init_logging;
use simbora_backend::state::AppState;
use tracing::{info, warn};

const DEMO_PASSWORD: &str = "simbora123";

struct DemoPerson {
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    social_name: &'static str,
    birth_date: (i32, u32, u32),
    gender: Gender,
    address: [&'static str; 6],
}

const PEOPLE: [DemoPerson; 5] = [
    DemoPerson {
        email: "joao.silva@exemplo.com", first_name: "João", last_name: "Silva", social_name: "João da Silva",
        birth_date: (1990, 5, 15), gender: Gender::HomemCis,
        address: ["Avenida Paulista", "1578", "Bela Vista", "São Paulo", "SP", "01310-100"],
    },
    DemoPerson {
        email: "maria.santos@exemplo.com", first_name: "Maria", last_name: "Santos", social_name: "Maria Santos",
        birth_date: (1995, 8, 22), gender: Gender::MulherCis,
        address: ["Rua das Flores", "123", "Centro", "Rio de Janeiro", "RJ", "20040-020"],
    },
    DemoPerson {
        email: "carlos.oliveira@exemplo.com", first_name: "Carlos", last_name: "Oliveira", social_name: "Carlos",
        birth_date: (1988, 3, 10), gender: Gender::HomemCis,
        address: ["Rua Sete de Setembro", "456", "Jardim América", "Belo Horizonte", "MG", "30130-000"],
    },
    DemoPerson {
        email: "ana.costa@exemplo.com", first_name: "Ana", last_name: "Costa", social_name: "Ana Costa",
        birth_date: (2000, 12, 5), gender: Gender::MulherTrans,
        address: ["Avenida Brasil", "789", "Jardim Botânico", "Curitiba", "PR", "80250-000"],
    },
    DemoPerson {
        email: "alex.santos@exemplo.com", first_name: "Alex", last_name: "Santos", social_name: "Alex",
        birth_date: (1992, 7, 18), gender: Gender::NaoBinario,
        address: ["Rua das Acácias", "321", "Vila Nova", "São Paulo", "SP", "04567-890"],
    },
];

struct DemoEvent {
    name: &'static str,
    organizer: usize,
    category: EventCategory,
    meeting_location: &'static str,
    /// Offset of the start from now, in hours; negative for past events.
    starts_in_hours: i64,
    duration_hours: i64,
    min: Option<i32>,
    max: Option<i32>,
    status: EventStatus,
    participants: &'static [(usize, ParticipationStatus)],
}

const EVENTS: [DemoEvent; 6] = [
    DemoEvent {
        name: "Trilha no Parque Ibirapuera", organizer: 0, category: EventCategory::Esporte,
        meeting_location: "Portão 3 do Parque Ibirapuera", starts_in_hours: 7 * 24 + 9, duration_hours: 3,
        min: Some(5), max: Some(15), status: EventStatus::Active,
        participants: &[(1, ParticipationStatus::Confirmed), (2, ParticipationStatus::SignedUp)],
    },
    DemoEvent {
        name: "Cinema ao Ar Livre - Filmes Clássicos", organizer: 1, category: EventCategory::Cultura,
        meeting_location: "Entrada principal do Centro Cultural", starts_in_hours: 5 * 24 + 19, duration_hours: 3,
        min: Some(10), max: Some(30), status: EventStatus::Active,
        participants: &[(0, ParticipationStatus::Confirmed), (2, ParticipationStatus::Confirmed), (3, ParticipationStatus::SignedUp)],
    },
    DemoEvent {
        name: "Yoga ao Nascer do Sol", organizer: 4, category: EventCategory::Esporte,
        meeting_location: "Gramado central", starts_in_hours: 3 * 24 + 6, duration_hours: 2,
        min: Some(3), max: Some(5), status: EventStatus::Active,
        participants: &[
            (0, ParticipationStatus::Confirmed), (1, ParticipationStatus::Confirmed),
            (2, ParticipationStatus::Confirmed), (3, ParticipationStatus::SignedUp),
        ],
    },
    DemoEvent {
        name: "Workshop de Fotografia - Luz Natural", organizer: 1, category: EventCategory::Educacao,
        meeting_location: "Praça da fonte", starts_in_hours: 10 * 24 + 14, duration_hours: 3,
        min: Some(5), max: None, status: EventStatus::Active,
        participants: &[(2, ParticipationStatus::Confirmed), (3, ParticipationStatus::Confirmed), (4, ParticipationStatus::SignedUp)],
    },
    DemoEvent {
        name: "Sarau de Poesia - Vozes da Cidade", organizer: 0, category: EventCategory::Cultura,
        meeting_location: "Salão principal", starts_in_hours: 2 * 24 + 19, duration_hours: 3,
        min: Some(10), max: Some(30), status: EventStatus::Cancelled,
        participants: &[],
    },
    DemoEvent {
        name: "Caminhada Noturna - Centro Histórico", organizer: 2, category: EventCategory::Lazer,
        meeting_location: "Praça da Sé", starts_in_hours: -(5 * 24), duration_hours: 3,
        min: Some(5), max: Some(20), status: EventStatus::Finished,
        participants: &[(0, ParticipationStatus::Attended), (1, ParticipationStatus::Attended), (3, ParticipationStatus::Absent)],
    },
];

async fn seed_people(state: &AppState) -> Result<Vec<Profile>, AppError> {
    let mut profiles = Vec::with_capacity(PEOPLE.len());
    for person in &PEOPLE {
        let (y, m, d) = person.birth_date;
        let birth_date = NaiveDate::from_ymd_opt(y, m, d)
            .ok_or_else(|| AppError::InternalWithMsg(format!("Bad demo birth date for {}", person.email)))?;

        let password_hash = AuthService::hash_password(DEMO_PASSWORD)?;
        let user = User::new(person.email, person.first_name.into(), person.last_name.into(), password_hash);
        let profile = Profile::new(user.id.clone(), birth_date, Some(person.gender));
        let (user, mut profile) = state.user_repo.create_with_profile(&user, &profile).await?;

        let [street, number, neighborhood, city, uf, postal_code] = person.address;
        let address = Address::from_input(AddressInput {
            street: street.into(),
            number: number.into(),
            complement: None,
            neighborhood: neighborhood.into(),
            city: city.into(),
            state: uf.into(),
            postal_code: postal_code.into(),
        })?;
        profile.social_name = Some(person.social_name.into());
        profile.address_id = Some(address.id.clone());
        let profile = state.profile_repo.update_with_address(&profile, Some(&address)).await?;

        info!(email = %user.email, age = profile.age(Utc::now().date_naive()), "Demo user created");
        profiles.push(profile);
    }
    Ok(profiles)
}

async fn seed_events(state: &AppState, profiles: &[Profile]) -> Result<(), AppError> {
    let now = Utc::now();
    for demo in &EVENTS {
        let organizer = &profiles[demo.organizer];
        let start = now + Duration::hours(demo.starts_in_hours);

        let mut event = Event::new(NewEventParams {
            name: demo.name.into(),
            organizer_id: organizer.id.clone(),
            address_id: organizer.address_id.clone(),
            meeting_location: Some(demo.meeting_location.into()),
            description: None,
            rules: None,
            start_time: start,
            end_time: start + Duration::hours(demo.duration_hours),
            meeting_time: Some(start - Duration::minutes(30)),
            whatsapp_group: None,
            photo_url: None,
            category: Some(demo.category),
            min_participants: demo.min,
            max_participants: demo.max,
        });
        event.status = demo.status;
        event.accepts_participants = demo.status == EventStatus::Active;
        event.validate()?;

        let event = state.event_repo.create_with_address(&event, None).await?;
        for (who, status) in demo.participants {
            let participation = Participation::new(event.id.clone(), profiles[*who].id.clone(), *status);
            state.participation_repo.create(&participation).await?;
        }

        info!(event = %event.name, participants = demo.participants.len(), status = ?event.status, "Demo event created");
    }
    Ok(())
}

async fn seed() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let _guard = init_logging(&config.log_dir);
    let state = bootstrap_state(&config).await?;

    if state.user_repo.find_by_email(PEOPLE[0].email).await?.is_some() {
        warn!("Demo data already present, nothing to do");
        return Ok(());
    }

    let profiles = seed_people(&state).await?;
    seed_events(&state, &profiles).await?;

    info!(password = DEMO_PASSWORD, "Demo data ready. Every demo account shares the same password");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = seed().await {
        eprintln!("seed failed: {}", e);
        std::process::exit(1);
    }
}
