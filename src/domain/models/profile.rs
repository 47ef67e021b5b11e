use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sqlx::FromRow;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "gender", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    HomemCis,
    MulherCis,
    HomemTrans,
    MulherTrans,
    NaoBinario,
    Agenero,
    GeneroFluido,
    Outro,
    NaoInformar,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Profile {
    pub id: String,
    pub user_id: Option<String>,
    pub social_name: Option<String>,
    pub birth_date: NaiveDate,
    pub description: Option<String>,
    pub gender: Option<Gender>,
    pub is_pcd: bool,
    pub neurodivergent: bool,
    pub image_url: Option<String>,
    pub address_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(user_id: String, birth_date: NaiveDate, gender: Option<Gender>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: Some(user_id),
            social_name: None,
            birth_date,
            description: None,
            gender,
            is_pcd: false,
            neurodivergent: false,
            image_url: None,
            address_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn age(&self, today: NaiveDate) -> i32 {
        age_on(self.birth_date, today)
    }
}

/// Calendar age: a birthday not yet reached this year does not count.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

pub fn validate_birth_date(birth_date: NaiveDate, today: NaiveDate, minimum_age: u32) -> Result<(), AppError> {
    if birth_date > today {
        return Err(AppError::Validation("Invalid birth date (cannot be in the future)".into()));
    }
    if age_on(birth_date, today) < minimum_age as i32 {
        return Err(AppError::Validation(format!("User must be at least {} years old", minimum_age)));
    }
    Ok(())
}

/// The naming fields of a profile joined with its (optional) user.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ProfileSummary {
    pub id: String,
    pub social_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl ProfileSummary {
    pub fn display_name(&self) -> String {
        if let Some(name) = self.social_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let full = full.trim();
        if !full.is_empty() {
            return full.to_string();
        }
        match &self.email {
            Some(email) => email.clone(),
            None => format!("Profile #{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_counts_birthday_not_yet_reached() {
        assert_eq!(age_on(date(2000, 6, 15), date(2018, 6, 14)), 17);
        assert_eq!(age_on(date(2000, 6, 15), date(2018, 6, 15)), 18);
        assert_eq!(age_on(date(2000, 6, 15), date(2018, 12, 1)), 18);
    }

    #[test]
    fn test_minimum_age_enforced_on_exact_calendar_age() {
        let today = date(2026, 3, 10);
        assert!(validate_birth_date(date(2008, 3, 10), today, 18).is_ok());
        assert!(validate_birth_date(date(2008, 3, 11), today, 18).is_err());
        assert!(validate_birth_date(date(2027, 1, 1), today, 18).is_err());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut summary = ProfileSummary {
            id: "p1".into(),
            social_name: Some("Bia".into()),
            first_name: Some("Beatriz".into()),
            last_name: Some("Lima".into()),
            email: Some("bia@example.com".into()),
        };
        assert_eq!(summary.display_name(), "Bia");

        summary.social_name = None;
        assert_eq!(summary.display_name(), "Beatriz Lima");

        summary.first_name = None;
        summary.last_name = None;
        assert_eq!(summary.display_name(), "bia@example.com");

        summary.email = None;
        assert_eq!(summary.display_name(), "Profile #p1");
    }
}
