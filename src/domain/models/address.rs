use serde::{Deserialize, Serialize};
use uuid::Uuid;
use sqlx::FromRow;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Address {
    pub id: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// Address fields as submitted by a client, before validation.
#[derive(Debug, Deserialize, Clone)]
pub struct AddressInput {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl Address {
    pub fn from_input(input: AddressInput) -> Result<Self, AppError> {
        let mut address = Self {
            id: Uuid::new_v4().to_string(),
            street: String::new(),
            number: String::new(),
            complement: None,
            neighborhood: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
        };
        address.apply(input)?;
        Ok(address)
    }

    /// Replaces every field with the validated input, keeping the id.
    pub fn apply(&mut self, input: AddressInput) -> Result<(), AppError> {
        let required = [
            ("street", &input.street),
            ("number", &input.number),
            ("neighborhood", &input.neighborhood),
            ("city", &input.city),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("Address {} is required", field)));
            }
        }

        let state = input.state.trim().to_uppercase();
        if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::Validation("State must be a two-letter code".into()));
        }

        let postal_code = input.postal_code.trim().to_string();
        if !is_valid_postal_code(&postal_code) {
            return Err(AppError::Validation("Enter a valid CEP in the format 00000-000 or 00000000".into()));
        }

        self.street = input.street.trim().to_string();
        self.number = input.number.trim().to_string();
        self.complement = input.complement.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        self.neighborhood = input.neighborhood.trim().to_string();
        self.city = input.city.trim().to_string();
        self.state = state;
        self.postal_code = postal_code;
        Ok(())
    }

    pub fn label(&self) -> String {
        format!("{}, {} - {}/{}", self.street, self.number, self.city, self.state)
    }
}

/// Brazilian CEP: five digits, optional hyphen, three digits.
pub fn is_valid_postal_code(code: &str) -> bool {
    let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    match code.split_once('-') {
        Some((head, tail)) => head.len() == 5 && tail.len() == 3 && digits(head) && digits(tail),
        None => code.len() == 8 && digits(code),
    }
}
