use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::customer::{Customer, CustomerPayload};
use crate::domain::types::{CustomerEmail, CustomerName, check_phone};
use crate::forms::FormError;

/// Inputs of the customer modal, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    Address,
    City,
    State,
    Country,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::Email,
        FormField::PhoneNumber,
        FormField::Address,
        FormField::City,
        FormField::State,
        FormField::Country,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::FirstName => "First Name",
            FormField::LastName => "Last Name",
            FormField::Email => "Email",
            FormField::PhoneNumber => "Phone Number",
            FormField::Address => "Address",
            FormField::City => "City",
            FormField::State => "State",
            FormField::Country => "Country",
        }
    }

    /// Name used as key in validation errors.
    pub fn name(self) -> &'static str {
        match self {
            FormField::FirstName => "first_name",
            FormField::LastName => "last_name",
            FormField::Email => "email",
            FormField::PhoneNumber => "phone_number",
            FormField::Address => "address",
            FormField::City => "city",
            FormField::State => "state",
            FormField::Country => "country",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(
            self,
            FormField::FirstName | FormField::LastName | FormField::Email
        )
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Form data for creating or editing a customer. Blank inputs are stored as `None`.
pub struct CustomerForm {
    #[validate(
        required(message = "Please enter first name"),
        length(min = 2, message = "First name must be at least 2 characters")
    )]
    pub first_name: Option<String>,
    #[validate(
        required(message = "Please enter last name"),
        length(min = 2, message = "Last name must be at least 2 characters")
    )]
    pub last_name: Option<String>,
    #[validate(
        required(message = "Please enter email address"),
        email(message = "Please enter a valid email address")
    )]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

fn validate_phone(value: &str) -> Result<(), ValidationError> {
    check_phone(value).map_err(|_| {
        ValidationError::new("phone").with_message("Please enter a valid phone number".into())
    })
}

impl CustomerForm {
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Stores the trimmed input; blank input clears the field.
    pub fn set(&mut self, field: FormField, value: &str) {
        let trimmed = value.trim();
        *self.slot_mut(field) = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    /// Builder-style variant of [`CustomerForm::set`].
    #[must_use]
    pub fn with(mut self, field: FormField, value: &str) -> Self {
        self.set(field, value);
        self
    }

    fn slot(&self, field: FormField) -> &Option<String> {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::Email => &self.email,
            FormField::PhoneNumber => &self.phone_number,
            FormField::Address => &self.address,
            FormField::City => &self.city,
            FormField::State => &self.state,
            FormField::Country => &self.country,
        }
    }

    fn slot_mut(&mut self, field: FormField) -> &mut Option<String> {
        match field {
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::Email => &mut self.email,
            FormField::PhoneNumber => &mut self.phone_number,
            FormField::Address => &mut self.address,
            FormField::City => &mut self.city,
            FormField::State => &mut self.state,
            FormField::Country => &mut self.country,
        }
    }

    /// Validates the form and converts it into the payload sent to the backend.
    pub fn to_payload(&self) -> Result<CustomerPayload, FormError> {
        self.validate()?;

        let first_name = CustomerName::new(self.first_name.clone().unwrap_or_default())
            .map_err(|_| FormError::InvalidName("first_name"))?;
        let last_name = CustomerName::new(self.last_name.clone().unwrap_or_default())
            .map_err(|_| FormError::InvalidName("last_name"))?;
        let email = CustomerEmail::new(self.email.clone().unwrap_or_default())
            .map_err(|_| FormError::InvalidEmail)?;

        Ok(
            CustomerPayload::new(first_name, last_name, email).with_contact(
                self.phone_number.clone(),
                self.address.clone(),
                self.city.clone(),
                self.state.clone(),
                self.country.clone(),
            ),
        )
    }
}

impl From<&Customer> for CustomerForm {
    /// Prefills the edit form with the record's current values.
    fn from(customer: &Customer) -> Self {
        Self {
            first_name: Some(customer.first_name.to_string()),
            last_name: Some(customer.last_name.to_string()),
            email: Some(customer.email.to_string()),
            phone_number: customer.phone_number.clone(),
            address: customer.address.clone(),
            city: customer.city.clone(),
            state: customer.state.clone(),
            country: customer.country.clone(),
        }
    }
}
