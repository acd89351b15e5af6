//! Customer domain types and API shapes.

use serde::{Deserialize, Serialize};

use clientele_core::{CustomerId, Email, Gender};

/// A customer record as held by the store.
///
/// The password hash never leaves the backend; every outward read goes
/// through [`CustomerDto`], which has no field for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Unique customer id, assigned by the store on insert.
    pub id: CustomerId,
    /// Customer's display name.
    pub name: String,
    /// Customer's email address. Unique across all customers.
    pub email: Email,
    /// Argon2 hash of the customer's password (PHC string).
    pub password_hash: String,
    /// Customer's age in years.
    pub age: i32,
    /// Customer's gender.
    pub gender: Gender,
}

/// A customer about to be inserted.
///
/// Has no id field: ids exist only once the store has assigned one.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub age: i32,
    pub gender: Gender,
}

/// Outward-facing projection of a [`Customer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDto {
    pub id: CustomerId,
    pub name: String,
    pub email: Email,
    pub age: i32,
    pub gender: Gender,
}

impl From<&Customer> for CustomerDto {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            email: customer.email.clone(),
            age: customer.age,
            gender: customer.gender,
        }
    }
}

/// Registration request body for `POST /api/v1/customers`.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRegistration {
    pub name: String,
    pub email: String,
    /// Plaintext password; hashed before storage, never stored as-is.
    pub password: String,
    pub age: i32,
    pub gender: Gender,
}

/// Partial-update request body for `PUT /api/v1/customers/{id}`.
///
/// Absent fields are left untouched. A present field equal to the current
/// value counts as "no change" as well.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// The customer's email address.
    pub username: String,
    pub password: String,
}

/// Successful login response: a bearer token plus the authenticated
/// customer's projection.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticationResponse {
    pub token: String,
    pub customer: CustomerDto,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        Customer {
            id: CustomerId::new(1),
            name: "al".to_owned(),
            email: Email::parse("al@gmail.com").unwrap(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_owned(),
            age: 10,
            gender: Gender::Male,
        }
    }

    #[test]
    fn test_dto_projects_all_public_fields() {
        let customer = customer();
        let dto = CustomerDto::from(&customer);

        assert_eq!(dto.id, customer.id);
        assert_eq!(dto.name, customer.name);
        assert_eq!(dto.email, customer.email);
        assert_eq!(dto.age, customer.age);
        assert_eq!(dto.gender, customer.gender);
    }

    #[test]
    fn test_dto_serialization_never_carries_the_hash() {
        let dto = CustomerDto::from(&customer());
        let json = serde_json::to_value(&dto).unwrap();

        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 5);
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn test_update_request_fields_all_optional() {
        let update: CustomerUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.name.is_none());
        assert!(update.email.is_none());
        assert!(update.age.is_none());

        let update: CustomerUpdate = serde_json::from_str(r#"{"age": 30}"#).unwrap();
        assert_eq!(update.age, Some(30));
        assert!(update.name.is_none());
    }

    #[test]
    fn test_registration_deserializes_gender_uppercase() {
        let request: CustomerRegistration = serde_json::from_str(
            r#"{"name":"al","email":"al@gmail.com","password":"password","age":39,"gender":"MALE"}"#,
        )
        .unwrap();
        assert_eq!(request.gender, Gender::Male);
    }
}
