//! Domain models and API request/response shapes.

pub mod customer;

pub use customer::{
    AuthenticationResponse, Customer, CustomerDto, CustomerRegistration, CustomerUpdate,
    LoginRequest, NewCustomer,
};
