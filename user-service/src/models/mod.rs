pub mod user;

pub use user::{
    validate_age, validate_email, validate_name, NewUser, User, UserChanges, UserFields,
};
